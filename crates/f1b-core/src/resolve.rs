//! Identifier resolution with "did you mean" suggestions.

use crate::{errors::Error, Result};

/// Edit distance between a user query and one known identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditDistanceEntry {
    pub query: String,
    pub candidate: String,
    pub distance: usize,
}

/// Outcome of resolving a user-supplied identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Found,
    Suggested { candidate: String, distance: usize },
}

impl Resolution {
    /// User-facing message for a miss: the unknown id, then the suggestion as a list item.
    pub fn did_you_mean(&self, kind: &str, target: &str) -> Option<String> {
        match self {
            Resolution::Found => None,
            Resolution::Suggested { candidate, .. } => Some(format!(
                "No {kind} with id '{target}' was found.\nMaybe you meant?\n\t- {candidate}"
            )),
        }
    }
}

/// Levenshtein distance over Unicode scalar values.
pub fn edit_distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// Every candidate with its distance to `target`, closest first.
///
/// Ties keep the candidates' original order.
pub fn rank<S: AsRef<str>>(target: &str, candidates: &[S]) -> Vec<EditDistanceEntry> {
    let mut indexed: Vec<(usize, EditDistanceEntry)> = candidates
        .iter()
        .enumerate()
        .map(|(idx, c)| {
            let candidate = c.as_ref();
            (
                idx,
                EditDistanceEntry {
                    query: target.to_string(),
                    candidate: candidate.to_string(),
                    distance: edit_distance(target, candidate),
                },
            )
        })
        .collect();

    indexed.sort_by_key(|(idx, e)| (e.distance, *idx));
    indexed.into_iter().map(|(_, e)| e).collect()
}

/// Check `target` against `candidates` (case-sensitive).
///
/// On a miss, suggests the closest candidate; the earliest one wins ties.
pub fn resolve<S: AsRef<str>>(target: &str, candidates: &[S]) -> Result<Resolution> {
    if candidates.is_empty() {
        return Err(Error::EmptyCandidateSet);
    }
    if candidates.iter().any(|c| c.as_ref() == target) {
        return Ok(Resolution::Found);
    }

    let best = rank(target, candidates)
        .into_iter()
        .next()
        .ok_or(Error::EmptyCandidateSet)?;

    Ok(Resolution::Suggested {
        candidate: best.candidate,
        distance: best.distance,
    })
}
