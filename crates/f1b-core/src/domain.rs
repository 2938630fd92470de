//! Domain entities as served by the Ergast-compatible data provider.
//!
//! Field names follow the provider's JSON so adapters can decode straight into
//! these types.

use serde::Deserialize;

/// Chat the command came from and the reply goes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub lat: String,
    #[serde(default)]
    pub long: String,
    pub locality: String,
    pub country: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circuit {
    pub circuit_id: String,
    #[serde(default)]
    pub url: String,
    pub circuit_name: String,
    #[serde(rename = "Location")]
    pub location: Location,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub driver_id: String,
    #[serde(default)]
    pub url: String,
    pub given_name: String,
    pub family_name: String,
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(default)]
    pub nationality: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub permanent_number: Option<String>,
}

impl Driver {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constructor {
    pub constructor_id: String,
    #[serde(default)]
    pub url: String,
    pub name: String,
    #[serde(default)]
    pub nationality: String,
}

/// A date plus an optional clock time, e.g. `2024-09-01` / `13:00:00Z`.
///
/// Older seasons carry no start time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Schedule {
    pub date: String,
    #[serde(default)]
    pub time: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct LapTime {
    #[serde(default)]
    pub millis: Option<String>,
    pub time: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct AverageSpeed {
    pub units: String,
    pub speed: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FastestLap {
    #[serde(default)]
    pub rank: String,
    #[serde(default)]
    pub lap: String,
    #[serde(rename = "Time")]
    pub time: Option<LapTime>,
    #[serde(rename = "AverageSpeed", default)]
    pub average_speed: Option<AverageSpeed>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceResult {
    #[serde(default)]
    pub number: String,
    pub position: String,
    pub position_text: String,
    #[serde(default)]
    pub points: String,
    #[serde(rename = "Driver")]
    pub driver: Driver,
    #[serde(rename = "Constructor")]
    pub constructor: Constructor,
    #[serde(default)]
    pub grid: String,
    #[serde(default)]
    pub laps: String,
    #[serde(default)]
    pub status: String,
    #[serde(rename = "Time", default)]
    pub time: Option<LapTime>,
    #[serde(rename = "FastestLap", default)]
    pub fastest_lap: Option<FastestLap>,
}

impl RaceResult {
    /// Race time for finishers, the status (`+1 Lap`, `Engine`) otherwise.
    pub fn time_or_status(&self) -> &str {
        match &self.time {
            Some(t) => &t.time,
            None => &self.status,
        }
    }

    pub fn fastest_lap_time(&self) -> &str {
        self.fastest_lap
            .as_ref()
            .and_then(|f| f.time.as_ref())
            .map(|t| t.time.as_str())
            .unwrap_or("")
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Race {
    pub season: String,
    pub round: String,
    #[serde(default)]
    pub url: String,
    pub race_name: String,
    #[serde(rename = "Circuit")]
    pub circuit: Circuit,
    pub date: String,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(rename = "Results", default)]
    pub results: Vec<RaceResult>,
    #[serde(rename = "FirstPractice", default)]
    pub first_practice: Option<Schedule>,
    #[serde(rename = "SecondPractice", default)]
    pub second_practice: Option<Schedule>,
    #[serde(rename = "ThirdPractice", default)]
    pub third_practice: Option<Schedule>,
    #[serde(rename = "SprintQualifying", alias = "SprintShootout", default)]
    pub sprint_qualifying: Option<Schedule>,
    #[serde(rename = "Sprint", default)]
    pub sprint: Option<Schedule>,
    #[serde(rename = "Qualifying", default)]
    pub qualifying: Option<Schedule>,
}

impl Race {
    pub fn schedule(&self) -> Schedule {
        Schedule {
            date: self.date.clone(),
            time: self.time.clone(),
        }
    }

    /// Every scheduled session of the weekend, race last, in weekend order.
    pub fn sessions(&self) -> Vec<(&'static str, Schedule)> {
        let mut out: Vec<(&'static str, Schedule)> = [
            ("Practice 1", &self.first_practice),
            ("Practice 2", &self.second_practice),
            ("Practice 3", &self.third_practice),
            ("Sprint Qualifying", &self.sprint_qualifying),
            ("Sprint", &self.sprint),
            ("Qualifying", &self.qualifying),
        ]
        .into_iter()
        .filter_map(|(name, s)| s.clone().map(|s| (name, s)))
        .collect();

        // Sessions are listed by the provider in a fixed order, not by time.
        out.sort_by(|(_, a), (_, b)| {
            (a.date.as_str(), a.time.as_deref().unwrap_or(""))
                .cmp(&(b.date.as_str(), b.time.as_deref().unwrap_or("")))
        });
        out.push(("Race", self.schedule()));
        out
    }

    /// The race winner, when results are attached.
    pub fn winner(&self) -> Option<&RaceResult> {
        self.results.first()
    }
}
