//! Ergast-compatible data provider adapter.
//!
//! Talks to the Ergast F1 API (or a compatible mirror such as jolpica) over
//! HTTP and decodes its `MRData` envelope into `f1b-core` domain entities.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use f1b_core::{
    domain::{Circuit, Driver, Race},
    errors::Error,
    ports::DataProvider,
    Result,
};

/// Largest page the public mirrors serve.
pub const PAGE_LIMIT: usize = 100;

#[derive(Debug, Default, Deserialize)]
struct Reply {
    #[serde(rename = "MRData")]
    data: MrData,
}

#[derive(Debug, Default, Deserialize)]
struct MrData {
    #[serde(default)]
    limit: String,
    #[serde(default)]
    offset: String,
    #[serde(default)]
    total: String,
    #[serde(rename = "RaceTable", default)]
    race_table: Option<RaceTable>,
    #[serde(rename = "CircuitTable", default)]
    circuit_table: Option<CircuitTable>,
    #[serde(rename = "DriverTable", default)]
    driver_table: Option<DriverTable>,
}

impl MrData {
    fn total(&self) -> usize {
        self.total.trim().parse().unwrap_or(0)
    }

    fn races(self) -> Vec<Race> {
        self.race_table.map(|t| t.races).unwrap_or_default()
    }

    fn circuits(self) -> Vec<Circuit> {
        self.circuit_table.map(|t| t.circuits).unwrap_or_default()
    }

    fn drivers(self) -> Vec<Driver> {
        self.driver_table.map(|t| t.drivers).unwrap_or_default()
    }
}

#[derive(Debug, Default, Deserialize)]
struct RaceTable {
    #[serde(rename = "Races", default)]
    races: Vec<Race>,
}

#[derive(Debug, Default, Deserialize)]
struct CircuitTable {
    #[serde(rename = "Circuits", default)]
    circuits: Vec<Circuit>,
}

#[derive(Debug, Default, Deserialize)]
struct DriverTable {
    #[serde(rename = "Drivers", default)]
    drivers: Vec<Driver>,
}

fn decode(body: &str) -> Result<MrData> {
    let reply: Reply = serde_json::from_str(body)?;
    Ok(reply.data)
}

/// Offsets of the pages still to fetch after the first one.
fn remaining_offsets(total: usize, limit: usize) -> impl Iterator<Item = usize> {
    (limit..total).step_by(limit.max(1))
}

fn first_race(races: Vec<Race>, what: &str) -> Result<Race> {
    races
        .into_iter()
        .next()
        .ok_or_else(|| Error::NotFound(format!("request ok, but no {what} returned")))
}

#[derive(Clone, Debug)]
pub struct ErgastClient {
    base_url: String,
    http: reqwest::Client,
}

impl ErgastClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::External(format!("ergast client build error: {e}")))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn get(&self, endpoint: &str, query: &[(&str, String)]) -> Result<MrData> {
        let url = format!("{}{endpoint}", self.base_url);
        debug!(%url, ?query, "ergast request");

        let resp = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::External(format!("ergast request error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::External(format!(
                "ergast request failed: {status} {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| Error::External(format!("ergast read error: {e}")))?;
        decode(&body)
    }

    /// Fetch every page of a listing endpoint.
    async fn get_all<T>(&self, endpoint: &str, items: fn(MrData) -> Vec<T>) -> Result<Vec<T>> {
        let page = |offset: usize| {
            vec![
                ("limit", PAGE_LIMIT.to_string()),
                ("offset", offset.to_string()),
            ]
        };

        let first = self.get(endpoint, &page(0)).await?;
        let total = first.total();
        let mut out = items(first);

        for offset in remaining_offsets(total, PAGE_LIMIT) {
            let next = self.get(endpoint, &page(offset)).await?;
            debug!(endpoint, offset = %next.offset, limit = %next.limit, "ergast page");
            out.extend(items(next));
        }

        Ok(out)
    }
}

#[async_trait]
impl DataProvider for ErgastClient {
    async fn next_race(&self) -> Result<Race> {
        let data = self.get("/current/next.json", &[]).await?;
        first_race(data.races(), "races")
    }

    async fn last_race(&self) -> Result<Race> {
        let data = self.get("/current/last/results.json", &[]).await?;
        first_race(data.races(), "races")
    }

    async fn current_season(&self) -> Result<Vec<Race>> {
        self.get_all("/current.json", MrData::races).await
    }

    async fn circuits(&self) -> Result<Vec<Circuit>> {
        self.get_all("/circuits.json", MrData::circuits).await
    }

    async fn drivers(&self) -> Result<Vec<Driver>> {
        self.get_all("/drivers.json", MrData::drivers).await
    }

    async fn circuit_winners(&self, circuit_id: &str) -> Result<Vec<Race>> {
        let endpoint = format!("/circuits/{circuit_id}/results/1.json");
        self.get_all(&endpoint, MrData::races).await
    }

    async fn driver_results(&self, driver_id: &str) -> Result<Vec<Race>> {
        let endpoint = format!("/drivers/{driver_id}/results.json");
        self.get_all(&endpoint, MrData::races).await
    }
}
