use async_trait::async_trait;

use crate::{
    domain::{ChatId, Circuit, Driver, Race},
    Result,
};

/// Read-only race data source (Ergast-compatible HTTP API in production).
///
/// Implementations return already decoded entities; an empty answer for a
/// single-race query is `Error::NotFound`.
#[async_trait]
pub trait DataProvider: Send + Sync {
    async fn next_race(&self) -> Result<Race>;

    /// Last completed race, with results attached.
    async fn last_race(&self) -> Result<Race>;

    async fn current_season(&self) -> Result<Vec<Race>>;

    async fn circuits(&self) -> Result<Vec<Circuit>>;

    async fn drivers(&self) -> Result<Vec<Driver>>;

    /// Every race held at a circuit, oldest first, each with its winner only.
    async fn circuit_winners(&self, circuit_id: &str) -> Result<Vec<Race>>;

    /// Every race a driver took part in, oldest first, each with that
    /// driver's result only.
    async fn driver_results(&self, driver_id: &str) -> Result<Vec<Race>>;
}

/// Chat transport seen from the command layer.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    /// Upper bound for one outgoing message, in bytes.
    fn safe_message_len(&self) -> usize;

    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<()>;

    async fn send_typing(&self, chat_id: ChatId) -> Result<()>;
}
