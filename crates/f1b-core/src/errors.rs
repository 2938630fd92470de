/// Core error type for the bot.
///
/// Adapter crates map their specific errors into this type so command handlers
/// can treat every failure the same way (user-facing message, logged once).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("parsing time '{input}': {reason}")]
    TimeParse { input: String, reason: String },

    #[error("unknown time zone '{0}'")]
    TimeZone(String),

    #[error("no candidates to resolve against")]
    EmptyCandidateSet,

    #[error("row has {found} cells but the table header has {expected}")]
    ColumnMismatch { expected: usize, found: usize },

    #[error("{0}")]
    InvalidCommand(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
