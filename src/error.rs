use thiserror::Error;

#[derive(Error, Debug)]
pub enum TileForgeError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed tile input at row {row}: {reason}")]
    MalformedTileInput { row: usize, reason: String },

    #[error("Invalid anchor configuration: {0}")]
    InvalidAnchorConfiguration(String),

    #[error("Malformed snapshot at line {line}: {reason}")]
    MalformedSnapshot { line: usize, reason: String },

    #[error("Configuration Error: {0}")]
    Config(String),
}

pub type TfResult<T> = Result<T, TileForgeError>;
