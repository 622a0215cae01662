use thiserror::Error;

/// Failures while resolving an index into its constituent stocks.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Invalid or unknown index selected: {0}")]
    UnknownIndex(String),

    #[error("Failed to fetch the CSV from URL {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("CSV headers do not contain required 'Company Name' or 'Symbol' fields")]
    MissingColumns,

    #[error("No stocks found in index {0}")]
    NoConstituents(String),

    #[error("Failed to read CSV: {0}")]
    Csv(String),
}

impl From<csv::Error> for IndexError {
    fn from(err: csv::Error) -> Self {
        IndexError::Csv(err.to_string())
    }
}
