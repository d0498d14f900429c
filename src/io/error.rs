use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to parse {what} from '{path}': {details}")]
    Parse {
        what: &'static str,
        path: PathBuf,
        details: String,
    },

    #[error("sample set '{path}' is malformed: {details}")]
    InvalidSampleSet { path: PathBuf, details: String },
}

impl Error {
    pub fn parse(what: &'static str, path: impl Into<PathBuf>, details: impl ToString) -> Self {
        Self::Parse {
            what,
            path: path.into(),
            details: details.to_string(),
        }
    }

    pub fn invalid_sample_set(path: impl Into<PathBuf>, details: impl Into<String>) -> Self {
        Self::InvalidSampleSet {
            path: path.into(),
            details: details.into(),
        }
    }
}
