/// storage-volumes error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Could not read file {path:?}: {source}")]
    CantReadFile {
        source: std::io::Error,
        path: std::path::PathBuf,
    },

    #[error("Could not parse {line:?} as a mount entry")]
    UnexpectedFormat { line: String },

    #[error("Unknown storage state {0:?}")]
    ParseStorageState(String),

    #[error("Unknown api tier {0:?}")]
    ParseApiTier(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
