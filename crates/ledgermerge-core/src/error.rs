use thiserror::Error;

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse mapping TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("mapping configuration invalid: {0}")]
    Config(String),

    #[error("unknown source tag: {0}")]
    UnknownSource(String),

    #[error("input table '{name}' is not usable: {reason}")]
    MalformedInput { name: String, reason: String },
}

pub type Result<T> = std::result::Result<T, MergeError>;
