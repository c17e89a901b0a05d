use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtlasError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid zarr store: {0}")]
    InvalidStore(String),

    #[error("Unsupported dtype: {0}")]
    UnsupportedDtype(String),

    #[error("Compressed chunks are not supported (codec: {0})")]
    UnsupportedCodec(String),

    #[error("Metadata error: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("Channel index {index} out of range (total: {total})")]
    ChannelOutOfRange { index: usize, total: usize },

    #[error("No loader for source: {0}")]
    UnknownSource(String),
}

pub type Result<T> = std::result::Result<T, AtlasError>;
