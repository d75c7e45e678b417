use thiserror::Error;

/// Fatal conversion errors. Everything not listed here degrades to a default.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown color: {0:?}")]
    UnknownColor(String),

    #[error("invalid size: {0:?}")]
    InvalidSize(String),

    #[error("<kFont> opened at offset {offset} while another <kFont> is still open")]
    NestedTag { offset: usize },

    #[error("invalid span range {start}..{end} for text of length {len}")]
    InvalidRange { start: usize, end: usize, len: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
