//! Link error taxonomy.

use boardlink::Tag;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("serial I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("timed out waiting for a {0:?} response")]
    Timeout(Tag),

    #[error("protocol violation: {0}")]
    Protocol(&'static str),
}

pub type Result<T> = std::result::Result<T, LinkError>;
