use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("row position {position} is out of bounds ({len} rows)")]
    IndexOutOfRange { position: usize, len: usize },
}
