use thiserror::Error;

pub type PvResult<T> = Result<T, PvError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PvError {
    #[error("Index out of bounds: {what} (index={index}, len={len})")]
    IndexOob {
        what: &'static str,
        index: usize,
        len: usize,
    },
}
