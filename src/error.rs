use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("observer with id `{0}` is already registered")]
    DuplicateObserver(String),

    #[error("state vector has {actual} entries but the chart holds {expected} items")]
    StateLength { expected: usize, actual: usize },
}
