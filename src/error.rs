use thiserror::Error;

pub type Result<T> = std::result::Result<T, FilterError>;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Filter exhausted: fill ratio {fill:.4} exceeds limit {limit:.4}")]
    ExhaustedFilter { fill: f64, limit: f64 },
}
