use fanout::FanoutError;
use thiserror::Error;

pub type Result<T, E = FaxError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum FaxError {
    #[error(transparent)]
    Fanout(#[from] FanoutError),

    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Bulk operations accept between 1 and {max} job ids, got {count}")]
    InvalidBulkSize { count: usize, max: usize },

    #[error("A fax job needs at least one recipient")]
    NoRecipients,
}

impl FaxError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FaxError::Fanout(e) if e.is_not_found())
    }
}
