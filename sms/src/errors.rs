use fanout::FanoutError;
use thiserror::Error;

pub type Result<T, E = SmsError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum SmsError {
    #[error(transparent)]
    Fanout(#[from] FanoutError),

    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("An SMS job needs at least one message")]
    NoMessages,

    #[error("No SMS status available for job {0}")]
    NoStatus(String),
}

impl SmsError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SmsError::Fanout(e) if e.is_not_found())
    }
}
