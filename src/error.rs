use std::backtrace::Backtrace;
pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("{0}")]
    Custom(String),

    /// `launch` was called while the driver was not in its initial state.
    #[error("driver was launched while next_state != INIT")]
    NotInitialized,

    /// A trail was asked to pop to a world index it never pushed.
    #[error("requested world {requested} is ahead of current world {current}")]
    InvalidWorld { requested: usize, current: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Inner: {inner}\n{backtrace}")]
    Inner {
        inner: Box<SolverError>,
        backtrace: Box<Backtrace>,
    },
}

impl From<SolverError> for Error {
    fn from(inner: SolverError) -> Self {
        Error::Inner {
            inner: Box::new(inner),
            backtrace: Box::new(std::backtrace::Backtrace::capture()),
        }
    }
}
