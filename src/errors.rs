use std::io;

#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "Failed to spawn thread: {}", _0)]
    SpawnThread(#[cause] io::Error),
    #[fail(display = "Failed to create readiness notifier: {}", _0)]
    Notifier(#[cause] io::Error),
    #[fail(display = "Invalid resource parameters: {}", _0)]
    InvalidParams(String),
    #[fail(display = "{}", _0)]
    Json(#[cause] serde_json::Error),
    #[fail(display = "{}", _0)]
    Io(#[cause] io::Error),
}

pub type Result<T> = ::std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}
