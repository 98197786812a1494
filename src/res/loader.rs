use std::io;
use std::path::Path;

use super::id::ResourceId;

/// The callbacks of a `ResourceManager`.
///
/// `load` runs in worker threads and should do all the I/O and the parts of loading
/// which could be done in the background. Its output is handed to `done`, which runs
/// in the thread calling `ResourceManager::poll` and should be as fast as possible.
/// `destroy` releases whatever is held by the per-resource `Data` and also runs in
/// the polling thread.
pub trait Loader: Send + Sync + 'static {
    /// The per-resource value owned by the caller. The manager stores it but never
    /// inspects it.
    type Data: 'static;
    /// The output of `load` passed to `done`.
    type Intermediate: Send + 'static;

    fn load(&self, id: ResourceId, path: &Path) -> Result<Self::Intermediate, LoadError>;

    fn done(
        &self,
        _id: ResourceId,
        _data: &mut Self::Data,
        _value: Self::Intermediate,
    ) -> Result<(), LoadError> {
        Ok(())
    }

    fn destroy(&self, _id: ResourceId, _data: Self::Data) {}
}

/// The failure of a load attempt, or of its finalization. The `code` is recorded as
/// the result of the resource, and it is never zero.
#[derive(Debug, Clone, Fail)]
#[fail(display = "Failed to load resource with code {}. {}", code, message)]
pub struct LoadError {
    code: i32,
    message: String,
}

impl LoadError {
    /// The code recorded when a `load` callback panicked.
    pub const PANICKED: i32 = -1;

    /// Creates a error with `code`. A zero code means success, so its coerced into -1.
    pub fn new(code: i32) -> Self {
        LoadError::with_message(code, String::new())
    }

    pub fn with_message<T: Into<String>>(code: i32, message: T) -> Self {
        LoadError {
            code: if code == 0 { -1 } else { code },
            message: message.into(),
        }
    }

    #[inline]
    pub fn code(&self) -> i32 {
        self.code
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        LoadError::with_message(err.raw_os_error().unwrap_or(-1), err.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn code() {
        assert_eq!(LoadError::new(-1).code(), -1);
        assert_eq!(LoadError::new(3).code(), 3);
        assert_eq!(LoadError::new(0).code(), -1);

        let err = LoadError::with_message(7, "bad header");
        assert_eq!(err.message(), "bad header");
        assert!(err.to_string().contains("bad header"));

        let err: LoadError = io::Error::new(io::ErrorKind::Other, "mock").into();
        assert_eq!(err.code(), -1);
    }
}
