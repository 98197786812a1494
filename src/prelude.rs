pub use crate::errors::Error;
pub use crate::notify::{WaitFd, WaitHandle};
pub use crate::res::{
    LoadError, Loader, ResOption, ResourceId, ResourceManager, ResourceParams, ResourceState,
};
