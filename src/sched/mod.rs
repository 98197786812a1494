//! The background execution primitives: a FIFO `JobQueue`, a fixed pool of worker
//! threads draining it, and some latches and unwinding helpers shared with the
//! resource manager.

pub mod latch;
pub mod unwind;

mod queue;
mod scheduler;

pub use self::latch::{Latch, LockLatch};
pub use self::queue::JobQueue;
pub use self::scheduler::Scheduler;
