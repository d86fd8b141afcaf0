pub mod guard;
pub mod session;
pub mod storage;

pub use guard::{GuardState, Guarded, RouteGuard};
pub use session::{Session, SessionStore};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
