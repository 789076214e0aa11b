//! Worker tasks that back the runtime orchestration.
//!
//! The session worker owns the authoritative session and processes every
//! command sequentially; everything else reaches it through
//! [`crate::SessionHandle`].

mod session;

pub(crate) use session::{SessionCommand, SessionWorker, SessionWorkerParts};
