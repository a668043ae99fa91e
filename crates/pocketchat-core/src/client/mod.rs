//! Client-side invocation layer.
//!
//! Everything a chat front end needs to drive the procedures: a typed
//! caller trait, the command-prefix parser, a cached history query, and the
//! submit orchestration that ties them together.

pub mod caller;
pub mod history;
pub mod request;
pub mod session;

pub use caller::{ClientError, InProcessCaller, ProcedureCaller};
pub use history::HistoryQuery;
pub use request::ChatRequest;
pub use session::{ActivityFlags, ChatSession, Exchange};
