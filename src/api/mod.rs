//! Media-server access
//!
//! - `jellyfin`: REST request layer and error types
//! - `session`: the application-scoped session manager screens talk to

pub mod jellyfin;
pub mod session;

pub use jellyfin::{ApiError, ApiResult, ClientInfo, ErrorKind, JellyfinClient};
pub use session::{MediaClient, Session};
