//! Upload session management
//!
//! One `UploadSession` exists per process lifetime. It is named after the
//! moment it was first observed and owns exactly one directory under the
//! configured base directory; every upload for the session lands there.

mod session;
mod store;

pub use session::{session_id_from, UploadSession};
pub use store::SessionStore;
