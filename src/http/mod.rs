//! HTTP API and page for the minutes workflow
//!
//! - GET / - Upload and generation page
//! - GET /health - Health check
//! - GET /session - Current upload session
//! - POST /uploads - Upload one file (multipart field `file`)
//! - GET /uploads - List uploaded files
//! - DELETE /uploads - Delete every upload of the session
//! - POST /minutes - Generate minutes from the uploads
//! - GET /downloads/:file_name - Download generated minutes

mod handlers;
mod routes;
mod state;

pub use handlers::ALLOWED_EXTENSIONS;
pub use routes::create_router;
pub use state::AppState;
