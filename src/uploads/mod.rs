//! Upload management for a session directory
//!
//! - `save` writes one uploaded file (text mode for `.txt`, raw bytes otherwise)
//! - `list` names what is currently stored
//! - `clear` wipes the directory and recreates it empty
//! - `CollisionPolicy` decides what happens when a target name already exists

pub mod manager;
pub mod policy;

pub use manager::{
    clear, list, save, summarize, SavedUpload, UploadError, UploadListing, UploadedFile,
};
pub use policy::{resolve_target, CollisionError, CollisionPolicy};
