//! Meeting minutes generation
//!
//! One generation walks `Idle → ValidatingInputs → ValidatingFiles → Indexing
//! → Prompting → ExtractingResult → Persisting → CleaningUp → Done`:
//! - inputs and the upload set are validated before anything remote exists
//! - uploads are indexed into a fresh vector store
//! - one assistant run produces the minutes text
//! - the text is written locally
//! - every remote resource created on the way is released, on every exit path

mod generator;
mod poll;
mod progress;
mod prompt;
mod request;
mod resources;
mod service;

pub use generator::MinutesGenerator;
pub use poll::{batch_status, poll_until, run_status, PollOutcome, PollPolicy, PollStatus};
pub use progress::{GenerationState, ProgressLog};
pub use prompt::{minutes_instructions, ASSISTANT_INSTRUCTIONS, METADATA_FIELDS, VECTOR_STORE_NAME};
pub use request::{MeetingRequest, ValidatedRequest, ValidationError};
pub use resources::RemoteResources;
pub use service::{CompletedMinutes, GenerationFailure, MinutesOutcome, MinutesService};
