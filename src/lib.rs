pub mod config;
pub mod http;
pub mod minutes;
pub mod openai;
pub mod output;
pub mod session;
pub mod uploads;

pub use config::Config;
pub use http::{create_router, AppState};
pub use minutes::{
    GenerationState, MeetingRequest, MinutesGenerator, MinutesOutcome, MinutesService,
    PollPolicy, ProgressLog, ValidationError,
};
pub use openai::{ApiError, AssistantApi, OpenAiClient};
pub use output::OutputWriter;
pub use session::{SessionStore, UploadSession};
pub use uploads::{CollisionPolicy, UploadedFile};
