pub mod events;
mod jobs;
pub mod orchestrator;

pub use events::{AudioBundle, GenerationEvent, JobError};
pub use orchestrator::{FacetSnapshot, OrchestratorSettings, ProfileOrchestrator, SubmitError};
