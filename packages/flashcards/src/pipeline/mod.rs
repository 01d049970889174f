//! The generation pipeline.

mod orchestrator;

pub use orchestrator::{GenerationOrchestrator, GenerationOutcome};
