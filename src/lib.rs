// Adaptive Chat - task-aware orchestration of LLM chat completions
// Library exports

pub mod classifier;
pub mod cli;
pub mod config;
pub mod errors;
pub mod logging;
pub mod orchestrator;
pub mod prompt;
pub mod providers;
pub mod structured;
