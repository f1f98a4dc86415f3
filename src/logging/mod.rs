// Transcript logging
//
// Records every successful exchange as one JSONL line so a session can be
// reviewed or replayed later.

pub mod transcript;

pub use transcript::{TranscriptEntry, TranscriptLogger};
