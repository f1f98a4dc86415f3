// Prompt construction
//
// Turns a raw request plus its task shape into the system/user message pair
// sent to the provider, embedding a JSON schema for structured requests.

mod builder;
pub mod schema;

pub use builder::{build, PromptBundle, STORY_WORD_RANGE};
pub use schema::{general_schema, story_schema, Schema};
