pub mod classifier;
pub mod error;
pub mod orchestrator;
pub mod prompt;

pub use classifier::GreetingClassifier;
pub use error::{ChatError, NO_QUERY_MESSAGE};
pub use orchestrator::{ChatOrchestrator, ChatReply, ChatRoute};
pub use prompt::{PromptComposer, PromptRole, NO_MATCH_CONTEXT};
