//! Chat provider for AI-assisted prompt authoring.
//!
//! Backs the `generate` and `optimize` commands; the store itself never
//! talks to a chat model.

mod http;

pub use http::HttpChatClient;

use crate::Result;

/// System prompt for generating a template from a requirement.
pub const GENERATE_SYSTEM_PROMPT: &str = "You are a prompt engineering expert. \
     Create a high-quality, clear, reusable prompt template from the user's \
     requirement. Mark variables with double curly braces, such as \
     {{variable_name}}.";

/// Default instructions for optimizing an existing prompt.
pub const OPTIMIZE_SYSTEM_PROMPT: &str = "You are a prompt engineering expert. \
     Optimize the following prompt to make it clearer, more effective, and \
     more reusable. Return only the optimized prompt content, without any \
     explanation.";

/// Trait for chat providers.
pub trait ChatProvider: Send + Sync {
    /// Generates a completion for the given system and user messages.
    ///
    /// # Errors
    ///
    /// Returns an error if the completion fails.
    fn complete(&self, system: &str, user: &str) -> Result<String>;

    /// Generates a prompt template from a requirement description.
    ///
    /// # Errors
    ///
    /// Returns an error if the completion fails.
    fn generate_template(&self, requirement: &str) -> Result<String> {
        self.complete(GENERATE_SYSTEM_PROMPT, requirement)
    }

    /// Rewrites prompt content under the given instructions.
    ///
    /// The instructions become the system message, so they fully steer the
    /// rewrite; [`OPTIMIZE_SYSTEM_PROMPT`] is used when none are given.
    ///
    /// # Errors
    ///
    /// Returns an error if the completion fails.
    fn optimize_template(&self, content: &str, instructions: Option<&str>) -> Result<String> {
        self.complete(instructions.unwrap_or(OPTIMIZE_SYSTEM_PROMPT), content)
    }
}
