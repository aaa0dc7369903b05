//! Assistant domain - configuration, conversation model and escalation policy

mod config;
mod conversation;
mod dialogue;
pub mod policy;
mod repository;

pub use self::config::{AiConfiguration, AiConfigurationId, FallbackStrategy, ProviderSettings};
pub use conversation::{AiResponse, ConversationTurn, FormData, Sender};
pub use dialogue::{
    DialogueOptions, FallbackDialogue, FallbackReply, PrimaryDialogue, PrimaryReply,
    SamplingOptions,
};
pub use policy::{RetryOutcome, RetryPolicy};
pub use repository::{ConfigSource, ConfigurationStore, StaticConfigSource};

#[cfg(test)]
pub(crate) use self::config::test_configuration;
#[cfg(test)]
pub use dialogue::{MockFallbackDialogue, MockPrimaryDialogue};
#[cfg(test)]
pub use repository::MockConfigurationStore;
