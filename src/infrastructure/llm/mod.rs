//! LLM provider implementations

mod factory;
mod http_client;
mod openai;
mod regional;
mod resolver;

pub use factory::LlmProviderFactory;
pub use http_client::{HttpClient, HttpClientTrait};
pub use openai::OpenAiProvider;
pub use regional::RegionalProvider;
pub use resolver::CachedProviderResolver;

#[cfg(test)]
pub use http_client::mock::MockHttpClient;
