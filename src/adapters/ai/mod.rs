//! AI adapters: providers and the function-calling report generator.

mod mock_provider;
mod openai_provider;
mod report_generator;

pub use mock_provider::{
    MockAIProvider, MockError, MockResponse, DEFAULT_MOCK_REPLY, MOCK_MODEL,
};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
pub use report_generator::{
    FunctionCallingGenerator, GeneratorSettings, SYSTEM_PROMPT, UPDATE_FUNCTION,
};
