//! API Module
//!
//! Wire types for the upstream chat-completion API.

pub mod completion;

pub use completion::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Choice, Usage,
};
