//! Completion service clients for ProfileOS.
//!
//! All providers implement the `profileos_core::CompletionProvider` trait.
//! The router selects the correct provider based on configuration.

pub mod openai_compat;
pub mod router;

pub use openai_compat::OpenAiCompatProvider;
pub use router::ProviderRouter;
