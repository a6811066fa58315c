//! Generative-text curation for the scent catalog.
//!
//! Turns free-form descriptions into catalog candidates and enriches existing
//! places with model-written detail, using the Gemini `generateContent` API.

pub mod batch;
pub mod clean;
pub mod client;
pub mod convert;
pub mod enhance;
pub mod error;
pub mod prompts;
pub(crate) mod retry;

pub use batch::{batch_enhance, BatchOptions, BatchReport, FailedPlace};
pub use client::{GeminiClient, GenerationConfig};
pub use convert::{convert_and_validate, convert_natural_language};
pub use enhance::{enhance_by_id, enhance_place};
pub use error::CuratorError;
