//! LLM source collaborators
//!
//! The abstract fragment-producing interface the classifier consumes, plus
//! offline implementations. Vendor SDK wrappers (Gemini, OpenAI, Groq,
//! Perplexity) slot in behind the same trait.

pub mod mock;
pub mod source;

pub use mock::MockTravelSource;
pub use source::{FragmentResult, ScriptedSource, TokenSource};
