//! Text generation infrastructure.

#[cfg(feature = "gemini")]
pub mod gemini;

use derive_more::{Display, Error as StdError, From};

use crate::domain::draft::Prompt;

#[cfg(feature = "gemini")]
pub use self::gemini::Gemini;

/// Text generation operation.
pub use common::Handler as Llm;

/// Operation of generating a completion for a [`Prompt`].
#[derive(Clone, Debug)]
pub struct Generate(pub Prompt);

/// [`Llm`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// No API key is configured for the [`Llm`].
    #[display("API key is not configured")]
    NotConfigured,

    #[cfg(feature = "gemini")]
    /// [`Gemini`] error.
    Gemini(gemini::Error),
}
