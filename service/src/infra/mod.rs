//! Infrastructure layer.

pub mod database;
pub mod llm;

pub use self::{database::Database, llm::Llm};
#[cfg(any(test, feature = "memory"))]
pub use self::database::Memory;
#[cfg(feature = "postgres")]
pub use self::database::{postgres, Postgres};
#[cfg(feature = "gemini")]
pub use self::llm::Gemini;
