//! # Strata Core
//!
//! Core primitives for the Strata schedule compiler.
//!
//! This crate provides the fundamental building blocks:
//! - [`Deck`] - Tokenized keyword/record/item input
//! - [`Completion`] - One perforation of a well in a grid cell
//! - [`CompletionSet`] - Completions of a well, unique by cell
//! - [`CompletionState`], [`Phase`] and the group control vocabulary
//! - [`ScheduleError`] - Error types

pub mod completion;
pub mod completion_set;
pub mod deck;
pub mod error;
pub mod types;
pub mod value;

// Re-exports for convenience
pub use completion::{Completion, CompletionBuilder};
pub use completion_set::CompletionSet;
pub use deck::{Deck, DeckItem, DeckKeyword, DeckRecord, DeckValue};
pub use error::{Result, ScheduleError};
pub use types::*;
pub use value::Value;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::completion::Completion;
    pub use crate::completion_set::CompletionSet;
    pub use crate::deck::{Deck, DeckKeyword, DeckRecord};
    pub use crate::error::{Result, ScheduleError};
    pub use crate::types::{CompletionState, Phase};
}
