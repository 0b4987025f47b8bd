//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Length limits for replies
pub mod display;

/// General utility commands
pub mod general;

/// Ingredient registration, listing and pricing commands
pub mod ingredient;

/// Shared lookups used by several commands
pub mod lookup;

/// Production run command
pub mod production;

/// Purchase and manual consumption commands
pub mod purchase;

/// Recipe authoring and costing commands
pub mod recipe;

/// Report commands
pub mod report;

/// Discord embeds hold at most this many fields.
pub const MAX_EMBED_FIELDS: usize = 25;

// Export commands
pub use general::*;
pub use ingredient::*;
pub use production::*;
pub use purchase::*;
pub use recipe::*;
pub use report::*;
