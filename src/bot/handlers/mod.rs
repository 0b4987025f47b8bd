//! Discord interaction handlers
//!
//! This module provides handlers for Discord interactions such as autocomplete.

/// Autocomplete handlers for ingredient, recipe and category names
pub mod autocomplete;
