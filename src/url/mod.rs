//! URL handling module for sitetree
//!
//! This module provides the canonical URL form used as the identity of every
//! page, plus relative-reference resolution against a base page.

mod normalize;

pub use normalize::NormalizedUrl;
