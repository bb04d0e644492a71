//! Domain types shared across Foodgram crates.
//!
//! Pure types and rules with no framework dependencies.

pub mod pagination;
pub mod tag;
pub mod user;
pub mod viewer;
