// src/profile/mod.rs
// =============================================================================
// This module turns a fetched WebID document into something the crawler can
// reason about.
//
// Submodules:
// - document: the typed ProfileDocument and its NonEmpty multi-values
// - turtle: the Turtle parser that builds a ProfileDocument
// =============================================================================

mod document;
mod turtle;

pub use document::{NonEmpty, ProfileDocument};
pub use turtle::parse_profile;

#[cfg(test)]
pub use turtle::vocab;
