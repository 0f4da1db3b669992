//! Domain types shared across the Médiature workspace.
//!
//! This crate contains only pure types and functions with no framework
//! dependencies.

pub mod avatar;
pub mod invitation;
