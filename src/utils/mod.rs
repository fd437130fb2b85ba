//! Shared helpers.

pub mod duration;
