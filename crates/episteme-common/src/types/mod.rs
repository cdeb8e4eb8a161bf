//! Core types for Episteme

pub mod mode;
pub mod outcome;
pub mod profile;
pub mod snapshot;
pub mod vector_set;
