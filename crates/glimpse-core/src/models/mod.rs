//! Data models for the application

mod artifact;

pub use artifact::*;
