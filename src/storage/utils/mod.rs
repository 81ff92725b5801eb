// Utilities for storage module
pub mod error;
pub mod path;
pub mod size;
pub mod walk;
