pub mod capacity;
pub mod error;
pub mod metadata;
