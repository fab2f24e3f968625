pub mod classifier;
pub mod config;
pub mod notes;
pub mod sources;
pub mod tools;
