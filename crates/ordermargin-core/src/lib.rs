pub mod charts;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod features;
pub mod insights;
pub mod loader;
pub mod report;
pub mod schema;
pub mod stats;
