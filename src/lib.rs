pub mod analyzer;
pub mod config;
pub mod error;
pub mod fetch;
pub mod output;
pub mod record;
pub mod source;
pub mod stats;
