pub mod archive;
pub mod browser;
pub mod config;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod output;
pub mod scoring;
pub mod source;
