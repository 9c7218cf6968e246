pub mod client;

pub use client::{ArchiveClient, Action, SourceSettings, DEFAULT_RETRIES, DEFAULT_TIMEOUT};
