//! Mkvstamp - Batch MKV Branding Workflow
//!
//! A Rust implementation of an automated workflow for stamping MKV files
//! with a generated subtitle track and fixed container/track metadata,
//! using the MKVToolNix command-line tools as the mutation engine.

pub mod cli;
pub mod config;
pub mod error;
pub mod fsops;
pub mod mkv;
pub mod pipeline;
pub mod subtitle;
pub mod tracks;
