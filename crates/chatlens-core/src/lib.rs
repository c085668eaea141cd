//! Chatlens Core Library
//!
//! Classification, accuracy measurement and reporting for customer-support
//! chat transcripts.

pub mod accuracy;
pub mod batch;
pub mod classifier;
pub mod config;
pub mod error;
pub mod labels;
pub mod logging;
pub mod records;
pub mod report;
pub mod spreadsheet;
pub mod transcript;
