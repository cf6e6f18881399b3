//! `classfetch` — extract student assignment submissions from exported class reports.
//!
//! This crate provides the core library for decoding exported JSON reports,
//! normalizing attachment descriptors, downloading submitted files with
//! bounded retry, and writing CSV summaries.

pub mod config;
pub mod error;
pub mod export;
pub mod fetch;
pub mod model;
pub mod parser;
pub mod pipeline;
