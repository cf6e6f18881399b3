//! Data model: parsed attachments, submission records, accumulators.

pub mod attachment;
pub mod stats;
pub mod submission;
