//! Decoding of exported class reports and attachment descriptors.

pub mod attachment;
pub mod report;
