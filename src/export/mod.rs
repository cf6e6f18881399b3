//! Export: filename resolution, CSV summaries, info sidecars.

pub mod csv;
pub mod filename;
pub mod info;
