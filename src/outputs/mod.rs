//! Output generation for the aggregated run.
//!
//! # Submodules
//!
//! - [`json`]: writes the aggregate collection as a single JSON document

pub mod json;
