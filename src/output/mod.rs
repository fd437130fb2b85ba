//! Result writers.

mod csv;
mod json;
pub mod progress;
mod writer;

pub use csv::CsvWriter;
pub use json::{JsonEstimate, JsonResultFile, JsonResultWriter, JsonSettings, JsonSummary};
pub use writer::{OutputWriter, RunContext};
