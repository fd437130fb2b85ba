//! Frame series: the per-frame pitch/intensity contract between extraction
//! and analysis.

mod extract;
mod reader;
mod series;

pub use extract::{FrameExtractor, PeakPickingExtractor};
pub use reader::read_frame_file;
pub use series::FrameSeries;
