//! CSV output format writer.

use crate::analysis::SpeedEstimate;
use crate::constants::{SPEED_DECIMAL_PLACES, UTF8_BOM};
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use crate::utils::duration::format_clock;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes `Time (s),Speed (m/s)` rows.
///
/// Time is clock text (`H:MM:SS.ffffff`), speed a fixed-point decimal.
pub struct CsvWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvWriter<BufWriter<File>> {
    /// Create a CSV file at `path`, optionally starting with a UTF-8 BOM.
    pub fn create(path: &Path, bom: bool) -> Result<Self> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file), bom)
    }
}

impl<W: Write> CsvWriter<W> {
    /// Wrap an arbitrary writer, e.g. stdout.
    pub fn new(mut inner: W, bom: bool) -> Result<Self> {
        if bom {
            inner.write_all(UTF8_BOM)?;
        }
        Ok(Self {
            writer: csv::WriterBuilder::new()
                .terminator(csv::Terminator::Any(b'\n'))
                .from_writer(inner),
        })
    }

    fn write_row(&mut self, row: [&str; 2]) -> Result<()> {
        self.writer
            .write_record(row)
            .map_err(|e| Error::Io(e.into()))
    }
}

impl<W: Write> OutputWriter for CsvWriter<W> {
    fn write_header(&mut self) -> Result<()> {
        self.write_row(["Time (s)", "Speed (m/s)"])
    }

    fn write_estimate(&mut self, estimate: &SpeedEstimate) -> Result<()> {
        let time = format_clock(estimate.time_secs);
        let speed = format!(
            "{:.decimal$}",
            estimate.speed_mps,
            decimal = SPEED_DECIMAL_PLACES
        );
        self.write_row([&time, &speed])
    }

    fn finalize(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
