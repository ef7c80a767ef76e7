//! Output formatting for CLI commands.

use std::fmt;
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, SimwordArgs};
use crate::error::Result;
use crate::scoring::ScoredTypo;

/// Result structure for index builds.
#[derive(Debug, Serialize, Deserialize)]
pub struct BuildResult {
    pub index_path: String,
    pub records: usize,
}

impl fmt::Display for BuildResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Index created: {} docs in {}", self.records, self.index_path)
    }
}

/// Index statistics.
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexStats {
    pub index_path: String,
    pub records: usize,
    pub index_size_bytes: u64,
}

impl fmt::Display for IndexStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Index: {}", self.index_path)?;
        writeln!(f, "Records: {}", self.records)?;
        write!(f, "Size: {}", format_bytes(self.index_size_bytes))
    }
}

/// Output a one-off command result in the selected format.
pub fn output_result<T: Serialize + fmt::Display>(result: &T, args: &SimwordArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Text => println!("{result}"),
        OutputFormat::Json => println!("{}", serde_json::to_string(result)?),
    }
    Ok(())
}

/// Streams scored typos as lines to a writer.
pub struct TypoWriter<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> TypoWriter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        TypoWriter { out, format }
    }

    pub fn write(&mut self, typo: &ScoredTypo) -> Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.out, "{}", format_typo_line(typo))?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, typo)?;
                writeln!(self.out)?;
            }
        }
        Ok(())
    }

    /// Flush and hand back the writer.
    pub fn finish(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

/// `<distance>; <query>; <candidate>`
pub fn format_typo_line(typo: &ScoredTypo) -> String {
    format!(
        "{}; {}; {}",
        format_distance(typo.distance),
        typo.query,
        typo.candidate
    )
}

/// Print a distance the way the report format expects: whole numbers keep one
/// decimal place (`1.0`), anything else uses the shortest exact form.
pub fn format_distance(distance: f32) -> String {
    if distance.is_finite() && distance.fract() == 0.0 {
        format!("{distance:.1}")
    } else {
        format!("{distance}")
    }
}

/// Format bytes in human-readable format.
fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}
