//! Line-oriented filter file format
//!
//! ```text
//! FIR 3
//! 0 0.5
//! 1 0.25
//! 4 -0.25
//! ```
//!
//! `IIR` may replace `FIR`. Blank lines and lines starting with `#` or `/`
//! are skipped on read. Each remaining line after the header fills the next
//! tap; a malformed line is logged and leaves its tap at the default value.
//! The sample rate is not stored.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::warn;

use super::filter::{Filter, FilterError, MAX_TAPS};

const FIR_TAG: &str = "FIR";
const IIR_TAG: &str = "IIR";

fn is_skipped(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.starts_with('#') || line.starts_with('/')
}

fn parse_header(line: &str, line_no: usize) -> Result<(bool, usize), FilterError> {
    let mut parts = line.split_whitespace();
    let fir = match parts.next() {
        Some(FIR_TAG) => true,
        Some(IIR_TAG) => false,
        other => {
            return Err(FilterError::Parse {
                line: line_no,
                message: format!("expected FIR or IIR, got {:?}", other.unwrap_or("")),
            })
        }
    };

    let taps = parts
        .next()
        .and_then(|t| t.parse::<usize>().ok())
        .ok_or_else(|| FilterError::Parse {
            line: line_no,
            message: format!("missing or invalid tap count in {:?}", line.trim()),
        })?;
    if taps > MAX_TAPS {
        return Err(FilterError::Parse {
            line: line_no,
            message: format!("tap count {} exceeds the limit of {}", taps, MAX_TAPS),
        });
    }

    Ok((fir, taps))
}

fn parse_tap(line: &str) -> Result<(usize, f64), String> {
    let mut parts = line.split_whitespace();
    let (Some(delay), Some(coeff), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected '<delay> <coeff>', got {:?}", line.trim()));
    };

    let delay = delay
        .parse::<usize>()
        .map_err(|e| format!("bad delay {:?}: {}", delay, e))?;
    let coeff = coeff
        .parse::<f64>()
        .map_err(|e| format!("bad coefficient {:?}: {}", coeff, e))?;
    Ok((delay, coeff))
}

impl Filter {
    /// Parse a filter from `reader`
    ///
    /// Only a missing or malformed header is an error. Bad data lines and a
    /// file that ends early produce warnings and a partially loaded filter.
    pub fn read_from<R: BufRead>(reader: R) -> Result<Self, FilterError> {
        let mut lines = reader
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line));

        let mut header = None;
        for (line_no, line) in lines.by_ref() {
            let line = line?;
            if !is_skipped(&line) {
                header = Some(parse_header(&line, line_no)?);
                break;
            }
        }
        let Some((fir, taps)) = header else {
            return Err(FilterError::Parse {
                line: 0,
                message: "no FIR/IIR header found".to_string(),
            });
        };

        let mut filter = Filter::try_new(taps)?;
        filter.set_fir(fir);

        let mut tap = 0;
        for (line_no, line) in lines {
            if tap >= taps {
                break;
            }
            let line = line?;
            if is_skipped(&line) {
                continue;
            }
            match parse_tap(&line) {
                Ok((delay, coeff)) => filter.set_tap(tap, delay, coeff)?,
                Err(message) => warn!("Skipping filter line {}: {}", line_no, message),
            }
            tap += 1;
        }

        if tap < taps {
            warn!("Filter file declares {} taps but only {} lines were found", taps, tap);
        }
        Ok(filter)
    }

    /// Write in the filter file format
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), FilterError> {
        let tag = if self.is_fir() { FIR_TAG } else { IIR_TAG };
        writeln!(writer, "{} {}", tag, self.taps())?;
        for (delay, coeff) in self.delays().iter().zip(self.coeffs()) {
            writeln!(writer, "{} {}", delay, coeff)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, FilterError> {
        let file = File::open(path)?;
        Self::read_from(BufReader::new(file))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), FilterError> {
        let file = File::create(path)?;
        self.write_to(BufWriter::new(file))
    }
}
