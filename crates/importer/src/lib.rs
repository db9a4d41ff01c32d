//! Polar dataset ingestion.
//!
//! Reads a measured airfoil polar from disk and normalizes it into three
//! parallel sequences (angle of attack in degrees, lift coefficient, drag
//! coefficient) plus a Reynolds number estimate. Two on-disk layouts are
//! accepted, tried in fixed priority order: the XFLR5 fixed-layout polar
//! export, then a generic fallback that keeps any line carrying at least
//! three decimal numbers.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use rotor_core::constants::REYNOLDS_SCALE;

/// Decimal number with optional sign, fraction, and exponent (1.23, -4, 5e-3).
static FLOAT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-+]?(?:\d*\.\d+|\d+)(?:[eE][-+]?\d+)?").unwrap());

/// `Re` immediately followed by a number, as in `T1_Re0.110_M0.00.csv`.
static FILENAME_REYNOLDS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Re([0-9.]+)").unwrap());

/// XFLR5 exports carry the Reynolds number on this 0-based line.
const XFLR5_REYNOLDS_LINE: usize = 7;
/// Byte span of the Reynolds field on that line.
const XFLR5_REYNOLDS_SPAN: (usize, usize) = (29, 33);
/// Number of header lines before the numeric table.
const XFLR5_HEADER_LINES: usize = 11;

/// A table needs this many rows before fitting makes sense.
const MIN_SAMPLES: usize = 2;

/// Measured polar as three parallel sequences aligned by index, ordered by
/// increasing angle of attack. Input order is trusted, never re-sorted.
#[derive(Debug, Clone, PartialEq)]
pub struct PolarTable {
    /// Angle of attack in degrees.
    pub alpha_deg: Vec<f64>,
    /// Lift coefficient.
    pub cl: Vec<f64>,
    /// Drag coefficient.
    pub cd: Vec<f64>,
}

impl PolarTable {
    /// Transpose `(alpha, cl, cd)` rows into the parallel-sequence layout.
    pub fn from_rows(rows: &[[f64; 3]]) -> Self {
        Self {
            alpha_deg: rows.iter().map(|r| r[0]).collect(),
            cl: rows.iter().map(|r| r[1]).collect(),
            cd: rows.iter().map(|r| r[2]).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.alpha_deg.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alpha_deg.is_empty()
    }
}

/// Errors raised while reading a polar file.
#[derive(Debug, Error)]
pub enum PolarError {
    #[error("failed to read polar file: {0}")]
    Io(#[from] std::io::Error),
    #[error("file does not match the {0} layout")]
    FormatMismatch(&'static str),
    #[error(
        "could not extract at least {MIN_SAMPLES} (alpha, Cl, Cd) rows; \
         found {found} line(s) with three numbers"
    )]
    InsufficientData { found: usize },
}

/// Accepted on-disk polar layouts, in sniffing priority order.
#[derive(Debug, Clone, Copy)]
enum PolarFormat {
    Xflr5,
    Generic,
}

const FORMATS: [PolarFormat; 2] = [PolarFormat::Xflr5, PolarFormat::Generic];

impl PolarFormat {
    fn parse(self, path: &Path, text: &str) -> Result<(PolarTable, f64), PolarError> {
        match self {
            PolarFormat::Xflr5 => parse_xflr5(text),
            PolarFormat::Generic => parse_generic(path, text),
        }
    }
}

/// Read a polar file and return the table plus its Reynolds number estimate
/// (0 when no estimate is available). Each accepted layout is tried in turn;
/// the first success wins and the last failure is reported.
pub fn load_polar<P: AsRef<Path>>(path: P) -> Result<(PolarTable, f64), PolarError> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    // Polar exports occasionally carry stray non-UTF-8 bytes; keep going.
    let text = String::from_utf8_lossy(&bytes);

    let mut last_failure = None;
    for format in FORMATS {
        match format.parse(path, &text) {
            Ok((table, reynolds)) => {
                log::debug!(
                    "parsed {} as {:?}: {} samples, Re = {}",
                    path.display(),
                    format,
                    table.len(),
                    reynolds
                );
                return Ok((table, reynolds));
            }
            Err(err) => last_failure = Some(err),
        }
    }
    Err(last_failure.unwrap_or(PolarError::InsufficientData { found: 0 }))
}

/// Fixed-layout XFLR5 polar export: Reynolds (in millions) at a fixed byte
/// span of line 8, numeric table after an 11-line header. Any deviation
/// rejects the whole layout; there is no partial success.
fn parse_xflr5(text: &str) -> Result<(PolarTable, f64), PolarError> {
    const LAYOUT: &str = "XFLR5 polar";
    let mismatch = || PolarError::FormatMismatch(LAYOUT);

    let lines: Vec<&str> = text.lines().collect();
    let reynolds_line = lines.get(XFLR5_REYNOLDS_LINE).ok_or_else(mismatch)?;
    let end = reynolds_line.len().min(XFLR5_REYNOLDS_SPAN.1);
    let field = reynolds_line
        .get(XFLR5_REYNOLDS_SPAN.0..end)
        .ok_or_else(mismatch)?;
    let reynolds = field.trim().parse::<f64>().map_err(|_| mismatch())?;
    let reynolds = (reynolds * REYNOLDS_SCALE).floor();

    let mut rows = Vec::new();
    for line in lines.iter().skip(XFLR5_HEADER_LINES) {
        if line.trim().is_empty() {
            continue;
        }
        let fields = line
            .split_whitespace()
            .map(str::parse::<f64>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| mismatch())?;
        if fields.len() < 3 {
            return Err(mismatch());
        }
        rows.push([fields[0], fields[1], fields[2]]);
    }
    if rows.len() < MIN_SAMPLES {
        return Err(mismatch());
    }
    Ok((PolarTable::from_rows(&rows), reynolds))
}

/// Fallback for CSV and other loosely formatted text: every line yielding at
/// least three decimal numbers contributes its first three as
/// `(alpha, cl, cd)`; everything else is skipped silently.
fn parse_generic(path: &Path, text: &str) -> Result<(PolarTable, f64), PolarError> {
    let mut rows = Vec::new();
    for line in text.lines() {
        let numbers: Vec<&str> = FLOAT_PATTERN
            .find_iter(line)
            .map(|m| m.as_str())
            .collect();
        if numbers.len() < 3 {
            continue;
        }
        let (Ok(alpha), Ok(cl), Ok(cd)) = (
            numbers[0].parse::<f64>(),
            numbers[1].parse::<f64>(),
            numbers[2].parse::<f64>(),
        ) else {
            continue;
        };
        rows.push([alpha, cl, cd]);
    }
    if rows.len() < MIN_SAMPLES {
        return Err(PolarError::InsufficientData { found: rows.len() });
    }
    Ok((PolarTable::from_rows(&rows), filename_reynolds(path)))
}

/// Reynolds estimate from a `Re<number>` tag in the file name, in millions;
/// `T1_Re0.110_M0.00.csv` gives 110000. Unparseable tags count as absent.
fn filename_reynolds(path: &Path) -> f64 {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return 0.0;
    };
    let Some(caps) = FILENAME_REYNOLDS.captures(name) else {
        return 0.0;
    };
    match caps[1].parse::<f64>() {
        Ok(value) => (value * REYNOLDS_SCALE).floor(),
        Err(_) => 0.0,
    }
}
