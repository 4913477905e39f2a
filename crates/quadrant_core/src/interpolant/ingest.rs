//! Two-column text format for control points.
//!
//! One point per line: the argument and the value as whitespace-separated
//! numbers, anything after them ignored. Blank lines and lines whose first
//! non-blank character is `#` are skipped. Each column is multiplied by a
//! caller-supplied unit when read and divided by it when written.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use super::{sort_points, ControlPoint, Interpolant};
use crate::error::{NumError, Result};
use crate::traits::{Integrand, Quantity};

fn parse_column(token: Option<&str>, column: &str) -> std::result::Result<f64, String> {
    let token = token.ok_or_else(|| format!("missing {column} column"))?;
    let value = token
        .parse::<f64>()
        .map_err(|e| format!("bad {column} value '{token}': {e}"))?;
    if !value.is_finite() {
        return Err(format!("non-finite {column} value '{token}'"));
    }
    Ok(value)
}

/// Reads points from `reader`, sorted by argument.
/// `origin` names the source in error messages.
pub fn read_points<I, D, R>(
    reader: R,
    origin: &str,
    x_unit: I,
    y_unit: D,
) -> Result<Vec<ControlPoint<I, D>>>
where
    I: Quantity,
    D: Quantity,
    R: BufRead,
{
    let mut points = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|e| NumError::FileParse {
            origin: origin.to_string(),
            line: line_no,
            reason: e.to_string(),
        })?;
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut tokens = trimmed.split_whitespace();
        let parsed = parse_column(tokens.next(), "x")
            .and_then(|x| parse_column(tokens.next(), "y").map(|y| (x, y)));
        let (x, y) = parsed.map_err(|reason| NumError::FileParse {
            origin: origin.to_string(),
            line: line_no,
            reason,
        })?;
        points.push(ControlPoint {
            x: x_unit * x,
            y: y_unit * y,
        });
    }
    sort_points(&mut points);
    Ok(points)
}

/// Writes points one per line as `x y`, in multiples of the given units.
pub fn write_points<I, D, W>(
    mut writer: W,
    points: &[ControlPoint<I, D>],
    x_unit: I,
    y_unit: D,
) -> io::Result<()>
where
    I: Quantity,
    D: Quantity,
    W: Write,
{
    for p in points {
        writeln!(
            writer,
            "{} {}",
            p.x.number() / x_unit.number(),
            p.y.number() / y_unit.number()
        )?;
    }
    writer.flush()
}

impl<I, D> Interpolant<I, D>
where
    I: Quantity,
    D: Integrand<I>,
{
    /// Reads a two-column text file. Fewer than two points still give a
    /// usable interpolant whose cached integral is zero.
    pub fn from_file(path: impl AsRef<Path>, x_unit: I, y_unit: D) -> Result<Self> {
        let path = path.as_ref();
        let origin = path.display().to_string();
        let file = File::open(path).map_err(|e| NumError::FileParse {
            origin: origin.clone(),
            line: 0,
            reason: format!("failed to open: {e}"),
        })?;
        Self::from_reader(BufReader::new(file), &origin, x_unit, y_unit)
    }

    pub fn from_reader<R: BufRead>(reader: R, origin: &str, x_unit: I, y_unit: D) -> Result<Self> {
        let points = read_points(reader, origin, x_unit, y_unit)?;
        Ok(Self::from_sorted(points))
    }
}
