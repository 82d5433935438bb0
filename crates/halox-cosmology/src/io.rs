//! Reader for tabulated seed power spectra.
//!
//! Whitespace separated two-column text: `k [h/Mpc]` and `P(k) [(Mpc/h)^3]`,
//! one pair per line. Lines starting with `#` and blank lines are skipped,
//! extra columns are ignored.

use std::fs;
use std::path::Path;

use crate::error::{CosmologyError, CosmologyResult};

/// A tabulated power spectrum.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PowerSpectrumTable {
    /// Wavenumbers, strictly increasing.
    pub k: Vec<f64>,
    /// Power at each wavenumber.
    pub pk: Vec<f64>,
}

impl PowerSpectrumTable {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.k.len()
    }

    /// True when no rows were read.
    pub fn is_empty(&self) -> bool {
        self.k.is_empty()
    }

    /// Splits the table into `(k, pk)` columns.
    pub fn into_columns(self) -> (Vec<f64>, Vec<f64>) {
        (self.k, self.pk)
    }
}

/// Reads a power spectrum table from a file.
///
/// # Errors
///
/// Returns [`CosmologyError::Io`] if the file cannot be read and
/// [`CosmologyError::Parse`] for malformed content.
pub fn read_power_spectrum(path: impl AsRef<Path>) -> CosmologyResult<PowerSpectrumTable> {
    let content = fs::read_to_string(path.as_ref())?;
    parse_power_spectrum(&content)
}

/// Parses power spectrum text.
///
/// # Errors
///
/// Returns [`CosmologyError::Parse`] with the one-based line number for a
/// line with fewer than two columns, a non-numeric or non-positive `k`,
/// or wavenumbers that do not increase. Returns
/// [`CosmologyError::InvalidInput`] when fewer than two rows are found.
pub fn parse_power_spectrum(content: &str) -> CosmologyResult<PowerSpectrumTable> {
    let mut table = PowerSpectrumTable::default();

    for (index, line) in content.lines().enumerate() {
        let line_number = index + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut columns = line.split_whitespace();
        let (Some(k), Some(pk)) = (columns.next(), columns.next()) else {
            return Err(CosmologyError::parse(line_number, "expected two columns"));
        };
        let k: f64 = k
            .parse()
            .map_err(|e| CosmologyError::parse(line_number, format!("wavenumber '{k}': {e}")))?;
        let pk: f64 = pk
            .parse()
            .map_err(|e| CosmologyError::parse(line_number, format!("power '{pk}': {e}")))?;

        if !(k > 0.0) {
            return Err(CosmologyError::parse(
                line_number,
                format!("wavenumber must be positive, got {k}"),
            ));
        }
        if let Some(&previous) = table.k.last() {
            if k <= previous {
                return Err(CosmologyError::parse(
                    line_number,
                    format!("wavenumbers must increase, {k} follows {previous}"),
                ));
            }
        }

        table.k.push(k);
        table.pk.push(pk);
    }

    if table.len() < 2 {
        return Err(CosmologyError::invalid_input(format!(
            "power spectrum needs at least two rows, found {}",
            table.len()
        )));
    }

    Ok(table)
}
