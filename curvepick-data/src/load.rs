//! Reading series tables and test points from CSV.
//!
//! A series table has an `x` column holding the shared grid and one column per
//! series, named by its header:
//!
//! ```text
//! x,y1,y2,y3
//! -20.0,39.8,-40.1,-19.9
//! ...
//! ```
//!
//! A test point file has `x` and `y` columns, one observation per row. Field
//! whitespace is trimmed and every field must parse as a number.

use std::{
    fs::File,
    io::{self, BufReader, Read},
    path::{Path, PathBuf},
    sync::Arc,
};

use csv::{ReaderBuilder, StringRecord, Trim};
use thiserror::Error;

use curvepick_core::{Grid, GridError, Series, SeriesError, TestPoint};

/// Error type for loading operations.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read CSV")]
    Csv(#[from] csv::Error),

    #[error("missing `{column}` column")]
    MissingColumn { column: &'static str },

    #[error("table has no series columns besides `x`")]
    NoSeries,

    #[error("table has no data rows")]
    Empty,

    #[error("row {row}, column `{column}`: cannot parse `{value}` as a number")]
    Parse {
        row: usize,
        column: String,
        value: String,
    },

    #[error("invalid grid in `x` column")]
    Grid(#[from] GridError),

    #[error(transparent)]
    Series(#[from] SeriesError),
}

/// Series read from one table, all sharing the table's grid.
#[derive(Debug, Clone)]
pub struct SeriesTable {
    grid: Arc<Grid>,
    series: Vec<Series>,
}

impl SeriesTable {
    #[must_use]
    pub fn grid(&self) -> &Arc<Grid> {
        &self.grid
    }

    /// Returns the series in column order.
    #[must_use]
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// Returns the series whose column is named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.name() == name)
    }
}

/// Reads a series table from a CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, lacks an `x` column or any
/// series column, has no rows, contains a non-numeric field, or if the `x`
/// column is not a valid grid.
pub fn read_series_table(path: impl AsRef<Path>) -> Result<SeriesTable, LoadError> {
    read_series_table_from_reader(open(path.as_ref())?)
}

/// Reads a series table from any CSV source.
///
/// # Errors
///
/// See [`read_series_table`].
pub fn read_series_table_from_reader<R: Read>(source: R) -> Result<SeriesTable, LoadError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(source);
    let headers = reader.headers()?.clone();

    let x_column = column(&headers, "x")?;
    let columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|&(index, _)| index != x_column)
        .map(|(index, name)| (index, name.to_string()))
        .collect();

    if columns.is_empty() {
        return Err(LoadError::NoSeries);
    }

    let mut x = Vec::new();
    let mut values = vec![Vec::new(); columns.len()];

    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let row = row + 1;

        x.push(field(&record, x_column, "x", row)?);
        for ((index, name), column_values) in columns.iter().zip(&mut values) {
            column_values.push(field(&record, *index, name, row)?);
        }
    }

    if x.is_empty() {
        return Err(LoadError::Empty);
    }

    let grid = Arc::new(Grid::new(x)?);
    let series = columns
        .into_iter()
        .zip(values)
        .map(|((_, name), values)| Series::new(name, Arc::clone(&grid), values))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SeriesTable { grid, series })
}

/// Reads test points from a CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, lacks an `x` or `y` column,
/// or contains a non-numeric field.
pub fn read_test_points(path: impl AsRef<Path>) -> Result<Vec<TestPoint>, LoadError> {
    read_test_points_from_reader(open(path.as_ref())?)
}

/// Reads test points from any CSV source.
///
/// # Errors
///
/// See [`read_test_points`].
pub fn read_test_points_from_reader<R: Read>(source: R) -> Result<Vec<TestPoint>, LoadError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(source);
    let headers = reader.headers()?.clone();

    let x_column = column(&headers, "x")?;
    let y_column = column(&headers, "y")?;

    reader
        .records()
        .enumerate()
        .map(|(row, record)| {
            let record = record?;
            let row = row + 1;
            Ok(TestPoint::new(
                field(&record, x_column, "x", row)?,
                field(&record, y_column, "y", row)?,
            ))
        })
        .collect()
}

fn open(path: &Path) -> Result<BufReader<File>, LoadError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })
}

fn column(headers: &StringRecord, name: &'static str) -> Result<usize, LoadError> {
    headers
        .iter()
        .position(|header| header == name)
        .ok_or(LoadError::MissingColumn { column: name })
}

fn field(record: &StringRecord, index: usize, column: &str, row: usize) -> Result<f64, LoadError> {
    let value = record.get(index).unwrap_or_default();
    value.parse().map_err(|_| LoadError::Parse {
        row,
        column: column.to_string(),
        value: value.to_string(),
    })
}
