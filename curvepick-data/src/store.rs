//! SQLite storage for raw tables and pipeline results.
//!
//! Series are stored in long format, one row per sample:
//!
//! | table                | columns                                                   |
//! |----------------------|-----------------------------------------------------------|
//! | `training_data`      | `series, x, y`                                            |
//! | `ideal_functions`    | `series, x, y`                                            |
//! | `selected_functions` | `training, ideal, total_deviation, max_deviation`         |
//! | `test_data_mappings` | `point, x, y, delta_y, ideal_function, training, status, reason` |
//!
//! Every write replaces the whole table inside one transaction, so storing
//! the results of a repeated run leaves the database in the same state.
//! SQLite has no NaN, so NaN values are stored as `NULL`.

use std::{fmt, path::Path, str::FromStr};

use rusqlite::{Connection, params};
use thiserror::Error;

use curvepick_core::Series;
use curvepick_match::{Classification, Matches, Outcome};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS training_data (
    series TEXT NOT NULL,
    x      REAL,
    y      REAL
);
CREATE TABLE IF NOT EXISTS ideal_functions (
    series TEXT NOT NULL,
    x      REAL,
    y      REAL
);
CREATE TABLE IF NOT EXISTS selected_functions (
    training        TEXT NOT NULL,
    ideal           TEXT NOT NULL,
    total_deviation REAL,
    max_deviation   REAL
);
CREATE TABLE IF NOT EXISTS test_data_mappings (
    point          INTEGER PRIMARY KEY,
    x              REAL,
    y              REAL,
    delta_y        REAL,
    ideal_function TEXT,
    training       TEXT,
    status         TEXT NOT NULL,
    reason         TEXT
);
";

/// Error type for storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error("point index {index} does not fit in an SQLite integer")]
    IndexOverflow { index: usize },

    #[error("unknown mapping status `{status}` for point {point}")]
    UnknownStatus { point: usize, status: String },
}

/// Tables holding series in long format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeriesTable {
    Training,
    Ideal,
}

impl SeriesTable {
    fn name(self) -> &'static str {
        match self {
            Self::Training => "training_data",
            Self::Ideal => "ideal_functions",
        }
    }
}

/// How a test point ended up in `test_data_mappings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Assigned,
    Unassigned,
    Rejected,
}

impl Status {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Assigned => "assigned",
            Self::Unassigned => "unassigned",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assigned" => Ok(Self::Assigned),
            "unassigned" => Ok(Self::Unassigned),
            "rejected" => Ok(Self::Rejected),
            _ => Err(()),
        }
    }
}

/// One row of `test_data_mappings`.
///
/// Only assigned points carry `delta_y`, `ideal_function`, and `training`.
/// Rejected points carry the reason they could not be classified.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingRow {
    pub point: usize,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub delta_y: Option<f64>,
    pub ideal_function: Option<String>,
    pub training: Option<String>,
    pub status: Status,
    pub reason: Option<String>,
}

impl MappingRow {
    /// Flattens the classification of the test point at position `point`.
    #[must_use]
    pub fn new(point: usize, classification: &Classification) -> Self {
        let mut row = Self {
            point,
            x: not_nan(classification.point.x),
            y: not_nan(classification.point.y),
            delta_y: None,
            ideal_function: None,
            training: None,
            status: Status::Unassigned,
            reason: None,
        };

        match &classification.outcome {
            Outcome::Assigned(assignment) => {
                row.delta_y = not_nan(assignment.deviation);
                row.ideal_function = Some(assignment.candidate.name.clone());
                row.training = Some(assignment.training.name.clone());
                row.status = Status::Assigned;
            }
            Outcome::Unassigned => {}
            Outcome::Rejected(err) => {
                row.status = Status::Rejected;
                row.reason = Some(err.to_string());
            }
        }

        row
    }
}

/// One row of `selected_functions`.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedRow {
    pub training: String,
    pub ideal: String,
    pub total_deviation: Option<f64>,
    pub max_deviation: Option<f64>,
}

/// A connection to a curvepick database.
#[derive(Debug)]
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens or creates the database at `path` and ensures the schema exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the schema cannot
    /// be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::with_connection(Connection::open(path)?)
    }

    /// Creates a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created.
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Replaces the contents of `training_data`.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails; the table is left unchanged.
    pub fn write_training(&mut self, series: &[Series]) -> Result<(), StoreError> {
        self.write_series(SeriesTable::Training, series)
    }

    /// Replaces the contents of `ideal_functions`.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails; the table is left unchanged.
    pub fn write_candidates(&mut self, series: &[Series]) -> Result<(), StoreError> {
        self.write_series(SeriesTable::Ideal, series)
    }

    fn write_series(&mut self, table: SeriesTable, series: &[Series]) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute(&format!("DELETE FROM {}", table.name()), [])?;
        {
            let mut insert = tx.prepare(&format!(
                "INSERT INTO {} (series, x, y) VALUES (?1, ?2, ?3)",
                table.name()
            ))?;
            for s in series {
                for [x, y] in s.points() {
                    insert.execute(params![s.name(), not_nan(x), not_nan(y)])?;
                }
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Replaces the contents of `selected_functions`.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails; the table is left unchanged.
    pub fn write_matches(&mut self, matches: &Matches) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM selected_functions", [])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO selected_functions (training, ideal, total_deviation, max_deviation)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for selection in matches {
                insert.execute(params![
                    selection.training.name,
                    selection.candidate.name,
                    not_nan(selection.total_deviation),
                    not_nan(selection.max_deviation),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Replaces the contents of `test_data_mappings`, one row per point.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails; the table is left unchanged.
    pub fn write_classifications(
        &mut self,
        classifications: &[Classification],
    ) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM test_data_mappings", [])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO test_data_mappings
                 (point, x, y, delta_y, ideal_function, training, status, reason)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for (index, classification) in classifications.iter().enumerate() {
                let row = MappingRow::new(index, classification);
                let point =
                    i64::try_from(row.point).map_err(|_| StoreError::IndexOverflow { index })?;
                insert.execute(params![
                    point,
                    row.x,
                    row.y,
                    row.delta_y,
                    row.ideal_function,
                    row.training,
                    row.status.as_str(),
                    row.reason,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Reads `selected_functions` in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn read_selections(&self) -> Result<Vec<SelectedRow>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT training, ideal, total_deviation, max_deviation
             FROM selected_functions ORDER BY rowid",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(SelectedRow {
                training: row.get(0)?,
                ideal: row.get(1)?,
                total_deviation: row.get(2)?,
                max_deviation: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    /// Reads `test_data_mappings` in point order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row holds an unknown status.
    pub fn read_mappings(&self) -> Result<Vec<MappingRow>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT point, x, y, delta_y, ideal_function, training, status, reason
             FROM test_data_mappings ORDER BY point",
        )?;
        let rows = stmt.query_map([], |row| {
            let point: i64 = row.get(0)?;
            let point = usize::try_from(point)
                .map_err(|_| rusqlite::Error::IntegralValueOutOfRange(0, point))?;
            let status: String = row.get(6)?;
            Ok((
                status,
                MappingRow {
                    point,
                    x: row.get(1)?,
                    y: row.get(2)?,
                    delta_y: row.get(3)?,
                    ideal_function: row.get(4)?,
                    training: row.get(5)?,
                    status: Status::Unassigned,
                    reason: row.get(7)?,
                },
            ))
        })?;

        rows.map(|row| -> Result<MappingRow, StoreError> {
            let (status, mut mapping) = row?;
            mapping.status = status.parse().map_err(|()| StoreError::UnknownStatus {
                point: mapping.point,
                status,
            })?;
            Ok(mapping)
        })
        .collect()
    }
}

fn not_nan(value: f64) -> Option<f64> {
    (!value.is_nan()).then_some(value)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use approx::assert_relative_eq;
    use tempfile::tempdir;

    use curvepick_core::{Grid, TestPoint};
    use curvepick_match::{
        assign_unobserved, classifier::Config, select_best_unobserved,
    };

    use super::*;

    fn fixture() -> (Vec<Series>, Vec<Series>, Matches, Vec<Classification>) {
        let grid = Arc::new(Grid::new(vec![0.0, 1.0, 2.0]).expect("valid grid"));
        let training = vec![Series::new("y1", Arc::clone(&grid), vec![0.0, 1.1, 0.0]).unwrap()];
        let ideal = vec![
            Series::new("y1", Arc::clone(&grid), vec![5.0, 5.0, 5.0]).unwrap(),
            Series::new("y2", Arc::clone(&grid), vec![0.0, 1.0, 0.0]).unwrap(),
        ];
        let matches = select_best_unobserved(&training, &ideal).unwrap();
        let points = [
            TestPoint::new(1.0, 1.05),
            TestPoint::new(1.0, 9.0),
            TestPoint::new(7.0, 0.0),
        ];
        let classifications =
            assign_unobserved(&points, &matches, &ideal, &Config::default()).unwrap();
        (training, ideal, matches, classifications)
    }

    fn count(store: &Store, table: &str) -> i64 {
        store
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn stores_series_in_long_format() {
        let (training, ideal, _, _) = fixture();
        let mut store = Store::in_memory().unwrap();

        store.write_training(&training).unwrap();
        store.write_candidates(&ideal).unwrap();

        assert_eq!(count(&store, "training_data"), 3);
        assert_eq!(count(&store, "ideal_functions"), 6);

        let y: f64 = store
            .conn
            .query_row(
                "SELECT y FROM ideal_functions WHERE series = 'y2' AND x = 1.0",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_relative_eq!(y, 1.0);
    }

    #[test]
    fn stores_selections_and_mappings() {
        let (_, _, matches, classifications) = fixture();
        let mut store = Store::in_memory().unwrap();

        store.write_matches(&matches).unwrap();
        store.write_classifications(&classifications).unwrap();

        let selections = store.read_selections().unwrap();
        assert_eq!(selections.len(), 1);
        assert_eq!(selections[0].training, "y1");
        assert_eq!(selections[0].ideal, "y2");
        assert_relative_eq!(selections[0].max_deviation.unwrap(), 0.1, epsilon = 1e-12);

        let mappings = store.read_mappings().unwrap();
        let statuses: Vec<_> = mappings.iter().map(|m| m.status).collect();
        assert_eq!(
            statuses,
            [Status::Assigned, Status::Unassigned, Status::Rejected]
        );

        let assigned = &mappings[0];
        assert_eq!(assigned.point, 0);
        assert_eq!(assigned.ideal_function.as_deref(), Some("y2"));
        assert_eq!(assigned.training.as_deref(), Some("y1"));
        assert_relative_eq!(assigned.delta_y.unwrap(), 0.05, epsilon = 1e-12);

        assert_eq!(mappings[1].delta_y, None);
        assert_eq!(mappings[1].ideal_function, None);
        assert!(mappings[2].reason.as_deref().unwrap().contains("outside"));
    }

    #[test]
    fn rewriting_replaces_previous_contents() {
        let (training, _, matches, classifications) = fixture();
        let mut store = Store::in_memory().unwrap();

        for _ in 0..2 {
            store.write_training(&training).unwrap();
            store.write_matches(&matches).unwrap();
            store.write_classifications(&classifications).unwrap();
        }

        assert_eq!(count(&store, "training_data"), 3);
        assert_eq!(count(&store, "selected_functions"), 1);
        assert_eq!(count(&store, "test_data_mappings"), 3);
    }

    #[test]
    fn nan_values_are_stored_as_null() {
        let grid = Arc::new(Grid::new(vec![0.0, 1.0]).unwrap());
        let series = [Series::new("gap", grid, vec![1.0, f64::NAN]).unwrap()];
        let mut store = Store::in_memory().unwrap();

        store.write_training(&series).unwrap();

        let nulls: i64 = store
            .conn
            .query_row(
                "SELECT COUNT(*) FROM training_data WHERE y IS NULL",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(nulls, 1);
    }

    #[test]
    fn persists_across_connections() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("curves.db");
        let (_, _, matches, classifications) = fixture();

        {
            let mut store = Store::open(&path).unwrap();
            store.write_matches(&matches).unwrap();
            store.write_classifications(&classifications).unwrap();
        }

        let store = Store::open(&path).unwrap();
        assert_eq!(store.read_selections().unwrap().len(), 1);
        assert_eq!(store.read_mappings().unwrap().len(), 3);
    }

    #[test]
    fn unknown_status_is_an_error() {
        let store = Store::in_memory().unwrap();
        store
            .conn
            .execute(
                "INSERT INTO test_data_mappings (point, status) VALUES (0, 'lost')",
                [],
            )
            .unwrap();

        assert!(matches!(
            store.read_mappings(),
            Err(StoreError::UnknownStatus { point: 0, .. })
        ));
    }
}
