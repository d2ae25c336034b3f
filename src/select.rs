use thiserror::Error;
use tracing::{debug, info};

use crate::classify::ValueClassifier;
use crate::model::{Cell, ColumnRatio, NumericColumn, Table, TableSelection};


pub const DEFAULT_MIN_NUMERIC_RATIO: f64 = 0.70;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectError {
    #[error("no tables found on this page")]
    NoTables,

    #[error("no numeric columns found in any table")]
    NoNumericColumns,
}

pub trait SelectionObserver {
    fn column_scored(
        &mut self,
        _table_index: usize,
        _column: usize,
        _name: &str,
        _ratio: &ColumnRatio,
    ) {
    }

    fn column_selected(&mut self, _table_index: usize, _column: &NumericColumn) {}

    fn table_without_numeric_column(&mut self, _table_index: usize) {}
}

pub struct NoopObserver;

impl SelectionObserver for NoopObserver {}

pub struct TracingObserver;

impl SelectionObserver for TracingObserver {
    fn column_scored(
        &mut self,
        table_index: usize,
        column: usize,
        name: &str,
        ratio: &ColumnRatio,
    ) {
        debug!(
            table = table_index,
            column,
            name,
            numeric = ratio.numeric,
            total = ratio.total,
            ratio = ratio.ratio,
            "scored column"
        );
    }

    fn column_selected(&mut self, table_index: usize, column: &NumericColumn) {
        info!(
            table = table_index,
            column = column.column_index,
            name = %column.column_name,
            values = column.values.len(),
            ratio = column.numeric_ratio,
            "selected numeric column"
        );
    }

    fn table_without_numeric_column(&mut self, table_index: usize) {
        debug!(table = table_index, "no qualifying column in table");
    }
}

pub struct ColumnSelector {
    classifier: ValueClassifier,
    min_ratio: f64,
}

impl ColumnSelector {
    pub fn new(classifier: ValueClassifier) -> Self {
        Self {
            classifier,
            min_ratio: DEFAULT_MIN_NUMERIC_RATIO,
        }
    }

    pub fn with_min_ratio(mut self, min_ratio: f64) -> Self {
        self.min_ratio = min_ratio;
        self
    }

    pub fn min_ratio(&self) -> f64 {
        self.min_ratio
    }

    pub fn numeric_ratio(&self, cells: &[Cell]) -> ColumnRatio {
        let total = cells.len();
        if total == 0 {
            return ColumnRatio {
                numeric: 0,
                total: 0,
                ratio: 0.0,
            };
        }

        let numeric = cells
            .iter()
            .filter(|cell| self.classifier.value(cell).is_some())
            .count();

        ColumnRatio {
            numeric,
            total,
            ratio: numeric as f64 / total as f64,
        }
    }

    /// Ties keep the lower column index.
    pub fn select_column(
        &self,
        table: &Table,
        observer: &mut dyn SelectionObserver,
    ) -> Option<NumericColumn> {
        self.select_column_in(0, table, observer)
    }

    pub fn select_from_tables(
        &self,
        tables: &[Table],
        observer: &mut dyn SelectionObserver,
    ) -> Result<TableSelection, SelectError> {
        if tables.is_empty() {
            return Err(SelectError::NoTables);
        }

        for (table_index, table) in tables.iter().enumerate() {
            if let Some(column) = self.select_column_in(table_index, table, observer) {
                return Ok(TableSelection {
                    table_index,
                    column,
                });
            }
            observer.table_without_numeric_column(table_index);
        }

        Err(SelectError::NoNumericColumns)
    }

    fn select_column_in(
        &self,
        table_index: usize,
        table: &Table,
        observer: &mut dyn SelectionObserver,
    ) -> Option<NumericColumn> {
        if table.rows.is_empty() {
            return None;
        }

        let mut best: Option<NumericColumn> = None;
        let mut best_ratio = 0.0;

        for column_index in 0..table.column_count() {
            let cells = table.column(column_index);
            let name = table.column_name(column_index);
            let ratio = self.numeric_ratio(&cells);
            observer.column_scored(table_index, column_index, &name, &ratio);

            if !ratio.is_numeric(self.min_ratio) || ratio.ratio <= best_ratio {
                continue;
            }

            let (values, raw_values): (Vec<f64>, Vec<String>) = cells
                .iter()
                .filter_map(|cell| {
                    self.classifier
                        .value(cell)
                        .map(|value| (value, cell.text.clone()))
                })
                .unzip();

            if values.is_empty() {
                continue;
            }

            best_ratio = ratio.ratio;
            best = Some(NumericColumn {
                column_index,
                column_name: name,
                values,
                raw_values,
                numeric_ratio: ratio.ratio,
            });
        }

        if let Some(column) = &best {
            observer.column_selected(table_index, column);
        }

        best
    }
}
