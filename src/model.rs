use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub linked: bool,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            linked: false,
        }
    }

    pub fn linked(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            linked: true,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn column_count(&self) -> usize {
        if !self.headers.is_empty() {
            return self.headers.len();
        }

        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    pub fn column(&self, index: usize) -> Vec<Cell> {
        self.rows
            .iter()
            .map(|row| row.get(index).cloned().unwrap_or_else(Cell::empty))
            .collect()
    }

    pub fn column_name(&self, index: usize) -> String {
        self.headers
            .get(index)
            .map(|header| header.trim())
            .filter(|header| !header.is_empty())
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| format!("Column {index}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnRatio {
    pub numeric: usize,
    pub total: usize,
    pub ratio: f64,
}

impl ColumnRatio {
    pub fn is_numeric(&self, min_ratio: f64) -> bool {
        self.total > 0 && self.ratio >= min_ratio
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericColumn {
    pub column_index: usize,
    pub column_name: String,
    pub values: Vec<f64>,
    pub raw_values: Vec<String>,
    pub numeric_ratio: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableSelection {
    pub table_index: usize,
    pub column: NumericColumn,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlotReport {
    pub url: String,
    pub generated_at: String,
    pub page_sha256: String,
    pub table_count: usize,
    pub table_index: usize,
    pub column: NumericColumn,
    pub output_path: String,
    pub width: u32,
    pub height: u32,
}
