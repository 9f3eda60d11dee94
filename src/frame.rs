use crate::{data::Value, error::EtlError};

pub type Row = Vec<Option<Value>>;

/// The whole dataset for one pipeline run: ordered column names plus rows of
/// optional cells (`None` = missing). Stages take a `Frame` by value and hand
/// back the reworked one, so no stage can observe another's intermediate
/// state.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Frame {
    pub fn new(columns: Vec<String>) -> Self {
        Frame {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a row. The loader is the only producer and already enforces
    /// rectangular input, hence the debug-only arity check.
    pub fn push_row(&mut self, row: Row) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize, EtlError> {
        self.column_index(name).ok_or_else(|| EtlError::MissingColumn {
            column: name.to_string(),
        })
    }

    /// Appends a new column with one cell per existing row.
    pub fn add_column(&mut self, name: &str, cells: Vec<Option<Value>>) {
        debug_assert_eq!(cells.len(), self.rows.len());
        self.columns.push(name.to_string());
        for (row, cell) in self.rows.iter_mut().zip(cells) {
            row.push(cell);
        }
    }

    /// Appends a column holding the same value in every row.
    pub fn add_constant_column(&mut self, name: &str, value: Value) {
        let cells = vec![Some(value); self.rows.len()];
        self.add_column(name, cells);
    }

    /// Removes the named columns from the schema and every row. Unknown
    /// names are an error so a schema drift in the input surfaces early.
    pub fn drop_columns(&mut self, names: &[&str]) -> Result<(), EtlError> {
        let mut indices = names
            .iter()
            .map(|name| self.require_column(name))
            .collect::<Result<Vec<_>, _>>()?;
        indices.sort_unstable();
        for idx in indices.iter().rev() {
            self.columns.remove(*idx);
            for row in &mut self.rows {
                row.remove(*idx);
            }
        }
        Ok(())
    }
}
