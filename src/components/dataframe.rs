// src/components/dataframe.rs
use crate::algorithms::occlusion::grid_to_rows;
use crate::component::ComponentKind;
use crate::core::{
    AuxPayload, Cell, ComponentError, DataframeDatatype, DataframeType, Datatype, LabeledTable,
    Neighbors, Result, Table, TableValue,
};
use crate::traits::{template_context, InputComponent, Interpretable};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataframeConfig {
    pub headers: Option<Vec<String>>,
    pub row_count: usize,
    /// Ignored when `headers` is non-empty. A single column is returned one-dimensional
    /// (except as pandas).
    pub col_count: usize,
    pub datatype: DataframeDatatype,
    #[serde(rename = "type")]
    pub return_type: DataframeType,
    pub label: Option<String>,
}

impl Default for DataframeConfig {
    fn default() -> Self {
        DataframeConfig {
            headers: None,
            row_count: 3,
            col_count: 3,
            datatype: DataframeDatatype::default(),
            return_type: DataframeType::Pandas,
            label: None,
        }
    }
}

/// Spreadsheet input.
#[derive(Debug, Clone)]
pub struct Dataframe {
    config: DataframeConfig,
}

impl Dataframe {
    pub fn new(mut config: DataframeConfig) -> Self {
        if let Some(headers) = config.headers.as_ref().filter(|h| !h.is_empty()) {
            config.col_count = headers.len();
        }
        Dataframe { config }
    }

    pub fn col_count(&self) -> usize {
        self.config.col_count
    }

    /// A `row_count` table filled with one placeholder value per column datatype.
    pub fn sample_input(&self) -> Table {
        let row: Vec<Cell> = self
            .config
            .datatype
            .per_column(self.config.col_count)
            .into_iter()
            .map(|dt| match dt {
                Datatype::Str => Cell::Str("abc".to_string()),
                Datatype::Number => Cell::Number(786.0),
                Datatype::Bool => Cell::Bool(true),
                Datatype::Date => Cell::Str("02/08/1993".to_string()),
            })
            .collect();
        vec![row; self.config.row_count]
    }

    /// Column labels for a table of `rows` x `width`; declared headers must match
    /// the submitted width unless the table is empty.
    fn columns(&self, rows: usize, width: usize) -> Result<Vec<String>> {
        match &self.config.headers {
            Some(headers) if !headers.is_empty() => {
                if rows > 0 && headers.len() != width {
                    return Err(ComponentError::InvalidInput(format!(
                        "{} columns passed, headers declare {}",
                        width,
                        headers.len()
                    )));
                }
                Ok(headers.clone())
            }
            _ => Ok((0..width).map(|i| i.to_string()).collect()),
        }
    }

    fn first_column(table: &Table) -> Result<Vec<Cell>> {
        table
            .iter()
            .enumerate()
            .map(|(i, row)| {
                row.first()
                    .cloned()
                    .ok_or_else(|| ComponentError::InvalidInput(format!("row {} is empty", i)))
            })
            .collect()
    }
}

impl Default for Dataframe {
    fn default() -> Self {
        Dataframe::new(DataframeConfig::default())
    }
}

/// `(rows, cols)` of a rectangular table; an empty table is `(0, 0)`.
fn table_shape(table: &Table) -> Result<(usize, usize)> {
    let cols = table.first().map_or(0, Vec::len);
    if let Some((i, row)) = table.iter().enumerate().find(|(_, r)| r.len() != cols) {
        return Err(ComponentError::InvalidInput(format!(
            "row {} has {} cells, expected {}",
            i,
            row.len(),
            cols
        )));
    }
    Ok((table.len(), cols))
}

impl InputComponent for Dataframe {
    type Raw = Table;
    type Native = TableValue;

    fn kind(&self) -> ComponentKind {
        ComponentKind::Dataframe
    }

    fn label(&self) -> Option<&str> {
        self.config.label.as_deref()
    }

    fn preprocess(&self, raw: &Table) -> Result<TableValue> {
        let flatten = self.config.col_count == 1;
        match self.config.return_type {
            DataframeType::Pandas => {
                let (rows, width) = table_shape(raw)?;
                Ok(TableValue::Labeled(LabeledTable {
                    columns: self.columns(rows, width)?,
                    rows: raw.clone(),
                }))
            }
            DataframeType::Numpy if flatten => {
                Ok(TableValue::Vector(Array1::from(Self::first_column(raw)?)))
            }
            DataframeType::Numpy => {
                let shape = table_shape(raw)?;
                let cells: Vec<Cell> = raw.iter().flatten().cloned().collect();
                Ok(TableValue::Matrix(Array2::from_shape_vec(shape, cells)?))
            }
            DataframeType::Array if flatten => Ok(TableValue::Column(Self::first_column(raw)?)),
            DataframeType::Array => Ok(TableValue::Rows(raw.clone())),
        }
    }

    fn test_input(&self) -> Result<Option<Table>> {
        Ok(Some(self.sample_input()))
    }

    fn template_context(&self) -> Value {
        template_context(
            self.kind(),
            self.label(),
            json!({
                "headers": self.config.headers,
                "datatype": self.config.datatype,
                "row_count": self.config.row_count,
                "col_count": self.config.col_count,
            }),
        )
    }
}

impl Interpretable for Dataframe {
    type Config = ();
    type Scores = Vec<Vec<f64>>;

    fn interpret(self, _config: ()) -> Self {
        self
    }

    fn interpretation(&self) -> &() {
        &()
    }

    /// One neighbor per cell in row-major order, with that cell blanked.
    fn interpretation_neighbors(&self, raw: &Table) -> Result<Neighbors<Table>> {
        let (rows, cols) = table_shape(raw)?;
        let mut values = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                let mut blanked = raw.clone();
                blanked[i][j] = raw[i][j].blanked();
                values.push(blanked);
            }
        }
        Ok(Neighbors::new(values, AuxPayload::Shape { rows, cols }, true))
    }

    fn interpretation_scores(
        &self,
        _raw: &Table,
        _neighbors: &[Table],
        scores: &[f64],
        aux: &AuxPayload,
    ) -> Result<Vec<Vec<f64>>> {
        let grid = Array2::from_shape_vec(aux.shape()?, scores.to_vec())?;
        Ok(grid_to_rows(&grid))
    }
}
