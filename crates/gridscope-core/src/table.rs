//! The tabular data model behind a grid source.

use crate::color::Color;
use crate::error::{GridscopeError, Result};

/// A dense table of values with optional per-cell color and size overrides.
///
/// Storage is row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTable {
    rows: usize,
    columns: usize,
    values: Vec<f64>,
    colors: Vec<Option<Color>>,
    sizes: Vec<Option<f32>>,
}

impl DataTable {
    /// Creates a table filled with zeros and without overrides.
    pub fn new(rows: usize, columns: usize) -> Self {
        let len = rows * columns;
        Self {
            rows,
            columns,
            values: vec![0.0; len],
            colors: vec![None; len],
            sizes: vec![None; len],
        }
    }

    /// Creates a table from row vectors.
    ///
    /// Every row must have the same length as the first one.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let columns = rows.first().map_or(0, Vec::len);
        let mut values = Vec::with_capacity(rows.len() * columns);
        for row in rows {
            if row.len() != columns {
                return Err(GridscopeError::SizeMismatch {
                    expected: columns,
                    actual: row.len(),
                });
            }
            values.extend_from_slice(row);
        }
        let len = values.len();
        Ok(Self {
            rows: rows.len(),
            columns,
            values,
            colors: vec![None; len],
            sizes: vec![None; len],
        })
    }

    /// Creates a table from a row-major value slice.
    pub fn from_values(rows: usize, columns: usize, values: Vec<f64>) -> Result<Self> {
        if values.len() != rows * columns {
            return Err(GridscopeError::SizeMismatch {
                expected: rows * columns,
                actual: values.len(),
            });
        }
        let len = values.len();
        Ok(Self {
            rows,
            columns,
            values,
            colors: vec![None; len],
            sizes: vec![None; len],
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    fn offset(&self, row: usize, column: usize) -> Result<usize> {
        if row >= self.rows {
            return Err(GridscopeError::IndexOutOfRange {
                index: row,
                len: self.rows,
            });
        }
        if column >= self.columns {
            return Err(GridscopeError::IndexOutOfRange {
                index: column,
                len: self.columns,
            });
        }
        Ok(row * self.columns + column)
    }

    pub fn value(&self, row: usize, column: usize) -> Result<f64> {
        Ok(self.values[self.offset(row, column)?])
    }

    pub fn set_value(&mut self, row: usize, column: usize, value: f64) -> Result<()> {
        let offset = self.offset(row, column)?;
        self.values[offset] = value;
        Ok(())
    }

    /// Returns the color override of a cell, if any.
    pub fn color(&self, row: usize, column: usize) -> Result<Option<Color>> {
        Ok(self.colors[self.offset(row, column)?])
    }

    pub fn set_color(&mut self, row: usize, column: usize, color: Option<Color>) -> Result<()> {
        let offset = self.offset(row, column)?;
        self.colors[offset] = color;
        Ok(())
    }

    /// Returns the size override of a cell, if any.
    pub fn size(&self, row: usize, column: usize) -> Result<Option<f32>> {
        Ok(self.sizes[self.offset(row, column)?])
    }

    pub fn set_size(&mut self, row: usize, column: usize, size: Option<f32>) -> Result<()> {
        let offset = self.offset(row, column)?;
        self.sizes[offset] = size;
        Ok(())
    }
}
