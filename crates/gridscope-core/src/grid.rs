//! The grid source adapter.
//!
//! A [`GridSource`] presents a [`DataTable`] as an `Nx x Ny` grid of samples
//! `z(i, j)` with axis coordinates `x(i)` and `y(j)`. Two shapes are
//! supported:
//!
//! - *explicit axes*: one reserved table column holds every x coordinate and
//!   one reserved table row holds every y coordinate. Table rows index x and
//!   table columns index y.
//! - *equidistant*: every table cell is data and the coordinates are
//!   `x(i) = x_min + i * x_delta`, `y(j) = y_min + j * y_delta`.
//!
//! Every mutation bumps a generation counter, which downstream caches compare
//! against their last-seen value.

use std::cell::Cell;

use crate::axis::Axis;
use crate::color::Color;
use crate::error::{GridscopeError, Result};
use crate::table::DataTable;

/// The shape of a grid, deciding how logical cells map onto the table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridShape {
    /// Axis values are read from a reserved column (x) and row (y).
    ExplicitAxes { x_column: usize, y_row: usize },
    /// Axis values are `min + index * delta`.
    Equidistant {
        x_min: f64,
        x_delta: f64,
        y_min: f64,
        y_delta: f64,
    },
}

/// Everything known about one logical grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub color: Option<Color>,
    pub size: Option<f32>,
}

#[derive(Debug, Clone, Copy)]
struct CachedRange {
    generation: u64,
    min: f64,
    max: f64,
}

/// Uniform `(i, j)` access over explicit-axis and equidistant grids.
#[derive(Debug, Clone)]
pub struct GridSource {
    table: DataTable,
    shape: GridShape,
    generation: u64,
    range: Cell<Option<CachedRange>>,
}

impl GridSource {
    /// Creates a grid whose axis values live in the table itself.
    pub fn explicit(table: DataTable, x_column: usize, y_row: usize) -> Result<Self> {
        let shape = GridShape::ExplicitAxes { x_column, y_row };
        validate(&table, shape)?;
        Ok(Self::with_shape(table, shape))
    }

    /// Creates a grid with equally spaced axis values.
    pub fn equidistant(table: DataTable, x: (f64, f64), y: (f64, f64)) -> Result<Self> {
        let shape = GridShape::Equidistant {
            x_min: x.0,
            x_delta: x.1,
            y_min: y.0,
            y_delta: y.1,
        };
        validate(&table, shape)?;
        Ok(Self::with_shape(table, shape))
    }

    fn with_shape(table: DataTable, shape: GridShape) -> Self {
        Self {
            table,
            shape,
            generation: 0,
            range: Cell::new(None),
        }
    }

    /// Monotonic change counter.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn touch(&mut self) {
        self.generation += 1;
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn table(&self) -> &DataTable {
        &self.table
    }

    /// Mutable access to the underlying table.
    ///
    /// Counts as a change: the cached range is invalidated.
    pub fn table_mut(&mut self) -> &mut DataTable {
        self.touch();
        &mut self.table
    }

    /// Replaces the table, keeping the shape.
    pub fn set_table(&mut self, table: DataTable) -> Result<()> {
        validate(&table, self.shape)?;
        self.table = table;
        self.touch();
        Ok(())
    }

    /// Selects the table column holding the x coordinates.
    pub fn set_x_column(&mut self, column: usize) -> Result<()> {
        let GridShape::ExplicitAxes { y_row, .. } = self.shape else {
            return Err(GridscopeError::GridShapeMismatch {
                operation: "set_x_column",
                expected: "explicit-axis",
            });
        };
        let shape = GridShape::ExplicitAxes {
            x_column: column,
            y_row,
        };
        validate(&self.table, shape)?;
        self.shape = shape;
        self.touch();
        Ok(())
    }

    /// Selects the table row holding the y coordinates.
    pub fn set_y_row(&mut self, row: usize) -> Result<()> {
        let GridShape::ExplicitAxes { x_column, .. } = self.shape else {
            return Err(GridscopeError::GridShapeMismatch {
                operation: "set_y_row",
                expected: "explicit-axis",
            });
        };
        let shape = GridShape::ExplicitAxes { x_column, y_row: row };
        validate(&self.table, shape)?;
        self.shape = shape;
        self.touch();
        Ok(())
    }

    /// Sets the origin and spacing of the x axis.
    pub fn set_x_abscissa(&mut self, min: f64, delta: f64) -> Result<()> {
        match &mut self.shape {
            GridShape::Equidistant { x_min, x_delta, .. } => {
                *x_min = min;
                *x_delta = delta;
            }
            GridShape::ExplicitAxes { .. } => {
                return Err(GridscopeError::GridShapeMismatch {
                    operation: "set_x_abscissa",
                    expected: "equidistant",
                })
            }
        }
        self.touch();
        Ok(())
    }

    /// Sets the origin and spacing of the y axis.
    pub fn set_y_abscissa(&mut self, min: f64, delta: f64) -> Result<()> {
        match &mut self.shape {
            GridShape::Equidistant { y_min, y_delta, .. } => {
                *y_min = min;
                *y_delta = delta;
            }
            GridShape::ExplicitAxes { .. } => {
                return Err(GridscopeError::GridShapeMismatch {
                    operation: "set_y_abscissa",
                    expected: "equidistant",
                })
            }
        }
        self.touch();
        Ok(())
    }

    /// Returns `(Nx, Ny)`.
    pub fn cell_count(&self) -> (usize, usize) {
        match self.shape {
            GridShape::ExplicitAxes { .. } => (self.table.rows() - 1, self.table.columns() - 1),
            GridShape::Equidistant { .. } => (self.table.rows(), self.table.columns()),
        }
    }

    /// Maps a logical cell onto its table position.
    ///
    /// Explicit-axis grids skip the reserved row and column.
    pub fn table_position(&self, i: usize, j: usize) -> Result<(usize, usize)> {
        let (nx, ny) = self.cell_count();
        check_index(i, nx)?;
        check_index(j, ny)?;
        Ok(match self.shape {
            GridShape::ExplicitAxes { x_column, y_row } => {
                (i + usize::from(i >= y_row), j + usize::from(j >= x_column))
            }
            GridShape::Equidistant { .. } => (i, j),
        })
    }

    /// Returns the x coordinate of grid row `i`.
    pub fn x_at(&self, i: usize) -> Result<f64> {
        check_index(i, self.cell_count().0)?;
        match self.shape {
            GridShape::ExplicitAxes { x_column, y_row } => {
                self.table.value(i + usize::from(i >= y_row), x_column)
            }
            GridShape::Equidistant { x_min, x_delta, .. } => Ok(x_min + i as f64 * x_delta),
        }
    }

    /// Returns the y coordinate of grid column `j`.
    pub fn y_at(&self, j: usize) -> Result<f64> {
        check_index(j, self.cell_count().1)?;
        match self.shape {
            GridShape::ExplicitAxes { x_column, y_row } => {
                self.table.value(y_row, j + usize::from(j >= x_column))
            }
            GridShape::Equidistant { y_min, y_delta, .. } => Ok(y_min + j as f64 * y_delta),
        }
    }

    /// Reads one logical cell.
    pub fn cell(&self, i: usize, j: usize) -> Result<CellSample> {
        let (row, column) = self.table_position(i, j)?;
        Ok(CellSample {
            x: self.x_at(i)?,
            y: self.y_at(j)?,
            z: self.table.value(row, column)?,
            color: self.table.color(row, column)?,
            size: self.table.size(row, column)?,
        })
    }

    pub fn value_at(&self, i: usize, j: usize) -> Result<f64> {
        let (row, column) = self.table_position(i, j)?;
        self.table.value(row, column)
    }

    pub fn color_override_at(&self, i: usize, j: usize) -> Result<Option<Color>> {
        let (row, column) = self.table_position(i, j)?;
        self.table.color(row, column)
    }

    pub fn size_override_at(&self, i: usize, j: usize) -> Result<Option<f32>> {
        let (row, column) = self.table_position(i, j)?;
        self.table.size(row, column)
    }

    /// Label of the `index`-th tick along a grid axis.
    ///
    /// Only X and Y carry labels.
    pub fn axis_label(&self, index: usize, axis: Axis) -> Result<String> {
        let value = match axis {
            Axis::X => self.x_at(index)?,
            Axis::Y => self.y_at(index)?,
            Axis::Z => return Err(GridscopeError::UnsupportedAxis(axis)),
        };
        Ok(format!("{value}"))
    }

    /// Returns `(min, max)` along an axis in axis units.
    ///
    /// For X and Y these are the first and last coordinates; for Z the cached
    /// value range.
    pub fn bounds(&self, axis: Axis) -> Result<(f64, f64)> {
        let (nx, ny) = self.cell_count();
        match axis {
            Axis::X => Ok((self.x_at(0)?, self.x_at(nx - 1)?)),
            Axis::Y => Ok((self.y_at(0)?, self.y_at(ny - 1)?)),
            Axis::Z => self.z_range(),
        }
    }

    /// Returns the smallest and largest value over all data cells.
    ///
    /// Computed on first use and cached until the next change.
    pub fn z_range(&self) -> Result<(f64, f64)> {
        if let Some(cached) = self.range.get() {
            if cached.generation == self.generation {
                return Ok((cached.min, cached.max));
            }
        }
        let (nx, ny) = self.cell_count();
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for i in 0..nx {
            for j in 0..ny {
                let z = self.value_at(i, j)?;
                min = min.min(z);
                max = max.max(z);
            }
        }
        log::debug!("computed grid value range [{min}, {max}] over {nx}x{ny} cells");
        self.range.set(Some(CachedRange {
            generation: self.generation,
            min,
            max,
        }));
        Ok((min, max))
    }

    /// Counts the cells without and with a color override.
    pub fn count_cell_kinds(&self) -> Result<(usize, usize)> {
        let (nx, ny) = self.cell_count();
        let mut colored = 0;
        for i in 0..nx {
            for j in 0..ny {
                if self.color_override_at(i, j)?.is_some() {
                    colored += 1;
                }
            }
        }
        Ok((nx * ny - colored, colored))
    }
}

fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(GridscopeError::IndexOutOfRange { index, len })
    }
}

fn validate(table: &DataTable, shape: GridShape) -> Result<()> {
    let (rows, columns) = (table.rows(), table.columns());
    match shape {
        GridShape::ExplicitAxes { x_column, y_row } => {
            if rows < 2 || columns < 2 {
                return Err(GridscopeError::EmptyGrid { rows, columns });
            }
            if x_column >= columns {
                return Err(GridscopeError::InvalidReservedLine {
                    what: "column",
                    index: x_column,
                    len: columns,
                });
            }
            if y_row >= rows {
                return Err(GridscopeError::InvalidReservedLine {
                    what: "row",
                    index: y_row,
                    len: rows,
                });
            }
        }
        GridShape::Equidistant { .. } => {
            if rows == 0 || columns == 0 {
                return Err(GridscopeError::EmptyGrid { rows, columns });
            }
        }
    }
    Ok(())
}
