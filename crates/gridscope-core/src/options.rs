//! Configuration options for grid series and charts.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{GridscopeError, Result};

/// Default maximum side length (in vertices) of one surface tile.
///
/// `256 * 256` vertices keep every index representable as a 16-bit index.
pub const SURFACE_SIDE_LIMIT: usize = 256;

/// Default maximum number of bars or points in one item tile.
///
/// Each bar owns 8 vertices, so `8190 * 8` still fits 16-bit indices.
pub const BAR_BUFFER_LIMIT: usize = 8190;

/// Largest item limit whose bar tiles are still addressable with `u16`.
pub const MAX_ITEM_BUFFER_LIMIT: usize = 8192;

/// How a grid series is represented in the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Representation {
    /// One point sprite per cell.
    #[default]
    Point,
    /// A continuous triangle-strip surface through all cells.
    Surface,
    /// One box per cell, stacked across bar series.
    Bar,
}

/// Kind of chart hosting the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ChartType {
    /// Numeric x/y axes; hosts points and surfaces.
    #[default]
    Scatter,
    /// Categorical x/y axes; hosts bars.
    Category,
}

impl ChartType {
    /// Returns whether a series with this representation is drawn in this chart.
    #[must_use]
    pub fn supports(self, representation: Representation) -> bool {
        match representation {
            Representation::Point | Representation::Surface => self == ChartType::Scatter,
            Representation::Bar => self == ChartType::Category,
        }
    }
}

/// Hardware buffer capacity limits used to tile large grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineLimits {
    /// Maximum number of vertices along one side of a surface tile.
    pub surface_tile_side: usize,
    /// Maximum number of cells in one point or bar tile.
    pub item_buffer_limit: usize,
}

impl Default for EngineLimits {
    fn default() -> Self {
        Self {
            surface_tile_side: SURFACE_SIDE_LIMIT,
            item_buffer_limit: BAR_BUFFER_LIMIT,
        }
    }
}

impl EngineLimits {
    /// Checks that the limits can tile any grid with 16-bit indices.
    ///
    /// Surface tiles overlap by one row, so they need at least two rows.
    pub fn validate(&self) -> Result<()> {
        if !(2..=SURFACE_SIDE_LIMIT).contains(&self.surface_tile_side) {
            return Err(GridscopeError::InvalidLimits(format!(
                "surface tile side must be within 2..={SURFACE_SIDE_LIMIT}, got {}",
                self.surface_tile_side
            )));
        }
        if !(1..=MAX_ITEM_BUFFER_LIMIT).contains(&self.item_buffer_limit) {
            return Err(GridscopeError::InvalidLimits(format!(
                "item buffer limit must be within 1..={MAX_ITEM_BUFFER_LIMIT}, got {}",
                self.item_buffer_limit
            )));
        }
        Ok(())
    }
}

/// Pen used for the surface wireframe and the bar outlines.
///
/// Only the color and the width are used.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshPen {
    pub color: Color,
    /// Line width in pixels; 0 draws one-pixel lines.
    pub width: f32,
}

impl Default for MeshPen {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 0.0,
        }
    }
}

impl MeshPen {
    /// Returns the line width handed to the backend.
    #[must_use]
    pub fn line_width(&self) -> f32 {
        if self.width == 0.0 {
            1.0
        } else {
            self.width
        }
    }
}

/// Palette applied to cells without an explicit color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorMapSettings {
    /// Name of a registered color map.
    pub name: String,
    /// Value mapped to the bottom of the palette, in axis units.
    pub min: f64,
    /// Value mapped to the top of the palette, in axis units.
    pub max: f64,
}

impl ColorMapSettings {
    pub fn new(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            min,
            max,
        }
    }
}

/// Options of one grid series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesOptions {
    /// Representation of the data.
    pub representation: Representation,
    /// Point size for cells without a size override.
    pub point_size: f32,
    /// Bar width along X as a fraction of the category spacing.
    pub bar_width_x: f64,
    /// Bar width along Y as a fraction of the category spacing.
    pub bar_width_y: f64,
    /// Whether to draw the wireframe over a surface.
    pub surface_mesh_enabled: bool,
    /// Pen for the surface wireframe and the bar outlines.
    pub mesh_pen: MeshPen,
    /// Optional palette for simple cells.
    pub color_map: Option<ColorMapSettings>,
    /// Color of the iso-lines.
    pub iso_line_color: Color,
    /// Hidden series are neither drawn nor stacked.
    pub hidden: bool,
}

impl Default for SeriesOptions {
    fn default() -> Self {
        Self {
            representation: Representation::Point,
            point_size: 2.0,
            bar_width_x: 0.5,
            bar_width_y: 0.5,
            surface_mesh_enabled: false,
            mesh_pen: MeshPen::default(),
            color_map: None,
            iso_line_color: Color::BLACK,
            hidden: false,
        }
    }
}

impl SeriesOptions {
    /// Serializes the options to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses options from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Options of a 3D chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOptions {
    /// Kind of chart.
    pub chart_type: ChartType,
    /// Buffer limits used to tile every series.
    pub limits: EngineLimits,
    /// Fixed axis ranges in X, Y, Z order; `None` means auto-range.
    pub axis_ranges: [Option<(f64, f64)>; 3],
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            chart_type: ChartType::Scatter,
            limits: EngineLimits::default(),
            axis_ranges: [None; 3],
        }
    }
}

impl ChartOptions {
    /// Serializes the options to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses and validates options from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.limits.validate()?;
        Ok(options)
    }
}
