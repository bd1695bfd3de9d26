use std::str::FromStr;

use crate::foundation::{
    core::PixelOffset,
    error::{SheetError, SheetResult},
};

/// Strategy for arranging sprites in the composite canvas.
///
/// Serialized in kebab-case; parsing (serde included) goes through [`FromStr`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum LayoutMode {
    /// Fill each row left to right before moving down.
    #[default]
    Rows,
    /// Fill each column top to bottom before moving right.
    Columns,
    /// A single row holding every sprite.
    HorizontalStrip,
    /// A single column holding every sprite.
    VerticalStrip,
}

impl LayoutMode {
    /// Every supported mode, in menu order.
    pub const ALL: [LayoutMode; 4] = [
        LayoutMode::Rows,
        LayoutMode::Columns,
        LayoutMode::HorizontalStrip,
        LayoutMode::VerticalStrip,
    ];

    /// Human-facing name (`"Horizontal Strip"`).
    pub fn display_name(self) -> &'static str {
        match self {
            LayoutMode::Rows => "Rows",
            LayoutMode::Columns => "Columns",
            LayoutMode::HorizontalStrip => "Horizontal Strip",
            LayoutMode::VerticalStrip => "Vertical Strip",
        }
    }
}

impl std::fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for LayoutMode {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "rows" => Ok(LayoutMode::Rows),
            "columns" => Ok(LayoutMode::Columns),
            "horizontalstrip" => Ok(LayoutMode::HorizontalStrip),
            "verticalstrip" => Ok(LayoutMode::VerticalStrip),
            _ => Err(SheetError::invalid_config(format!(
                "unrecognized layout mode '{s}' (expected Rows, Columns, Horizontal Strip or Vertical Strip)"
            ))),
        }
    }
}

impl TryFrom<String> for LayoutMode {
    type Error = SheetError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Number of sprite cells along each axis of the composite canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GridSize {
    /// Cells per row.
    pub columns: u32,
    /// Cells per column.
    pub rows: u32,
}

impl GridSize {
    /// Build a grid size.
    pub fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }
}

/// Size of one sprite cell: the target sprite size plus padding on every side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SpriteGeometry {
    /// Target sprite width in pixels (before padding).
    pub sprite_width: u32,
    /// Target sprite height in pixels (before padding).
    pub sprite_height: u32,
    /// Transparent border added on each side.
    pub padding: u32,
}

impl SpriteGeometry {
    /// Build a geometry, rejecting empty sprites and padded sizes that overflow `u32`.
    pub fn new(sprite_width: u32, sprite_height: u32, padding: u32) -> SheetResult<Self> {
        if sprite_width == 0 || sprite_height == 0 {
            return Err(SheetError::invalid_config(format!(
                "sprite size must be non-zero (got {sprite_width}x{sprite_height})"
            )));
        }
        let geometry = Self {
            sprite_width,
            sprite_height,
            padding,
        };
        padded(sprite_width, padding)?;
        padded(sprite_height, padding)?;
        Ok(geometry)
    }

    /// `sprite_width + 2 * padding`.
    pub fn final_width(self) -> u32 {
        self.sprite_width + 2 * self.padding
    }

    /// `sprite_height + 2 * padding`.
    pub fn final_height(self) -> u32 {
        self.sprite_height + 2 * self.padding
    }
}

fn padded(extent: u32, padding: u32) -> SheetResult<u32> {
    padding
        .checked_mul(2)
        .and_then(|p| extent.checked_add(p))
        .ok_or_else(|| {
            SheetError::invalid_config(format!(
                "padding {padding} overflows sprite extent {extent}"
            ))
        })
}

/// Compute the grid for `frame_count` sprites.
///
/// Rows/Columns use a `ceil(sqrt(n))` heuristic, so the last row (or column) may be
/// partially filled. An empty selection still gets a `1x1` grid.
pub fn plan_grid(frame_count: u32, mode: LayoutMode) -> GridSize {
    if frame_count == 0 {
        return GridSize::new(1, 1);
    }
    match mode {
        LayoutMode::Rows => {
            let columns = ceil_sqrt(frame_count);
            GridSize::new(columns, frame_count.div_ceil(columns))
        }
        LayoutMode::Columns => {
            let rows = ceil_sqrt(frame_count);
            GridSize::new(frame_count.div_ceil(rows), rows)
        }
        LayoutMode::HorizontalStrip => GridSize::new(frame_count, 1),
        LayoutMode::VerticalStrip => GridSize::new(1, frame_count),
    }
}

/// [`plan_grid`] for a mode given by name; unknown names are configuration errors.
pub fn plan_grid_str(frame_count: u32, mode: &str) -> SheetResult<GridSize> {
    let mode = mode.parse::<LayoutMode>()?;
    Ok(plan_grid(frame_count, mode))
}

/// Top-left pixel of the sprite at `ordinal` (0-based position in the frame selection).
///
/// Callers keep `ordinal` below the frame count the grid was planned for, which keeps
/// the result inside `columns * final_width` by `rows * final_height`.
pub fn placement_offset(
    ordinal: u32,
    grid: GridSize,
    geometry: SpriteGeometry,
    mode: LayoutMode,
) -> PixelOffset {
    let (w, h) = (geometry.final_width(), geometry.final_height());
    let (cell_x, cell_y) = match mode {
        LayoutMode::Rows => (ordinal % grid.columns, ordinal / grid.columns),
        LayoutMode::Columns => (ordinal / grid.rows, ordinal % grid.rows),
        LayoutMode::HorizontalStrip => (ordinal, 0),
        LayoutMode::VerticalStrip => (0, ordinal),
    };
    PixelOffset {
        x: cell_x * w,
        y: cell_y * h,
    }
}

fn ceil_sqrt(n: u32) -> u32 {
    let r = n.isqrt();
    if r * r < n { r + 1 } else { r }
}

#[cfg(test)]
#[path = "../../tests/unit/sheet/grid.rs"]
mod tests;
