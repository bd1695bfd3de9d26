use crate::{
    foundation::{
        core::{Canvas, FrameTime, PixelOffset},
        error::{SheetError, SheetResult},
    },
    sheet::grid::{GridSize, LayoutMode, SpriteGeometry, placement_offset, plan_grid},
};

/// A selected frame and where its sprite goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PlacedFrame {
    /// 0-based position in the frame selection.
    pub ordinal: u32,
    /// Animation time rendered into this cell.
    pub time: FrameTime,
    /// Top-left pixel in the composite canvas.
    pub offset: PixelOffset,
}

/// Complete layout of one spritesheet, independent of any pixels.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SheetPlan {
    /// Arrangement used.
    pub layout: LayoutMode,
    /// Cell geometry.
    pub geometry: SpriteGeometry,
    /// Grid dimensions in cells.
    pub grid: GridSize,
    /// Composite canvas size: `columns * final_width` by `rows * final_height`.
    pub canvas: Canvas,
    /// One entry per selected frame, in selection order.
    pub frames: Vec<PlacedFrame>,
}

impl SheetPlan {
    /// Number of sprites placed.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// True when no frame was selected; the canvas is then a single empty cell.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Plan the grid and every placement for `selection`.
pub fn plan_sheet(
    selection: &[FrameTime],
    layout: LayoutMode,
    geometry: SpriteGeometry,
) -> SheetResult<SheetPlan> {
    let count = u32::try_from(selection.len()).map_err(|_| {
        SheetError::invalid_config(format!("too many frames: {}", selection.len()))
    })?;
    let grid = plan_grid(count, layout);

    let canvas_extent = |cells: u32, cell: u32, axis: &str| {
        cells.checked_mul(cell).ok_or_else(|| {
            SheetError::invalid_config(format!(
                "spritesheet {axis} overflows: {cells} cells of {cell}px"
            ))
        })
    };
    let canvas = Canvas {
        width: canvas_extent(grid.columns, geometry.final_width(), "width")?,
        height: canvas_extent(grid.rows, geometry.final_height(), "height")?,
    };

    let frames = selection
        .iter()
        .zip(0u32..)
        .map(|(&time, ordinal)| PlacedFrame {
            ordinal,
            time,
            offset: placement_offset(ordinal, grid, geometry, layout),
        })
        .collect();

    Ok(SheetPlan {
        layout,
        geometry,
        grid,
        canvas,
        frames,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/sheet/plan.rs"]
mod tests;
