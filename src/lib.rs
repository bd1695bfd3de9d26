//! Export the frames of a layered animation as a single spritesheet image.
//!
//! The crate turns an animated document into one composite image where every selected
//! frame occupies an equally sized cell, arranged as rows, columns, or a single strip.
//!
//! # Pipeline overview
//!
//! 1. **Select**: `TimeRange + layer tree -> Vec<FrameTime>` ([`select_frames`]), optionally
//!    keeping only times where a visible layer carries a keyframe
//! 2. **Plan**: `frame count + LayoutMode -> GridSize` ([`plan_grid`]) and one
//!    [`PixelOffset`] per frame ([`placement_offset`]), bundled as a [`SheetPlan`]
//! 3. **Render & place**: each frame is rendered from a resized, padded copy of the
//!    document and added to the composite at its offset ([`export_spritesheet`])
//! 4. **Write**: the composite is flattened and encoded to PNG (or WebP/TIFF/BMP/TGA)
//!
//! The document model is reached only through the [`Host`], [`Document`] and
//! [`LayerNode`] traits. [`RasterHost`] implements them in memory on top of the `image`
//! crate, and [`load_document`] builds a [`RasterDocument`] from a JSON manifest of
//! keyframe images.
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Source documents are never mutated**: work happens on a host-side clone.
//! - **Premultiplied RGBA8** inside documents; files are written with straight alpha.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod foundation;
mod host;
mod pipeline;
mod sheet;

pub use config::export::{DEFAULT_OUTPUT_FILE_NAME, ExportConfig, MAX_SPRITE_DIMENSION};
pub use config::filter::ResizeFilter;
pub use config::output::{OutputFormat, ensure_parent_dir, normalize_output_path};
pub use foundation::core::{Canvas, FrameTime, MAX_TIMELINE_FRAMES, PixelOffset, TimeRange};
pub use foundation::error::{SheetError, SheetResult};
pub use host::manifest::{
    DocumentManifest, KeyframeManifest, LayerKindManifest, LayerManifest, load_document,
    normalize_rel_path,
};
pub use host::raster::{Cel, LayerContent, RasterDocument, RasterHost, RasterLayer};
pub use host::{Document, Host, LayerNode};
pub use pipeline::export::{
    ExportReport, SHEET_DOCUMENT_NAME, export_spritesheet, plan_export, select_document_frames,
};
pub use sheet::grid::{
    GridSize, LayoutMode, SpriteGeometry, placement_offset, plan_grid, plan_grid_str,
};
pub use sheet::plan::{PlacedFrame, SheetPlan, plan_sheet};
pub use sheet::select::{layer_has_keyframe_at, layers_have_keyframe_at, select_frames};
