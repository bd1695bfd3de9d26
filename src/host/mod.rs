//! Capability interface over the document/rendering host.
//!
//! The export pipeline only talks to these traits. [`RasterHost`](crate::RasterHost) is the
//! in-memory implementation shipped with the crate; other hosts (an editor bridge, a test
//! double) implement the same surface.

use std::path::Path;

use crate::{
    config::{filter::ResizeFilter, output::OutputFormat},
    foundation::{
        core::{FrameTime, TimeRange},
        error::SheetResult,
    },
};

pub(crate) mod composite;
pub(crate) mod manifest;
pub(crate) mod raster;

/// A node of a document's layer tree, as seen by keyframe queries.
pub trait LayerNode {
    /// Layer name, for diagnostics.
    fn name(&self) -> &str;

    /// Hidden layers hide their whole subtree.
    fn is_visible(&self) -> bool;

    /// True when this layer itself (not its children) has a keyframe at `time`.
    fn has_keyframe_at(&self, time: FrameTime) -> bool;

    /// Direct children, bottom to top. Empty for leaf layers.
    fn children(&self) -> Vec<&dyn LayerNode>;
}

/// An animated, layered document owned by a [`Host`].
///
/// Pixel buffers are premultiplied RGBA8, row-major, tightly packed.
pub trait Document {
    /// Canvas width in pixels.
    fn width(&self) -> u32;

    /// Canvas height in pixels.
    fn height(&self) -> u32;

    /// Full animation clip range.
    fn time_range(&self) -> TimeRange;

    /// Top-level layers, bottom to top.
    fn top_level_layers(&self) -> Vec<&dyn LayerNode>;

    /// Resample the whole image (canvas and content) to `width x height`.
    fn resample(&mut self, width: u32, height: u32, filter: ResizeFilter) -> SheetResult<()>;

    /// Drop layer content lying outside the canvas.
    fn crop_to_visible_bounds(&mut self) -> SheetResult<()>;

    /// Move the canvas origin by `(x_offset, y_offset)` and set its size, keeping content in place.
    fn resize_canvas(
        &mut self,
        x_offset: i64,
        y_offset: i64,
        width: u32,
        height: u32,
    ) -> SheetResult<()>;

    /// Switch the current animation time. The projection is stale until [`Self::wait_for_done`].
    fn set_current_time(&mut self, time: FrameTime) -> SheetResult<()>;

    /// Block until the projection for the current time is settled.
    fn wait_for_done(&mut self) -> SheetResult<()>;

    /// Copy a rectangle of the settled projection.
    fn pixel_data(&self, x: u32, y: u32, width: u32, height: u32) -> SheetResult<Vec<u8>>;

    /// Append a paint layer holding `pixels` at the canvas origin; returns its index.
    fn add_layer(&mut self, name: &str, pixels: Vec<u8>, width: u32, height: u32)
    -> SheetResult<usize>;

    /// Place the top-level layer at `index` so its content starts at `(x, y)`.
    fn move_layer(&mut self, index: usize, x: i64, y: i64) -> SheetResult<()>;

    /// Number of top-level layers.
    fn layer_count(&self) -> usize;
}

/// Document lifecycle operations provided by the host application.
pub trait Host {
    /// Concrete document type.
    type Doc: Document;

    /// Independent copy of `source`; later edits never reach `source`.
    fn clone_document(&mut self, source: &Self::Doc) -> SheetResult<Self::Doc>;

    /// Blank, transparent document with no layers.
    fn create_document(&mut self, name: &str, width: u32, height: u32) -> SheetResult<Self::Doc>;

    /// Flatten `doc` and write it to `path`.
    fn export_document(
        &mut self,
        doc: &mut Self::Doc,
        path: &Path,
        format: OutputFormat,
    ) -> SheetResult<()>;

    /// Discard `doc` without saving or prompting.
    fn close_document(&mut self, doc: Self::Doc);
}
