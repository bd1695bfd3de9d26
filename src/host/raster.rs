use std::{
    collections::{BTreeMap, BTreeSet},
    path::Path,
};

use image::{RgbaImage, imageops};

use crate::{
    config::{
        filter::ResizeFilter,
        output::{OutputFormat, ensure_parent_dir},
    },
    foundation::{
        core::{FrameTime, TimeRange},
        error::{SheetError, SheetResult},
    },
    host::{
        Document, Host, LayerNode,
        composite::{blit_over, unpremultiply_in_place},
    },
};

/// Pixels drawn by a paint layer from one keyframe onwards.
#[derive(Clone, Debug)]
pub struct Cel {
    /// Left edge in layer coordinates.
    pub x: i64,
    /// Top edge in layer coordinates.
    pub y: i64,
    /// Premultiplied RGBA8 content.
    pub image: RgbaImage,
}

impl Cel {
    /// Cel anchored at the layer origin.
    pub fn new(image: RgbaImage) -> Self {
        Self::at(image, 0, 0)
    }

    /// Cel with its top-left corner at `(x, y)`.
    pub fn at(image: RgbaImage, x: i64, y: i64) -> Self {
        Self { x, y, image }
    }

    fn is_empty(&self) -> bool {
        self.image.width() == 0 || self.image.height() == 0
    }
}

/// What a [`RasterLayer`] holds.
#[derive(Clone, Debug)]
pub enum LayerContent {
    /// Animated pixels; each keyframe's cel is held until the next keyframe.
    Paint {
        /// Keyframes by time.
        keyframes: BTreeMap<FrameTime, Cel>,
    },
    /// Nested layers, bottom to top.
    Group {
        /// Child layers.
        children: Vec<RasterLayer>,
    },
}

/// A layer in a [`RasterDocument`].
#[derive(Clone, Debug)]
pub struct RasterLayer {
    /// Display name.
    pub name: String,
    /// Hidden layers (and their children) are neither drawn nor probed for keyframes.
    pub visible: bool,
    /// Layer opacity in `[0, 1]`.
    pub opacity: f32,
    /// Translation applied to the layer and its children.
    pub offset: (i64, i64),
    /// Layer payload.
    pub content: LayerContent,
}

impl RasterLayer {
    /// Visible, opaque paint layer with the given keyframes.
    pub fn paint(name: impl Into<String>, keyframes: impl IntoIterator<Item = (FrameTime, Cel)>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            opacity: 1.0,
            offset: (0, 0),
            content: LayerContent::Paint {
                keyframes: keyframes.into_iter().collect(),
            },
        }
    }

    /// Visible group layer.
    pub fn group(name: impl Into<String>, children: Vec<RasterLayer>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            opacity: 1.0,
            offset: (0, 0),
            content: LayerContent::Group { children },
        }
    }

    /// Same layer, hidden.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Same layer with another opacity.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Same layer, translated.
    pub fn with_offset(mut self, x: i64, y: i64) -> Self {
        self.offset = (x, y);
        self
    }

    /// Cel shown at `time`: the latest keyframe at or before it.
    pub fn cel_at(&self, time: FrameTime) -> Option<&Cel> {
        match &self.content {
            LayerContent::Paint { keyframes } => {
                keyframes.range(..=time).next_back().map(|(_, cel)| cel)
            }
            LayerContent::Group { .. } => None,
        }
    }
}

impl LayerNode for RasterLayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn has_keyframe_at(&self, time: FrameTime) -> bool {
        match &self.content {
            LayerContent::Paint { keyframes } => keyframes.contains_key(&time),
            LayerContent::Group { .. } => false,
        }
    }

    fn children(&self) -> Vec<&dyn LayerNode> {
        match &self.content {
            LayerContent::Paint { .. } => Vec::new(),
            LayerContent::Group { children } => {
                children.iter().map(|c| c as &dyn LayerNode).collect()
            }
        }
    }
}

/// In-memory layered, animated raster document.
///
/// Layer coordinates are fixed; the canvas is a `width x height` window whose top-left
/// corner sits at `origin` in layer coordinates. The projection (rendered canvas) is
/// cached per current time and dropped by every mutation.
#[derive(Clone, Debug)]
pub struct RasterDocument {
    id: u64,
    name: String,
    width: u32,
    height: u32,
    origin: (i64, i64),
    time_range: TimeRange,
    current_time: FrameTime,
    layers: Vec<RasterLayer>,
    projection: Option<RgbaImage>,
    modified: bool,
}

impl RasterDocument {
    /// Empty document; the current time starts at `time_range.start`.
    pub fn new(
        name: impl Into<String>,
        width: u32,
        height: u32,
        time_range: TimeRange,
    ) -> SheetResult<Self> {
        if width == 0 || height == 0 {
            return Err(SheetError::host(format!(
                "document canvas must be non-empty (got {width}x{height})"
            )));
        }
        Ok(Self {
            id: 0,
            name: name.into(),
            width,
            height,
            origin: (0, 0),
            time_range,
            current_time: time_range.start,
            layers: Vec::new(),
            projection: None,
            modified: false,
        })
    }

    /// Same document with `layer` added on top.
    pub fn with_layer(mut self, layer: RasterLayer) -> Self {
        self.push_layer(layer);
        self
    }

    /// Add `layer` on top of the stack.
    pub fn push_layer(&mut self, layer: RasterLayer) {
        self.layers.push(layer);
        self.touch();
    }

    /// Document name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Host-assigned identifier; `0` for documents the host did not create.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Canvas top-left corner in layer coordinates.
    pub fn origin(&self) -> (i64, i64) {
        self.origin
    }

    /// Current animation time.
    pub fn current_time(&self) -> FrameTime {
        self.current_time
    }

    /// Top-level layers, bottom to top.
    pub fn layers(&self) -> &[RasterLayer] {
        &self.layers
    }

    /// True when the document changed since it was created, cloned or last marked clean.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Set or clear the dirty flag.
    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    /// Render the canvas at `time` without touching the current time.
    pub fn render_at(&self, time: FrameTime) -> RgbaImage {
        let mut canvas = RgbaImage::new(self.width, self.height);
        let base = (-self.origin.0, -self.origin.1);
        for layer in &self.layers {
            draw_layer(&mut canvas, layer, time, base, 1.0);
        }
        canvas
    }

    /// Settled projection at the current time.
    pub fn flatten(&mut self) -> SheetResult<RgbaImage> {
        self.wait_for_done()?;
        self.projection
            .clone()
            .ok_or_else(|| SheetError::host("projection missing after wait_for_done"))
    }

    fn touch(&mut self) {
        self.projection = None;
        self.modified = true;
    }
}

fn draw_layer(
    canvas: &mut RgbaImage,
    layer: &RasterLayer,
    time: FrameTime,
    offset: (i64, i64),
    opacity: f32,
) {
    if !layer.visible {
        return;
    }
    let offset = (offset.0 + layer.offset.0, offset.1 + layer.offset.1);
    let opacity = opacity * layer.opacity;
    match &layer.content {
        LayerContent::Paint { .. } => {
            if let Some(cel) = layer.cel_at(time) {
                blit_over(canvas, &cel.image, offset.0 + cel.x, offset.1 + cel.y, opacity);
            }
        }
        LayerContent::Group { children } => {
            for child in children {
                draw_layer(canvas, child, time, offset, opacity);
            }
        }
    }
}

fn scale_coord(v: i64, factor: f64) -> i64 {
    (v as f64 * factor).round() as i64
}

fn scale_layer(layer: &mut RasterLayer, sx: f64, sy: f64, filter: imageops::FilterType) {
    layer.offset = (scale_coord(layer.offset.0, sx), scale_coord(layer.offset.1, sy));
    match &mut layer.content {
        LayerContent::Paint { keyframes } => {
            for cel in keyframes.values_mut() {
                cel.x = scale_coord(cel.x, sx);
                cel.y = scale_coord(cel.y, sy);
                if cel.is_empty() {
                    continue;
                }
                let w = ((f64::from(cel.image.width()) * sx).round() as u32).max(1);
                let h = ((f64::from(cel.image.height()) * sy).round() as u32).max(1);
                cel.image = imageops::resize(&cel.image, w, h, filter);
            }
        }
        LayerContent::Group { children } => {
            for child in children {
                scale_layer(child, sx, sy, filter);
            }
        }
    }
}

fn crop_layer(layer: &mut RasterLayer, offset: (i64, i64), width: u32, height: u32) {
    let offset = (offset.0 + layer.offset.0, offset.1 + layer.offset.1);
    match &mut layer.content {
        LayerContent::Paint { keyframes } => {
            for cel in keyframes.values_mut() {
                crop_cel(cel, offset, width, height);
            }
        }
        LayerContent::Group { children } => {
            for child in children {
                crop_layer(child, offset, width, height);
            }
        }
    }
}

fn crop_cel(cel: &mut Cel, offset: (i64, i64), width: u32, height: u32) {
    let left = offset.0 + cel.x;
    let top = offset.1 + cel.y;
    let right = left + i64::from(cel.image.width());
    let bottom = top + i64::from(cel.image.height());

    let x0 = left.max(0);
    let y0 = top.max(0);
    let x1 = right.min(i64::from(width));
    let y1 = bottom.min(i64::from(height));

    if x0 >= x1 || y0 >= y1 {
        cel.image = RgbaImage::new(0, 0);
        return;
    }
    if (x0, y0, x1, y1) == (left, top, right, bottom) {
        return;
    }

    cel.image = imageops::crop_imm(
        &cel.image,
        (x0 - left) as u32,
        (y0 - top) as u32,
        (x1 - x0) as u32,
        (y1 - y0) as u32,
    )
    .to_image();
    cel.x += x0 - left;
    cel.y += y0 - top;
}

impl Document for RasterDocument {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn time_range(&self) -> TimeRange {
        self.time_range
    }

    fn top_level_layers(&self) -> Vec<&dyn LayerNode> {
        self.layers.iter().map(|l| l as &dyn LayerNode).collect()
    }

    fn resample(&mut self, width: u32, height: u32, filter: ResizeFilter) -> SheetResult<()> {
        if width == 0 || height == 0 {
            return Err(SheetError::host(format!(
                "cannot resample '{}' to {width}x{height}",
                self.name
            )));
        }
        let sx = f64::from(width) / f64::from(self.width);
        let sy = f64::from(height) / f64::from(self.height);
        let filter = filter.filter_type((self.width, self.height), (width, height));

        for layer in &mut self.layers {
            scale_layer(layer, sx, sy, filter);
        }
        self.origin = (scale_coord(self.origin.0, sx), scale_coord(self.origin.1, sy));
        self.width = width;
        self.height = height;
        self.touch();
        Ok(())
    }

    fn crop_to_visible_bounds(&mut self) -> SheetResult<()> {
        let base = (-self.origin.0, -self.origin.1);
        for layer in &mut self.layers {
            crop_layer(layer, base, self.width, self.height);
        }
        self.touch();
        Ok(())
    }

    fn resize_canvas(
        &mut self,
        x_offset: i64,
        y_offset: i64,
        width: u32,
        height: u32,
    ) -> SheetResult<()> {
        if width == 0 || height == 0 {
            return Err(SheetError::host(format!(
                "cannot resize canvas of '{}' to {width}x{height}",
                self.name
            )));
        }
        self.origin = (self.origin.0 + x_offset, self.origin.1 + y_offset);
        self.width = width;
        self.height = height;
        self.touch();
        Ok(())
    }

    fn set_current_time(&mut self, time: FrameTime) -> SheetResult<()> {
        if time != self.current_time {
            self.current_time = time;
            self.projection = None;
        }
        Ok(())
    }

    fn wait_for_done(&mut self) -> SheetResult<()> {
        if self.projection.is_none() {
            self.projection = Some(self.render_at(self.current_time));
        }
        Ok(())
    }

    fn pixel_data(&self, x: u32, y: u32, width: u32, height: u32) -> SheetResult<Vec<u8>> {
        let projection = self.projection.as_ref().ok_or_else(|| {
            SheetError::host(format!(
                "projection of '{}' is not settled; wait_for_done must precede pixel reads",
                self.name
            ))
        })?;
        let fits = |o: u32, len: u32, max: u32| o.checked_add(len).is_some_and(|end| end <= max);
        if !fits(x, width, self.width) || !fits(y, height, self.height) {
            return Err(SheetError::host(format!(
                "pixel rect {width}x{height}+{x}+{y} exceeds canvas {}x{}",
                self.width, self.height
            )));
        }
        if (x, y, width, height) == (0, 0, self.width, self.height) {
            return Ok(projection.as_raw().clone());
        }
        Ok(imageops::crop_imm(projection, x, y, width, height)
            .to_image()
            .into_raw())
    }

    fn add_layer(
        &mut self,
        name: &str,
        pixels: Vec<u8>,
        width: u32,
        height: u32,
    ) -> SheetResult<usize> {
        let len = pixels.len();
        let image = RgbaImage::from_raw(width, height, pixels).ok_or_else(|| {
            SheetError::host(format!(
                "layer '{name}': {len} bytes do not hold {width}x{height} RGBA8 pixels"
            ))
        })?;
        let cel = Cel::at(image, self.origin.0, self.origin.1);
        self.push_layer(RasterLayer::paint(name, [(self.current_time, cel)]));
        Ok(self.layers.len() - 1)
    }

    fn move_layer(&mut self, index: usize, x: i64, y: i64) -> SheetResult<()> {
        let layer = self.layers.get_mut(index).ok_or_else(|| {
            SheetError::host(format!("no layer at index {index} in '{}'", self.name))
        })?;
        layer.offset = (x, y);
        self.touch();
        Ok(())
    }

    fn layer_count(&self) -> usize {
        self.layers.len()
    }
}

/// Host backed by [`RasterDocument`]s and the `image` crate encoders.
///
/// Tracks which documents it created are still open.
#[derive(Debug, Default)]
pub struct RasterHost {
    next_id: u64,
    open: BTreeSet<u64>,
}

impl RasterHost {
    /// Host with no open documents.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of host-created documents not yet closed.
    pub fn open_documents(&self) -> usize {
        self.open.len()
    }

    fn register(&mut self, doc: &mut RasterDocument) {
        self.next_id += 1;
        doc.id = self.next_id;
        self.open.insert(doc.id);
    }
}

impl Host for RasterHost {
    type Doc = RasterDocument;

    fn clone_document(&mut self, source: &RasterDocument) -> SheetResult<RasterDocument> {
        let mut doc = source.clone();
        doc.modified = false;
        self.register(&mut doc);
        tracing::debug!(id = doc.id, name = %doc.name, "cloned document");
        Ok(doc)
    }

    fn create_document(&mut self, name: &str, width: u32, height: u32) -> SheetResult<RasterDocument> {
        let mut doc = RasterDocument::new(name, width, height, TimeRange {
            start: FrameTime(0),
            end: FrameTime(0),
        })?;
        self.register(&mut doc);
        tracing::debug!(id = doc.id, width, height, "created document");
        Ok(doc)
    }

    fn export_document(
        &mut self,
        doc: &mut RasterDocument,
        path: &Path,
        format: OutputFormat,
    ) -> SheetResult<()> {
        let image = doc.flatten()?;
        let (width, height) = image.dimensions();
        let mut data = image.into_raw();
        unpremultiply_in_place(&mut data);

        ensure_parent_dir(path)?;
        image::save_buffer_with_format(
            path,
            &data,
            width,
            height,
            image::ColorType::Rgba8,
            format.image_format(),
        )
        .map_err(|e| SheetError::host(format!("write image '{}': {e}", path.display())))
    }

    fn close_document(&mut self, mut doc: RasterDocument) {
        doc.set_modified(false);
        self.open.remove(&doc.id);
        tracing::debug!(id = doc.id, name = %doc.name, "closed document");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/raster.rs"]
mod tests;
