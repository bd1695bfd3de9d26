use std::{
    fs::File,
    io::BufReader,
    path::Path,
};

use anyhow::Context as _;

use crate::{
    foundation::{
        core::{Canvas, FrameTime, MAX_TIMELINE_FRAMES, TimeRange},
        error::{SheetError, SheetResult},
    },
    host::{
        Document,
        composite::premultiply_in_place,
        raster::{Cel, RasterDocument, RasterLayer},
    },
};

/// JSON description of an animated document whose keyframes are image files.
///
/// ```json
/// {
///   "name": "walk",
///   "canvas": { "width": 64, "height": 64 },
///   "time_range": { "start": 0, "end": 11 },
///   "layers": [
///     { "name": "body", "kind": { "paint": { "keyframes": [
///       { "time": 0, "source": "frames/body_0.png" },
///       { "time": 6, "source": "frames/body_6.png", "x": 2, "y": 0 }
///     ] } } }
///   ]
/// }
/// ```
///
/// Layers are listed bottom to top; `source` paths are relative to the manifest file.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentManifest {
    /// Document name; defaults to the manifest file stem.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Canvas size.
    pub canvas: Canvas,
    /// Full animation clip range.
    pub time_range: TimeRange,
    /// Layer stack, bottom to top.
    pub layers: Vec<LayerManifest>,
}

/// One layer of a [`DocumentManifest`].
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerManifest {
    /// Layer name.
    pub name: String,
    /// Hidden layers are excluded from rendering and keyframe detection.
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Opacity in `[0, 1]`.
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    /// Layer translation in pixels.
    #[serde(default)]
    pub offset: [i64; 2],
    /// Paint or group payload.
    pub kind: LayerKindManifest,
}

/// Layer payload of a [`LayerManifest`].
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKindManifest {
    /// Keyframed raster content.
    Paint {
        /// Keyframes; times must be unique within the layer.
        keyframes: Vec<KeyframeManifest>,
    },
    /// Nested layers, bottom to top.
    Group {
        /// Child layers.
        children: Vec<LayerManifest>,
    },
}

/// One keyframe: an image file placed at `(x, y)` from `time` on.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyframeManifest {
    /// Keyframe time.
    pub time: FrameTime,
    /// Image path relative to the manifest.
    pub source: String,
    /// Left edge in layer coordinates.
    #[serde(default)]
    pub x: i64,
    /// Top edge in layer coordinates.
    #[serde(default)]
    pub y: i64,
}

fn default_visible() -> bool {
    true
}

fn default_opacity() -> f32 {
    1.0
}

impl DocumentManifest {
    /// Parse a manifest from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> SheetResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| SheetError::serde(format!("parse document manifest JSON: {e}")))
    }

    /// Parse a manifest from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> SheetResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open document manifest '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check structure that serde cannot express.
    pub fn validate(&self) -> SheetResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(SheetError::serde(format!(
                "manifest canvas must be non-empty (got {}x{})",
                self.canvas.width, self.canvas.height
            )));
        }
        if self.time_range.end < self.time_range.start {
            return Err(SheetError::serde(format!(
                "manifest time_range end ({}) must be >= start ({})",
                self.time_range.end, self.time_range.start
            )));
        }
        if self.time_range.len_frames() > MAX_TIMELINE_FRAMES {
            return Err(SheetError::serde(format!(
                "manifest time_range [{}, {}] is longer than {MAX_TIMELINE_FRAMES} frames",
                self.time_range.start, self.time_range.end
            )));
        }
        for layer in &self.layers {
            validate_layer(layer)?;
        }
        Ok(())
    }

    /// Decode every referenced image and build the document.
    pub fn into_document(self, assets_root: &Path, fallback_name: &str) -> SheetResult<RasterDocument> {
        self.validate()?;
        let name = self.name.unwrap_or_else(|| fallback_name.to_string());
        let mut doc = RasterDocument::new(
            name,
            self.canvas.width,
            self.canvas.height,
            self.time_range,
        )?;
        for layer in self.layers {
            doc.push_layer(build_layer(layer, assets_root)?);
        }
        doc.set_modified(false);
        Ok(doc)
    }
}

/// Load the manifest at `path` and the images it references.
pub fn load_document(path: impl AsRef<Path>) -> SheetResult<RasterDocument> {
    let path = path.as_ref();
    let manifest = DocumentManifest::from_path(path)?;
    let root = path.parent().unwrap_or_else(|| Path::new("."));
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    let doc = manifest.into_document(root, stem)?;
    tracing::info!(
        path = %path.display(),
        width = doc.width(),
        height = doc.height(),
        layers = doc.layers().len(),
        "loaded document manifest"
    );
    Ok(doc)
}

fn validate_layer(layer: &LayerManifest) -> SheetResult<()> {
    if !(0.0..=1.0).contains(&layer.opacity) {
        return Err(SheetError::serde(format!(
            "layer '{}': opacity {} outside [0, 1]",
            layer.name, layer.opacity
        )));
    }
    match &layer.kind {
        LayerKindManifest::Paint { keyframes } => {
            let mut times: Vec<FrameTime> = keyframes.iter().map(|k| k.time).collect();
            times.sort_unstable();
            if let Some(w) = times.windows(2).find(|w| w[0] == w[1]) {
                return Err(SheetError::serde(format!(
                    "layer '{}': duplicate keyframe at time {}",
                    layer.name, w[0]
                )));
            }
            for k in keyframes {
                normalize_rel_path(&k.source)?;
            }
            Ok(())
        }
        LayerKindManifest::Group { children } => children.iter().try_for_each(validate_layer),
    }
}

fn build_layer(layer: LayerManifest, root: &Path) -> SheetResult<RasterLayer> {
    let built = match layer.kind {
        LayerKindManifest::Paint { keyframes } => {
            let mut cels = Vec::with_capacity(keyframes.len());
            for k in keyframes {
                let image = read_premultiplied(&root.join(normalize_rel_path(&k.source)?))?;
                cels.push((k.time, Cel::at(image, k.x, k.y)));
            }
            RasterLayer::paint(layer.name, cels)
        }
        LayerKindManifest::Group { children } => {
            let children = children
                .into_iter()
                .map(|c| build_layer(c, root))
                .collect::<SheetResult<Vec<_>>>()?;
            RasterLayer::group(layer.name, children)
        }
    };
    let built = built
        .with_opacity(layer.opacity)
        .with_offset(layer.offset[0], layer.offset[1]);
    Ok(if layer.visible { built } else { built.hidden() })
}

fn read_premultiplied(path: &Path) -> SheetResult<image::RgbaImage> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read keyframe image '{}'", path.display()))?;
    let mut rgba = image::load_from_memory(&bytes)
        .map_err(|e| SheetError::host(format!("decode keyframe image '{}': {e}", path.display())))?
        .to_rgba8();
    premultiply_in_place(&mut rgba);
    Ok(rgba)
}

/// Normalize a manifest-relative path to forward slashes with `.` segments removed.
///
/// Absolute paths, Windows drive prefixes (`C:/`, `c:frames`) and `..` segments are
/// rejected so keyframes always resolve inside the manifest's directory.
pub fn normalize_rel_path(source: &str) -> SheetResult<String> {
    let unified = source.replace('\\', "/");
    let has_drive =
        matches!(unified.as_bytes(), [letter, b':', ..] if letter.is_ascii_alphabetic());
    if unified.starts_with('/') || has_drive {
        return Err(SheetError::serde(format!(
            "keyframe path '{source}' must be relative to the manifest"
        )));
    }

    let parts: Vec<&str> = unified
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect();
    if parts.contains(&"..") {
        return Err(SheetError::serde(format!(
            "keyframe path '{source}' must not leave the manifest directory"
        )));
    }
    if parts.is_empty() {
        return Err(SheetError::serde(format!("keyframe path '{source}' names no file")));
    }
    Ok(parts.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/host/manifest.rs"]
mod tests;
