use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::{
    config::{
        filter::ResizeFilter,
        output::{OutputFormat, normalize_output_path},
    },
    foundation::error::{SheetError, SheetResult},
    host::Document,
    sheet::grid::{LayoutMode, SpriteGeometry},
};

/// Largest sprite width or height accepted.
pub const MAX_SPRITE_DIMENSION: u32 = 9999;

/// Default file name used when only a directory is known.
pub const DEFAULT_OUTPUT_FILE_NAME: &str = "Spritesheet.png";

/// Fully resolved settings for one export run.
///
/// Parsed from JSON with every field but `output_path`, `sprite_width` and
/// `sprite_height` optional:
///
/// ```json
/// { "output_path": "out/walk.png", "layout": "rows", "sprite_width": 64, "sprite_height": 64 }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "ExportConfigFile")]
pub struct ExportConfig {
    /// Destination image file; an extension is appended when missing.
    pub output_path: PathBuf,
    /// Sprite arrangement.
    pub layout: LayoutMode,
    /// Only export times where a visible layer carries a keyframe.
    pub ignore_empty_frames: bool,
    /// Target sprite width before padding.
    pub sprite_width: u32,
    /// Target sprite height before padding.
    pub sprite_height: u32,
    /// Transparent border added around each sprite.
    pub padding: u32,
    /// Filter used when the document size differs from the target size.
    pub filter: ResizeFilter,
    /// Image format used when `output_path` has no recognized extension.
    pub format: OutputFormat,
}

/// On-disk shape of [`ExportConfig`]; named options stay strings until conversion.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct ExportConfigFile {
    output_path: PathBuf,
    #[serde(default)]
    layout: Option<String>,
    #[serde(default = "default_ignore_empty_frames")]
    ignore_empty_frames: bool,
    sprite_width: u32,
    sprite_height: u32,
    #[serde(default)]
    padding: u32,
    #[serde(default)]
    filter: Option<String>,
    #[serde(default)]
    format: Option<String>,
}

fn default_ignore_empty_frames() -> bool {
    true
}

fn parse_or_default<T>(value: Option<String>) -> SheetResult<T>
where
    T: FromStr<Err = SheetError> + Default,
{
    value.map_or_else(|| Ok(T::default()), |s| s.parse())
}

impl TryFrom<ExportConfigFile> for ExportConfig {
    type Error = SheetError;

    fn try_from(file: ExportConfigFile) -> Result<Self, Self::Error> {
        Ok(Self {
            output_path: file.output_path,
            layout: parse_or_default(file.layout)?,
            ignore_empty_frames: file.ignore_empty_frames,
            sprite_width: file.sprite_width,
            sprite_height: file.sprite_height,
            padding: file.padding,
            filter: parse_or_default(file.filter)?,
            format: parse_or_default(file.format)?,
        })
    }
}

impl ExportConfig {
    /// Defaults for `doc`: sprites keep the document size, rows layout, empty frames skipped.
    pub fn for_document<D: Document + ?Sized>(doc: &D, output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            layout: LayoutMode::default(),
            ignore_empty_frames: default_ignore_empty_frames(),
            sprite_width: doc.width(),
            sprite_height: doc.height(),
            padding: 0,
            filter: ResizeFilter::default(),
            format: OutputFormat::default(),
        }
    }

    /// Parse a config from a JSON reader.
    ///
    /// Malformed JSON is a serde error; an unknown layout, filter or format name is an
    /// invalid configuration.
    pub fn from_reader<R: std::io::Read>(r: R) -> SheetResult<Self> {
        let file: ExportConfigFile = serde_json::from_reader(r)
            .map_err(|e| SheetError::serde(format!("parse export config JSON: {e}")))?;
        Self::try_from(file)
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> SheetResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SheetError::invalid_config(format!("open export config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check everything that can be checked before touching a document.
    pub fn validate(&self) -> SheetResult<()> {
        if self.output_path.as_os_str().is_empty() {
            return Err(SheetError::invalid_config("output path must be non-empty"));
        }
        for (name, v) in [("width", self.sprite_width), ("height", self.sprite_height)] {
            if v > MAX_SPRITE_DIMENSION {
                return Err(SheetError::invalid_config(format!(
                    "sprite {name} {v} exceeds maximum of {MAX_SPRITE_DIMENSION}"
                )));
            }
        }
        if self.padding > MAX_SPRITE_DIMENSION {
            return Err(SheetError::invalid_config(format!(
                "padding {} exceeds maximum of {MAX_SPRITE_DIMENSION}",
                self.padding
            )));
        }
        self.geometry().map(|_| ())
    }

    /// Sprite cell geometry described by this config.
    pub fn geometry(&self) -> SheetResult<SpriteGeometry> {
        SpriteGeometry::new(self.sprite_width, self.sprite_height, self.padding)
    }

    /// Output path with the canonical extension appended if needed.
    pub fn resolved_output_path(&self) -> PathBuf {
        normalize_output_path(&self.output_path, self.format)
    }

    /// Format actually written for [`Self::resolved_output_path`].
    pub fn resolved_format(&self) -> OutputFormat {
        OutputFormat::from_path(&self.output_path).unwrap_or(self.format)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/export.rs"]
mod tests;
