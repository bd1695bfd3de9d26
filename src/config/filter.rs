use std::str::FromStr;

use image::imageops::FilterType;

use crate::foundation::error::SheetError;

/// Resampling filter used when sprites are resized to the target size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum ResizeFilter {
    /// Nearest-neighbour when enlarging on both axes, Lanczos3 otherwise.
    #[default]
    Auto,
    /// Nearest-neighbour; keeps pixel art crisp.
    Box,
    /// Linear interpolation.
    Bilinear,
    /// Catmull-Rom cubic.
    Bicubic,
    /// Gaussian blur kernel.
    Gaussian,
    /// Lanczos with a window of 3.
    Lanczos3,
}

impl ResizeFilter {
    /// Resolve to a concrete `image` filter for a `src -> dst` resample.
    pub fn filter_type(self, src: (u32, u32), dst: (u32, u32)) -> FilterType {
        match self {
            ResizeFilter::Auto => {
                if dst.0 >= src.0 && dst.1 >= src.1 {
                    FilterType::Nearest
                } else {
                    FilterType::Lanczos3
                }
            }
            ResizeFilter::Box => FilterType::Nearest,
            ResizeFilter::Bilinear => FilterType::Triangle,
            ResizeFilter::Bicubic => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl std::fmt::Display for ResizeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ResizeFilter::Auto => "Auto",
            ResizeFilter::Box => "Box",
            ResizeFilter::Bilinear => "Bilinear",
            ResizeFilter::Bicubic => "Bicubic",
            ResizeFilter::Gaussian => "Gaussian",
            ResizeFilter::Lanczos3 => "Lanczos3",
        };
        f.write_str(s)
    }
}

impl FromStr for ResizeFilter {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(ResizeFilter::Auto),
            "box" | "nearest" => Ok(ResizeFilter::Box),
            "bilinear" | "triangle" => Ok(ResizeFilter::Bilinear),
            "bicubic" | "catmullrom" | "catmull-rom" => Ok(ResizeFilter::Bicubic),
            "gaussian" => Ok(ResizeFilter::Gaussian),
            "lanczos3" | "lanczos" => Ok(ResizeFilter::Lanczos3),
            _ => Err(SheetError::invalid_config(format!(
                "unrecognized resize filter '{s}'"
            ))),
        }
    }
}

impl TryFrom<String> for ResizeFilter {
    type Error = SheetError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/filter.rs"]
mod tests;
