use crate::foundation::error::{SheetError, SheetResult};

/// Longest time range, in frames, that frame selection will walk.
pub const MAX_TIMELINE_FRAMES: u64 = 1_000_000;

/// Integer animation time index, as stored in a document's timeline.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct FrameTime(pub i64);

impl std::fmt::Display for FrameTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inclusive animation time range `[start, end]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TimeRange {
    /// First time in the range.
    pub start: FrameTime,
    /// Last time in the range (inclusive).
    pub end: FrameTime,
}

impl TimeRange {
    /// Build a range, rejecting `end < start`.
    pub fn new(start: FrameTime, end: FrameTime) -> SheetResult<Self> {
        if end.0 < start.0 {
            return Err(SheetError::invalid_config(format!(
                "time range end ({end}) must be >= start ({start})"
            )));
        }
        Ok(Self { start, end })
    }

    /// Number of frames covered, `end - start + 1`, saturating at `u64::MAX`.
    pub fn len_frames(self) -> u64 {
        if self.end.0 < self.start.0 {
            return 0;
        }
        self.end.0.abs_diff(self.start.0).saturating_add(1)
    }

    /// Frame count, rejecting ranges longer than [`MAX_TIMELINE_FRAMES`].
    pub fn bounded_len_frames(self) -> SheetResult<u32> {
        let len = self.len_frames();
        if len > MAX_TIMELINE_FRAMES {
            return Err(SheetError::invalid_config(format!(
                "time range [{}, {}] spans {len} frames, more than {MAX_TIMELINE_FRAMES}",
                self.start, self.end
            )));
        }
        u32::try_from(len)
            .map_err(|_| SheetError::invalid_config(format!("time range spans {len} frames")))
    }

    /// Every time in the range, ascending.
    pub fn iter(self) -> impl Iterator<Item = FrameTime> {
        (self.start.0..=self.end.0).map(FrameTime)
    }
}

/// Pixel dimensions of a document or composite canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Top-left pixel position of a sprite inside the composite canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PixelOffset {
    /// Horizontal offset from the left edge.
    pub x: u32,
    /// Vertical offset from the top edge.
    pub y: u32,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
