//! Editor session configuration.

use tle_core::geometry::{DUPLICATE_OFFSET, GRID_SIZE};
use tle_core::guides::ALIGN_THRESHOLD;

/// Tunables for one `CanvasController`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorConfig {
    /// Grid pitch in pixels. Default: **10**.
    pub grid_size: f64,

    /// Snap drag positions and resize dimensions to the grid. Default: **true**.
    pub snap_enabled: bool,

    /// Edge distance (exclusive) that produces an alignment guide. Default: **5**.
    pub align_threshold: f64,

    /// Offset of a duplicate from its source on both axes. Default: **10**.
    pub duplicate_offset: f64,

    /// Pointer distance within which a resize handle is grabbed. Default: **6**.
    pub handle_radius: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            snap_enabled: true,
            align_threshold: ALIGN_THRESHOLD,
            duplicate_offset: DUPLICATE_OFFSET,
            handle_radius: 6.0,
        }
    }
}
