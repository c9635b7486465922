//! Panel placement derived from the anchor.
//!
//! The chat panel never stores its own position. It is always
//! `anchor + offset`, where the offset depends on whether the panel is
//! expanded or minimized.

use serde::{Deserialize, Serialize};

use super::geometry::{Position, Size};

/// Which panel layout is in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelOffsetMode {
    /// Full chat panel.
    #[default]
    Expanded,
    /// Header-only panel.
    Minimized,
}

impl PanelOffsetMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            Self::Expanded => Self::Minimized,
            Self::Minimized => Self::Expanded,
        }
    }
}

/// Size of the panel and its offset from the anchor in one mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelLayout {
    /// Panel width in pixels.
    pub width: i32,
    /// Panel height in pixels.
    pub height: i32,
    /// Horizontal offset from the anchor origin.
    pub offset_x: i32,
    /// Vertical offset from the anchor origin.
    pub offset_y: i32,
}

impl PanelLayout {
    /// Panel size.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Offset from the anchor origin.
    pub fn offset(&self) -> Position {
        Position::new(self.offset_x, self.offset_y)
    }
}

/// Layouts for both panel modes (`[panel]` config section).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Layout while expanded.
    #[serde(default = "default_expanded")]
    pub expanded: PanelLayout,
    /// Layout while minimized.
    #[serde(default = "default_minimized")]
    pub minimized: PanelLayout,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            expanded: default_expanded(),
            minimized: default_minimized(),
        }
    }
}

impl PanelConfig {
    /// Layout for `mode`.
    pub fn layout(&self, mode: PanelOffsetMode) -> &PanelLayout {
        match mode {
            PanelOffsetMode::Expanded => &self.expanded,
            PanelOffsetMode::Minimized => &self.minimized,
        }
    }
}

// Expanded panel sits left of the anchor with its bottom edge level with
// the anchor's bottom edge.
fn default_expanded() -> PanelLayout {
    PanelLayout {
        width: 400,
        height: 600,
        offset_x: -410,
        offset_y: -520,
    }
}

fn default_minimized() -> PanelLayout {
    PanelLayout {
        width: 300,
        height: 60,
        offset_x: -310,
        offset_y: 10,
    }
}

/// Panel origin for a given anchor position and layout.
pub fn panel_position(anchor: Position, layout: &PanelLayout) -> Position {
    anchor + layout.offset()
}

/// Anchor position that places the panel origin at `panel`.
pub fn anchor_for_panel(panel: Position, layout: &PanelLayout) -> Position {
    panel - layout.offset()
}
