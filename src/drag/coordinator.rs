//! Drag coordination for the anchor icon and the chat panel.
//!
//! Two surfaces can be dragged, but only the anchor has a stored position.
//! Dragging the panel back-solves the anchor position that would put the
//! panel where the pointer wants it. Every anchor change is written through
//! to the [`PositionStore`].
//!
//! # Examples
//!
//! ```
//! use tutor_chat::config::TutorConfig;
//! use tutor_chat::drag::coordinator::{DragAnchorCoordinator, PointerButton, Surface};
//! use tutor_chat::drag::geometry::{Position, Size};
//! use tutor_chat::drag::store::MemoryPositionStore;
//!
//! let mut drag = DragAnchorCoordinator::new(
//!     MemoryPositionStore::new(),
//!     &TutorConfig::default(),
//!     Size::new(1280, 800),
//! );
//! drag.begin_drag(Surface::Anchor, PointerButton::Primary, Position::new(500, 500), Position::new(480, 480));
//! drag.on_pointer_move(Position::new(520, 520));
//! assert_eq!(drag.anchor_position(), Position::new(500, 500));
//! ```

use super::geometry::{Position, Size, clamp_to_viewport};
use super::placement::{PanelConfig, PanelOffsetMode, anchor_for_panel, panel_position};
use super::store::PositionStore;
use crate::config::TutorConfig;

/// Maximum pointer travel, per axis, for a press/release to count as a click.
pub const CLICK_THRESHOLD_PX: i32 = 5;

/// A draggable surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    /// The mascot icon; owner of the stored position.
    Anchor,
    /// The chat panel header; positioned relative to the anchor.
    Panel,
}

/// Mouse button that started an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Usually the left button. The only button that drags.
    Primary,
    /// Usually the middle button.
    Auxiliary,
    /// Usually the right button.
    Secondary,
}

/// Result of releasing the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// No drag was active.
    Idle,
    /// Travel stayed within the click threshold; no position was committed.
    Click(Surface),
    /// The anchor was moved to `anchor`.
    Moved {
        /// Surface that was dragged.
        surface: Surface,
        /// Committed anchor position.
        anchor: Position,
    },
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    surface: Surface,
    grab_offset: Position,
    start_pointer: Position,
    last_pointer: Position,
    origin_anchor: Position,
    persisted: bool,
}

type ClickHandler = Box<dyn FnMut(Surface) + Send>;

/// Tracks the anchor position and routes pointer events to it.
pub struct DragAnchorCoordinator<S> {
    store: S,
    storage_key: String,
    viewport: Size,
    anchor_size: Size,
    panel: PanelConfig,
    mode: PanelOffsetMode,
    anchor: Position,
    drag: Option<DragState>,
    on_click: Option<ClickHandler>,
}

impl<S> std::fmt::Debug for DragAnchorCoordinator<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragAnchorCoordinator")
            .field("viewport", &self.viewport)
            .field("anchor", &self.anchor)
            .field("mode", &self.mode)
            .field("dragging", &self.drag.map(|d| d.surface))
            .finish()
    }
}

impl<S: PositionStore> DragAnchorCoordinator<S> {
    /// Create a coordinator, seeding the anchor from `store`.
    ///
    /// Falls back to the bottom-right default when nothing is stored or the
    /// store cannot be read. The seeded position is clamped to `viewport`.
    pub fn new(store: S, config: &TutorConfig, viewport: Size) -> Self {
        let anchor_size = config.anchor.size();
        let storage_key = config.anchor.storage_key.clone();
        let default = default_anchor(viewport, anchor_size, config.anchor.margin);

        let seeded = match store.load(&storage_key) {
            Ok(Some(position)) => position,
            Ok(None) => default,
            Err(e) => {
                tracing::warn!(key = %storage_key, error = %e, "failed to load anchor position, using default");
                default
            }
        };

        Self {
            store,
            storage_key,
            viewport,
            anchor_size,
            panel: config.panel,
            mode: PanelOffsetMode::default(),
            anchor: clamp_to_viewport(seeded, viewport, anchor_size),
            drag: None,
            on_click: None,
        }
    }

    /// Register a callback fired when a press/release is a click.
    pub fn with_click_handler(mut self, handler: impl FnMut(Surface) + Send + 'static) -> Self {
        self.on_click = Some(Box::new(handler));
        self
    }

    /// Current anchor position.
    pub fn anchor_position(&self) -> Position {
        self.anchor
    }

    /// Current panel position, derived from the anchor.
    pub fn panel_position(&self) -> Position {
        panel_position(self.anchor, self.panel.layout(self.mode))
    }

    /// Current panel size.
    pub fn panel_size(&self) -> Size {
        self.panel.layout(self.mode).size()
    }

    /// Anchor size.
    pub fn anchor_size(&self) -> Size {
        self.anchor_size
    }

    /// Current viewport.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Current panel layout mode.
    pub fn offset_mode(&self) -> PanelOffsetMode {
        self.mode
    }

    /// Switch panel layout mode. The panel position follows automatically.
    pub fn set_offset_mode(&mut self, mode: PanelOffsetMode) {
        self.mode = mode;
    }

    /// Toggle between expanded and minimized, returning the new mode.
    pub fn toggle_minimized(&mut self) -> PanelOffsetMode {
        self.mode = self.mode.toggled();
        self.mode
    }

    /// Which surface is being dragged, if any.
    pub fn active_surface(&self) -> Option<Surface> {
        self.drag.map(|d| d.surface)
    }

    /// Whether a drag is active.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Start dragging `surface`.
    ///
    /// `current_origin` is the surface's on-screen origin. Returns `false`
    /// when the press is ignored (non-primary button, or a drag is already
    /// active).
    pub fn begin_drag(
        &mut self,
        surface: Surface,
        button: PointerButton,
        pointer: Position,
        current_origin: Position,
    ) -> bool {
        if button != PointerButton::Primary || self.drag.is_some() {
            return false;
        }
        self.drag = Some(DragState {
            surface,
            grab_offset: pointer - current_origin,
            start_pointer: pointer,
            last_pointer: pointer,
            origin_anchor: self.anchor,
            persisted: false,
        });
        tracing::debug!(?surface, x = pointer.x, y = pointer.y, "drag started");
        true
    }

    /// Move the active surface under the pointer.
    ///
    /// Returns the new anchor position, or `None` when no drag is active.
    pub fn on_pointer_move(&mut self, pointer: Position) -> Option<Position> {
        let mut drag = self.drag?;
        drag.last_pointer = pointer;
        let raw = pointer - drag.grab_offset;

        let anchor = match drag.surface {
            Surface::Anchor => clamp_to_viewport(raw, self.viewport, self.anchor_size),
            Surface::Panel => {
                let layout = self.panel.layout(self.mode);
                let panel = clamp_to_viewport(raw, self.viewport, layout.size());
                clamp_to_viewport(anchor_for_panel(panel, layout), self.viewport, self.anchor_size)
            }
        };

        if anchor != self.anchor {
            self.anchor = anchor;
            self.persist();
            drag.persisted = true;
        }
        self.drag = Some(drag);
        Some(anchor)
    }

    /// Release the pointer.
    ///
    /// Travel of at most [`CLICK_THRESHOLD_PX`] on both axes is a click:
    /// the anchor returns to where it was when the drag started and the
    /// click handler fires. Anything more commits the moved position.
    pub fn end_drag(&mut self) -> DragOutcome {
        let Some(drag) = self.drag.take() else {
            return DragOutcome::Idle;
        };

        let threshold = CLICK_THRESHOLD_PX.unsigned_abs();
        let dx = drag.last_pointer.x.abs_diff(drag.start_pointer.x);
        let dy = drag.last_pointer.y.abs_diff(drag.start_pointer.y);
        if dx <= threshold && dy <= threshold {
            if self.anchor != drag.origin_anchor {
                self.anchor = drag.origin_anchor;
            }
            if drag.persisted {
                self.persist();
            }
            tracing::debug!(surface = ?drag.surface, "pointer release treated as click");
            if let Some(handler) = self.on_click.as_mut() {
                handler(drag.surface);
            }
            return DragOutcome::Click(drag.surface);
        }

        tracing::debug!(surface = ?drag.surface, x = self.anchor.x, y = self.anchor.y, "drag committed");
        DragOutcome::Moved {
            surface: drag.surface,
            anchor: self.anchor,
        }
    }

    /// Resize the viewport, pulling the anchor back inside if needed.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
        let clamped = clamp_to_viewport(self.anchor, viewport, self.anchor_size);
        if clamped != self.anchor {
            self.anchor = clamped;
            self.persist();
        }
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.storage_key, self.anchor) {
            tracing::warn!(key = %self.storage_key, error = %e, "failed to persist anchor position");
        }
    }
}

/// Bottom-right corner inset by `margin`, clamped to the viewport.
fn default_anchor(viewport: Size, anchor: Size, margin: i32) -> Position {
    clamp_to_viewport(
        Position::new(
            viewport
                .width
                .saturating_sub(anchor.width)
                .saturating_sub(margin),
            viewport
                .height
                .saturating_sub(anchor.height)
                .saturating_sub(margin),
        ),
        viewport,
        anchor,
    )
}
