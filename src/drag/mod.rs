//! Draggable anchor icon and chat panel.
//!
//! - [`geometry`] — Positions, sizes, viewport clamping
//! - [`placement`] — Panel layouts and derived placement
//! - [`store`] — Durable position storage
//! - [`coordinator`] — Pointer routing, click/drag disambiguation

pub mod coordinator;
pub mod geometry;
pub mod placement;
pub mod store;

pub use coordinator::{CLICK_THRESHOLD_PX, DragAnchorCoordinator, DragOutcome, PointerButton, Surface};
pub use geometry::{Position, Size};
pub use placement::{PanelConfig, PanelLayout, PanelOffsetMode};
pub use store::{FsPositionStore, MemoryPositionStore, PositionStore};
