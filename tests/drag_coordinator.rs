//! Drag coordination behaviour over both surfaces and both stores.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tutor_chat::ChatError;
use tutor_chat::config::TutorConfig;
use tutor_chat::drag::{
    DragAnchorCoordinator, DragOutcome, FsPositionStore, MemoryPositionStore, PanelOffsetMode,
    PointerButton, Position, PositionStore, Size, Surface,
};

const VIEWPORT: Size = Size::new(1280, 800);
const KEY: &str = "anchor-position";

fn coordinator() -> (DragAnchorCoordinator<MemoryPositionStore>, MemoryPositionStore) {
    let store = MemoryPositionStore::new();
    let drag = DragAnchorCoordinator::new(store.clone(), &TutorConfig::default(), VIEWPORT);
    (drag, store)
}

fn stored(store: &impl PositionStore) -> Option<Position> {
    store.load(KEY).ok().flatten()
}

/// Press on the anchor at its origin and move by `(dx, dy)`.
fn drag_anchor_by(
    drag: &mut DragAnchorCoordinator<MemoryPositionStore>,
    dx: i32,
    dy: i32,
) -> DragOutcome {
    let origin = drag.anchor_position();
    assert!(drag.begin_drag(Surface::Anchor, PointerButton::Primary, origin, origin));
    drag.on_pointer_move(origin + Position::new(dx, dy));
    drag.end_drag()
}

// ────────────────────────────────────────────────────────────────────────────
// Clamping
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn anchor_clamps_at_every_edge() {
    let (mut drag, _) = coordinator();
    let origin = drag.anchor_position();
    drag.begin_drag(Surface::Anchor, PointerButton::Primary, origin, origin);

    assert_eq!(drag.on_pointer_move(Position::new(-100, 300)), Some(Position::new(0, 300)));
    assert_eq!(drag.on_pointer_move(Position::new(300, -100)), Some(Position::new(300, 0)));
    assert_eq!(drag.on_pointer_move(Position::new(5000, 300)), Some(Position::new(1200, 300)));
    assert_eq!(drag.on_pointer_move(Position::new(300, 5000)), Some(Position::new(300, 720)));
    assert_eq!(drag.on_pointer_move(Position::new(-1, -1)), Some(Position::new(0, 0)));
}

#[test]
fn grab_offset_keeps_pointer_fixed_on_surface() {
    let (mut drag, store) = coordinator();
    drag.begin_drag(Surface::Anchor, PointerButton::Primary, Position::new(500, 500), Position::new(480, 480));
    assert_eq!(drag.on_pointer_move(Position::new(520, 520)), Some(Position::new(500, 500)));
    assert_eq!(stored(&store), Some(Position::new(500, 500)));
}

#[test]
fn tiny_viewport_pins_anchor_to_origin() {
    let (mut drag, store) = coordinator();
    drag.set_viewport(Size::new(50, 50));
    assert_eq!(drag.anchor_position(), Position::new(0, 0));
    assert_eq!(stored(&store), Some(Position::new(0, 0)));
}

#[test]
fn pointer_at_integer_extremes_is_clamped_not_fatal() {
    let (mut drag, store) = coordinator();
    let origin = drag.anchor_position();
    drag.begin_drag(Surface::Anchor, PointerButton::Primary, origin, origin);
    assert_eq!(drag.on_pointer_move(Position::new(i32::MIN, i32::MIN)), Some(Position::new(0, 0)));
    assert_eq!(drag.on_pointer_move(Position::new(i32::MAX, i32::MAX)), Some(Position::new(1200, 720)));
    assert_eq!(
        drag.end_drag(),
        DragOutcome::Moved {
            surface: Surface::Anchor,
            anchor: Position::new(1200, 720)
        }
    );
    assert_eq!(stored(&store), Some(Position::new(1200, 720)));
}

// ────────────────────────────────────────────────────────────────────────────
// Click vs drag
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn travel_within_threshold_is_click_and_commits_nothing() {
    let clicks = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&clicks);
    let store = MemoryPositionStore::new();
    let mut drag = DragAnchorCoordinator::new(store.clone(), &TutorConfig::default(), VIEWPORT)
        .with_click_handler(move |surface| {
            assert_eq!(surface, Surface::Anchor);
            counter.fetch_add(1, Ordering::SeqCst);
        });
    let origin = drag.anchor_position();

    drag.begin_drag(Surface::Anchor, PointerButton::Primary, origin, origin);
    drag.on_pointer_move(origin + Position::new(3, -4));
    assert_ne!(drag.anchor_position(), origin);
    assert_eq!(drag.end_drag(), DragOutcome::Click(Surface::Anchor));

    assert_eq!(drag.anchor_position(), origin);
    assert_eq!(stored(&store), Some(origin));
    assert_eq!(clicks.load(Ordering::SeqCst), 1);
}

#[test]
fn exactly_threshold_is_still_click() {
    let (mut drag, _) = coordinator();
    let origin = drag.anchor_position();
    assert_eq!(drag_anchor_by(&mut drag, -5, -5), DragOutcome::Click(Surface::Anchor));
    assert_eq!(drag.anchor_position(), origin);
}

#[test]
fn press_release_without_move_is_click_and_writes_nothing() {
    let (mut drag, store) = coordinator();
    let origin = drag.anchor_position();
    drag.begin_drag(Surface::Anchor, PointerButton::Primary, origin, origin);
    assert_eq!(drag.end_drag(), DragOutcome::Click(Surface::Anchor));
    assert!(store.is_empty());
}

#[test]
fn travel_past_threshold_on_one_axis_is_drag() {
    let (mut drag, store) = coordinator();
    let origin = drag.anchor_position();
    let outcome = drag_anchor_by(&mut drag, -6, 0);
    let expected = origin + Position::new(-6, 0);
    assert_eq!(
        outcome,
        DragOutcome::Moved {
            surface: Surface::Anchor,
            anchor: expected
        }
    );
    assert_eq!(drag.anchor_position(), expected);
    assert_eq!(stored(&store), Some(expected));
}

#[test]
fn wander_and_return_counts_as_click() {
    let (mut drag, _) = coordinator();
    let origin = drag.anchor_position();
    drag.begin_drag(Surface::Anchor, PointerButton::Primary, origin, origin);
    drag.on_pointer_move(origin + Position::new(-200, -200));
    drag.on_pointer_move(origin + Position::new(1, 1));
    assert_eq!(drag.end_drag(), DragOutcome::Click(Surface::Anchor));
    assert_eq!(drag.anchor_position(), origin);
}

#[test]
fn panel_click_reports_panel_surface() {
    let (mut drag, _) = coordinator();
    let panel = drag.panel_position();
    drag.begin_drag(Surface::Panel, PointerButton::Primary, panel + Position::new(10, 10), panel);
    assert_eq!(drag.end_drag(), DragOutcome::Click(Surface::Panel));
}

// ────────────────────────────────────────────────────────────────────────────
// Panel drag back-solves the anchor
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn panel_drag_moves_anchor_and_panel_follows() {
    let (mut drag, store) = coordinator();
    assert_eq!(drag.anchor_position(), Position::new(1176, 696));
    let panel = drag.panel_position();
    assert_eq!(panel, Position::new(766, 176));

    let grab = panel + Position::new(40, 20);
    drag.begin_drag(Surface::Panel, PointerButton::Primary, grab, panel);
    drag.on_pointer_move(Position::new(140, 120));
    let outcome = drag.end_drag();

    // panel wants (100, 100); anchor = panel - (-410, -520)
    assert_eq!(drag.panel_position(), Position::new(100, 100));
    assert_eq!(drag.anchor_position(), Position::new(510, 620));
    assert_eq!(
        outcome,
        DragOutcome::Moved {
            surface: Surface::Panel,
            anchor: Position::new(510, 620)
        }
    );
    assert_eq!(stored(&store), Some(Position::new(510, 620)));
}

#[test]
fn panel_drag_clamps_panel_then_anchor() {
    let (mut drag, _) = coordinator();
    let panel = drag.panel_position();
    drag.begin_drag(Surface::Panel, PointerButton::Primary, panel, panel);

    // Far right: panel clamps to x=880, anchor would be 1290 and clamps to 1200.
    drag.on_pointer_move(Position::new(4000, 150));
    assert_eq!(drag.anchor_position(), Position::new(1200, 670));
    assert_eq!(drag.panel_position(), Position::new(790, 150));

    // Far up: panel clamps to y=0, anchor y=520 is in bounds.
    drag.on_pointer_move(Position::new(150, -400));
    assert_eq!(drag.anchor_position(), Position::new(560, 520));
    assert_eq!(drag.panel_position(), Position::new(150, 0));
}

#[test]
fn minimized_panel_uses_its_own_offset() {
    let (mut drag, _) = coordinator();
    assert_eq!(drag.toggle_minimized(), PanelOffsetMode::Minimized);
    let panel = drag.panel_position();
    assert_eq!(panel, Position::new(1176 - 310, 696 + 10));

    drag.begin_drag(Surface::Panel, PointerButton::Primary, panel, panel);
    drag.on_pointer_move(Position::new(100, 100));
    drag.end_drag();

    assert_eq!(drag.anchor_position(), Position::new(410, 90));
    assert_eq!(drag.panel_position(), Position::new(100, 100));

    drag.set_offset_mode(PanelOffsetMode::Expanded);
    assert_eq!(drag.panel_position(), Position::new(0, -430));
}

// ────────────────────────────────────────────────────────────────────────────
// Persistence
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn fs_store_restores_anchor_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    let config = TutorConfig::default();

    let mut first = DragAnchorCoordinator::new(FsPositionStore::new(dir.path()).unwrap(), &config, VIEWPORT);
    let origin = first.anchor_position();
    first.begin_drag(Surface::Anchor, PointerButton::Primary, origin, origin);
    first.on_pointer_move(Position::new(321, 123));
    assert!(matches!(first.end_drag(), DragOutcome::Moved { .. }));
    drop(first);

    let second = DragAnchorCoordinator::new(FsPositionStore::new(dir.path()).unwrap(), &config, VIEWPORT);
    assert_eq!(second.anchor_position(), Position::new(321, 123));
}

#[test]
fn restored_anchor_is_clamped_to_smaller_viewport() {
    let store = MemoryPositionStore::new();
    store.save(KEY, Position::new(1100, 700)).unwrap();
    let drag = DragAnchorCoordinator::new(store, &TutorConfig::default(), Size::new(800, 600));
    assert_eq!(drag.anchor_position(), Position::new(720, 520));
}

#[test]
fn corrupt_position_file_falls_back_to_default() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("anchor-position.json"), "{not json").unwrap();
    let drag = DragAnchorCoordinator::new(
        FsPositionStore::new(dir.path()).unwrap(),
        &TutorConfig::default(),
        VIEWPORT,
    );
    assert_eq!(drag.anchor_position(), Position::new(1176, 696));
}

struct BrokenStore;

impl PositionStore for BrokenStore {
    fn load(&self, _key: &str) -> Result<Option<Position>, ChatError> {
        Err(ChatError::StoreError("disk unavailable".into()))
    }

    fn save(&self, _key: &str, _position: Position) -> Result<(), ChatError> {
        Err(ChatError::StoreError("disk unavailable".into()))
    }
}

#[test]
fn failing_store_does_not_interrupt_drag() {
    let mut drag = DragAnchorCoordinator::new(BrokenStore, &TutorConfig::default(), VIEWPORT);
    let origin = drag.anchor_position();
    drag.begin_drag(Surface::Anchor, PointerButton::Primary, origin, origin);
    assert_eq!(drag.on_pointer_move(Position::new(200, 200)), Some(Position::new(200, 200)));
    assert!(matches!(drag.end_drag(), DragOutcome::Moved { .. }));
    assert_eq!(drag.anchor_position(), Position::new(200, 200));
}

#[test]
fn shared_store_through_arc() {
    let store = Arc::new(MemoryPositionStore::new());
    let mut drag = DragAnchorCoordinator::new(Arc::clone(&store), &TutorConfig::default(), VIEWPORT);
    let origin = drag.anchor_position();
    drag.begin_drag(Surface::Anchor, PointerButton::Primary, origin, origin);
    drag.on_pointer_move(Position::new(40, 40));
    drag.end_drag();
    assert_eq!(stored(&*store), Some(Position::new(40, 40)));
}
