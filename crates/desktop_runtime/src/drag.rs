//! Pointer-drag state machine for moving and resizing windows.
//!
//! The controller holds at most one [`DragSession`]. It never touches window records
//! directly; every geometry change goes through the [`WindowSessionManager`].

use tracing::{debug, warn};

use crate::geometry::{resize_rect, snap_zone_for_pointer, SnapSide, SnapZone};
use crate::model::{DragKind, DragSession, PointerPosition, WindowId, WindowPatch, WindowRect};
use crate::window_manager::WindowSessionManager;

/// What pointer-up committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// No session was active.
    Idle,
    /// The window disappeared, started closing, or changed mode mid-drag; nothing was
    /// committed.
    Cancelled,
    Moved(WindowId),
    Resized(WindowId),
    Maximized(WindowId),
    Snapped(WindowId, SnapSide),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragController {
    session: Option<DragSession>,
    preview: SnapZone,
}

impl DragController {
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Snap zone the window would commit to if released now.
    pub fn preview(&self) -> SnapZone {
        self.preview
    }

    /// Starts a move or resize session and raises the window.
    ///
    /// Ignored while another session is active, for unknown, closing, minimized or maximized
    /// windows, and for resizes of snapped windows.
    pub fn pointer_down(
        &mut self,
        manager: &mut WindowSessionManager,
        window_id: WindowId,
        kind: DragKind,
        pointer: PointerPosition,
    ) -> bool {
        if self.session.is_some() {
            return false;
        }
        let Some(window) = manager.state().window(window_id) else {
            return false;
        };
        if window.closing || window.minimized || window.minimizing || window.maximized {
            return false;
        }
        if matches!(kind, DragKind::Resize(_)) && window.snap.is_some() {
            return false;
        }

        let rect_start = window.rect;
        let unsnap_pending = window.snap.is_some();
        manager.focus_window(window_id);
        self.session = Some(DragSession {
            window_id,
            kind,
            pointer_start: pointer,
            rect_start,
            unsnap_pending,
        });
        self.preview = SnapZone::None;
        debug!(%window_id, ?kind, "drag started");
        true
    }

    /// Applies a pointer move to the active session.
    ///
    /// Returns the new preview zone when it changed. The session is cancelled when the window
    /// disappears, starts closing, or is maximized or snapped by something other than the drag.
    pub fn pointer_move(
        &mut self,
        manager: &mut WindowSessionManager,
        pointer: PointerPosition,
    ) -> Option<SnapZone> {
        let mut session = self.session?;
        let window_id = session.window_id;
        let Some(window) = manager.state().window(window_id) else {
            return self.cancel();
        };
        if window.closing || window.maximized {
            return self.cancel();
        }

        match session.kind {
            DragKind::Move => {
                if let Some(snapped) = window.snap.map(|_| window.rect) {
                    if !session.unsnap_pending {
                        return self.cancel();
                    }
                    let dx = pointer.x - session.pointer_start.x;
                    let dy = pointer.y - session.pointer_start.y;
                    let threshold = i64::from(manager.config().drag.unsnap_threshold_px);
                    let travel = i64::from(dx).pow(2) + i64::from(dy).pow(2);
                    if travel <= threshold.pow(2) {
                        return None;
                    }
                    if !manager.unsnap_window(window_id) {
                        return None;
                    }
                    let Some(restored) = manager.state().window(window_id).map(|w| w.rect) else {
                        return self.cancel();
                    };
                    session.rect_start = anchor_under_pointer(
                        snapped,
                        restored,
                        session.pointer_start,
                        pointer,
                    );
                    session.pointer_start = pointer;
                    session.unsnap_pending = false;
                    self.session = Some(session);
                    debug!(%window_id, "snapped window pulled free");
                }

                let Some(current) = manager.state().window(window_id).map(|w| w.rect) else {
                    return self.cancel();
                };
                let moved = WindowRect {
                    x: session.rect_start.x + pointer.x - session.pointer_start.x,
                    y: session.rect_start.y + pointer.y - session.pointer_start.y,
                    ..current
                };
                self.apply_rect(manager, window_id, moved);

                let zone = snap_zone_for_pointer(
                    pointer,
                    manager.viewport(),
                    manager.config().drag.edge_snap_threshold_px,
                );
                self.set_preview(zone)
            }
            DragKind::Resize(edge) => {
                if window.snap.is_some() {
                    return self.cancel();
                }
                let dx = pointer.x - session.pointer_start.x;
                let dy = pointer.y - session.pointer_start.y;
                let min = manager.config().window.min_size;
                let resized = resize_rect(session.rect_start, edge, dx, dy, min);
                self.apply_rect(manager, window_id, resized);
                None
            }
        }
    }

    /// Ends the session, committing the previewed snap if there is one.
    pub fn pointer_up(&mut self, manager: &mut WindowSessionManager) -> DragOutcome {
        let Some(session) = self.session.take() else {
            return DragOutcome::Idle;
        };
        let zone = std::mem::take(&mut self.preview);
        let window_id = session.window_id;
        let Some(window) = manager.state().window(window_id) else {
            return DragOutcome::Cancelled;
        };
        if window.closing || window.maximized || (window.snap.is_some() && !session.unsnap_pending)
        {
            return DragOutcome::Cancelled;
        }

        let outcome = match (session.kind, zone) {
            (DragKind::Resize(_), _) => DragOutcome::Resized(window_id),
            (DragKind::Move, SnapZone::None) => DragOutcome::Moved(window_id),
            (DragKind::Move, SnapZone::Top) => {
                manager.toggle_maximize_window(window_id);
                DragOutcome::Maximized(window_id)
            }
            (DragKind::Move, SnapZone::Left) => {
                manager.snap_window(window_id, SnapSide::Left);
                DragOutcome::Snapped(window_id, SnapSide::Left)
            }
            (DragKind::Move, SnapZone::Right) => {
                manager.snap_window(window_id, SnapSide::Right);
                DragOutcome::Snapped(window_id, SnapSide::Right)
            }
        };
        debug!(?outcome, "drag finished");
        outcome
    }

    /// Drops the session without committing anything.
    ///
    /// Returns [`SnapZone::None`] when a visible preview had to be cleared.
    pub fn cancel(&mut self) -> Option<SnapZone> {
        self.session = None;
        self.set_preview(SnapZone::None)
    }

    fn set_preview(&mut self, zone: SnapZone) -> Option<SnapZone> {
        if self.preview == zone {
            return None;
        }
        self.preview = zone;
        Some(zone)
    }

    fn apply_rect(&self, manager: &mut WindowSessionManager, window_id: WindowId, rect: WindowRect) {
        if let Err(err) = manager.update_window_state(window_id, WindowPatch::rect(rect)) {
            warn!(%window_id, %err, "drag produced invalid geometry");
        }
    }
}

/// Places `restored` so the pointer keeps its relative horizontal position in the title bar
/// and its vertical offset from the top edge it had in `snapped`.
fn anchor_under_pointer(
    snapped: WindowRect,
    restored: WindowRect,
    grab: PointerPosition,
    pointer: PointerPosition,
) -> WindowRect {
    let grab_x = i64::from((grab.x - snapped.x).clamp(0, snapped.w.max(0)));
    let scaled_x = if snapped.w > 0 {
        grab_x * i64::from(restored.w) / i64::from(snapped.w)
    } else {
        0
    };
    let grab_y = (grab.y - snapped.y).clamp(0, restored.h.max(0));
    WindowRect {
        x: pointer.x - i32::try_from(scaled_x).unwrap_or(0),
        y: pointer.y - grab_y,
        ..restored
    }
}
