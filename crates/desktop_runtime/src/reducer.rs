//! Reducer actions, side-effect intents, and dispatch onto the window session manager.

use std::time::Duration;

use thiserror::Error;

use crate::drag::{DragController, DragOutcome};
use crate::geometry::{LayoutError, SnapArea, SnapLayout, SnapSide, SnapState, SnapZone};
use crate::model::{
    DragKind, OpenWindowRequest, PointerPosition, ResizeEdge, Viewport, WindowId, WindowPatch,
};
use crate::window_manager::{OpenOutcome, PatchError, WindowSessionManager};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`].
pub enum DesktopAction {
    /// Open an app window, or refocus the existing one for untitled requests.
    OpenWindow(OpenWindowRequest),
    /// Start a window's close animation.
    CloseWindow {
        /// Window to close.
        window_id: WindowId,
    },
    /// Drop a window once its close animation finished.
    RemoveWindow {
        /// Window to drop.
        window_id: WindowId,
    },
    /// Raise a window above every other.
    FocusWindow {
        /// Window to focus.
        window_id: WindowId,
    },
    /// Raise a group of windows, keeping their relative order.
    FocusWindows {
        /// Windows to raise.
        window_ids: Vec<WindowId>,
    },
    /// Start a window's minimize animation.
    MinimizeWindow {
        /// Window to minimize.
        window_id: WindowId,
    },
    /// Minimize animation finished.
    FinishMinimize {
        /// Window that finished minimizing.
        window_id: WindowId,
    },
    /// Un-minimize and raise a window.
    RestoreAndFocusWindow {
        /// Window to restore.
        window_id: WindowId,
    },
    /// Restore animation finished.
    FinishRestore {
        /// Window that finished restoring.
        window_id: WindowId,
    },
    /// Maximize, or restore a maximized window.
    ToggleMaximizeWindow {
        /// Window to toggle.
        window_id: WindowId,
    },
    /// Snap to the left or right half of the viewport.
    SnapWindow {
        /// Window to snap.
        window_id: WindowId,
        /// Half to occupy.
        side: SnapSide,
    },
    /// Snap into an area of a snap layout.
    SnapWindowToLayout {
        /// Window to snap.
        window_id: WindowId,
        /// Layout to use.
        layout: SnapLayout,
        /// Area within `layout`.
        area: SnapArea,
    },
    /// Return a snapped window to its pre-snap geometry.
    UnsnapWindow {
        /// Window to unsnap.
        window_id: WindowId,
    },
    /// Merge a partial update into a window.
    UpdateWindowState {
        /// Window to update.
        window_id: WindowId,
        /// Fields to replace.
        patch: WindowPatch,
    },
    /// Start closing every window at once.
    CloseAllWindows,
    /// Clear the desktop after the close-all delay elapsed.
    FinishCloseAll,
    /// The hosting surface changed size.
    ViewportResized {
        /// New viewport size.
        viewport: Viewport,
    },
    /// Dock button click: restore, minimize, or focus.
    ToggleTaskbarWindow {
        /// Window associated with the dock button.
        window_id: WindowId,
    },
    /// Pointer-down on a title bar.
    BeginMove {
        /// Window being dragged.
        window_id: WindowId,
        /// Pointer position at drag start.
        pointer: PointerPosition,
    },
    /// Pointer-down on a resize handle.
    BeginResize {
        /// Window being resized.
        window_id: WindowId,
        /// Handle being dragged.
        edge: ResizeEdge,
        /// Pointer position at drag start.
        pointer: PointerPosition,
    },
    /// Pointer moved during a drag.
    UpdateDrag {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// Pointer released.
    EndDrag,
    /// Drag interrupted (pointer capture lost, escape key).
    CancelDrag,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the host to execute.
pub enum RuntimeEffect {
    /// Move keyboard focus into the window's content.
    FocusWindowInput(WindowId),
    /// Open a link for an app entry that has no window content.
    OpenExternalUrl(String),
    /// Dispatch [`DesktopAction::FinishCloseAll`] after `delay`.
    ScheduleCloseAllFinalize {
        /// Time the close animation needs.
        delay: Duration,
    },
    /// The drag snap preview changed.
    SnapPreviewChanged(SnapZone),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Rejected actions. Unknown window ids are not errors.
pub enum ReducerError {
    /// A window patch carried an invalid size.
    #[error(transparent)]
    Patch(#[from] PatchError),
    /// A snap request named an area outside its layout.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Applies a [`DesktopAction`] and collects the resulting side effects.
///
/// # Errors
///
/// Returns [`ReducerError`] when the action itself is malformed. State is unchanged in that
/// case.
pub fn reduce_desktop(
    manager: &mut WindowSessionManager,
    drag: &mut DragController,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    match action {
        DesktopAction::OpenWindow(request) => match manager.open(request) {
            OpenOutcome::Opened(window_id) | OpenOutcome::Focused(window_id) => {
                effects.push(RuntimeEffect::FocusWindowInput(window_id));
            }
            OpenOutcome::NotLaunchable {
                external_url: Some(url),
            } => effects.push(RuntimeEffect::OpenExternalUrl(url)),
            OpenOutcome::NotLaunchable { external_url: None } | OpenOutcome::UnknownApp => {}
        },
        DesktopAction::CloseWindow { window_id } => {
            manager.close_window(window_id);
        }
        DesktopAction::RemoveWindow { window_id } => {
            manager.remove_window(window_id);
        }
        DesktopAction::FocusWindow { window_id } => {
            if manager.focus_window(window_id) {
                effects.push(RuntimeEffect::FocusWindowInput(window_id));
            }
        }
        DesktopAction::FocusWindows { window_ids } => {
            manager.focus_windows(&window_ids);
            if let Some(top) = manager.state().focused_window_id() {
                if window_ids.contains(&top) {
                    effects.push(RuntimeEffect::FocusWindowInput(top));
                }
            }
        }
        DesktopAction::MinimizeWindow { window_id } => {
            manager.minimize_window(window_id);
        }
        DesktopAction::FinishMinimize { window_id } => {
            manager.finish_minimize(window_id);
        }
        DesktopAction::RestoreAndFocusWindow { window_id } => {
            if manager.restore_and_focus_window(window_id) {
                effects.push(RuntimeEffect::FocusWindowInput(window_id));
            }
        }
        DesktopAction::FinishRestore { window_id } => {
            manager.finish_restore(window_id);
        }
        DesktopAction::ToggleMaximizeWindow { window_id } => {
            manager.toggle_maximize_window(window_id);
        }
        DesktopAction::SnapWindow { window_id, side } => {
            manager.snap_window(window_id, side);
        }
        DesktopAction::SnapWindowToLayout {
            window_id,
            layout,
            area,
        } => {
            let snap = SnapState::new(layout, area)?;
            manager.snap_window_to_layout(window_id, snap);
        }
        DesktopAction::UnsnapWindow { window_id } => {
            manager.unsnap_window(window_id);
        }
        DesktopAction::UpdateWindowState { window_id, patch } => {
            manager.update_window_state(window_id, patch)?;
        }
        DesktopAction::CloseAllWindows => {
            if drag.is_dragging() {
                push_preview(&mut effects, drag.cancel());
            }
            if manager.close_all_windows() {
                effects.push(RuntimeEffect::ScheduleCloseAllFinalize {
                    delay: manager.config().close_all_delay(),
                });
            }
        }
        DesktopAction::FinishCloseAll => {
            manager.finish_close_all();
        }
        DesktopAction::ViewportResized { viewport } => {
            manager.resize_viewport(viewport);
        }
        DesktopAction::ToggleTaskbarWindow { window_id } => {
            manager.toggle_taskbar_window(window_id);
            if manager.state().focused_window_id() == Some(window_id) {
                effects.push(RuntimeEffect::FocusWindowInput(window_id));
            }
        }
        DesktopAction::BeginMove { window_id, pointer } => {
            drag.pointer_down(manager, window_id, DragKind::Move, pointer);
        }
        DesktopAction::BeginResize {
            window_id,
            edge,
            pointer,
        } => {
            drag.pointer_down(manager, window_id, DragKind::Resize(edge), pointer);
        }
        DesktopAction::UpdateDrag { pointer } => {
            push_preview(&mut effects, drag.pointer_move(manager, pointer));
        }
        DesktopAction::EndDrag => {
            let had_preview = drag.preview() != SnapZone::None;
            let outcome = drag.pointer_up(manager);
            if had_preview {
                effects.push(RuntimeEffect::SnapPreviewChanged(SnapZone::None));
            }
            match outcome {
                DragOutcome::Moved(window_id)
                | DragOutcome::Resized(window_id)
                | DragOutcome::Maximized(window_id)
                | DragOutcome::Snapped(window_id, _) => {
                    effects.push(RuntimeEffect::FocusWindowInput(window_id));
                }
                DragOutcome::Idle | DragOutcome::Cancelled => {}
            }
        }
        DesktopAction::CancelDrag => {
            push_preview(&mut effects, drag.cancel());
        }
    }

    Ok(effects)
}

fn push_preview(effects: &mut Vec<RuntimeEffect>, changed: Option<SnapZone>) {
    if let Some(zone) = changed {
        effects.push(RuntimeEffect::SnapPreviewChanged(zone));
    }
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::{AppDescriptor, AppRegistry, ApplicationId};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::ShellConfig;

    fn setup() -> (WindowSessionManager, DragController) {
        let mut link = AppDescriptor::new(ApplicationId::trusted("system.source"), "Source", "x");
        link.content = None;
        link.external_url = Some("https://example.com/repo".to_string());
        let registry = AppRegistry::from_descriptors([
            AppDescriptor::new(ApplicationId::trusted("system.slides"), "Slides", "slides"),
            link,
        ])
        .expect("registry");
        (
            WindowSessionManager::new(registry, ShellConfig::default(), Viewport::new(1000, 800)),
            DragController::default(),
        )
    }

    fn dispatch(
        manager: &mut WindowSessionManager,
        drag: &mut DragController,
        action: DesktopAction,
    ) -> Vec<RuntimeEffect> {
        reduce_desktop(manager, drag, action).expect("action accepted")
    }

    fn open_slides(manager: &mut WindowSessionManager, drag: &mut DragController) -> WindowId {
        dispatch(
            manager,
            drag,
            DesktopAction::OpenWindow(OpenWindowRequest::new(ApplicationId::trusted(
                "system.slides",
            ))),
        );
        manager.state().focused_window_id().expect("window")
    }

    #[test]
    fn open_emits_focus_input_and_link_apps_emit_url() {
        let (mut manager, mut drag) = setup();

        let effects = dispatch(
            &mut manager,
            &mut drag,
            DesktopAction::OpenWindow(OpenWindowRequest::new(ApplicationId::trusted(
                "system.slides",
            ))),
        );
        let window_id = manager.state().windows[0].id;
        assert_eq!(effects, vec![RuntimeEffect::FocusWindowInput(window_id)]);

        let effects = dispatch(
            &mut manager,
            &mut drag,
            DesktopAction::OpenWindow(OpenWindowRequest::new(ApplicationId::trusted(
                "system.source",
            ))),
        );
        assert_eq!(
            effects,
            vec![RuntimeEffect::OpenExternalUrl(
                "https://example.com/repo".to_string()
            )]
        );
        assert_eq!(manager.state().windows.len(), 1);
    }

    #[test]
    fn close_all_schedules_finalize_without_clearing() {
        let (mut manager, mut drag) = setup();
        open_slides(&mut manager, &mut drag);

        let effects = dispatch(&mut manager, &mut drag, DesktopAction::CloseAllWindows);
        assert_eq!(
            effects,
            vec![RuntimeEffect::ScheduleCloseAllFinalize {
                delay: Duration::from_millis(300)
            }]
        );
        assert_eq!(manager.state().windows.len(), 1);

        dispatch(&mut manager, &mut drag, DesktopAction::FinishCloseAll);
        assert!(manager.state().windows.is_empty());
    }

    #[test]
    fn invalid_layout_area_and_degenerate_patch_are_rejected() {
        let (mut manager, mut drag) = setup();
        let window_id = open_slides(&mut manager, &mut drag);
        let before = manager.state().clone();

        let err = reduce_desktop(
            &mut manager,
            &mut drag,
            DesktopAction::SnapWindowToLayout {
                window_id,
                layout: SnapLayout::FiftyFiftyHorizontal,
                area: SnapArea::Main,
            },
        )
        .expect_err("area outside layout");
        assert!(matches!(err, ReducerError::Layout(_)));

        let err = reduce_desktop(
            &mut manager,
            &mut drag,
            DesktopAction::UpdateWindowState {
                window_id,
                patch: WindowPatch::rect(crate::model::WindowRect::new(0, 0, 10, -4)),
            },
        )
        .expect_err("negative height");
        assert!(matches!(err, ReducerError::Patch(_)));
        assert_eq!(manager.state(), &before);
    }

    #[test]
    fn drag_actions_report_preview_changes_and_commit_on_release() {
        let (mut manager, mut drag) = setup();
        let window_id = open_slides(&mut manager, &mut drag);

        dispatch(
            &mut manager,
            &mut drag,
            DesktopAction::BeginMove {
                window_id,
                pointer: PointerPosition::new(200, 60),
            },
        );
        let effects = dispatch(
            &mut manager,
            &mut drag,
            DesktopAction::UpdateDrag {
                pointer: PointerPosition::new(3, 300),
            },
        );
        assert_eq!(effects, vec![RuntimeEffect::SnapPreviewChanged(SnapZone::Left)]);

        let effects = dispatch(&mut manager, &mut drag, DesktopAction::EndDrag);
        assert_eq!(
            effects,
            vec![
                RuntimeEffect::SnapPreviewChanged(SnapZone::None),
                RuntimeEffect::FocusWindowInput(window_id),
            ]
        );
        let window = manager.state().window(window_id).expect("window");
        assert_eq!(window.snap, Some(SnapState::half(SnapSide::Left)));
    }

    #[test]
    fn close_all_during_drag_cancels_session() {
        let (mut manager, mut drag) = setup();
        let window_id = open_slides(&mut manager, &mut drag);

        dispatch(
            &mut manager,
            &mut drag,
            DesktopAction::BeginMove {
                window_id,
                pointer: PointerPosition::new(200, 60),
            },
        );
        dispatch(
            &mut manager,
            &mut drag,
            DesktopAction::UpdateDrag {
                pointer: PointerPosition::new(998, 300),
            },
        );
        let effects = dispatch(&mut manager, &mut drag, DesktopAction::CloseAllWindows);
        assert_eq!(effects[0], RuntimeEffect::SnapPreviewChanged(SnapZone::None));
        assert!(!drag.is_dragging());
    }

    #[test]
    fn unknown_window_actions_are_silent_noops() {
        let (mut manager, mut drag) = setup();
        open_slides(&mut manager, &mut drag);
        let before = manager.state().clone();
        let ghost = WindowId(404);

        let actions = vec![
            DesktopAction::CloseWindow { window_id: ghost },
            DesktopAction::RemoveWindow { window_id: ghost },
            DesktopAction::FocusWindow { window_id: ghost },
            DesktopAction::FocusWindows {
                window_ids: vec![ghost],
            },
            DesktopAction::MinimizeWindow { window_id: ghost },
            DesktopAction::FinishMinimize { window_id: ghost },
            DesktopAction::RestoreAndFocusWindow { window_id: ghost },
            DesktopAction::FinishRestore { window_id: ghost },
            DesktopAction::ToggleMaximizeWindow { window_id: ghost },
            DesktopAction::SnapWindow {
                window_id: ghost,
                side: SnapSide::Right,
            },
            DesktopAction::UnsnapWindow { window_id: ghost },
            DesktopAction::ToggleTaskbarWindow { window_id: ghost },
            DesktopAction::BeginMove {
                window_id: ghost,
                pointer: PointerPosition::new(0, 0),
            },
            DesktopAction::UpdateDrag {
                pointer: PointerPosition::new(5, 5),
            },
            DesktopAction::EndDrag,
        ];
        for action in actions {
            assert_eq!(dispatch(&mut manager, &mut drag, action), Vec::new());
        }
        assert_eq!(manager.state(), &before);
    }
}
