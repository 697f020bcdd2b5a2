//! Window session manager: the single owner of the window collection.
//!
//! Every operation is a total function over the current state. Unknown window ids and
//! unknown or non-launchable application ids are silent no-ops, because the rendering layer
//! may legitimately race (for example a drag-end handler firing after a close completed).
//! Animation flags are cleared only by the explicit `finish_*`/[`remove_window`] calls.
//!
//! [`remove_window`]: WindowSessionManager::remove_window

use desktop_app_contract::AppRegistry;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::ShellConfig;
use crate::geometry::{maximized_rect, snap_rect, SnapSide, SnapState};
use crate::model::{
    DesktopState, OpenWindowRequest, Viewport, WindowId, WindowPatch, WindowRecord, WindowRect,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    #[error("window size must be positive, got {width}x{height}")]
    DegenerateSize { width: i32, height: i32 },
}

/// Result of [`WindowSessionManager::open`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenOutcome {
    /// A new window instance was created.
    Opened(WindowId),
    /// A generic open matched an existing window, which was brought to the front instead.
    Focused(WindowId),
    /// The registry entry has no content factory; no window was created.
    NotLaunchable { external_url: Option<String> },
    /// No registry entry exists for the id.
    UnknownApp,
}

impl OpenOutcome {
    pub fn window_id(&self) -> Option<WindowId> {
        match self {
            Self::Opened(id) | Self::Focused(id) => Some(*id),
            Self::NotLaunchable { .. } | Self::UnknownApp => None,
        }
    }
}

pub struct WindowSessionManager {
    registry: AppRegistry,
    config: ShellConfig,
    state: DesktopState,
}

impl WindowSessionManager {
    pub fn new(registry: AppRegistry, config: ShellConfig, viewport: Viewport) -> Self {
        Self {
            registry,
            config,
            state: DesktopState::with_viewport(viewport),
        }
    }

    pub fn state(&self) -> &DesktopState {
        &self.state
    }

    pub fn registry(&self) -> &AppRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.state.viewport
    }

    /// Opens an app window, or refocuses the existing one for untitled requests.
    pub fn open(&mut self, request: OpenWindowRequest) -> OpenOutcome {
        let Some(descriptor) = self.registry.get(&request.app_id) else {
            debug!(app_id = %request.app_id, "open ignored: unknown app");
            return OpenOutcome::UnknownApp;
        };
        if !descriptor.is_launchable() {
            debug!(app_id = %request.app_id, "open ignored: app has no content factory");
            return OpenOutcome::NotLaunchable {
                external_url: descriptor.external_url.clone(),
            };
        }

        if request.title.is_none() {
            let existing = self
                .state
                .windows
                .iter()
                .filter(|w| w.app_id == request.app_id && !w.closing)
                .max_by_key(|w| w.z_index)
                .map(|w| (w.id, w.minimized || w.minimizing));
            if let Some((window_id, hidden)) = existing {
                debug!(%window_id, app_id = %request.app_id, "open deduplicated onto existing window");
                if hidden {
                    self.restore_and_focus_window(window_id);
                } else {
                    self.focus_window(window_id);
                }
                return OpenOutcome::Focused(window_id);
            }
        }

        let size = descriptor
            .default_size
            .map(|defaults| crate::model::Size::new(defaults.width, defaults.height))
            .filter(|size| !size.is_degenerate())
            .unwrap_or(self.config.window.default_size);
        let title = request
            .title
            .unwrap_or_else(|| descriptor.display_name.clone());
        let icon_id = descriptor.icon_id.clone();

        let cascade = self.config.window.cascade_step * self.state.windows.len() as i32;
        let origin = self.config.window.cascade_origin;
        let rect = WindowRect::new(
            origin.x + cascade,
            origin.y + cascade,
            size.width,
            size.height,
        );

        let window_id = self.state.take_window_id();
        self.state.windows.push(WindowRecord {
            id: window_id,
            app_id: request.app_id,
            title,
            icon_id,
            rect,
            restore_rect: None,
            z_index: 0,
            minimized: false,
            maximized: false,
            closing: false,
            minimizing: false,
            restoring: false,
            snap: None,
            props: request.props,
        });
        self.state.raise(window_id);
        debug!(%window_id, "window opened");
        OpenOutcome::Opened(window_id)
    }

    /// Starts the close animation. The window stays in the collection until
    /// [`WindowSessionManager::remove_window`].
    pub fn close_window(&mut self, window_id: WindowId) -> bool {
        let Some(window) = self.state.window_mut(window_id) else {
            return false;
        };
        if window.closing {
            return false;
        }
        window.closing = true;
        debug!(%window_id, "window closing");
        true
    }

    pub fn remove_window(&mut self, window_id: WindowId) -> bool {
        let before = self.state.windows.len();
        self.state.windows.retain(|w| w.id != window_id);
        let removed = self.state.windows.len() != before;
        if removed {
            debug!(%window_id, "window removed");
        }
        removed
    }

    pub fn focus_window(&mut self, window_id: WindowId) -> bool {
        self.state.raise(window_id).is_some()
    }

    /// Raises a group of windows together, keeping their current relative stacking order, and
    /// starts the restore animation for any that are minimized.
    pub fn focus_windows(&mut self, window_ids: &[WindowId]) -> bool {
        let mut targets = self
            .state
            .windows
            .iter()
            .filter(|w| window_ids.contains(&w.id))
            .map(|w| (w.z_index, w.id))
            .collect::<Vec<_>>();
        if targets.is_empty() {
            return false;
        }
        targets.sort_unstable();

        for (_, window_id) in targets {
            if let Some(window) = self.state.raise(window_id) {
                if window.minimized || window.minimizing {
                    window.minimized = false;
                    window.minimizing = false;
                    window.restoring = true;
                }
            }
        }
        true
    }

    /// Starts the minimize animation; [`WindowSessionManager::finish_minimize`] completes it.
    pub fn minimize_window(&mut self, window_id: WindowId) -> bool {
        let Some(window) = self.state.window_mut(window_id) else {
            return false;
        };
        if window.closing || window.minimized || window.minimizing {
            return false;
        }
        window.minimizing = true;
        window.minimized = false;
        window.restoring = false;
        true
    }

    /// Completes a minimize. Ignored when the minimize was superseded by a restore.
    pub fn finish_minimize(&mut self, window_id: WindowId) -> bool {
        let Some(window) = self.state.window_mut(window_id) else {
            return false;
        };
        if !window.minimizing {
            return false;
        }
        window.minimizing = false;
        window.minimized = true;
        true
    }

    pub fn restore_and_focus_window(&mut self, window_id: WindowId) -> bool {
        let Some(window) = self.state.raise(window_id) else {
            return false;
        };
        window.minimized = false;
        window.minimizing = false;
        window.restoring = true;
        true
    }

    pub fn finish_restore(&mut self, window_id: WindowId) -> bool {
        let Some(window) = self.state.window_mut(window_id) else {
            return false;
        };
        if !window.restoring {
            return false;
        }
        window.restoring = false;
        true
    }

    /// Maximizes a window, or restores a maximized one to its saved geometry.
    ///
    /// The saved geometry is only captured when leaving the free state, so maximizing a
    /// snapped window still restores to the pre-snap rectangle.
    pub fn toggle_maximize_window(&mut self, window_id: WindowId) -> bool {
        let viewport = self.state.viewport;
        let fallback = self.default_rect();
        let Some(window) = self.state.window_mut(window_id) else {
            return false;
        };

        if window.maximized {
            window.rect = window.restore_rect.take().unwrap_or(fallback);
            window.maximized = false;
            window.snap = None;
            debug!(%window_id, "window restored from maximized");
        } else {
            if window.is_free() {
                window.restore_rect = Some(window.rect);
            }
            window.maximized = true;
            window.snap = None;
            window.rect = maximized_rect(viewport);
            debug!(%window_id, "window maximized");
        }
        true
    }

    pub fn snap_window_to_layout(&mut self, window_id: WindowId, snap: SnapState) -> bool {
        let viewport = self.state.viewport;
        let Some(window) = self.state.window_mut(window_id) else {
            return false;
        };
        if window.is_free() {
            window.restore_rect = Some(window.rect);
        }
        window.rect = snap_rect(snap, viewport);
        window.snap = Some(snap);
        window.maximized = false;
        debug!(%window_id, layout = %snap.layout(), area = %snap.area(), "window snapped");
        true
    }

    pub fn snap_window(&mut self, window_id: WindowId, side: SnapSide) -> bool {
        self.snap_window_to_layout(window_id, SnapState::half(side))
    }

    pub fn unsnap_window(&mut self, window_id: WindowId) -> bool {
        let Some(window) = self.state.window_mut(window_id) else {
            return false;
        };
        let (Some(_), Some(restore_rect)) = (window.snap, window.restore_rect) else {
            return false;
        };
        window.rect = restore_rect;
        window.snap = None;
        window.maximized = false;
        window.restore_rect = None;
        debug!(%window_id, "window unsnapped");
        true
    }

    /// Merges `patch` into a window. Callers only patch geometry of free windows.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::DegenerateSize`] for non-positive sizes; the window is left
    /// untouched.
    pub fn update_window_state(
        &mut self,
        window_id: WindowId,
        patch: WindowPatch,
    ) -> Result<bool, PatchError> {
        let Some(window) = self.state.window_mut(window_id) else {
            return Ok(false);
        };
        if let Some(rect) = patch.rect {
            if rect.size().is_degenerate() {
                return Err(PatchError::DegenerateSize {
                    width: rect.w,
                    height: rect.h,
                });
            }
            window.rect = rect;
        }
        if let Some(title) = patch.title {
            window.title = title;
        }
        if let Some(props) = patch.props {
            window.props = props;
        }
        Ok(true)
    }

    /// Marks every window closing at once. The host clears the desktop with
    /// [`WindowSessionManager::finish_close_all`] after the configured delay.
    pub fn close_all_windows(&mut self) -> bool {
        if self.state.windows.is_empty() {
            return false;
        }
        for window in &mut self.state.windows {
            window.closing = true;
        }
        info!(count = self.state.windows.len(), "closing all windows");
        true
    }

    /// Drops every window regardless of per-window animation state.
    pub fn finish_close_all(&mut self) -> bool {
        if self.state.windows.is_empty() {
            return false;
        }
        self.state.windows.clear();
        true
    }

    /// Records a new viewport and recomputes maximized and snapped geometry against it.
    /// Free windows keep their rectangles.
    pub fn resize_viewport(&mut self, viewport: Viewport) -> bool {
        if viewport.is_degenerate() {
            debug!(?viewport, "ignoring degenerate viewport");
            return false;
        }
        if viewport == self.state.viewport {
            return false;
        }
        self.state.viewport = viewport;
        for window in &mut self.state.windows {
            if window.maximized {
                window.rect = maximized_rect(viewport);
            } else if let Some(snap) = window.snap {
                window.rect = snap_rect(snap, viewport);
            }
        }
        true
    }

    /// Dock-button behavior: restore a hidden window, minimize the focused one, otherwise
    /// bring the window to the front.
    pub fn toggle_taskbar_window(&mut self, window_id: WindowId) -> bool {
        let Some(window) = self.state.window(window_id) else {
            return false;
        };
        if window.closing {
            return false;
        }
        if window.minimized || window.minimizing {
            self.restore_and_focus_window(window_id)
        } else if self.state.focused_window_id() == Some(window_id) {
            self.minimize_window(window_id)
        } else {
            self.focus_window(window_id)
        }
    }

    fn default_rect(&self) -> WindowRect {
        WindowRect::from_parts(
            self.config.window.cascade_origin,
            self.config.window.default_size,
        )
    }
}
