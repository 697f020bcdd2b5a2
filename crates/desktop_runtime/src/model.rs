use desktop_app_contract::ApplicationId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::geometry::SnapState;

pub const DEFAULT_WINDOW_WIDTH: i32 = 420;
pub const DEFAULT_WINDOW_HEIGHT: i32 = 300;
pub const DEFAULT_VIEWPORT_WIDTH: i32 = 1280;
pub const DEFAULT_VIEWPORT_HEIGHT: i32 = 800;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "window-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn is_degenerate(self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl WindowRect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_parts(position: Point, size: Size) -> Self {
        Self {
            x: position.x,
            y: position.y,
            w: size.width,
            h: size.height,
        }
    }

    pub fn size(self) -> Size {
        Size::new(self.w, self.h)
    }
}

/// Size of the hosting surface that maximize and snap geometry is computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn rect(self) -> WindowRect {
        WindowRect::new(0, 0, self.width, self.height)
    }

    pub fn is_degenerate(self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT)
    }
}

/// One managed window.
///
/// `minimized`/`maximized` describe the logical window mode; `closing`, `minimizing` and
/// `restoring` mark an animation the rendering layer is playing and are only cleared by the
/// matching completion call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: WindowId,
    pub app_id: ApplicationId,
    pub title: String,
    pub icon_id: String,
    pub rect: WindowRect,
    /// Geometry to return to when leaving maximized or snapped mode.
    pub restore_rect: Option<WindowRect>,
    pub z_index: u64,
    pub minimized: bool,
    pub maximized: bool,
    pub closing: bool,
    pub minimizing: bool,
    pub restoring: bool,
    pub snap: Option<SnapState>,
    pub props: Value,
}

impl WindowRecord {
    /// Whether the window is free to be moved and resized by the user.
    pub fn is_free(&self) -> bool {
        !self.maximized && self.snap.is_none()
    }

    /// Whether the window currently takes part in focus and stacking decisions.
    pub fn is_visible(&self) -> bool {
        !self.minimized && !self.minimizing && !self.closing
    }
}

/// Merge-patch applied by [`crate::WindowSessionManager::update_window_state`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WindowPatch {
    pub rect: Option<WindowRect>,
    pub title: Option<String>,
    pub props: Option<Value>,
}

impl WindowPatch {
    pub fn rect(rect: WindowRect) -> Self {
        Self {
            rect: Some(rect),
            ..Self::default()
        }
    }
}

/// Read model handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesktopState {
    pub windows: Vec<WindowRecord>,
    pub viewport: Viewport,
    pub next_window_id: u64,
    pub next_z_index: u64,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self::with_viewport(Viewport::default())
    }
}

impl DesktopState {
    pub fn with_viewport(viewport: Viewport) -> Self {
        Self {
            windows: Vec::new(),
            viewport,
            next_window_id: 1,
            next_z_index: 1,
        }
    }

    pub fn window(&self, window_id: WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.id == window_id)
    }

    pub fn max_z_index(&self) -> Option<u64> {
        self.windows.iter().map(|w| w.z_index).max()
    }

    /// Topmost window that is not minimized, minimizing, or closing.
    pub fn focused_window_id(&self) -> Option<WindowId> {
        self.windows
            .iter()
            .filter(|w| w.is_visible())
            .max_by_key(|w| w.z_index)
            .map(|w| w.id)
    }

    /// Windows ordered bottom to top.
    pub fn windows_in_stacking_order(&self) -> Vec<&WindowRecord> {
        let mut ordered = self.windows.iter().collect::<Vec<_>>();
        ordered.sort_by_key(|w| w.z_index);
        ordered
    }

    pub(crate) fn window_mut(&mut self, window_id: WindowId) -> Option<&mut WindowRecord> {
        self.windows.iter_mut().find(|w| w.id == window_id)
    }

    /// Stamps the next z-index onto `window_id`. Values are never handed out twice.
    pub(crate) fn raise(&mut self, window_id: WindowId) -> Option<&mut WindowRecord> {
        let window = self.windows.iter_mut().find(|w| w.id == window_id)?;
        window.z_index = self.next_z_index;
        self.next_z_index = self.next_z_index.saturating_add(1);
        Some(window)
    }

    pub(crate) fn take_window_id(&mut self) -> WindowId {
        let id = WindowId(self.next_window_id);
        self.next_window_id = self.next_window_id.saturating_add(1);
        id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenWindowRequest {
    pub app_id: ApplicationId,
    /// Explicit title. Supplying one always creates a new window instance.
    pub title: Option<String>,
    pub props: Value,
}

impl OpenWindowRequest {
    pub fn new(app_id: ApplicationId) -> Self {
        Self {
            app_id,
            title: None,
            props: Value::Null,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_props(mut self, props: Value) -> Self {
        self.props = props;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

impl PointerPosition {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeEdge {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl ResizeEdge {
    pub fn moves_north(self) -> bool {
        matches!(self, Self::North | Self::NorthEast | Self::NorthWest)
    }

    pub fn moves_south(self) -> bool {
        matches!(self, Self::South | Self::SouthEast | Self::SouthWest)
    }

    pub fn moves_east(self) -> bool {
        matches!(self, Self::East | Self::NorthEast | Self::SouthEast)
    }

    pub fn moves_west(self) -> bool {
        matches!(self, Self::West | Self::NorthWest | Self::SouthWest)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragKind {
    Move,
    Resize(ResizeEdge),
}

/// Pointer-drag session owned by [`crate::DragController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragSession {
    pub window_id: WindowId,
    pub kind: DragKind,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
    /// Set while a move that began on a snapped window has not yet pulled it free.
    pub unsnap_pending: bool,
}
