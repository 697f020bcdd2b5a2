//! Stateless layout math for maximize, snap layouts, resize handles, and edge snap zones.
//!
//! Every function here is deterministic in its inputs and safe to call again whenever the
//! viewport changes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{PointerPosition, ResizeEdge, Size, Viewport, WindowRect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SnapLayout {
    #[serde(rename = "50-50-horizontal")]
    FiftyFiftyHorizontal,
    #[serde(rename = "main-side-right")]
    MainSideRight,
    #[serde(rename = "thirds-vertical")]
    ThirdsVertical,
    #[serde(rename = "quadrants")]
    Quadrants,
}

impl SnapLayout {
    pub const ALL: [SnapLayout; 4] = [
        Self::FiftyFiftyHorizontal,
        Self::MainSideRight,
        Self::ThirdsVertical,
        Self::Quadrants,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FiftyFiftyHorizontal => "50-50-horizontal",
            Self::MainSideRight => "main-side-right",
            Self::ThirdsVertical => "thirds-vertical",
            Self::Quadrants => "quadrants",
        }
    }

    /// Areas a window can occupy in this layout, in picker order.
    pub fn areas(self) -> &'static [SnapArea] {
        match self {
            Self::FiftyFiftyHorizontal => &[SnapArea::Left, SnapArea::Right],
            Self::MainSideRight => &[SnapArea::Main, SnapArea::Side],
            Self::ThirdsVertical => &[SnapArea::Left, SnapArea::Middle, SnapArea::Right],
            Self::Quadrants => &[
                SnapArea::TopLeft,
                SnapArea::TopRight,
                SnapArea::BottomLeft,
                SnapArea::BottomRight,
            ],
        }
    }

    pub fn contains(self, area: SnapArea) -> bool {
        self.areas().contains(&area)
    }
}

impl fmt::Display for SnapLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SnapLayout {
    type Err = LayoutError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|layout| layout.as_str() == raw)
            .ok_or_else(|| LayoutError::UnknownLayout(raw.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapArea {
    Left,
    Right,
    Main,
    Side,
    Middle,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl SnapArea {
    const ALL: [SnapArea; 9] = [
        Self::Left,
        Self::Right,
        Self::Main,
        Self::Side,
        Self::Middle,
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Main => "main",
            Self::Side => "side",
            Self::Middle => "middle",
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for SnapArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SnapArea {
    type Err = LayoutError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|area| area.as_str() == raw)
            .ok_or_else(|| LayoutError::UnknownArea(raw.to_string()))
    }
}

/// Side used by the half-screen snap shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapSide {
    Left,
    Right,
}

impl From<SnapSide> for SnapArea {
    fn from(side: SnapSide) -> Self {
        match side {
            SnapSide::Left => SnapArea::Left,
            SnapSide::Right => SnapArea::Right,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("unknown snap layout `{0}`")]
    UnknownLayout(String),
    #[error("unknown snap area `{0}`")]
    UnknownArea(String),
    #[error("snap area `{area}` is not part of layout `{layout}`")]
    AreaNotInLayout { layout: SnapLayout, area: SnapArea },
}

/// A validated `(layout, area)` pair. Construction guarantees the area belongs to the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSnapState")]
pub struct SnapState {
    layout: SnapLayout,
    area: SnapArea,
}

#[derive(Deserialize)]
struct RawSnapState {
    layout: SnapLayout,
    area: SnapArea,
}

impl TryFrom<RawSnapState> for SnapState {
    type Error = LayoutError;

    fn try_from(raw: RawSnapState) -> Result<Self, Self::Error> {
        Self::new(raw.layout, raw.area)
    }
}

impl SnapState {
    pub fn new(layout: SnapLayout, area: SnapArea) -> Result<Self, LayoutError> {
        if layout.contains(area) {
            Ok(Self { layout, area })
        } else {
            Err(LayoutError::AreaNotInLayout { layout, area })
        }
    }

    pub fn half(side: SnapSide) -> Self {
        Self {
            layout: SnapLayout::FiftyFiftyHorizontal,
            area: side.into(),
        }
    }

    pub fn layout(self) -> SnapLayout {
        self.layout
    }

    pub fn area(self) -> SnapArea {
        self.area
    }
}

/// Computes the rectangle for `area` of `layout` inside a `viewport_width` x `viewport_height`
/// surface. Fractions round down to whole pixels; the last column and row absorb the
/// remainder so areas always reach the viewport's right and bottom edges.
pub fn compute_layout(
    layout: SnapLayout,
    area: SnapArea,
    viewport_width: i32,
    viewport_height: i32,
) -> Result<WindowRect, LayoutError> {
    let snap = SnapState::new(layout, area)?;
    Ok(snap_rect(snap, Viewport::new(viewport_width, viewport_height)))
}

/// Total form of [`compute_layout`] for an already validated [`SnapState`].
pub fn snap_rect(snap: SnapState, viewport: Viewport) -> WindowRect {
    let Viewport {
        width: w,
        height: h,
    } = viewport;
    let half_w = w / 2;
    let third_w = w / 3;
    let two_thirds_w = w * 2 / 3;

    match (snap.layout, snap.area) {
        (SnapLayout::FiftyFiftyHorizontal, SnapArea::Right) => {
            WindowRect::new(half_w, 0, w - half_w, h)
        }
        (SnapLayout::FiftyFiftyHorizontal, _) => WindowRect::new(0, 0, half_w, h),
        (SnapLayout::MainSideRight, SnapArea::Side) => {
            WindowRect::new(two_thirds_w, 0, w - two_thirds_w, h)
        }
        (SnapLayout::MainSideRight, _) => WindowRect::new(0, 0, two_thirds_w, h),
        (SnapLayout::ThirdsVertical, SnapArea::Middle) => {
            WindowRect::new(third_w, 0, two_thirds_w - third_w, h)
        }
        (SnapLayout::ThirdsVertical, SnapArea::Right) => {
            WindowRect::new(two_thirds_w, 0, w - two_thirds_w, h)
        }
        (SnapLayout::ThirdsVertical, _) => WindowRect::new(0, 0, third_w, h),
        (SnapLayout::Quadrants, area) => {
            let half_h = h / 2;
            let (x, width) = if matches!(area, SnapArea::TopRight | SnapArea::BottomRight) {
                (half_w, w - half_w)
            } else {
                (0, half_w)
            };
            let (y, height) = if matches!(area, SnapArea::BottomLeft | SnapArea::BottomRight) {
                (half_h, h - half_h)
            } else {
                (0, half_h)
            };
            WindowRect::new(x, y, width, height)
        }
    }
}

pub fn maximized_rect(viewport: Viewport) -> WindowRect {
    viewport.rect()
}

/// Applies a resize-handle drag to `start`.
///
/// Width and height never drop below `min`. Handles on the north or west edge keep the
/// opposite edge anchored, including when the floor kicks in.
pub fn resize_rect(start: WindowRect, edge: ResizeEdge, dx: i32, dy: i32, min: Size) -> WindowRect {
    let mut rect = start;
    if edge.moves_east() {
        rect.w = (start.w + dx).max(min.width);
    }
    if edge.moves_west() {
        rect.w = (start.w - dx).max(min.width);
        rect.x = start.x + start.w - rect.w;
    }
    if edge.moves_south() {
        rect.h = (start.h + dy).max(min.height);
    }
    if edge.moves_north() {
        rect.h = (start.h - dy).max(min.height);
        rect.y = start.y + start.h - rect.h;
    }
    rect
}

/// Viewport edge a dragged window would snap to if released now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapZone {
    #[default]
    None,
    Left,
    Right,
    Top,
}

/// Classifies the pointer against the viewport edges. Side edges win over the top edge in
/// the corners.
pub fn snap_zone_for_pointer(
    pointer: PointerPosition,
    viewport: Viewport,
    threshold: i32,
) -> SnapZone {
    if pointer.x <= threshold {
        SnapZone::Left
    } else if pointer.x >= viewport.width - threshold {
        SnapZone::Right
    } else if pointer.y <= threshold {
        SnapZone::Top
    } else {
        SnapZone::None
    }
}
