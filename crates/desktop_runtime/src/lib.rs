//! Window session core for the browser desktop shell.
//!
//! [`WindowSessionManager`] owns the window collection, [`geometry`] computes maximize and
//! snap rectangles, and [`DragController`] turns pointer drags into manager calls. Shell
//! chrome talks to all three through [`reduce_desktop`] or the [`DesktopRuntime`] container.

pub mod apps;
pub mod config;
pub mod drag;
pub mod geometry;
pub mod model;
pub mod reducer;
pub mod runtime;
pub mod window_manager;

pub use config::{ConfigError, ShellConfig};
pub use drag::{DragController, DragOutcome};
pub use geometry::{compute_layout, LayoutError, SnapArea, SnapLayout, SnapSide, SnapState, SnapZone};
pub use model::*;
pub use reducer::{reduce_desktop, DesktopAction, ReducerError, RuntimeEffect};
pub use runtime::DesktopRuntime;
pub use window_manager::{OpenOutcome, PatchError, WindowSessionManager};
