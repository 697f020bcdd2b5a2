//! Long-lived container for the window session manager, drag controller, and effect queue.
//!
//! Hosts feed it [`DesktopAction`] values from input handlers and animation callbacks and
//! drain [`RuntimeEffect`] values to execute.

use desktop_app_contract::{AppRegistry, RegistryError};
use tracing::warn;

use crate::apps;
use crate::config::ShellConfig;
use crate::drag::DragController;
use crate::model::{DesktopState, Viewport};
use crate::reducer::{reduce_desktop, DesktopAction, RuntimeEffect};
use crate::window_manager::WindowSessionManager;

pub struct DesktopRuntime {
    manager: WindowSessionManager,
    drag: DragController,
    effects: Vec<RuntimeEffect>,
}

impl DesktopRuntime {
    pub fn new(registry: AppRegistry, config: ShellConfig, viewport: Viewport) -> Self {
        Self {
            manager: WindowSessionManager::new(registry, config, viewport),
            drag: DragController::default(),
            effects: Vec::new(),
        }
    }

    /// Builds a runtime over the compiled-in app catalog.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the catalog fails validation.
    pub fn builtin(config: ShellConfig, viewport: Viewport) -> Result<Self, RegistryError> {
        Ok(Self::new(apps::builtin_registry()?, config, viewport))
    }

    /// Applies an action and queues its effects. Rejected actions are logged and dropped.
    pub fn dispatch(&mut self, action: DesktopAction) {
        match reduce_desktop(&mut self.manager, &mut self.drag, action) {
            Ok(effects) => self.effects.extend(effects),
            Err(err) => warn!(%err, "desktop reducer error"),
        }
    }

    /// Takes every queued effect in emission order.
    pub fn drain_effects(&mut self) -> Vec<RuntimeEffect> {
        std::mem::take(&mut self.effects)
    }

    pub fn state(&self) -> &DesktopState {
        self.manager.state()
    }

    pub fn manager(&self) -> &WindowSessionManager {
        &self.manager
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::apps::{builtin_app_id, CALCULATOR_APP_ID, SOURCE_APP_ID};
    use crate::geometry::{SnapArea, SnapLayout};
    use crate::model::OpenWindowRequest;

    fn runtime() -> DesktopRuntime {
        DesktopRuntime::builtin(ShellConfig::default(), Viewport::new(1200, 800))
            .expect("builtin catalog")
    }

    #[test]
    fn effects_accumulate_until_drained() {
        let mut runtime = runtime();
        runtime.dispatch(DesktopAction::OpenWindow(OpenWindowRequest::new(
            builtin_app_id(CALCULATOR_APP_ID),
        )));
        runtime.dispatch(DesktopAction::OpenWindow(OpenWindowRequest::new(
            builtin_app_id(SOURCE_APP_ID),
        )));
        runtime.dispatch(DesktopAction::CloseAllWindows);

        let window_id = runtime.state().windows[0].id;
        assert_eq!(
            runtime.drain_effects(),
            vec![
                RuntimeEffect::FocusWindowInput(window_id),
                RuntimeEffect::OpenExternalUrl("https://github.com/".to_string()),
                RuntimeEffect::ScheduleCloseAllFinalize {
                    delay: Duration::from_millis(300)
                },
            ]
        );
        assert!(runtime.drain_effects().is_empty());
    }

    #[test]
    fn rejected_actions_leave_state_untouched() {
        let mut runtime = runtime();
        runtime.dispatch(DesktopAction::OpenWindow(OpenWindowRequest::new(
            builtin_app_id(CALCULATOR_APP_ID),
        )));
        runtime.drain_effects();
        let before = runtime.state().clone();
        let window_id = before.windows[0].id;

        runtime.dispatch(DesktopAction::SnapWindowToLayout {
            window_id,
            layout: SnapLayout::Quadrants,
            area: SnapArea::Side,
        });

        assert_eq!(runtime.state(), &before);
        assert!(runtime.drain_effects().is_empty());
        assert!(!runtime.drag().is_dragging());
        assert_eq!(runtime.manager().viewport(), Viewport::new(1200, 800));
    }
}
