//! Built-in application catalog compiled from `manifests/*.toml` by the build script.

use desktop_app_contract::{AppRegistry, ApplicationId, RegistryError};

include!(concat!(env!("OUT_DIR"), "/app_catalog_generated.rs"));

pub const CALCULATOR_APP_ID: &str = "system.calculator";
pub const CHAT_APP_ID: &str = "system.chat";
pub const CLOCK_APP_ID: &str = "system.clock";
pub const DICTIONARY_APP_ID: &str = "system.dictionary";
pub const PAINT_APP_ID: &str = "system.paint";
pub const SLIDES_APP_ID: &str = "system.slides";
pub const SOURCE_APP_ID: &str = "system.source";

/// Parses the build-time catalog into a registry.
///
/// # Errors
///
/// Returns [`RegistryError`] if the generated catalog fails validation.
pub fn builtin_registry() -> Result<AppRegistry, RegistryError> {
    AppRegistry::from_catalog_json(APP_MANIFEST_CATALOG_JSON)
}

pub fn builtin_app_id(raw: &'static str) -> ApplicationId {
    ApplicationId::trusted(raw)
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::WindowDefaults;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn builtin_catalog_contains_every_manifest() {
        let registry = builtin_registry().expect("catalog parses");
        let ids = registry
            .iter()
            .map(|entry| entry.app_id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            ids,
            vec![
                CALCULATOR_APP_ID,
                CHAT_APP_ID,
                CLOCK_APP_ID,
                DICTIONARY_APP_ID,
                PAINT_APP_ID,
                SLIDES_APP_ID,
                SOURCE_APP_ID,
            ]
        );
    }

    #[test]
    fn link_entry_is_not_launchable() {
        let registry = builtin_registry().expect("catalog parses");
        let source = registry
            .get(&builtin_app_id(SOURCE_APP_ID))
            .expect("source entry");
        assert!(!source.is_launchable());
        assert!(source.external_url.is_some());
        assert_eq!(
            registry.iter().filter(|entry| entry.is_launchable()).count(),
            6
        );
    }

    #[test]
    fn window_defaults_are_optional() {
        let registry = builtin_registry().expect("catalog parses");
        assert_eq!(
            registry
                .get(&builtin_app_id(CALCULATOR_APP_ID))
                .and_then(|entry| entry.default_size),
            Some(WindowDefaults {
                width: 320,
                height: 480
            })
        );
        assert_eq!(
            registry
                .get(&builtin_app_id(PAINT_APP_ID))
                .and_then(|entry| entry.default_size),
            None
        );
    }
}
