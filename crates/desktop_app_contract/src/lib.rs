//! Shared contract types between the desktop window manager and the application registry.
//!
//! The window manager only ever reads the registry: it looks up an [`ApplicationId`], takes
//! the display metadata and default window size, and forwards the [`ContentHandle`] to the
//! presentation layer untouched.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Manifest schema version accepted by [`AppRegistry::from_manifests`].
pub const APP_MANIFEST_SCHEMA_VERSION: u32 = 1;

/// Stable identifier for an app package.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApplicationId(String);

/// Returned when a raw string does not satisfy the application id policy.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid application id `{0}`; expected namespaced dotted segments")]
pub struct InvalidApplicationId(pub String);

impl ApplicationId {
    /// Returns an app identifier when `raw` conforms to the `segment.segment...` policy.
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidApplicationId> {
        let raw = raw.into();
        if is_valid_application_id(&raw) {
            Ok(Self(raw))
        } else {
            Err(InvalidApplicationId(raw))
        }
    }

    /// Creates an id without validation for compile-time trusted constants.
    pub fn trusted(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the string form of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ApplicationId {
    type Error = InvalidApplicationId;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<ApplicationId> for String {
    fn from(id: ApplicationId) -> Self {
        id.0
    }
}

fn is_valid_application_id(raw: &str) -> bool {
    if raw.is_empty() || raw.len() > 120 {
        return false;
    }

    let mut count = 0usize;
    for part in raw.split('.') {
        count += 1;
        if part.is_empty() || part.len() > 32 || part.ends_with('-') {
            return false;
        }
        let bytes = part.as_bytes();
        if !bytes[0].is_ascii_lowercase() {
            return false;
        }
        if !bytes
            .iter()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
        {
            return false;
        }
    }

    count >= 2
}

/// Default window size declared by an app manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowDefaults {
    /// Default width in viewport pixels.
    pub width: i32,
    /// Default height in viewport pixels.
    pub height: i32,
}

/// Opaque key the presentation layer resolves into hosted app content.
///
/// The window manager stores and forwards this value but never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHandle(String);

impl ContentHandle {
    /// Creates a content handle from a factory key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the factory key.
    pub fn key(&self) -> &str {
        &self.0
    }
}

/// On-disk app manifest as written in `*.toml` manifest files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppManifest {
    /// Manifest schema version.
    pub schema_version: u32,
    /// Raw application id; validated when the registry is built.
    pub app_id: String,
    /// Human-readable name used as the default window title.
    pub display_name: String,
    /// Icon token for launcher/dock rendering.
    #[serde(default)]
    pub icon_id: Option<String>,
    /// Whether the app is listed in the start menu.
    #[serde(default = "default_true")]
    pub show_in_launcher: bool,
    /// Whether the app gets a desktop icon.
    #[serde(default)]
    pub show_on_desktop: bool,
    /// Default window size; the shell falls back to its configured size when absent.
    #[serde(default)]
    pub window_defaults: Option<WindowDefaults>,
    /// Content factory key. Absent for entries that cannot be opened in a window.
    #[serde(default)]
    pub content: Option<String>,
    /// External link opened instead of a window for non-launchable entries.
    #[serde(default)]
    pub external_url: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Validated, read-only registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDescriptor {
    /// Registry key.
    pub app_id: ApplicationId,
    /// Human-readable name used as the default window title.
    pub display_name: String,
    /// Icon token for launcher/dock rendering.
    pub icon_id: String,
    /// Default window size, if the app declares one.
    pub default_size: Option<WindowDefaults>,
    /// Content factory handle. `None` means the entry is not launchable.
    pub content: Option<ContentHandle>,
    /// External link associated with non-launchable entries.
    pub external_url: Option<String>,
    /// Whether the app is listed in the start menu.
    pub show_in_launcher: bool,
    /// Whether the app gets a desktop icon.
    pub show_on_desktop: bool,
}

impl AppDescriptor {
    /// Creates a launchable descriptor with launcher visibility and no default size.
    pub fn new(app_id: ApplicationId, display_name: impl Into<String>, content: &str) -> Self {
        Self {
            icon_id: app_id
                .as_str()
                .rsplit('.')
                .next()
                .unwrap_or_default()
                .to_string(),
            app_id,
            display_name: display_name.into(),
            default_size: None,
            content: Some(ContentHandle::new(content)),
            external_url: None,
            show_in_launcher: true,
            show_on_desktop: false,
        }
    }

    /// Returns `true` when the entry has a content factory and can back a window.
    pub fn is_launchable(&self) -> bool {
        self.content.is_some()
    }

    fn from_manifest(manifest: AppManifest) -> Result<Self, RegistryError> {
        if manifest.schema_version != APP_MANIFEST_SCHEMA_VERSION {
            return Err(RegistryError::UnsupportedSchema {
                app_id: manifest.app_id,
                found: manifest.schema_version,
            });
        }
        let app_id = ApplicationId::new(manifest.app_id)?;
        let icon_id = manifest.icon_id.unwrap_or_else(|| {
            app_id
                .as_str()
                .rsplit('.')
                .next()
                .unwrap_or_default()
                .to_string()
        });
        Ok(Self {
            app_id,
            display_name: manifest.display_name,
            icon_id,
            default_size: manifest.window_defaults,
            content: manifest.content.map(ContentHandle::new),
            external_url: manifest.external_url,
            show_in_launcher: manifest.show_in_launcher,
            show_on_desktop: manifest.show_on_desktop,
        })
    }
}

/// Errors raised while assembling an [`AppRegistry`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A manifest carried an id that violates the id policy.
    #[error(transparent)]
    InvalidId(#[from] InvalidApplicationId),
    /// A manifest used a schema version this runtime does not understand.
    #[error(
        "manifest `{app_id}` uses schema version {found}, expected {}",
        APP_MANIFEST_SCHEMA_VERSION
    )]
    UnsupportedSchema {
        /// Raw id of the offending manifest.
        app_id: String,
        /// Schema version found in the manifest.
        found: u32,
    },
    /// Two entries share the same id.
    #[error("duplicate application id `{0}`")]
    Duplicate(ApplicationId),
    /// The serialized catalog could not be decoded.
    #[error("malformed app catalog: {0}")]
    Catalog(String),
}

/// Immutable application table injected into the window manager at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppRegistry {
    entries: BTreeMap<ApplicationId, AppDescriptor>,
}

impl AppRegistry {
    /// Builds a registry from already-validated descriptors.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] if two descriptors share an id.
    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = AppDescriptor>,
    ) -> Result<Self, RegistryError> {
        let mut entries = BTreeMap::new();
        for descriptor in descriptors {
            let app_id = descriptor.app_id.clone();
            if entries.insert(app_id.clone(), descriptor).is_some() {
                return Err(RegistryError::Duplicate(app_id));
            }
        }
        Ok(Self { entries })
    }

    /// Validates manifests and builds a registry from them.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistryError`] for invalid ids, unsupported schema versions, or duplicates.
    pub fn from_manifests(
        manifests: impl IntoIterator<Item = AppManifest>,
    ) -> Result<Self, RegistryError> {
        let descriptors = manifests
            .into_iter()
            .map(AppDescriptor::from_manifest)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_descriptors(descriptors)
    }

    /// Decodes a JSON array of manifests and builds a registry from them.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Catalog`] when the JSON is malformed, or any validation error
    /// from [`AppRegistry::from_manifests`].
    pub fn from_catalog_json(raw: &str) -> Result<Self, RegistryError> {
        let manifests = serde_json::from_str::<Vec<AppManifest>>(raw)
            .map_err(|err| RegistryError::Catalog(err.to_string()))?;
        Self::from_manifests(manifests)
    }

    /// Looks up a registry entry.
    pub fn get(&self, app_id: &ApplicationId) -> Option<&AppDescriptor> {
        self.entries.get(app_id)
    }

    /// Iterates all entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = &AppDescriptor> {
        self.entries.values()
    }

    /// Returns the number of registered apps.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no apps are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries shown in the start menu.
    pub fn launcher_apps(&self) -> Vec<&AppDescriptor> {
        self.iter().filter(|entry| entry.show_in_launcher).collect()
    }

    /// Entries shown as desktop icons.
    pub fn desktop_apps(&self) -> Vec<&AppDescriptor> {
        self.iter().filter(|entry| entry.show_on_desktop).collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn manifest(app_id: &str) -> AppManifest {
        AppManifest {
            schema_version: APP_MANIFEST_SCHEMA_VERSION,
            app_id: app_id.to_string(),
            display_name: "Clock".to_string(),
            icon_id: None,
            show_in_launcher: true,
            show_on_desktop: false,
            window_defaults: Some(WindowDefaults {
                width: 320,
                height: 240,
            }),
            content: Some("clock".to_string()),
            external_url: None,
        }
    }

    #[test]
    fn application_id_policy_requires_namespaced_lowercase_segments() {
        assert!(ApplicationId::new("system.clock").is_ok());
        assert!(ApplicationId::new("system.dial-up2").is_ok());
        assert!(ApplicationId::new("clock").is_err());
        assert!(ApplicationId::new("System.clock").is_err());
        assert!(ApplicationId::new("system..clock").is_err());
        assert!(ApplicationId::new("system.clock-").is_err());
        assert!(ApplicationId::new("system.9clock").is_err());
    }

    #[test]
    fn application_id_deserialization_validates() {
        let ok: ApplicationId = serde_json::from_str("\"system.clock\"").expect("valid id");
        assert_eq!(ok.as_str(), "system.clock");
        assert!(serde_json::from_str::<ApplicationId>("\"Clock\"").is_err());
    }

    #[test]
    fn registry_from_manifests_derives_icon_and_launchability() {
        let mut link = manifest("system.source");
        link.content = None;
        link.external_url = Some("https://example.com/source".to_string());

        let registry =
            AppRegistry::from_manifests([manifest("system.clock"), link]).expect("registry");

        let clock = registry
            .get(&ApplicationId::trusted("system.clock"))
            .expect("clock entry");
        assert_eq!(clock.icon_id, "clock");
        assert!(clock.is_launchable());
        assert_eq!(
            clock.default_size,
            Some(WindowDefaults {
                width: 320,
                height: 240
            })
        );

        let source = registry
            .get(&ApplicationId::trusted("system.source"))
            .expect("source entry");
        assert!(!source.is_launchable());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn registry_rejects_duplicates_and_unknown_schema() {
        let err = AppRegistry::from_manifests([manifest("system.clock"), manifest("system.clock")])
            .expect_err("duplicate");
        assert_eq!(
            err,
            RegistryError::Duplicate(ApplicationId::trusted("system.clock"))
        );

        let mut future = manifest("system.clock");
        future.schema_version = 2;
        assert!(matches!(
            AppRegistry::from_manifests([future]),
            Err(RegistryError::UnsupportedSchema { found: 2, .. })
        ));
    }

    #[test]
    fn catalog_json_round_trips_through_manifests() {
        let raw = serde_json::to_string(&vec![manifest("system.clock")]).expect("json");
        let registry = AppRegistry::from_catalog_json(&raw).expect("registry");
        assert_eq!(registry.launcher_apps().len(), 1);
        assert!(registry.desktop_apps().is_empty());

        assert!(matches!(
            AppRegistry::from_catalog_json("{"),
            Err(RegistryError::Catalog(_))
        ));
    }
}
