//! Component Locator
//!
//! One table maps every component kind to where it lives on disk and how
//! its files are recognized. Inventory, manifest building and the applier
//! all consult this table instead of branching on the kind themselves.

use crate::engine::config::UpdaterConfig;
use crate::engine::platform::PlatformFamily;
use super::error::{Result, UpdaterError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// The fixed set of installable components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentKind {
    DependencyManager,
    Launcher,
    Plugin,
}

impl ComponentKind {
    /// Every kind, in the order matchers are tried
    pub const ALL: [ComponentKind; 3] = [
        ComponentKind::DependencyManager,
        ComponentKind::Launcher,
        ComponentKind::Plugin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::DependencyManager => "DependencyManager",
            ComponentKind::Launcher => "Launcher",
            ComponentKind::Plugin => "Plugin",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ComponentKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown component kind '{}'", s))
    }
}

/// Case-insensitive prefix/suffix rule over a bare file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMatcher {
    prefix: &'static str,
    suffix: &'static str,
}

impl NameMatcher {
    pub const fn new(prefix: &'static str, suffix: &'static str) -> Self {
        Self { prefix, suffix }
    }

    pub fn matches(&self, file_name: &str) -> bool {
        let name = file_name.to_lowercase();
        name.len() >= self.prefix.len() + self.suffix.len()
            && name.starts_with(self.prefix)
            && name.ends_with(self.suffix)
    }
}

/// Everything the updater needs to know about one component kind
#[derive(Debug, Clone)]
pub struct ComponentSpec {
    pub kind: ComponentKind,
    /// Directory (relative to the server root) that is scanned and written
    pub directory: PathBuf,
    /// File name reported when the component is missing entirely
    pub canonical_name: &'static str,
    pub matcher: NameMatcher,
}

impl ComponentSpec {
    /// Path, relative to the server root, a missing component is expected at
    pub fn canonical_path(&self) -> PathBuf {
        self.directory.join(self.canonical_name)
    }
}

/// The resolved kind lookup table for one platform
#[derive(Debug, Clone)]
pub struct ComponentTable {
    family: PlatformFamily,
    specs: Vec<ComponentSpec>,
}

impl ComponentTable {
    pub fn family(&self) -> PlatformFamily {
        self.family
    }

    /// Specs in [`ComponentKind::ALL`] order
    pub fn specs(&self) -> &[ComponentSpec] {
        &self.specs
    }

    pub fn spec(&self, kind: ComponentKind) -> &ComponentSpec {
        // Populated for every kind by `ComponentLocator::resolve`.
        &self.specs[kind as usize]
    }

    /// Distinct directories to scan, in table order
    pub fn scan_roots(&self) -> Vec<&Path> {
        let mut roots: Vec<&Path> = Vec::new();
        for spec in &self.specs {
            if !roots.contains(&spec.directory.as_path()) {
                roots.push(&spec.directory);
            }
        }
        roots
    }

    /// First kind whose matcher accepts `file_name`
    pub fn classify(&self, file_name: &str) -> Option<ComponentKind> {
        self.specs
            .iter()
            .find(|spec| spec.matcher.matches(file_name))
            .map(|spec| spec.kind)
    }

    /// Directory (relative to the server root) new files of `kind` are written to
    pub fn target_dir(&self, kind: ComponentKind) -> &Path {
        &self.spec(kind).directory
    }
}

/// Builds the component table for a platform
pub struct ComponentLocator<'a> {
    config: &'a UpdaterConfig,
}

impl<'a> ComponentLocator<'a> {
    pub fn new(config: &'a UpdaterConfig) -> Self {
        Self { config }
    }

    /// Resolve the table for an OS identifier, failing for unrecognized platforms
    pub fn resolve(&self, platform: &str) -> Result<ComponentTable> {
        let family = PlatformFamily::classify(platform);
        let (Some(plugin_suffix), Some(plugin_name)) =
            (family.plugin_suffix(), family.plugin_filename())
        else {
            return Err(UpdaterError::UnsupportedPlatform(platform.to_string()));
        };

        let specs = ComponentKind::ALL
            .into_iter()
            .map(|kind| match kind {
                ComponentKind::DependencyManager => ComponentSpec {
                    kind,
                    directory: self.config.bootstrap_dir.clone(),
                    canonical_name: "shoebill-dependency-manager.jar",
                    matcher: NameMatcher::new("shoebill-dependency-manager", ".jar"),
                },
                ComponentKind::Launcher => ComponentSpec {
                    kind,
                    directory: self.config.bootstrap_dir.clone(),
                    canonical_name: "shoebill-launcher.jar",
                    matcher: NameMatcher::new("shoebill-launcher", ".jar"),
                },
                ComponentKind::Plugin => ComponentSpec {
                    kind,
                    directory: self.config.plugins_dir.clone(),
                    canonical_name: plugin_name,
                    matcher: NameMatcher::new("shoeb", plugin_suffix),
                },
            })
            .collect();

        Ok(ComponentTable { family, specs })
    }
}
