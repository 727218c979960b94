use crate::error::Result;
use std::path::Path;

/// Modules shipped with every Winter CMS build. `system` doubles as the installation marker.
pub const KNOWN_MODULES: &[&str] = &["system", "backend", "cms"];

/// Ordered, de-duplicated, lower-cased set of module names bounding a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSet {
    names: Vec<String>,
}

impl ModuleSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref().trim().to_lowercase();
            if name.is_empty() || normalized.contains(&name) {
                continue;
            }
            normalized.push(name);
        }
        Self { names: normalized }
    }

    #[must_use]
    pub fn known() -> Self {
        Self::new(KNOWN_MODULES)
    }

    /// List `root/modules` and keep the subdirectories that are known module names.
    ///
    /// The result follows [`KNOWN_MODULES`] order regardless of directory enumeration order.
    pub fn detect(root: &Path) -> Result<Self> {
        let modules_dir = root.join("modules");
        let mut found = Vec::new();

        for entry in std::fs::read_dir(&modules_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() && !entry.path().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_lowercase();
            if KNOWN_MODULES.contains(&name.as_str()) {
                found.push(name);
            }
        }

        found.sort_by_key(|name| {
            KNOWN_MODULES
                .iter()
                .position(|known| known == name)
                .unwrap_or(usize::MAX)
        });
        log::debug!("Detected modules: {}", found.join(", "));
        Ok(Self::new(found))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|candidate| candidate == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Module a manifest or installation path belongs to, for paths shaped `/modules/<module>/...`.
#[must_use]
pub fn module_of(path: &str) -> Option<&str> {
    let mut segments = path.trim_start_matches('/').split('/');
    if segments.next()? != "modules" {
        return None;
    }
    segments.next().filter(|segment| !segment.is_empty())
}
