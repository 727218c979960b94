use crate::error::{FingerprintError, Result};
use crate::hashing::{digest_hex, hash_file_or_empty};
use crate::modules::{ModuleSet, KNOWN_MODULES};
use crate::scanner::FileScanner;
use once_cell::sync::OnceCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Content fingerprint of an installation's module files.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocalFingerprint {
    files: BTreeMap<String, String>,
    module_checksums: BTreeMap<String, String>,
}

impl LocalFingerprint {
    /// Assemble a fingerprint from precomputed maps.
    pub fn new(
        files: BTreeMap<String, String>,
        module_checksums: BTreeMap<String, String>,
    ) -> Self {
        Self {
            files,
            module_checksums,
        }
    }

    /// `/modules/<module>/...` key to normalized content hash.
    #[must_use]
    pub fn files(&self) -> &BTreeMap<String, String> {
        &self.files
    }

    /// Module name to aggregate hash.
    #[must_use]
    pub fn module_checksums(&self) -> &BTreeMap<String, String> {
        &self.module_checksums
    }

    #[must_use]
    pub fn has_module(&self, module: &str) -> bool {
        self.module_checksums.contains_key(module)
    }
}

/// A validated installation root whose fingerprint is computed at most once.
pub struct Installation {
    root: PathBuf,
    modules: ModuleSet,
    fingerprint: OnceCell<LocalFingerprint>,
}

impl Installation {
    /// Validate `root` and resolve the module set, detecting it when `modules` is `None`.
    pub fn open(root: impl AsRef<Path>, modules: Option<ModuleSet>) -> Result<Self> {
        let root = canonical_root(root.as_ref())?;
        validate_root(&root)?;

        let modules = match modules {
            Some(modules) => modules,
            None => ModuleSet::detect(&root)?,
        };

        Ok(Self {
            root,
            modules,
            fingerprint: OnceCell::new(),
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn modules(&self) -> &ModuleSet {
        &self.modules
    }

    /// Scan on first call, then return the cached fingerprint.
    pub fn fingerprint(&self) -> &LocalFingerprint {
        self.fingerprint
            .get_or_init(|| compute_fingerprint(&self.root, &self.modules))
    }
}

/// Validate `root` and fingerprint it in one go.
pub fn scan(root: impl AsRef<Path>, modules: Option<ModuleSet>) -> Result<LocalFingerprint> {
    let installation = Installation::open(root, modules)?;
    let fingerprint = installation.fingerprint().clone();
    Ok(fingerprint)
}

/// Heuristic check that `root` holds a Winter CMS installation.
///
/// Looks for `modules/system`, `themes`, `config/app.php` and `config/cms.php`.
pub fn validate_root(root: &Path) -> Result<()> {
    let markers = [
        root.join("modules").join(KNOWN_MODULES[0]),
        root.join("themes"),
        root.join("config").join("app.php"),
        root.join("config").join("cms.php"),
    ];

    for marker in markers {
        if !marker.exists() {
            return Err(FingerprintError::InvalidInstallation { missing: marker });
        }
    }
    Ok(())
}

fn canonical_root(root: &Path) -> Result<PathBuf> {
    let canonical = root
        .canonicalize()
        .map_err(|err| FingerprintError::InvalidRoot(format!("{}: {err}", root.display())))?;
    if !canonical.is_dir() {
        return Err(FingerprintError::InvalidRoot(format!(
            "{} is not a directory",
            canonical.display()
        )));
    }
    Ok(canonical)
}

fn compute_fingerprint(root: &Path, modules: &ModuleSet) -> LocalFingerprint {
    let start = Instant::now();
    log::info!("Scanning installation at {}", root.display());

    let scanned = FileScanner::new(root).scan(modules);

    let mut files = BTreeMap::new();
    let mut concatenated: BTreeMap<String, String> = modules
        .iter()
        .map(|module| (module.to_string(), String::new()))
        .collect();

    // `scanned` is naturally ordered within each module, which fixes the aggregate order.
    for file in scanned {
        let hash = hash_file_or_empty(&file.path);
        if let Some(buffer) = concatenated.get_mut(&file.module) {
            buffer.push_str(&hash);
        }
        files.insert(file.key, hash);
    }

    let module_checksums = concatenated
        .into_iter()
        .map(|(module, hashes)| (module, digest_hex(hashes.as_bytes())))
        .collect();

    log::info!(
        "Fingerprinted {} files across {} modules in {} ms",
        files.len(),
        modules.len(),
        start.elapsed().as_millis()
    );

    LocalFingerprint {
        files,
        module_checksums,
    }
}
