use crate::modules::ModuleSet;
use crate::natural::sort_natural_by_key;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// A regular file found under `modules/<module>/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    /// Installation-relative POSIX key, e.g. `/modules/system/init.php`.
    pub key: String,
    pub module: String,
    pub path: PathBuf,
}

/// Scanner for the module source files of an installation
pub struct FileScanner {
    root: PathBuf,
}

impl FileScanner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Enumerate regular files of every module, naturally sorted by key within each module.
    ///
    /// Modules keep their [`ModuleSet`] order. Symlinked directories are followed; walkdir
    /// reports link cycles as errors, which are logged and skipped.
    pub fn scan(&self, modules: &ModuleSet) -> Vec<ScannedFile> {
        let mut files = Vec::new();

        for module in modules.iter() {
            let base = self.root.join("modules").join(module);
            if !base.is_dir() {
                log::debug!("Module directory {} is missing", base.display());
                continue;
            }

            let mut module_files = Vec::new();
            for result in WalkDir::new(&base).follow_links(true) {
                match result {
                    Ok(entry) => {
                        if !entry.file_type().is_file() {
                            continue;
                        }
                        let Some(key) = self.relative_key(entry.path()) else {
                            log::warn!("Skipping {} outside of root", entry.path().display());
                            continue;
                        };
                        module_files.push(ScannedFile {
                            key,
                            module: module.to_string(),
                            path: entry.into_path(),
                        });
                    }
                    Err(e) => log::warn!("Failed to read entry: {e}"),
                }
            }

            sort_natural_by_key(&mut module_files, |file| file.key.as_str());
            log::debug!("Found {} files in module {module}", module_files.len());
            files.extend(module_files);
        }

        log::info!("Found {} module files", files.len());
        files
    }

    fn relative_key(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let mut key = String::new();
        for component in relative.components() {
            if let Component::Normal(name) = component {
                key.push('/');
                key.push_str(&name.to_string_lossy());
            }
        }
        (!key.is_empty()).then_some(key)
    }
}
