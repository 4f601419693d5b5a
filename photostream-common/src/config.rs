//! Configuration loading and root folder resolution
//!
//! Every PhotoStream module stores its data under a single root folder.
//! Resolution priority (highest first):
//! 1. Command-line argument (handled by the caller)
//! 2. `PHOTOSTREAM_ROOT_FOLDER` environment variable
//! 3. `root_folder` key in the shared TOML config file
//! 4. OS-dependent compiled default

use crate::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable consulted during root folder resolution
pub const ROOT_FOLDER_ENV: &str = "PHOTOSTREAM_ROOT_FOLDER";

/// File name of the persisted photo collection inside the root folder
pub const PHOTOS_FILE_NAME: &str = "photostream-photos.json";

/// Resolves the root folder for a module using the shared priority order.
///
/// The command-line argument (priority 1) is applied by the caller before
/// consulting the resolver; `resolve` covers priorities 2 through 4 and
/// always produces a usable path.
pub struct RootFolderResolver {
    module_name: String,
}

impl RootFolderResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
        }
    }

    /// Resolve the root folder from environment, config file, or default
    pub fn resolve(&self) -> PathBuf {
        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            debug!(
                module = %self.module_name,
                "Root folder from {}: {}",
                ROOT_FOLDER_ENV,
                path
            );
            return PathBuf::from(path);
        }

        // Priority 3: TOML config file
        if let Some(path) = root_folder_from_config_file() {
            debug!(module = %self.module_name, "Root folder from config file: {}", path.display());
            return path;
        }

        // Priority 4: OS-dependent compiled default
        let default = get_default_root_folder();
        debug!(module = %self.module_name, "Root folder from compiled default: {}", default.display());
        default
    }
}

/// Prepares a resolved root folder for use and derives file paths inside it.
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    /// Create the root folder (and parents) if it does not exist yet
    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            std::fs::create_dir_all(&self.root_folder)?;
            info!("Created root folder: {}", self.root_folder.display());
        }
        Ok(())
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    /// Path of the persisted photo collection document
    pub fn photos_path(&self) -> PathBuf {
        self.root_folder.join(PHOTOS_FILE_NAME)
    }
}

/// Read `root_folder` from the shared config file, if one exists
fn root_folder_from_config_file() -> Option<PathBuf> {
    let config_path = shared_config_path()?;
    let toml_content = std::fs::read_to_string(&config_path).ok()?;
    let config = toml::from_str::<toml::Value>(&toml_content).ok()?;
    config
        .get("root_folder")
        .and_then(|v| v.as_str())
        .map(PathBuf::from)
}

/// Locate the shared config file for the platform
fn shared_config_path() -> Option<PathBuf> {
    if cfg!(target_os = "linux") {
        // ~/.config/photostream/config.toml first, then /etc/photostream/config.toml
        if let Some(user_config) = dirs::config_dir().map(|d| d.join("photostream").join("config.toml")) {
            if user_config.exists() {
                return Some(user_config);
            }
        }
        let system_config = PathBuf::from("/etc/photostream/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
        None
    } else {
        let path = dirs::config_dir()?.join("photostream").join("config.toml");
        if path.exists() {
            Some(path)
        } else {
            None
        }
    }
}

/// Default location of a module's own config file
/// (e.g. `~/.config/photostream/gallery.toml` on Linux)
pub fn default_module_config_path(module_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("photostream").join(format!("{module_name}.toml")))
}

/// Get OS-dependent default root folder path
pub fn get_default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/photostream
        dirs::data_local_dir()
            .map(|d| d.join("photostream"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/photostream"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/photostream
        dirs::data_dir()
            .map(|d| d.join("photostream"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/photostream"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\photostream
        dirs::data_local_dir()
            .map(|d| d.join("photostream"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\photostream"))
    } else {
        PathBuf::from("./photostream_data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_root_folder_ends_with_photostream() {
        let path = get_default_root_folder();
        let last = path
            .components()
            .last()
            .map(|c| c.as_os_str().to_string_lossy().to_string());
        assert_eq!(last.as_deref(), Some("photostream"));
    }

    #[test]
    fn module_config_path_is_under_photostream_directory() {
        if let Some(path) = default_module_config_path("gallery") {
            assert!(path.ends_with(Path::new("photostream").join("gallery.toml")));
        }
    }

    #[test]
    fn initializer_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("photostream");

        let initializer = RootFolderInitializer::new(root.clone());
        initializer.ensure_directory_exists().unwrap();

        assert!(root.is_dir());
        assert_eq!(initializer.root_folder(), root.as_path());
    }

    #[test]
    fn initializer_is_idempotent_on_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let initializer = RootFolderInitializer::new(dir.path().to_path_buf());

        initializer.ensure_directory_exists().unwrap();
        initializer.ensure_directory_exists().unwrap();
    }

    #[test]
    fn photos_path_joins_file_name() {
        let initializer = RootFolderInitializer::new(PathBuf::from("/tmp/photostream"));
        assert_eq!(
            initializer.photos_path(),
            PathBuf::from("/tmp/photostream").join(PHOTOS_FILE_NAME)
        );
    }
}
