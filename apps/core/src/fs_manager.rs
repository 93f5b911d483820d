use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable that pins the application root.
pub const HOME_ENV: &str = "ABSA_HOME";

/// Name of the optional dictionary file looked up in the config directory.
pub const ASPECTS_FILENAME: &str = "aspects.json";

pub struct PortablePathManager;

impl PortablePathManager {
    /// Application root: `ABSA_HOME` when set, otherwise the executable's directory.
    pub fn root_dir() -> PathBuf {
        if let Ok(home) = std::env::var(HOME_ENV) {
            if !home.trim().is_empty() {
                return PathBuf::from(home);
            }
        }

        #[cfg(debug_assertions)]
        {
            // In development the executable sits in target/debug at the workspace root
            if let Ok(mut path) = std::env::current_exe() {
                path.pop(); // remove exe name
                path.pop(); // remove debug
                path.pop(); // remove target

                let core_path = path.join("apps").join("core");
                if core_path.exists() {
                    return core_path;
                }
            }
        }

        match std::env::current_exe() {
            Ok(mut path) => {
                path.pop();
                path
            }
            Err(e) => {
                warn!(
                    "Failed to get current exe path: {}. Falling back to current_dir.",
                    e
                );
                std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
            }
        }
    }

    /// Main data directory (./data).
    pub fn data_dir() -> PathBuf {
        Self::root_dir().join("data")
    }

    /// Embedding model cache (./data/models).
    pub fn models_dir() -> PathBuf {
        Self::data_dir().join("models")
    }

    /// Configuration directory (./config).
    pub fn config_dir() -> PathBuf {
        Self::root_dir().join("config")
    }

    /// Dictionary file picked up automatically when present (./config/aspects.json).
    pub fn default_aspects_path() -> PathBuf {
        Self::config_dir().join(ASPECTS_FILENAME)
    }

    /// Create `dir` (and parents) if missing.
    pub fn ensure_dir(dir: &Path) -> Result<(), std::io::Error> {
        if !dir.exists() {
            info!("Creating directory: {:?}", dir);
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}
