use std::path::{Path, PathBuf};
use crate::config::ports::AppConfig;

/// 啟動所需的絕對路徑集合
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentDescriptor {
    pub project_root: PathBuf,
    pub backend_dir: PathBuf,
    pub frontend_dir: PathBuf,
    pub venv_dir: PathBuf,
}

impl EnvironmentDescriptor {
    pub fn from_config(config: &AppConfig) -> Self {
        EnvironmentDescriptor {
            project_root: config.project_root.clone(),
            backend_dir: config.backend_dir.clone(),
            frontend_dir: config.frontend_dir.clone(),
            venv_dir: config.venv_dir.clone(),
        }
    }

    /// 虛擬環境內的 Python 執行檔
    pub fn venv_python(&self) -> PathBuf {
        venv_python(&self.venv_dir)
    }
}

pub fn venv_python(venv_dir: &Path) -> PathBuf {
    if cfg!(windows) {
        venv_dir.join("Scripts").join("python.exe")
    } else {
        venv_dir.join("bin").join("python")
    }
}
