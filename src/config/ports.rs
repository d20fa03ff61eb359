use std::io;
use std::path::PathBuf;
use std::time::Duration;

// 應用配置結構體，啟動器與轉換客戶端在建構時取得
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub project_root: PathBuf,
    pub backend_dir: PathBuf,
    pub frontend_dir: PathBuf,
    pub venv_dir: PathBuf,
    pub backend_host: String,
    pub backend_port: u16,
    pub frontend_port: u16,
    pub health_timeout: Duration,
    pub health_interval: Duration,
    pub open_browser: bool,
    pub no_progress: bool,
    pub api_url: String,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    pub fn backend_url(&self) -> String {
        format!("http://{}:{}", self.backend_host, self.backend_port)
    }

    pub fn health_url(&self) -> String {
        format!("{}/health", self.backend_url())
    }

    pub fn frontend_url(&self) -> String {
        format!("http://localhost:{}", self.frontend_port)
    }

    pub fn requirements_path(&self) -> PathBuf {
        self.backend_dir.join("requirements.txt")
    }

    pub fn backend_log_path(&self) -> PathBuf {
        self.project_root.join("backend.log")
    }

    pub fn frontend_log_path(&self) -> PathBuf {
        self.project_root.join("frontend.log")
    }
}

// 配置來源的 Port
pub trait ConfigPort {
    fn get_config(&self) -> io::Result<AppConfig>;
}
