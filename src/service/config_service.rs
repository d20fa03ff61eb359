use std::io;
use std::path::PathBuf;
use std::time::Duration;
use crate::config::ports::{AppConfig, ConfigPort};

pub const DEFAULT_BACKEND_PORT: u16 = 8000;
pub const DEFAULT_FRONTEND_PORT: u16 = 3000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 3 * 1024 * 1024;
const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_HEALTH_INTERVAL: Duration = Duration::from_secs(1);

// 配置服務，負責選擇適當的配置適配器
pub struct ConfigService {
    config_port: Box<dyn ConfigPort>,
}

impl ConfigService {
    pub fn new(config_port: Box<dyn ConfigPort>) -> Self {
        ConfigService { config_port }
    }

    pub fn get_config(&self) -> io::Result<AppConfig> {
        self.config_port.get_config()
    }
}

// 預設配置適配器
pub struct DefaultConfigAdapter {
    project_root: PathBuf,
}

impl DefaultConfigAdapter {
    pub fn new(project_root: PathBuf) -> Self {
        DefaultConfigAdapter { project_root }
    }
}

impl ConfigPort for DefaultConfigAdapter {
    fn get_config(&self) -> io::Result<AppConfig> {
        let backend_dir = self.project_root.join("backend");
        Ok(AppConfig {
            project_root: self.project_root.clone(),
            frontend_dir: self.project_root.join("frontend"),
            venv_dir: backend_dir.join("venv"),
            backend_dir,
            backend_host: "127.0.0.1".to_string(),
            backend_port: DEFAULT_BACKEND_PORT,
            frontend_port: DEFAULT_FRONTEND_PORT,
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
            health_interval: DEFAULT_HEALTH_INTERVAL,
            open_browser: true,
            no_progress: false,
            api_url: format!("http://127.0.0.1:{}", DEFAULT_BACKEND_PORT),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        })
    }
}
