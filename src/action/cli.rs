use std::io;
use std::path::PathBuf;
use std::time::Duration;
use clap::Parser;
use crate::action::convert::{process_convert, process_health, process_sample_theme};
use crate::config::config::{validate_project_root, Cli, Command};
use crate::config::ports::{AppConfig, ConfigPort};
use crate::facade::bootstrap_facade::BootstrapFacade;
use crate::facade::traits::i_bootstrap::BootstrapFacadeTrait;
use crate::service::command::SystemCommandRunner;
use crate::service::config_service::{ConfigService, DefaultConfigAdapter};
use crate::utils::utils::setup_logging;

pub async fn process_args(args: Vec<String>) -> io::Result<String> {
    let cli = Cli::parse_from(args);
    setup_logging(cli.log_level.as_deref().unwrap_or("info"))?;

    let root = match cli.project_root {
        Some(ref root) => root.clone(),
        None => std::env::current_dir()?,
    };
    let project_root = validate_project_root(&root)?;

    // 檢查是否沒有提供任何選項（預設配置）
    let is_default_config = cli.backend_port.is_none()
        && cli.frontend_port.is_none()
        && cli.health_timeout.is_none()
        && !cli.no_browser
        && !cli.no_progress
        && cli.api_url.is_none()
        && cli.max_upload_mb.is_none();

    let config_port: Box<dyn ConfigPort> = if is_default_config {
        log::info!("未提供選項參數，使用預設配置：後端 8000 埠，前端 3000 埠");
        Box::new(DefaultConfigAdapter::new(project_root))
    } else {
        Box::new(CliConfigAdapter::new(cli.clone(), project_root))
    };
    let config = ConfigService::new(config_port).get_config()?;

    match cli.command {
        None => process_bootstrap(config).await,
        Some(Command::Convert { direction }) => process_convert(&config, direction).await,
        Some(Command::Health) => process_health(&config).await,
        Some(Command::SampleTheme { output }) => process_sample_theme(&config, &output).await,
    }
}

pub async fn process_bootstrap(config: AppConfig) -> io::Result<String> {
    let project_root = config.project_root.clone();
    let mut facade: Box<dyn BootstrapFacadeTrait> =
        Box::new(BootstrapFacade::new(config, Box::new(SystemCommandRunner::new())));
    facade.run_until_interrupted().await?;
    println!("已關閉所有程序");
    Ok(format!("專案目錄：{}", project_root.display()))
}

// CLI 配置適配器，在預設值上套用命令列參數
pub struct CliConfigAdapter {
    cli: Cli,
    project_root: PathBuf,
}

impl CliConfigAdapter {
    pub fn new(cli: Cli, project_root: PathBuf) -> Self {
        CliConfigAdapter { cli, project_root }
    }
}

impl ConfigPort for CliConfigAdapter {
    fn get_config(&self) -> io::Result<AppConfig> {
        let mut config = DefaultConfigAdapter::new(self.project_root.clone()).get_config()?;

        if let Some(port) = self.cli.backend_port {
            config.backend_port = port;
            config.api_url = format!("http://{}:{}", config.backend_host, port);
        }
        if let Some(port) = self.cli.frontend_port {
            config.frontend_port = port;
        }
        if config.backend_port == 0 || config.frontend_port == 0 {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "埠號必須大於 0"));
        }
        if config.backend_port == config.frontend_port {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("後端與前端不能使用同一個埠：{}", config.backend_port),
            ));
        }

        if let Some(secs) = self.cli.health_timeout {
            if secs == 0 {
                return Err(io::Error::new(io::ErrorKind::InvalidInput, "健康檢查逾時必須大於 0 秒"));
            }
            config.health_timeout = Duration::from_secs(secs);
        }
        if let Some(mb) = self.cli.max_upload_mb {
            if mb.is_nan() || mb <= 0.0 {
                return Err(io::Error::new(io::ErrorKind::InvalidInput, format!("無效的上傳大小上限: {}", mb)));
            }
            config.max_upload_bytes = (mb * 1024.0 * 1024.0) as usize;
        }
        if let Some(ref url) = self.cli.api_url {
            config.api_url = url.trim_end_matches('/').to_string();
        }
        config.open_browser = !self.cli.no_browser;
        config.no_progress = self.cli.no_progress;

        log::warn!(
            "使用自訂配置：backend_port={}, frontend_port={}, health_timeout={:?}, open_browser={}, no_progress={}, api_url={}, max_upload_bytes={}",
            config.backend_port,
            config.frontend_port,
            config.health_timeout,
            config.open_browser,
            config.no_progress,
            config.api_url,
            config.max_upload_bytes
        );
        Ok(config)
    }
}
