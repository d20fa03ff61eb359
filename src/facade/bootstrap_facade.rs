use std::future::Future;
use async_trait::async_trait;
use log::{error, info, warn};
use crate::config::ports::AppConfig;
use crate::error::BootstrapError;
use crate::facade::traits::i_bootstrap::BootstrapFacadeTrait;
use crate::models::command::CommandSpec;
use crate::models::environment::EnvironmentDescriptor;
use crate::models::state::BootstrapState;
use crate::service::browser::open_browser;
use crate::service::frontend::{
    frontend_start_command, install_and_build_frontend, package_manager_candidates, resolve_package_manager,
};
use crate::service::health::await_health;
use crate::service::process::{start_backend, start_frontend, ProcessGroup};
use crate::service::runtime::{ensure_isolated_environment, install_dependencies, resolve_runtime, runtime_candidates};
use crate::service::traits::i_service::CommandRunnerTrait;
use crate::utils::utils::ProgressManager;

/// 啟動器：依序準備環境、啟動兩個程序並在結束時統一關閉
pub struct BootstrapFacade {
    config: AppConfig,
    env: EnvironmentDescriptor,
    runner: Box<dyn CommandRunnerTrait>,
    http: reqwest::Client,
    runtime_candidates: Vec<CommandSpec>,
    manager_candidates: Vec<CommandSpec>,
    state: BootstrapState,
    history: Vec<BootstrapState>,
    processes: ProcessGroup,
}

impl BootstrapFacade {
    pub fn new(config: AppConfig, runner: Box<dyn CommandRunnerTrait>) -> Self {
        let env = EnvironmentDescriptor::from_config(&config);
        BootstrapFacade {
            config,
            env,
            runner,
            http: reqwest::Client::new(),
            runtime_candidates: runtime_candidates(),
            manager_candidates: package_manager_candidates(),
            state: BootstrapState::Idle,
            history: vec![BootstrapState::Idle],
            processes: ProcessGroup::new(),
        }
    }

    pub fn with_candidates(mut self, runtime: Vec<CommandSpec>, managers: Vec<CommandSpec>) -> Self {
        self.runtime_candidates = runtime;
        self.manager_candidates = managers;
        self
    }

    pub fn history(&self) -> &[BootstrapState] {
        &self.history
    }

    pub fn processes_mut(&mut self) -> &mut ProcessGroup {
        &mut self.processes
    }

    fn transition(&mut self, next: BootstrapState) {
        info!("狀態：{} → {}", self.state, next);
        self.state = next;
        self.history.push(next);
    }

    /// 執行流程直到 `shutdown` 完成或任一程序結束，之後一定會關閉已啟動的程序
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<(), BootstrapError>
    where
        F: Future<Output = ()> + Send,
    {
        let result = tokio::select! {
            result = self.run_sequence() => result,
            _ = shutdown => {
                info!("收到中斷訊號，準備關閉");
                Ok(())
            }
        };
        if let Err(ref e) = result {
            error!("啟動流程中止：{}", e);
        }
        self.teardown().await;
        result
    }

    async fn run_sequence(&mut self) -> Result<(), BootstrapError> {
        let manager = self.prepare().await?;
        self.launch(manager).await?;
        self.transition(BootstrapState::Running);
        info!("後端：{}，前端：{}，按 Ctrl-C 結束", self.config.backend_url(), self.config.frontend_url());

        let (name, status) = self.processes.wait_any_exit().await?;
        warn!("{} 已自行結束（{}），關閉其餘程序", name, status);
        Err(BootstrapError::ProcessExited {
            name,
            code: status.code(),
        })
    }

    /// 準備階段：直譯器、虛擬環境、後端依賴、前端建置
    async fn prepare(&mut self) -> Result<Option<CommandSpec>, BootstrapError> {
        let no_progress = self.config.no_progress;

        let python = resolve_runtime(self.runner.as_ref(), &self.runtime_candidates).await?;
        self.transition(BootstrapState::RuntimeResolved);

        ensure_isolated_environment(self.runner.as_ref(), &python, &self.env.venv_dir).await?;
        self.transition(BootstrapState::EnvironmentReady);

        let pm = ProgressManager::spinner("安裝後端依賴", no_progress);
        match install_dependencies(self.runner.as_ref(), &self.config.requirements_path(), &self.env).await {
            Ok(Some(count)) => pm.finish(&format!("已安裝 {} 個後端依賴", count)),
            Ok(None) => pm.finish("未找到依賴清單"),
            Err(e) => {
                pm.abandon("後端依賴安裝失敗");
                return Err(e);
            }
        }
        self.transition(BootstrapState::DependenciesInstalled);

        let manager = match resolve_package_manager(self.runner.as_ref(), &self.manager_candidates).await {
            Ok(manager) => manager,
            Err(e) if !e.is_fatal() => {
                warn!("{}，略過前端步驟，只啟動後端", e);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let pm = ProgressManager::spinner("建置前端", no_progress);
        match install_and_build_frontend(self.runner.as_ref(), &self.env.frontend_dir, &manager).await {
            Ok(true) => {
                pm.finish("前端建置完成");
                self.transition(BootstrapState::FrontendBuilt);
                Ok(Some(manager))
            }
            Ok(false) => {
                pm.finish("沒有可建置的前端");
                Ok(None)
            }
            Err(e) => {
                pm.abandon("前端建置失敗");
                Err(e)
            }
        }
    }

    /// 啟動階段：後端、健康檢查、前端、瀏覽器
    async fn launch(&mut self, manager: Option<CommandSpec>) -> Result<(), BootstrapError> {
        let backend = start_backend(
            self.runner.as_ref(),
            &self.env,
            &self.config.backend_host,
            self.config.backend_port,
            &self.config.backend_log_path(),
        )?;
        self.processes.push(backend);
        self.transition(BootstrapState::BackendStarted);

        let health_url = self.config.health_url();
        let pm = ProgressManager::spinner(&format!("等待後端就緒：{}", health_url), self.config.no_progress);
        match await_health(&self.http, &health_url, self.config.health_timeout, self.config.health_interval).await {
            Ok(elapsed) => {
                pm.finish("後端已就緒");
                info!("後端在 {:.1} 秒內就緒", elapsed.as_secs_f64());
                self.transition(BootstrapState::BackendHealthy);
            }
            Err(e) => {
                pm.abandon("後端健康檢查逾時");
                warn!("{}，後端可能仍在啟動中，繼續流程", e);
                self.transition(BootstrapState::HealthTimedOut);
            }
        }

        let browser_url = match manager {
            Some(manager) => {
                let spec = frontend_start_command(&manager, &self.env.frontend_dir, self.config.frontend_port);
                let frontend = start_frontend(self.runner.as_ref(), spec, &self.config.frontend_log_path())?;
                self.processes.push(frontend);
                self.transition(BootstrapState::FrontendStarted);
                self.config.frontend_url()
            }
            None => self.config.backend_url(),
        };

        if self.config.open_browser {
            match open_browser(&browser_url) {
                Ok(()) => self.transition(BootstrapState::BrowserOpened),
                Err(e) => warn!("{}，請手動開啟 {}", e, browser_url),
            }
        }
        Ok(())
    }

    /// 關閉所有已啟動的程序
    pub async fn teardown(&mut self) {
        self.transition(BootstrapState::Terminating);
        if !self.processes.is_empty() {
            info!("關閉程序：{}", self.processes.names().join(", "));
            self.processes.teardown().await;
        }
        self.transition(BootstrapState::Stopped);
    }
}

/// 等待 Ctrl-C；Unix 上也接受 SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("無法監聽 Ctrl-C：{}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("無法監聽 SIGTERM：{}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

#[async_trait]
impl BootstrapFacadeTrait for BootstrapFacade {
    async fn run_until_interrupted(&mut self) -> Result<(), BootstrapError> {
        self.run_until(shutdown_signal()).await
    }

    fn state(&self) -> BootstrapState {
        self.state
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;
    use crate::service::command::fake::FakeCommandRunner;
    use crate::service::config_service::DefaultConfigAdapter;
    use crate::config::ports::ConfigPort;
    use crate::models::state::BootstrapState::*;

    fn test_config(root: &Path) -> AppConfig {
        let mut config = DefaultConfigAdapter::new(root.to_path_buf()).get_config().unwrap();
        // 沒有人監聽的埠，健康檢查會很快逾時
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        config.backend_port = listener.local_addr().unwrap().port();
        drop(listener);
        config.health_timeout = Duration::from_millis(300);
        config.health_interval = Duration::from_millis(50);
        config.open_browser = false;
        config.no_progress = true;
        config
    }

    fn project(with_frontend: bool) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("backend")).unwrap();
        std::fs::write(dir.path().join("backend").join("requirements.txt"), "fastapi\nuvicorn\n").unwrap();
        if with_frontend {
            std::fs::create_dir_all(dir.path().join("frontend")).unwrap();
            std::fs::write(dir.path().join("frontend").join("package.json"), "{}").unwrap();
        }
        dir
    }

    fn facade(root: &Path, runner: FakeCommandRunner) -> BootstrapFacade {
        BootstrapFacade::new(test_config(root), Box::new(runner)).with_candidates(
            vec![CommandSpec::new("python3"), CommandSpec::new("python")],
            vec![CommandSpec::new("npm"), CommandSpec::new("yarn")],
        )
    }

    #[tokio::test]
    async fn interrupt_after_launch_stops_both_processes() {
        let dir = project(true);
        let runner = FakeCommandRunner::with_available(&["python", "npm"]);
        let mut facade = facade(dir.path(), runner);

        let interrupted = Arc::new(tokio::sync::Notify::new());
        let trigger = interrupted.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(1500)).await;
            trigger.notify_one();
        });

        facade.run_until(async move { interrupted.notified().await }).await.unwrap();

        assert_eq!(facade.processes_mut().names(), vec!["backend", "frontend"]);
        assert!(facade.processes_mut().all_exited().unwrap());
        assert_eq!(
            facade.history(),
            &[
                Idle,
                RuntimeResolved,
                EnvironmentReady,
                DependenciesInstalled,
                FrontendBuilt,
                BackendStarted,
                HealthTimedOut,
                FrontendStarted,
                Running,
                Terminating,
                Stopped,
            ]
        );
        assert!(dir.path().join("backend.log").exists());
        assert!(dir.path().join("frontend.log").exists());
        assert!(dir.path().join("backend").join("venv").exists());
    }

    #[tokio::test]
    async fn missing_python_aborts_before_any_process() {
        let dir = project(true);
        let runner = FakeCommandRunner::with_available(&["npm"]);
        let mut facade = facade(dir.path(), runner);

        let err = facade.run_until(std::future::pending::<()>()).await.unwrap_err();
        assert!(matches!(err, BootstrapError::EnvironmentNotFound { .. }));
        assert!(facade.processes_mut().is_empty());
        assert_eq!(facade.history(), &[Idle, Terminating, Stopped]);
    }

    #[tokio::test]
    async fn build_failure_aborts_before_backend_starts() {
        let dir = project(true);
        let runner = FakeCommandRunner::with_available(&["python3", "npm"]).failing_on("run build");
        let mut facade = facade(dir.path(), runner);

        let err = facade.run_until(std::future::pending::<()>()).await.unwrap_err();
        assert!(matches!(err, BootstrapError::BuildFailed { .. }));
        assert!(facade.processes_mut().is_empty());
        assert!(!facade.history().contains(&BackendStarted));
    }

    #[tokio::test]
    async fn without_package_manager_only_backend_runs() {
        let dir = project(true);
        let runner = FakeCommandRunner::with_available(&["python3"]);
        let mut facade = facade(dir.path(), runner);

        facade
            .run_until(tokio::time::sleep(Duration::from_millis(1200)))
            .await
            .unwrap();
        assert_eq!(facade.processes_mut().names(), vec!["backend"]);
        assert!(facade.processes_mut().all_exited().unwrap());
        assert!(!facade.history().contains(&FrontendBuilt));
        assert!(!facade.history().contains(&FrontendStarted));
        assert_eq!(facade.state(), Stopped);
    }

    #[tokio::test]
    async fn process_exiting_on_its_own_is_an_error() {
        let dir = project(false);
        let runner = FakeCommandRunner::with_available(&["python3"]).exiting_with(3);
        let mut facade = facade(dir.path(), runner);

        let err = facade.run_until(std::future::pending::<()>()).await.unwrap_err();
        match err {
            BootstrapError::ProcessExited { name, code } => {
                assert_eq!(name, "backend");
                assert_eq!(code, Some(3));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(facade.history().contains(&Running));
        assert_eq!(facade.state(), Stopped);
    }

    #[tokio::test]
    async fn interrupt_during_build_kills_the_build() {
        let dir = project(true);
        let runner = SlowBuildRunner {
            inner: FakeCommandRunner::with_available(&["python3", "npm"]),
            marker_dir: dir.path().to_path_buf(),
        };
        let mut facade = BootstrapFacade::new(test_config(dir.path()), Box::new(runner))
            .with_candidates(vec![CommandSpec::new("python3")], vec![CommandSpec::new("npm")]);

        facade
            .run_until(tokio::time::sleep(Duration::from_millis(200)))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(!dir.path().join("built").exists());
        assert!(!facade.history().contains(&BackendStarted));
        assert!(facade.processes_mut().is_empty());
        assert_eq!(facade.state(), Stopped);
    }

    #[tokio::test]
    async fn existing_venv_is_reused() {
        let dir = project(false);
        std::fs::create_dir_all(dir.path().join("backend").join("venv")).unwrap();
        let runner = Arc::new(FakeCommandRunner::with_available(&["python3"]));
        let mut facade = BootstrapFacade::new(test_config(dir.path()), Box::new(SharedRunner(runner.clone())))
            .with_candidates(vec![CommandSpec::new("python3")], vec![CommandSpec::new("npm")]);

        facade
            .run_until(tokio::time::sleep(Duration::from_millis(800)))
            .await
            .unwrap();
        assert_eq!(runner.runs_matching("-m venv"), 0);
        assert_eq!(runner.runs_matching("-m pip install"), 2);
    }

    // 建置步驟改跑真正的慢指令，其餘交給假執行器
    struct SlowBuildRunner {
        inner: FakeCommandRunner,
        marker_dir: std::path::PathBuf,
    }

    #[async_trait]
    impl CommandRunnerTrait for SlowBuildRunner {
        async fn probe(&self, spec: &CommandSpec) -> bool {
            self.inner.probe(spec).await
        }

        async fn run(&self, spec: &CommandSpec) -> std::io::Result<crate::models::command::CommandOutcome> {
            if spec.to_string().contains("run build") {
                let slow = CommandSpec::new("sh")
                    .args(["-c", "sleep 1; touch built"])
                    .current_dir(&self.marker_dir);
                return crate::service::command::SystemCommandRunner::new().run(&slow).await;
            }
            self.inner.run(spec).await
        }

        fn spawn(&self, spec: &CommandSpec, log_path: &Path) -> std::io::Result<tokio::process::Child> {
            self.inner.spawn(spec, log_path)
        }
    }

    struct SharedRunner(Arc<FakeCommandRunner>);

    #[async_trait]
    impl CommandRunnerTrait for SharedRunner {
        async fn probe(&self, spec: &CommandSpec) -> bool {
            self.0.probe(spec).await
        }

        async fn run(&self, spec: &CommandSpec) -> std::io::Result<crate::models::command::CommandOutcome> {
            self.0.run(spec).await
        }

        fn spawn(&self, spec: &CommandSpec, log_path: &Path) -> std::io::Result<tokio::process::Child> {
            self.0.spawn(spec, log_path)
        }
    }
}
