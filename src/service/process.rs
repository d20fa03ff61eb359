use std::io;
use std::path::Path;
use std::process::ExitStatus;
use std::time::Duration;
use log::{debug, info, warn};
use tokio::process::{Child, Command};
use crate::error::BootstrapError;
use crate::models::command::CommandSpec;
use crate::models::environment::EnvironmentDescriptor;
use crate::service::traits::i_service::CommandRunnerTrait;

const TERMINATE_GRACE: Duration = Duration::from_secs(5);
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// 由啟動器擁有的子程序
pub struct ManagedProcess {
    name: String,
    command: CommandSpec,
    child: Child,
}

impl ManagedProcess {
    pub fn new(name: impl Into<String>, command: CommandSpec, child: Child) -> Self {
        ManagedProcess {
            name: name.into(),
            command,
            child,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// 已結束時回傳結束狀態
    pub fn try_exit_status(&mut self) -> io::Result<Option<ExitStatus>> {
        self.child.try_wait()
    }

    /// 先送出溫和的終止訊號，寬限時間過後強制結束
    pub async fn terminate(&mut self, grace: Duration) -> io::Result<ExitStatus> {
        if let Some(status) = self.child.try_wait()? {
            debug!("{} 已自行結束：{}", self.name, status);
            return Ok(status);
        }
        if let Some(pid) = self.child.id() {
            signal_tree(pid).await;
        }
        match tokio::time::timeout(grace, self.child.wait()).await {
            Ok(status) => status,
            Err(_) => {
                warn!("{} 在 {} 秒內未結束，強制終止", self.name, grace.as_secs());
                self.child.start_kill()?;
                self.child.wait().await
            }
        }
    }
}

// 終止整個程序樹，npm 之類的包裝程式底下還有真正的伺服器
#[cfg(unix)]
async fn signal_tree(pid: u32) {
    let group = format!("-{}", pid);
    let result = Command::new("kill").args(["-TERM", "--", group.as_str()]).status().await;
    if let Err(e) = result {
        debug!("送出 SIGTERM 給程序群組 {} 失敗：{}", pid, e);
    }
}

#[cfg(windows)]
async fn signal_tree(pid: u32) {
    let pid = pid.to_string();
    let result = Command::new("taskkill").args(["/PID", pid.as_str(), "/T", "/F"]).status().await;
    if let Err(e) = result {
        debug!("taskkill {} 失敗：{}", pid, e);
    }
}

/// 啟動器擁有的程序集合，統一由 teardown 關閉
#[derive(Default)]
pub struct ProcessGroup {
    processes: Vec<ManagedProcess>,
}

impl ProcessGroup {
    pub fn new() -> Self {
        ProcessGroup { processes: Vec::new() }
    }

    pub fn push(&mut self, process: ManagedProcess) {
        info!("{} 已啟動（PID {:?}）：{}", process.name, process.id(), process.command);
        self.processes.push(process);
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.processes.iter().map(|p| p.name()).collect()
    }

    /// 所有程序都已結束
    pub fn all_exited(&mut self) -> io::Result<bool> {
        for process in &mut self.processes {
            if process.try_exit_status()?.is_none() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// 等到任一程序自行結束，回傳其名稱與狀態。沒有程序時永遠不會完成
    pub async fn wait_any_exit(&mut self) -> io::Result<(String, ExitStatus)> {
        if self.processes.is_empty() {
            std::future::pending::<()>().await;
        }
        loop {
            for process in &mut self.processes {
                if let Some(status) = process.try_exit_status()? {
                    return Ok((process.name.clone(), status));
                }
            }
            tokio::time::sleep(EXIT_POLL_INTERVAL).await;
        }
    }

    /// 依啟動的反向順序終止所有程序，可重複呼叫
    pub async fn teardown(&mut self) {
        for process in self.processes.iter_mut().rev() {
            match process.terminate(TERMINATE_GRACE).await {
                Ok(status) => info!("{} 已停止：{}", process.name, status),
                Err(e) => warn!("停止 {} 失敗：{}", process.name, e),
            }
        }
    }
}

pub fn backend_command(env: &EnvironmentDescriptor, host: &str, port: u16) -> CommandSpec {
    CommandSpec::new(env.venv_python())
        .args(["-m", "uvicorn", "app.main:app", "--host", host, "--port"])
        .arg(port.to_string())
        .current_dir(&env.backend_dir)
}

/// 在背景啟動後端，不等待就緒
pub fn start_backend(
    runner: &dyn CommandRunnerTrait,
    env: &EnvironmentDescriptor,
    host: &str,
    port: u16,
    log_path: &Path,
) -> Result<ManagedProcess, BootstrapError> {
    let spec = backend_command(env, host, port);
    spawn_managed(runner, "backend", spec, log_path)
}

/// 在背景啟動前端正式伺服器，不等待就緒
pub fn start_frontend(
    runner: &dyn CommandRunnerTrait,
    spec: CommandSpec,
    log_path: &Path,
) -> Result<ManagedProcess, BootstrapError> {
    spawn_managed(runner, "frontend", spec, log_path)
}

fn spawn_managed(
    runner: &dyn CommandRunnerTrait,
    name: &str,
    spec: CommandSpec,
    log_path: &Path,
) -> Result<ManagedProcess, BootstrapError> {
    let child = runner.spawn(&spec, log_path).map_err(|source| BootstrapError::Spawn {
        name: name.to_string(),
        source,
    })?;
    info!("{} 輸出寫入：{}", name, log_path.display());
    Ok(ManagedProcess::new(name, spec, child))
}
