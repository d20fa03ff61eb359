use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::process::Stdio;
use async_trait::async_trait;
use chrono::Local;
use log::{debug, error};
use tokio::process::{Child, Command};
use crate::models::command::{CommandOutcome, CommandSpec};
use crate::service::traits::i_service::CommandRunnerTrait;

/// 透過作業系統執行指令
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        SystemCommandRunner
    }
}

impl Default for SystemCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

fn build_command(spec: &CommandSpec) -> Command {
    let mut command = Command::new(&spec.program);
    command.args(&spec.args);
    if let Some(ref cwd) = spec.cwd {
        command.current_dir(cwd);
    }
    for (key, value) in &spec.envs {
        command.env(key, value);
    }
    command
}

#[async_trait]
impl CommandRunnerTrait for SystemCommandRunner {
    async fn probe(&self, spec: &CommandSpec) -> bool {
        let status = build_command(spec)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await;
        match status {
            Ok(status) => status.success(),
            Err(e) => {
                debug!("探測 {} 失敗：{}", spec, e);
                false
            }
        }
    }

    async fn run(&self, spec: &CommandSpec) -> io::Result<CommandOutcome> {
        debug!("執行：{}", spec);
        // 中斷時 future 被丟棄，子程序跟著結束
        let output = build_command(spec)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await?;
        let outcome = CommandOutcome::from(output.status);
        if outcome.success {
            debug!("{} 輸出：{}", spec, String::from_utf8_lossy(&output.stdout).trim());
        } else {
            error!(
                "{} 結束碼 {:?}，錯誤輸出：{}",
                spec,
                outcome.code,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(outcome)
    }

    fn spawn(&self, spec: &CommandSpec, log_path: &Path) -> io::Result<Child> {
        let mut log_file = OpenOptions::new().create(true).append(true).open(log_path)?;
        writeln!(
            log_file,
            "===== {} 啟動：{} =====",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            spec
        )?;
        let stderr_file = log_file.try_clone()?;

        let mut command = build_command(spec);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::from(log_file))
            .stderr(Stdio::from(stderr_file))
            .kill_on_drop(true);
        // 獨立的程序群組，終端機的 Ctrl-C 只送到啟動器，由它統一關閉
        #[cfg(unix)]
        command.process_group(0);
        command.spawn()
    }
}
