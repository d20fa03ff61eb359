use std::path::Path;
use log::{info, warn};
use crate::error::BootstrapError;
use crate::models::command::CommandSpec;
use crate::service::traits::i_service::CommandRunnerTrait;

/// 前端套件管理器候選清單，依優先順序排列
pub fn package_manager_candidates() -> Vec<CommandSpec> {
    let names: [&str; 3] = if cfg!(windows) {
        ["npm.cmd", "pnpm.cmd", "yarn.cmd"]
    } else {
        ["npm", "pnpm", "yarn"]
    };
    names.iter().map(|n| CommandSpec::new(*n)).collect()
}

pub async fn resolve_package_manager(
    runner: &dyn CommandRunnerTrait,
    candidates: &[CommandSpec],
) -> Result<CommandSpec, BootstrapError> {
    for candidate in candidates {
        if runner.probe(&candidate.clone().arg("--version")).await {
            info!("使用前端套件管理器：{}", candidate);
            return Ok(candidate.clone());
        }
    }
    let tried = candidates.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(", ");
    Err(BootstrapError::PackageManagerNotFound { tried })
}

/// 安裝前端依賴並建置正式版本。沒有 package.json 時回傳 false
pub async fn install_and_build_frontend(
    runner: &dyn CommandRunnerTrait,
    frontend_dir: &Path,
    manager: &CommandSpec,
) -> Result<bool, BootstrapError> {
    if !frontend_dir.join("package.json").exists() {
        warn!("{} 中沒有 package.json，跳過前端建置", frontend_dir.display());
        return Ok(false);
    }

    let steps = [
        manager.clone().arg("install").current_dir(frontend_dir),
        manager.clone().args(["run", "build"]).current_dir(frontend_dir),
    ];
    for step in &steps {
        info!("執行前端指令：{}", step);
        let outcome = runner.run(step).await?;
        if !outcome.success {
            return Err(BootstrapError::BuildFailed {
                command: step.to_string(),
                code: outcome.code,
            });
        }
    }
    Ok(true)
}

pub fn frontend_start_command(manager: &CommandSpec, frontend_dir: &Path, port: u16) -> CommandSpec {
    manager
        .clone()
        .args(["run", "start"])
        .current_dir(frontend_dir)
        .env("PORT", port.to_string())
}
