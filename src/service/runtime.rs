use std::path::Path;
use log::{info, warn};
use crate::error::BootstrapError;
use crate::models::command::CommandSpec;
use crate::models::environment::EnvironmentDescriptor;
use crate::service::traits::i_service::CommandRunnerTrait;
use crate::utils::manifest::read_manifest;

/// Python 直譯器候選清單，依優先順序排列
pub fn runtime_candidates() -> Vec<CommandSpec> {
    if cfg!(windows) {
        vec![
            CommandSpec::new("python"),
            CommandSpec::new("py").arg("-3"),
            CommandSpec::new("python3"),
        ]
    } else {
        vec![
            CommandSpec::new("python3"),
            CommandSpec::new("python"),
            CommandSpec::new("py").arg("-3"),
        ]
    }
}

/// 回傳第一個可用的候選直譯器
pub async fn resolve_runtime(
    runner: &dyn CommandRunnerTrait,
    candidates: &[CommandSpec],
) -> Result<CommandSpec, BootstrapError> {
    for candidate in candidates {
        if runner.probe(&candidate.clone().arg("--version")).await {
            info!("使用 Python 直譯器：{}", candidate);
            return Ok(candidate.clone());
        }
    }
    let tried = candidates.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(", ");
    Err(BootstrapError::EnvironmentNotFound { tried })
}

/// 目錄不存在時建立虛擬環境；已存在則沿用。回傳是否有建立
pub async fn ensure_isolated_environment(
    runner: &dyn CommandRunnerTrait,
    python: &CommandSpec,
    venv_dir: &Path,
) -> Result<bool, BootstrapError> {
    if venv_dir.exists() {
        info!("沿用既有虛擬環境：{}", venv_dir.display());
        return Ok(false);
    }
    info!("建立虛擬環境：{}", venv_dir.display());
    let spec = python
        .clone()
        .args(["-m", "venv"])
        .arg(venv_dir.to_string_lossy());
    let outcome = runner.run(&spec).await?;
    if !outcome.success {
        return Err(BootstrapError::EnvironmentCreateFailed {
            path: venv_dir.to_path_buf(),
            code: outcome.code,
        });
    }
    Ok(true)
}

/// 逐一安裝依賴清單中的套件，任一失敗即中止。清單不存在時回傳 None
pub async fn install_dependencies(
    runner: &dyn CommandRunnerTrait,
    manifest_path: &Path,
    env: &EnvironmentDescriptor,
) -> Result<Option<usize>, BootstrapError> {
    let manifest = match read_manifest(manifest_path)? {
        Some(manifest) => manifest,
        None => {
            warn!("找不到依賴清單 {}，跳過安裝，轉換功能可能無法使用", manifest_path.display());
            return Ok(None);
        }
    };
    info!("安裝 {} 個依賴套件", manifest.requirements.len());

    let python = env.venv_python();
    for requirement in &manifest.requirements {
        let spec = CommandSpec::new(&python)
            .args(["-m", "pip", "install"])
            .args(&manifest.pip_options)
            .args(&requirement.args)
            .current_dir(&env.backend_dir);
        let outcome = runner.run(&spec).await?;
        if !outcome.success {
            return Err(BootstrapError::DependencyInstallFailed {
                package: requirement.name.clone(),
                code: outcome.code,
            });
        }
        info!("已安裝：{}", requirement);
    }
    Ok(Some(manifest.requirements.len()))
}
