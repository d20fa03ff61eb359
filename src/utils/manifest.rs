use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use log::{debug, warn};
use regex::Regex;

// 原樣轉交給 pip 的選項
const PASS_THROUGH_OPTIONS: [&str; 11] = [
    "-i",
    "--index-url",
    "--extra-index-url",
    "-f",
    "--find-links",
    "--trusted-host",
    "--pre",
    "--no-index",
    "--prefer-binary",
    "--only-binary",
    "--no-binary",
];

/// 一個要安裝的依賴，`args` 直接接在 `pip install` 後面
#[derive(Debug, Clone, PartialEq)]
pub struct Requirement {
    pub name: String,
    pub args: Vec<String>,
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.args.join(" "))
    }
}

/// 展開 `-r` 引用後的完整依賴清單
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Manifest {
    pub requirements: Vec<Requirement>,
    /// 每次安裝都要帶上的 pip 選項（索引位址、`-c` 限制檔等）
    pub pip_options: Vec<String>,
}

fn requirement_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z0-9][A-Za-z0-9._-]*)").expect("valid requirement regex")
    })
}

fn strip_comment(line: &str) -> &str {
    match line.find(" #") {
        Some(idx) => &line[..idx],
        None => line,
    }
    .trim()
}

fn split_option(line: &str) -> (&str, Option<&str>) {
    if let Some((flag, value)) = line.split_once(char::is_whitespace) {
        return (flag, Some(value.trim()));
    }
    if line.starts_with("--") {
        if let Some((flag, value)) = line.split_once('=') {
            return (flag, Some(value.trim()));
        }
    }
    (line, None)
}

fn parse_requirement(line: &str) -> Requirement {
    let name = requirement_regex()
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| line.to_string());
    Requirement {
        name,
        args: vec![line.to_string()],
    }
}

fn resolve_editable(base: &Path, target: &str) -> String {
    if target.contains("://") || target.starts_with("git+") {
        target.to_string()
    } else {
        base.join(target).to_string_lossy().to_string()
    }
}

fn collect_manifest(path: &Path, manifest: &mut Manifest, visited: &mut HashSet<PathBuf>) -> io::Result<()> {
    let canonical = path.canonicalize().map_err(|e| {
        io::Error::new(e.kind(), format!("無法讀取依賴清單 {}：{}", path.display(), e))
    })?;
    if !visited.insert(canonical.clone()) {
        warn!("依賴清單 {} 已引用過，略過", canonical.display());
        return Ok(());
    }
    let base = canonical.parent().map(Path::to_path_buf).unwrap_or_default();
    let content = fs::read_to_string(&canonical)?;

    for raw in content.lines() {
        let line = strip_comment(raw);
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if !line.starts_with('-') {
            manifest.requirements.push(parse_requirement(line));
            continue;
        }

        let (flag, value) = split_option(line);
        let missing_value = || {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{} 中的選項 {} 缺少參數", canonical.display(), flag),
            )
        };
        match flag {
            "-r" | "--requirement" => {
                let target = value.ok_or_else(missing_value)?;
                debug!("展開引用的依賴清單：{}", target);
                collect_manifest(&base.join(target), manifest, visited)?;
            }
            "-c" | "--constraint" => {
                let target = value.ok_or_else(missing_value)?;
                manifest.pip_options.push("-c".to_string());
                manifest.pip_options.push(base.join(target).to_string_lossy().to_string());
            }
            "-e" | "--editable" => {
                let target = value.ok_or_else(missing_value)?;
                manifest.requirements.push(Requirement {
                    name: target.to_string(),
                    args: vec!["-e".to_string(), resolve_editable(&base, target)],
                });
            }
            known if PASS_THROUGH_OPTIONS.contains(&known) => {
                manifest.pip_options.push(known.to_string());
                if let Some(value) = value {
                    manifest.pip_options.push(value.to_string());
                }
            }
            _ => warn!("{} 中不支援的選項，略過：{}", canonical.display(), line),
        }
    }
    Ok(())
}

/// 讀取依賴清單並遞迴展開 `-r` 引用，檔案不存在時回傳 None
pub fn read_manifest(path: &Path) -> io::Result<Option<Manifest>> {
    if !path.exists() {
        return Ok(None);
    }
    let mut manifest = Manifest::default();
    let mut visited = HashSet::new();
    collect_manifest(path, &mut manifest, &mut visited)?;
    Ok(Some(manifest))
}
