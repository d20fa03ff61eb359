use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser, Clone, Debug)]
#[command(
    name = "md_utility",
    about = "啟動 Markdown ⇄ Word/PDF 轉換工具的後端與前端",
    long_about = "不帶參數執行時會依序：尋找 Python、建立虛擬環境、安裝依賴、建置前端、啟動後端、等待健康檢查、啟動前端並開啟瀏覽器。\n按 Ctrl-C 結束時會一併關閉兩個程序。\n使用 `convert` 子命令可直接呼叫轉換 API。"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
    /// 專案根目錄（預設為目前目錄）
    #[arg(long, global = true)]
    pub project_root: Option<PathBuf>,
    #[arg(long)]
    pub backend_port: Option<u16>,
    #[arg(long)]
    pub frontend_port: Option<u16>,
    /// 健康檢查逾時秒數
    #[arg(long)]
    pub health_timeout: Option<u64>,
    /// 不自動開啟瀏覽器
    #[arg(long)]
    pub no_browser: bool,
    #[arg(long, global = true)]
    pub no_progress: bool,
    #[arg(long, global = true, value_parser = ["debug", "info", "warn", "error"])]
    pub log_level: Option<String>,
    /// 轉換 API 的位址（預設為本機後端）
    #[arg(long, global = true)]
    pub api_url: Option<String>,
    /// 上傳檔案大小上限（MB）
    #[arg(long, global = true)]
    pub max_upload_mb: Option<f64>,
}

#[derive(Subcommand, Clone, Debug, PartialEq)]
pub enum Command {
    /// 呼叫轉換 API
    Convert {
        #[command(subcommand)]
        direction: ConvertCommand,
    },
    /// 顯示後端健康狀態
    Health,
    /// 下載範例樣式範本
    SampleTheme {
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
    },
}

#[derive(Subcommand, Clone, Debug, PartialEq)]
pub enum ConvertCommand {
    /// Word/PDF 轉 Markdown
    ToMd {
        input: PathBuf,
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
    },
    /// Markdown 轉 Word
    ToWord {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        #[arg(long)]
        theme: Option<PathBuf>,
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
    },
}

pub fn validate_project_root(root: &Path) -> io::Result<PathBuf> {
    if !root.is_dir() {
        log::error!("專案根目錄不存在：{}", root.display());
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("專案根目錄 '{}' 不存在", root.display()),
        ));
    }
    root.canonicalize()
}

pub fn validate_input_path(input: &Path) -> io::Result<&Path> {
    if !input.is_file() {
        log::error!("輸入檔案不存在：{}", input.display());
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("輸入檔案 '{}' 不存在", input.display()),
        ));
    }
    Ok(input)
}
