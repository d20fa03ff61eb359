use std::io;
use std::path::PathBuf;

/// 啟動流程的錯誤分類
///
/// `PackageManagerNotFound`、`HealthCheckTimeout` 與 `BrowserLaunchFailed`
/// 在流程中只記錄警告，其餘都會中止流程。
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("找不到可用的 Python 直譯器（嘗試過：{tried}）")]
    EnvironmentNotFound { tried: String },

    #[error("安裝依賴套件 '{package}' 失敗（結束碼：{code:?}）")]
    DependencyInstallFailed { package: String, code: Option<i32> },

    #[error("找不到可用的前端套件管理器（嘗試過：{tried}）")]
    PackageManagerNotFound { tried: String },

    #[error("前端指令 '{command}' 執行失敗（結束碼：{code:?}）")]
    BuildFailed { command: String, code: Option<i32> },

    #[error("等待 {url} 健康檢查逾時（{waited_secs} 秒）")]
    HealthCheckTimeout { url: String, waited_secs: u64 },

    #[error("無法開啟瀏覽器：{0}")]
    BrowserLaunchFailed(String),

    #[error("無法啟動程序 '{name}'：{source}")]
    Spawn {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("程序 '{name}' 在執行中自行結束（結束碼：{code:?}）")]
    ProcessExited { name: String, code: Option<i32> },

    #[error("建立隔離環境 {path} 失敗（結束碼：{code:?}）")]
    EnvironmentCreateFailed { path: PathBuf, code: Option<i32> },

    #[error("IO 錯誤：{0}")]
    Io(#[from] io::Error),
}

impl BootstrapError {
    /// 是否為必須中止流程的錯誤
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            BootstrapError::PackageManagerNotFound { .. }
                | BootstrapError::HealthCheckTimeout { .. }
                | BootstrapError::BrowserLaunchFailed(_)
        )
    }
}

impl From<BootstrapError> for io::Error {
    fn from(err: BootstrapError) -> Self {
        match err {
            BootstrapError::Io(e) => e,
            BootstrapError::Spawn { source, .. } => source,
            other => io::Error::new(io::ErrorKind::Other, other.to_string()),
        }
    }
}

/// 轉換客戶端的錯誤分類，不會自動重試
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("不支援的檔案類型：{extension}，允許：{allowed}")]
    UnsupportedFileType { extension: String, allowed: String },

    #[error("檔案 '{filename}' 過大（{size} 位元組），上限為 {limit} 位元組")]
    FileTooLarge {
        filename: String,
        size: usize,
        limit: usize,
    },

    #[error("檔案 '{filename}' 是空的")]
    EmptyFile { filename: String },

    #[error("至少需要一個 Markdown 檔案")]
    NoInputFiles,

    /// 伺服器回傳的原始錯誤文字，不做任何加工
    #[error("{body}")]
    ServerError { status: u16, body: String },

    #[error("回應包含 {count} 個檔案但缺少壓縮檔")]
    MissingArchive { count: usize },

    #[error("回應內容無效：{0}")]
    InvalidPayload(String),

    #[error("HTTP 請求失敗：{0}")]
    Http(#[from] reqwest::Error),

    #[error("IO 錯誤：{0}")]
    Io(#[from] io::Error),
}

impl From<ConvertError> for io::Error {
    fn from(err: ConvertError) -> Self {
        match err {
            ConvertError::Io(e) => e,
            ConvertError::UnsupportedFileType { .. }
            | ConvertError::FileTooLarge { .. }
            | ConvertError::EmptyFile { .. }
            | ConvertError::NoInputFiles => io::Error::new(io::ErrorKind::InvalidInput, err.to_string()),
            other => io::Error::new(io::ErrorKind::Other, other.to_string()),
        }
    }
}
