use log::info;
use crate::error::BootstrapError;

/// 以系統預設瀏覽器開啟網址，失敗只回報不中止
pub fn open_browser(url: &str) -> Result<(), BootstrapError> {
    info!("開啟瀏覽器：{}", url);
    open::that_detached(url).map_err(|e| BootstrapError::BrowserLaunchFailed(format!("{}：{}", url, e)))
}
