use async_trait::async_trait;
use crate::error::BootstrapError;
use crate::models::state::BootstrapState;

// Facade 接口，負責協調整個啟動流程
#[async_trait]
pub trait BootstrapFacadeTrait: Send {
    /// 執行完整啟動流程，直到收到中斷訊號或任一程序結束
    /// # 回傳
    /// - 正常結束時返回 Ok；必要步驟失敗時返回錯誤，已啟動的程序一律會被關閉
    async fn run_until_interrupted(&mut self) -> Result<(), BootstrapError>;

    /// 目前所在的狀態
    fn state(&self) -> BootstrapState;
}
