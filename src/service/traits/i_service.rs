use std::io;
use std::path::Path;
use async_trait::async_trait;
use tokio::process::Child;
use crate::models::command::{CommandOutcome, CommandSpec};

// 外部指令執行接口，啟動流程的每一步都透過它呼叫系統
#[async_trait]
pub trait CommandRunnerTrait: Send + Sync {
    /// 探測指令是否可用
    /// # 參數
    /// - spec: 探測用指令，通常帶 `--version`
    /// # 回傳
    /// - 能執行且結束碼為 0 時回傳 true
    async fn probe(&self, spec: &CommandSpec) -> bool;

    /// 執行指令並等待結束
    /// # 參數
    /// - spec: 指令、參數與工作目錄
    /// # 回傳
    /// - 成功時返回結束狀態，無法啟動時返回 IO 錯誤
    async fn run(&self, spec: &CommandSpec) -> io::Result<CommandOutcome>;

    /// 在背景啟動長駐程序，輸出附加到日誌檔
    /// # 參數
    /// - spec: 指令、參數與工作目錄
    /// - log_path: 標準輸出與標準錯誤的附加目的地
    /// # 回傳
    /// - 成功時返回子程序控制代碼，失敗時返回 IO 錯誤
    fn spawn(&self, spec: &CommandSpec, log_path: &Path) -> io::Result<Child>;
}
