use std::fmt;

/// 單次啟動流程的狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapState {
    Idle,
    RuntimeResolved,
    EnvironmentReady,
    DependenciesInstalled,
    FrontendBuilt,
    BackendStarted,
    BackendHealthy,
    HealthTimedOut,
    FrontendStarted,
    BrowserOpened,
    Running,
    Terminating,
    Stopped,
}

impl BootstrapState {
    pub fn label(&self) -> &'static str {
        match self {
            BootstrapState::Idle => "閒置",
            BootstrapState::RuntimeResolved => "已找到 Python",
            BootstrapState::EnvironmentReady => "虛擬環境就緒",
            BootstrapState::DependenciesInstalled => "依賴已安裝",
            BootstrapState::FrontendBuilt => "前端已建置",
            BootstrapState::BackendStarted => "後端已啟動",
            BootstrapState::BackendHealthy => "後端健康",
            BootstrapState::HealthTimedOut => "健康檢查逾時",
            BootstrapState::FrontendStarted => "前端已啟動",
            BootstrapState::BrowserOpened => "瀏覽器已開啟",
            BootstrapState::Running => "執行中",
            BootstrapState::Terminating => "關閉中",
            BootstrapState::Stopped => "已停止",
        }
    }
}

impl fmt::Display for BootstrapState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}（{}）", self, self.label())
    }
}
