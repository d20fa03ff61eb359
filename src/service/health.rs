use std::time::Duration;
use log::debug;
use tokio::time::Instant;
use crate::error::BootstrapError;

const MIN_PROBE_TIMEOUT: Duration = Duration::from_millis(50);

/// 以固定間隔輪詢健康檢查端點，直到回應成功或逾時
///
/// 成功時回傳等待時間。逾時回傳 `HealthCheckTimeout`，由呼叫端決定是否繼續；
/// 實際等待時間最多比 `timeout` 多一個輪詢間隔。
pub async fn await_health(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
    interval: Duration,
) -> Result<Duration, BootstrapError> {
    let start = Instant::now();
    let deadline = start + timeout;
    let probe_timeout = interval.max(MIN_PROBE_TIMEOUT);
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        match client.get(url).timeout(probe_timeout).send().await {
            Ok(resp) if resp.status().is_success() => {
                let elapsed = start.elapsed();
                debug!("{} 第 {} 次檢查成功，耗時 {:?}", url, attempts, elapsed);
                return Ok(elapsed);
            }
            Ok(resp) => debug!("{} 第 {} 次檢查回應 {}", url, attempts, resp.status()),
            Err(e) => debug!("{} 第 {} 次檢查失敗：{}", url, attempts, e),
        }

        let now = Instant::now();
        if now >= deadline {
            break;
        }
        tokio::time::sleep(interval.min(deadline - now)).await;
    }

    Err(BootstrapError::HealthCheckTimeout {
        url: url.to_string(),
        waited_secs: start.elapsed().as_secs(),
    })
}
