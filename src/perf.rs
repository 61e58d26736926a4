// ==========================================
// 矿山爆破预测系统 - 性能统计
// ==========================================
// 职责: PerfGuard 记录单次业务操作耗时,耗时写入预测记录
// 开关: MINEBLAST_SLOW_OP_MS=200  慢操作阈值（毫秒,0 表示不告警）
// ==========================================

use std::time::Instant;

/// 默认慢操作阈值（毫秒）
pub const DEFAULT_SLOW_OP_MS: u64 = 200;

/// 读取慢操作阈值,非法值回退默认
fn slow_op_threshold_ms() -> u64 {
    parse_threshold(std::env::var("MINEBLAST_SLOW_OP_MS").ok().as_deref())
}

fn parse_threshold(raw: Option<&str>) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_SLOW_OP_MS)
}

/// 操作耗时 Guard
///
/// ```ignore
/// let perf = mineblast_estimator::perf::PerfGuard::new("prediction.generate");
/// // ...
/// let processing_time_ms = perf.elapsed_ms();
/// ```
///
/// Drop 时输出 debug 日志;超过阈值时输出 warn
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    slow_ms: u64,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        Self {
            op,
            start: Instant::now(),
            slow_ms: slow_op_threshold_ms(),
        }
    }

    /// 自创建起经过的毫秒数
    pub fn elapsed_ms(&self) -> i64 {
        self.start.elapsed().as_millis().min(i64::MAX as u128) as i64
    }

    fn is_slow(&self, elapsed_ms: i64) -> bool {
        self.slow_ms > 0 && elapsed_ms >= 0 && elapsed_ms as u64 >= self.slow_ms
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();

        if self.is_slow(elapsed_ms) {
            tracing::warn!(
                target: "perf",
                op = self.op,
                elapsed_ms,
                threshold_ms = self.slow_ms,
                "slow operation"
            );
        } else {
            tracing::debug!(target: "perf", op = self.op, elapsed_ms, "done");
        }
    }
}
