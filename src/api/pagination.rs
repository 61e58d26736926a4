// ==========================================
// 矿山爆破预测系统 - 分页
// ==========================================
// 约定: page 从 1 开始;limit 缺省取配置,超出上限截断,0 拒绝
// ==========================================

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::error::{ApiError, ApiResult};
use crate::config::PredictionConfigReader;

/// 分页信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let pages = if limit == 0 {
            0
        } else {
            total.div_ceil(limit as u64)
        };
        Self {
            page,
            limit,
            total,
            pages,
        }
    }

    /// 当前页的起始偏移
    pub fn offset(&self) -> u64 {
        (self.page.saturating_sub(1) as u64) * self.limit as u64
    }
}

/// 解析分页参数,返回 (page, limit)
pub(crate) async fn resolve_paging<C: PredictionConfigReader>(
    config: &C,
    page: Option<u32>,
    limit: Option<u32>,
) -> ApiResult<(u32, u32)> {
    let page = page.unwrap_or(1);
    if page < 1 {
        return Err(ApiError::InvalidField {
            field: "page".to_string(),
            reason: "页码必须 >= 1".to_string(),
        });
    }

    let max = config
        .get_history_max_page_size()
        .await
        .map_err(|e| ApiError::ConfigError(e.to_string()))?;

    let limit = match limit {
        Some(0) => {
            return Err(ApiError::InvalidField {
                field: "limit".to_string(),
                reason: "每页条数必须 >= 1".to_string(),
            })
        }
        Some(v) => v,
        None => config
            .get_history_default_page_size()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?,
    };

    if limit > max {
        warn!(requested = limit, max, "每页条数超出上限,已截断");
    }
    Ok((page, limit.min(max)))
}
