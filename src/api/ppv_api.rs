// ==========================================
// 矿山爆破预测系统 - 质点峰值速度 (PPV) API
// ==========================================
// 职责: 按矿山解析场地衰减规律,计算比例距离与 PPV
// 规律来源: config_kv（矿山专属 → 默认）
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::config_keys;
use crate::config::PredictionConfigReader;
use crate::engine::vibration::{CalculationStep, SiteLaw};

/// 默认规律的标签
pub const DEFAULT_MODEL_LABEL: &str = "ppv_default";

/// PPV 预测结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PpvPrediction {
    pub ppv: f64,
    pub scaled_distance: f64,
    pub mine_id: String,
    pub model_used: String,
    pub calculation_steps: Vec<CalculationStep>,
}

// ==========================================
// PpvApi
// ==========================================
pub struct PpvApi<C: PredictionConfigReader> {
    config: Arc<C>,
}

impl<C: PredictionConfigReader> PpvApi<C> {
    pub fn new(config: Arc<C>) -> Self {
        Self { config }
    }

    /// 预测 PPV
    ///
    /// # 参数
    /// - distance_m: 测点距离 D (m)
    /// - charge_kg: 单段最大装药量 Q (kg)
    ///
    /// # 错误
    /// - InvalidField: mineId 为空,或 distance / chargeWeight 非正数
    pub async fn predict(
        &self,
        mine_id: &str,
        distance_m: f64,
        charge_kg: f64,
    ) -> ApiResult<PpvPrediction> {
        let mine_id = mine_id.trim();
        if mine_id.is_empty() {
            return Err(ApiError::InvalidField {
                field: "mineId".to_string(),
                reason: "必填字段缺失".to_string(),
            });
        }

        let (law, model_used) = self.resolve_site_law(mine_id).await?;
        let estimate = law.predict(distance_m, charge_kg)?;

        info!(
            mine_id,
            distance_m,
            charge_kg,
            ppv = estimate.ppv,
            model_used = %model_used,
            "PPV 预测完成"
        );

        Ok(PpvPrediction {
            ppv: estimate.ppv,
            scaled_distance: estimate.scaled_distance,
            mine_id: mine_id.to_string(),
            model_used,
            calculation_steps: estimate.calculation_steps,
        })
    }

    /// 矿山专属规律优先,否则回退默认规律
    async fn resolve_site_law(&self, mine_id: &str) -> ApiResult<(SiteLaw, String)> {
        let specific = self
            .config
            .get_mine_site_law(mine_id)
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;

        if let Some(law) = specific {
            return Ok((law, format!("{}{}", config_keys::PPV_SITE_LAW_PREFIX, mine_id)));
        }

        let law = self
            .config
            .get_default_site_law()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        Ok((law, DEFAULT_MODEL_LABEL.to_string()))
    }
}
