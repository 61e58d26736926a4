// ==========================================
// 矿山爆破预测系统 - 比例距离与质点峰值速度
// ==========================================
// 公式:
//   SD  = D / sqrt(Q)
//   ln(PPV) = c + m * ln(SD)   →   PPV = e^c * SD^m
// 说明: c / m 来自配置（按矿山或默认）,不做拟合
// ==========================================

use crate::engine::error::{EngineResult, EstimationError};
use serde::{Deserialize, Serialize};

pub const FIELD_DISTANCE: &str = "distance";
pub const FIELD_CHARGE_WEIGHT: &str = "chargeWeight";

/// 默认截距 ln(1140)
pub const DEFAULT_INTERCEPT: f64 = 7.039;
/// 默认斜率（衰减指数取负）
pub const DEFAULT_SLOPE: f64 = -1.6;

/// 计算比例距离
///
/// # 参数
/// - distance_m: 测点到爆源距离（米）
/// - charge_kg: 单段最大装药量（千克）
pub fn scaled_distance(distance_m: f64, charge_kg: f64) -> EngineResult<f64> {
    if !(distance_m.is_finite() && distance_m > 0.0) {
        return Err(EstimationError::invalid(
            FIELD_DISTANCE,
            format!("必须为有限正数,实际为 {}", distance_m),
        ));
    }
    if !(charge_kg.is_finite() && charge_kg > 0.0) {
        return Err(EstimationError::invalid(
            FIELD_CHARGE_WEIGHT,
            format!("必须为有限正数,实际为 {}", charge_kg),
        ));
    }
    Ok(distance_m / charge_kg.sqrt())
}

// ==========================================
// SiteLaw - 场地衰减规律
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiteLaw {
    pub intercept: f64,
    pub slope: f64,
}

impl Default for SiteLaw {
    fn default() -> Self {
        Self {
            intercept: DEFAULT_INTERCEPT,
            slope: DEFAULT_SLOPE,
        }
    }
}

/// 计算过程中的一步
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationStep {
    pub key: String,
    pub detail: String,
}

/// 场地规律的计算结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PpvEstimate {
    pub ppv: f64,
    pub scaled_distance: f64,
    pub calculation_steps: Vec<CalculationStep>,
}

impl SiteLaw {
    pub fn new(intercept: f64, slope: f64) -> Self {
        Self { intercept, slope }
    }

    /// 系数均为有限数时可用
    pub fn is_valid(&self) -> bool {
        self.intercept.is_finite() && self.slope.is_finite()
    }

    /// 预测质点峰值速度
    pub fn predict(&self, distance_m: f64, charge_kg: f64) -> EngineResult<PpvEstimate> {
        let sd = scaled_distance(distance_m, charge_kg)?;
        let log_sd = sd.ln();
        let log_ppv = self.intercept + self.slope * log_sd;
        let ppv = log_ppv.exp();

        let calculation_steps = vec![
            CalculationStep {
                key: "step_1_scaled_distance".to_string(),
                detail: format!("SD = {} / sqrt({}) = {:.4}", distance_m, charge_kg, sd),
            },
            CalculationStep {
                key: "step_2_log_transform".to_string(),
                detail: format!("ln(SD) = ln({:.4}) = {:.4}", sd, log_sd),
            },
            CalculationStep {
                key: "step_3_site_law".to_string(),
                detail: format!(
                    "ln(PPV) = {:.4} + ({:.4}) * {:.4} = {:.4}",
                    self.intercept, self.slope, log_sd, log_ppv
                ),
            },
            CalculationStep {
                key: "step_4_final_result".to_string(),
                detail: format!("PPV = exp({:.4}) = {:.4}", log_ppv, ppv),
            },
        ];

        for step in &calculation_steps {
            tracing::debug!(step = %step.key, "{}", step.detail);
        }

        Ok(PpvEstimate {
            ppv,
            scaled_distance: sd,
            calculation_steps,
        })
    }
}
