// ==========================================
// 矿山爆破预测系统 - 预测记录领域模型
// ==========================================
// 用途: 预测请求载荷 / 校验后输入 / 持久化记录 / 请求人
// 对齐: prediction 表 (inputs_json + result_json)
// ==========================================

use crate::domain::estimation::{EstimationInput, EstimationResult};
use crate::domain::types::{RockType, UserRole, WeatherCondition};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// PredictionInputs - 预测请求载荷（未校验）
// ==========================================
/// 外部预测请求的 13 个字段
///
/// 全部可缺省,缺失字段在校验阶段报告;估算器只消费其中 6 个
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PredictionInputs {
    // ===== 地质参数 =====
    pub rock_type: Option<String>,
    pub rock_density: Option<f64>,  // kg/m³
    pub rock_strength: Option<f64>, // MPa
    pub water_content: Option<f64>, // %

    // ===== 爆破设计参数 =====
    pub hole_depth: Option<f64>,       // m
    pub hole_diameter: Option<f64>,    // mm
    pub explosive_amount: Option<f64>, // kg

    // ===== 孔网参数 =====
    pub burden: Option<f64>,   // m
    pub spacing: Option<f64>,  // m
    pub subdrill: Option<f64>, // m

    // ===== 环境参数 =====
    pub weather_condition: Option<String>,
    pub temperature: Option<f64>, // °C
    pub humidity: Option<f64>,    // %
}

// ==========================================
// ValidatedInputs - 校验后的预测输入
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedInputs {
    pub rock_type: RockType,
    pub rock_density: f64,
    pub rock_strength: f64,
    pub water_content: f64,
    pub hole_depth: f64,
    pub hole_diameter: f64,
    pub explosive_amount: f64,
    pub burden: f64,
    pub spacing: f64,
    pub subdrill: f64,
    pub weather_condition: WeatherCondition,
    pub temperature: f64,
    pub humidity: f64,
}

impl ValidatedInputs {
    /// 投影出估算器消费的字段
    pub fn to_estimation_input(&self) -> EstimationInput {
        EstimationInput {
            rock_type: self.rock_type,
            weather_condition: self.weather_condition,
            burden: self.burden,
            spacing: self.spacing,
            explosive_amount: self.explosive_amount,
            rock_strength: self.rock_strength,
        }
    }
}

// ==========================================
// Requester - 已认证的请求人
// ==========================================
// 认证协议不在本系统内,调用方传入已解析的身份
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requester {
    pub user_id: String,
    pub role: UserRole,
}

impl Requester {
    pub fn new(user_id: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// 是否可以录入/修改爆破数据（data_entry 及以上）
    pub fn can_enter_data(&self) -> bool {
        self.role.has_permission(UserRole::DataEntry)
    }

    /// 是否可以访问某用户的记录（本人或管理员）
    pub fn can_access(&self, owner_id: &str) -> bool {
        self.is_admin() || self.user_id == owner_id
    }
}

// ==========================================
// PredictionRecord - 预测记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRecord {
    pub prediction_id: String,       // UUID v4
    pub mine_id: String,             // 所属矿山
    pub inputs: ValidatedInputs,     // 输入快照
    pub result: EstimationResult,    // 估算结果
    pub requested_by: String,        // 请求人 user_id
    pub model_version: String,       // 估算模型版本标签
    pub processing_time_ms: i64,     // 处理耗时（毫秒）
    pub created_at: NaiveDateTime,   // 创建时间
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_validated() -> ValidatedInputs {
        ValidatedInputs {
            rock_type: RockType::Basalt,
            rock_density: 2900.0,
            rock_strength: 220.0,
            water_content: 5.0,
            hole_depth: 12.0,
            hole_diameter: 115.0,
            explosive_amount: 32.0,
            burden: 3.5,
            spacing: 4.0,
            subdrill: 1.0,
            weather_condition: WeatherCondition::Rainy,
            temperature: 18.0,
            humidity: 80.0,
        }
    }

    #[test]
    fn test_projection_keeps_estimator_fields() {
        let input = sample_validated().to_estimation_input();
        assert_eq!(input.rock_type, RockType::Basalt);
        assert_eq!(input.weather_condition, WeatherCondition::Rainy);
        assert_eq!(input.burden, 3.5);
        assert_eq!(input.spacing, 4.0);
        assert_eq!(input.explosive_amount, 32.0);
        assert_eq!(input.rock_strength, 220.0);
    }

    #[test]
    fn test_requester_access() {
        let owner = Requester::new("U001", UserRole::User);
        let other = Requester::new("U002", UserRole::User);
        let admin = Requester::new("A001", UserRole::Admin);

        assert!(owner.can_access("U001"));
        assert!(!other.can_access("U001"));
        assert!(admin.can_access("U001"));
    }

    #[test]
    fn test_requester_data_entry_permission() {
        assert!(!Requester::new("U001", UserRole::User).can_enter_data());
        assert!(Requester::new("D001", UserRole::DataEntry).can_enter_data());
        assert!(Requester::new("A001", UserRole::Admin).can_enter_data());
        assert!(!Requester::new("D001", UserRole::DataEntry).is_admin());
    }

    #[test]
    fn test_inputs_payload_deserialize() {
        let json = r#"{"rockType":"Granite","holeDepth":10,"weatherCondition":"Clear"}"#;
        let inputs: PredictionInputs = serde_json::from_str(json).unwrap();
        assert_eq!(inputs.rock_type.as_deref(), Some("Granite"));
        assert_eq!(inputs.hole_depth, Some(10.0));
        assert!(inputs.humidity.is_none());
    }
}
