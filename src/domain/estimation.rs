// ==========================================
// 矿山爆破预测系统 - 爆破效果估算领域模型
// ==========================================
// 生命周期: 每次调用构造,构造后不可变,核心层不持久化
// 序列化格式: camelCase (与外部载荷一致)
// ==========================================

use crate::domain::types::{RockType, WeatherCondition};
use serde::{Deserialize, Serialize};

// ==========================================
// EstimationInput - 估算输入
// ==========================================
/// 估算器实际消费的 6 个字段
///
/// 数值字段要求为有限正数,由 `BlastOutcomeEstimator::estimate` 在计算前校验
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimationInput {
    pub rock_type: RockType,
    pub weather_condition: WeatherCondition,
    pub burden: f64,           // 抵抗线 (m)
    pub spacing: f64,          // 孔距 (m)
    pub explosive_amount: f64, // 装药量 (kg)
    pub rock_strength: f64,    // 岩石强度 (MPa)
}

// ==========================================
// EstimationResult - 估算结果
// ==========================================
/// 各数值字段均已夹取到声明区间并保留两位小数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimationResult {
    pub efficiency: f64,            // [60, 100]
    pub safety: f64,                // [70, 100]
    pub fragmentation_quality: f64, // [50, 100]
    pub vibration_level: f64,       // [10, 60]
    pub airblast_level: f64,        // [90, 130]
    pub confidence: f64,            // [75, 98]
    pub recommendations: Vec<String>, // 1..=3 条
}

// ==========================================
// EstimationRequest - 未校验的估算请求
// ==========================================
/// 边界层反序列化对象: 所有字段可缺省,枚举以字符串接收
///
/// 通过 `engine::input_validator::parse_estimation_request` 转换为 `EstimationInput`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EstimationRequest {
    pub rock_type: Option<String>,
    pub weather_condition: Option<String>,
    pub burden: Option<f64>,
    pub spacing: Option<f64>,
    pub explosive_amount: Option<f64>,
    pub rock_strength: Option<f64>,
}
