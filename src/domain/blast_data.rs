// ==========================================
// 矿山爆破预测系统 - 爆破数据领域模型
// ==========================================
// 用途: 现场实际爆破的参数 / 补充信息 / 爆后结果
// 对齐: blast_data 表 (parameters_json + additional_info_json + results_json)
// 唯一性: 同一矿山内 blast_id 唯一
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 补充信息允许的岩石类型（比估算器多 Coal / Other）
pub const RECORDED_ROCK_TYPES: [&str; 7] = [
    "Granite",
    "Limestone",
    "Sandstone",
    "Basalt",
    "Quartzite",
    "Coal",
    "Other",
];

/// 补充信息允许的天气（比估算器多 Stormy）
pub const RECORDED_WEATHER_CONDITIONS: [&str; 5] = ["Clear", "Cloudy", "Rainy", "Windy", "Stormy"];

/// 备注最大长度（字符数）
pub const MAX_NOTES_CHARS: usize = 1000;

// ==========================================
// 爆破参数（13 项,全部必填）
// ==========================================

/// 爆破参数载荷（未校验）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlastParametersInput {
    pub depth: Option<f64>,
    pub burden: Option<f64>,
    pub spacing: Option<f64>,
    pub stemming: Option<f64>,
    pub total_charge_length: Option<f64>,
    pub explosive_per_hole: Option<f64>,
    pub max_charge_per_delay: Option<f64>,
    pub total_explosive_amount: Option<f64>,
    pub total_rock_blasted: Option<f64>,
    pub power_factor: Option<f64>,
    pub distance: Option<f64>,
    pub standard_deviation: Option<f64>,
    pub frequency: Option<f64>,
}

/// 校验后的爆破参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlastParameters {
    pub depth: f64,                  // m
    pub burden: f64,                 // m
    pub spacing: f64,                // m
    pub stemming: f64,               // m
    pub total_charge_length: f64,    // m
    pub explosive_per_hole: f64,     // kg
    pub max_charge_per_delay: f64,   // kg
    pub total_explosive_amount: f64, // kg
    pub total_rock_blasted: f64,     // t
    pub power_factor: f64,           // t/kg
    pub distance: f64,               // m
    pub standard_deviation: f64,
    pub frequency: f64, // Hz
}

impl BlastParameters {
    /// 以当前值为底,叠加载荷中给出的字段
    pub fn overlay(&self, patch: &BlastParametersInput) -> BlastParametersInput {
        BlastParametersInput {
            depth: patch.depth.or(Some(self.depth)),
            burden: patch.burden.or(Some(self.burden)),
            spacing: patch.spacing.or(Some(self.spacing)),
            stemming: patch.stemming.or(Some(self.stemming)),
            total_charge_length: patch.total_charge_length.or(Some(self.total_charge_length)),
            explosive_per_hole: patch.explosive_per_hole.or(Some(self.explosive_per_hole)),
            max_charge_per_delay: patch.max_charge_per_delay.or(Some(self.max_charge_per_delay)),
            total_explosive_amount: patch
                .total_explosive_amount
                .or(Some(self.total_explosive_amount)),
            total_rock_blasted: patch.total_rock_blasted.or(Some(self.total_rock_blasted)),
            power_factor: patch.power_factor.or(Some(self.power_factor)),
            distance: patch.distance.or(Some(self.distance)),
            standard_deviation: patch.standard_deviation.or(Some(self.standard_deviation)),
            frequency: patch.frequency.or(Some(self.frequency)),
        }
    }
}

// ==========================================
// 补充信息 / 爆后结果（可选）
// ==========================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdditionalInfo {
    pub rock_type: Option<String>,
    pub weather_condition: Option<String>,
    pub blast_time: Option<NaiveDateTime>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FragmentationQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// 爆后结果,爆破完成后补录
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlastResults {
    pub efficiency: Option<f64>,   // %
    pub safety_score: Option<f64>, // 0..100
    pub fragmentation_quality: Option<FragmentationQuality>,
    pub vibration_level: Option<f64>, // mm/s
    pub airblast_level: Option<f64>,  // dB
}

// ==========================================
// 记录状态
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlastStatus {
    #[default]
    Draft,
    Submitted,
    Verified,
    Archived,
}

impl BlastStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlastStatus::Draft => "draft",
            BlastStatus::Submitted => "submitted",
            BlastStatus::Verified => "verified",
            BlastStatus::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(BlastStatus::Draft),
            "submitted" => Some(BlastStatus::Submitted),
            "verified" => Some(BlastStatus::Verified),
            "archived" => Some(BlastStatus::Archived),
            _ => None,
        }
    }
}

impl fmt::Display for BlastStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// BlastDataRecord - 爆破数据记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlastDataRecord {
    pub blast_data_id: String, // UUID v4
    pub mine_id: String,
    pub blast_id: String, // 现场爆破编号
    pub parameters: BlastParameters,
    pub additional_info: AdditionalInfo,
    pub results: BlastResults,
    pub entered_by: String, // 录入人 user_id
    pub blast_date: NaiveDateTime,
    pub is_verified: bool,
    pub status: BlastStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// ==========================================
// 新建 / 修改载荷
// ==========================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewBlastData {
    pub blast_id: Option<String>,
    pub blast_parameters: Option<BlastParametersInput>,
    pub additional_info: Option<AdditionalInfo>,
    pub results: Option<BlastResults>,
    /// 缺省为当前时间
    pub blast_date: Option<NaiveDateTime>,
}

/// 修改载荷,缺省字段保持不变
///
/// blastParameters 按字段合并;additionalInfo / results 整体替换;
/// isVerified 仅管理员可改
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlastDataUpdate {
    pub blast_id: Option<String>,
    pub blast_parameters: Option<BlastParametersInput>,
    pub additional_info: Option<AdditionalInfo>,
    pub results: Option<BlastResults>,
    pub blast_date: Option<NaiveDateTime>,
    pub status: Option<BlastStatus>,
    pub is_verified: Option<bool>,
}

/// 按矿山查询时的过滤条件
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlastDataFilter {
    /// blast_id 子串,不区分大小写
    pub blast_id: Option<String>,
    /// 闭区间
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
}
