// ==========================================
// 矿山爆破预测系统 - 矿山领域模型
// ==========================================
// 用途: 预测请求与爆破数据都必须指向一个启用中的矿山
// 删除: 软删除（is_active=false）,记录保留
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 矿山运营状态
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MineStatus {
    #[default]
    Active,
    Inactive,
    Maintenance,
}

impl MineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MineStatus::Active => "active",
            MineStatus::Inactive => "inactive",
            MineStatus::Maintenance => "maintenance",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(MineStatus::Active),
            "inactive" => Some(MineStatus::Inactive),
            "maintenance" => Some(MineStatus::Maintenance),
            _ => None,
        }
    }
}

impl fmt::Display for MineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 经纬度（度）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

// ==========================================
// Mine - 矿山
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mine {
    pub mine_id: String,
    pub name: String,
    pub location: String,
    pub description: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub status: MineStatus,
    pub capacity: f64, // 年产能（吨）
    pub operating_company: Option<String>,
    pub is_active: bool,
    pub created_by: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

impl Mine {
    /// 以默认属性构造一个启用中的矿山
    pub fn new(
        mine_id: impl Into<String>,
        name: impl Into<String>,
        location: impl Into<String>,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            mine_id: mine_id.into(),
            name: name.into(),
            location: location.into(),
            description: None,
            coordinates: None,
            status: MineStatus::Active,
            capacity: 0.0,
            operating_company: None,
            is_active: true,
            created_by: None,
            created_at,
            updated_at: None,
        }
    }
}

/// 响应中附带的矿山摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MineSummary {
    pub mine_id: String,
    pub name: String,
    pub location: String,
}

impl From<&Mine> for MineSummary {
    fn from(mine: &Mine) -> Self {
        Self {
            mine_id: mine.mine_id.clone(),
            name: mine.name.clone(),
            location: mine.location.clone(),
        }
    }
}

// ==========================================
// 新建 / 修改载荷（未校验）
// ==========================================

/// 新建矿山载荷
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewMine {
    pub name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub status: Option<MineStatus>,
    pub capacity: Option<f64>,
    pub operating_company: Option<String>,
}

/// 修改矿山载荷,缺省字段保持不变
///
/// description / operatingCompany 传空串表示清空
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MineUpdate {
    pub name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub status: Option<MineStatus>,
    pub capacity: Option<f64>,
    pub operating_company: Option<String>,
}

/// 矿山列表过滤条件（仅作用于启用中的矿山）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MineFilter {
    pub status: Option<MineStatus>,
    /// 名称 / 地点 / 运营公司的子串,不区分大小写
    pub search: Option<String>,
}
