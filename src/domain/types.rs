// ==========================================
// 矿山爆破预测系统 - 领域类型定义
// ==========================================
// 红线: 分类输入是封闭集合,集合外的值在边界处拒绝
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 岩石类型 (Rock Type)
// ==========================================
// 序列化格式: 与外部载荷一致 (Granite / Limestone / ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RockType {
    Granite,   // 花岗岩
    Limestone, // 石灰岩
    Sandstone, // 砂岩
    Basalt,    // 玄武岩
    Quartzite, // 石英岩
}

impl RockType {
    /// 全部岩石类型（按声明顺序）
    pub const ALL: [RockType; 5] = [
        RockType::Granite,
        RockType::Limestone,
        RockType::Sandstone,
        RockType::Basalt,
        RockType::Quartzite,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RockType::Granite => "Granite",
            RockType::Limestone => "Limestone",
            RockType::Sandstone => "Sandstone",
            RockType::Basalt => "Basalt",
            RockType::Quartzite => "Quartzite",
        }
    }

    /// 从字符串解析（精确匹配,区分大小写）
    ///
    /// 集合外的值返回 None,由调用方转换为字段级校验错误
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == s)
    }
}

impl fmt::Display for RockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 天气状况 (Weather Condition)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherCondition {
    Clear,  // 晴
    Cloudy, // 多云
    Rainy,  // 雨
    Windy,  // 大风
}

impl WeatherCondition {
    pub const ALL: [WeatherCondition; 4] = [
        WeatherCondition::Clear,
        WeatherCondition::Cloudy,
        WeatherCondition::Rainy,
        WeatherCondition::Windy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherCondition::Clear => "Clear",
            WeatherCondition::Cloudy => "Cloudy",
            WeatherCondition::Rainy => "Rainy",
            WeatherCondition::Windy => "Windy",
        }
    }

    /// 精确匹配,区分大小写
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|w| w.as_str() == s)
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 用户角色 (User Role)
// ==========================================
// 身份认证由外部身份提供方完成,这里只消费角色
// 权限等级: normal(1) < data_entry(2) < admin(3),声明顺序即等级顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UserRole {
    #[serde(rename = "normal", alias = "user")]
    User,
    #[serde(rename = "data_entry")]
    DataEntry,
    #[serde(rename = "admin")]
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "normal",
            UserRole::DataEntry => "data_entry",
            UserRole::Admin => "admin",
        }
    }

    /// 权限等级
    pub fn level(&self) -> u8 {
        match self {
            UserRole::User => 1,
            UserRole::DataEntry => 2,
            UserRole::Admin => 3,
        }
    }

    /// 是否具备 required 所需的权限（等级不低于 required）
    pub fn has_permission(&self, required: UserRole) -> bool {
        self.level() >= required.level()
    }

    /// 从字符串解析角色,未知值按普通用户处理
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "admin" => UserRole::Admin,
            "data_entry" => UserRole::DataEntry,
            _ => UserRole::User,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
