// ==========================================
// 矿山爆破预测系统 - 配置层
// ==========================================
// 职责: 系统配置管理（模型版本、分页、场地衰减规律）
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod prediction_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use prediction_config_trait::PredictionConfigReader;
