// ==========================================
// 矿山爆破预测系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 爆破效果估算 + 预测记录 + 爆破数据录入 + 矿山管理
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 估算规则
pub mod engine;

// 数据仓储层 - 数据访问
pub mod repository;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{RockType, UserRole, WeatherCondition};

// 领域实体
pub use domain::{
    BlastDataRecord, EstimationInput, EstimationRequest, EstimationResult, Mine,
    PredictionInputs, PredictionRecord, Requester,
};

// 引擎
pub use engine::{BlastOutcomeEstimator, EstimationError, NoiseSource, SeededNoise, SiteLaw};

// API
pub use api::{ApiError, BlastDataApi, MineApi, PpvApi, PredictionApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "MineBlast 爆破效果估算";
