// ==========================================
// 矿山爆破预测系统 - 预测配置读取 Trait
// ==========================================
// 职责: 定义预测/PPV 模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::engine::vibration::SiteLaw;
use async_trait::async_trait;
use std::error::Error;

// ==========================================
// PredictionConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait PredictionConfigReader: Send + Sync {
    /// 写入预测记录的模型版本标签
    ///
    /// # 默认值
    /// - v1.0.0-formula
    async fn get_model_version(&self) -> Result<String, Box<dyn Error + Send + Sync>>;

    /// 历史查询默认每页条数
    ///
    /// # 默认值
    /// - 10
    async fn get_history_default_page_size(&self) -> Result<u32, Box<dyn Error + Send + Sync>>;

    /// 历史查询每页条数上限
    ///
    /// # 默认值
    /// - 100
    async fn get_history_max_page_size(&self) -> Result<u32, Box<dyn Error + Send + Sync>>;

    /// 默认场地衰减规律
    ///
    /// # 默认值
    /// - intercept = 7.039, slope = -1.6
    async fn get_default_site_law(&self) -> Result<SiteLaw, Box<dyn Error + Send + Sync>>;

    /// 指定矿山的场地衰减规律
    ///
    /// # 返回
    /// - Some(SiteLaw): 该矿山配置了专属系数
    /// - None: 未配置,调用方回退到默认规律
    async fn get_mine_site_law(
        &self,
        mine_id: &str,
    ) -> Result<Option<SiteLaw>, Box<dyn Error + Send + Sync>>;
}
