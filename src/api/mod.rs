// ==========================================
// 矿山爆破预测系统 - API 层
// ==========================================
// 职责: 编排校验、引擎与仓储,对外暴露业务操作
// 红线: API 层不拼 SQL,不实现估算公式
// ==========================================

pub mod blast_data_api;
pub mod error;
pub mod mine_api;
pub mod pagination;
pub mod ppv_api;
pub mod prediction_api;

// 重导出
pub use blast_data_api::{BlastDataApi, BlastDataPage, BlastDataQuery};
pub use error::{ApiError, ApiResult};
pub use mine_api::{MineApi, MinePage, MineQuery};
pub use pagination::Pagination;
pub use ppv_api::{PpvApi, PpvPrediction};
pub use prediction_api::{HistoryPage, PredictionApi, PredictionResponse};
