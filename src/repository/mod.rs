// ==========================================
// 矿山爆破预测系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod blast_data_repo;
pub mod error;
pub mod mine_repo;
pub mod prediction_repo;

// 重导出核心仓储
pub use blast_data_repo::BlastDataRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use mine_repo::MineRepository;
pub use prediction_repo::PredictionRepository;
