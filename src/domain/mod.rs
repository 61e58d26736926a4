// ==========================================
// 矿山爆破预测系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod blast_data;
pub mod estimation;
pub mod mine;
pub mod prediction;
pub mod types;

// 重导出核心类型
pub use blast_data::{
    AdditionalInfo, BlastDataFilter, BlastDataRecord, BlastDataUpdate, BlastParameters,
    BlastParametersInput, BlastResults, BlastStatus, FragmentationQuality, NewBlastData,
};
pub use estimation::{EstimationInput, EstimationRequest, EstimationResult};
pub use mine::{Coordinates, Mine, MineFilter, MineStatus, MineSummary, MineUpdate, NewMine};
pub use prediction::{PredictionInputs, PredictionRecord, Requester, ValidatedInputs};
pub use types::{RockType, UserRole, WeatherCondition};
