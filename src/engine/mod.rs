// ==========================================
// 矿山爆破预测系统 - 引擎层
// ==========================================
// 职责: 实现估算规则,不拼 SQL,不做持久化
// 红线: 引擎不读取全局随机数,噪声源由调用方注入
// ==========================================

pub mod blast_data_validator;
pub mod error;
pub mod estimator;
pub mod input_validator;
pub mod noise;
pub mod recommendation;
pub mod vibration;

// 重导出核心引擎
pub use blast_data_validator::{
    validate_additional_info, validate_blast_id, validate_blast_parameters, validate_blast_results,
};
pub use error::{EngineResult, EstimationError};
pub use estimator::BlastOutcomeEstimator;
pub use input_validator::{
    parse_estimation_request, validate_estimation_input, validate_prediction_inputs,
};
pub use noise::{ConstantNoise, NoiseSource, SeededNoise, SequenceNoise};
pub use recommendation::{recommend, MAX_RECOMMENDATIONS};
pub use vibration::{scaled_distance, CalculationStep, PpvEstimate, SiteLaw};
