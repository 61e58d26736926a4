// ==========================================
// 矿山爆破预测系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 估算引擎无 I/O,唯一的失败类别是输入校验失败
// ==========================================

use thiserror::Error;

/// 估算引擎错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimationError {
    /// 输入校验失败（字段缺失 / 非正数 / 不在枚举集合内 / 超出范围）
    ///
    /// field 使用外部载荷中的字段名（camelCase）
    #[error("无效输入 (field={field}): {reason}")]
    InvalidInput { field: &'static str, reason: String },
}

impl EstimationError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        EstimationError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// 出错的字段名
    pub fn field(&self) -> &'static str {
        match self {
            EstimationError::InvalidInput { field, .. } => field,
        }
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EstimationError>;
