// ==========================================
// 矿山爆破预测系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型,转换引擎/仓储错误为用户友好的错误消息
// 约定: 输入类错误必须带出字段名,便于调用方定位
// ==========================================

use crate::engine::error::EstimationError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入与权限错误
    // ==========================================
    #[error("无效输入 (field={field}): {reason}")]
    InvalidField { field: String, reason: String },

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("无权访问: {0}")]
    AccessDenied(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("配置读取失败: {0}")]
    ConfigError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 是否为调用方错误（输入/权限/资源不存在）
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ApiError::InvalidField { .. }
                | ApiError::NotFound(_)
                | ApiError::AccessDenied(_)
                | ApiError::BusinessRuleViolation(_)
        )
    }

    /// 输入错误对应的字段名
    pub fn field(&self) -> Option<&str> {
        match self {
            ApiError::InvalidField { field, .. } => Some(field),
            _ => None,
        }
    }
}

// ==========================================
// 从 EstimationError 转换
// ==========================================
impl From<EstimationError> for ApiError {
    fn from(err: EstimationError) -> Self {
        match err {
            EstimationError::InvalidInput { field, reason } => ApiError::InvalidField {
                field: field.to_string(),
                reason,
            },
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("外键约束违反: {}", msg))
            }
            // 存储数据损坏属于服务端问题
            RepositoryError::Serialization(e) => {
                ApiError::InternalError(format!("记录解析失败: {}", e))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InternalError(format!("字段{}错误: {}", field, message))
            }
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
