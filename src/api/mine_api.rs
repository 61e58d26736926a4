// ==========================================
// 矿山爆破预测系统 - 矿山管理 API
// ==========================================
// 职责: 矿山查询（任何已认证用户）、新建/修改/软删除（仅管理员）
// 约束: 启用中的矿山名称唯一（精确匹配,去除首尾空白后比较）
// ==========================================

use std::sync::Arc;

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::pagination::{resolve_paging, Pagination};
use crate::config::PredictionConfigReader;
use crate::domain::mine::{Coordinates, Mine, MineFilter, MineStatus, MineUpdate, NewMine};
use crate::domain::prediction::Requester;
use crate::repository::mine_repo::MineRepository;

// 文本长度上限（字符数）
const MAX_NAME_CHARS: usize = 100;
const MAX_LOCATION_CHARS: usize = 200;
const MAX_DESCRIPTION_CHARS: usize = 500;
const MAX_COMPANY_CHARS: usize = 100;

/// 矿山列表查询参数
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MineQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<MineStatus>,
    pub search: Option<String>,
}

/// 矿山列表结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinePage {
    pub mines: Vec<Mine>,
    pub pagination: Pagination,
}

// ==========================================
// MineApi - 矿山管理 API
// ==========================================
pub struct MineApi<C: PredictionConfigReader> {
    mine_repo: Arc<MineRepository>,
    config: Arc<C>,
}

impl<C: PredictionConfigReader> MineApi<C> {
    pub fn new(mine_repo: Arc<MineRepository>, config: Arc<C>) -> Self {
        Self { mine_repo, config }
    }

    /// 分页查询启用中的矿山（新→旧）
    pub async fn list_mines(&self, query: &MineQuery) -> ApiResult<MinePage> {
        let (page, limit) = resolve_paging(self.config.as_ref(), query.page, query.limit).await?;

        let filter = MineFilter {
            status: query.status,
            search: query
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        };

        let total = self.mine_repo.count_active(&filter)?;
        let pagination = Pagination::new(page, limit, total);
        let mines = self
            .mine_repo
            .list_active_page(&filter, limit, pagination.offset())?;

        Ok(MinePage { mines, pagination })
    }

    /// 查询启用中的矿山
    pub fn get_mine(&self, mine_id: &str) -> ApiResult<Mine> {
        self.mine_repo
            .find_active_by_id(mine_id.trim())?
            .ok_or_else(|| ApiError::NotFound(format!("矿山(id={})不存在或已停用", mine_id)))
    }

    /// 新建矿山（仅管理员）
    ///
    /// # 错误
    /// - AccessDenied: 非管理员
    /// - InvalidField: 名称/地点缺失,或字段超出范围
    /// - BusinessRuleViolation: 同名矿山已存在
    #[instrument(skip_all, fields(user = %requester.user_id))]
    pub fn create_mine(&self, requester: &Requester, payload: &NewMine) -> ApiResult<Mine> {
        Self::ensure_admin(requester)?;

        let name = require_text("name", payload.name.as_deref(), MAX_NAME_CHARS)?;
        let location = require_text("location", payload.location.as_deref(), MAX_LOCATION_CHARS)?;
        let description =
            optional_text("description", payload.description.as_deref(), MAX_DESCRIPTION_CHARS)?;
        let operating_company = optional_text(
            "operatingCompany",
            payload.operating_company.as_deref(),
            MAX_COMPANY_CHARS,
        )?;
        if let Some(c) = payload.coordinates {
            validate_coordinates(c)?;
        }
        let capacity = payload.capacity.unwrap_or(0.0);
        validate_capacity(capacity)?;

        self.ensure_name_free(&name, None)?;

        let mine = Mine {
            description,
            coordinates: payload.coordinates,
            status: payload.status.unwrap_or_default(),
            capacity,
            operating_company,
            created_by: Some(requester.user_id.clone()),
            ..Mine::new(Uuid::new_v4().to_string(), name, location, Local::now().naive_local())
        };

        self.mine_repo.insert(&mine)?;

        info!(mine_id = %mine.mine_id, name = %mine.name, "矿山已创建");
        Ok(mine)
    }

    /// 修改矿山（仅管理员,仅启用中的矿山）
    #[instrument(skip_all, fields(user = %requester.user_id, mine_id = %mine_id))]
    pub fn update_mine(
        &self,
        requester: &Requester,
        mine_id: &str,
        changes: &MineUpdate,
    ) -> ApiResult<Mine> {
        Self::ensure_admin(requester)?;
        let mut mine = self.get_mine(mine_id)?;

        if let Some(raw) = changes.name.as_deref() {
            let name = require_text("name", Some(raw), MAX_NAME_CHARS)?;
            if name != mine.name {
                self.ensure_name_free(&name, Some(&mine.mine_id))?;
            }
            mine.name = name;
        }
        if let Some(raw) = changes.location.as_deref() {
            mine.location = require_text("location", Some(raw), MAX_LOCATION_CHARS)?;
        }
        if changes.description.is_some() {
            mine.description =
                optional_text("description", changes.description.as_deref(), MAX_DESCRIPTION_CHARS)?;
        }
        if let Some(c) = changes.coordinates {
            validate_coordinates(c)?;
            mine.coordinates = Some(c);
        }
        if let Some(status) = changes.status {
            mine.status = status;
        }
        if let Some(capacity) = changes.capacity {
            validate_capacity(capacity)?;
            mine.capacity = capacity;
        }
        if changes.operating_company.is_some() {
            mine.operating_company = optional_text(
                "operatingCompany",
                changes.operating_company.as_deref(),
                MAX_COMPANY_CHARS,
            )?;
        }
        mine.updated_at = Some(Local::now().naive_local());

        if !self.mine_repo.update(&mine)? {
            return Err(ApiError::NotFound(format!("矿山(id={})不存在", mine_id)));
        }

        info!(mine_id = %mine.mine_id, "矿山已更新");
        Ok(mine)
    }

    /// 软删除矿山（仅管理员）
    ///
    /// 已停用的矿山视为不存在
    pub fn delete_mine(&self, requester: &Requester, mine_id: &str) -> ApiResult<()> {
        Self::ensure_admin(requester)?;
        let mine = self.get_mine(mine_id)?;

        if !self.mine_repo.set_active(&mine.mine_id, false)? {
            return Err(ApiError::NotFound(format!("矿山(id={})不存在", mine_id)));
        }

        info!(mine_id = %mine.mine_id, user = %requester.user_id, "矿山已停用");
        Ok(())
    }

    // ==========================================
    // 内部辅助
    // ==========================================

    fn ensure_admin(requester: &Requester) -> ApiResult<()> {
        if requester.is_admin() {
            Ok(())
        } else {
            Err(ApiError::AccessDenied(format!(
                "用户{}不是管理员",
                requester.user_id
            )))
        }
    }

    fn ensure_name_free(&self, name: &str, exclude_id: Option<&str>) -> ApiResult<()> {
        match self.mine_repo.find_active_by_name(name, exclude_id)? {
            Some(existing) => Err(ApiError::BusinessRuleViolation(format!(
                "同名矿山已存在: {} (id={})",
                name, existing.mine_id
            ))),
            None => Ok(()),
        }
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ApiError {
    ApiError::InvalidField {
        field: field.to_string(),
        reason: reason.into(),
    }
}

fn require_text(field: &str, raw: Option<&str>, max_chars: usize) -> ApiResult<String> {
    optional_text(field, raw, max_chars)?.ok_or_else(|| invalid(field, "必填字段缺失"))
}

// 去除首尾空白;空串视为未提供
fn optional_text(field: &str, raw: Option<&str>, max_chars: usize) -> ApiResult<Option<String>> {
    let Some(trimmed) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if trimmed.chars().count() > max_chars {
        return Err(invalid(field, format!("不能超过 {} 个字符", max_chars)));
    }
    Ok(Some(trimmed.to_string()))
}

fn validate_coordinates(c: Coordinates) -> ApiResult<()> {
    if !(c.latitude.is_finite() && (-90.0..=90.0).contains(&c.latitude)) {
        return Err(invalid("coordinates.latitude", "纬度必须在 [-90, 90]"));
    }
    if !(c.longitude.is_finite() && (-180.0..=180.0).contains(&c.longitude)) {
        return Err(invalid("coordinates.longitude", "经度必须在 [-180, 180]"));
    }
    Ok(())
}

fn validate_capacity(capacity: f64) -> ApiResult<()> {
    if capacity.is_finite() && capacity >= 0.0 {
        Ok(())
    } else {
        Err(invalid("capacity", format!("不能为负数: {}", capacity)))
    }
}
