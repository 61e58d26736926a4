// ==========================================
// 矿山爆破预测系统 - 爆破数据 API
// ==========================================
// 职责: 现场爆破数据的录入、查询、修改、删除
// 权限:
// - 查询: 任何已认证用户
// - 录入/修改/删除: data_entry 及以上;修改/删除仅本人或管理员
// - isVerified 仅管理员可改
// ==========================================

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::pagination::{resolve_paging, Pagination};
use crate::config::PredictionConfigReader;
use crate::domain::blast_data::{
    BlastDataFilter, BlastDataRecord, BlastDataUpdate, BlastStatus, NewBlastData,
};
use crate::domain::mine::{Mine, MineSummary};
use crate::domain::prediction::Requester;
use crate::engine::blast_data_validator::{
    fields, validate_additional_info, validate_blast_id, validate_blast_parameters,
    validate_blast_results,
};
use crate::perf::PerfGuard;
use crate::repository::blast_data_repo::BlastDataRepository;
use crate::repository::mine_repo::MineRepository;

/// 按矿山查询的参数
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlastDataQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// blast_id 子串,不区分大小写
    pub blast_id: Option<String>,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
}

/// 按矿山查询的结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlastDataPage {
    pub blast_data: Vec<BlastDataRecord>,
    pub mine: MineSummary,
    pub pagination: Pagination,
}

// ==========================================
// BlastDataApi - 爆破数据 API
// ==========================================
pub struct BlastDataApi<C: PredictionConfigReader> {
    mine_repo: Arc<MineRepository>,
    blast_data_repo: Arc<BlastDataRepository>,
    config: Arc<C>,
}

impl<C: PredictionConfigReader> BlastDataApi<C> {
    pub fn new(
        mine_repo: Arc<MineRepository>,
        blast_data_repo: Arc<BlastDataRepository>,
        config: Arc<C>,
    ) -> Self {
        Self {
            mine_repo,
            blast_data_repo,
            config,
        }
    }

    /// 分页查询某矿山的爆破数据（爆破日期 新→旧）
    ///
    /// # 错误
    /// - NotFound: 矿山不存在或已停用
    /// - InvalidField: 分页参数非法,或 startDate 晚于 endDate
    #[instrument(skip_all, fields(mine_id = %mine_id))]
    pub async fn list_blast_data(
        &self,
        mine_id: &str,
        query: &BlastDataQuery,
    ) -> ApiResult<BlastDataPage> {
        let mine = self.require_active_mine(mine_id)?;
        let (page, limit) = resolve_paging(self.config.as_ref(), query.page, query.limit).await?;

        if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
            if start > end {
                return Err(ApiError::InvalidField {
                    field: "startDate".to_string(),
                    reason: "起始日期晚于截止日期".to_string(),
                });
            }
        }

        let filter = BlastDataFilter {
            blast_id: query
                .blast_id
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            start_date: query.start_date,
            end_date: query.end_date,
        };

        let total = self.blast_data_repo.count_by_mine(&mine.mine_id, &filter)?;
        let pagination = Pagination::new(page, limit, total);
        let blast_data =
            self.blast_data_repo
                .list_by_mine(&mine.mine_id, &filter, limit, pagination.offset())?;

        Ok(BlastDataPage {
            blast_data,
            mine: MineSummary::from(&mine),
            pagination,
        })
    }

    /// 查询单条爆破数据
    pub fn get_blast_data(&self, blast_data_id: &str) -> ApiResult<BlastDataRecord> {
        self.blast_data_repo
            .find_by_id(blast_data_id)?
            .ok_or_else(|| ApiError::NotFound(format!("爆破数据(id={})不存在", blast_data_id)))
    }

    /// 录入爆破数据
    ///
    /// # 流程
    /// 1. 权限: data_entry 及以上
    /// 2. mineId / blastParameters 必须提供
    /// 3. 矿山必须存在且启用
    /// 4. 校验 blastId、13 项参数、补充信息、结果
    /// 5. 同一矿山内 blastId 不得重复
    #[instrument(skip_all, fields(user = %requester.user_id, mine_id = %mine_id))]
    pub fn create_blast_data(
        &self,
        requester: &Requester,
        mine_id: &str,
        payload: &NewBlastData,
    ) -> ApiResult<BlastDataRecord> {
        Self::ensure_data_entry(requester)?;

        let mine_id = mine_id.trim();
        if mine_id.is_empty() {
            return Err(ApiError::InvalidField {
                field: "mineId".to_string(),
                reason: "必填字段缺失".to_string(),
            });
        }
        let parameters = payload.blast_parameters.as_ref().ok_or_else(|| ApiError::InvalidField {
            field: fields::BLAST_PARAMETERS.to_string(),
            reason: "必填字段缺失".to_string(),
        })?;

        let _perf = PerfGuard::new("blast_data.create");

        let mine = self.require_active_mine(mine_id)?;

        let blast_id = validate_blast_id(payload.blast_id.as_deref())?;
        let parameters = validate_blast_parameters(parameters)?;
        let additional_info = payload.additional_info.clone().unwrap_or_default();
        validate_additional_info(&additional_info)?;
        let results = payload.results.clone().unwrap_or_default();
        validate_blast_results(&results)?;

        self.ensure_blast_id_free(&mine.mine_id, &blast_id, None)?;

        let now = Local::now().naive_local();
        let record = BlastDataRecord {
            blast_data_id: Uuid::new_v4().to_string(),
            mine_id: mine.mine_id,
            blast_id,
            parameters,
            additional_info,
            results,
            entered_by: requester.user_id.clone(),
            blast_date: payload.blast_date.unwrap_or(now),
            is_verified: false,
            status: BlastStatus::Draft,
            created_at: now,
            updated_at: now,
        };

        self.blast_data_repo.insert(&record)?;

        info!(
            blast_data_id = %record.blast_data_id,
            blast_id = %record.blast_id,
            "爆破数据已录入"
        );
        Ok(record)
    }

    /// 修改爆破数据（本人或管理员）
    ///
    /// blastParameters 按字段合并后整体重新校验;非管理员提交的 isVerified 被忽略
    #[instrument(skip_all, fields(user = %requester.user_id, blast_data_id = %blast_data_id))]
    pub fn update_blast_data(
        &self,
        requester: &Requester,
        blast_data_id: &str,
        changes: &BlastDataUpdate,
    ) -> ApiResult<BlastDataRecord> {
        Self::ensure_data_entry(requester)?;
        let mut record = self.get_blast_data(blast_data_id)?;
        Self::ensure_owner_or_admin(requester, &record)?;

        if changes.blast_id.is_some() {
            let blast_id = validate_blast_id(changes.blast_id.as_deref())?;
            if blast_id != record.blast_id {
                self.ensure_blast_id_free(&record.mine_id, &blast_id, Some(&record.blast_data_id))?;
            }
            record.blast_id = blast_id;
        }
        if let Some(patch) = &changes.blast_parameters {
            record.parameters = validate_blast_parameters(&record.parameters.overlay(patch))?;
        }
        if let Some(info) = &changes.additional_info {
            validate_additional_info(info)?;
            record.additional_info = info.clone();
        }
        if let Some(results) = &changes.results {
            validate_blast_results(results)?;
            record.results = results.clone();
        }
        if let Some(blast_date) = changes.blast_date {
            record.blast_date = blast_date;
        }
        if let Some(status) = changes.status {
            record.status = status;
        }
        if let Some(verified) = changes.is_verified {
            if requester.is_admin() {
                record.is_verified = verified;
            } else {
                debug!(user = %requester.user_id, "非管理员提交的 isVerified 已忽略");
            }
        }
        record.updated_at = Local::now().naive_local();

        if !self.blast_data_repo.update(&record)? {
            return Err(ApiError::NotFound(format!("爆破数据(id={})不存在", blast_data_id)));
        }

        info!(blast_data_id = %record.blast_data_id, "爆破数据已更新");
        Ok(record)
    }

    /// 删除爆破数据（本人或管理员）
    pub fn delete_blast_data(&self, requester: &Requester, blast_data_id: &str) -> ApiResult<()> {
        Self::ensure_data_entry(requester)?;
        let record = self.get_blast_data(blast_data_id)?;
        Self::ensure_owner_or_admin(requester, &record)?;

        if !self.blast_data_repo.delete_by_id(&record.blast_data_id)? {
            return Err(ApiError::NotFound(format!("爆破数据(id={})不存在", blast_data_id)));
        }

        info!(blast_data_id, user = %requester.user_id, "爆破数据已删除");
        Ok(())
    }

    // ==========================================
    // 内部辅助
    // ==========================================

    fn require_active_mine(&self, mine_id: &str) -> ApiResult<Mine> {
        self.mine_repo
            .find_active_by_id(mine_id.trim())?
            .ok_or_else(|| ApiError::NotFound(format!("矿山(id={})不存在或已停用", mine_id)))
    }

    fn ensure_blast_id_free(
        &self,
        mine_id: &str,
        blast_id: &str,
        exclude_id: Option<&str>,
    ) -> ApiResult<()> {
        match self.blast_data_repo.find_by_blast_id(mine_id, blast_id)? {
            Some(existing) if Some(existing.blast_data_id.as_str()) != exclude_id => {
                Err(ApiError::BusinessRuleViolation(format!(
                    "矿山{}已存在爆破编号{}",
                    mine_id, blast_id
                )))
            }
            _ => Ok(()),
        }
    }

    fn ensure_data_entry(requester: &Requester) -> ApiResult<()> {
        if requester.can_enter_data() {
            Ok(())
        } else {
            Err(ApiError::AccessDenied(format!(
                "用户{}({})无爆破数据录入权限",
                requester.user_id, requester.role
            )))
        }
    }

    fn ensure_owner_or_admin(requester: &Requester, record: &BlastDataRecord) -> ApiResult<()> {
        if requester.can_access(&record.entered_by) {
            Ok(())
        } else {
            Err(ApiError::AccessDenied(format!(
                "用户{}只能修改本人录入的爆破数据",
                requester.user_id
            )))
        }
    }
}
