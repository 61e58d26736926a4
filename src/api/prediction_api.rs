// ==========================================
// 矿山爆破预测系统 - 预测 API
// ==========================================
// 职责: 预测生成、单次估算、历史查询、记录删除
// 权限: 记录仅本人或管理员可读/删
// 噪声: 所有估算共享同一个注入的噪声源
// ==========================================

use std::sync::{Arc, Mutex};

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::pagination::{resolve_paging, Pagination};
use crate::config::PredictionConfigReader;
use crate::domain::estimation::{EstimationInput, EstimationRequest, EstimationResult};
use crate::domain::mine::MineSummary;
use crate::domain::prediction::{PredictionInputs, PredictionRecord, Requester};
use crate::engine::estimator::BlastOutcomeEstimator;
use crate::engine::input_validator::{parse_estimation_request, validate_prediction_inputs};
use crate::engine::noise::{NoiseSource, SeededNoise};
use crate::perf::PerfGuard;
use crate::repository::mine_repo::MineRepository;
use crate::repository::prediction_repo::PredictionRepository;

// ==========================================
// 响应结构
// ==========================================

/// 生成预测的响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResponse {
    pub prediction: PredictionRecord,
    pub mine: MineSummary,
}

/// 历史查询结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPage {
    pub predictions: Vec<PredictionRecord>,
    pub pagination: Pagination,
}

// ==========================================
// PredictionApi - 预测 API
// ==========================================
pub struct PredictionApi<C: PredictionConfigReader> {
    mine_repo: Arc<MineRepository>,
    prediction_repo: Arc<PredictionRepository>,
    config: Arc<C>,
    estimator: BlastOutcomeEstimator,
    noise: Mutex<Box<dyn NoiseSource + Send>>,
}

impl<C: PredictionConfigReader> PredictionApi<C> {
    /// 创建 PredictionApi（注入噪声源,测试时可传入固定序列）
    pub fn new(
        mine_repo: Arc<MineRepository>,
        prediction_repo: Arc<PredictionRepository>,
        config: Arc<C>,
        noise: Box<dyn NoiseSource + Send>,
    ) -> Self {
        Self {
            mine_repo,
            prediction_repo,
            config,
            estimator: BlastOutcomeEstimator::new(),
            noise: Mutex::new(noise),
        }
    }

    /// 使用熵种子噪声源创建
    pub fn with_entropy(
        mine_repo: Arc<MineRepository>,
        prediction_repo: Arc<PredictionRepository>,
        config: Arc<C>,
    ) -> Self {
        Self::new(
            mine_repo,
            prediction_repo,
            config,
            Box::new(SeededNoise::from_entropy()),
        )
    }

    /// 生成并保存一条预测记录
    ///
    /// # 流程
    /// 1. mine_id 非空
    /// 2. 矿山必须存在且启用（先于载荷校验）
    /// 3. 校验 13 个输入字段
    /// 4. 估算 → 写入 prediction 表
    ///
    /// # 错误
    /// - NotFound: 矿山不存在或已停用
    /// - InvalidField: 输入字段非法（带字段名）
    #[instrument(skip_all, fields(user = %requester.user_id, mine_id = %mine_id))]
    pub async fn generate_prediction(
        &self,
        requester: &Requester,
        mine_id: &str,
        inputs: &PredictionInputs,
    ) -> ApiResult<PredictionResponse> {
        let mine_id = mine_id.trim();
        if mine_id.is_empty() {
            return Err(ApiError::InvalidField {
                field: "mineId".to_string(),
                reason: "必填字段缺失".to_string(),
            });
        }

        let model_version = self
            .config
            .get_model_version()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;

        let perf = PerfGuard::new("prediction.generate");

        let mine = self
            .mine_repo
            .find_active_by_id(mine_id)?
            .ok_or_else(|| ApiError::NotFound(format!("矿山(id={})不存在或已停用", mine_id)))?;

        let validated = validate_prediction_inputs(inputs)?;

        let result = self.estimate_with_shared_noise(&validated.to_estimation_input())?;

        let record = PredictionRecord {
            prediction_id: Uuid::new_v4().to_string(),
            mine_id: mine.mine_id.clone(),
            inputs: validated,
            result,
            requested_by: requester.user_id.clone(),
            model_version,
            processing_time_ms: perf.elapsed_ms(),
            created_at: Local::now().naive_local(),
        };

        self.prediction_repo.insert(&record)?;

        info!(
            prediction_id = %record.prediction_id,
            efficiency = record.result.efficiency,
            safety = record.result.safety,
            "预测已生成"
        );

        Ok(PredictionResponse {
            prediction: record,
            mine: MineSummary::from(&mine),
        })
    }

    /// 仅估算,不落库
    pub fn estimate_only(&self, request: &EstimationRequest) -> ApiResult<EstimationResult> {
        let input = parse_estimation_request(request)?;
        self.estimate_with_shared_noise(&input)
    }

    /// 查询单条预测记录
    ///
    /// # 错误
    /// - NotFound: 记录不存在
    /// - AccessDenied: 非本人且非管理员
    pub fn get_prediction(
        &self,
        requester: &Requester,
        prediction_id: &str,
    ) -> ApiResult<PredictionRecord> {
        let record = self
            .prediction_repo
            .find_by_id(prediction_id)?
            .ok_or_else(|| ApiError::NotFound(format!("预测记录(id={})不存在", prediction_id)))?;

        Self::ensure_access(requester, &record)?;
        Ok(record)
    }

    /// 查询请求人的历史记录（新→旧）
    ///
    /// # 参数
    /// - page: 页码,从 1 开始,缺省为 1
    /// - limit: 每页条数,缺省取配置,超出上限时截断
    /// - mine_id: 可选矿山过滤
    #[instrument(skip_all, fields(user = %requester.user_id))]
    pub async fn list_history(
        &self,
        requester: &Requester,
        page: Option<u32>,
        limit: Option<u32>,
        mine_id: Option<&str>,
    ) -> ApiResult<HistoryPage> {
        let (page, limit) = resolve_paging(self.config.as_ref(), page, limit).await?;
        let mine_filter = mine_id.map(str::trim).filter(|s| !s.is_empty());

        let total = self
            .prediction_repo
            .count_by_requester(&requester.user_id, mine_filter)?;
        let pagination = Pagination::new(page, limit, total);
        let predictions = self.prediction_repo.list_by_requester(
            &requester.user_id,
            mine_filter,
            limit,
            pagination.offset(),
        )?;

        Ok(HistoryPage {
            predictions,
            pagination,
        })
    }

    /// 删除预测记录（本人或管理员）
    pub fn delete_prediction(&self, requester: &Requester, prediction_id: &str) -> ApiResult<()> {
        let record = self.get_prediction(requester, prediction_id)?;

        if !self.prediction_repo.delete_by_id(&record.prediction_id)? {
            return Err(ApiError::NotFound(format!(
                "预测记录(id={})不存在",
                prediction_id
            )));
        }

        info!(prediction_id, user = %requester.user_id, "预测记录已删除");
        Ok(())
    }

    // ==========================================
    // 内部辅助
    // ==========================================

    fn estimate_with_shared_noise(&self, input: &EstimationInput) -> ApiResult<EstimationResult> {
        let mut noise = self
            .noise
            .lock()
            .map_err(|e| ApiError::InternalError(format!("噪声源锁获取失败: {}", e)))?;

        Ok(self.estimator.estimate(input, &mut **noise)?)
    }

    fn ensure_access(requester: &Requester, record: &PredictionRecord) -> ApiResult<()> {
        if requester.can_access(&record.requested_by) {
            Ok(())
        } else {
            Err(ApiError::AccessDenied(format!(
                "用户{}无权访问预测记录{}",
                requester.user_id, record.prediction_id
            )))
        }
    }
}
