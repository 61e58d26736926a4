// ==========================================
// 矿山爆破预测系统 - 预测记录仓储
// ==========================================
// 红线: Repository 不含业务逻辑（权限判断在 API 层）
// 存储: inputs_json / result_json 以 JSON 文本保存
// ==========================================

use crate::domain::prediction::PredictionRecord;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::mine_repo::{parse_datetime, DATETIME_FORMAT};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = r#"
    SELECT prediction_id, mine_id, inputs_json, result_json,
           requested_by, model_version, processing_time_ms, created_at
    FROM prediction
"#;

// ==========================================
// PredictionRepository - 预测记录仓储
// ==========================================
pub struct PredictionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PredictionRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入预测记录
    pub fn insert(&self, record: &PredictionRecord) -> RepositoryResult<()> {
        let inputs_json = serde_json::to_string(&record.inputs)?;
        let result_json = serde_json::to_string(&record.result)?;

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO prediction (
                prediction_id, mine_id, inputs_json, result_json,
                requested_by, model_version, processing_time_ms, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                record.prediction_id,
                record.mine_id,
                inputs_json,
                result_json,
                record.requested_by,
                record.model_version,
                record.processing_time_ms,
                record.created_at.format(DATETIME_FORMAT).to_string(),
            ],
        )?;

        tracing::debug!(prediction_id = %record.prediction_id, mine_id = %record.mine_id, "预测记录已写入");
        Ok(())
    }

    /// 按ID查询
    pub fn find_by_id(&self, prediction_id: &str) -> RepositoryResult<Option<PredictionRecord>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE prediction_id = ?1", SELECT_COLUMNS);
        let raw = conn
            .query_row(&sql, params![prediction_id], PredictionRow::from_row)
            .optional()?;
        drop(conn);

        raw.map(PredictionRow::into_record).transpose()
    }

    /// 查询某请求人的历史记录（新→旧）
    ///
    /// # 参数
    /// - `mine_id`: 可选矿山过滤
    /// - `limit` / `offset`: 分页
    pub fn list_by_requester(
        &self,
        requested_by: &str,
        mine_id: Option<&str>,
        limit: u32,
        offset: u64,
    ) -> RepositoryResult<Vec<PredictionRecord>> {
        let conn = self.get_conn()?;
        let sql = format!(
            r#"{}
            WHERE requested_by = ?1 AND (?2 IS NULL OR mine_id = ?2)
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?3 OFFSET ?4
            "#,
            SELECT_COLUMNS
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(
                params![requested_by, mine_id, limit as i64, offset as i64],
                PredictionRow::from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        drop(stmt);
        drop(conn);

        rows.into_iter().map(PredictionRow::into_record).collect()
    }

    /// 统计某请求人的记录数（与 list_by_requester 过滤条件一致）
    pub fn count_by_requester(
        &self,
        requested_by: &str,
        mine_id: Option<&str>,
    ) -> RepositoryResult<u64> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM prediction WHERE requested_by = ?1 AND (?2 IS NULL OR mine_id = ?2)",
            params![requested_by, mine_id],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as u64)
    }

    /// 删除记录
    ///
    /// # 返回
    /// - Ok(false): 记录不存在
    pub fn delete_by_id(&self, prediction_id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM prediction WHERE prediction_id = ?1",
            params![prediction_id],
        )?;
        Ok(affected > 0)
    }
}

// 行的原始列值,JSON/时间列在锁外解析
struct PredictionRow {
    prediction_id: String,
    mine_id: String,
    inputs_json: String,
    result_json: String,
    requested_by: String,
    model_version: String,
    processing_time_ms: i64,
    created_at: String,
}

impl PredictionRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            prediction_id: row.get(0)?,
            mine_id: row.get(1)?,
            inputs_json: row.get(2)?,
            result_json: row.get(3)?,
            requested_by: row.get(4)?,
            model_version: row.get(5)?,
            processing_time_ms: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    fn into_record(self) -> RepositoryResult<PredictionRecord> {
        Ok(PredictionRecord {
            inputs: serde_json::from_str(&self.inputs_json)?,
            result: serde_json::from_str(&self.result_json)?,
            created_at: parse_datetime("created_at", &self.created_at)?,
            prediction_id: self.prediction_id,
            mine_id: self.mine_id,
            requested_by: self.requested_by,
            model_version: self.model_version,
            processing_time_ms: self.processing_time_ms,
        })
    }
}

#[cfg(test)]
mod tests;
