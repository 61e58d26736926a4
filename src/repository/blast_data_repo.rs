// ==========================================
// 矿山爆破预测系统 - 爆破数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑（权限、编号冲突判断在 API 层）
// 存储: parameters_json / additional_info_json / results_json 以 JSON 文本保存
// 唯一: (mine_id, blast_id)
// ==========================================

use crate::domain::blast_data::{BlastDataFilter, BlastDataRecord, BlastStatus};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::mine_repo::{parse_datetime, DATETIME_FORMAT};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = r#"
    SELECT blast_data_id, mine_id, blast_id, parameters_json, additional_info_json,
           results_json, entered_by, blast_date, is_verified, status, created_at, updated_at
    FROM blast_data
"#;

// ?1 矿山, ?2 编号子串, ?3 起始日期, ?4 截止日期
const MINE_FILTER: &str = r#"
    WHERE mine_id = ?1
      AND (?2 IS NULL OR instr(lower(blast_id), lower(?2)) > 0)
      AND (?3 IS NULL OR blast_date >= ?3)
      AND (?4 IS NULL OR blast_date <= ?4)
"#;

fn format_datetime(t: &NaiveDateTime) -> String {
    t.format(DATETIME_FORMAT).to_string()
}

// ==========================================
// BlastDataRepository - 爆破数据仓储
// ==========================================
pub struct BlastDataRepository {
    conn: Arc<Mutex<Connection>>,
}

impl BlastDataRepository {
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

    /// 写入爆破数据
    ///
    /// # 错误
    /// - UniqueConstraintViolation: 同一矿山内 blast_id 重复
    pub fn insert(&self, record: &BlastDataRecord) -> RepositoryResult<()> {
        let parameters_json = serde_json::to_string(&record.parameters)?;
        let additional_info_json = serde_json::to_string(&record.additional_info)?;
        let results_json = serde_json::to_string(&record.results)?;

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO blast_data (
                blast_data_id, mine_id, blast_id, parameters_json, additional_info_json,
                results_json, entered_by, blast_date, is_verified, status, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                record.blast_data_id,
                record.mine_id,
                record.blast_id,
                parameters_json,
                additional_info_json,
                results_json,
                record.entered_by,
                format_datetime(&record.blast_date),
                record.is_verified as i32,
                record.status.as_str(),
                format_datetime(&record.created_at),
                format_datetime(&record.updated_at),
            ],
        )?;

        tracing::debug!(
            blast_data_id = %record.blast_data_id,
            mine_id = %record.mine_id,
            blast_id = %record.blast_id,
            "爆破数据已写入"
        );
        Ok(())
    }

    /// 覆写记录（mine_id / entered_by / created_at 不变）
    ///
    /// # 返回
    /// - Ok(false): 记录不存在
    pub fn update(&self, record: &BlastDataRecord) -> RepositoryResult<bool> {
        let parameters_json = serde_json::to_string(&record.parameters)?;
        let additional_info_json = serde_json::to_string(&record.additional_info)?;
        let results_json = serde_json::to_string(&record.results)?;

        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE blast_data SET
                blast_id = ?2, parameters_json = ?3, additional_info_json = ?4,
                results_json = ?5, blast_date = ?6, is_verified = ?7, status = ?8,
                updated_at = ?9
            WHERE blast_data_id = ?1
            "#,
            params![
                record.blast_data_id,
                record.blast_id,
                parameters_json,
                additional_info_json,
                results_json,
                format_datetime(&record.blast_date),
                record.is_verified as i32,
                record.status.as_str(),
                format_datetime(&record.updated_at),
            ],
        )?;
        Ok(affected > 0)
    }

    /// 按ID查询
    pub fn find_by_id(&self, blast_data_id: &str) -> RepositoryResult<Option<BlastDataRecord>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE blast_data_id = ?1", SELECT_COLUMNS);
        let raw = conn
            .query_row(&sql, params![blast_data_id], BlastDataRow::from_row)
            .optional()?;
        drop(conn);

        raw.map(BlastDataRow::into_record).transpose()
    }

    /// 按矿山 + 编号（精确）查询
    pub fn find_by_blast_id(
        &self,
        mine_id: &str,
        blast_id: &str,
    ) -> RepositoryResult<Option<BlastDataRecord>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE mine_id = ?1 AND blast_id = ?2", SELECT_COLUMNS);
        let raw = conn
            .query_row(&sql, params![mine_id, blast_id], BlastDataRow::from_row)
            .optional()?;
        drop(conn);

        raw.map(BlastDataRow::into_record).transpose()
    }

    /// 查询某矿山的爆破数据（爆破日期 新→旧）
    pub fn list_by_mine(
        &self,
        mine_id: &str,
        filter: &BlastDataFilter,
        limit: u32,
        offset: u64,
    ) -> RepositoryResult<Vec<BlastDataRecord>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} {} ORDER BY blast_date DESC, rowid DESC LIMIT ?5 OFFSET ?6",
            SELECT_COLUMNS, MINE_FILTER
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(
                params![
                    mine_id,
                    filter.blast_id.as_deref(),
                    filter.start_date.as_ref().map(format_datetime),
                    filter.end_date.as_ref().map(format_datetime),
                    limit as i64,
                    offset as i64
                ],
                BlastDataRow::from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        drop(stmt);
        drop(conn);

        rows.into_iter().map(BlastDataRow::into_record).collect()
    }

    /// 统计某矿山的记录数（与 list_by_mine 过滤条件一致）
    pub fn count_by_mine(&self, mine_id: &str, filter: &BlastDataFilter) -> RepositoryResult<u64> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT COUNT(*) FROM blast_data {}", MINE_FILTER);
        let count: i64 = conn.query_row(
            &sql,
            params![
                mine_id,
                filter.blast_id.as_deref(),
                filter.start_date.as_ref().map(format_datetime),
                filter.end_date.as_ref().map(format_datetime),
            ],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as u64)
    }

    /// 删除记录
    ///
    /// # 返回
    /// - Ok(false): 记录不存在
    pub fn delete_by_id(&self, blast_data_id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM blast_data WHERE blast_data_id = ?1",
            params![blast_data_id],
        )?;
        Ok(affected > 0)
    }
}

// 行的原始列值,JSON/时间/枚举列在锁外解析
struct BlastDataRow {
    blast_data_id: String,
    mine_id: String,
    blast_id: String,
    parameters_json: String,
    additional_info_json: String,
    results_json: String,
    entered_by: String,
    blast_date: String,
    is_verified: i32,
    status: String,
    created_at: String,
    updated_at: String,
}

impl BlastDataRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            blast_data_id: row.get(0)?,
            mine_id: row.get(1)?,
            blast_id: row.get(2)?,
            parameters_json: row.get(3)?,
            additional_info_json: row.get(4)?,
            results_json: row.get(5)?,
            entered_by: row.get(6)?,
            blast_date: row.get(7)?,
            is_verified: row.get(8)?,
            status: row.get(9)?,
            created_at: row.get(10)?,
            updated_at: row.get(11)?,
        })
    }

    fn into_record(self) -> RepositoryResult<BlastDataRecord> {
        let status =
            BlastStatus::parse(&self.status).ok_or_else(|| RepositoryError::FieldValueError {
                field: "status".to_string(),
                message: format!("未知记录状态: {}", self.status),
            })?;

        Ok(BlastDataRecord {
            parameters: serde_json::from_str(&self.parameters_json)?,
            additional_info: serde_json::from_str(&self.additional_info_json)?,
            results: serde_json::from_str(&self.results_json)?,
            blast_date: parse_datetime("blast_date", &self.blast_date)?,
            created_at: parse_datetime("created_at", &self.created_at)?,
            updated_at: parse_datetime("updated_at", &self.updated_at)?,
            status,
            blast_data_id: self.blast_data_id,
            mine_id: self.mine_id,
            blast_id: self.blast_id,
            entered_by: self.entered_by,
            is_verified: self.is_verified != 0,
        })
    }
}

#[cfg(test)]
mod tests;
