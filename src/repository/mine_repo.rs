// ==========================================
// 矿山爆破预测系统 - 矿山仓储
// ==========================================
// 红线: Repository 不含业务逻辑（名称冲突、权限判断在 API 层）
// 删除: 只做软删除（is_active=0）
// ==========================================

use crate::domain::mine::{Coordinates, Mine, MineFilter, MineStatus};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

/// 时间列存储格式（毫秒精度,保证同秒内排序稳定）
pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// 解析时间列
pub(crate) fn parse_datetime(field: &str, raw: &str) -> RepositoryResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .map_err(|e| RepositoryError::FieldValueError {
            field: field.to_string(),
            message: format!("{} ({})", e, raw),
        })
}

const SELECT_COLUMNS: &str = r#"
    SELECT mine_id, name, location, description, latitude, longitude, status,
           capacity, operating_company, is_active, created_by, created_at, updated_at
    FROM mine
"#;

// 启用中 + 可选状态 + 可选子串搜索（?1 状态, ?2 搜索词）
const ACTIVE_FILTER: &str = r#"
    WHERE is_active = 1
      AND (?1 IS NULL OR status = ?1)
      AND (?2 IS NULL
           OR instr(lower(name), lower(?2)) > 0
           OR instr(lower(location), lower(?2)) > 0
           OR instr(lower(coalesce(operating_company, '')), lower(?2)) > 0)
"#;

// ==========================================
// MineRepository - 矿山仓储
// ==========================================
/// 职责: 管理 mine 表的读写
pub struct MineRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MineRepository {
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

    /// 新增矿山
    pub fn insert(&self, mine: &Mine) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO mine (
                mine_id, name, location, description, latitude, longitude, status,
                capacity, operating_company, is_active, created_by, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
            params![
                mine.mine_id,
                mine.name,
                mine.location,
                mine.description,
                mine.coordinates.map(|c| c.latitude),
                mine.coordinates.map(|c| c.longitude),
                mine.status.as_str(),
                mine.capacity,
                mine.operating_company,
                mine.is_active as i32,
                mine.created_by,
                mine.created_at.format(DATETIME_FORMAT).to_string(),
                mine.updated_at.map(|t| t.format(DATETIME_FORMAT).to_string()),
            ],
        )?;
        Ok(())
    }

    /// 覆写可修改字段（不含 is_active / created_*）
    ///
    /// # 返回
    /// - Ok(false): 矿山不存在
    pub fn update(&self, mine: &Mine) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE mine SET
                name = ?2, location = ?3, description = ?4, latitude = ?5, longitude = ?6,
                status = ?7, capacity = ?8, operating_company = ?9, updated_at = ?10
            WHERE mine_id = ?1
            "#,
            params![
                mine.mine_id,
                mine.name,
                mine.location,
                mine.description,
                mine.coordinates.map(|c| c.latitude),
                mine.coordinates.map(|c| c.longitude),
                mine.status.as_str(),
                mine.capacity,
                mine.operating_company,
                mine.updated_at.map(|t| t.format(DATETIME_FORMAT).to_string()),
            ],
        )?;
        Ok(affected > 0)
    }

    /// 按ID查询（不区分启用状态）
    pub fn find_by_id(&self, mine_id: &str) -> RepositoryResult<Option<Mine>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE mine_id = ?1", SELECT_COLUMNS);
        let raw = conn
            .query_row(&sql, params![mine_id], MineRow::from_row)
            .optional()?;
        drop(conn);

        raw.map(MineRow::into_mine).transpose()
    }

    /// 按ID查询启用中的矿山
    ///
    /// # 返回
    /// - Ok(None): 不存在或已停用
    pub fn find_active_by_id(&self, mine_id: &str) -> RepositoryResult<Option<Mine>> {
        Ok(self.find_by_id(mine_id)?.filter(|m| m.is_active))
    }

    /// 按名称（精确）查询启用中的矿山,可排除某个ID
    pub fn find_active_by_name(
        &self,
        name: &str,
        exclude_id: Option<&str>,
    ) -> RepositoryResult<Option<Mine>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} WHERE is_active = 1 AND name = ?1 AND (?2 IS NULL OR mine_id <> ?2) LIMIT 1",
            SELECT_COLUMNS
        );
        let raw = conn
            .query_row(&sql, params![name, exclude_id], MineRow::from_row)
            .optional()?;
        drop(conn);

        raw.map(MineRow::into_mine).transpose()
    }

    /// 列出全部启用中的矿山（按名称排序）
    pub fn list_active(&self) -> RepositoryResult<Vec<Mine>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE is_active = 1 ORDER BY name, mine_id", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], MineRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        drop(stmt);
        drop(conn);

        rows.into_iter().map(MineRow::into_mine).collect()
    }

    /// 分页列出启用中的矿山（新→旧）
    pub fn list_active_page(
        &self,
        filter: &MineFilter,
        limit: u32,
        offset: u64,
    ) -> RepositoryResult<Vec<Mine>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} {} ORDER BY created_at DESC, rowid DESC LIMIT ?3 OFFSET ?4",
            SELECT_COLUMNS, ACTIVE_FILTER
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(
                params![
                    filter.status.map(|s| s.as_str()),
                    filter.search.as_deref(),
                    limit as i64,
                    offset as i64
                ],
                MineRow::from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        drop(stmt);
        drop(conn);

        rows.into_iter().map(MineRow::into_mine).collect()
    }

    /// 统计启用中的矿山数（与 list_active_page 过滤条件一致）
    pub fn count_active(&self, filter: &MineFilter) -> RepositoryResult<u64> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT COUNT(*) FROM mine {}", ACTIVE_FILTER);
        let count: i64 = conn.query_row(
            &sql,
            params![filter.status.map(|s| s.as_str()), filter.search.as_deref()],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as u64)
    }

    /// 启用/停用矿山
    ///
    /// # 返回
    /// - Ok(false): 矿山不存在
    pub fn set_active(&self, mine_id: &str, active: bool) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE mine SET is_active = ?1 WHERE mine_id = ?2",
            params![active as i32, mine_id],
        )?;
        Ok(affected > 0)
    }
}

// 行的原始列值,时间/枚举列在锁外解析
struct MineRow {
    mine_id: String,
    name: String,
    location: String,
    description: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    status: String,
    capacity: f64,
    operating_company: Option<String>,
    is_active: i32,
    created_by: Option<String>,
    created_at: String,
    updated_at: Option<String>,
}

impl MineRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            mine_id: row.get(0)?,
            name: row.get(1)?,
            location: row.get(2)?,
            description: row.get(3)?,
            latitude: row.get(4)?,
            longitude: row.get(5)?,
            status: row.get(6)?,
            capacity: row.get(7)?,
            operating_company: row.get(8)?,
            is_active: row.get(9)?,
            created_by: row.get(10)?,
            created_at: row.get(11)?,
            updated_at: row.get(12)?,
        })
    }

    fn into_mine(self) -> RepositoryResult<Mine> {
        let status =
            MineStatus::parse(&self.status).ok_or_else(|| RepositoryError::FieldValueError {
                field: "status".to_string(),
                message: format!("未知矿山状态: {}", self.status),
            })?;

        let coordinates = match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates { latitude, longitude }),
            _ => None,
        };

        Ok(Mine {
            created_at: parse_datetime("created_at", &self.created_at)?,
            updated_at: self
                .updated_at
                .as_deref()
                .map(|raw| parse_datetime("updated_at", raw))
                .transpose()?,
            mine_id: self.mine_id,
            name: self.name,
            location: self.location,
            description: self.description,
            coordinates,
            status,
            capacity: self.capacity,
            operating_company: self.operating_company,
            is_active: self.is_active != 0,
            created_by: self.created_by,
        })
    }
}
