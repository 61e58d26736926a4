// ==========================================
// 矿山爆破预测系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout,减少并发写入时的偶发 busy 错误
// - 建表幂等（CREATE TABLE IF NOT EXISTS）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化表结构（幂等）
///
/// 表:
/// - schema_version: 版本登记
/// - config_kv: 配置键值（scope_id='global'）
/// - mine: 矿山（软删除）
/// - prediction: 预测记录（输入/结果以 JSON 存储）
/// - blast_data: 爆破数据（参数/补充信息/结果以 JSON 存储,矿山内 blast_id 唯一）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS mine (
            mine_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            location TEXT NOT NULL,
            description TEXT,
            latitude REAL,
            longitude REAL,
            status TEXT NOT NULL DEFAULT 'active',
            capacity REAL NOT NULL DEFAULT 0,
            operating_company TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_by TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT
        );

        CREATE TABLE IF NOT EXISTS prediction (
            prediction_id TEXT PRIMARY KEY,
            mine_id TEXT NOT NULL REFERENCES mine(mine_id),
            inputs_json TEXT NOT NULL,
            result_json TEXT NOT NULL,
            requested_by TEXT NOT NULL,
            model_version TEXT NOT NULL,
            processing_time_ms INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS blast_data (
            blast_data_id TEXT PRIMARY KEY,
            mine_id TEXT NOT NULL REFERENCES mine(mine_id),
            blast_id TEXT NOT NULL,
            parameters_json TEXT NOT NULL,
            additional_info_json TEXT NOT NULL,
            results_json TEXT NOT NULL,
            entered_by TEXT NOT NULL,
            blast_date TEXT NOT NULL,
            is_verified INTEGER NOT NULL DEFAULT 0,
            status TEXT NOT NULL DEFAULT 'draft',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE (mine_id, blast_id)
        );

        CREATE INDEX IF NOT EXISTS idx_mine_active_name
            ON mine(is_active, name);
        CREATE INDEX IF NOT EXISTS idx_blast_data_mine_date
            ON blast_data(mine_id, blast_date DESC);
        CREATE INDEX IF NOT EXISTS idx_prediction_mine_created
            ON prediction(mine_id, created_at DESC);
        CREATE INDEX IF NOT EXISTS idx_prediction_requester_created
            ON prediction(requested_by, created_at DESC);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;

    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
