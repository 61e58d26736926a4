// ==========================================
// 矿山爆破预测系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// 约定: 配置缺失或格式错误时回退默认值,并记录 warn
// ==========================================

use crate::config::prediction_config_trait::PredictionConfigReader;
use crate::db::open_sqlite_connection;
use crate::engine::vibration::{SiteLaw, DEFAULT_INTERCEPT, DEFAULT_SLOPE};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

type ConfigResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    // 预测记录
    pub const MODEL_VERSION: &str = "prediction_model_version";

    // 历史分页
    pub const HISTORY_DEFAULT_PAGE_SIZE: &str = "history_default_page_size";
    pub const HISTORY_MAX_PAGE_SIZE: &str = "history_max_page_size";

    // 场地衰减规律
    pub const PPV_DEFAULT_INTERCEPT: &str = "ppv_default_intercept";
    pub const PPV_DEFAULT_SLOPE: &str = "ppv_default_slope";
    pub const PPV_SITE_LAW_PREFIX: &str = "ppv_site_law/";
}

// ==========================================
// 默认值
// ==========================================
pub const DEFAULT_MODEL_VERSION: &str = "v1.0.0-formula";
pub const DEFAULT_HISTORY_PAGE_SIZE: u32 = 10;
pub const DEFAULT_HISTORY_MAX_PAGE_SIZE: u32 = 100;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![GLOBAL_SCOPE, key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;

        tracing::info!(key, value, "配置已更新");
        Ok(())
    }

    /// 获取所有 global 配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 排查预测结果时核对当时的配置
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;
        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    /// 读取配置,带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> ConfigResult<String> {
        Ok(self
            .get_global_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 读取正整数配置,非法值回退默认
    fn get_positive_u32(&self, key: &str, default: u32) -> ConfigResult<u32> {
        let raw = self.get_config_or_default(key, &default.to_string())?;
        match raw.trim().parse::<u32>() {
            Ok(v) if v > 0 => Ok(v),
            _ => {
                tracing::warn!(key, value = %raw, default, "配置值非法,使用默认值");
                Ok(default)
            }
        }
    }

    /// 读取有限浮点配置,非法值回退默认
    fn get_finite_f64(&self, key: &str, default: f64) -> ConfigResult<f64> {
        let raw = self.get_config_or_default(key, &default.to_string())?;
        match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => {
                tracing::warn!(key, value = %raw, default, "配置值非法,使用默认值");
                Ok(default)
            }
        }
    }
}

#[async_trait]
impl PredictionConfigReader for ConfigManager {
    async fn get_model_version(&self) -> ConfigResult<String> {
        let value = self.get_config_or_default(config_keys::MODEL_VERSION, DEFAULT_MODEL_VERSION)?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Ok(DEFAULT_MODEL_VERSION.to_string())
        } else {
            Ok(trimmed.to_string())
        }
    }

    async fn get_history_default_page_size(&self) -> ConfigResult<u32> {
        self.get_positive_u32(config_keys::HISTORY_DEFAULT_PAGE_SIZE, DEFAULT_HISTORY_PAGE_SIZE)
    }

    async fn get_history_max_page_size(&self) -> ConfigResult<u32> {
        self.get_positive_u32(config_keys::HISTORY_MAX_PAGE_SIZE, DEFAULT_HISTORY_MAX_PAGE_SIZE)
    }

    async fn get_default_site_law(&self) -> ConfigResult<SiteLaw> {
        let intercept = self.get_finite_f64(config_keys::PPV_DEFAULT_INTERCEPT, DEFAULT_INTERCEPT)?;
        let slope = self.get_finite_f64(config_keys::PPV_DEFAULT_SLOPE, DEFAULT_SLOPE)?;
        Ok(SiteLaw::new(intercept, slope))
    }

    async fn get_mine_site_law(&self, mine_id: &str) -> ConfigResult<Option<SiteLaw>> {
        let id = mine_id.trim();
        if id.is_empty() {
            return Ok(None);
        }

        let key = format!("{}{}", config_keys::PPV_SITE_LAW_PREFIX, id);
        let raw = match self.get_global_config_value(&key)? {
            Some(v) => v,
            None => return Ok(None),
        };

        match serde_json::from_str::<SiteLaw>(&raw) {
            Ok(law) if law.is_valid() => Ok(Some(law)),
            _ => {
                tracing::warn!(key = %key, value = %raw, "矿山场地规律配置非法,回退默认规律");
                Ok(None)
            }
        }
    }
}
