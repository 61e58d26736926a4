// ==========================================
// 矿山爆破预测系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{BlastDataApi, MineApi, PpvApi, PredictionApi};
use crate::config::config_manager::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::engine::noise::{NoiseSource, SeededNoise};
use crate::repository::{BlastDataRepository, MineRepository, PredictionRepository};

/// 应用状态
///
/// 所有仓储与配置共享同一个数据库连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 配置管理器
    pub config: Arc<ConfigManager>,

    /// 矿山仓储
    pub mine_repo: Arc<MineRepository>,

    /// 预测API
    pub prediction_api: Arc<PredictionApi<ConfigManager>>,

    /// PPV API
    pub ppv_api: Arc<PpvApi<ConfigManager>>,

    /// 矿山管理API
    pub mine_api: Arc<MineApi<ConfigManager>>,

    /// 爆破数据API
    pub blast_data_api: Arc<BlastDataApi<ConfigManager>>,
}

impl AppState {
    /// 创建新的AppState实例（熵种子噪声源）
    ///
    /// # 说明
    /// 该方法会:
    /// 1. 打开数据库并建表
    /// 2. 初始化配置与Repository
    /// 3. 创建API实例
    pub fn new(db_path: String) -> Result<Self, String> {
        Self::with_noise(db_path, Box::new(SeededNoise::from_entropy()))
    }

    /// 使用指定噪声源创建AppState
    pub fn with_noise(db_path: String, noise: Box<dyn NoiseSource + Send>) -> Result<Self, String> {
        tracing::info!("初始化AppState,数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("数据库建表失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        let config = Arc::new(ConfigManager::from_connection(conn.clone()));
        let mine_repo = Arc::new(MineRepository::from_connection(conn.clone()));
        let prediction_repo = Arc::new(PredictionRepository::from_connection(conn.clone()));
        let blast_data_repo = Arc::new(BlastDataRepository::from_connection(conn));

        let prediction_api = Arc::new(PredictionApi::new(
            mine_repo.clone(),
            prediction_repo,
            config.clone(),
            noise,
        ));
        let ppv_api = Arc::new(PpvApi::new(config.clone()));
        let mine_api = Arc::new(MineApi::new(mine_repo.clone(), config.clone()));
        let blast_data_api = Arc::new(BlastDataApi::new(
            mine_repo.clone(),
            blast_data_repo,
            config.clone(),
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            config,
            mine_repo,
            prediction_api,
            ppv_api,
            mine_api,
            blast_data_api,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: MINEBLAST_DB_PATH → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("MINEBLAST_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./mineblast.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("mineblast-estimator");
        // 目录创建失败时回退当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("mineblast.db");
        }
    }

    path.to_string_lossy().to_string()
}
