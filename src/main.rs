// ==========================================
// 矿山爆破预测系统 - 命令行入口
// ==========================================
// 用法:
//   mineblast-estimator [estimate] [payload.json]
//   mineblast-estimator ppv <mine_id> <distance_m> <charge_kg>
//   mineblast-estimator mines [search]
// estimate 未给出文件时从 stdin 读取 EstimationRequest JSON
// 数据库: MINEBLAST_DB_PATH,缺省为用户数据目录
// 结果以 JSON 输出到 stdout,日志写 stderr
// ==========================================

use std::io::Read;

use anyhow::{anyhow, bail, Context};
use mineblast_estimator::api::MineQuery;
use mineblast_estimator::app::{get_default_db_path, AppState};
use mineblast_estimator::{logging, EstimationRequest, APP_NAME, VERSION};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    tracing::debug!("{} v{}", APP_NAME, VERSION);

    let args: Vec<String> = std::env::args().skip(1).collect();

    let db_path = get_default_db_path();
    tracing::debug!("使用数据库: {}", db_path);
    let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;

    let output = match args.first().map(String::as_str) {
        Some("ppv") => run_ppv(&state, &args[1..]).await?,
        Some("mines") => run_mines(&state, args.get(1)).await?,
        Some("estimate") => run_estimate(&state, args.get(1))?,
        _ => run_estimate(&state, args.first())?,
    };

    println!("{}", output);
    Ok(())
}

fn run_estimate(state: &AppState, path: Option<&String>) -> anyhow::Result<String> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("无法读取输入文件: {}", path))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("无法读取 stdin")?;
            buf
        }
    };

    let request: EstimationRequest =
        serde_json::from_str(&raw).context("输入不是合法的估算请求 JSON")?;
    let result = state.prediction_api.estimate_only(&request)?;

    Ok(serde_json::to_string_pretty(&result)?)
}

async fn run_ppv(state: &AppState, args: &[String]) -> anyhow::Result<String> {
    let [mine_id, distance, charge] = args else {
        bail!("用法: ppv <mine_id> <distance_m> <charge_kg>");
    };
    let distance: f64 = distance
        .parse()
        .with_context(|| format!("distance_m 不是数值: {}", distance))?;
    let charge: f64 = charge
        .parse()
        .with_context(|| format!("charge_kg 不是数值: {}", charge))?;

    let prediction = state.ppv_api.predict(mine_id, distance, charge).await?;
    Ok(serde_json::to_string_pretty(&prediction)?)
}

async fn run_mines(state: &AppState, search: Option<&String>) -> anyhow::Result<String> {
    let query = MineQuery {
        search: search.cloned(),
        ..Default::default()
    };
    let page = state.mine_api.list_mines(&query).await?;
    Ok(serde_json::to_string_pretty(&page)?)
}
