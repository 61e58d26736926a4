// ==========================================
// 矿山爆破预测系统 - 爆破效果估算引擎
// ==========================================
// 职责: 设计参数 + 环境条件 → 六项效果指标 + 建议
// 输入: EstimationInput + 调用方注入的 NoiseSource
// 输出: EstimationResult
// ==========================================
// 红线: 纯函数,无 I/O,无共享可变状态
// 红线: 先夹取后取整,输出始终落在声明区间内
// 抽取顺序: 效率 → 安全 → 破碎 → 振动 → 空气冲击 → 置信度
// ==========================================

use crate::domain::estimation::{EstimationInput, EstimationResult};
use crate::domain::types::{RockType, WeatherCondition};
use crate::engine::error::EngineResult;
use crate::engine::input_validator::validate_estimation_input;
use crate::engine::noise::NoiseSource;
use crate::engine::recommendation::recommend;
use tracing::instrument;

// ==========================================
// 系数表
// ==========================================

/// 岩石类型系数
pub fn rock_type_factor(rock_type: RockType) -> f64 {
    match rock_type {
        RockType::Granite => 0.9,
        RockType::Limestone => 1.1,
        RockType::Sandstone => 1.0,
        RockType::Basalt => 0.85,
        RockType::Quartzite => 0.95,
    }
}

/// 天气系数
pub fn weather_factor(weather: WeatherCondition) -> f64 {
    match weather {
        WeatherCondition::Clear => 1.0,
        WeatherCondition::Cloudy => 0.98,
        WeatherCondition::Rainy => 0.85,
        WeatherCondition::Windy => 0.92,
    }
}

// ==========================================
// 指标定义
// ==========================================

/// 单项指标: 基准值 + 波动幅度 + 输出区间
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSpec {
    pub base: f64,
    /// 总波动幅度,扰动倍数落在 [1 - spread/2, 1 + spread/2)
    pub spread: f64,
    pub min: f64,
    pub max: f64,
}

pub const EFFICIENCY: MetricSpec = MetricSpec { base: 85.0, spread: 0.20, min: 60.0, max: 100.0 };
pub const SAFETY: MetricSpec = MetricSpec { base: 90.0, spread: 0.15, min: 70.0, max: 100.0 };
pub const FRAGMENTATION: MetricSpec = MetricSpec { base: 80.0, spread: 0.25, min: 50.0, max: 100.0 };
pub const VIBRATION: MetricSpec = MetricSpec { base: 30.0, spread: 0.30, min: 10.0, max: 60.0 };
pub const AIRBLAST: MetricSpec = MetricSpec { base: 110.0, spread: 0.20, min: 90.0, max: 130.0 };

/// 置信度: 85 + draw * 13,夹取到 [75, 98]
pub const CONFIDENCE_BASE: f64 = 85.0;
pub const CONFIDENCE_SPAN: f64 = 13.0;
pub const CONFIDENCE_MIN: f64 = 75.0;
pub const CONFIDENCE_MAX: f64 = 98.0;

// 参考工况
const REFERENCE_BURDEN_M: f64 = 5.0;
const REFERENCE_SPACING_M: f64 = 6.0;
const REFERENCE_CHARGE_KG: f64 = 25.0;

// ==========================================
// BlastOutcomeEstimator - 爆破效果估算引擎
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct BlastOutcomeEstimator;

impl BlastOutcomeEstimator {
    /// 创建新的估算引擎
    pub fn new() -> Self {
        Self
    }

    /// 估算爆破效果
    ///
    /// 计算前先校验输入;校验失败时不会从噪声源抽取任何值。
    /// 对同一输入与同一抽取序列,结果逐位相同。
    #[instrument(skip_all, fields(rock_type = %input.rock_type, weather = %input.weather_condition))]
    pub fn estimate<N: NoiseSource + ?Sized>(
        &self,
        input: &EstimationInput,
        noise: &mut N,
    ) -> EngineResult<EstimationResult> {
        validate_estimation_input(input)?;

        // 1. 系数查表
        let rock = rock_type_factor(input.rock_type);
        let weather = weather_factor(input.weather_condition);
        let charge_ratio = input.explosive_amount / REFERENCE_CHARGE_KG;

        // 2~3. 五项指标（固定抽取顺序）
        let efficiency = Self::metric(EFFICIENCY, rock * weather, noise);
        let safety = Self::metric(
            SAFETY,
            (input.burden / REFERENCE_BURDEN_M) * (input.spacing / REFERENCE_SPACING_M) * weather,
            noise,
        );
        let fragmentation = Self::metric(FRAGMENTATION, rock * charge_ratio, noise);
        let vibration = Self::metric(
            VIBRATION,
            charge_ratio * (REFERENCE_BURDEN_M / input.burden),
            noise,
        );
        let airblast = Self::metric(AIRBLAST, charge_ratio * weather, noise);

        // 4. 置信度
        let confidence = clamp_metric(
            CONFIDENCE_BASE + sanitize_draw(noise.next_unit()) * CONFIDENCE_SPAN,
            CONFIDENCE_MIN,
            CONFIDENCE_MAX,
        );

        // 6. 建议
        let recommendations = recommend(input);

        // 5. 取整（夹取之后）
        let result = EstimationResult {
            efficiency: round2(efficiency),
            safety: round2(safety),
            fragmentation_quality: round2(fragmentation),
            vibration_level: round2(vibration),
            airblast_level: round2(airblast),
            confidence: round2(confidence),
            recommendations,
        };

        tracing::debug!(
            efficiency = result.efficiency,
            safety = result.safety,
            vibration = result.vibration_level,
            recommendations = result.recommendations.len(),
            "estimation done"
        );

        Ok(result)
    }

    /// base * factor * 扰动,再夹取到区间
    fn metric<N: NoiseSource + ?Sized>(spec: MetricSpec, factor: f64, noise: &mut N) -> f64 {
        let draw = sanitize_draw(noise.next_unit());
        let raw = spec.base * factor * perturbation(draw, spec.spread);
        clamp_metric(raw, spec.min, spec.max)
    }
}

// ==========================================
// 数值工具
// ==========================================

/// 扰动倍数: 1 + draw * spread - spread / 2
pub fn perturbation(draw: f64, spread: f64) -> f64 {
    1.0 + draw * spread - spread / 2.0
}

/// 噪声值兜底: 非有限值按 0 处理,其余夹到 [0, 1]
fn sanitize_draw(draw: f64) -> f64 {
    if draw.is_finite() {
        draw.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// 夹取到区间;极端下溢产生的 NaN 落到下界
fn clamp_metric(raw: f64, min: f64, max: f64) -> f64 {
    if raw.is_nan() {
        min
    } else {
        raw.clamp(min, max)
    }
}

/// 保留两位小数（四舍五入,远离零）
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
