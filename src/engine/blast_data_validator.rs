// ==========================================
// 矿山爆破预测系统 - 爆破数据校验
// ==========================================
// 职责: 爆破参数 / 补充信息 / 爆后结果 → 校验通过或字段级错误
// 顺序: 先按字段顺序检查必填,再检查取值范围
// ==========================================

use crate::domain::blast_data::{
    AdditionalInfo, BlastParameters, BlastParametersInput, BlastResults, MAX_NOTES_CHARS,
    RECORDED_ROCK_TYPES, RECORDED_WEATHER_CONDITIONS,
};
use crate::engine::error::{EngineResult, EstimationError};
use crate::engine::input_validator::{ensure_in_range, require_number, FieldRange};

pub mod fields {
    pub const BLAST_ID: &str = "blastId";
    pub const BLAST_PARAMETERS: &str = "blastParameters";

    pub const DEPTH: &str = "depth";
    pub const BURDEN: &str = "burden";
    pub const SPACING: &str = "spacing";
    pub const STEMMING: &str = "stemming";
    pub const TOTAL_CHARGE_LENGTH: &str = "totalChargeLength";
    pub const EXPLOSIVE_PER_HOLE: &str = "explosivePerHole";
    pub const MAX_CHARGE_PER_DELAY: &str = "maxChargePerDelay";
    pub const TOTAL_EXPLOSIVE_AMOUNT: &str = "totalExplosiveAmount";
    pub const TOTAL_ROCK_BLASTED: &str = "totalRockBlasted";
    pub const POWER_FACTOR: &str = "powerFactor";
    pub const DISTANCE: &str = "distance";
    pub const STANDARD_DEVIATION: &str = "standardDeviation";
    pub const FREQUENCY: &str = "frequency";

    pub const ROCK_TYPE: &str = "additionalInfo.rockType";
    pub const WEATHER_CONDITION: &str = "additionalInfo.weatherCondition";
    pub const NOTES: &str = "additionalInfo.notes";

    pub const EFFICIENCY: &str = "results.efficiency";
    pub const SAFETY_SCORE: &str = "results.safetyScore";
    pub const VIBRATION_LEVEL: &str = "results.vibrationLevel";
    pub const AIRBLAST_LEVEL: &str = "results.airblastLevel";
}

// 参数取值范围（闭区间）
const DEPTH_RANGE: FieldRange = FieldRange { field: fields::DEPTH, min: 0.1, max: 100.0 };
const BURDEN_RANGE: FieldRange = FieldRange { field: fields::BURDEN, min: 0.5, max: 20.0 };
const SPACING_RANGE: FieldRange = FieldRange { field: fields::SPACING, min: 0.5, max: 25.0 };
const STEMMING_RANGE: FieldRange = FieldRange { field: fields::STEMMING, min: 0.1, max: 10.0 };
const TOTAL_CHARGE_LENGTH_RANGE: FieldRange = FieldRange { field: fields::TOTAL_CHARGE_LENGTH, min: 0.1, max: 50.0 };
const EXPLOSIVE_PER_HOLE_RANGE: FieldRange = FieldRange { field: fields::EXPLOSIVE_PER_HOLE, min: 0.1, max: 500.0 };
const MAX_CHARGE_PER_DELAY_RANGE: FieldRange = FieldRange { field: fields::MAX_CHARGE_PER_DELAY, min: 0.1, max: 2000.0 };
const TOTAL_EXPLOSIVE_AMOUNT_RANGE: FieldRange = FieldRange { field: fields::TOTAL_EXPLOSIVE_AMOUNT, min: 0.1, max: 10000.0 };
const TOTAL_ROCK_BLASTED_RANGE: FieldRange = FieldRange { field: fields::TOTAL_ROCK_BLASTED, min: 1.0, max: 100000.0 };
const POWER_FACTOR_RANGE: FieldRange = FieldRange { field: fields::POWER_FACTOR, min: 0.1, max: 50.0 };
const DISTANCE_RANGE: FieldRange = FieldRange { field: fields::DISTANCE, min: 10.0, max: 2000.0 };
const STANDARD_DEVIATION_RANGE: FieldRange = FieldRange { field: fields::STANDARD_DEVIATION, min: 0.0, max: 100.0 };
const FREQUENCY_RANGE: FieldRange = FieldRange { field: fields::FREQUENCY, min: 1.0, max: 500.0 };

const EFFICIENCY_RANGE: FieldRange = FieldRange { field: fields::EFFICIENCY, min: 0.0, max: 100.0 };
const SAFETY_SCORE_RANGE: FieldRange = FieldRange { field: fields::SAFETY_SCORE, min: 0.0, max: 100.0 };

/// 校验爆破编号: 必填,去除首尾空白
pub fn validate_blast_id(raw: Option<&str>) -> EngineResult<String> {
    match raw.map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        _ => Err(EstimationError::invalid(fields::BLAST_ID, "字段缺失")),
    }
}

/// 校验 13 项爆破参数
pub fn validate_blast_parameters(input: &BlastParametersInput) -> EngineResult<BlastParameters> {
    let params = BlastParameters {
        depth: require_number(fields::DEPTH, input.depth)?,
        burden: require_number(fields::BURDEN, input.burden)?,
        spacing: require_number(fields::SPACING, input.spacing)?,
        stemming: require_number(fields::STEMMING, input.stemming)?,
        total_charge_length: require_number(fields::TOTAL_CHARGE_LENGTH, input.total_charge_length)?,
        explosive_per_hole: require_number(fields::EXPLOSIVE_PER_HOLE, input.explosive_per_hole)?,
        max_charge_per_delay: require_number(fields::MAX_CHARGE_PER_DELAY, input.max_charge_per_delay)?,
        total_explosive_amount: require_number(
            fields::TOTAL_EXPLOSIVE_AMOUNT,
            input.total_explosive_amount,
        )?,
        total_rock_blasted: require_number(fields::TOTAL_ROCK_BLASTED, input.total_rock_blasted)?,
        power_factor: require_number(fields::POWER_FACTOR, input.power_factor)?,
        distance: require_number(fields::DISTANCE, input.distance)?,
        standard_deviation: require_number(fields::STANDARD_DEVIATION, input.standard_deviation)?,
        frequency: require_number(fields::FREQUENCY, input.frequency)?,
    };

    ensure_in_range(DEPTH_RANGE, params.depth)?;
    ensure_in_range(BURDEN_RANGE, params.burden)?;
    ensure_in_range(SPACING_RANGE, params.spacing)?;
    ensure_in_range(STEMMING_RANGE, params.stemming)?;
    ensure_in_range(TOTAL_CHARGE_LENGTH_RANGE, params.total_charge_length)?;
    ensure_in_range(EXPLOSIVE_PER_HOLE_RANGE, params.explosive_per_hole)?;
    ensure_in_range(MAX_CHARGE_PER_DELAY_RANGE, params.max_charge_per_delay)?;
    ensure_in_range(TOTAL_EXPLOSIVE_AMOUNT_RANGE, params.total_explosive_amount)?;
    ensure_in_range(TOTAL_ROCK_BLASTED_RANGE, params.total_rock_blasted)?;
    ensure_in_range(POWER_FACTOR_RANGE, params.power_factor)?;
    ensure_in_range(DISTANCE_RANGE, params.distance)?;
    ensure_in_range(STANDARD_DEVIATION_RANGE, params.standard_deviation)?;
    ensure_in_range(FREQUENCY_RANGE, params.frequency)?;

    Ok(params)
}

/// 校验补充信息（全部可选）
pub fn validate_additional_info(info: &AdditionalInfo) -> EngineResult<()> {
    if let Some(rock) = info.rock_type.as_deref() {
        if !RECORDED_ROCK_TYPES.contains(&rock) {
            return Err(EstimationError::invalid(
                fields::ROCK_TYPE,
                format!("不支持的岩石类型: {}", rock),
            ));
        }
    }

    if let Some(weather) = info.weather_condition.as_deref() {
        if !RECORDED_WEATHER_CONDITIONS.contains(&weather) {
            return Err(EstimationError::invalid(
                fields::WEATHER_CONDITION,
                format!("不支持的天气状况: {}", weather),
            ));
        }
    }

    if let Some(notes) = info.notes.as_deref() {
        let chars = notes.chars().count();
        if chars > MAX_NOTES_CHARS {
            return Err(EstimationError::invalid(
                fields::NOTES,
                format!("超过 {} 字符: {}", MAX_NOTES_CHARS, chars),
            ));
        }
    }

    Ok(())
}

/// 校验爆后结果（全部可选）
pub fn validate_blast_results(results: &BlastResults) -> EngineResult<()> {
    if let Some(v) = results.efficiency {
        ensure_in_range(EFFICIENCY_RANGE, require_number(fields::EFFICIENCY, Some(v))?)?;
    }
    if let Some(v) = results.safety_score {
        ensure_in_range(SAFETY_SCORE_RANGE, require_number(fields::SAFETY_SCORE, Some(v))?)?;
    }
    if let Some(v) = results.vibration_level {
        ensure_non_negative(fields::VIBRATION_LEVEL, v)?;
    }
    if let Some(v) = results.airblast_level {
        ensure_non_negative(fields::AIRBLAST_LEVEL, v)?;
    }
    Ok(())
}

fn ensure_non_negative(field: &'static str, value: f64) -> EngineResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(EstimationError::invalid(field, format!("不能为负数: {}", value)))
    }
}
