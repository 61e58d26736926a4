// ==========================================
// 矿山爆破预测系统 - 输入校验
// ==========================================
// 职责: 边界载荷 → 强类型输入
// 红线: 校验在任何计算之前完成,失败时指明字段名
// ==========================================
// 校验层次:
// 1) 估算输入: 数值字段为有限正数
// 2) 估算请求: 字段必填 + 枚举成员 + 1)
// 3) 预测载荷: 13 个字段必填 + 枚举成员 + 记录取值范围
// ==========================================

use crate::domain::estimation::{EstimationInput, EstimationRequest};
use crate::domain::prediction::{PredictionInputs, ValidatedInputs};
use crate::domain::types::{RockType, WeatherCondition};
use crate::engine::error::{EngineResult, EstimationError};

// ==========================================
// 字段名（外部载荷口径）
// ==========================================
pub mod fields {
    pub const ROCK_TYPE: &str = "rockType";
    pub const ROCK_DENSITY: &str = "rockDensity";
    pub const ROCK_STRENGTH: &str = "rockStrength";
    pub const WATER_CONTENT: &str = "waterContent";
    pub const HOLE_DEPTH: &str = "holeDepth";
    pub const HOLE_DIAMETER: &str = "holeDiameter";
    pub const EXPLOSIVE_AMOUNT: &str = "explosiveAmount";
    pub const BURDEN: &str = "burden";
    pub const SPACING: &str = "spacing";
    pub const SUBDRILL: &str = "subdrill";
    pub const WEATHER_CONDITION: &str = "weatherCondition";
    pub const TEMPERATURE: &str = "temperature";
    pub const HUMIDITY: &str = "humidity";
}

/// 预测记录的取值范围（闭区间）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRange {
    pub field: &'static str,
    pub min: f64,
    pub max: f64,
}

pub const ROCK_DENSITY_RANGE: FieldRange = FieldRange { field: fields::ROCK_DENSITY, min: 1000.0, max: 5000.0 };
pub const ROCK_STRENGTH_RANGE: FieldRange = FieldRange { field: fields::ROCK_STRENGTH, min: 10.0, max: 500.0 };
pub const WATER_CONTENT_RANGE: FieldRange = FieldRange { field: fields::WATER_CONTENT, min: 0.0, max: 100.0 };
pub const HOLE_DEPTH_RANGE: FieldRange = FieldRange { field: fields::HOLE_DEPTH, min: 1.0, max: 50.0 };
pub const HOLE_DIAMETER_RANGE: FieldRange = FieldRange { field: fields::HOLE_DIAMETER, min: 50.0, max: 500.0 };
pub const EXPLOSIVE_AMOUNT_RANGE: FieldRange = FieldRange { field: fields::EXPLOSIVE_AMOUNT, min: 1.0, max: 1000.0 };
pub const BURDEN_RANGE: FieldRange = FieldRange { field: fields::BURDEN, min: 1.0, max: 20.0 };
pub const SPACING_RANGE: FieldRange = FieldRange { field: fields::SPACING, min: 1.0, max: 25.0 };
pub const SUBDRILL_RANGE: FieldRange = FieldRange { field: fields::SUBDRILL, min: 0.0, max: 5.0 };
pub const TEMPERATURE_RANGE: FieldRange = FieldRange { field: fields::TEMPERATURE, min: -40.0, max: 60.0 };
pub const HUMIDITY_RANGE: FieldRange = FieldRange { field: fields::HUMIDITY, min: 0.0, max: 100.0 };

// ==========================================
// 1) 估算输入校验
// ==========================================

/// 校验估算输入: 4 个数值字段必须为有限正数
///
/// 枚举字段由类型保证,无需再查
pub fn validate_estimation_input(input: &EstimationInput) -> EngineResult<()> {
    ensure_positive(fields::BURDEN, input.burden)?;
    ensure_positive(fields::SPACING, input.spacing)?;
    ensure_positive(fields::EXPLOSIVE_AMOUNT, input.explosive_amount)?;
    ensure_positive(fields::ROCK_STRENGTH, input.rock_strength)?;
    Ok(())
}

// ==========================================
// 2) 估算请求解析
// ==========================================

/// 将未校验的估算请求转换为估算输入
pub fn parse_estimation_request(request: &EstimationRequest) -> EngineResult<EstimationInput> {
    let input = EstimationInput {
        rock_type: require_rock_type(request.rock_type.as_deref())?,
        weather_condition: require_weather(request.weather_condition.as_deref())?,
        burden: require_number(fields::BURDEN, request.burden)?,
        spacing: require_number(fields::SPACING, request.spacing)?,
        explosive_amount: require_number(fields::EXPLOSIVE_AMOUNT, request.explosive_amount)?,
        rock_strength: require_number(fields::ROCK_STRENGTH, request.rock_strength)?,
    };

    validate_estimation_input(&input)?;
    Ok(input)
}

// ==========================================
// 3) 预测载荷校验
// ==========================================

/// 校验 13 个字段的预测载荷
///
/// 先按字段顺序检查必填（与外部载荷字段顺序一致）,再检查取值范围
pub fn validate_prediction_inputs(inputs: &PredictionInputs) -> EngineResult<ValidatedInputs> {
    // 必填 + 类型
    let rock_type = require_rock_type(inputs.rock_type.as_deref())?;
    let rock_density = require_number(fields::ROCK_DENSITY, inputs.rock_density)?;
    let rock_strength = require_number(fields::ROCK_STRENGTH, inputs.rock_strength)?;
    let water_content = require_number(fields::WATER_CONTENT, inputs.water_content)?;
    let hole_depth = require_number(fields::HOLE_DEPTH, inputs.hole_depth)?;
    let hole_diameter = require_number(fields::HOLE_DIAMETER, inputs.hole_diameter)?;
    let explosive_amount = require_number(fields::EXPLOSIVE_AMOUNT, inputs.explosive_amount)?;
    let burden = require_number(fields::BURDEN, inputs.burden)?;
    let spacing = require_number(fields::SPACING, inputs.spacing)?;
    let subdrill = require_number(fields::SUBDRILL, inputs.subdrill)?;
    let weather_condition = require_weather(inputs.weather_condition.as_deref())?;
    let temperature = require_number(fields::TEMPERATURE, inputs.temperature)?;
    let humidity = require_number(fields::HUMIDITY, inputs.humidity)?;

    // 取值范围
    ensure_in_range(ROCK_DENSITY_RANGE, rock_density)?;
    ensure_in_range(ROCK_STRENGTH_RANGE, rock_strength)?;
    ensure_in_range(WATER_CONTENT_RANGE, water_content)?;
    ensure_in_range(HOLE_DEPTH_RANGE, hole_depth)?;
    ensure_in_range(HOLE_DIAMETER_RANGE, hole_diameter)?;
    ensure_in_range(EXPLOSIVE_AMOUNT_RANGE, explosive_amount)?;
    ensure_in_range(BURDEN_RANGE, burden)?;
    ensure_in_range(SPACING_RANGE, spacing)?;
    ensure_in_range(SUBDRILL_RANGE, subdrill)?;
    ensure_in_range(TEMPERATURE_RANGE, temperature)?;
    ensure_in_range(HUMIDITY_RANGE, humidity)?;

    Ok(ValidatedInputs {
        rock_type,
        rock_density,
        rock_strength,
        water_content,
        hole_depth,
        hole_diameter,
        explosive_amount,
        burden,
        spacing,
        subdrill,
        weather_condition,
        temperature,
        humidity,
    })
}

// ==========================================
// 内部工具
// ==========================================

fn require_rock_type(raw: Option<&str>) -> EngineResult<RockType> {
    let raw = require_text(fields::ROCK_TYPE, raw)?;
    RockType::parse(raw).ok_or_else(|| {
        EstimationError::invalid(fields::ROCK_TYPE, format!("不支持的岩石类型: {}", raw))
    })
}

fn require_weather(raw: Option<&str>) -> EngineResult<WeatherCondition> {
    let raw = require_text(fields::WEATHER_CONDITION, raw)?;
    WeatherCondition::parse(raw).ok_or_else(|| {
        EstimationError::invalid(fields::WEATHER_CONDITION, format!("不支持的天气状况: {}", raw))
    })
}

fn require_text<'a>(field: &'static str, raw: Option<&'a str>) -> EngineResult<&'a str> {
    match raw {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(EstimationError::invalid(field, "字段缺失")),
    }
}

pub(crate) fn require_number(field: &'static str, raw: Option<f64>) -> EngineResult<f64> {
    match raw {
        Some(v) if v.is_finite() => Ok(v),
        Some(v) => Err(EstimationError::invalid(field, format!("不是有限数值: {}", v))),
        None => Err(EstimationError::invalid(field, "字段缺失")),
    }
}

fn ensure_positive(field: &'static str, value: f64) -> EngineResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EstimationError::invalid(field, format!("必须为有限正数,实际为 {}", value)))
    }
}

pub(crate) fn ensure_in_range(range: FieldRange, value: f64) -> EngineResult<()> {
    if value >= range.min && value <= range.max {
        Ok(())
    } else {
        Err(EstimationError::invalid(
            range.field,
            format!("超出范围 [{}, {}]: {}", range.min, range.max, value),
        ))
    }
}
