// ==========================================
// 矿山爆破预测系统 - 建议规则
// ==========================================
// 规则（顺序执行,条数达到上限后停止追加）:
// 1) burden < 4            → 增大抵抗线
// 2) spacing < 5           → 增大孔距
// 3) explosiveAmount > 30  → 装药量偏大
// 4) weather = Rainy       → 天气影响
// 5) rockStrength > 200    → 硬岩
// 6) 均未命中              → 参数合理
// ==========================================

use crate::domain::estimation::EstimationInput;
use crate::domain::types::WeatherCondition;

/// 单次估算返回的建议条数上限
pub const MAX_RECOMMENDATIONS: usize = 3;

pub const MSG_INCREASE_BURDEN: &str =
    "Consider increasing burden distance for better fragmentation";
pub const MSG_INCREASE_SPACING: &str = "Increase spacing to reduce vibration levels";
pub const MSG_HIGH_EXPLOSIVE: &str = "High explosive amount may cause excessive vibration";
pub const MSG_WEATHER: &str = "Weather conditions may affect blast performance";
pub const MSG_HARD_ROCK: &str =
    "Hard rock conditions detected - consider adjusted blast design";
pub const MSG_OPTIMAL: &str = "Current blast parameters appear optimal";

/// 建议规则
struct RecommendationRule {
    code: &'static str,
    applies: fn(&EstimationInput) -> bool,
    message: &'static str,
}

fn short_burden(input: &EstimationInput) -> bool {
    input.burden < 4.0
}

fn narrow_spacing(input: &EstimationInput) -> bool {
    input.spacing < 5.0
}

fn high_explosive(input: &EstimationInput) -> bool {
    input.explosive_amount > 30.0
}

fn rainy_weather(input: &EstimationInput) -> bool {
    input.weather_condition == WeatherCondition::Rainy
}

fn hard_rock(input: &EstimationInput) -> bool {
    input.rock_strength > 200.0
}

const RULES: [RecommendationRule; 5] = [
    RecommendationRule {
        code: "SHORT_BURDEN",
        applies: short_burden,
        message: MSG_INCREASE_BURDEN,
    },
    RecommendationRule {
        code: "NARROW_SPACING",
        applies: narrow_spacing,
        message: MSG_INCREASE_SPACING,
    },
    RecommendationRule {
        code: "HIGH_EXPLOSIVE",
        applies: high_explosive,
        message: MSG_HIGH_EXPLOSIVE,
    },
    RecommendationRule {
        code: "RAINY_WEATHER",
        applies: rainy_weather,
        message: MSG_WEATHER,
    },
    RecommendationRule {
        code: "HARD_ROCK",
        applies: hard_rock,
        message: MSG_HARD_ROCK,
    },
];

/// 生成建议列表
///
/// 返回 1..=MAX_RECOMMENDATIONS 条,顺序与规则顺序一致
pub fn recommend(input: &EstimationInput) -> Vec<String> {
    let mut recommendations = Vec::with_capacity(MAX_RECOMMENDATIONS);

    for rule in RULES.iter() {
        if recommendations.len() >= MAX_RECOMMENDATIONS {
            break;
        }
        if (rule.applies)(input) {
            tracing::debug!(rule = rule.code, "recommendation rule fired");
            recommendations.push(rule.message.to_string());
        }
    }

    if recommendations.is_empty() {
        recommendations.push(MSG_OPTIMAL.to_string());
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::RockType;

    fn optimal_input() -> EstimationInput {
        EstimationInput {
            rock_type: RockType::Sandstone,
            weather_condition: WeatherCondition::Clear,
            burden: 4.0,
            spacing: 5.0,
            explosive_amount: 30.0,
            rock_strength: 200.0,
        }
    }

    #[test]
    fn test_boundaries_do_not_fire() {
        // 边界值: burden=4, spacing=5, explosive=30, strength=200 均不触发
        assert_eq!(recommend(&optimal_input()), vec![MSG_OPTIMAL.to_string()]);
    }

    #[test]
    fn test_each_rule_alone() {
        let cases: Vec<(EstimationInput, &str)> = vec![
            (EstimationInput { burden: 3.99, ..optimal_input() }, MSG_INCREASE_BURDEN),
            (EstimationInput { spacing: 4.5, ..optimal_input() }, MSG_INCREASE_SPACING),
            (EstimationInput { explosive_amount: 30.5, ..optimal_input() }, MSG_HIGH_EXPLOSIVE),
            (
                EstimationInput { weather_condition: WeatherCondition::Rainy, ..optimal_input() },
                MSG_WEATHER,
            ),
            (EstimationInput { rock_strength: 250.0, ..optimal_input() }, MSG_HARD_ROCK),
        ];

        for (input, expected) in cases {
            assert_eq!(recommend(&input), vec![expected.to_string()]);
        }
    }

    #[test]
    fn test_cap_keeps_first_three_in_rule_order() {
        let input = EstimationInput {
            rock_type: RockType::Granite,
            weather_condition: WeatherCondition::Rainy,
            burden: 2.0,
            spacing: 3.0,
            explosive_amount: 50.0,
            rock_strength: 300.0,
        };

        let recs = recommend(&input);
        assert_eq!(
            recs,
            vec![
                MSG_INCREASE_BURDEN.to_string(),
                MSG_INCREASE_SPACING.to_string(),
                MSG_HIGH_EXPLOSIVE.to_string(),
            ]
        );
    }

    #[test]
    fn test_later_rules_fill_when_earlier_skip() {
        let input = EstimationInput {
            weather_condition: WeatherCondition::Rainy,
            rock_strength: 210.0,
            spacing: 4.0,
            ..optimal_input()
        };

        assert_eq!(
            recommend(&input),
            vec![
                MSG_INCREASE_SPACING.to_string(),
                MSG_WEATHER.to_string(),
                MSG_HARD_ROCK.to_string(),
            ]
        );
    }
}
