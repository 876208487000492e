// ==========================================
// 酒店预测看板 - 派生指标计算
// ==========================================
// 职责: 将预测载荷转换为可展示的比率、风险等级、备餐数量
// 性质: 纯函数，同步，无副作用
// 展示约定:
// - 比率类 (取消率/概率): 一位小数百分数，如 42.5%
// - 汇总类 (置信度/利用率/占比/入住率): 整数百分数，如 83%
// - 无定义或缺失: "--"
// ==========================================

use crate::domain::{BookingRecord, PayloadAnomaly, PredictionResult, RiskLevel};
use serde::{Deserialize, Serialize};

/// 占位文本
pub const PLACEHOLDER: &str = "--";

// ==========================================
// 风险分档策略
// ==========================================

/// 阈值分档策略（严格大于）
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskPolicy {
    pub name: &'static str,
    /// ratio > high_above → High
    pub high_above: f64,
    /// ratio > medium_above → Medium
    pub medium_above: f64,
}

impl RiskPolicy {
    /// 分档；NaN 视为 Low
    pub fn bucket(&self, ratio: f64) -> RiskLevel {
        if ratio > self.high_above {
            RiskLevel::High
        } else if ratio > self.medium_above {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// 取消风险（取消概率 / 取消率）
pub const CANCELLATION_RISK_POLICY: RiskPolicy = RiskPolicy {
    name: "cancellation_risk",
    high_above: 0.5,
    medium_above: 0.3,
};

/// 早餐备餐负荷（早餐推荐量 / 预计入住）
pub const BREAKFAST_LOAD_POLICY: RiskPolicy = RiskPolicy {
    name: "breakfast_load",
    high_above: 0.8,
    medium_above: 0.5,
};

/// 取消风险分档
pub fn cancellation_risk(probability: f64) -> RiskLevel {
    CANCELLATION_RISK_POLICY.bucket(probability)
}

/// 早餐负荷分档（比率先夹到 [0,1]）
pub fn breakfast_guidance(utilization: f64) -> RiskLevel {
    BREAKFAST_LOAD_POLICY.bucket(clamp_unit(utilization))
}

// ==========================================
// 比率
// ==========================================

/// 早餐利用率 = 早餐推荐量 / 预计入住；预计入住为 0 时无定义
///
/// 不做夹取，超过 100% 原样保留以便暴露后端不一致
pub fn breakfast_utilization_ratio(result: &PredictionResult) -> Option<f64> {
    ratio(result.breakfast_recommendation, result.expected_checkins)
}

/// 入住率 = 预计入住 / 总预约，夹到 [0,1]
pub fn checkin_rate(result: &PredictionResult) -> Option<f64> {
    ratio(result.expected_checkins, result.total_reservations).map(clamp_unit)
}

/// 早餐人数占比 = 早餐人数 / 总人数
pub fn breakfast_share(result: &PredictionResult) -> Option<f64> {
    let details = &result.details;
    match (details.breakfast_guests, details.total_guests) {
        (Some(breakfast), Some(total)) => ratio(breakfast, total).map(clamp_unit),
        _ => None,
    }
}

/// 用于风险分档的取消概率
///
/// 优先使用明细中的平均取消概率，缺失时退化为 预计取消 / 总预约
pub fn cancellation_probability(result: &PredictionResult) -> Option<f64> {
    result
        .details
        .avg_cancellation_probability
        .filter(|p| p.is_finite())
        .or_else(|| ratio(result.predicted_cancellations, result.total_reservations))
        .map(clamp_unit)
}

fn ratio(numerator: u32, denominator: u32) -> Option<f64> {
    if denominator == 0 {
        None
    } else {
        Some(numerator as f64 / denominator as f64)
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

// ==========================================
// 备餐数量估算
// ==========================================

/// 备餐数量（一律向上取整）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PreparationEstimate {
    pub headcount: u32,
    /// ceil(n × 1.5)
    pub breads: u64,
    /// n × 2
    pub eggs: u64,
    /// ceil(n × 0.3) 升
    pub milk_liters: u64,
    /// ceil(n × 0.2) 千克
    pub coffee_kg: u64,
}

impl PreparationEstimate {
    /// 按推荐人数估算
    ///
    /// 整数运算，避免浮点误差导致 ceil 多进一位
    pub fn for_headcount(headcount: u32) -> Self {
        let n = headcount as u64;
        Self {
            headcount,
            breads: (3 * n).div_ceil(2),
            eggs: 2 * n,
            milk_liters: (3 * n).div_ceil(10),
            coffee_kg: (2 * n).div_ceil(10),
        }
    }
}

// ==========================================
// 运营建议
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation {
    /// 预计取消 > 总预约 × 0.4
    ConsiderOverbooking,
    /// 早餐推荐量 > 0
    PrepareBreakfast { servings: u32 },
    /// 预计入住 < 总预约 × 0.5
    ConfirmArrivals,
    /// 置信度 > 0.8
    HighConfidence,
}

impl Recommendation {
    /// i18n 消息键
    pub fn message_key(&self) -> &'static str {
        match self {
            Recommendation::ConsiderOverbooking => "recommendation.consider_overbooking",
            Recommendation::PrepareBreakfast { .. } => "recommendation.prepare_breakfast",
            Recommendation::ConfirmArrivals => "recommendation.confirm_arrivals",
            Recommendation::HighConfidence => "recommendation.high_confidence",
        }
    }

    /// 本地化文本
    pub fn message(&self) -> String {
        match self {
            Recommendation::PrepareBreakfast { servings } => crate::i18n::t_with_args(
                self.message_key(),
                &[("servings", &servings.to_string())],
            ),
            _ => crate::i18n::t(self.message_key()),
        }
    }
}

/// 根据预测结果生成运营建议
pub fn recommendations(result: &PredictionResult) -> Vec<Recommendation> {
    let total = result.total_reservations as f64;
    let mut out = Vec::new();

    if result.predicted_cancellations as f64 > total * 0.4 {
        out.push(Recommendation::ConsiderOverbooking);
    }
    if result.breakfast_recommendation > 0 {
        out.push(Recommendation::PrepareBreakfast {
            servings: result.breakfast_recommendation,
        });
    }
    if (result.expected_checkins as f64) < total * 0.5 {
        out.push(Recommendation::ConfirmArrivals);
    }
    if result.confidence_level > 0.8 {
        out.push(Recommendation::HighConfidence);
    }

    out
}

// ==========================================
// 格式化
// ==========================================

/// 比率类: 一位小数百分数
pub fn format_rate(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{:.1}%", (v * 1000.0).round() / 10.0),
        None => PLACEHOLDER.to_string(),
    }
}

/// 汇总类: 整数百分数
pub fn format_ratio_percent(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{}%", (v * 100.0).round() as i64),
        None => PLACEHOLDER.to_string(),
    }
}

/// 计数: 缺失时占位
pub fn format_count(value: Option<u32>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), |v| v.to_string())
}

// ==========================================
// DerivedMetrics
// ==========================================

/// 一次预测结果的全部派生指标
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedMetrics {
    pub breakfast_utilization: Option<f64>,
    pub breakfast_utilization_display: String,
    pub breakfast_guidance: Option<RiskLevel>,

    pub cancellation_probability: Option<f64>,
    pub cancellation_probability_display: String,
    pub cancellation_risk: Option<RiskLevel>,

    pub checkin_rate: Option<f64>,
    pub checkin_rate_display: String,

    pub breakfast_share: Option<f64>,
    pub breakfast_share_display: String,

    pub confidence_display: String,
    pub total_guests_display: String,

    pub preparation: PreparationEstimate,
    pub recommendations: Vec<Recommendation>,
    pub anomalies: Vec<PayloadAnomaly>,
}

impl DerivedMetrics {
    pub fn from_result(result: &PredictionResult) -> Self {
        let utilization = breakfast_utilization_ratio(result);
        let probability = cancellation_probability(result);
        let checkin = checkin_rate(result);
        let share = breakfast_share(result);
        let confidence = Some(clamp_unit(result.confidence_level));

        Self {
            breakfast_utilization: utilization,
            breakfast_utilization_display: format_ratio_percent(utilization),
            breakfast_guidance: utilization.map(breakfast_guidance),

            cancellation_probability: probability,
            cancellation_probability_display: format_rate(probability),
            cancellation_risk: probability.map(cancellation_risk),

            checkin_rate: checkin,
            checkin_rate_display: format_ratio_percent(checkin),

            breakfast_share: share,
            breakfast_share_display: format_ratio_percent(share),

            confidence_display: format_ratio_percent(confidence),
            total_guests_display: format_count(result.details.total_guests),

            preparation: PreparationEstimate::for_headcount(result.breakfast_recommendation),
            recommendations: recommendations(result),
            anomalies: result.anomalies(),
        }
    }
}

/// 单条预约的取消风险（未预测时为 None）
pub fn booking_risk(record: &BookingRecord) -> Option<RiskLevel> {
    record
        .predicted_probability
        .filter(|p| p.is_finite())
        .map(|p| cancellation_risk(clamp_unit(p)))
}
