// ==========================================
// 酒店预测看板 - 单日预测结果
// ==========================================
// 说明: expected_checkins <= total_reservations、
//       breakfast_recommendation <= expected_checkins 后端不保证，
//       这里原样保存，由 engine::metrics 负责防御性展示
// ==========================================

use super::types::HotelType;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 预测请求键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PredictionKey {
    pub date: NaiveDate,
    pub hotel_type: HotelType,
}

impl PredictionKey {
    pub fn new(date: NaiveDate, hotel_type: HotelType) -> Self {
        Self { date, hotel_type }
    }
}

impl fmt::Display for PredictionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.date.format("%Y-%m-%d"), self.hotel_type)
    }
}

/// 预测明细
///
/// 后端在无预约日期只返回部分字段，缺失字段为 None
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionDetails {
    pub adults: Option<u32>,
    pub children: Option<u32>,
    pub babies: Option<u32>,
    pub total_guests: Option<u32>,
    pub breakfast_guests: Option<u32>,
    /// 平均取消概率 0..1
    pub avg_cancellation_probability: Option<f64>,
    pub total_bookings: Option<u32>,
    pub expected_adults: Option<u32>,
    pub expected_children: Option<u32>,
    pub expected_breakfast_adults: Option<u32>,
    pub expected_breakfast_children: Option<u32>,
}

/// 单日预测结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub total_reservations: u32,
    pub predicted_cancellations: u32,
    pub expected_checkins: u32,
    pub breakfast_recommendation: u32,
    /// 置信度 0..1
    pub confidence_level: f64,
    pub details: PredictionDetails,
}

impl PredictionResult {
    /// 空结果（当日无预约）
    pub fn empty() -> Self {
        Self {
            total_reservations: 0,
            predicted_cancellations: 0,
            expected_checkins: 0,
            breakfast_recommendation: 0,
            confidence_level: 0.0,
            details: PredictionDetails::default(),
        }
    }

    /// 违反后端约定的不变量清单（仅用于日志与展示提示）
    pub fn anomalies(&self) -> Vec<PayloadAnomaly> {
        let mut anomalies = Vec::new();
        if self.expected_checkins > self.total_reservations {
            anomalies.push(PayloadAnomaly::CheckinsExceedReservations);
        }
        if self.breakfast_recommendation > self.expected_checkins {
            anomalies.push(PayloadAnomaly::BreakfastExceedsCheckins);
        }
        if self.predicted_cancellations > self.total_reservations {
            anomalies.push(PayloadAnomaly::CancellationsExceedReservations);
        }
        anomalies
    }
}

/// 预测载荷中的不一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayloadAnomaly {
    CheckinsExceedReservations,
    BreakfastExceedsCheckins,
    CancellationsExceedReservations,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consistent_result_has_no_anomalies() {
        let result = PredictionResult {
            total_reservations: 50,
            predicted_cancellations: 10,
            expected_checkins: 40,
            breakfast_recommendation: 30,
            confidence_level: 0.7,
            details: PredictionDetails::default(),
        };
        assert!(result.anomalies().is_empty());
    }

    #[test]
    fn test_violations_reported() {
        let result = PredictionResult {
            total_reservations: 10,
            predicted_cancellations: 12,
            expected_checkins: 11,
            breakfast_recommendation: 20,
            confidence_level: 0.7,
            details: PredictionDetails::default(),
        };
        let anomalies = result.anomalies();
        assert_eq!(anomalies.len(), 3);
        assert!(anomalies.contains(&PayloadAnomaly::BreakfastExceedsCheckins));
    }
}
