// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

#![allow(dead_code)]

use chrono::{Datelike, NaiveDate};
use hotel_predict::domain::{
    BookingRecord, DailyStat, HotelType, MonthKey, MonthlyAggregate, MonthlySummary,
    PredictionDetails, PredictionResult,
};

// ==========================================
// PredictionResult 构建器
// ==========================================

/// 按日期生成可区分的预测结果
///
/// 总预约 = 日 × 10，城市酒店额外 +1，便于断言结果属于哪个请求
pub fn prediction_for(date: NaiveDate, hotel_type: HotelType) -> PredictionResult {
    let total = date.day() * 10 + if hotel_type == HotelType::City { 1 } else { 0 };
    PredictionBuilder::new(total)
        .cancellations(total / 5)
        .checkins(total - total / 5)
        .breakfast((total - total / 5) / 2)
        .confidence(0.83)
        .build()
}

pub struct PredictionBuilder {
    total_reservations: u32,
    predicted_cancellations: u32,
    expected_checkins: u32,
    breakfast_recommendation: u32,
    confidence_level: f64,
    details: PredictionDetails,
}

impl PredictionBuilder {
    pub fn new(total_reservations: u32) -> Self {
        Self {
            total_reservations,
            predicted_cancellations: 0,
            expected_checkins: total_reservations,
            breakfast_recommendation: 0,
            confidence_level: 0.5,
            details: PredictionDetails::default(),
        }
    }

    pub fn cancellations(mut self, n: u32) -> Self {
        self.predicted_cancellations = n;
        self
    }

    pub fn checkins(mut self, n: u32) -> Self {
        self.expected_checkins = n;
        self
    }

    pub fn breakfast(mut self, n: u32) -> Self {
        self.breakfast_recommendation = n;
        self
    }

    pub fn confidence(mut self, c: f64) -> Self {
        self.confidence_level = c;
        self
    }

    pub fn avg_cancellation_probability(mut self, p: f64) -> Self {
        self.details.avg_cancellation_probability = Some(p);
        self
    }

    pub fn build(self) -> PredictionResult {
        PredictionResult {
            total_reservations: self.total_reservations,
            predicted_cancellations: self.predicted_cancellations,
            expected_checkins: self.expected_checkins,
            breakfast_recommendation: self.breakfast_recommendation,
            confidence_level: self.confidence_level,
            details: self.details,
        }
    }
}

// ==========================================
// MonthlyAggregate 构建器
// ==========================================

/// 前三天有统计的月度数据；预约量随酒店类型不同
pub fn monthly_aggregate(key: MonthKey) -> MonthlyAggregate {
    let base = match key.hotel_type {
        HotelType::Resort => 40,
        HotelType::City => 70,
    };
    let daily_stats: Vec<DailyStat> = (1..=3)
        .map(|day| DailyStat {
            day,
            bookings: base + day,
            cancellation_rate: 0.25,
            breakfast_count: (base + day) / 2,
            total_guests: (base + day) * 2,
        })
        .collect();
    let total_bookings = daily_stats.iter().map(|s| s.bookings).sum();

    MonthlyAggregate {
        year: key.year,
        month: key.month,
        hotel_type: key.hotel_type,
        daily_stats,
        summary: MonthlySummary {
            total_bookings,
            average_cancellation_rate: 0.25,
        },
    }
}

// ==========================================
// BookingRecord 构建器
// ==========================================

pub fn booking(index: u32, arrival: NaiveDate) -> BookingRecord {
    BookingRecord {
        reservation_id: format!("R{:05}", index),
        name: format!("Guest {}", index),
        phone: "010-0000-0000".to_string(),
        total_guests: 2,
        arrival_date: Some(arrival),
        total_nights: 1 + index % 3,
        room_type: "A".to_string(),
        meal: if index % 2 == 0 { "BB" } else { "SC" }.to_string(),
        special_requests: 0,
        predicted_probability: Some(0.1 * (index % 10) as f64),
    }
}
