// ==========================================
// 酒店预测看板 - 接口数据结构 (Wire Schema)
// ==========================================
// 职责: 预测服务响应的显式结构 + 向领域模型的集中转换
// 规则:
// - 所有字段带默认值，缺失字段不会导致整体解析失败
// - 概率夹到 [0,1]，NaN / 无穷视为缺失
// - 负数计数视为 0
// - 日期统一为 yyyy-MM-dd
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::{
    AvailableDateSet, BookingPage, BookingRecord, DailyBookingStatistics, DailyStat, HotelType,
    MonthKey, MonthlyAggregate, MonthlyBookingCount, MonthlySummary, OverviewStatistics,
    PredictionDetails, PredictionResult, WeeklyTrend,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 接口日期格式
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ==========================================
// 转换辅助函数
// ==========================================

/// 解析 yyyy-MM-dd（允许带时间后缀，如 "2017-04-01 00:00:00"）
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let head = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(head, DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// 计数: 负数 / NaN 视为 0，小数向下取整
fn count(raw: Option<f64>) -> Option<u32> {
    raw.map(|v| {
        if v.is_finite() && v > 0.0 {
            v.floor().min(u32::MAX as f64) as u32
        } else {
            0
        }
    })
}

fn count_or_zero(raw: Option<f64>) -> u32 {
    count(raw).unwrap_or(0)
}

/// 概率: 夹到 [0,1]，非有限值视为缺失
fn probability(raw: Option<f64>) -> Option<f64> {
    raw.filter(|v| v.is_finite()).map(|v| v.clamp(0.0, 1.0))
}

/// 非负实数: 非有限值视为 0
fn non_negative(raw: Option<f64>) -> f64 {
    raw.filter(|v| v.is_finite()).map(|v| v.max(0.0)).unwrap_or(0.0)
}

/// 标识字段既可能是字符串也可能是数字
fn identifier(raw: Option<serde_json::Value>) -> String {
    match raw {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

// ==========================================
// 请求体
// ==========================================

/// POST /api/predict/date 请求体
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictDateRequest {
    pub date: String,
    pub hotel_type: HotelType,
}

impl PredictDateRequest {
    pub fn new(date: NaiveDate, hotel_type: HotelType) -> Self {
        Self {
            date: format_date(date),
            hotel_type,
        }
    }
}

// ==========================================
// GET /api/dates/available
// ==========================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AvailableDatesDto {
    pub available_dates: Vec<String>,
    pub min_date: Option<String>,
    pub max_date: Option<String>,
}

impl AvailableDatesDto {
    pub fn into_domain(self) -> AvailableDateSet {
        let total = self.available_dates.len();
        let dates: Vec<NaiveDate> = self
            .available_dates
            .iter()
            .filter_map(|raw| parse_date(raw))
            .collect();

        if dates.len() != total {
            tracing::warn!(
                unparsable = total - dates.len(),
                "可用日期中存在无法解析的日期，已忽略"
            );
        }

        let min_date = self.min_date.as_deref().and_then(parse_date);
        let max_date = self.max_date.as_deref().and_then(parse_date);

        AvailableDateSet::new(dates, min_date, max_date)
    }
}

// ==========================================
// GET /api/calendar/monthly
// ==========================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DailyStatDto {
    pub day: Option<f64>,
    pub bookings: Option<f64>,
    pub cancellation_rate: Option<f64>,
    pub breakfast_count: Option<f64>,
    pub total_guests: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MonthlySummaryDto {
    pub total_bookings: Option<f64>,
    pub average_cancellation_rate: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MonthlyAggregateDto {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub daily_statistics: Vec<DailyStatDto>,
    pub summary: MonthlySummaryDto,
}

impl MonthlyAggregateDto {
    /// 转换为领域模型，年月与酒店类型以请求键为准
    pub fn into_domain(self, key: MonthKey) -> MonthlyAggregate {
        if self.year.is_some_and(|y| y != key.year) || self.month.is_some_and(|m| m != key.month)
        {
            tracing::warn!(
                requested = %key,
                year = ?self.year,
                month = ?self.month,
                "月度统计返回的年月与请求不一致，以请求为准"
            );
        }

        let mut daily_stats: Vec<DailyStat> = self
            .daily_statistics
            .into_iter()
            .filter_map(|dto| {
                let day = count(dto.day)?;
                if !(1..=31).contains(&day) {
                    return None;
                }
                Some(DailyStat {
                    day,
                    bookings: count_or_zero(dto.bookings),
                    cancellation_rate: probability(dto.cancellation_rate).unwrap_or(0.0),
                    breakfast_count: count_or_zero(dto.breakfast_count),
                    total_guests: count_or_zero(dto.total_guests),
                })
            })
            .collect();

        daily_stats.sort_by_key(|s| s.day);
        daily_stats.dedup_by_key(|s| s.day);

        MonthlyAggregate {
            year: key.year,
            month: key.month,
            hotel_type: key.hotel_type,
            daily_stats,
            summary: MonthlySummary {
                total_bookings: count_or_zero(self.summary.total_bookings),
                average_cancellation_rate: probability(self.summary.average_cancellation_rate)
                    .unwrap_or(0.0),
            },
        }
    }
}

// ==========================================
// POST /api/predict/date
// ==========================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PredictionDetailsDto {
    pub adults: Option<f64>,
    pub children: Option<f64>,
    pub babies: Option<f64>,
    pub total_guests: Option<f64>,
    pub breakfast_guests: Option<f64>,
    pub avg_cancellation_probability: Option<f64>,
    pub total_bookings: Option<f64>,
    pub expected_adults: Option<f64>,
    pub expected_children: Option<f64>,
    pub expected_breakfast_adults: Option<f64>,
    pub expected_breakfast_children: Option<f64>,
}

impl PredictionDetailsDto {
    fn into_domain(self) -> PredictionDetails {
        PredictionDetails {
            adults: count(self.adults),
            children: count(self.children),
            babies: count(self.babies),
            total_guests: count(self.total_guests),
            breakfast_guests: count(self.breakfast_guests),
            avg_cancellation_probability: probability(self.avg_cancellation_probability),
            total_bookings: count(self.total_bookings),
            expected_adults: count(self.expected_adults),
            expected_children: count(self.expected_children),
            expected_breakfast_adults: count(self.expected_breakfast_adults),
            expected_breakfast_children: count(self.expected_breakfast_children),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PredictionDto {
    pub date: Option<String>,
    pub total_reservations: Option<f64>,
    pub predicted_cancellations: Option<f64>,
    pub expected_checkins: Option<f64>,
    pub breakfast_recommendation: Option<f64>,
    pub confidence_level: Option<f64>,
    pub details: Option<PredictionDetailsDto>,
}

impl PredictionDto {
    pub fn into_domain(self) -> PredictionResult {
        let result = PredictionResult {
            total_reservations: count_or_zero(self.total_reservations),
            predicted_cancellations: count_or_zero(self.predicted_cancellations),
            expected_checkins: count_or_zero(self.expected_checkins),
            breakfast_recommendation: count_or_zero(self.breakfast_recommendation),
            confidence_level: probability(self.confidence_level).unwrap_or(0.0),
            details: self
                .details
                .map(PredictionDetailsDto::into_domain)
                .unwrap_or_default(),
        };

        let anomalies = result.anomalies();
        if !anomalies.is_empty() {
            tracing::warn!(date = ?self.date, ?anomalies, "预测结果不满足约定不变量，按原值展示");
        }

        result
    }
}

// ==========================================
// GET /api/bookings/by-date
// ==========================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BookingDto {
    pub reservation_id: Option<serde_json::Value>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub total_guests: Option<f64>,
    pub arrival_date: Option<String>,
    pub total_nights: Option<f64>,
    pub room_type: Option<String>,
    pub meal: Option<String>,
    pub special_requests: Option<f64>,
    pub predicted_probability: Option<f64>,
}

impl BookingDto {
    fn into_domain(self) -> BookingRecord {
        BookingRecord {
            reservation_id: identifier(self.reservation_id),
            name: self.name.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            total_guests: count_or_zero(self.total_guests),
            arrival_date: self.arrival_date.as_deref().and_then(parse_date),
            total_nights: count_or_zero(self.total_nights),
            room_type: self.room_type.unwrap_or_default(),
            meal: self.meal.unwrap_or_default(),
            special_requests: count_or_zero(self.special_requests),
            predicted_probability: probability(self.predicted_probability),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BookingStatisticsDto {
    pub search_date: Option<String>,
    pub model_confidence: Option<f64>,
    pub total_expected_guests: Option<f64>,
    pub breakfast_preparation_count: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BookingPageDto {
    pub success: Option<bool>,
    pub data: Vec<BookingDto>,
    pub total_count: Option<f64>,
    pub statistics: BookingStatisticsDto,
    pub detail: Option<String>,
}

impl BookingPageDto {
    pub fn into_domain(self, date: NaiveDate, offset: u32, limit: u32) -> ApiResult<BookingPage> {
        if self.success == Some(false) {
            return Err(ApiError::Rejected(
                self.detail.unwrap_or_else(|| "bookings/by-date".to_string()),
            ));
        }

        let records: Vec<BookingRecord> =
            self.data.into_iter().map(BookingDto::into_domain).collect();
        let total_count = count(self.total_count).unwrap_or(records.len() as u32);

        let statistics = DailyBookingStatistics {
            search_date: self.statistics.search_date.as_deref().and_then(parse_date),
            model_confidence: non_negative(self.statistics.model_confidence).min(100.0),
            total_expected_guests: count_or_zero(self.statistics.total_expected_guests),
            breakfast_preparation_count: count_or_zero(
                self.statistics.breakfast_preparation_count,
            ),
        };

        Ok(BookingPage {
            date,
            offset,
            limit,
            total_count,
            records,
            statistics,
        })
    }
}

// ==========================================
// GET /api/trends/weekly
// ==========================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WeeklyTrendDto {
    pub day: Option<String>,
    pub bookings: Option<f64>,
    pub cancellation_rate: Option<f64>,
    pub avg_guests: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WeeklyTrendsDto {
    pub weekly_trends: Vec<WeeklyTrendDto>,
}

impl WeeklyTrendsDto {
    pub fn into_domain(self) -> Vec<WeeklyTrend> {
        self.weekly_trends
            .into_iter()
            .filter_map(|dto| {
                let day = dto.day.filter(|d| !d.trim().is_empty())?;
                Some(WeeklyTrend {
                    day,
                    bookings: count_or_zero(dto.bookings),
                    cancellation_rate: probability(dto.cancellation_rate),
                    avg_guests: non_negative(dto.avg_guests),
                })
            })
            .collect()
    }
}

// ==========================================
// GET /api/statistics/overview
// ==========================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MonthlyBookingCountDto {
    pub month: Option<String>,
    pub bookings: Option<f64>,
    pub cancellation_rate: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OverviewStatisticsDto {
    pub total_bookings: Option<f64>,
    pub overall_cancellation_rate: Option<f64>,
    pub average_lead_time: Option<f64>,
    pub monthly_statistics: Vec<MonthlyBookingCountDto>,
}

impl OverviewStatisticsDto {
    pub fn into_domain(self) -> OverviewStatistics {
        OverviewStatistics {
            total_bookings: count_or_zero(self.total_bookings),
            overall_cancellation_rate: probability(self.overall_cancellation_rate).unwrap_or(0.0),
            average_lead_time: non_negative(self.average_lead_time),
            monthly_statistics: self
                .monthly_statistics
                .into_iter()
                .filter_map(|dto| {
                    Some(MonthlyBookingCount {
                        month: dto.month?,
                        bookings: count_or_zero(dto.bookings),
                        cancellation_rate: probability(dto.cancellation_rate),
                    })
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_predict_request_payload() {
        let date = NaiveDate::from_ymd_opt(2017, 4, 1).unwrap();
        let body = serde_json::to_value(PredictDateRequest::new(date, HotelType::Resort)).unwrap();
        assert_eq!(body, json!({"date": "2017-04-01", "hotel_type": "Resort Hotel"}));
    }

    #[test]
    fn test_parse_date_variants() {
        let expected = NaiveDate::from_ymd_opt(2017, 4, 1);
        assert_eq!(parse_date("2017-04-01"), expected);
        assert_eq!(parse_date("2017-04-01 00:00:00"), expected);
        assert_eq!(parse_date("2017-04-01T00:00:00"), expected);
        assert_eq!(parse_date("04/01/2017"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_prediction_with_sparse_details() {
        // 当日无预约时后端只返回 method/message
        let dto: PredictionDto = serde_json::from_value(json!({
            "date": "2017-04-01",
            "total_reservations": 0,
            "predicted_cancellations": 0,
            "expected_checkins": 0,
            "breakfast_recommendation": 0,
            "confidence_level": 0.0,
            "details": {"method": "mysql_results", "message": "no bookings"}
        }))
        .unwrap();

        let result = dto.into_domain();
        assert_eq!(result.expected_checkins, 0);
        assert!(result.details.avg_cancellation_probability.is_none());
        assert!(result.details.adults.is_none());
    }

    #[test]
    fn test_prediction_clamps_values() {
        let dto: PredictionDto = serde_json::from_value(json!({
            "total_reservations": 12.0,
            "expected_checkins": -3,
            "confidence_level": 1.7,
            "details": {"avg_cancellation_probability": -0.2, "total_guests": 30}
        }))
        .unwrap();

        let result = dto.into_domain();
        assert_eq!(result.total_reservations, 12);
        assert_eq!(result.expected_checkins, 0);
        assert_eq!(result.breakfast_recommendation, 0);
        assert_eq!(result.confidence_level, 1.0);
        assert_eq!(result.details.avg_cancellation_probability, Some(0.0));
        assert_eq!(result.details.total_guests, Some(30));
    }

    #[test]
    fn test_prediction_missing_everything() {
        let dto: PredictionDto = serde_json::from_value(json!({})).unwrap();
        assert_eq!(dto.into_domain(), PredictionResult::empty());
    }

    #[test]
    fn test_available_dates_conversion() {
        let dto: AvailableDatesDto = serde_json::from_value(json!({
            "available_dates": ["2017-04-01", "garbage", "2017-04-03"],
            "min_date": "2017-04-01",
            "max_date": "2017-04-02"
        }))
        .unwrap();

        let set = dto.into_domain();
        assert_eq!(set.len(), 1);
        assert!(set.contains(NaiveDate::from_ymd_opt(2017, 4, 1).unwrap()));
    }

    #[test]
    fn test_monthly_conversion_sorts_and_filters_days() {
        let key = MonthKey::new(2017, 4, HotelType::City).unwrap();
        let dto: MonthlyAggregateDto = serde_json::from_value(json!({
            "year": 2017,
            "month": 4,
            "daily_statistics": [
                {"day": 2, "bookings": 5, "cancellation_rate": 0.4},
                {"day": 1, "bookings": 9, "cancellation_rate": 1.5, "breakfast_count": 3},
                {"day": 0, "bookings": 1},
                {"bookings": 7}
            ],
            "summary": {"total_bookings": 14, "average_cancellation_rate": 0.3}
        }))
        .unwrap();

        let agg = dto.into_domain(key);
        assert_eq!(agg.hotel_type, HotelType::City);
        assert_eq!(agg.daily_stats.len(), 2);
        assert_eq!(agg.daily_stats[0].day, 1);
        assert_eq!(agg.daily_stats[0].cancellation_rate, 1.0);
        assert_eq!(agg.summary.total_bookings, 14);
    }

    #[test]
    fn test_booking_page_rejected() {
        let dto: BookingPageDto =
            serde_json::from_value(json!({"success": false, "detail": "db down"})).unwrap();
        let date = NaiveDate::from_ymd_opt(2017, 4, 1).unwrap();

        match dto.into_domain(date, 0, 10) {
            Err(ApiError::Rejected(msg)) => assert_eq!(msg, "db down"),
            other => panic!("Expected Rejected, got {:?}", other),
        }
    }

    #[test]
    fn test_booking_page_conversion() {
        let dto: BookingPageDto = serde_json::from_value(json!({
            "success": true,
            "data": [{
                "reservation_id": 1042,
                "name": "Lee",
                "total_guests": 3,
                "arrival_date": "2017-04-01",
                "meal": "포함",
                "predicted_probability": 0.61
            }],
            "total_count": 37,
            "statistics": {"model_confidence": 72.4, "breakfast_preparation_count": 2}
        }))
        .unwrap();
        let date = NaiveDate::from_ymd_opt(2017, 4, 1).unwrap();

        let page = dto.into_domain(date, 0, 10).unwrap();
        assert_eq!(page.total_count, 37);
        assert_eq!(page.records[0].reservation_id, "1042");
        assert!(page.records[0].includes_breakfast());
        assert_eq!(page.statistics.model_confidence, 72.4);
    }

    #[test]
    fn test_weekly_trends_skip_unnamed_days() {
        let dto: WeeklyTrendsDto = serde_json::from_value(json!({
            "weekly_trends": [
                {"day": "Monday", "bookings": 100, "avg_guests": 1.9},
                {"bookings": 3}
            ]
        }))
        .unwrap();

        let trends = dto.into_domain();
        assert_eq!(trends.len(), 1);
        assert_eq!(trends[0].day, "Monday");
    }
}
