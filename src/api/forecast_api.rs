// ==========================================
// 酒店预测看板 - 预测服务接口 Trait
// ==========================================
// 职责: 编排核心与网络之间的接缝
// 说明: 返回领域类型，载荷校验在实现方的 dto 转换中完成
// ==========================================

use crate::api::error::ApiResult;
use crate::domain::{
    AvailableDateSet, BookingPage, HotelType, MonthKey, MonthlyAggregate, OverviewStatistics,
    PredictionResult, WeeklyTrend,
};
use async_trait::async_trait;
use chrono::NaiveDate;

/// 预测服务接口
#[async_trait]
pub trait ForecastApi: Send + Sync {
    /// GET /api/dates/available
    async fn fetch_available_dates(&self) -> ApiResult<AvailableDateSet>;

    /// GET /api/calendar/monthly?year&month&hotel_type
    async fn fetch_monthly_aggregate(&self, key: MonthKey) -> ApiResult<MonthlyAggregate>;

    /// POST /api/predict/date { date, hotel_type }
    async fn predict_date(
        &self,
        date: NaiveDate,
        hotel_type: HotelType,
    ) -> ApiResult<PredictionResult>;

    /// GET /api/bookings/by-date?year&month&day&offset&limit
    async fn fetch_bookings(
        &self,
        date: NaiveDate,
        offset: u32,
        limit: u32,
    ) -> ApiResult<BookingPage>;

    /// GET /api/trends/weekly
    async fn fetch_weekly_trends(&self) -> ApiResult<Vec<WeeklyTrend>>;

    /// GET /api/statistics/overview
    async fn fetch_overview(&self) -> ApiResult<OverviewStatistics>;
}
