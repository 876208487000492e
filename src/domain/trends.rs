// ==========================================
// 酒店预测看板 - 周趋势与总览统计
// ==========================================

use serde::{Deserialize, Serialize};

/// 按星期的趋势
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyTrend {
    /// 星期名 (Monday..Sunday)
    pub day: String,
    pub bookings: u32,
    pub cancellation_rate: Option<f64>,
    pub avg_guests: f64,
}

/// 月度预约量（总览用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBookingCount {
    /// 月份名 (January..December)
    pub month: String,
    pub bookings: u32,
    pub cancellation_rate: Option<f64>,
}

/// 全量数据总览
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverviewStatistics {
    pub total_bookings: u32,
    pub overall_cancellation_rate: f64,
    pub average_lead_time: f64,
    pub monthly_statistics: Vec<MonthlyBookingCount>,
}
