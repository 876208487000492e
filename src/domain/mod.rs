// ==========================================
// 酒店预测看板 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 约束: 不含网络访问, 不含编排逻辑
// ==========================================

pub mod aggregate;
pub mod availability;
pub mod booking;
pub mod prediction;
pub mod selection;
pub mod trends;
pub mod types;

// 重导出核心类型
pub use aggregate::{CalendarTile, DailyStat, MonthKey, MonthlyAggregate, MonthlySummary};
pub use availability::{AvailableDateSet, DateBounds};
pub use booking::{BookingPage, BookingRecord, DailyBookingStatistics};
pub use prediction::{PayloadAnomaly, PredictionDetails, PredictionKey, PredictionResult};
pub use selection::SelectionState;
pub use trends::{MonthlyBookingCount, OverviewStatistics, WeeklyTrend};
pub use types::{HotelType, RiskLevel, ViewMode};
