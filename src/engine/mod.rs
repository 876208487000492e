// ==========================================
// 酒店预测看板 - 引擎层
// ==========================================
// 职责: 预测编排核心
// - 可用日期校验 (availability)
// - 月度统计缓存与请求去重 (monthly_cache)
// - 单日预测协调, 最后请求生效 (coordinator)
// - 派生指标 (metrics)
// - 预约分页 (booking_pager)
// 约束: 不感知界面事件, 通知经由 Notifier 端口
// ==========================================

pub mod availability;
pub mod booking_pager;
pub mod coordinator;
pub(crate) mod lock;
pub mod metrics;
pub mod monthly_cache;
pub mod notify;
pub mod sequence;

// 重导出核心组件
pub use availability::{AvailabilityStatus, DateAvailabilitySet};
pub use booking_pager::{BookingPager, BookingView, PageOutcome, PagerError};
pub use coordinator::{
    PredictionError, PredictionOutcome, PredictionPhase, PredictionRequestCoordinator,
    PredictionView,
};
pub use metrics::{
    DerivedMetrics, PreparationEstimate, Recommendation, RiskPolicy, BREAKFAST_LOAD_POLICY,
    CANCELLATION_RISK_POLICY, PLACEHOLDER,
};
pub use monthly_cache::MonthlyAggregateCache;
pub use notify::{NoOpNotifier, Notification, NotificationLevel, Notifier};
pub use sequence::{RequestSequencer, RequestTicket};
