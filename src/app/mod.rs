// ==========================================
// 酒店预测看板 - 应用层
// ==========================================
// 职责: 界面事件编排、通知实现、组件装配
// ==========================================

pub mod controller;
pub mod notifier;
pub mod state;

// 重导出
pub use crate::engine::{Notification, NotificationLevel, Notifier};
pub use controller::{DashboardSnapshot, RefreshReport, SelectionError, ViewSelectionController};
pub use notifier::{NotificationQueue, TracingNotifier};
pub use state::AppState;
