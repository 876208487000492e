// ==========================================
// 酒店预测看板 - 通知端口
// ==========================================
// 职责: 定义用户可见通知的 trait，实现依赖倒置
// 说明: Engine 层定义 trait，App 层提供实现 (日志 / 队列)
// ==========================================

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 通知级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

impl NotificationLevel {
    pub fn as_str(&self) -> &str {
        match self {
            NotificationLevel::Success => "success",
            NotificationLevel::Info => "info",
            NotificationLevel::Error => "error",
        }
    }
}

/// 一条瞬时通知
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub level: NotificationLevel,
    /// 已本地化的文本
    pub message: String,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }
}

// ==========================================
// 通知端口 Trait
// ==========================================

/// 通知发布者
///
/// # 实现说明
/// - `app::TracingNotifier`: 写入日志
/// - `app::NotificationQueue`: 缓冲，由界面或测试取走
pub trait Notifier: Send + Sync {
    /// 发布通知（不得阻塞调用方）
    fn notify(&self, notification: Notification);
}

/// 空实现
pub struct NoOpNotifier;

impl Notifier for NoOpNotifier {
    fn notify(&self, _notification: Notification) {}
}
