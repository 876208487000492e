// ==========================================
// 酒店预测看板 - 通知实现
// ==========================================
// TracingNotifier: 写入日志（命令行 / 无界面运行）
// NotificationQueue: 缓冲通知，由界面轮询或测试取走
// ==========================================

use crate::engine::lock::lock;
use crate::engine::{Notification, NotificationLevel, Notifier};
use std::collections::VecDeque;
use std::sync::Mutex;

/// 日志通知
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error => {
                tracing::error!(id = %notification.id, "{}", notification.message)
            }
            NotificationLevel::Success | NotificationLevel::Info => {
                tracing::info!(
                    id = %notification.id,
                    level = notification.level.as_str(),
                    "{}",
                    notification.message
                )
            }
        }
    }
}

/// 默认缓冲上限
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// 通知队列（超出上限时丢弃最旧的）
pub struct NotificationQueue {
    capacity: usize,
    items: Mutex<VecDeque<Notification>>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            items: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// 取走全部通知
    pub fn drain(&self) -> Vec<Notification> {
        lock(&self.items).drain(..).collect()
    }

    pub fn len(&self) -> usize {
        lock(&self.items).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for NotificationQueue {
    fn notify(&self, notification: Notification) {
        tracing::debug!(
            id = %notification.id,
            level = notification.level.as_str(),
            "通知入队"
        );
        let mut items = lock(&self.items);
        if items.len() >= self.capacity {
            items.pop_front();
        }
        items.push_back(notification);
    }
}
