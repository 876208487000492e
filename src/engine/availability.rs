// ==========================================
// 酒店预测看板 - 可用日期校验
// ==========================================
// 职责: 判断日期是否有后端数据，提供日历上下界
// 规则: 加载失败时集合为空，所有日期均不可用 (fail-closed)
// 变更: 仅通过显式 refresh 整体替换
// ==========================================

use super::lock::{read, write};
use super::sequence::RequestSequencer;
use crate::api::{ApiError, ApiResult, ForecastApi};
use crate::domain::{AvailableDateSet, DateBounds};
use chrono::NaiveDate;
use std::sync::{Arc, RwLock};

/// 加载状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityStatus {
    /// 尚未加载
    NotLoaded,
    /// 已加载
    Loaded,
    /// 加载失败（集合为空）
    Failed(ApiError),
}

struct AvailabilityState {
    snapshot: Arc<AvailableDateSet>,
    status: AvailabilityStatus,
    sequencer: RequestSequencer,
}

// ==========================================
// DateAvailabilitySet
// ==========================================
pub struct DateAvailabilitySet {
    state: RwLock<AvailabilityState>,
}

impl DateAvailabilitySet {
    /// 创建未加载的空集合
    pub fn new() -> Self {
        Self::with_state(AvailableDateSet::empty(), AvailabilityStatus::NotLoaded)
    }

    /// 以已知日期集合创建
    pub fn with_dates(dates: AvailableDateSet) -> Self {
        Self::with_state(dates, AvailabilityStatus::Loaded)
    }

    fn with_state(dates: AvailableDateSet, status: AvailabilityStatus) -> Self {
        Self {
            state: RwLock::new(AvailabilityState {
                snapshot: Arc::new(dates),
                status,
                sequencer: RequestSequencer::new(),
            }),
        }
    }

    /// 从服务加载（或手动刷新）
    ///
    /// 多次刷新重叠时以最后发出的为准；被取代的响应不写回
    ///
    /// # 返回
    /// - Ok(n): 可用日期数量（被取代时为当前集合数量）
    /// - Err: 加载失败，集合已清空
    pub async fn refresh(&self, api: &dyn ForecastApi) -> ApiResult<usize> {
        let ticket = write(&self.state).sequencer.issue();
        let response = api.fetch_available_dates().await;

        let mut state = write(&self.state);
        if !state.sequencer.is_current(ticket) {
            tracing::debug!(
                seq = ticket.seq(),
                ok = response.is_ok(),
                "过期的可用日期响应，已丢弃"
            );
            return Ok(state.snapshot.len());
        }

        match response {
            Ok(dates) => {
                let count = dates.len();
                tracing::info!(
                    count,
                    bounds = ?dates.bounds(),
                    "可用日期加载完成"
                );
                state.snapshot = Arc::new(dates);
                state.status = AvailabilityStatus::Loaded;
                Ok(count)
            }
            Err(e) => {
                tracing::warn!(error = %e, "可用日期加载失败，所有日期视为不可用");
                state.snapshot = Arc::new(AvailableDateSet::empty());
                state.status = AvailabilityStatus::Failed(e.clone());
                Err(e)
            }
        }
    }

    /// 日期是否可用
    pub fn is_available(&self, date: NaiveDate) -> bool {
        read(&self.state).snapshot.contains(date)
    }

    /// 将日期夹到可用区间内；未加载或为空时返回 None
    pub fn clamp_range(&self, date: NaiveDate) -> Option<NaiveDate> {
        self.bounds().map(|b| b.clamp(date))
    }

    pub fn bounds(&self) -> Option<DateBounds> {
        read(&self.state).snapshot.bounds()
    }

    /// 最早的可用日期
    pub fn first_available(&self) -> Option<NaiveDate> {
        read(&self.state).snapshot.first()
    }

    /// 当前集合快照
    pub fn snapshot(&self) -> Arc<AvailableDateSet> {
        read(&self.state).snapshot.clone()
    }

    pub fn status(&self) -> AvailabilityStatus {
        read(&self.state).status.clone()
    }
}

impl Default for DateAvailabilitySet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_not_loaded_rejects_everything() {
        let set = DateAvailabilitySet::new();
        assert!(!set.is_available(d(2017, 4, 1)));
        assert!(set.clamp_range(d(2017, 4, 1)).is_none());
        assert_eq!(set.status(), AvailabilityStatus::NotLoaded);
    }

    #[test]
    fn test_lookup_and_clamp() {
        let set = DateAvailabilitySet::with_dates(AvailableDateSet::new(
            vec![d(2017, 4, 1), d(2017, 4, 3)],
            Some(d(2017, 4, 1)),
            Some(d(2017, 4, 3)),
        ));

        assert!(set.is_available(d(2017, 4, 1)));
        assert!(!set.is_available(d(2017, 4, 2)));
        assert_eq!(set.clamp_range(d(2018, 1, 1)), Some(d(2017, 4, 3)));
        assert_eq!(set.first_available(), Some(d(2017, 4, 1)));
    }
}
