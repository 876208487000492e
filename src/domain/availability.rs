// ==========================================
// 酒店预测看板 - 可用日期集合
// ==========================================
// 职责: 后端有数据的日期集合 + 闭区间上下界
// 不变量: 集合内每个日期都落在 [min_date, max_date] 之内
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 日期闭区间 [min_date, max_date]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateBounds {
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
}

impl DateBounds {
    /// 构造闭区间，min > max 时返回 None
    pub fn new(min_date: NaiveDate, max_date: NaiveDate) -> Option<Self> {
        if min_date <= max_date {
            Some(Self { min_date, max_date })
        } else {
            None
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.min_date <= date && date <= self.max_date
    }

    /// 将日期夹到区间内
    pub fn clamp(&self, date: NaiveDate) -> NaiveDate {
        date.clamp(self.min_date, self.max_date)
    }
}

/// 可用日期集合
///
/// 加载后不可变；重新加载时整体替换
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvailableDateSet {
    dates: BTreeSet<NaiveDate>,
    bounds: Option<DateBounds>,
}

impl AvailableDateSet {
    /// 空集合（加载失败时使用，所有日期均不可用）
    pub fn empty() -> Self {
        Self::default()
    }

    /// 构造集合
    ///
    /// # 参数
    /// - `dates`: 后端返回的日期
    /// - `min_date` / `max_date`: 后端声明的边界；缺失或颠倒时由日期本身推导
    ///
    /// # 说明
    /// 落在边界之外的日期会被丢弃，以维持不变量
    pub fn new(
        dates: impl IntoIterator<Item = NaiveDate>,
        min_date: Option<NaiveDate>,
        max_date: Option<NaiveDate>,
    ) -> Self {
        let dates: BTreeSet<NaiveDate> = dates.into_iter().collect();

        let declared = match (min_date, max_date) {
            (Some(min), Some(max)) => DateBounds::new(min, max),
            _ => None,
        };

        let bounds = declared.or_else(|| {
            let first = dates.iter().next().copied()?;
            let last = dates.iter().next_back().copied()?;
            DateBounds::new(first, last)
        });

        let Some(bounds) = bounds else {
            return Self::empty();
        };

        let total = dates.len();
        let dates: BTreeSet<NaiveDate> =
            dates.into_iter().filter(|d| bounds.contains(*d)).collect();

        if dates.len() != total {
            tracing::warn!(
                dropped = total - dates.len(),
                min_date = %bounds.min_date,
                max_date = %bounds.max_date,
                "可用日期中存在越界日期，已丢弃"
            );
        }

        Self {
            dates,
            bounds: Some(bounds),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn bounds(&self) -> Option<DateBounds> {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// 最早的可用日期
    pub fn first(&self) -> Option<NaiveDate> {
        self.dates.iter().next().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NaiveDate> {
        self.dates.iter()
    }
}
