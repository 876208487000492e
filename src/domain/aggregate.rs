// ==========================================
// 酒店预测看板 - 月度统计
// ==========================================
// 职责: 日历标注所需的按日汇总统计
// 键: (year, month, hotel_type)，刷新时整体替换，不做合并
// ==========================================

use super::availability::AvailableDateSet;
use super::types::HotelType;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 月度统计缓存键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
    pub hotel_type: HotelType,
}

impl MonthKey {
    /// 构造缓存键，month 不在 1..=12 时返回 None
    pub fn new(year: i32, month: u32, hotel_type: HotelType) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self {
                year,
                month,
                hotel_type,
            })
        } else {
            None
        }
    }

    /// 日期所在月份
    pub fn of(date: NaiveDate, hotel_type: HotelType) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            hotel_type,
        }
    }

    /// 月份第一天
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// 前后翻月（delta 可为负）
    pub fn shift(&self, delta: i32) -> Option<Self> {
        let index = self.year.checked_mul(12)? + self.month as i32 - 1;
        let shifted = index.checked_add(delta)?;
        Self::new(
            shifted.div_euclid(12),
            (shifted.rem_euclid(12) + 1) as u32,
            self.hotel_type,
        )
    }

    /// 同一月份换酒店类型
    pub fn with_hotel_type(&self, hotel_type: HotelType) -> Self {
        Self { hotel_type, ..*self }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}/{}", self.year, self.month, self.hotel_type)
    }
}

/// 单日统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStat {
    pub day: u32,
    pub bookings: u32,
    /// 取消率 0..1
    pub cancellation_rate: f64,
    pub breakfast_count: u32,
    pub total_guests: u32,
}

/// 月度汇总
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub total_bookings: u32,
    /// 平均取消率 0..1
    pub average_cancellation_rate: f64,
}

/// 月度统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    pub year: i32,
    pub month: u32,
    pub hotel_type: HotelType,
    /// 按 day 升序
    pub daily_stats: Vec<DailyStat>,
    pub summary: MonthlySummary,
}

impl MonthlyAggregate {
    pub fn key(&self) -> MonthKey {
        MonthKey {
            year: self.year,
            month: self.month,
            hotel_type: self.hotel_type,
        }
    }

    /// 查找某一天的统计
    pub fn day(&self, day: u32) -> Option<&DailyStat> {
        self.daily_stats
            .binary_search_by_key(&day, |s| s.day)
            .ok()
            .map(|idx| &self.daily_stats[idx])
    }

    /// 生成日历格子标注
    ///
    /// 不可用日期标记为 disabled，仍保留统计以便展示
    pub fn tiles(&self, availability: &AvailableDateSet) -> Vec<CalendarTile> {
        self.daily_stats
            .iter()
            .filter_map(|stat| {
                let date = NaiveDate::from_ymd_opt(self.year, self.month, stat.day)?;
                Some(CalendarTile {
                    date,
                    bookings: stat.bookings,
                    cancellation_rate: stat.cancellation_rate,
                    breakfast_count: stat.breakfast_count,
                    disabled: !availability.contains(date),
                })
            })
            .collect()
    }
}

/// 日历格子
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarTile {
    pub date: NaiveDate,
    pub bookings: u32,
    pub cancellation_rate: f64,
    pub breakfast_count: u32,
    /// 无数据日期不可点选
    pub disabled: bool,
}
