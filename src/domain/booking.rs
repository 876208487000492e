// ==========================================
// 酒店预测看板 - 预约记录
// ==========================================
// 职责: 按 (date, offset, limit) 分页获取的预约行
// 生命周期: 每次获取整页替换，客户端不修改
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 含早餐的餐食代码
const BREAKFAST_MEALS: [&str; 4] = ["포함", "BB", "HB", "FB"];

/// 单条预约
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub reservation_id: String,
    pub name: String,
    pub phone: String,
    pub total_guests: u32,
    pub arrival_date: Option<NaiveDate>,
    pub total_nights: u32,
    pub room_type: String,
    pub meal: String,
    pub special_requests: u32,
    /// 模型给出的取消概率 0..1，未预测时为 None
    pub predicted_probability: Option<f64>,
}

impl BookingRecord {
    /// 是否含早餐
    pub fn includes_breakfast(&self) -> bool {
        let meal = self.meal.trim();
        BREAKFAST_MEALS.iter().any(|m| m.eq_ignore_ascii_case(meal))
    }
}

/// 单日预约统计（随分页一起返回）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyBookingStatistics {
    pub search_date: Option<NaiveDate>,
    /// 模型置信度，已是百分数 (0..100, 一位小数)
    pub model_confidence: f64,
    pub total_expected_guests: u32,
    pub breakfast_preparation_count: u32,
}

/// 一页预约
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingPage {
    pub date: NaiveDate,
    pub offset: u32,
    pub limit: u32,
    pub total_count: u32,
    pub records: Vec<BookingRecord>,
    pub statistics: DailyBookingStatistics,
}

impl BookingPage {
    pub fn has_next(&self) -> bool {
        self.offset.saturating_add(self.limit) < self.total_count
    }

    pub fn has_previous(&self) -> bool {
        self.offset > 0
    }

    /// 当前页码（从 1 开始）
    pub fn page_number(&self) -> u32 {
        if self.limit == 0 {
            1
        } else {
            self.offset / self.limit + 1
        }
    }

    /// 总页数（至少 1 页）
    pub fn page_count(&self) -> u32 {
        if self.limit == 0 || self.total_count == 0 {
            1
        } else {
            self.total_count.div_ceil(self.limit)
        }
    }
}
