// ==========================================
// 酒店预测看板 - 用户选择状态
// ==========================================
// 所有请求的唯一数据源，仅由 ViewSelectionController 持有
// ==========================================

use super::aggregate::MonthKey;
use super::prediction::PredictionKey;
use super::types::{HotelType, ViewMode};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub selected_date: NaiveDate,
    pub hotel_type: HotelType,
    pub view_mode: ViewMode,
}

impl SelectionState {
    pub fn new(selected_date: NaiveDate, hotel_type: HotelType) -> Self {
        Self {
            selected_date,
            hotel_type,
            view_mode: ViewMode::Daily,
        }
    }

    pub fn prediction_key(&self) -> PredictionKey {
        PredictionKey::new(self.selected_date, self.hotel_type)
    }

    /// 选中日期所在月份
    pub fn month_key(&self) -> MonthKey {
        MonthKey::of(self.selected_date, self.hotel_type)
    }
}
