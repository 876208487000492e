// ==========================================
// 酒店预测看板 - 领域类型定义
// ==========================================
// 职责: 酒店类型 / 视图模式 / 风险等级
// 序列化格式: 与预测服务接口一致
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 酒店类型 (Hotel Type)
// ==========================================
// 预测结果与月度统计均按酒店类型隔离
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HotelType {
    #[serde(rename = "Resort Hotel")]
    Resort, // 度假酒店
    #[serde(rename = "City Hotel")]
    City, // 城市酒店
}

impl HotelType {
    /// 接口使用的字面值
    pub fn as_str(&self) -> &'static str {
        match self {
            HotelType::Resort => "Resort Hotel",
            HotelType::City => "City Hotel",
        }
    }

    /// 从接口字面值解析（大小写与首尾空白不敏感）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "resort hotel" | "resort" => Some(HotelType::Resort),
            "city hotel" | "city" => Some(HotelType::City),
            _ => None,
        }
    }
}

impl Default for HotelType {
    fn default() -> Self {
        HotelType::Resort
    }
}

impl fmt::Display for HotelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 视图模式 (View Mode)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Daily,   // 日视图: 触发单日预测
    Weekly,  // 周视图: 触发周趋势
    Monthly, // 月视图: 只看月度统计
}

impl Default for ViewMode {
    fn default() -> Self {
        ViewMode::Daily
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Daily => write!(f, "daily"),
            ViewMode::Weekly => write!(f, "weekly"),
            ViewMode::Monthly => write!(f, "monthly"),
        }
    }
}

// ==========================================
// 风险等级 (Risk Level)
// ==========================================
// 顺序: Low < Medium < High
// 取消风险与早餐负载共用等级, 阈值见 engine::metrics 中的两套策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,    // 低
    Medium, // 中
    High,   // 高
}

impl RiskLevel {
    /// 看板配色 (green / amber / red)
    pub fn color(&self) -> &'static str {
        match self {
            RiskLevel::Low => "#22c55e",
            RiskLevel::Medium => "#f59e0b",
            RiskLevel::High => "#ef4444",
        }
    }

    /// 国际化消息键
    pub fn label_key(&self) -> &'static str {
        match self {
            RiskLevel::Low => "risk.low",
            RiskLevel::Medium => "risk.medium",
            RiskLevel::High => "risk.high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hotel_type_wire_format() {
        let json = serde_json::to_string(&HotelType::Resort).unwrap();
        assert_eq!(json, "\"Resort Hotel\"");

        let parsed: HotelType = serde_json::from_str("\"City Hotel\"").unwrap();
        assert_eq!(parsed, HotelType::City);
    }

    #[test]
    fn test_hotel_type_parse() {
        assert_eq!(HotelType::parse(" resort hotel "), Some(HotelType::Resort));
        assert_eq!(HotelType::parse("CITY"), Some(HotelType::City));
        assert_eq!(HotelType::parse("Hostel"), None);
    }

    #[test]
    fn test_risk_level_order() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
        assert_eq!(RiskLevel::High.color(), "#ef4444");
    }
}
