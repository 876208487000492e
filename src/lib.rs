// ==========================================
// 酒店预测看板 - 核心库
// ==========================================
// 职责: 预测编排核心 (日期校验 / 月度缓存 / 请求协调 / 派生指标 / 视图选择)
// 技术栈: Tokio + Reqwest + Serde
// 系统定位: 预测服务与看板界面之间的客户端协调层
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "ko");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 接口层 - 预测服务 HTTP 契约
pub mod api;

// 引擎层 - 编排核心与派生指标
pub mod engine;

// 配置层 - 看板配置
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// 应用层 - 视图选择与装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    AvailableDateSet, BookingPage, BookingRecord, HotelType, MonthKey, MonthlyAggregate,
    PredictionResult, RiskLevel, SelectionState, ViewMode,
};

// 引擎
pub use engine::{
    BookingPager, DateAvailabilitySet, DerivedMetrics, MonthlyAggregateCache,
    PredictionRequestCoordinator,
};

// API
pub use api::{ApiError, ForecastApi, HttpForecastApi};

// 应用
pub use app::{AppState, SelectionError, ViewSelectionController};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "酒店预测看板";
