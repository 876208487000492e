// ==========================================
// 酒店预测看板 - 接口层
// ==========================================
// 职责: 预测服务 HTTP 契约、数据结构、传输错误
// ==========================================

pub mod dto;
pub mod error;
pub mod forecast_api;
pub mod http_client;

// 重导出核心类型
pub use dto::{format_date, parse_date, PredictDateRequest, DATE_FORMAT};
pub use error::{ApiError, ApiResult};
pub use forecast_api::ForecastApi;
pub use http_client::HttpForecastApi;
