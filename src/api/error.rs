// ==========================================
// 酒店预测看板 - 接口层错误类型
// ==========================================
// 职责: 将传输层 / HTTP / 解码错误统一为可复制的错误
// 说明: 同一个进行中的请求结果可能被多个等待方共享，因此必须 Clone
// ==========================================

use thiserror::Error;

/// 接口层错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    // ==========================================
    // 传输错误
    // ==========================================
    #[error("网络请求失败: {0}")]
    Transport(String),

    #[error("服务返回错误状态: status={status}, message={message}")]
    HttpStatus { status: u16, message: String },

    // ==========================================
    // 载荷错误
    // ==========================================
    #[error("响应解析失败: {0}")]
    Decode(String),

    /// 后端返回 success=false
    #[error("服务拒绝请求: {0}")]
    Rejected(String),

    // ==========================================
    // 配置错误
    // ==========================================
    #[error("无效的服务地址: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// 是否为服务端 5xx
    pub fn is_server_error(&self) -> bool {
        matches!(self, ApiError::HttpStatus { status, .. } if *status >= 500)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::HttpStatus {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
