// ==========================================
// 酒店预测看板 - HTTP 实现
// ==========================================
// 职责: 基于 reqwest 实现 ForecastApi
// 说明: 无自动重试；取消由调用方忽略结果实现，请求本身照常完成
// ==========================================

use crate::api::dto::{
    AvailableDatesDto, BookingPageDto, MonthlyAggregateDto, OverviewStatisticsDto,
    PredictDateRequest, PredictionDto, WeeklyTrendsDto,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::forecast_api::ForecastApi;
use crate::config::DashboardConfig;
use crate::domain::{
    AvailableDateSet, BookingPage, HotelType, MonthKey, MonthlyAggregate, OverviewStatistics,
    PredictionResult, WeeklyTrend,
};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use serde::de::DeserializeOwned;
use std::time::Duration;
use uuid::Uuid;

/// 错误消息最大保留长度
const MAX_ERROR_BODY_CHARS: usize = 200;

// ==========================================
// HttpForecastApi
// ==========================================
pub struct HttpForecastApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpForecastApi {
    /// 创建 HTTP 客户端
    ///
    /// # 参数
    /// - `base_url`: 服务根地址，如 http://localhost:8000
    /// - `timeout`: 单次请求超时
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let base_url = normalize_base_url(base_url)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(format!("HTTP 客户端初始化失败: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// 从看板配置创建
    pub fn from_config(config: &DashboardConfig) -> ApiResult<Self> {
        Self::new(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        let request_id = Uuid::new_v4();
        tracing::debug!(%request_id, path, ?query, "GET");

        let response = self
            .client
            .get(self.endpoint(path))
            .query(query)
            .send()
            .await?;

        decode_response(request_id, path, response).await
    }

    async fn post_json<B: serde::Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let request_id = Uuid::new_v4();
        tracing::debug!(%request_id, path, "POST");

        let response = self
            .client
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await?;

        decode_response(request_id, path, response).await
    }
}

#[async_trait]
impl ForecastApi for HttpForecastApi {
    async fn fetch_available_dates(&self) -> ApiResult<AvailableDateSet> {
        let dto: AvailableDatesDto = self.get_json("/api/dates/available", &[]).await?;
        Ok(dto.into_domain())
    }

    async fn fetch_monthly_aggregate(&self, key: MonthKey) -> ApiResult<MonthlyAggregate> {
        let query = [
            ("year", key.year.to_string()),
            ("month", key.month.to_string()),
            ("hotel_type", key.hotel_type.as_str().to_string()),
        ];
        let dto: MonthlyAggregateDto = self.get_json("/api/calendar/monthly", &query).await?;
        Ok(dto.into_domain(key))
    }

    async fn predict_date(
        &self,
        date: NaiveDate,
        hotel_type: HotelType,
    ) -> ApiResult<PredictionResult> {
        let body = PredictDateRequest::new(date, hotel_type);
        let dto: PredictionDto = self.post_json("/api/predict/date", &body).await?;
        Ok(dto.into_domain())
    }

    async fn fetch_bookings(
        &self,
        date: NaiveDate,
        offset: u32,
        limit: u32,
    ) -> ApiResult<BookingPage> {
        let query = [
            ("year", date.year().to_string()),
            ("month", date.month().to_string()),
            ("day", date.day().to_string()),
            ("offset", offset.to_string()),
            ("limit", limit.to_string()),
        ];
        let dto: BookingPageDto = self.get_json("/api/bookings/by-date", &query).await?;
        dto.into_domain(date, offset, limit)
    }

    async fn fetch_weekly_trends(&self) -> ApiResult<Vec<WeeklyTrend>> {
        let dto: WeeklyTrendsDto = self.get_json("/api/trends/weekly", &[]).await?;
        Ok(dto.into_domain())
    }

    async fn fetch_overview(&self) -> ApiResult<OverviewStatistics> {
        let dto: OverviewStatisticsDto = self.get_json("/api/statistics/overview", &[]).await?;
        Ok(dto.into_domain())
    }
}

// ==========================================
// 辅助函数
// ==========================================

/// 规范化服务根地址: 去空白、去末尾斜杠、要求 http(s) 协议
pub fn normalize_base_url(raw: &str) -> ApiResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let has_scheme = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    let has_host = trimmed
        .split_once("://")
        .is_some_and(|(_, rest)| !rest.is_empty());

    if has_scheme && has_host {
        Ok(trimmed.to_string())
    } else {
        Err(ApiError::InvalidBaseUrl(raw.to_string()))
    }
}

async fn decode_response<T: DeserializeOwned>(
    request_id: Uuid,
    path: &str,
    response: reqwest::Response,
) -> ApiResult<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = error_message(&body);
        tracing::warn!(%request_id, path, status = status.as_u16(), %message, "请求失败");
        return Err(ApiError::HttpStatus {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        tracing::warn!(%request_id, path, error = %e, "响应解析失败");
        ApiError::Decode(format!("{}: {}", path, e))
    })
}

/// 提取错误消息: 优先 FastAPI 的 detail 字段，否则截断原文
fn error_message(body: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string));

    detail.unwrap_or_else(|| body.chars().take(MAX_ERROR_BODY_CHARS).collect())
}
