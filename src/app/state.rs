// ==========================================
// 酒店预测看板 - 应用状态
// ==========================================
// 职责: 装配预测服务、通知端口与控制器
// ==========================================

use anyhow::Context;
use std::sync::Arc;

use super::controller::{RefreshReport, SelectionError, ViewSelectionController};
use super::notifier::TracingNotifier;
use crate::api::{ForecastApi, HttpForecastApi};
use crate::config::DashboardConfig;
use crate::engine::Notifier;

/// 应用状态
///
/// 一个会话一份；不做跨会话持久化
pub struct AppState {
    /// 生效配置
    pub config: DashboardConfig,

    /// 视图选择控制器（持有全部下层组件）
    pub controller: Arc<ViewSelectionController>,
}

impl AppState {
    /// 以给定的服务与通知端口装配（测试或嵌入使用）
    pub fn new(
        config: DashboardConfig,
        api: Arc<dyn ForecastApi>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let controller = Arc::new(ViewSelectionController::new(
            api,
            notifier,
            config.default_hotel_type,
            config.booking_page_size,
        ));
        Self { config, controller }
    }

    /// 按配置连接 HTTP 预测服务并完成初始选择
    ///
    /// 可用日期加载失败不是致命错误：集合为空，所有日期不可用，
    /// 用户可稍后手动刷新
    pub async fn bootstrap(config: DashboardConfig) -> anyhow::Result<Self> {
        crate::i18n::set_locale(&config.locale);

        let api = HttpForecastApi::from_config(&config)
            .with_context(|| format!("无法创建预测服务客户端: {}", config.api_base_url))?;
        tracing::info!(
            base_url = api.base_url(),
            hotel_type = %config.default_hotel_type,
            locale = %config.locale,
            "预测服务客户端已创建"
        );

        let state = Self::new(config, Arc::new(api), Arc::new(TracingNotifier));
        match state.initialize().await {
            Ok(report) if report.is_clean() => tracing::info!("看板初始化完成"),
            Ok(report) => {
                tracing::warn!(errors = report.errors.len(), "看板初始化完成，部分数据获取失败")
            }
            Err(e) => tracing::warn!(error = %e, "看板初始化未完成"),
        }

        Ok(state)
    }

    /// 按配置的初始日期初始化控制器
    pub async fn initialize(&self) -> Result<RefreshReport, SelectionError> {
        self.controller.initialize(self.config.initial_date).await
    }
}
