// ==========================================
// 酒店预测看板 - 视图选择控制器
// ==========================================
// 职责: 持有 SelectionState（唯一数据源），把界面事件编排为下层调用
// 任意字段变化时:
// (a) 重新校验选中日期
// (b) 仅日视图触发单日预测
// (c) 无论视图模式，都读取可见月份的月度统计
// (d) 仅周视图触发周趋势
// 切换酒店类型或日期: 立即作废当前预测结果与进行中的预测请求
// ==========================================

use crate::api::{ApiError, ForecastApi};
use crate::domain::{
    CalendarTile, DateBounds, HotelType, MonthKey, MonthlyAggregate, MonthlySummary,
    OverviewStatistics, SelectionState, ViewMode, WeeklyTrend,
};
use crate::engine::lock::lock;
use crate::engine::{
    BookingPager, BookingView, DateAvailabilitySet, DerivedMetrics, MonthlyAggregateCache,
    Notification, Notifier, PageOutcome, PagerError, PredictionError, PredictionOutcome,
    PredictionRequestCoordinator, PredictionView, RequestSequencer,
};
use crate::i18n::t_with_args;
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// 选择错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectionError {
    /// 校验错误: 仅作行内提示，不发通知
    #[error("日期无可用数据: {date}")]
    DateUnavailable { date: NaiveDate },

    #[error("尚未完成初始化，没有选中日期")]
    NotLoaded,

    #[error("月份超出范围: {year}-{month}")]
    MonthOutOfRange { year: i32, month: u32 },

    #[error(transparent)]
    Prediction(#[from] PredictionError),

    #[error(transparent)]
    Bookings(#[from] PagerError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// 一次刷新的结果汇总
///
/// 子请求互不影响，失败收集在 errors 中（已各自发出通知）
#[derive(Debug, Default)]
pub struct RefreshReport {
    pub prediction: Option<PredictionOutcome>,
    pub month: Option<Arc<MonthlyAggregate>>,
    pub weekly: Option<Arc<Vec<WeeklyTrend>>>,
    pub errors: Vec<SelectionError>,
}

impl RefreshReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// 看板整体快照（供渲染或序列化输出）
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub selection: Option<SelectionState>,
    pub available_range: Option<DateBounds>,
    pub visible_month: Option<MonthKey>,
    pub prediction: PredictionView,
    pub metrics: Option<DerivedMetrics>,
    pub calendar: Vec<CalendarTile>,
    pub month_summary: Option<MonthlySummary>,
    pub weekly_trends: Option<Vec<WeeklyTrend>>,
    pub overview: Option<OverviewStatistics>,
    pub bookings: BookingView,
}

#[derive(Default)]
struct ControllerState {
    selection: Option<SelectionState>,
    visible_month: Option<MonthKey>,
    weekly_seq: RequestSequencer,
    weekly: Option<Arc<Vec<WeeklyTrend>>>,
    overview: Option<Arc<OverviewStatistics>>,
}

// ==========================================
// ViewSelectionController
// ==========================================
pub struct ViewSelectionController {
    api: Arc<dyn ForecastApi>,
    notifier: Arc<dyn Notifier>,
    availability: Arc<DateAvailabilitySet>,
    monthly: Arc<MonthlyAggregateCache>,
    coordinator: Arc<PredictionRequestCoordinator>,
    bookings: Arc<BookingPager>,
    default_hotel_type: HotelType,
    state: Mutex<ControllerState>,
}

impl ViewSelectionController {
    /// 以默认组件装配
    ///
    /// # 参数
    /// - `api`: 预测服务
    /// - `notifier`: 通知端口
    /// - `default_hotel_type`: 初始酒店类型
    /// - `page_size`: 预约列表每页条数
    pub fn new(
        api: Arc<dyn ForecastApi>,
        notifier: Arc<dyn Notifier>,
        default_hotel_type: HotelType,
        page_size: u32,
    ) -> Self {
        let availability = Arc::new(DateAvailabilitySet::new());
        let monthly = Arc::new(MonthlyAggregateCache::new(api.clone()));
        let coordinator = Arc::new(PredictionRequestCoordinator::new(
            api.clone(),
            availability.clone(),
            notifier.clone(),
        ));
        let bookings = Arc::new(BookingPager::new(api.clone(), notifier.clone(), page_size));

        Self {
            api,
            notifier,
            availability,
            monthly,
            coordinator,
            bookings,
            default_hotel_type,
            state: Mutex::new(ControllerState::default()),
        }
    }

    // ==========================================
    // 组件访问
    // ==========================================

    pub fn availability(&self) -> &Arc<DateAvailabilitySet> {
        &self.availability
    }

    pub fn monthly_cache(&self) -> &Arc<MonthlyAggregateCache> {
        &self.monthly
    }

    pub fn coordinator(&self) -> &Arc<PredictionRequestCoordinator> {
        &self.coordinator
    }

    pub fn booking_pager(&self) -> &Arc<BookingPager> {
        &self.bookings
    }

    pub fn selection(&self) -> Option<SelectionState> {
        lock(&self.state).selection
    }

    pub fn visible_month(&self) -> Option<MonthKey> {
        lock(&self.state).visible_month
    }

    // ==========================================
    // 初始化
    // ==========================================

    /// 加载可用日期并建立初始选择
    ///
    /// 初始日期不可用时退到第一个可用日期
    pub async fn initialize(
        &self,
        initial_date: Option<NaiveDate>,
    ) -> Result<RefreshReport, SelectionError> {
        self.reload_availability().await?;

        let date = initial_date
            .filter(|d| self.availability.is_available(*d))
            .or_else(|| self.availability.first_available())
            .ok_or(SelectionError::NotLoaded)?;
        if let Some(requested) = initial_date.filter(|d| *d != date) {
            tracing::info!(%requested, fallback = %date, "初始日期不可用，改用首个可用日期");
        }

        {
            let mut state = lock(&self.state);
            let mut selection = state
                .selection
                .unwrap_or_else(|| SelectionState::new(date, self.default_hotel_type));
            selection.selected_date = date;
            state.selection = Some(selection);
            state.visible_month = Some(selection.month_key());
        }

        self.refresh().await
    }

    /// 手动刷新可用日期
    pub async fn reload_availability(&self) -> Result<usize, SelectionError> {
        match self.availability.refresh(self.api.as_ref()).await {
            Ok(count) => Ok(count),
            Err(e) => {
                self.notify_failure("notify.availability_failed", &e);
                Err(e.into())
            }
        }
    }

    // ==========================================
    // 选择变更
    // ==========================================

    /// 选择日期
    ///
    /// 不可用日期直接拒绝：不发请求，选择与已显示结果均不变
    pub async fn select_date(&self, date: NaiveDate) -> Result<RefreshReport, SelectionError> {
        if !self.availability.is_available(date) {
            tracing::debug!(%date, "选择了不可用日期，已拒绝");
            return Err(SelectionError::DateUnavailable { date });
        }

        let date_changed = {
            let mut state = lock(&self.state);
            let previous = state.selection;
            let mut selection = previous
                .unwrap_or_else(|| SelectionState::new(date, self.default_hotel_type));
            selection.selected_date = date;
            state.selection = Some(selection);
            state.visible_month = Some(selection.month_key());
            previous.map(|p| p.selected_date) != Some(date)
        };

        // 预测按日期作用域: 旧日期的结果与进行中的请求一并作废
        if date_changed {
            self.coordinator.invalidate();
            self.bookings.clear();
        }
        tracing::debug!(%date, "选中日期");
        self.refresh().await
    }

    /// 切换酒店类型
    ///
    /// 当前预测结果与进行中的预测请求立即作废
    pub async fn select_hotel_type(
        &self,
        hotel_type: HotelType,
    ) -> Result<RefreshReport, SelectionError> {
        let changed = {
            let mut guard = lock(&self.state);
            let state = &mut *guard;
            let selection = state.selection.as_mut().ok_or(SelectionError::NotLoaded)?;
            if selection.hotel_type == hotel_type {
                false
            } else {
                selection.hotel_type = hotel_type;
                state.visible_month = state.visible_month.map(|m| m.with_hotel_type(hotel_type));
                true
            }
        };

        if !changed {
            return Ok(RefreshReport::default());
        }

        self.coordinator.invalidate();
        tracing::info!(%hotel_type, "酒店类型已切换，预测结果已作废");
        self.refresh().await
    }

    /// 切换视图模式
    pub async fn select_view_mode(&self, mode: ViewMode) -> Result<RefreshReport, SelectionError> {
        let changed = {
            let mut guard = lock(&self.state);
            let state = &mut *guard;
            let selection = state.selection.as_mut().ok_or(SelectionError::NotLoaded)?;
            let previous = selection.view_mode;
            selection.view_mode = mode;
            if previous == ViewMode::Weekly && mode != ViewMode::Weekly {
                state.weekly_seq.supersede();
            }
            previous != mode
        };

        if !changed {
            return Ok(RefreshReport::default());
        }

        tracing::debug!(%mode, "视图模式已切换");
        self.refresh().await
    }

    /// 按当前选择重新获取（也用作失败后的显式重试）
    pub async fn refresh(&self) -> Result<RefreshReport, SelectionError> {
        let (selection, month) = {
            let state = lock(&self.state);
            let selection = state.selection.ok_or(SelectionError::NotLoaded)?;
            let month = state
                .visible_month
                .unwrap_or_else(|| selection.month_key());
            (selection, month)
        };

        let date = selection.selected_date;
        if !self.availability.is_available(date) {
            tracing::debug!(%date, "选中日期已不可用");
            return Err(SelectionError::DateUnavailable { date });
        }

        let prediction = async {
            match selection.view_mode {
                ViewMode::Daily => Some(self.coordinator.predict(date, selection.hotel_type).await),
                _ => None,
            }
        };
        let weekly = async {
            match selection.view_mode {
                ViewMode::Weekly => Some(self.load_weekly_trends().await),
                _ => None,
            }
        };
        let (prediction, month, weekly) = futures::join!(prediction, self.load_month(month), weekly);

        let mut report = RefreshReport::default();
        match prediction {
            Some(Ok(outcome)) => report.prediction = Some(outcome),
            Some(Err(e)) => report.errors.push(e.into()),
            None => {}
        }
        match month {
            Ok(aggregate) => report.month = Some(aggregate),
            Err(e) => report.errors.push(e.into()),
        }
        match weekly {
            Some(Ok(trends)) => report.weekly = trends,
            Some(Err(e)) => report.errors.push(e.into()),
            None => {}
        }

        Ok(report)
    }

    // ==========================================
    // 日历翻页
    // ==========================================

    /// 显示某个月（不改变选中日期）
    pub async fn show_month(
        &self,
        year: i32,
        month: u32,
    ) -> Result<Arc<MonthlyAggregate>, SelectionError> {
        let key = {
            let mut state = lock(&self.state);
            let hotel_type = state
                .selection
                .map_or(self.default_hotel_type, |s| s.hotel_type);
            let key = MonthKey::new(year, month, hotel_type)
                .ok_or(SelectionError::MonthOutOfRange { year, month })?;
            state.visible_month = Some(key);
            key
        };

        Ok(self.load_month(key).await?)
    }

    /// 相对当前可见月份前后翻页
    pub async fn shift_month(&self, delta: i32) -> Result<Arc<MonthlyAggregate>, SelectionError> {
        let current = self.visible_month().ok_or(SelectionError::NotLoaded)?;
        let target = current.shift(delta).ok_or(SelectionError::MonthOutOfRange {
            year: current.year,
            month: current.month,
        })?;
        self.show_month(target.year, target.month).await
    }

    /// 可见月份的日历格子（仅使用已缓存数据）
    pub fn calendar_tiles(&self) -> Vec<CalendarTile> {
        self.visible_month()
            .and_then(|key| self.monthly.peek(key))
            .map(|aggregate| aggregate.tiles(&self.availability.snapshot()))
            .unwrap_or_default()
    }

    // ==========================================
    // 预约列表 / 总览
    // ==========================================

    /// 加载选中日期的第一页预约
    pub async fn load_bookings(&self) -> Result<PageOutcome, SelectionError> {
        let date = self.selection().ok_or(SelectionError::NotLoaded)?.selected_date;
        Ok(self.bookings.load(date).await?)
    }

    pub async fn next_bookings_page(&self) -> Result<PageOutcome, SelectionError> {
        Ok(self.bookings.next_page().await?)
    }

    pub async fn previous_bookings_page(&self) -> Result<PageOutcome, SelectionError> {
        Ok(self.bookings.previous_page().await?)
    }

    /// 按需获取全量总览
    pub async fn load_overview(&self) -> Result<Arc<OverviewStatistics>, SelectionError> {
        match self.api.fetch_overview().await {
            Ok(overview) => {
                let overview = Arc::new(overview);
                lock(&self.state).overview = Some(overview.clone());
                tracing::info!(total_bookings = overview.total_bookings, "总览统计已更新");
                Ok(overview)
            }
            Err(e) => {
                tracing::warn!(error = %e, "总览统计获取失败");
                self.notify_failure("notify.overview_failed", &e);
                Err(e.into())
            }
        }
    }

    // ==========================================
    // 展示
    // ==========================================

    /// 当前预测结果的派生指标
    ///
    /// 结果的 (日期, 酒店类型) 与当前选择不一致时不展示
    pub fn current_metrics(&self) -> Option<DerivedMetrics> {
        let expected = self.selection()?.prediction_key();
        let view = self.coordinator.snapshot();
        if view.key != Some(expected) {
            return None;
        }
        view.result.map(|result| DerivedMetrics::from_result(&result))
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        let (selection, visible_month, weekly, overview) = {
            let state = lock(&self.state);
            (
                state.selection,
                state.visible_month,
                state.weekly.as_deref().cloned(),
                state.overview.as_deref().cloned(),
            )
        };
        let month_summary = visible_month
            .and_then(|key| self.monthly.peek(key))
            .map(|aggregate| aggregate.summary.clone());

        DashboardSnapshot {
            selection,
            available_range: self.availability.bounds(),
            visible_month,
            prediction: self.coordinator.snapshot(),
            metrics: self.current_metrics(),
            calendar: self.calendar_tiles(),
            month_summary,
            weekly_trends: weekly,
            overview,
            bookings: self.bookings.snapshot(),
        }
    }

    // ==========================================
    // 内部方法
    // ==========================================

    async fn load_month(&self, key: MonthKey) -> Result<Arc<MonthlyAggregate>, ApiError> {
        let result = self.monthly.get(key).await;
        if let Err(e) = &result {
            self.notify_failure("notify.monthly_failed", e);
        }
        result
    }

    /// 获取周趋势；期间有更新请求时返回 Ok(None)
    async fn load_weekly_trends(&self) -> Result<Option<Arc<Vec<WeeklyTrend>>>, ApiError> {
        let ticket = lock(&self.state).weekly_seq.issue();
        let response = self.api.fetch_weekly_trends().await;

        let applied = {
            let mut state = lock(&self.state);
            if !state.weekly_seq.is_current(ticket) {
                tracing::debug!(seq = ticket.seq(), "过期周趋势响应，已丢弃");
                return Ok(None);
            }
            response.map(|trends| {
                let trends = Arc::new(trends);
                state.weekly = Some(trends.clone());
                trends
            })
        };

        match applied {
            Ok(trends) => {
                tracing::debug!(days = trends.len(), "周趋势已更新");
                Ok(Some(trends))
            }
            Err(e) => {
                tracing::warn!(error = %e, "周趋势获取失败");
                self.notify_failure("notify.weekly_failed", &e);
                Err(e)
            }
        }
    }

    fn notify_failure(&self, key: &str, error: &ApiError) {
        let error = error.to_string();
        self.notifier
            .notify(Notification::error(t_with_args(key, &[("error", &error)])));
    }
}
