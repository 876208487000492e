// ==========================================
// 酒店预测看板 - 预约列表分页
// ==========================================
// 职责: 按 (date, offset, limit) 获取选中日期的预约
// 规则: 与单日预测相同，最后发出的请求生效
// 生命周期: 每次获取整页替换，不合并
// ==========================================

use super::lock::lock;
use super::notify::{Notification, Notifier};
use super::sequence::{RequestSequencer, RequestTicket};
use crate::api::{ApiError, ForecastApi};
use crate::domain::BookingPage;
use crate::i18n::t_with_args;
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// 分页错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PagerError {
    #[error("尚未加载预约列表")]
    NotLoaded,

    #[error("已经是最后一页")]
    NoNextPage,

    #[error("已经是第一页")]
    NoPreviousPage,

    #[error("预约列表获取失败: {0}")]
    Transport(#[from] ApiError),
}

/// 一次分页请求的结局
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Applied(Arc<BookingPage>),
    Superseded,
}

/// 对外可见的分页状态
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingView {
    pub date: Option<NaiveDate>,
    pub loading: bool,
    pub page: Option<BookingPage>,
    pub error: Option<String>,
}

#[derive(Default)]
struct PagerState {
    sequencer: RequestSequencer,
    date: Option<NaiveDate>,
    loading: bool,
    page: Option<Arc<BookingPage>>,
    error: Option<ApiError>,
}

// ==========================================
// BookingPager
// ==========================================
pub struct BookingPager {
    api: Arc<dyn ForecastApi>,
    notifier: Arc<dyn Notifier>,
    page_size: u32,
    state: Mutex<PagerState>,
}

impl BookingPager {
    pub fn new(api: Arc<dyn ForecastApi>, notifier: Arc<dyn Notifier>, page_size: u32) -> Self {
        Self {
            api,
            notifier,
            page_size: page_size.max(1),
            state: Mutex::new(PagerState::default()),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// 加载某日第一页
    pub async fn load(&self, date: NaiveDate) -> Result<PageOutcome, PagerError> {
        self.fetch(date, 0).await
    }

    /// 下一页
    pub async fn next_page(&self) -> Result<PageOutcome, PagerError> {
        let (date, offset) = {
            let state = lock(&self.state);
            let page = state.page.as_ref().ok_or(PagerError::NotLoaded)?;
            if !page.has_next() {
                return Err(PagerError::NoNextPage);
            }
            (page.date, page.offset + page.limit)
        };
        self.fetch(date, offset).await
    }

    /// 上一页
    pub async fn previous_page(&self) -> Result<PageOutcome, PagerError> {
        let (date, offset) = {
            let state = lock(&self.state);
            let page = state.page.as_ref().ok_or(PagerError::NotLoaded)?;
            if !page.has_previous() {
                return Err(PagerError::NoPreviousPage);
            }
            (page.date, page.offset.saturating_sub(page.limit))
        };
        self.fetch(date, offset).await
    }

    /// 丢弃当前页与进行中的请求
    pub fn clear(&self) {
        let mut state = lock(&self.state);
        state.sequencer.supersede();
        state.date = None;
        state.loading = false;
        state.page = None;
        state.error = None;
    }

    pub fn current_page(&self) -> Option<Arc<BookingPage>> {
        lock(&self.state).page.clone()
    }

    pub fn snapshot(&self) -> BookingView {
        let state = lock(&self.state);
        BookingView {
            date: state.date,
            loading: state.loading,
            page: state.page.as_deref().cloned(),
            error: state.error.as_ref().map(ToString::to_string),
        }
    }

    // ==========================================
    // 内部方法
    // ==========================================

    async fn fetch(&self, date: NaiveDate, offset: u32) -> Result<PageOutcome, PagerError> {
        let ticket = {
            let mut state = lock(&self.state);
            let ticket = state.sequencer.issue();
            // 换日期时旧列表不再有意义
            if state.date != Some(date) {
                state.page = None;
            }
            state.date = Some(date);
            state.loading = true;
            state.error = None;
            ticket
        };

        tracing::debug!(%date, offset, limit = self.page_size, seq = ticket.seq(), "获取预约列表");
        let response = self.api.fetch_bookings(date, offset, self.page_size).await;

        self.complete(date, ticket, response)
    }

    fn complete(
        &self,
        date: NaiveDate,
        ticket: RequestTicket,
        response: Result<BookingPage, ApiError>,
    ) -> Result<PageOutcome, PagerError> {
        let outcome = {
            let mut state = lock(&self.state);
            if !state.sequencer.is_current(ticket) {
                tracing::debug!(%date, seq = ticket.seq(), "过期预约列表响应，已丢弃");
                return Ok(PageOutcome::Superseded);
            }

            state.loading = false;
            match response {
                Ok(page) => {
                    let page = Arc::new(page);
                    state.page = Some(page.clone());
                    Ok(page)
                }
                Err(e) => {
                    state.page = None;
                    state.error = Some(e.clone());
                    Err(e)
                }
            }
        };

        match outcome {
            Ok(page) => {
                tracing::info!(
                    %date,
                    offset = page.offset,
                    records = page.records.len(),
                    total = page.total_count,
                    "预约列表已更新"
                );
                Ok(PageOutcome::Applied(page))
            }
            Err(e) => {
                tracing::warn!(%date, error = %e, "预约列表获取失败");
                let error = e.to_string();
                self.notifier.notify(Notification::error(t_with_args(
                    "notify.bookings_failed",
                    &[("error", &error)],
                )));
                Err(PagerError::Transport(e))
            }
        }
    }
}
