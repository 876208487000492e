// ==========================================
// 酒店预测看板 - 单日预测请求协调器
// ==========================================
// 状态机: Idle → Validating → Loading → {Success, Error} → Idle
// 规则:
// 1. 日期不在可用集合中: 立即拒绝，不发请求，不改变已显示结果
// 2. 每个请求分配单调递增序号
// 3. Loading 期间不显示任何旧结果
// 4. 只有最新序号的响应会被应用，过期响应静默丢弃
// 5. 失败: 进入 Error，清空结果，发出通知
// 说明: 传输层无取消能力，被丢弃的请求仍会在后台完成
// ==========================================

use super::availability::DateAvailabilitySet;
use super::lock::lock;
use super::notify::{Notification, Notifier};
use super::sequence::{RequestSequencer, RequestTicket};
use crate::api::{format_date, ApiError, ForecastApi};
use crate::domain::{HotelType, PredictionKey, PredictionResult};
use crate::i18n::t_with_args;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use thiserror::Error;

// ==========================================
// 状态与错误
// ==========================================

/// 协调器阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionPhase {
    /// 无进行中的请求
    Idle,
    /// 校验日期
    Validating,
    /// 等待响应
    Loading,
    /// 已显示结果
    Success,
    /// 请求失败
    Error,
}

impl PredictionPhase {
    pub fn as_str(&self) -> &str {
        match self {
            PredictionPhase::Idle => "idle",
            PredictionPhase::Validating => "validating",
            PredictionPhase::Loading => "loading",
            PredictionPhase::Success => "success",
            PredictionPhase::Error => "error",
        }
    }

    /// 界面是否显示加载指示
    pub fn is_loading(&self) -> bool {
        matches!(self, PredictionPhase::Loading)
    }
}

/// 预测错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    /// 校验错误: 本地拒绝，不触达网络
    #[error("日期无可用数据: {date}")]
    DateUnavailable { date: NaiveDate },

    /// 传输错误
    #[error("预测请求失败: {0}")]
    Transport(#[from] ApiError),
}

/// 一次 predict 调用的结局
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionOutcome {
    /// 结果已应用到显示状态
    Applied(Arc<PredictionResult>),
    /// 期间有更新的请求，本次响应已丢弃
    Superseded,
}

impl PredictionOutcome {
    pub fn applied(&self) -> Option<&Arc<PredictionResult>> {
        match self {
            PredictionOutcome::Applied(result) => Some(result),
            PredictionOutcome::Superseded => None,
        }
    }
}

/// 对外可见的显示状态
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionView {
    pub phase: PredictionPhase,
    /// 当前（或最近一次）请求的键
    pub key: Option<PredictionKey>,
    pub seq: u64,
    pub result: Option<PredictionResult>,
    pub error: Option<String>,
}

struct CoordinatorState {
    sequencer: RequestSequencer,
    phase: PredictionPhase,
    key: Option<PredictionKey>,
    result: Option<Arc<PredictionResult>>,
    error: Option<ApiError>,
}

impl CoordinatorState {
    fn transition(&mut self, to: PredictionPhase) {
        tracing::debug!(
            from = self.phase.as_str(),
            to = to.as_str(),
            seq = self.sequencer.latest_seq(),
            "预测状态迁移"
        );
        self.phase = to;
    }
}

// ==========================================
// PredictionRequestCoordinator
// ==========================================
pub struct PredictionRequestCoordinator {
    api: Arc<dyn ForecastApi>,
    availability: Arc<DateAvailabilitySet>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<CoordinatorState>,
}

impl PredictionRequestCoordinator {
    pub fn new(
        api: Arc<dyn ForecastApi>,
        availability: Arc<DateAvailabilitySet>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            api,
            availability,
            notifier,
            state: Mutex::new(CoordinatorState {
                sequencer: RequestSequencer::new(),
                phase: PredictionPhase::Idle,
                key: None,
                result: None,
                error: None,
            }),
        }
    }

    /// 请求单日预测
    ///
    /// # 返回
    /// - Ok(Applied): 本次为最新请求，结果已应用
    /// - Ok(Superseded): 期间发出了更新的请求，本次响应被丢弃（无论成败）
    /// - Err(DateUnavailable): 校验未通过，状态不变
    /// - Err(Transport): 本次为最新请求且失败，结果已清空
    pub async fn predict(
        &self,
        date: NaiveDate,
        hotel_type: HotelType,
    ) -> Result<PredictionOutcome, PredictionError> {
        let key = PredictionKey::new(date, hotel_type);
        let ticket = self.begin(key)?;

        tracing::info!(%date, %hotel_type, seq = ticket.seq(), "发起单日预测");
        let response = self.api.predict_date(date, hotel_type).await;

        self.complete(key, ticket, response)
    }

    /// 使当前结果与所有进行中的请求失效（如切换酒店类型）
    pub fn invalidate(&self) {
        let mut state = lock(&self.state);
        state.sequencer.supersede();
        state.key = None;
        state.result = None;
        state.error = None;
        state.transition(PredictionPhase::Idle);
    }

    pub fn phase(&self) -> PredictionPhase {
        lock(&self.state).phase
    }

    /// 当前显示的结果（Loading / Error 时为 None）
    pub fn current_result(&self) -> Option<Arc<PredictionResult>> {
        lock(&self.state).result.clone()
    }

    pub fn snapshot(&self) -> PredictionView {
        let state = lock(&self.state);
        PredictionView {
            phase: state.phase,
            key: state.key,
            seq: state.sequencer.latest_seq(),
            result: state.result.as_deref().cloned(),
            error: state.error.as_ref().map(ToString::to_string),
        }
    }

    // ==========================================
    // 内部方法
    // ==========================================

    /// 校验并登记请求
    ///
    /// 校验失败时恢复原阶段，不发放序号，进行中的请求不受影响
    fn begin(&self, key: PredictionKey) -> Result<RequestTicket, PredictionError> {
        let mut state = lock(&self.state);
        let previous = state.phase;
        state.transition(PredictionPhase::Validating);

        if !self.availability.is_available(key.date) {
            tracing::debug!(date = %key.date, hotel_type = %key.hotel_type, "日期不可用，拒绝预测");
            state.transition(previous);
            return Err(PredictionError::DateUnavailable { date: key.date });
        }

        let ticket = state.sequencer.issue();
        state.key = Some(key);
        state.result = None;
        state.error = None;
        state.transition(PredictionPhase::Loading);
        Ok(ticket)
    }

    /// 应用响应（仅限最新序号）
    fn complete(
        &self,
        key: PredictionKey,
        ticket: RequestTicket,
        response: Result<PredictionResult, ApiError>,
    ) -> Result<PredictionOutcome, PredictionError> {
        let outcome = {
            let mut state = lock(&self.state);

            if !state.sequencer.is_current(ticket) {
                tracing::debug!(
                    %key,
                    seq = ticket.seq(),
                    latest = state.sequencer.latest_seq(),
                    ok = response.is_ok(),
                    "过期预测响应，已丢弃"
                );
                return Ok(PredictionOutcome::Superseded);
            }

            match response {
                Ok(result) => {
                    let result = Arc::new(result);
                    state.result = Some(result.clone());
                    state.error = None;
                    state.transition(PredictionPhase::Success);
                    Ok(result)
                }
                Err(e) => {
                    state.result = None;
                    state.error = Some(e.clone());
                    state.transition(PredictionPhase::Error);
                    Err(e)
                }
            }
        };

        // 通知在锁外发布
        match outcome {
            Ok(result) => {
                tracing::info!(
                    %key,
                    seq = ticket.seq(),
                    expected_checkins = result.expected_checkins,
                    "预测结果已应用"
                );
                let date = format_date(key.date);
                self.notifier.notify(Notification::success(t_with_args(
                    "notify.prediction_success",
                    &[("date", &date), ("hotel", key.hotel_type.as_str())],
                )));
                Ok(PredictionOutcome::Applied(result))
            }
            Err(e) => {
                tracing::warn!(%key, seq = ticket.seq(), error = %e, "预测请求失败");
                let error = e.to_string();
                self.notifier.notify(Notification::error(t_with_args(
                    "notify.prediction_failed",
                    &[("error", &error)],
                )));
                Err(PredictionError::Transport(e))
            }
        }
    }
}
