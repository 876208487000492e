// ==========================================
// Mock 预测服务 - 用于集成测试
// ==========================================
// 功能:
// - 按端点计数调用次数
// - 按日期 / 月份挂起响应 (oneshot 闸门)，用于构造乱序完成
// - 注入失败
// ==========================================

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use hotel_predict::api::{ApiError, ApiResult, ForecastApi};
use hotel_predict::domain::{
    AvailableDateSet, BookingPage, DailyBookingStatistics, HotelType, MonthKey,
    MonthlyAggregate, OverviewStatistics, PredictionResult, WeeklyTrend,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::oneshot;

use super::test_data_builder::{booking, monthly_aggregate, prediction_for};

/// 日期简写
pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// Mock 预测服务
pub struct MockForecastApi {
    available: Mutex<ApiResult<AvailableDateSet>>,
    booking_total: u32,

    availability_gates: Mutex<Vec<oneshot::Receiver<()>>>,
    prediction_gates: Mutex<HashMap<NaiveDate, oneshot::Receiver<()>>>,
    monthly_gates: Mutex<HashMap<MonthKey, oneshot::Receiver<()>>>,
    weekly_gates: Mutex<Vec<oneshot::Receiver<()>>>,

    prediction_failures: AtomicUsize,
    monthly_failures: AtomicUsize,
    weekly_failures: AtomicUsize,

    availability_calls: AtomicUsize,
    prediction_calls: AtomicUsize,
    monthly_calls: AtomicUsize,
    booking_calls: AtomicUsize,
    weekly_calls: AtomicUsize,
    overview_calls: AtomicUsize,

    prediction_log: Mutex<Vec<(NaiveDate, HotelType)>>,
    monthly_log: Mutex<Vec<MonthKey>>,
    booking_log: Mutex<Vec<(NaiveDate, u32, u32)>>,
}

impl MockForecastApi {
    /// 以可用日期集合创建（上下界取集合首尾）
    pub fn with_dates(dates: &[NaiveDate]) -> Self {
        let min = dates.iter().min().copied();
        let max = dates.iter().max().copied();
        Self::with_availability(Ok(AvailableDateSet::new(dates.to_vec(), min, max)))
    }

    pub fn with_availability(available: ApiResult<AvailableDateSet>) -> Self {
        Self {
            available: Mutex::new(available),
            booking_total: 25,
            availability_gates: Mutex::new(Vec::new()),
            prediction_gates: Mutex::new(HashMap::new()),
            monthly_gates: Mutex::new(HashMap::new()),
            weekly_gates: Mutex::new(Vec::new()),
            prediction_failures: AtomicUsize::new(0),
            monthly_failures: AtomicUsize::new(0),
            weekly_failures: AtomicUsize::new(0),
            availability_calls: AtomicUsize::new(0),
            prediction_calls: AtomicUsize::new(0),
            monthly_calls: AtomicUsize::new(0),
            booking_calls: AtomicUsize::new(0),
            weekly_calls: AtomicUsize::new(0),
            overview_calls: AtomicUsize::new(0),
            prediction_log: Mutex::new(Vec::new()),
            monthly_log: Mutex::new(Vec::new()),
            booking_log: Mutex::new(Vec::new()),
        }
    }

    /// 可用日期加载失败
    pub fn unreachable() -> Self {
        Self::with_availability(Err(ApiError::Transport("connection refused".to_string())))
    }

    // ==========================================
    // 闸门与失败注入
    // ==========================================

    /// 替换后续可用日期请求的返回值
    pub fn set_availability(&self, available: ApiResult<AvailableDateSet>) {
        *self.available.lock().unwrap() = available;
    }

    /// 挂起下一次可用日期响应（返回值在请求发出时确定）
    pub fn hold_availability(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.availability_gates.lock().unwrap().push(rx);
        tx
    }

    /// 挂起某日的预测响应，直到发送端 send(())
    pub fn hold_prediction(&self, date: NaiveDate) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.prediction_gates.lock().unwrap().insert(date, rx);
        tx
    }

    /// 挂起某月的统计响应
    pub fn hold_monthly(&self, key: MonthKey) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.monthly_gates.lock().unwrap().insert(key, rx);
        tx
    }

    /// 挂起下一次周趋势响应
    pub fn hold_weekly(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.weekly_gates.lock().unwrap().push(rx);
        tx
    }

    pub fn fail_next_predictions(&self, n: usize) {
        self.prediction_failures.store(n, Ordering::SeqCst);
    }

    pub fn fail_next_monthly(&self, n: usize) {
        self.monthly_failures.store(n, Ordering::SeqCst);
    }

    pub fn fail_next_weekly(&self, n: usize) {
        self.weekly_failures.store(n, Ordering::SeqCst);
    }

    // ==========================================
    // 计数
    // ==========================================

    pub fn availability_calls(&self) -> usize {
        self.availability_calls.load(Ordering::SeqCst)
    }

    pub fn prediction_calls(&self) -> usize {
        self.prediction_calls.load(Ordering::SeqCst)
    }

    pub fn monthly_calls(&self) -> usize {
        self.monthly_calls.load(Ordering::SeqCst)
    }

    pub fn booking_calls(&self) -> usize {
        self.booking_calls.load(Ordering::SeqCst)
    }

    pub fn weekly_calls(&self) -> usize {
        self.weekly_calls.load(Ordering::SeqCst)
    }

    pub fn overview_calls(&self) -> usize {
        self.overview_calls.load(Ordering::SeqCst)
    }

    pub fn prediction_log(&self) -> Vec<(NaiveDate, HotelType)> {
        self.prediction_log.lock().unwrap().clone()
    }

    pub fn monthly_log(&self) -> Vec<MonthKey> {
        self.monthly_log.lock().unwrap().clone()
    }

    pub fn booking_log(&self) -> Vec<(NaiveDate, u32, u32)> {
        self.booking_log.lock().unwrap().clone()
    }
}

/// 消耗一次失败配额
fn take_failure(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

/// 取出最早登记的闸门
fn next_gate(gates: &Mutex<Vec<oneshot::Receiver<()>>>) -> Option<oneshot::Receiver<()>> {
    let mut gates = gates.lock().unwrap();
    if gates.is_empty() {
        None
    } else {
        Some(gates.remove(0))
    }
}

/// 等待闸门；发送端被丢弃时也放行
async fn pass_gate(gate: Option<oneshot::Receiver<()>>) {
    if let Some(rx) = gate {
        let _ = rx.await;
    }
}

#[async_trait]
impl ForecastApi for MockForecastApi {
    async fn fetch_available_dates(&self) -> ApiResult<AvailableDateSet> {
        self.availability_calls.fetch_add(1, Ordering::SeqCst);
        let available = self.available.lock().unwrap().clone();
        let gate = next_gate(&self.availability_gates);
        pass_gate(gate).await;
        available
    }

    async fn fetch_monthly_aggregate(&self, key: MonthKey) -> ApiResult<MonthlyAggregate> {
        self.monthly_calls.fetch_add(1, Ordering::SeqCst);
        self.monthly_log.lock().unwrap().push(key);
        let gate = self.monthly_gates.lock().unwrap().remove(&key);
        pass_gate(gate).await;

        if take_failure(&self.monthly_failures) {
            return Err(ApiError::HttpStatus {
                status: 503,
                message: "monthly unavailable".to_string(),
            });
        }
        Ok(monthly_aggregate(key))
    }

    async fn predict_date(
        &self,
        date: NaiveDate,
        hotel_type: HotelType,
    ) -> ApiResult<PredictionResult> {
        self.prediction_calls.fetch_add(1, Ordering::SeqCst);
        self.prediction_log.lock().unwrap().push((date, hotel_type));
        let gate = self.prediction_gates.lock().unwrap().remove(&date);
        pass_gate(gate).await;

        if take_failure(&self.prediction_failures) {
            return Err(ApiError::Transport("connection reset".to_string()));
        }
        Ok(prediction_for(date, hotel_type))
    }

    async fn fetch_bookings(
        &self,
        date: NaiveDate,
        offset: u32,
        limit: u32,
    ) -> ApiResult<BookingPage> {
        self.booking_calls.fetch_add(1, Ordering::SeqCst);
        self.booking_log.lock().unwrap().push((date, offset, limit));

        let end = (offset + limit).min(self.booking_total);
        let records = (offset..end).map(|i| booking(i, date)).collect();
        Ok(BookingPage {
            date,
            offset,
            limit,
            total_count: self.booking_total,
            records,
            statistics: DailyBookingStatistics {
                search_date: Some(date),
                model_confidence: 87.5,
                total_expected_guests: self.booking_total * 2,
                breakfast_preparation_count: self.booking_total,
            },
        })
    }

    async fn fetch_weekly_trends(&self) -> ApiResult<Vec<WeeklyTrend>> {
        let call = self.weekly_calls.fetch_add(1, Ordering::SeqCst) as u32;
        let gate = next_gate(&self.weekly_gates);
        pass_gate(gate).await;

        if take_failure(&self.weekly_failures) {
            return Err(ApiError::Decode("bad json".to_string()));
        }
        Ok(["Monday", "Tuesday"]
            .iter()
            .map(|day| WeeklyTrend {
                day: day.to_string(),
                bookings: 100 + call,
                cancellation_rate: Some(0.2),
                avg_guests: 2.0,
            })
            .collect())
    }

    async fn fetch_overview(&self) -> ApiResult<OverviewStatistics> {
        self.overview_calls.fetch_add(1, Ordering::SeqCst);
        Ok(OverviewStatistics {
            total_bookings: 119_390,
            overall_cancellation_rate: 0.37,
            average_lead_time: 104.0,
            monthly_statistics: Vec::new(),
        })
    }
}

/// 轮询等待条件成立（让出执行权给后台任务）
pub async fn wait_until<F: Fn() -> bool>(condition: F) {
    for _ in 0..500 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    panic!("等待条件超时");
}

/// 某日所在月份
pub fn month_of(date: NaiveDate, hotel_type: HotelType) -> MonthKey {
    MonthKey::new(date.year(), date.month(), hotel_type).unwrap()
}
