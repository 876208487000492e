// ==========================================
// 酒店预测看板 - 月度统计缓存
// ==========================================
// 键: (year, month, hotel_type)
// 规则:
// - 命中: 直接返回，不发请求
// - 未命中: 发起请求，并把"进行中的请求"本身存为缓存值，
//   同键的并发调用挂到同一个请求上，不重复发请求
// - 成功: 替换为结果，会话内不过期（历史数据静态）
// - 失败: 移除占位，不自动重试，下次 get 重新请求
// ==========================================

use super::lock::lock;
use crate::api::{ApiResult, ForecastApi};
use crate::domain::{MonthKey, MonthlyAggregate};
use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

type SharedFetch = Shared<BoxFuture<'static, ApiResult<Arc<MonthlyAggregate>>>>;

/// 缓存槽
enum Slot {
    /// 请求进行中
    Pending { fetch_id: u64, fetch: SharedFetch },
    /// 已就绪
    Ready(Arc<MonthlyAggregate>),
}

/// 查找结果（脱离锁的所有权副本）
enum Lookup {
    Hit(Arc<MonthlyAggregate>),
    Join { fetch_id: u64, fetch: SharedFetch },
}

#[derive(Default)]
struct CacheState {
    slots: HashMap<MonthKey, Slot>,
    next_fetch_id: u64,
}

// ==========================================
// MonthlyAggregateCache
// ==========================================
pub struct MonthlyAggregateCache {
    api: Arc<dyn ForecastApi>,
    state: Mutex<CacheState>,
}

impl MonthlyAggregateCache {
    pub fn new(api: Arc<dyn ForecastApi>) -> Self {
        Self {
            api,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// 获取月度统计
    pub async fn get(&self, key: MonthKey) -> ApiResult<Arc<MonthlyAggregate>> {
        let (fetch_id, fetch) = match self.lookup_or_start(key) {
            Lookup::Hit(aggregate) => return Ok(aggregate),
            Lookup::Join { fetch_id, fetch } => (fetch_id, fetch),
        };

        let result = fetch.await;
        self.settle(key, fetch_id, &result);
        result
    }

    /// 丢弃旧值并重新获取，结果整体替换
    pub async fn refresh(&self, key: MonthKey) -> ApiResult<Arc<MonthlyAggregate>> {
        lock(&self.state).slots.remove(&key);
        tracing::debug!(%key, "月度统计强制刷新");
        self.get(key).await
    }

    /// 只读查看，不触发请求
    pub fn peek(&self, key: MonthKey) -> Option<Arc<MonthlyAggregate>> {
        match lock(&self.state).slots.get(&key) {
            Some(Slot::Ready(aggregate)) => Some(aggregate.clone()),
            _ => None,
        }
    }

    /// 是否有进行中的请求
    pub fn is_pending(&self, key: MonthKey) -> bool {
        matches!(
            lock(&self.state).slots.get(&key),
            Some(Slot::Pending { .. })
        )
    }

    /// 清空缓存（进行中的请求照常完成，但结果不再写回）
    pub fn invalidate_all(&self) {
        let mut state = lock(&self.state);
        let dropped = state.slots.len();
        state.slots.clear();
        tracing::debug!(dropped, "月度统计缓存已清空");
    }

    /// 已就绪的条目数
    pub fn len(&self) -> usize {
        lock(&self.state)
            .slots
            .values()
            .filter(|slot| matches!(slot, Slot::Ready(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ==========================================
    // 内部方法
    // ==========================================

    /// 在同一临界区内完成"查找或登记新请求"
    fn lookup_or_start(&self, key: MonthKey) -> Lookup {
        let mut state = lock(&self.state);

        let existing = state.slots.get(&key).map(|slot| match slot {
            Slot::Ready(aggregate) => Lookup::Hit(aggregate.clone()),
            Slot::Pending { fetch_id, fetch } => Lookup::Join {
                fetch_id: *fetch_id,
                fetch: fetch.clone(),
            },
        });

        match existing {
            Some(Lookup::Hit(aggregate)) => {
                tracing::debug!(%key, "月度统计缓存命中");
                Lookup::Hit(aggregate)
            }
            Some(join) => {
                tracing::debug!(%key, "月度统计请求进行中，复用同一请求");
                join
            }
            None => {
                state.next_fetch_id += 1;
                let fetch_id = state.next_fetch_id;

                let api = self.api.clone();
                let fetch: SharedFetch = async move {
                    api.fetch_monthly_aggregate(key).await.map(Arc::new)
                }
                .boxed()
                .shared();

                state.slots.insert(
                    key,
                    Slot::Pending {
                        fetch_id,
                        fetch: fetch.clone(),
                    },
                );
                tracing::debug!(%key, fetch_id, "月度统计缓存未命中，发起请求");

                Lookup::Join { fetch_id, fetch }
            }
        }
    }

    /// 写回请求结果
    ///
    /// 只有槽位仍是本次请求的占位时才写回；多个等待方重复调用是幂等的
    fn settle(&self, key: MonthKey, fetch_id: u64, result: &ApiResult<Arc<MonthlyAggregate>>) {
        let mut state = lock(&self.state);

        let owns_slot = matches!(
            state.slots.get(&key),
            Some(Slot::Pending { fetch_id: id, .. }) if *id == fetch_id
        );
        if !owns_slot {
            return;
        }

        match result {
            Ok(aggregate) => {
                state.slots.insert(key, Slot::Ready(aggregate.clone()));
                tracing::debug!(%key, days = aggregate.daily_stats.len(), "月度统计已缓存");
            }
            Err(e) => {
                state.slots.remove(&key);
                tracing::warn!(%key, error = %e, "月度统计获取失败，未缓存");
            }
        }
    }
}
