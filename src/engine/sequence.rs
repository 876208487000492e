// ==========================================
// 酒店预测看板 - 请求序号
// ==========================================
// 规则: 最后发出的请求生效 (last request wins)，而不是最先返回的
// 说明: 序号单调递增；由持有方放在自己的状态锁内使用，
//       保证"检查是否最新"与"写入结果"在同一临界区完成
// ==========================================

/// 请求凭证
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn seq(&self) -> u64 {
        self.0
    }
}

/// 请求序号发放器
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: u64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 发放新凭证，之前发放的凭证全部失效
    pub fn issue(&mut self) -> RequestTicket {
        self.latest += 1;
        RequestTicket(self.latest)
    }

    /// 使所有未完成请求失效（不发放新凭证）
    pub fn supersede(&mut self) {
        self.latest += 1;
    }

    /// 凭证是否仍是最新
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.latest
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest
    }
}
