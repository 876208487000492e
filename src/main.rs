// ==========================================
// 酒店预测看板 - 命令行入口
// ==========================================
// 用法: hotel-predict [yyyy-MM-dd]
// 流程: 日志 → 配置 → 装配 → (可选) 选择日期 → 输出看板快照 JSON
// ==========================================

use anyhow::Context;
use hotel_predict::api::parse_date;
use hotel_predict::app::AppState;
use hotel_predict::config::DashboardConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    hotel_predict::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} v{}", hotel_predict::APP_NAME, hotel_predict::VERSION);
    tracing::info!("==================================================");

    let config = DashboardConfig::load().context("配置加载失败")?;
    let requested = match std::env::args().nth(1) {
        Some(raw) => Some(parse_date(&raw).with_context(|| format!("日期格式无效: {raw}"))?),
        None => None,
    };

    let state = AppState::bootstrap(config).await?;

    if let Some(date) = requested {
        match state.controller.select_date(date).await {
            Ok(report) if !report.is_clean() => {
                tracing::warn!(%date, errors = report.errors.len(), "部分数据获取失败")
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(%date, error = %e, "日期选择被拒绝"),
        }
    }

    if let Err(e) = state.controller.load_bookings().await {
        tracing::warn!(error = %e, "预约列表未加载");
    }

    let snapshot = state.controller.snapshot();
    println!(
        "{}",
        serde_json::to_string_pretty(&snapshot).context("快照序列化失败")?
    );

    Ok(())
}
