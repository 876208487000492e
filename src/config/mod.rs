// ==========================================
// 酒店预测看板 - 配置层
// ==========================================
// 职责: 看板配置加载与校验
// 存储: JSON 文件 + 环境变量，不做会话间持久化
// ==========================================

pub mod dashboard_config;

// 重导出
pub use dashboard_config::{
    config_keys, default_config_path, ConfigError, DashboardConfig, MAX_PAGE_SIZE,
    SUPPORTED_LOCALES,
};
