// ==========================================
// 集成测试辅助模块
// ==========================================

pub mod mock_api;
pub mod test_data_builder;

#[allow(unused_imports)]
pub use mock_api::{d, month_of, wait_until, MockForecastApi};
