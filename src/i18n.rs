// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持韩文（默认）、英文、中文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

use crate::config::SUPPORTED_LOCALES;

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"ko"、"en" 或 "zh-CN"）；不支持的代码被忽略
pub fn set_locale(locale: &str) {
    if SUPPORTED_LOCALES.contains(&locale) {
        rust_i18n::set_locale(locale);
    } else {
        tracing::warn!(locale, "不支持的语言，保持当前设置");
    }
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use hotel_predict::i18n::t;
/// let msg = t("risk.high");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use hotel_predict::i18n::t_with_args;
/// let msg = t_with_args("notify.prediction_failed", &[("error", "timeout")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // rust-i18n 的 locale 为全局状态，且 Rust 测试默认并行执行；
    // 为避免测试互相干扰，这里对 i18n 相关测试串行化。
    static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_set_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        assert_eq!(current_locale(), "en");

        set_locale("zh-CN");
        assert_eq!(current_locale(), "zh-CN");

        // 不支持的语言不生效
        set_locale("fr");
        assert_eq!(current_locale(), "zh-CN");

        set_locale("ko");
    }

    #[test]
    fn test_translate_simple() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("ko");
        assert_eq!(t("risk.high"), "높음");

        set_locale("en");
        assert_eq!(t("risk.high"), "High");

        set_locale("ko");
    }

    #[test]
    fn test_translate_with_args() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        let msg = t_with_args("notify.prediction_failed", &[("error", "timeout")]);
        assert!(msg.contains("timeout"));
        assert!(msg.contains("Prediction request failed"));

        set_locale("ko");
        let msg = t_with_args(
            "notify.prediction_success",
            &[("date", "2017-04-01"), ("hotel", "Resort Hotel")],
        );
        assert!(msg.contains("2017-04-01"));
        assert!(msg.contains("Resort Hotel"));
    }
}
