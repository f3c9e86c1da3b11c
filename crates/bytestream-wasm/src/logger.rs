//! `log` ファサードの出力先を JS の console に向けるロガー

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::JsValue;
use web_sys::console;

/// 何も指定されなかったときのレベル
pub const DEFAULT_LEVEL: LevelFilter = LevelFilter::Info;

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format_record(record));
        match record.level() {
            Level::Error => console::error_1(&line),
            Level::Warn => console::warn_1(&line),
            Level::Info => console::info_1(&line),
            Level::Debug | Level::Trace => console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

/// レベル文字列を解釈する（`None` なら `DEFAULT_LEVEL`）
///
/// `"off"`, `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`（大文字小文字は無視）
pub fn parse_level(level: Option<&str>) -> Result<LevelFilter, log::ParseLevelError> {
    match level {
        Some(s) => s.trim().parse(),
        None => Ok(DEFAULT_LEVEL),
    }
}

/// console へ出す 1 行
pub fn format_record(record: &Record<'_>) -> String {
    format!("[{}] {}: {}", record.level(), record.target(), record.args())
}

/// ロガーを登録し、最大レベルを設定する
///
/// 二回目以降の呼び出しではレベルだけが変わる。
pub fn install(filter: LevelFilter) {
    // 既に登録済みなら SetLoggerError になるが、レベル変更は有効
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(filter);
}
