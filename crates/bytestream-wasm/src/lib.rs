//! # bytestream-wasm
//!
//! wasm-bindgen エクスポート：Node.js / ブラウザから呼び出す公開 API。
//!
//! ## 使用方法（TypeScript）
//!
//! ```typescript
//! import { ByteStream, init_panic_hook, initLogger } from '../bytestream-wasm-pkg/bytestream_wasm';
//!
//! // パニック時のスタックトレースを有効化（開発時）
//! init_panic_hook();
//! initLogger("debug");
//!
//! const bs = new ByteStream();
//! bs.write(new TextEncoder().encode("potato"));
//! bs.write(new TextEncoder().encode(" salad"));
//!
//! bs.read(3);        // "pot"
//! bs.read(2, 5);     // "ato s"
//! bs.read(5);        // null（4 バイトしかない）
//! bs.read(0, 10);    // "alad"
//! bs.read(-1);       // throws
//! ```

use wasm_bindgen::prelude::*;

pub mod logger;
pub mod stream;

pub use stream::JsByteStream;

/// パニック時にブラウザコンソールにスタックトレースを出力する
///
/// 開発時に必ず呼び出すこと。本番ビルドでは feature flag で無効化可能。
#[wasm_bindgen]
pub fn init_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// `log` の出力を console に流す
///
/// # 引数
/// - `level`: `"off"` / `"error"` / `"warn"` / `"info"` / `"debug"` / `"trace"`。省略時は `"info"`
///
/// # エラー
/// - レベル文字列が不正
#[wasm_bindgen(js_name = "initLogger")]
pub fn init_logger(level: Option<String>) -> Result<(), JsError> {
    let filter = logger::parse_level(level.as_deref())
        .map_err(|e| JsError::new(&format!("Invalid log level: {}", e)))?;
    logger::install(filter);
    Ok(())
}
