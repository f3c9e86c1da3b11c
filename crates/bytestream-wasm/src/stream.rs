//! ByteStream wasm-bindgen エクスポート
//!
//! JS からは `ByteStream` クラスとして見える。`'data'` イベントの代わりに
//! `onData()` でリスナーを登録する。

use core::cell::{Cell, RefCell};

use js_sys::{Function, Uint8Array};
use wasm_bindgen::prelude::*;

use bytestream::{ByteStream, ReadRange, StreamError};

/// JS 向け ByteStream
///
/// すべてのメソッドが `&self` を取るため、`onData()` のリスナー内から
/// `read()` を呼んでも再帰利用エラーにならない。リスナーは書き込みが
/// 完了し、内部バッファの借用を手放した後に呼ばれる。
///
/// ## 使用例（TypeScript）
/// ```typescript
/// const bs = new ByteStream();
/// bs.onData(() => {
///     let frame;
///     while ((frame = bs.read(4)) !== null) {
///         handle(frame);
///     }
/// });
/// socket.on('data', (buf) => bs.write(buf));
/// ```
#[wasm_bindgen(js_name = "ByteStream")]
pub struct JsByteStream {
    /// 本体
    inner: RefCell<ByteStream>,
    /// `onData()` で登録されたリスナー（登録順）
    listeners: RefCell<Vec<(u32, Function)>>,
    /// 次に払い出すリスナー ID
    next_listener_id: Cell<u32>,
}

#[wasm_bindgen(js_class = "ByteStream")]
impl JsByteStream {
    /// ByteStream を生成する
    ///
    /// # 引数
    /// - `initial_chunks`: 初期確保するチャンク数。省略時は 0
    #[wasm_bindgen(constructor)]
    pub fn new(initial_chunks: Option<u32>) -> JsByteStream {
        JsByteStream {
            inner: RefCell::new(ByteStream::with_capacity(initial_chunks.unwrap_or(0) as usize)),
            listeners: RefCell::new(Vec::new()),
            next_listener_id: Cell::new(1),
        }
    }

    /// チャンクを書き込み、`onData()` のリスナーに新しい総バイト数を通知する
    ///
    /// # 戻り値
    /// 書き込み後の総バイト数
    ///
    /// # エラー
    /// - リスナーが例外を投げた場合、その例外をそのまま投げる（データは書き込み済み）
    pub fn write(&self, chunk: Vec<u8>) -> Result<usize, JsValue> {
        let total = self.inner.borrow_mut().write(chunk);
        self.emit_data(total)?;
        Ok(total)
    }

    /// `min..=max` バイトを読み出す
    ///
    /// # 引数
    /// - `min`: 最小バイト数
    /// - `max`: 最大バイト数。省略時は `min`
    ///
    /// # 戻り値
    /// 読み出したバイト列。データ不足なら `null`
    ///
    /// # エラー
    /// - `max < min`
    /// - 負の長さ
    pub fn read(&self, min: f64, max: Option<f64>) -> Result<JsValue, JsError> {
        let range = range_from_js(min, max).map_err(|e| JsError::new(&format!("{}", e)))?;
        let block = self.inner.borrow_mut().read_range(range);
        Ok(match block {
            Some(block) => Uint8Array::from(&block[..]).into(),
            None => JsValue::NULL,
        })
    }

    /// 保持しているチャンク数
    #[wasm_bindgen(js_name = "getBufferCount")]
    pub fn get_buffer_count(&self) -> usize {
        self.inner.borrow().chunk_count()
    }

    /// バッファ中の総バイト数
    #[wasm_bindgen(js_name = "getLength")]
    pub fn get_length(&self) -> usize {
        self.inner.borrow().total_length()
    }

    /// 書き込み通知のリスナーを登録する
    ///
    /// # 戻り値
    /// `offData()` に渡す ID
    #[wasm_bindgen(js_name = "onData")]
    pub fn on_data(&self, callback: Function) -> u32 {
        let id = self.next_listener_id.get();
        self.next_listener_id.set(id.wrapping_add(1));
        self.listeners.borrow_mut().push((id, callback));
        log::debug!("data listener {} registered", id);
        id
    }

    /// リスナーを解除する。登録されていなければ `false`
    #[wasm_bindgen(js_name = "offData")]
    pub fn off_data(&self, id: u32) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(entry_id, _)| *entry_id != id);
        listeners.len() != before
    }

    /// ストリーム統計を JSON 文字列で返す
    ///
    /// ```json
    /// {
    ///   "buffered_bytes": 4,
    ///   "chunk_count": 1,
    ///   "total_written_bytes": 12,
    ///   "total_read_bytes": 8,
    ///   "write_count": 3,
    ///   "read_count": 2
    /// }
    /// ```
    #[wasm_bindgen(js_name = "getStats")]
    pub fn get_stats(&self) -> Result<String, JsError> {
        stats_json(&self.inner.borrow())
            .map_err(|e| JsError::new(&format!("Stats serialization failed: {}", e)))
    }
}

impl JsByteStream {
    /// 登録済みリスナーを順に呼ぶ
    ///
    /// 呼び出し中にリスナーが追加・解除されても影響しないよう、先に複製しておく。
    fn emit_data(&self, total: usize) -> Result<(), JsValue> {
        let listeners: Vec<Function> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, f)| f.clone())
            .collect();
        if listeners.is_empty() {
            return Ok(());
        }

        let arg = JsValue::from_f64(total as f64);
        for listener in listeners {
            listener.call1(&JsValue::NULL, &arg)?;
        }
        Ok(())
    }
}

/// JS の数値引数を読み取り範囲に変換する
///
/// 小数は切り捨て（負方向）てから検証する。NaN は 0 として扱う。
pub fn range_from_js(min: f64, max: Option<f64>) -> Result<ReadRange, StreamError> {
    ReadRange::from_signed(js_length(min), max.map(js_length))
}

fn js_length(value: f64) -> i64 {
    // as は NaN を 0 に、範囲外を飽和させる
    value.floor() as i64
}

/// 統計情報を JSON 文字列にする
pub fn stats_json(stream: &ByteStream) -> Result<String, serde_json::Error> {
    serde_json::to_string(&stream.stats())
}
