//! bytestream-wasm 統合テスト
//!
//! 生産者（ソケット相当）→ ByteStream → 消費者（フレーム解析）のパイプラインをテストする。
//! JS から使われる場合と同じく、消費者は書き込み通知を合図に読み取りを試み、
//! データ不足（`None`）なら次の通知まで待つ。

use std::cell::Cell;
use std::rc::Rc;

use bytestream::{ByteStream, ReadRange, StreamError};
use bytestream_wasm::stream::{range_from_js, stats_json};

// ==============================================================
// ヘルパー: 長さプレフィックス付きフレームの生産者と消費者
// ==============================================================

/// フレーム列をエンコードし、任意の大きさのチャンクに切って流す生産者
struct Producer {
    wire: Vec<u8>,
    pos: usize,
}

/// 2 バイト BE の長さヘッダー + 本体、というフレームを読む消費者
struct Consumer {
    /// ヘッダーを読み終えて本体待ちの長さ
    pending_body: Option<usize>,
    frames: Vec<Vec<u8>>,
}

impl Producer {
    fn new(frames: &[&[u8]]) -> Self {
        let mut wire = Vec::new();
        for frame in frames {
            wire.extend_from_slice(&(frame.len() as u16).to_be_bytes());
            wire.extend_from_slice(frame);
        }
        Producer { wire, pos: 0 }
    }

    /// 次の `n` バイトを 1 チャンクとして取り出す（ソケットの 1 回の受信に相当）
    fn next_chunk(&mut self, n: usize) -> Option<Vec<u8>> {
        if self.pos >= self.wire.len() {
            return None;
        }
        let end = (self.pos + n).min(self.wire.len());
        let chunk = self.wire[self.pos..end].to_vec();
        self.pos = end;
        Some(chunk)
    }
}

impl Consumer {
    fn new() -> Self {
        Consumer {
            pending_body: None,
            frames: Vec::new(),
        }
    }

    /// 読めるだけフレームを読む
    fn drain(&mut self, bs: &mut ByteStream) {
        loop {
            let body_len = match self.pending_body {
                Some(len) => len,
                None => match bs.read_exact(2) {
                    Some(header) => {
                        let len = u16::from_be_bytes([header[0], header[1]]) as usize;
                        self.pending_body = Some(len);
                        len
                    }
                    None => return,
                },
            };

            if body_len == 0 {
                // 空フレーム: バッファが空だと read(0) は None になるので読まない
                self.frames.push(Vec::new());
                self.pending_body = None;
                continue;
            }

            match bs.read_exact(body_len) {
                Some(body) => {
                    self.frames.push(body);
                    self.pending_body = None;
                }
                None => return,
            }
        }
    }
}

/// 指定のチャンクサイズ列で流し、通知ごとに消費者を動かす
fn run_pipeline(frames: &[&[u8]], chunk_sizes: &[usize]) -> (Vec<Vec<u8>>, ByteStream) {
    let mut producer = Producer::new(frames);
    let mut consumer = Consumer::new();
    let mut bs = ByteStream::new();

    let notified = Rc::new(Cell::new(false));
    let flag = Rc::clone(&notified);
    bs.on_length_changed(move |_| flag.set(true));

    let mut sizes = chunk_sizes.iter().copied().cycle();
    while let Some(chunk) = producer.next_chunk(sizes.next().unwrap_or(1)) {
        bs.write(chunk);
        if notified.replace(false) {
            consumer.drain(&mut bs);
        }
    }

    (consumer.frames, bs)
}

// ==============================================================
// テスト
// ==============================================================

/// 1 バイトずつ届いてもフレームが復元される
#[test]
fn test_pipeline_byte_at_a_time() {
    let frames: [&[u8]; 3] = [b"hello", b"", b"here is a big block"];
    let (decoded, bs) = run_pipeline(&frames, &[1]);

    assert_eq!(decoded, frames.iter().map(|f| f.to_vec()).collect::<Vec<_>>());
    assert!(bs.is_empty());
    assert_eq!(bs.chunk_count(), 0);
}

/// フレーム境界とチャンク境界がずれていても復元される
#[test]
fn test_pipeline_uneven_chunks() {
    let frames: [&[u8]; 4] = [b"potato", b" ", b"salad", b"abc 123 "];
    let (decoded, bs) = run_pipeline(&frames, &[3, 7, 1, 11, 2]);

    assert_eq!(decoded, frames.iter().map(|f| f.to_vec()).collect::<Vec<_>>());
    let stats = bs.stats();
    assert_eq!(stats.buffered_bytes, 0);
    assert_eq!(stats.total_written_bytes, stats.total_read_bytes);
}

/// 全部まとめて 1 チャンクで届く場合
#[test]
fn test_pipeline_single_chunk() {
    let frames: [&[u8]; 3] = [b"a", b"bc", b"def"];
    let (decoded, bs) = run_pipeline(&frames, &[1024]);

    assert_eq!(decoded.len(), 3);
    assert_eq!(decoded[2], b"def");
    // ヘッダー 3 回 + 本体 3 回
    assert_eq!(bs.stats().read_count, 6);
}

/// 途中で止まった場合、未完成のフレームはバッファに残る
#[test]
fn test_partial_frame_stays_buffered() {
    let mut producer = Producer::new(&[&b"complete"[..], &b"truncated"[..]]);
    let mut consumer = Consumer::new();
    let mut bs = ByteStream::new();

    // 1 フレーム目全体 (2 + 8) + 2 フレーム目の一部 (2 + 4)
    bs.write(producer.next_chunk(10).unwrap());
    bs.write(producer.next_chunk(6).unwrap());
    consumer.drain(&mut bs);

    assert_eq!(consumer.frames, vec![b"complete".to_vec()]);
    assert_eq!(consumer.pending_body, Some(9));
    assert_eq!(bs.total_length(), 4);

    bs.write(producer.next_chunk(100).unwrap());
    consumer.drain(&mut bs);
    assert_eq!(consumer.frames[1], b"truncated");
}

/// JS 引数の変換と読み取りの組み合わせ
#[test]
fn test_js_arguments_drive_reads() {
    let mut bs = ByteStream::new();
    bs.write("potato");
    bs.write(" ");
    bs.write("salad");

    let range = range_from_js(3.0, None).unwrap();
    assert_eq!(bs.read_range(range).as_deref(), Some(&b"pot"[..]));

    let range = range_from_js(2.0, Some(5.0)).unwrap();
    assert_eq!(bs.read_range(range).as_deref(), Some(&b"ato s"[..]));

    let range = range_from_js(5.0, None).unwrap();
    assert_eq!(bs.read_range(range), None);

    let range = range_from_js(0.0, Some(10.0)).unwrap();
    assert_eq!(bs.read_range(range).as_deref(), Some(&b"alad"[..]));

    // 不正な引数はバッファの状態に関係なくエラー
    assert_eq!(range_from_js(-1.0, None), Err(StreamError::NegativeLength(-1)));
    assert_eq!(
        range_from_js(4.0, Some(1.0)),
        Err(StreamError::MaxLessThanMin { min: 4, max: 1 })
    );
    assert_eq!(ReadRange::from_signed(4, Some(1)), range_from_js(4.0, Some(1.0)));
}

/// 統計 JSON のフィールド
#[test]
fn test_stats_json_fields() {
    let (_, bs) = run_pipeline(&[&b"xy"[..]], &[4]);
    let json: serde_json::Value = serde_json::from_str(&stats_json(&bs).unwrap()).unwrap();

    assert_eq!(json["buffered_bytes"], 0);
    assert_eq!(json["chunk_count"], 0);
    assert_eq!(json["total_written_bytes"], 4);
    assert_eq!(json["total_read_bytes"], 4);
    assert_eq!(json["write_count"], 1);
    assert_eq!(json["read_count"], 2);
}
