//! バイトストリーム本体

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use bytes::Bytes;
use serde::Serialize;

use crate::error::StreamError;
use crate::notify::{LengthListener, Listeners, ListenerId};
use crate::range::ReadRange;

/// FIFO バイトストリーム
///
/// 任意長のチャンクを書き込み、`min..=max` バイトの連続ブロックとして読み出す。
/// 書き込んだチャンクはコピーせずそのまま保持し、読み出し時に一つの `Vec<u8>`
/// へ組み立てる。読み取り境界がチャンクの途中に落ちた場合は、そのチャンクを
/// 分割して残りを先頭に戻す。
///
/// ## 不変条件
/// - `backlog` の各チャンク長の合計 == `length`
/// - `backlog` に長さ 0 のチャンクは存在しない
///
/// ## スレッド安全性
/// 内部で同期は一切しない。単一スレッドからの利用を前提とする。
pub struct ByteStream {
    /// 未読チャンク列（先頭が最も古い）
    backlog: VecDeque<Bytes>,
    /// バッファ中の総バイト数
    length: usize,
    /// 書き込み通知のリスナー
    listeners: Listeners,
    /// 書き込まれた総バイト数（統計用）
    total_written: u64,
    /// 読み出された総バイト数（統計用）
    total_read: u64,
    /// write() の呼び出し回数（統計用）
    write_count: u64,
    /// データを返した read の回数（統計用）
    read_count: u64,
}

/// ストリームの統計情報
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreamStats {
    /// 現在バッファ中のバイト数
    pub buffered_bytes: usize,
    /// 現在保持しているチャンク数
    pub chunk_count: usize,
    /// これまでに書き込まれた総バイト数
    pub total_written_bytes: u64,
    /// これまでに読み出された総バイト数
    pub total_read_bytes: u64,
    /// write() の呼び出し回数（空チャンクを含む）
    pub write_count: u64,
    /// データを返した読み取りの回数（`None` は数えない）
    pub read_count: u64,
}

impl ByteStream {
    /// 空の ByteStream を生成する
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// チャンク `chunks` 個分の領域を確保した ByteStream を生成する
    ///
    /// 容量はあくまで初期確保量で、上限ではない。
    pub fn with_capacity(chunks: usize) -> Self {
        ByteStream {
            backlog: VecDeque::with_capacity(chunks),
            length: 0,
            listeners: Listeners::default(),
            total_written: 0,
            total_read: 0,
            write_count: 0,
            read_count: 0,
        }
    }

    /// チャンクを末尾に積む
    ///
    /// チャンクの所有権はバッファに移る（`Vec<u8>` や `Bytes` ならコピーは発生しない）。
    /// 空のチャンクは積まないが、通知は必ず発火する。
    ///
    /// # 戻り値
    /// 書き込み後のバッファ総バイト数
    pub fn write(&mut self, chunk: impl Into<Bytes>) -> usize {
        let chunk = chunk.into();
        let n = chunk.len();
        if n != 0 {
            self.backlog.push_back(chunk);
            self.length += n;
            self.total_written += n as u64;
        }
        self.write_count += 1;
        log::trace!(
            "write: {} bytes, buffered {} in {} chunks",
            n,
            self.length,
            self.backlog.len()
        );

        self.listeners.emit(self.length);
        self.length
    }

    /// `min..=max` バイトを読み出す
    ///
    /// # 戻り値
    /// - `Ok(Some(block))`: `min(max, total_length())` バイトの連続ブロック
    /// - `Ok(None)`: データ不足（`total_length() < min`）またはバッファが空。何も消費しない
    ///
    /// # エラー
    /// - `max < min` の場合 `StreamError::MaxLessThanMin`（バッファの状態に関係なく）
    pub fn read(&mut self, min: usize, max: usize) -> Result<Option<Vec<u8>>, StreamError> {
        let range = ReadRange::new(min, max)?;
        Ok(self.read_range(range))
    }

    /// ちょうど `len` バイトを読み出す。足りなければ `None`
    pub fn read_exact(&mut self, len: usize) -> Option<Vec<u8>> {
        self.read_range(ReadRange::exact(len))
    }

    /// 検証済みの範囲で読み出す
    ///
    /// 空のバッファは `min == 0` でも `None` を返す。
    /// 空でなければ `min == 0` で長さ 0 のブロックが返ることがある。
    pub fn read_range(&mut self, range: ReadRange) -> Option<Vec<u8>> {
        if self.length < range.min() || self.length == 0 {
            return None;
        }

        let want = range.max().min(self.length);
        let mut block = Vec::with_capacity(want);

        while block.len() < want {
            let needed = want - block.len();
            let Some(front) = self.backlog.front_mut() else {
                break;
            };
            if front.len() <= needed {
                // チャンクを丸ごと消費
                block.extend_from_slice(&front[..]);
                self.backlog.pop_front();
            } else {
                // 必要な分だけ切り出し、残りは先頭に残す
                let head = front.split_to(needed);
                block.extend_from_slice(&head);
            }
        }
        debug_assert_eq!(block.len(), want, "backlog shorter than tracked length");

        self.length -= block.len();
        self.total_read += block.len() as u64;
        self.read_count += 1;
        log::trace!(
            "read: {} bytes, buffered {} in {} chunks",
            block.len(),
            self.length,
            self.backlog.len()
        );

        Some(block)
    }

    /// 書き込み通知のリスナーを登録する
    ///
    /// `write()` のたびに、書き込み後の総バイト数を引数に呼ばれる。
    pub fn on_length_changed<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(usize) + 'static,
    {
        let listener: LengthListener = alloc::boxed::Box::new(listener);
        let id = self.listeners.add(listener);
        log::debug!("listener {} registered ({} total)", id.raw(), self.listeners.len());
        id
    }

    /// リスナーを解除する。登録されていなければ `false`
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let removed = self.listeners.remove(id);
        if removed {
            log::debug!("listener {} removed ({} left)", id.raw(), self.listeners.len());
        }
        removed
    }

    /// 保持しているチャンク数（診断用）
    pub fn chunk_count(&self) -> usize {
        self.backlog.len()
    }

    /// バッファ中の総バイト数
    pub fn total_length(&self) -> usize {
        self.length
    }

    /// バッファが空か
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// 統計情報のスナップショット
    pub fn stats(&self) -> StreamStats {
        StreamStats {
            buffered_bytes: self.length,
            chunk_count: self.backlog.len(),
            total_written_bytes: self.total_written,
            total_read_bytes: self.total_read,
            write_count: self.write_count,
            read_count: self.read_count,
        }
    }
}

impl Default for ByteStream {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for ByteStream {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ByteStream")
            .field("length", &self.length)
            .field("chunks", &self.backlog.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
