//! 読み取り範囲 (min, max)

use crate::error::StreamError;

/// 検証済みの読み取り範囲
///
/// `min <= max` が常に成り立つ。`ByteStream::read_range()` はこの型を受け取るため
/// 引数エラーを返さない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReadRange {
    min: usize,
    max: usize,
}

impl ReadRange {
    /// `min..=max` の範囲を作る
    ///
    /// # エラー
    /// - `max < min` の場合 `StreamError::MaxLessThanMin`
    pub fn new(min: usize, max: usize) -> Result<Self, StreamError> {
        if max < min {
            return Err(StreamError::MaxLessThanMin { min, max });
        }
        Ok(ReadRange { min, max })
    }

    /// ちょうど `len` バイトを読む範囲
    pub const fn exact(len: usize) -> Self {
        ReadRange { min: len, max: len }
    }

    /// 符号付きの長さから範囲を作る（JS など符号付き数値を扱う呼び出し側向け）
    ///
    /// `max` を省略すると `min` と同じ値になる。
    ///
    /// # エラー
    /// - `min` または `max` が負の場合 `StreamError::NegativeLength`
    /// - `max < min` の場合 `StreamError::MaxLessThanMin`
    pub fn from_signed(min: i64, max: Option<i64>) -> Result<Self, StreamError> {
        let max = max.unwrap_or(min);
        if min < 0 {
            return Err(StreamError::NegativeLength(min));
        }
        if max < 0 {
            return Err(StreamError::NegativeLength(max));
        }
        // wasm32 では usize が 32 ビット。溢れる長さはどうせ満たせないので飽和させる
        let min = usize::try_from(min).unwrap_or(usize::MAX);
        let max = usize::try_from(max).unwrap_or(usize::MAX);
        Self::new(min, max)
    }

    /// 最小長（これ未満しかバッファにない場合は読み取らない）
    pub fn min(&self) -> usize {
        self.min
    }

    /// 最大長（一度の読み取りで返す上限）
    pub fn max(&self) -> usize {
        self.max
    }
}
