//! バイトストリームのエラー型

/// 読み取り範囲の指定ミス（呼び出し側のバグ）
///
/// データ不足はエラーではなく `None` で表す。ここに来るのは
/// バッファの状態に関係なく常に不正な引数だけ。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StreamError {
    /// 最大長が最小長より小さい
    #[error("Maximum is less than minimum (min: {min}, max: {max})")]
    MaxLessThanMin {
        /// 指定された最小長
        min: usize,
        /// 指定された最大長
        max: usize,
    },
    /// 負の長さを読み取ろうとした
    #[error("Attempted to read negative amount of data ({0})")]
    NegativeLength(i64),
}
