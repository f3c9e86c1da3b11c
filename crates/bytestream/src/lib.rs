//! # bytestream
//!
//! FIFO バイトストリームバッファ
//!
//! 任意長のチャンクを書き込み、呼び出し側が指定した長さの範囲で読み出す。
//! 読み取りは「連続したバイトブロック」か「データ不足（`None`）」のどちらかを返す。
//!
//! ## 内部構造
//!
//! ```text
//! write("potato") write(" ") write("salad")
//!
//! backlog: ["potato"][" "]["salad"]   length = 12
//!
//! read(3)    → "pot"     backlog: ["ato"][" "]["salad"]  ← 先頭チャンクを分割
//! read(2, 5) → "ato s"   backlog: ["alad"]
//! read(5)    → None      （4 バイトしかない。何も消費しない）
//! read(0, 10)→ "alad"    backlog: []
//! ```
//!
//! - 書き込みはチャンクの所有権を受け取るだけでコピーしない
//! - 読み出しは常に新しい `Vec<u8>` を返す（バッファ内部とは共有しない）
//! - 書き込みのたびに、新しい総バイト数をリスナーへ通知する（読み取りでは通知しない）
//!
//! ## 使用例
//!
//! ```
//! use bytestream::ByteStream;
//!
//! let mut bs = ByteStream::new();
//! bs.write("abc ");
//! bs.write("123 ");
//!
//! assert_eq!(bs.read_exact(4).as_deref(), Some(&b"abc "[..]));
//! assert_eq!(bs.read(2, 10).unwrap().as_deref(), Some(&b"123 "[..]));
//! assert_eq!(bs.read_exact(0), None); // 空のバッファは 0 バイト要求でも None
//! ```

#![no_std]
extern crate alloc;

mod error;
mod notify;
mod range;
mod stream;

pub use error::StreamError;
pub use notify::{LengthListener, ListenerId};
pub use range::ReadRange;
pub use stream::{ByteStream, StreamStats};
