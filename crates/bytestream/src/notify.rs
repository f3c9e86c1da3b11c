//! 書き込み通知（バッファ長の変化をリスナーに伝える）
//!
//! 通知は `write()` の後にだけ発火する。`read()` では発火しない。
//! 生産者の活動を、データ待ちの消費者に知らせるための仕組み。

use alloc::boxed::Box;
use alloc::vec::Vec;

/// 通知を受け取るコールバック。引数は書き込み後のバッファ総バイト数
pub type LengthListener = Box<dyn FnMut(usize)>;

/// 登録したリスナーの識別子（`remove_listener()` に渡す）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// 生の番号
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// 登録順に並んだリスナー列
#[derive(Default)]
pub(crate) struct Listeners {
    /// 次に払い出す ID（1 始まり）
    next_id: u64,
    entries: Vec<(ListenerId, LengthListener)>,
}

impl Listeners {
    pub(crate) fn add(&mut self, listener: LengthListener) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// 登録順にすべてのリスナーを呼ぶ
    pub(crate) fn emit(&mut self, total_length: usize) {
        for (_, listener) in self.entries.iter_mut() {
            listener(total_length);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
