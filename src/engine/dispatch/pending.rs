//! ### English
//! Work waiting for the host main thread, and the latch that keeps wakes to one per drain.
//!
//! ### 中文
//! 等待宿主主线程处理的工作，以及保证每轮 drain 只唤醒一次的闩锁。
use std::ops::BitOr;
use std::sync::atomic::{AtomicU8, Ordering};

/// ### English
/// Set while a wake has been requested and the drain that answers it has not finished.
///
/// ### 中文
/// 已请求唤醒、且对应的 drain 尚未结束时置位。
const WAKE_LATCH: u8 = 0x80;

/// ### English
/// Kinds of main-thread work, combinable with `|`.
///
/// ### 中文
/// 主线程工作的种类，可用 `|` 组合。
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(super) struct Work(u8);

impl Work {
    pub(super) const FRAME: Self = Self(0b001);
    pub(super) const EVENTS: Self = Self(0b010);
    pub(super) const COMPLETION: Self = Self(0b100);

    pub(super) fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Work {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// ### English
/// Lock-free set of posted [`Work`] shared by the notifying threads and the draining one.
///
/// Posting raises the wake latch together with the work. Only the post that raises it asks for a
/// wake; the latch stays up through the whole drain and is dropped by [`Self::release`] once a
/// pass finds nothing new.
///
/// ### 中文
/// 由通知线程与 drain 线程共享的、已投递 [`Work`] 的无锁集合。
///
/// 投递工作时会同时拉起唤醒闩锁；只有拉起闩锁的那次投递会请求唤醒。闩锁在整个 drain 期间保持，
/// 直到某一轮没有发现新工作时由 [`Self::release`] 放下。
#[derive(Default)]
pub(super) struct PendingWork {
    state: AtomicU8,
}

impl PendingWork {
    /// ### English
    /// Records `work`. Returns `true` when the caller must wake the host.
    ///
    /// ### 中文
    /// 记录 `work`；调用方需要唤醒宿主时返回 `true`。
    pub(super) fn post(&self, work: Work) -> bool {
        let before = self.state.fetch_or(work.0 | WAKE_LATCH, Ordering::AcqRel);
        before & WAKE_LATCH == 0
    }

    /// ### English
    /// Removes and returns everything posted so far. The latch stays raised.
    ///
    /// ### 中文
    /// 取走并返回目前投递的全部工作；闩锁保持拉起。
    pub(super) fn take(&self) -> Work {
        Work(self.state.swap(WAKE_LATCH, Ordering::AcqRel) & !WAKE_LATCH)
    }

    /// ### English
    /// Drops the latch unless work was posted after the last [`Self::take`]. Returns whether the
    /// drain may stop.
    ///
    /// ### 中文
    /// 若上次 [`Self::take`] 之后没有新投递，则放下闩锁；返回 drain 是否可以结束。
    pub(super) fn release(&self) -> bool {
        self.state
            .compare_exchange(WAKE_LATCH, 0, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}
