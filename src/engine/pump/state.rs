//! ### English
//! Presentation flags guarded by the pump lock.
//!
//! ### 中文
//! 由 pump 锁保护的呈现状态标记。
use std::sync::{Mutex, MutexGuard, PoisonError};

/// ### English
/// Snapshot of the pump's presentation flags.
///
/// Invariants: `pending_repaint` implies `painting`; both are false while `!surface_ready`.
///
/// ### 中文
/// pump 呈现标记的快照。
///
/// 不变量：`pending_repaint` 为真时 `painting` 必为真；`!surface_ready` 时两者都为假。
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PresentationState {
    /// ### English
    /// A present (draw + swap) is outstanding.
    ///
    /// ### 中文
    /// 有一个 present（draw + swap）尚未完成。
    pub painting: bool,
    /// ### English
    /// A frame-ready notification arrived while `painting`.
    ///
    /// ### 中文
    /// 在 `painting` 期间收到了新帧通知。
    pub pending_repaint: bool,
    /// ### English
    /// The surface has been successfully sized at least once.
    ///
    /// ### 中文
    /// surface 至少成功设置过一次尺寸。
    pub surface_ready: bool,
    /// ### English
    /// The pump was torn down; late completions are ignored.
    ///
    /// ### 中文
    /// pump 已销毁；迟到的完成回调会被忽略。
    pub destroyed: bool,
}

/// ### English
/// Locks the state. Poisoning is ignored: every critical section only stores booleans, so the
/// flags are always coherent.
///
/// ### 中文
/// 加锁读取状态。忽略 poison：临界区只写布尔值，标记始终一致。
#[inline]
pub(super) fn lock(state: &Mutex<PresentationState>) -> MutexGuard<'_, PresentationState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
