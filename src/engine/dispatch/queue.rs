//! ### English
//! Main-thread task queue: producer threads post, the host drains on its main thread.
//!
//! ### 中文
//! 主线程任务队列：生产者线程投递，宿主在主线程 drain。
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel as channel;

use super::pending::{PendingWork, Work};

/// ### English
/// Host hook asking for a main-thread `tick` (e.g. a "call on main thread" API).
///
/// Called from arbitrary threads, at most once per idle→busy transition.
///
/// ### 中文
/// 请求宿主在主线程执行一次 `tick` 的钩子（例如 “call on main thread” API）。
///
/// 可能在任意线程调用；每次 idle→busy 切换最多调用一次。
pub trait Waker: Send + Sync {
    fn wake(&self);
}

impl<F> Waker for F
where
    F: Fn() + Send + Sync,
{
    fn wake(&self) {
        self()
    }
}

/// ### English
/// One unit of work executed on the host main thread.
///
/// ### 中文
/// 在宿主主线程执行的单个工作单元。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// ### English
    /// The player has a new frame; ask the pump to present.
    ///
    /// ### 中文
    /// 播放器有新帧；请求 pump 呈现。
    FrameReady,
    /// ### English
    /// The player has queued events; drain them.
    ///
    /// ### 中文
    /// 播放器有排队事件；需要 drain。
    PlayerEvents,
    /// ### English
    /// A swap submitted with this token has been accepted by the backend.
    ///
    /// ### 中文
    /// 以该 token 提交的 swap 已被后端接受。
    PresentComplete(u64),
}

/// ### English
/// Queue owned by one plugin instance.
///
/// - Frame-ready and player-event notifications are coalesced into bits (latest-wins).
/// - Completion tokens go through an unbounded channel (each one must be seen once).
/// - Once closed, posts are dropped and `drain` does nothing.
///
/// ### 中文
/// 单个插件实例持有的队列。
///
/// - 新帧与播放器事件通知被合并为位标记（只保留最新）。
/// - swap 完成 token 走无界 channel（每个都必须被处理一次）。
/// - 关闭后所有投递被丢弃，`drain` 不再执行任何工作。
pub struct MainThreadQueue {
    pending: PendingWork,
    completions_tx: channel::Sender<u64>,
    completions_rx: channel::Receiver<u64>,
    closed: AtomicBool,
    waker: Box<dyn Waker>,
}

impl MainThreadQueue {
    /// ### English
    /// Creates an open queue that calls `waker` when work becomes pending.
    ///
    /// ### 中文
    /// 创建一个处于 open 状态的队列；有工作待处理时调用 `waker`。
    pub fn new(waker: Box<dyn Waker>) -> Arc<Self> {
        let (completions_tx, completions_rx) = channel::unbounded();
        Arc::new(Self {
            pending: PendingWork::default(),
            completions_tx,
            completions_rx,
            closed: AtomicBool::new(false),
            waker,
        })
    }

    /// ### English
    /// Returns a cloneable handle for producer threads.
    ///
    /// ### 中文
    /// 返回可供生产者线程克隆使用的句柄。
    pub fn notifier(self: &Arc<Self>) -> Notifier {
        Notifier {
            queue: self.clone(),
        }
    }

    fn post(&self, work: Work) {
        if self.closed.load(Ordering::Acquire) {
            return;
        }
        if self.pending.post(work) {
            self.waker.wake();
        }
    }

    pub(crate) fn post_completion(&self, token: u64) {
        if self.closed.load(Ordering::Acquire) {
            return;
        }
        let _ = self.completions_tx.send(token);
        self.post(Work::COMPLETION);
    }

    /// ### English
    /// Runs every pending task on the calling (main) thread.
    ///
    /// Loops until no work is left; work posted while draining (including from inside `run`) is
    /// picked up by the same call. Completions run before a frame request of the same batch so the
    /// pump sees the in-flight present finish first.
    ///
    /// #### Parameters
    /// - `run`: Task handler.
    ///
    /// ### 中文
    /// 在调用线程（主线程）执行所有待处理任务。
    ///
    /// 循环直到没有剩余工作；drain 期间（包括 `run` 内部）投递的工作会在同一次调用中处理。
    /// 同一批次中 swap 完成先于新帧请求执行，使 pump 先看到在途 present 结束。
    ///
    /// #### 参数
    /// - `run`：任务处理函数。
    pub fn drain(&self, mut run: impl FnMut(Task)) {
        loop {
            if self.closed.load(Ordering::Acquire) {
                return;
            }

            let work = self.pending.take();
            let mut ran = false;
            while let Ok(token) = self.completions_rx.try_recv() {
                run(Task::PresentComplete(token));
                ran = true;
            }
            if work.contains(Work::EVENTS) {
                run(Task::PlayerEvents);
                ran = true;
            }
            if work.contains(Work::FRAME) {
                run(Task::FrameReady);
                ran = true;
            }

            if !ran && self.pending.release() {
                return;
            }
        }
    }

    /// ### English
    /// Closes the queue and drops queued completions. Later posts are ignored.
    ///
    /// ### 中文
    /// 关闭队列并丢弃已排队的完成 token；之后的投递全部忽略。
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        while self.completions_rx.try_recv().is_ok() {}
    }

    /// ### English
    /// Returns whether `close` has been called.
    ///
    /// ### 中文
    /// 返回是否已调用 `close`。
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

/// ### English
/// Thread-safe producer handle. Safe to call from the player's internal threads.
///
/// ### 中文
/// 线程安全的生产者句柄；可在播放器内部线程调用。
#[derive(Clone)]
pub struct Notifier {
    queue: Arc<MainThreadQueue>,
}

impl Notifier {
    /// ### English
    /// Signals that a new frame is ready to present.
    ///
    /// ### 中文
    /// 通知有新帧可呈现。
    pub fn frame_ready(&self) {
        self.queue.post(Work::FRAME);
    }

    /// ### English
    /// Signals that the player has events to drain.
    ///
    /// ### 中文
    /// 通知播放器有事件需要 drain。
    pub fn player_wakeup(&self) {
        self.queue.post(Work::EVENTS);
    }
}
