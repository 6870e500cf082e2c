//! ### English
//! "Post task to owning context" primitive.
//!
//! The player notifies from its own threads; GL and surface handles may only be touched on the
//! host main thread. Everything crosses over through this queue.
//!
//! ### 中文
//! “把任务投递到所属上下文” 的原语。
//!
//! 播放器在其内部线程发出通知；GL 与 surface 句柄只能在宿主主线程访问，一切跨线程工作都经由此队列。
mod pending;
mod queue;

pub use queue::{MainThreadQueue, Notifier, Task, Waker};
