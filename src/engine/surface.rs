//! ### English
//! Presentation-surface and frame-renderer seams driven by the frame pump.
//!
//! ### 中文
//! 由帧泵驱动的呈现表面与帧渲染器接口。
use std::fmt;
use std::sync::Arc;

use dpi::PhysicalSize;
use serde::{Deserialize, Serialize};

use super::dispatch::MainThreadQueue;
use super::error::SurfaceError;

/// ### English
/// Double-buffered drawable owned by the host. All calls happen on the host main thread.
///
/// ### 中文
/// 宿主持有的双缓冲可绘制表面；所有调用都发生在宿主主线程。
pub trait PresentSurface {
    /// ### English
    /// Resizes the backing buffers.
    ///
    /// ### 中文
    /// 调整后备缓冲区尺寸。
    fn resize_surface(&mut self, size: PhysicalSize<u32>) -> Result<(), SurfaceError>;

    /// ### English
    /// Submits the back buffer. The backend must call `completion.complete()` exactly once when
    /// the swap has been accepted; it may do so from inside this call.
    ///
    /// ### 中文
    /// 提交后缓冲区。后端在 swap 被接受时必须且仅调用一次 `completion.complete()`，
    /// 也可以在本调用内部直接调用。
    fn swap_buffers(&mut self, completion: SwapCompletion) -> Result<(), SurfaceError>;
}

/// ### English
/// Draws the player's current frame into the bound surface.
///
/// ### 中文
/// 把播放器当前帧绘制到已绑定的表面。
pub trait FrameRenderer {
    /// ### English
    /// Draws into `target`. Called on the main thread right before the swap is submitted.
    ///
    /// ### 中文
    /// 绘制到 `target`；在主线程、提交 swap 之前调用。
    fn draw_current_frame(&mut self, target: DrawTarget);
}

/// ### English
/// Row order expected by the renderer.
///
/// ### 中文
/// 渲染器期望的行序。
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlipConvention {
    /// ### English
    /// Top-down rows, signalled to the player by a negative height.
    ///
    /// ### 中文
    /// 自上而下的行序，通过负高度告知播放器。
    #[default]
    TopDown,
    BottomUp,
}

/// ### English
/// Framebuffer and signed dimensions handed to `FrameRenderer::draw_current_frame`.
///
/// ### 中文
/// 传给 `FrameRenderer::draw_current_frame` 的帧缓冲与带符号尺寸。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawTarget {
    /// ### English
    /// Framebuffer object to draw into (`0` is the default framebuffer).
    ///
    /// ### 中文
    /// 绘制目标 FBO（`0` 为默认帧缓冲）。
    pub fbo: u32,
    pub width: i32,
    /// ### English
    /// Negative when the flip convention is `TopDown`.
    ///
    /// ### 中文
    /// 行序为 `TopDown` 时为负值。
    pub height: i32,
}

impl DrawTarget {
    /// ### English
    /// Targets the default framebuffer at `size`. Dimensions above `i32::MAX` are clamped.
    ///
    /// ### 中文
    /// 以 `size` 指向默认帧缓冲；超过 `i32::MAX` 的尺寸会被截断。
    pub fn new(size: PhysicalSize<u32>, flip: FlipConvention) -> Self {
        let width = i32::try_from(size.width).unwrap_or(i32::MAX);
        let height = i32::try_from(size.height).unwrap_or(i32::MAX);
        Self {
            fbo: 0,
            width,
            height: match flip {
                FlipConvention::TopDown => -height,
                FlipConvention::BottomUp => height,
            },
        }
    }

    /// ### English
    /// Unsigned viewport size regardless of the flip convention.
    ///
    /// ### 中文
    /// 与行序无关的无符号视口尺寸。
    pub fn viewport(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.width.unsigned_abs(), self.height.unsigned_abs())
    }
}

/// ### English
/// One-shot completion handle for a submitted swap.
///
/// Completing posts the token back to the owning main-thread queue; after the queue is closed the
/// completion is silently dropped. Dropping without completing leaves the present outstanding.
///
/// ### 中文
/// 已提交 swap 的一次性完成句柄。
///
/// 完成时把 token 投递回所属主线程队列；队列关闭后完成会被静默丢弃。
/// 未完成就 drop 会让该 present 一直处于在途状态。
pub struct SwapCompletion {
    queue: Arc<MainThreadQueue>,
    token: u64,
}

impl SwapCompletion {
    pub(crate) fn new(queue: Arc<MainThreadQueue>, token: u64) -> Self {
        Self { queue, token }
    }

    /// ### English
    /// Token identifying the present this completion belongs to.
    ///
    /// ### 中文
    /// 标识所属 present 的 token。
    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn complete(self) {
        self.queue.post_completion(self.token);
    }
}

impl fmt::Debug for SwapCompletion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwapCompletion")
            .field("token", &self.token)
            .finish()
    }
}
