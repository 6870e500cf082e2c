//! ### English
//! Paint-coalescing frame pump.
//!
//! Bridges the player's "new frame" push notification to a surface that tolerates a single
//! outstanding swap. Notifications arriving while a present is in flight collapse into one
//! pending-repaint flag (latest-wins); the completion of the in-flight present starts exactly one
//! follow-up present when that flag is set.
//!
//! All methods run on the host main thread. The lock is held only for flag updates, never across
//! draw or swap.
//!
//! ### 中文
//! 合并重绘的帧泵。
//!
//! 把播放器的 “新帧” 推送通知桥接到只允许一个在途 swap 的表面。present 在途期间到达的通知会被合并为
//! 一个 pending-repaint 标记（只保留最新）；在途 present 完成时，若该标记被设置，则恰好再启动一次 present。
//!
//! 所有方法都在宿主主线程执行；锁只在更新标记时持有，绝不跨越 draw 或 swap。
mod state;

#[cfg(test)]
mod tests;

use std::sync::{Arc, Mutex};

use dpi::PhysicalSize;

pub use state::PresentationState;

use super::dispatch::MainThreadQueue;
use super::error::{PresentError, ResizeError, SurfaceError};
use super::surface::{DrawTarget, FlipConvention, FrameRenderer, PresentSurface, SwapCompletion};

/// ### English
/// Outcome of one presentation attempt.
///
/// ### 中文
/// 单次呈现尝试的结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRequest {
    /// ### English
    /// Surface not sized yet (or pump torn down); nothing happened.
    ///
    /// ### 中文
    /// surface 尚未设置尺寸（或 pump 已销毁）；未做任何事。
    NotReady,
    /// ### English
    /// A present was already in flight; a repaint is now pending.
    ///
    /// ### 中文
    /// 已有 present 在途；现已标记待重绘。
    Coalesced,
    /// ### English
    /// A new present was drawn and submitted.
    ///
    /// ### 中文
    /// 已绘制并提交一次新的 present。
    Presented,
}

/// ### English
/// Drives presentation for one surface: at most one present in flight, later frame notifications
/// folded into a single pending repaint.
///
/// #### Type Parameters
/// - `S`: Host drawable receiving resizes and swaps.
/// - `R`: Draws the player's current frame before each swap.
///
/// ### 中文
/// 驱动单个 surface 的呈现：最多一个在途 present，之后的新帧通知合并为一次待重绘。
///
/// #### 类型参数
/// - `S`：接收 resize 与 swap 的宿主可绘制表面。
/// - `R`：每次 swap 前绘制播放器当前帧。
pub struct FramePump<S, R> {
    state: Mutex<PresentationState>,
    /// ### English
    /// Last successfully applied surface size.
    ///
    /// ### 中文
    /// 最近一次成功应用的 surface 尺寸。
    size: PhysicalSize<u32>,
    flip: FlipConvention,
    surface: S,
    renderer: R,
    /// ### English
    /// Queue that swap completions are posted back to.
    ///
    /// ### 中文
    /// swap 完成回投的目标队列。
    queue: Arc<MainThreadQueue>,
    /// ### English
    /// Token of the outstanding present, if any.
    ///
    /// ### 中文
    /// 在途 present 的 token（若有）。
    in_flight: Option<u64>,
    next_token: u64,
}

impl<S, R> FramePump<S, R>
where
    S: PresentSurface,
    R: FrameRenderer,
{
    /// ### English
    /// Creates an idle pump. Nothing is presented until the first successful resize.
    ///
    /// #### Parameters
    /// - `surface`: Host drawable.
    /// - `renderer`: Draws the player's current frame.
    /// - `queue`: Main-thread queue receiving swap completions.
    /// - `flip`: Row order passed to the renderer.
    ///
    /// ### 中文
    /// 创建一个空闲 pump；首次成功 resize 之前不会呈现任何内容。
    ///
    /// #### 参数
    /// - `surface`：宿主可绘制表面。
    /// - `renderer`：绘制播放器当前帧。
    /// - `queue`：接收 swap 完成的主线程队列。
    /// - `flip`：传给渲染器的行序。
    pub fn new(surface: S, renderer: R, queue: Arc<MainThreadQueue>, flip: FlipConvention) -> Self {
        Self {
            state: Mutex::new(PresentationState::default()),
            size: PhysicalSize::new(0, 0),
            flip,
            surface,
            renderer,
            queue,
            in_flight: None,
            next_token: 1,
        }
    }

    /// ### English
    /// Applies a new surface size and attempts one present at that size.
    ///
    /// A zero dimension or a backend refusal fails with `ResizeError::Surface` and leaves both the
    /// stored size and `surface_ready` untouched. The present follows the usual coalescing rule: if
    /// one is already in flight, a repaint is marked pending instead.
    ///
    /// If the resize succeeds but the follow-up present cannot be submitted, `ResizeError::Present`
    /// is returned; the new size is kept and the surface stays ready.
    ///
    /// ### 中文
    /// 应用新的 surface 尺寸，并以该尺寸尝试一次 present。
    ///
    /// 宽或高为 0、或后端拒绝时返回 `ResizeError::Surface`，已保存的尺寸与 `surface_ready` 均保持不变。
    /// present 遵循常规合并规则：若已有在途 present，则改为标记待重绘。
    ///
    /// 若 resize 成功但随后的 present 提交失败，则返回 `ResizeError::Present`；新尺寸保留，
    /// surface 仍保持就绪。
    pub fn on_surface_resized(
        &mut self,
        size: PhysicalSize<u32>,
    ) -> Result<FrameRequest, ResizeError> {
        if size.width == 0 || size.height == 0 {
            return Err(SurfaceError::InvalidSize {
                width: size.width,
                height: size.height,
            }
            .into());
        }
        if state::lock(&self.state).destroyed {
            return Ok(FrameRequest::NotReady);
        }

        self.surface.resize_surface(size)?;
        self.size = size;
        state::lock(&self.state).surface_ready = true;

        Ok(self.request_frame()?)
    }

    /// ### English
    /// Handles one frame-ready notification (already marshalled onto the main thread).
    ///
    /// ### 中文
    /// 处理一次新帧通知（已被调度到主线程）。
    pub fn request_frame(&mut self) -> Result<FrameRequest, PresentError> {
        {
            let mut state = state::lock(&self.state);
            if !state.surface_ready || state.destroyed {
                return Ok(FrameRequest::NotReady);
            }
            if state.painting {
                state.pending_repaint = true;
                return Ok(FrameRequest::Coalesced);
            }
            state.painting = true;
            state.pending_repaint = false;
        }

        self.present()
    }

    /// ### English
    /// Handles the completion of the present identified by `token`.
    ///
    /// Clears `painting`; if a repaint was pending, immediately starts a new present and returns
    /// its outcome. Completions after teardown, or whose token does not match the in-flight
    /// present, are ignored.
    ///
    /// ### 中文
    /// 处理由 `token` 标识的 present 的完成。
    ///
    /// 清除 `painting`；若有待重绘，则立即开始新的 present 并返回其结果。
    /// 销毁之后的完成、或 token 与在途 present 不匹配的完成都会被忽略。
    pub fn on_present_complete(&mut self, token: u64) -> Result<Option<FrameRequest>, PresentError> {
        let repaint = {
            let mut state = state::lock(&self.state);
            if state.destroyed {
                return Ok(None);
            }
            if self.in_flight != Some(token) {
                log::warn!(
                    "ignoring completion for present {token} (in flight: {:?})",
                    self.in_flight
                );
                return Ok(None);
            }
            self.in_flight = None;
            state.painting = false;
            std::mem::take(&mut state.pending_repaint)
        };

        if repaint {
            self.request_frame().map(Some)
        } else {
            Ok(None)
        }
    }

    /// ### English
    /// Tears the pump down. Idempotent; every later call is a no-op.
    ///
    /// ### 中文
    /// 销毁 pump；可重复调用，之后的所有调用均为空操作。
    pub fn teardown(&mut self) {
        let mut state = state::lock(&self.state);
        if state.destroyed {
            return;
        }
        *state = PresentationState {
            destroyed: true,
            ..PresentationState::default()
        };
        self.in_flight = None;
    }

    /// ### English
    /// Returns a copy of the presentation flags.
    ///
    /// ### 中文
    /// 返回呈现标记的副本。
    pub fn snapshot(&self) -> PresentationState {
        *state::lock(&self.state)
    }

    /// ### English
    /// Token of the outstanding present, if any.
    ///
    /// ### 中文
    /// 在途 present 的 token（若有）。
    pub fn in_flight(&self) -> Option<u64> {
        self.in_flight
    }

    /// ### English
    /// Last successfully applied surface size (`0 x 0` before the first resize).
    ///
    /// ### 中文
    /// 最近一次成功应用的 surface 尺寸（首次 resize 之前为 `0 x 0`）。
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// ### English
    /// The host drawable.
    ///
    /// ### 中文
    /// 宿主可绘制表面。
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// ### English
    /// Mutable access to the host drawable, e.g. to hand it a swap completion.
    ///
    /// ### 中文
    /// 宿主可绘制表面的可变引用，例如用于交回 swap 完成。
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// ### English
    /// The frame renderer.
    ///
    /// ### 中文
    /// 帧渲染器。
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    fn present(&mut self) -> Result<FrameRequest, PresentError> {
        let token = self.next_token;
        self.next_token = self.next_token.wrapping_add(1);
        self.in_flight = Some(token);

        self.renderer
            .draw_current_frame(DrawTarget::new(self.size, self.flip));
        let completion = SwapCompletion::new(self.queue.clone(), token);
        match self.surface.swap_buffers(completion) {
            Ok(()) => Ok(FrameRequest::Presented),
            Err(err) => {
                log::error!("swap submission failed for present {token}: {err}");
                self.in_flight = None;
                let mut state = state::lock(&self.state);
                state.painting = false;
                state.pending_repaint = false;
                Err(PresentError(err))
            }
        }
    }
}
