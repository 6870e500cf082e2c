//! ### English
//! Host-side implementations of the engine seams, backed by `BoramHostCallbacks`.
//!
//! ### 中文
//! 基于 `BoramHostCallbacks` 的宿主侧接口实现。
use std::collections::HashMap;
use std::ffi::{CString, c_void};
use std::num::NonZeroU32;

use dpi::PhysicalSize;
use glow::HasContext as _;

use crate::engine::{
    DrawTarget, FrameRenderer, HostMessage, MessageSink, PresentSurface, SurfaceError,
    SwapCompletion, Waker,
};

use super::{BoramCallback, BoramHostCallbacks, BoramPlayerApi};

/// ### English
/// Swap chain owned by the host.
///
/// Submitted swaps are parked here until the host reports them via `boram_plugin_swap_complete`.
///
/// ### 中文
/// 宿主持有的 swap chain。
///
/// 已提交的 swap 暂存在这里，直到宿主通过 `boram_plugin_swap_complete` 报告完成。
pub struct HostSurface {
    callbacks: BoramHostCallbacks,
    pending: HashMap<u64, SwapCompletion>,
}

impl HostSurface {
    pub(super) fn new(callbacks: BoramHostCallbacks) -> Self {
        Self {
            callbacks,
            pending: HashMap::new(),
        }
    }

    /// ### English
    /// Completes the parked swap for `token`. Returns `false` for unknown tokens.
    ///
    /// ### 中文
    /// 完成 `token` 对应的暂存 swap；未知 token 返回 `false`。
    pub fn complete(&mut self, token: u64) -> bool {
        match self.pending.remove(&token) {
            Some(completion) => {
                completion.complete();
                true
            }
            None => false,
        }
    }
}

impl PresentSurface for HostSurface {
    fn resize_surface(&mut self, size: PhysicalSize<u32>) -> Result<(), SurfaceError> {
        let invalid = SurfaceError::InvalidSize {
            width: size.width,
            height: size.height,
        };
        let (Ok(width), Ok(height)) = (i32::try_from(size.width), i32::try_from(size.height))
        else {
            return Err(invalid);
        };
        let Some(resize_buffers) = self.callbacks.resize_buffers else {
            return Err(SurfaceError::ResizeFailed(-1));
        };
        let code = unsafe { resize_buffers(self.callbacks.user_data, width, height) };
        if code < 0 {
            return Err(SurfaceError::ResizeFailed(code));
        }
        Ok(())
    }

    fn swap_buffers(&mut self, completion: SwapCompletion) -> Result<(), SurfaceError> {
        let Some(swap_buffers) = self.callbacks.swap_buffers else {
            return Err(SurfaceError::SwapFailed(-1));
        };
        let token = completion.token();
        let code = unsafe { swap_buffers(self.callbacks.user_data, token) };
        if code < 0 {
            return Err(SurfaceError::SwapFailed(code));
        }
        self.pending.insert(token, completion);
        Ok(())
    }
}

/// ### English
/// Binds the default framebuffer and asks the engine to draw into it.
///
/// ### 中文
/// 绑定默认帧缓冲，并让引擎绘制到其中。
pub struct HostRenderer {
    gl: glow::Context,
    api: BoramPlayerApi,
}

impl HostRenderer {
    pub(super) fn new(gl: glow::Context, api: BoramPlayerApi) -> Self {
        Self { gl, api }
    }
}

impl FrameRenderer for HostRenderer {
    fn draw_current_frame(&mut self, target: DrawTarget) {
        let viewport = target.viewport();
        unsafe {
            self.gl.bind_framebuffer(
                glow::FRAMEBUFFER,
                NonZeroU32::new(target.fbo).map(glow::NativeFramebuffer),
            );
            self.gl.viewport(
                0,
                0,
                i32::try_from(viewport.width).unwrap_or(i32::MAX),
                i32::try_from(viewport.height).unwrap_or(i32::MAX),
            );
        }

        let fbo = i32::try_from(target.fbo).unwrap_or_default();
        let code = self.api.draw(fbo, target.width, target.height);
        if code < 0 {
            log::warn!("player draw failed (code {code})");
        }
    }
}

/// ### English
/// Posts messages to the page through `post_message`.
///
/// ### 中文
/// 通过 `post_message` 向页面投递消息。
pub struct HostSink {
    callbacks: BoramHostCallbacks,
}

impl HostSink {
    pub(super) fn new(callbacks: BoramHostCallbacks) -> Self {
        Self { callbacks }
    }
}

impl MessageSink for HostSink {
    fn post_message(&mut self, message: HostMessage) {
        let Some(post_message) = self.callbacks.post_message else {
            return;
        };
        let Ok(json) = CString::new(message.to_json()) else {
            log::warn!("dropping `{}` message containing NUL", message.kind);
            return;
        };
        unsafe { post_message(self.callbacks.user_data, json.as_ptr()) };
    }
}

/// ### English
/// Host `wake` callback, callable from any thread.
///
/// ### 中文
/// 宿主 `wake` 回调，可在任意线程调用。
pub struct HostWaker {
    wake: BoramCallback,
    user_data: *mut c_void,
}

// The host guarantees `wake` is thread-safe for its `user_data`.
unsafe impl Send for HostWaker {}
unsafe impl Sync for HostWaker {}

impl HostWaker {
    pub(super) fn new(wake: BoramCallback, user_data: *mut c_void) -> Self {
        Self { wake, user_data }
    }
}

impl Waker for HostWaker {
    fn wake(&self) {
        unsafe { (self.wake)(self.user_data) };
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use serde_json::json;

    use super::*;
    use crate::engine::{FlipConvention, MainThreadQueue, Task};
    use crate::ffi::fakes::{GL_CALLS, HostRecorder, PlayerRecorder};

    #[test]
    fn swaps_are_parked_until_completed() {
        let host = HostRecorder::default();
        let queue = MainThreadQueue::new(Box::new(|| {}));
        let mut surface = HostSurface::new(host.callbacks());

        surface.resize_surface(PhysicalSize::new(64, 32)).unwrap();
        surface
            .swap_buffers(SwapCompletion::new(queue.clone(), 5))
            .unwrap();
        assert_eq!(*host.resizes.borrow(), vec![(64, 32)]);
        assert_eq!(*host.swaps.borrow(), vec![5]);

        assert!(!surface.complete(4));
        assert!(surface.complete(5));
        assert!(!surface.complete(5));

        let mut tasks = Vec::new();
        queue.drain(|task| tasks.push(task));
        assert_eq!(tasks, vec![Task::PresentComplete(5)]);
    }

    #[test]
    fn refused_swap_is_not_parked() {
        let host = HostRecorder {
            swap_code: -3,
            resize_code: -9,
            ..HostRecorder::default()
        };
        let queue = MainThreadQueue::new(Box::new(|| {}));
        let mut surface = HostSurface::new(host.callbacks());

        assert_eq!(
            surface.resize_surface(PhysicalSize::new(64, 32)),
            Err(SurfaceError::ResizeFailed(-9))
        );
        assert_eq!(
            surface.resize_surface(PhysicalSize::new(u32::MAX, 32)),
            Err(SurfaceError::InvalidSize {
                width: u32::MAX,
                height: 32
            })
        );
        assert_eq!(*host.resizes.borrow(), vec![(64, 32)]);

        assert_eq!(
            surface.swap_buffers(SwapCompletion::new(queue, 1)),
            Err(SurfaceError::SwapFailed(-3))
        );
        assert!(!surface.complete(1));
    }

    #[test]
    fn renderer_binds_viewport_then_draws() {
        let host = HostRecorder::default();
        let player = PlayerRecorder::default();
        let callbacks = host.callbacks();
        let get_proc_address = callbacks.get_proc_address.unwrap();
        let gl = unsafe {
            glow::Context::from_loader_function(|name| {
                let name = CString::new(name).unwrap();
                get_proc_address(callbacks.user_data, name.as_ptr())
            })
        };
        let mut renderer = HostRenderer::new(gl, player.api());

        GL_CALLS.with_borrow_mut(Vec::clear);
        renderer.draw_current_frame(DrawTarget::new(
            PhysicalSize::new(320, 240),
            FlipConvention::BottomUp,
        ));
        assert_eq!(
            GL_CALLS.with_borrow(Clone::clone),
            vec!["bind 0x8d40 0", "viewport 0 0 320 240"]
        );
        assert_eq!(*player.calls.borrow(), vec!["draw 0 320 240"]);
    }

    #[test]
    fn sink_posts_json_and_skips_missing_callback() {
        let host = HostRecorder::default();
        let mut sink = HostSink::new(host.callbacks());
        sink.post_message(HostMessage {
            kind: "volume".into(),
            data: json!(80.0),
        });
        assert_eq!(
            *host.messages.borrow(),
            vec![r#"{"type":"volume","data":80.0}"#]
        );

        let mut callbacks = host.callbacks();
        callbacks.post_message = None;
        HostSink::new(callbacks).post_message(HostMessage {
            kind: "pause".into(),
            data: json!(true),
        });
        assert_eq!(host.messages.borrow().len(), 1);
    }

    #[test]
    fn waker_calls_host_wake() {
        let host = HostRecorder::default();
        let callbacks = host.callbacks();
        let waker = HostWaker::new(callbacks.wake.unwrap(), callbacks.user_data);
        waker.wake();
        waker.wake();
        assert_eq!(host.wakes.load(Ordering::SeqCst), 2);
    }
}
