//! ### English
//! C ABI surface for `boram_plugin`.
//!
//! The plugin host owns the GL context, the swap chain and the page messaging channel; it hands
//! them over as a table of callbacks (`BoramHostCallbacks`). The playback engine is handed over as
//! a second table (`BoramPlayerApi`) mirroring the engine's client API.
//!
//! Every `boram_plugin_*` function except `boram_plugin_abi_version` must be called on the host
//! main thread with the plugin's GL context current. Strings are NUL-terminated UTF-8.
//!
//! ### 中文
//! `boram_plugin` 的 C ABI 接口层。
//!
//! 插件宿主持有 GL 上下文、swap chain 与页面消息通道，以回调表（`BoramHostCallbacks`）的形式交给插件；
//! 播放引擎以第二张表（`BoramPlayerApi`）交给插件，其形状对应引擎的客户端 API。
//!
//! 除 `boram_plugin_abi_version` 外，所有 `boram_plugin_*` 函数都必须在宿主主线程、
//! 且插件 GL 上下文为 current 时调用。字符串均为以 NUL 结尾的 UTF-8。
mod abi;
#[cfg(test)]
mod fakes;
mod host;
mod player;
mod plugin;

use std::ffi::{CStr, c_char, c_void};

use crate::engine::PluginInstance;

pub use host::{HostRenderer, HostSink, HostSurface, HostWaker};
pub use player::FfiPlayer;

/// ### English
/// Callback without arguments beyond its context pointer.
///
/// ### 中文
/// 除上下文指针外无参数的回调。
pub type BoramCallback = unsafe extern "C" fn(ctx: *mut c_void);

/// ### English
/// GL function lookup handed to the engine's GL renderer.
///
/// ### 中文
/// 交给引擎 GL 渲染器的 GL 函数查找回调。
pub type BoramGetProcAddress =
    unsafe extern "C" fn(ctx: *mut c_void, name: *const c_char) -> *mut c_void;

#[repr(C)]
#[derive(Clone, Copy)]
/// ### English
/// Host services. `user_data` is passed back as the first argument of every callback.
///
/// `wake` may be called from any thread; it must schedule `boram_plugin_tick` on the main thread
/// (e.g. via a "call on main thread" API). Every other callback is called on the main thread.
///
/// `swap_buffers` must not complete synchronously: the host calls `boram_plugin_swap_complete`
/// with the same token later, from its main loop.
///
/// ### 中文
/// 宿主服务。`user_data` 会作为每个回调的第一个参数传回。
///
/// `wake` 可能在任意线程调用；它必须安排在主线程执行 `boram_plugin_tick`（例如通过 “call on main
/// thread” API）。其余回调都在主线程调用。
///
/// `swap_buffers` 不能同步完成：宿主应稍后在主循环中以同一 token 调用 `boram_plugin_swap_complete`。
pub struct BoramHostCallbacks {
    pub user_data: *mut c_void,
    pub wake: Option<BoramCallback>,
    /// ### English
    /// Posts one `{"type", "data"}` JSON message to the page.
    ///
    /// ### 中文
    /// 向页面投递一条 `{"type", "data"}` JSON 消息。
    pub post_message: Option<unsafe extern "C" fn(user_data: *mut c_void, json: *const c_char)>,
    /// ### English
    /// Resizes the swap chain. Negative return values are errors.
    ///
    /// ### 中文
    /// 调整 swap chain 尺寸；返回负值表示错误。
    pub resize_buffers:
        Option<unsafe extern "C" fn(user_data: *mut c_void, width: i32, height: i32) -> i32>,
    /// ### English
    /// Submits the back buffer. Negative return values are errors (no completion will follow).
    ///
    /// ### 中文
    /// 提交后缓冲区；返回负值表示错误（之后不会再有完成回调）。
    pub swap_buffers: Option<unsafe extern "C" fn(user_data: *mut c_void, token: u64) -> i32>,
    pub get_proc_address:
        Option<unsafe extern "C" fn(user_data: *mut c_void, name: *const c_char) -> *const c_void>,
    /// ### English
    /// Binds the plugin's GL context to the page element and makes it current. Called once from
    /// `boram_plugin_create` before any GL call. Negative return values are errors.
    ///
    /// ### 中文
    /// 把插件 GL 上下文绑定到页面元素并设为 current；在 `boram_plugin_create` 中、任何 GL 调用之前
    /// 调用一次。返回负值表示错误。
    pub bind_graphics: Option<unsafe extern "C" fn(user_data: *mut c_void) -> i32>,
}

impl BoramHostCallbacks {
    /// ### English
    /// Returns whether every mandatory callback is set (`post_message` is optional).
    ///
    /// ### 中文
    /// 返回所有必需回调是否都已设置（`post_message` 可选）。
    fn is_complete(&self) -> bool {
        self.wake.is_some()
            && self.resize_buffers.is_some()
            && self.swap_buffers.is_some()
            && self.get_proc_address.is_some()
            && self.bind_graphics.is_some()
    }
}

#[repr(C)]
#[derive(Clone, Copy)]
/// ### English
/// Playback engine client API. `handle` is passed back as the first argument of every function.
///
/// Status codes follow the engine convention: negative values are errors. `destroy` is optional;
/// when present the plugin calls it on teardown (it owns the handle from `boram_plugin_create` on).
///
/// ### 中文
/// 播放引擎客户端 API。`handle` 会作为每个函数的第一个参数传回。
///
/// 状态码遵循引擎约定：负值表示错误。`destroy` 可选；若提供，插件会在销毁时调用
/// （自 `boram_plugin_create` 起 handle 归插件所有）。
pub struct BoramPlayerApi {
    pub handle: *mut c_void,
    pub set_option: Option<
        unsafe extern "C" fn(handle: *mut c_void, name: *const c_char, value: *const c_char) -> i32,
    >,
    pub initialize: Option<unsafe extern "C" fn(handle: *mut c_void) -> i32>,
    pub init_gl: Option<
        unsafe extern "C" fn(
            handle: *mut c_void,
            get_proc_address: BoramGetProcAddress,
            ctx: *mut c_void,
        ) -> i32,
    >,
    pub uninit_gl: Option<unsafe extern "C" fn(handle: *mut c_void)>,
    /// ### English
    /// Runs a NULL-terminated argument vector.
    ///
    /// ### 中文
    /// 执行以 NULL 结尾的参数数组。
    pub command: Option<unsafe extern "C" fn(handle: *mut c_void, args: *const *const c_char) -> i32>,
    pub set_property: Option<
        unsafe extern "C" fn(
            handle: *mut c_void,
            name: *const c_char,
            format: i32,
            data: *const c_void,
        ) -> i32,
    >,
    pub observe_property:
        Option<unsafe extern "C" fn(handle: *mut c_void, name: *const c_char, format: i32) -> i32>,
    /// ### English
    /// Pops one event into `event` without blocking; `event_id == 0` means "no event".
    ///
    /// ### 中文
    /// 非阻塞地把一个事件写入 `event`；`event_id == 0` 表示没有事件。
    pub next_event: Option<unsafe extern "C" fn(handle: *mut c_void, event: *mut BoramPlayerEvent)>,
    pub set_wakeup_callback: Option<
        unsafe extern "C" fn(handle: *mut c_void, callback: Option<BoramCallback>, ctx: *mut c_void),
    >,
    pub set_update_callback: Option<
        unsafe extern "C" fn(handle: *mut c_void, callback: Option<BoramCallback>, ctx: *mut c_void),
    >,
    pub draw: Option<unsafe extern "C" fn(handle: *mut c_void, fbo: i32, width: i32, height: i32) -> i32>,
    pub destroy: Option<unsafe extern "C" fn(handle: *mut c_void)>,
}

impl BoramPlayerApi {
    /// ### English
    /// Returns whether every mandatory entry is set.
    ///
    /// ### 中文
    /// 返回所有必需入口是否都已设置。
    fn is_complete(&self) -> bool {
        !self.handle.is_null()
            && self.set_option.is_some()
            && self.initialize.is_some()
            && self.init_gl.is_some()
            && self.command.is_some()
            && self.set_property.is_some()
            && self.observe_property.is_some()
            && self.next_event.is_some()
            && self.set_wakeup_callback.is_some()
            && self.set_update_callback.is_some()
            && self.draw.is_some()
    }

    /// ### English
    /// Draws the engine's current frame into `fbo`. A negative `height` requests top-down rows.
    ///
    /// ### 中文
    /// 把引擎当前帧绘制到 `fbo`；`height` 为负表示自上而下的行序。
    fn draw(&self, fbo: i32, width: i32, height: i32) -> i32 {
        match self.draw {
            Some(draw) => unsafe { draw(self.handle, fbo, width, height) },
            None => -1,
        }
    }
}

#[repr(C)]
/// ### English
/// One engine event. `name`/`data` are owned by the engine and valid until the next `next_event`.
///
/// ### 中文
/// 一个引擎事件。`name`/`data` 由引擎持有，在下一次 `next_event` 之前有效。
pub struct BoramPlayerEvent {
    pub event_id: i32,
    pub name: *const c_char,
    pub format: i32,
    pub data: *const c_void,
}

/// ### English
/// No event pending.
///
/// ### 中文
/// 没有待处理事件。
pub const BORAM_EVENT_NONE: i32 = 0;
/// ### English
/// An observed property changed.
///
/// ### 中文
/// 被观察的属性发生变化。
pub const BORAM_EVENT_PROPERTY_CHANGE: i32 = 22;

/// ### English
/// Opaque plugin instance handle.
///
/// ### 中文
/// 不透明的插件实例句柄。
pub struct BoramPlugin {
    instance: PluginInstance<FfiPlayer, HostSurface, HostRenderer, HostSink>,
}

/// ### English
/// C ABI version for `boram_plugin`.
///
/// ### 中文
/// `boram_plugin` 的 C ABI 版本号。
const BORAM_PLUGIN_ABI_VERSION: u32 = 1;

/// ### English
/// Converts an optional NUL-terminated UTF-8 C string into `&str`.
///
/// Returns `None` for NULL pointers or invalid UTF-8.
///
/// # Safety
/// `ptr` must be NULL or point to a NUL-terminated string valid for `'a`.
///
/// ### 中文
/// 将可选的 NUL 结尾 UTF-8 C 字符串转换为 `&str`。
///
/// 对 NULL 指针或 UTF-8 非法返回 `None`。
///
/// # Safety
/// `ptr` 必须为 NULL，或指向在 `'a` 期间有效、以 NUL 结尾的字符串。
unsafe fn cstr_to_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}
