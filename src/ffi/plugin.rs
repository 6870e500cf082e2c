//! ### English
//! C ABI bindings for the plugin instance lifecycle and host events.
//!
//! ### 中文
//! 插件实例生命周期与宿主事件的 C ABI 绑定。
use std::ffi::{CString, c_char, c_void};
use std::ptr;

use dpi::LogicalSize;

use crate::engine::{
    InitError, KeyEvent, PluginConfig, PluginInstance, ResizeError, SurfaceError,
};

use super::{
    BoramHostCallbacks, BoramPlayerApi, BoramPlugin, FfiPlayer, HostRenderer, HostSink,
    HostSurface, HostWaker, cstr_to_str,
};

/// ### English
/// Installs the process-wide logger once. `RUST_LOG` wins over the default filter.
///
/// ### 中文
/// 安装一次进程级 logger；`RUST_LOG` 优先于默认过滤级别。
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let env = env_logger::Env::default().default_filter_or(default_filter);
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// ### English
/// Collects `argc` embed attributes, skipping entries that are NULL or not UTF-8.
///
/// # Safety
/// `argn`/`argv` must be NULL or point to `argc` C strings each.
///
/// ### 中文
/// 收集 `argc` 个 embed 属性，跳过 NULL 或非 UTF-8 的条目。
///
/// # Safety
/// `argn`/`argv` 必须为 NULL，或各自指向 `argc` 个 C 字符串。
unsafe fn collect_attributes<'a>(
    argc: u32,
    argn: *const *const c_char,
    argv: *const *const c_char,
) -> Vec<(&'a str, &'a str)> {
    if argn.is_null() || argv.is_null() {
        return Vec::new();
    }
    (0..argc as usize)
        .filter_map(|index| unsafe {
            let name = cstr_to_str(*argn.add(index))?;
            let value = cstr_to_str(*argv.add(index))?;
            Some((name, value))
        })
        .collect()
}

#[unsafe(no_mangle)]
/// ### English
/// Creates one plugin instance and starts loading its source.
///
/// - `host`: host services; every callback except `post_message` is mandatory. `bind_graphics`
///   is called first, before any GL call.
/// - `player`: engine table; when every mandatory entry is set the plugin takes ownership of
///   `player.handle` (even if creation then fails).
/// - `argn`/`argv`: `argc` embed attribute names/values; `data-boramsrc` is required.
/// - `config_json`: optional JSON overrides (`{"flip": "bottom-up", "extra-options": [..]}`), may
///   be NULL.
///
/// Returns NULL on failure (the reason is logged).
///
/// ### 中文
/// 创建一个插件实例并开始加载其媒体源。
///
/// - `host`：宿主服务；除 `post_message` 外所有回调都必须提供。`bind_graphics` 最先调用，
///   早于任何 GL 调用。
/// - `player`：引擎函数表；当所有必需入口都已设置时，`player.handle` 的所有权转移给插件
///   （即使之后创建失败）。
/// - `argn`/`argv`：`argc` 个 embed 属性名/值；必须包含 `data-boramsrc`。
/// - `config_json`：可选的 JSON 覆盖项（`{"flip": "bottom-up", "extra-options": [..]}`），可为 NULL。
///
/// 失败时返回 NULL（原因会写入日志）。
pub unsafe extern "C" fn boram_plugin_create(
    host: *const BoramHostCallbacks,
    player: *const BoramPlayerApi,
    argc: u32,
    argn: *const *const c_char,
    argv: *const *const c_char,
    config_json: *const c_char,
) -> *mut BoramPlugin {
    if host.is_null() || player.is_null() {
        return ptr::null_mut();
    }
    let callbacks = unsafe { *host };
    let api = unsafe { *player };
    let player = FfiPlayer::new(api);

    let attributes = unsafe { collect_attributes(argc, argn, argv) };
    let config = match unsafe { cstr_to_str(config_json) } {
        Some(json) => PluginConfig::from_json(json),
        None => Ok(PluginConfig::default()),
    }
    .and_then(|config| config.with_attributes(attributes))
    .map(PluginConfig::with_env);
    init_logging(config.as_ref().is_ok_and(|config| config.verbose));

    match config.and_then(|config| unsafe { create(callbacks, api, player, config) }) {
        Ok(plugin) => Box::into_raw(Box::new(plugin)),
        Err(err) => {
            log::error!("unable to create plugin instance: {err}");
            ptr::null_mut()
        }
    }
}

/// ### English
/// Binds the host graphics, checks that GL is reachable and starts the instance.
///
/// # Safety
/// `callbacks` and `api` must hold valid function pointers for their `user_data`/`handle`.
///
/// ### 中文
/// 绑定宿主图形上下文，确认 GL 可用，然后启动实例。
///
/// # Safety
/// `callbacks` 与 `api` 中的函数指针必须对其 `user_data`/`handle` 有效。
unsafe fn create(
    callbacks: BoramHostCallbacks,
    api: BoramPlayerApi,
    player: Option<FfiPlayer>,
    config: PluginConfig,
) -> Result<BoramPlugin, InitError> {
    let player = player.ok_or(InitError::IncompleteTable("player API"))?;
    let (true, Some(wake), Some(get_proc_address), Some(bind_graphics)) = (
        callbacks.is_complete(),
        callbacks.wake,
        callbacks.get_proc_address,
        callbacks.bind_graphics,
    ) else {
        return Err(InitError::IncompleteTable("host callback"));
    };
    let user_data = callbacks.user_data;

    let code = unsafe { bind_graphics(user_data) };
    if code < 0 {
        log::warn!("bind_graphics returned {code}");
        return Err(SurfaceError::BindFailed.into());
    }

    let mut gl_loader = |name: &str| -> *const c_void {
        match CString::new(name) {
            Ok(name) => unsafe { get_proc_address(user_data, name.as_ptr()) },
            Err(_) => ptr::null(),
        }
    };
    if gl_loader("glGetString").is_null() {
        return Err(InitError::Gl("glGetString is unavailable".to_owned()));
    }
    let gl = unsafe { glow::Context::from_loader_function(&mut gl_loader) };

    let instance = PluginInstance::new(
        config,
        player,
        HostSurface::new(callbacks),
        HostRenderer::new(gl, api),
        HostSink::new(callbacks),
        Box::new(HostWaker::new(wake, user_data)),
        &mut gl_loader,
    )?;
    Ok(BoramPlugin { instance })
}

#[unsafe(no_mangle)]
/// ### English
/// Destroys an instance created by `boram_plugin_create`.
///
/// Outstanding swaps are abandoned; completing them afterwards is not allowed (the handle is
/// gone). The engine's GL renderer is released, so the plugin's GL context must be current.
///
/// ### 中文
/// 销毁由 `boram_plugin_create` 创建的实例。
///
/// 在途的 swap 会被放弃；之后不得再完成它们（句柄已失效）。引擎的 GL 渲染器会被释放，
/// 因此调用时插件 GL 上下文必须为 current。
pub unsafe extern "C" fn boram_plugin_destroy(plugin: *mut BoramPlugin) {
    if plugin.is_null() {
        return;
    }
    unsafe {
        drop(Box::from_raw(plugin));
    }
}

#[unsafe(no_mangle)]
/// ### English
/// Reports a view change: `width`/`height` in CSS pixels plus the device scale.
///
/// Return value:
/// - `0` when the surface was resized (a frame may have been presented).
/// - `-1` if `plugin` is NULL.
/// - `-2` if the resize failed (logged; previous state kept).
/// - `-3` if the surface was resized but the first present at the new size failed (logged).
///
/// ### 中文
/// 报告 view 变化：`width`/`height` 为 CSS 像素，另附设备缩放比例。
///
/// 返回值：
/// - 表面 resize 成功时返回 `0`（可能已呈现一帧）。
/// - `plugin` 为空指针返回 `-1`。
/// - resize 失败返回 `-2`（已记录日志，保持原状态）。
/// - surface 已 resize 但新尺寸下的首次 present 失败返回 `-3`（已记录日志）。
pub unsafe extern "C" fn boram_plugin_did_change_view(
    plugin: *mut BoramPlugin,
    width: f64,
    height: f64,
    device_scale: f64,
) -> i32 {
    if plugin.is_null() {
        return -1;
    }
    let instance = unsafe { &mut (*plugin).instance };
    match instance.did_change_view(LogicalSize::new(width, height), device_scale) {
        Ok(_) => 0,
        Err(ResizeError::Surface(_)) => -2,
        Err(ResizeError::Present(_)) => -3,
    }
}

#[unsafe(no_mangle)]
/// ### English
/// Handles one JSON message posted by the page.
///
/// Returns `false` if `plugin`/`json` is NULL or the message is malformed.
///
/// ### 中文
/// 处理一条页面投递的 JSON 消息。
///
/// 当 `plugin`/`json` 为空指针或消息格式错误时返回 `false`。
pub unsafe extern "C" fn boram_plugin_handle_message(
    plugin: *mut BoramPlugin,
    json: *const c_char,
) -> bool {
    if plugin.is_null() {
        return false;
    }
    let Some(json) = (unsafe { cstr_to_str(json) }) else {
        return false;
    };
    let instance = unsafe { &mut (*plugin).instance };
    match instance.handle_message_json(json) {
        Ok(()) => true,
        Err(err) => {
            log::warn!("{err}");
            false
        }
    }
}

#[unsafe(no_mangle)]
/// ### English
/// Forwards a page key event (`KeyboardEvent.key` plus modifier states).
///
/// Returns `true` if a key press was sent to the engine.
///
/// ### 中文
/// 转发一个页面按键事件（`KeyboardEvent.key` 及修饰键状态）。
///
/// 若向引擎发送了按键则返回 `true`。
pub unsafe extern "C" fn boram_plugin_send_key(
    plugin: *mut BoramPlugin,
    key: *const c_char,
    shift: bool,
    ctrl: bool,
    alt: bool,
) -> bool {
    if plugin.is_null() {
        return false;
    }
    let Some(key) = (unsafe { cstr_to_str(key) }) else {
        return false;
    };
    let event = KeyEvent {
        key: key.to_owned(),
        shift,
        ctrl,
        alt,
    };
    unsafe { (*plugin).instance.send_key(&event) }
}

#[unsafe(no_mangle)]
/// ### English
/// Runs work posted to the main thread. Call it after every `wake`.
///
/// ### 中文
/// 执行投递到主线程的工作；每次 `wake` 之后调用。
pub unsafe extern "C" fn boram_plugin_tick(plugin: *mut BoramPlugin) {
    if plugin.is_null() {
        return;
    }
    unsafe { (*plugin).instance.tick() };
}

#[unsafe(no_mangle)]
/// ### English
/// Reports that the swap submitted with `token` has completed, then runs pending work.
///
/// Returns `false` if `plugin` is NULL or `token` is unknown.
///
/// ### 中文
/// 报告以 `token` 提交的 swap 已完成，随后执行待处理工作。
///
/// 当 `plugin` 为空指针或 `token` 未知时返回 `false`。
pub unsafe extern "C" fn boram_plugin_swap_complete(plugin: *mut BoramPlugin, token: u64) -> bool {
    if plugin.is_null() {
        return false;
    }
    let instance = unsafe { &mut (*plugin).instance };
    let known = instance.surface_mut().complete(token);
    instance.tick();
    known
}
