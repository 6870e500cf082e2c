//! In-process stand-ins for the two C tables, recording every call they receive.
use std::cell::RefCell;
use std::ffi::{CStr, c_char, c_void};
use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::engine::PropertyFormat;

use super::{
    BORAM_EVENT_PROPERTY_CHANGE, BoramCallback, BoramGetProcAddress, BoramHostCallbacks,
    BoramPlayerApi, BoramPlayerEvent,
};

fn text(ptr: *const c_char) -> String {
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}

#[derive(Default)]
pub(super) struct PlayerRecorder {
    pub calls: RefCell<Vec<String>>,
    pub callbacks: RefCell<Vec<(BoramCallback, *mut c_void)>>,
    pub resolved: RefCell<Vec<*mut c_void>>,
    pub pending_flag: RefCell<Option<bool>>,
    pub fail_initialize: bool,
}

impl PlayerRecorder {
    pub fn api(&self) -> BoramPlayerApi {
        BoramPlayerApi {
            handle: (self as *const Self).cast_mut().cast(),
            set_option: Some(set_option),
            initialize: Some(initialize),
            init_gl: Some(init_gl),
            uninit_gl: Some(uninit_gl),
            command: Some(command),
            set_property: Some(set_property),
            observe_property: Some(observe_property),
            next_event: Some(next_event),
            set_wakeup_callback: Some(set_wakeup_callback),
            set_update_callback: Some(set_update_callback),
            draw: Some(draw),
            destroy: Some(destroy),
        }
    }

    /// Calls the `index`-th installed callback; creation installs wakeup then update.
    pub fn fire(&self, index: usize) {
        let (callback, ctx) = self.callbacks.borrow()[index];
        unsafe { callback(ctx) };
    }

    fn push(&self, call: impl Into<String>) {
        self.calls.borrow_mut().push(call.into());
    }
}

fn player<'a>(handle: *mut c_void) -> &'a PlayerRecorder {
    unsafe { &*handle.cast::<PlayerRecorder>() }
}

unsafe extern "C" fn set_option(h: *mut c_void, name: *const c_char, value: *const c_char) -> i32 {
    let name = text(name);
    player(h).push(format!("{name}={}", text(value)));
    if name == "broken" { -5 } else { 0 }
}

unsafe extern "C" fn initialize(h: *mut c_void) -> i32 {
    let player = player(h);
    player.push("initialize");
    if player.fail_initialize { -1 } else { 0 }
}

unsafe extern "C" fn init_gl(h: *mut c_void, get: BoramGetProcAddress, ctx: *mut c_void) -> i32 {
    let resolved = unsafe { get(ctx, c"glViewport".as_ptr()) };
    player(h).resolved.borrow_mut().push(resolved);
    0
}

unsafe extern "C" fn uninit_gl(h: *mut c_void) {
    player(h).push("uninit gl");
}

unsafe extern "C" fn command(h: *mut c_void, args: *const *const c_char) -> i32 {
    let mut parts = Vec::new();
    let mut index = 0;
    loop {
        let arg = unsafe { *args.add(index) };
        if arg.is_null() {
            break;
        }
        parts.push(text(arg));
        index += 1;
    }
    player(h).push(parts.join(" "));
    0
}

unsafe extern "C" fn set_property(
    h: *mut c_void,
    name: *const c_char,
    format: i32,
    data: *const c_void,
) -> i32 {
    let value = match PropertyFormat::from_code(format) {
        PropertyFormat::Flag => unsafe { *data.cast::<i32>() }.to_string(),
        PropertyFormat::Int64 => unsafe { *data.cast::<i64>() }.to_string(),
        PropertyFormat::Double => unsafe { *data.cast::<f64>() }.to_string(),
        PropertyFormat::String => text(unsafe { *data.cast::<*const c_char>() }),
        PropertyFormat::None => return -1,
    };
    player(h).push(format!("set {}={value}", text(name)));
    0
}

unsafe extern "C" fn observe_property(h: *mut c_void, name: *const c_char, format: i32) -> i32 {
    player(h).push(format!("observe {}:{format}", text(name)));
    0
}

static PAUSE_FLAG: i32 = 1;

unsafe extern "C" fn next_event(h: *mut c_void, event: *mut BoramPlayerEvent) {
    let Some(flag) = player(h).pending_flag.borrow_mut().take() else {
        return;
    };
    let event = unsafe { &mut *event };
    event.event_id = BORAM_EVENT_PROPERTY_CHANGE;
    event.name = c"pause".as_ptr();
    event.format = PropertyFormat::Flag.code();
    event.data = if flag {
        (&raw const PAUSE_FLAG).cast()
    } else {
        ptr::null()
    };
}

fn record_callback(h: *mut c_void, kind: &str, callback: Option<BoramCallback>, ctx: *mut c_void) {
    let player = player(h);
    match callback {
        Some(callback) => player.callbacks.borrow_mut().push((callback, ctx)),
        None => player.push(format!("unset {kind} callback")),
    }
}

unsafe extern "C" fn set_wakeup_callback(
    h: *mut c_void,
    callback: Option<BoramCallback>,
    ctx: *mut c_void,
) {
    record_callback(h, "wakeup", callback, ctx);
}

unsafe extern "C" fn set_update_callback(
    h: *mut c_void,
    callback: Option<BoramCallback>,
    ctx: *mut c_void,
) {
    record_callback(h, "update", callback, ctx);
}

unsafe extern "C" fn draw(h: *mut c_void, fbo: i32, width: i32, height: i32) -> i32 {
    player(h).push(format!("draw {fbo} {width} {height}"));
    0
}

unsafe extern "C" fn destroy(h: *mut c_void) {
    player(h).push("destroy");
}

#[derive(Default)]
pub(super) struct HostRecorder {
    pub wakes: AtomicUsize,
    pub messages: RefCell<Vec<String>>,
    pub resizes: RefCell<Vec<(i32, i32)>>,
    pub swaps: RefCell<Vec<u64>>,
    pub binds: RefCell<usize>,
    pub resize_code: i32,
    pub swap_code: i32,
    pub bind_code: i32,
    /// Leaves `glGetString` unresolved, as a context without GL would.
    pub no_gl: bool,
}

impl HostRecorder {
    pub fn callbacks(&self) -> BoramHostCallbacks {
        BoramHostCallbacks {
            user_data: (self as *const Self).cast_mut().cast(),
            wake: Some(wake),
            post_message: Some(post_message),
            resize_buffers: Some(resize_buffers),
            swap_buffers: Some(swap_buffers),
            get_proc_address: Some(get_proc_address),
            bind_graphics: Some(bind_graphics),
        }
    }
}

fn host<'a>(user_data: *mut c_void) -> &'a HostRecorder {
    unsafe { &*user_data.cast::<HostRecorder>() }
}

unsafe extern "C" fn wake(user_data: *mut c_void) {
    host(user_data).wakes.fetch_add(1, Ordering::SeqCst);
}

unsafe extern "C" fn post_message(user_data: *mut c_void, json: *const c_char) {
    host(user_data).messages.borrow_mut().push(text(json));
}

unsafe extern "C" fn resize_buffers(user_data: *mut c_void, width: i32, height: i32) -> i32 {
    let host = host(user_data);
    host.resizes.borrow_mut().push((width, height));
    host.resize_code
}

unsafe extern "C" fn swap_buffers(user_data: *mut c_void, token: u64) -> i32 {
    let host = host(user_data);
    host.swaps.borrow_mut().push(token);
    host.swap_code
}

unsafe extern "C" fn bind_graphics(user_data: *mut c_void) -> i32 {
    let host = host(user_data);
    *host.binds.borrow_mut() += 1;
    host.bind_code
}

unsafe extern "C" fn get_proc_address(user_data: *mut c_void, name: *const c_char) -> *const c_void {
    match text(name).as_str() {
        "glGetString" if !host(user_data).no_gl => gl_get_string as *const c_void,
        "glBindFramebuffer" => gl_bind_framebuffer as *const c_void,
        "glViewport" => gl_viewport as *const c_void,
        _ => ptr::null(),
    }
}

const GL_VERSION: u32 = 0x1F02;
const GL_EXTENSIONS: u32 = 0x1F03;

thread_local! {
    /// GL calls made on this thread, in order.
    pub(super) static GL_CALLS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

unsafe extern "C" fn gl_get_string(name: u32) -> *const u8 {
    let value: &CStr = match name {
        GL_VERSION => c"OpenGL ES 2.0",
        GL_EXTENSIONS => c"",
        _ => return ptr::null(),
    };
    value.as_ptr().cast()
}

unsafe extern "C" fn gl_bind_framebuffer(target: u32, framebuffer: u32) {
    GL_CALLS.with_borrow_mut(|calls| calls.push(format!("bind {target:#x} {framebuffer}")));
}

unsafe extern "C" fn gl_viewport(x: i32, y: i32, width: i32, height: i32) {
    GL_CALLS.with_borrow_mut(|calls| calls.push(format!("viewport {x} {y} {width} {height}")));
}
