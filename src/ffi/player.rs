//! ### English
//! `PlaybackEngine` backed by the host-provided `BoramPlayerApi` table.
//!
//! ### 中文
//! 基于宿主提供的 `BoramPlayerApi` 函数表实现的 `PlaybackEngine`。
use std::ffi::{CString, c_char, c_void};
use std::ptr;

use crate::engine::{
    EngineCallback, PlaybackEngine, PlayerError, PlayerEvent, PropertyFormat, PropertyValue,
};

use super::{
    BORAM_EVENT_NONE, BORAM_EVENT_PROPERTY_CHANGE, BoramCallback, BoramPlayerApi,
    BoramPlayerEvent, cstr_to_str,
};

/// ### English
/// Status reported for names and arguments that cannot cross the C boundary (interior NUL).
///
/// ### 中文
/// 名称或参数无法跨越 C 边界（内部含 NUL）时报告的状态码。
const INVALID_PARAMETER: i32 = -4;

type Resolver<'a> = &'a mut dyn FnMut(&str) -> *const c_void;

type CallbackSetter = unsafe extern "C" fn(*mut c_void, Option<BoramCallback>, *mut c_void);

/// ### English
/// Engine handle driven through a C function table.
///
/// Installed callbacks are boxed twice so the engine gets a thin context pointer; the boxes stay
/// alive until they are replaced or the engine is destroyed.
///
/// ### 中文
/// 通过 C 函数表驱动的引擎句柄。
///
/// 安装的回调会被装箱两次，使引擎拿到一个瘦指针上下文；这些 Box 一直存活到被替换或引擎销毁为止。
pub struct FfiPlayer {
    api: BoramPlayerApi,
    wakeup: Option<Box<EngineCallback>>,
    update: Option<Box<EngineCallback>>,
}

impl FfiPlayer {
    /// ### English
    /// Takes ownership of the engine handle in `api`. Returns `None` when a mandatory entry is
    /// missing.
    ///
    /// ### 中文
    /// 接管 `api` 中的引擎句柄；缺少必需入口时返回 `None`。
    pub(super) fn new(api: BoramPlayerApi) -> Option<Self> {
        if !api.is_complete() {
            return None;
        }
        Some(Self {
            api,
            wakeup: None,
            update: None,
        })
    }

    fn install(&self, setter: Option<CallbackSetter>, callback: &EngineCallback) {
        let Some(setter) = setter else {
            return;
        };
        let ctx = callback as *const EngineCallback as *mut c_void;
        unsafe { setter(self.api.handle, Some(callback_trampoline), ctx) };
    }

    fn uninstall(&self, setter: Option<CallbackSetter>) {
        if let Some(setter) = setter {
            unsafe { setter(self.api.handle, None, ptr::null_mut()) };
        }
    }
}

unsafe extern "C" fn callback_trampoline(ctx: *mut c_void) {
    if ctx.is_null() {
        return;
    }
    let callback = unsafe { &*(ctx as *const EngineCallback) };
    callback();
}

unsafe extern "C" fn get_proc_trampoline(ctx: *mut c_void, name: *const c_char) -> *mut c_void {
    if ctx.is_null() {
        return ptr::null_mut();
    }
    let resolve = unsafe { &mut *(ctx as *mut Resolver<'_>) };
    match unsafe { cstr_to_str(name) } {
        Some(name) => resolve(name).cast_mut(),
        None => ptr::null_mut(),
    }
}

/// ### English
/// Reads a property payload of the given engine format.
///
/// # Safety
/// `data` must be NULL or point to a value laid out as the engine documents for `format`.
///
/// ### 中文
/// 按给定的引擎格式读取属性数据。
///
/// # Safety
/// `data` 必须为 NULL，或指向按 `format` 约定布局的值。
unsafe fn read_property(format: PropertyFormat, data: *const c_void) -> Option<PropertyValue> {
    if data.is_null() {
        return None;
    }
    unsafe {
        match format {
            PropertyFormat::None => None,
            PropertyFormat::Flag => Some(PropertyValue::Flag(*data.cast::<i32>() != 0)),
            PropertyFormat::Int64 => Some(PropertyValue::Int64(*data.cast::<i64>())),
            PropertyFormat::Double => Some(PropertyValue::Double(*data.cast::<f64>())),
            PropertyFormat::String => cstr_to_str(*data.cast::<*const c_char>())
                .map(|value| PropertyValue::String(value.to_owned())),
        }
    }
}

impl PlaybackEngine for FfiPlayer {
    fn set_option(&mut self, name: &str, value: &str) -> Result<(), PlayerError> {
        let error = |code| PlayerError::Option {
            name: name.to_owned(),
            code,
        };
        let (Ok(c_name), Ok(c_value)) = (CString::new(name), CString::new(value)) else {
            return Err(error(INVALID_PARAMETER));
        };
        let Some(set_option) = self.api.set_option else {
            return Err(error(INVALID_PARAMETER));
        };
        let code = unsafe { set_option(self.api.handle, c_name.as_ptr(), c_value.as_ptr()) };
        if code < 0 { Err(error(code)) } else { Ok(()) }
    }

    fn initialize(&mut self) -> Result<(), PlayerError> {
        let Some(initialize) = self.api.initialize else {
            return Err(PlayerError::Initialize(INVALID_PARAMETER));
        };
        let code = unsafe { initialize(self.api.handle) };
        if code < 0 {
            Err(PlayerError::Initialize(code))
        } else {
            Ok(())
        }
    }

    fn init_renderer(
        &mut self,
        resolve: &mut dyn FnMut(&str) -> *const c_void,
    ) -> Result<(), PlayerError> {
        let Some(init_gl) = self.api.init_gl else {
            return Err(PlayerError::Renderer(INVALID_PARAMETER));
        };
        let mut resolve: Resolver<'_> = resolve;
        let ctx = &mut resolve as *mut Resolver<'_> as *mut c_void;
        let code = unsafe { init_gl(self.api.handle, get_proc_trampoline, ctx) };
        if code < 0 {
            Err(PlayerError::Renderer(code))
        } else {
            Ok(())
        }
    }

    fn uninit_renderer(&mut self) {
        if let Some(uninit_gl) = self.api.uninit_gl {
            unsafe { uninit_gl(self.api.handle) };
        }
    }

    fn command(&mut self, args: &[&str]) -> Result<(), PlayerError> {
        let name = args.first().copied().unwrap_or_default();
        let error = |code| PlayerError::Command {
            name: name.to_owned(),
            code,
        };
        let Ok(c_args) = args
            .iter()
            .map(|arg| CString::new(*arg))
            .collect::<Result<Vec<_>, _>>()
        else {
            return Err(error(INVALID_PARAMETER));
        };
        let mut argv: Vec<*const c_char> = c_args.iter().map(|arg| arg.as_ptr()).collect();
        argv.push(ptr::null());

        let Some(command) = self.api.command else {
            return Err(error(INVALID_PARAMETER));
        };
        let code = unsafe { command(self.api.handle, argv.as_ptr()) };
        if code < 0 { Err(error(code)) } else { Ok(()) }
    }

    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<(), PlayerError> {
        let error = |code| PlayerError::Property {
            name: name.to_owned(),
            code,
        };
        let Ok(c_name) = CString::new(name) else {
            return Err(error(INVALID_PARAMETER));
        };
        let Some(set_property) = self.api.set_property else {
            return Err(error(INVALID_PARAMETER));
        };
        let format = value.format().code();
        let set = |data: *const c_void| unsafe {
            set_property(self.api.handle, c_name.as_ptr(), format, data)
        };

        let code = match &value {
            PropertyValue::Flag(flag) => {
                let flag = i32::from(*flag);
                set((&raw const flag).cast())
            }
            PropertyValue::Int64(number) => set((number as *const i64).cast()),
            PropertyValue::Double(number) => set((number as *const f64).cast()),
            PropertyValue::String(text) => {
                let Ok(text) = CString::new(text.as_str()) else {
                    return Err(error(INVALID_PARAMETER));
                };
                let text_ptr = text.as_ptr();
                set((&raw const text_ptr).cast())
            }
        };
        if code < 0 { Err(error(code)) } else { Ok(()) }
    }

    fn observe_property(&mut self, name: &str, format: PropertyFormat) -> Result<(), PlayerError> {
        let error = |code| PlayerError::Property {
            name: name.to_owned(),
            code,
        };
        let Ok(c_name) = CString::new(name) else {
            return Err(error(INVALID_PARAMETER));
        };
        let Some(observe_property) = self.api.observe_property else {
            return Err(error(INVALID_PARAMETER));
        };
        let code = unsafe { observe_property(self.api.handle, c_name.as_ptr(), format.code()) };
        if code < 0 { Err(error(code)) } else { Ok(()) }
    }

    fn next_event(&mut self) -> Option<PlayerEvent> {
        let next_event = self.api.next_event?;
        let mut event = BoramPlayerEvent {
            event_id: BORAM_EVENT_NONE,
            name: ptr::null(),
            format: PropertyFormat::None.code(),
            data: ptr::null(),
        };
        unsafe { next_event(self.api.handle, &mut event) };

        match event.event_id {
            BORAM_EVENT_NONE => None,
            BORAM_EVENT_PROPERTY_CHANGE => {
                let name = unsafe { cstr_to_str(event.name) }
                    .unwrap_or_default()
                    .to_owned();
                let value =
                    unsafe { read_property(PropertyFormat::from_code(event.format), event.data) };
                Some(PlayerEvent::PropertyChange { name, value })
            }
            other => Some(PlayerEvent::Other(other)),
        }
    }

    fn set_wakeup_callback(&mut self, callback: EngineCallback) {
        let callback = Box::new(callback);
        self.install(self.api.set_wakeup_callback, &callback);
        self.wakeup = Some(callback);
    }

    fn set_update_callback(&mut self, callback: EngineCallback) {
        let callback = Box::new(callback);
        self.install(self.api.set_update_callback, &callback);
        self.update = Some(callback);
    }
}

impl Drop for FfiPlayer {
    /// ### English
    /// Detaches the callbacks before destroying the engine, so no callback outlives its box.
    ///
    /// ### 中文
    /// 先卸下回调再销毁引擎，保证回调不会晚于其 Box 存活。
    fn drop(&mut self) {
        self.uninstall(self.api.set_wakeup_callback);
        self.uninstall(self.api.set_update_callback);
        if let Some(destroy) = self.api.destroy {
            unsafe { destroy(self.api.handle) };
        }
        self.wakeup = None;
        self.update = None;
    }
}
