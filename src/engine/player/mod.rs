//! ### English
//! Seam to the external playback engine (client API + GL render callback API).
//!
//! ### 中文
//! 外部播放引擎的接口层（客户端 API + GL 渲染回调 API）。
use std::ffi::c_void;

use super::error::PlayerError;

mod options;
mod properties;

pub use options::{DEFAULT_OPTIONS, LOAD_COMMAND, VERBOSE_OPTION, VIDEO_OUTPUT_OPTION};
pub use properties::OBSERVED_PROPERTIES;

/// ### English
/// Callback installed into the engine; fires on an engine-internal thread.
///
/// ### 中文
/// 安装到引擎中的回调；在引擎内部线程触发。
pub type EngineCallback = Box<dyn Fn() + Send + Sync + 'static>;

/// ### English
/// Value format of a player property. Discriminants match the engine's wire codes.
///
/// ### 中文
/// 播放器属性的值格式；判别值与引擎的格式编码一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum PropertyFormat {
    None = 0,
    String = 1,
    Flag = 3,
    Int64 = 4,
    Double = 5,
}

impl PropertyFormat {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Self::String,
            3 => Self::Flag,
            4 => Self::Int64,
            5 => Self::Double,
            _ => Self::None,
        }
    }
}

/// ### English
/// A typed property value.
///
/// ### 中文
/// 带类型的属性值。
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Flag(bool),
    Int64(i64),
    Double(f64),
    String(String),
}

impl PropertyValue {
    pub fn format(&self) -> PropertyFormat {
        match self {
            Self::Flag(_) => PropertyFormat::Flag,
            Self::Int64(_) => PropertyFormat::Int64,
            Self::Double(_) => PropertyFormat::Double,
            Self::String(_) => PropertyFormat::String,
        }
    }
}

/// ### English
/// Event pulled from the engine's event queue.
///
/// ### 中文
/// 从引擎事件队列取出的事件。
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// ### English
    /// An observed property changed. `value` is `None` when the property is unavailable.
    ///
    /// ### 中文
    /// 被观察的属性发生变化；属性不可用时 `value` 为 `None`。
    PropertyChange {
        name: String,
        value: Option<PropertyValue>,
    },
    /// ### English
    /// Any other engine event (identified by its numeric id).
    ///
    /// ### 中文
    /// 其他引擎事件（以数字 id 标识）。
    Other(i32),
}

/// ### English
/// Client API of the external playback engine.
///
/// Every method except the callbacks' bodies runs on the host main thread.
///
/// ### 中文
/// 外部播放引擎的客户端 API。
///
/// 除回调本身外，所有方法都在宿主主线程调用。
pub trait PlaybackEngine {
    fn set_option(&mut self, name: &str, value: &str) -> Result<(), PlayerError>;

    fn initialize(&mut self) -> Result<(), PlayerError>;

    /// ### English
    /// Initializes the engine's GL renderer, resolving entry points through `resolve`.
    ///
    /// ### 中文
    /// 初始化引擎的 GL 渲染器，通过 `resolve` 解析 GL 入口函数。
    fn init_renderer(
        &mut self,
        resolve: &mut dyn FnMut(&str) -> *const c_void,
    ) -> Result<(), PlayerError>;

    /// ### English
    /// Releases the GL renderer. Called once on teardown while the host context is current.
    ///
    /// ### 中文
    /// 释放 GL 渲染器；销毁时在宿主上下文为 current 的情况下调用一次。
    fn uninit_renderer(&mut self) {}

    fn command(&mut self, args: &[&str]) -> Result<(), PlayerError>;

    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<(), PlayerError>;

    fn observe_property(&mut self, name: &str, format: PropertyFormat) -> Result<(), PlayerError>;

    /// ### English
    /// Pops one event without blocking; `None` when the queue is empty.
    ///
    /// ### 中文
    /// 非阻塞地取出一个事件；队列为空时返回 `None`。
    fn next_event(&mut self) -> Option<PlayerEvent>;

    /// ### English
    /// Installs the "events available" callback.
    ///
    /// ### 中文
    /// 安装 “有事件可取” 回调。
    fn set_wakeup_callback(&mut self, callback: EngineCallback);

    /// ### English
    /// Installs the "new frame available" callback (`on_frame_available`).
    ///
    /// ### 中文
    /// 安装 “有新帧可用” 回调（`on_frame_available`）。
    fn set_update_callback(&mut self, callback: EngineCallback);
}
