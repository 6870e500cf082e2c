/// ### English
/// Plugin internals: frame pump, main-thread dispatch, player seam and message bridge.
///
/// ### 中文
/// 插件内部模块：帧泵、主线程调度、播放器接口与消息桥接。
pub mod config;
pub mod dispatch;
pub mod error;
pub mod gl_symbols;
pub mod instance;
pub mod keys;
pub mod messages;
pub mod player;
pub mod pump;
pub mod surface;

pub use config::PluginConfig;
pub use dispatch::{MainThreadQueue, Notifier, Task, Waker};
pub use error::{
    InitError, MessageError, PlayerError, PresentError, ResizeError, SurfaceError,
};
pub use instance::PluginInstance;
pub use keys::KeyEvent;
pub use messages::{HostCommand, HostMessage, MessageSink};
pub use player::{EngineCallback, PlaybackEngine, PlayerEvent, PropertyFormat, PropertyValue};
pub use pump::{FramePump, FrameRequest, PresentationState};
pub use surface::{DrawTarget, FlipConvention, FrameRenderer, PresentSurface, SwapCompletion};
