//! ### English
//! Plugin instance: owns the player, the frame pump and the main-thread queue.
//!
//! ### 中文
//! 插件实例：持有播放器、帧泵与主线程队列。
use std::ffi::c_void;
use std::sync::Arc;

use dpi::{LogicalSize, PhysicalSize};
use serde_json::Value;

use super::config::PluginConfig;
use super::dispatch::{MainThreadQueue, Task, Waker};
use super::error::{InitError, MessageError, ResizeError};
use super::gl_symbols;
use super::keys::KeyEvent;
use super::messages::{HostCommand, HostMessage, MessageSink};
use super::player::{
    DEFAULT_OPTIONS, LOAD_COMMAND, OBSERVED_PROPERTIES, PlaybackEngine, VERBOSE_OPTION,
    VIDEO_OUTPUT_OPTION,
};
use super::pump::{FramePump, FrameRequest, PresentationState};
use super::surface::{FrameRenderer, PresentSurface};

/// ### English
/// One embedded player.
///
/// Lives on the host main thread. The player's callbacks only touch the shared queue; the host is
/// woken through the `Waker` and must then call [`Self::tick`] on the main thread.
///
/// ### 中文
/// 一个嵌入的播放器实例。
///
/// 位于宿主主线程。播放器回调只访问共享队列；宿主通过 `Waker` 被唤醒后，必须在主线程调用 [`Self::tick`]。
pub struct PluginInstance<P, S, R, M>
where
    P: PlaybackEngine,
    S: PresentSurface,
    R: FrameRenderer,
    M: MessageSink,
{
    queue: Arc<MainThreadQueue>,
    pump: FramePump<S, R>,
    player: P,
    sink: M,
}

impl<P, S, R, M> PluginInstance<P, S, R, M>
where
    P: PlaybackEngine,
    S: PresentSurface,
    R: FrameRenderer,
    M: MessageSink,
{
    /// ### English
    /// Configures and starts the player, then loads `config.source`.
    ///
    /// Initialization, renderer setup and selecting the GL video output are fatal; the remaining
    /// options, the load command and property observation only log on failure.
    ///
    /// #### Parameters
    /// - `config`: Instance configuration.
    /// - `player`: Freshly created, uninitialized engine.
    /// - `surface`: Host drawable.
    /// - `renderer`: Draws the engine's current frame.
    /// - `sink`: Destination for messages to the page.
    /// - `waker`: Host hook requesting a main-thread `tick`.
    /// - `gl_loader`: Host lookup for GL functions (filtered through the symbol table).
    ///
    /// ### 中文
    /// 配置并启动播放器，然后加载 `config.source`。
    ///
    /// 初始化、渲染器设置与选择 GL 视频输出失败是致命的；其余选项、加载命令与属性观察失败只记录日志。
    ///
    /// #### 参数
    /// - `config`：实例配置。
    /// - `player`：刚创建、尚未初始化的引擎。
    /// - `surface`：宿主可绘制表面。
    /// - `renderer`：绘制引擎当前帧。
    /// - `sink`：发往页面的消息出口。
    /// - `waker`：请求在主线程执行 `tick` 的宿主钩子。
    /// - `gl_loader`：宿主 GL 函数查找（经过符号表过滤）。
    pub fn new(
        config: PluginConfig,
        mut player: P,
        surface: S,
        renderer: R,
        sink: M,
        waker: Box<dyn Waker>,
        gl_loader: &mut dyn FnMut(&str) -> *const c_void,
    ) -> Result<Self, InitError> {
        if config.verbose {
            let (name, value) = VERBOSE_OPTION;
            player.set_option(name, value)?;
        }
        player.initialize()?;
        player.init_renderer(&mut |name: &str| gl_symbols::resolve(name, &mut *gl_loader))?;

        let (vo_name, vo_value) = VIDEO_OUTPUT_OPTION;
        player.set_option(vo_name, vo_value)?;
        for (name, value) in DEFAULT_OPTIONS {
            if let Err(err) = player.set_option(name, value) {
                log::warn!("{err}");
            }
        }
        for (name, value) in &config.extra_options {
            if let Err(err) = player.set_option(name, value) {
                log::warn!("{err}");
            }
        }

        if let Err(err) = player.command(&[LOAD_COMMAND, &config.source]) {
            log::warn!("unable to load {}: {err}", config.source);
        }
        for (name, format) in OBSERVED_PROPERTIES {
            if let Err(err) = player.observe_property(name, *format) {
                log::warn!("unable to observe {name}: {err}");
            }
        }

        let queue = MainThreadQueue::new(waker);
        let notifier = queue.notifier();
        player.set_wakeup_callback(Box::new(move || notifier.player_wakeup()));
        let notifier = queue.notifier();
        player.set_update_callback(Box::new(move || notifier.frame_ready()));

        let pump = FramePump::new(surface, renderer, queue.clone(), config.flip);
        log::debug!("plugin instance created for {}", config.source);

        Ok(Self {
            queue,
            pump,
            player,
            sink,
        })
    }

    /// ### English
    /// Handles a view change from the host: the physical size is `rect * device_scale`,
    /// truncated.
    ///
    /// A refused resize keeps the previous state (`ResizeError::Surface`). When the resize is
    /// applied but the first present fails, the new size is kept (`ResizeError::Present`). Both are
    /// logged.
    ///
    /// ### 中文
    /// 处理宿主的 view 变化：物理尺寸为 `rect * device_scale`（截断取整）。
    ///
    /// resize 被拒绝时保持之前的状态（`ResizeError::Surface`）；resize 已生效但首次 present 失败时
    /// 保留新尺寸（`ResizeError::Present`）。两种情况都会记录日志。
    pub fn did_change_view(
        &mut self,
        rect: LogicalSize<f64>,
        device_scale: f64,
    ) -> Result<FrameRequest, ResizeError> {
        let size = PhysicalSize::new(
            (rect.width * device_scale) as u32,
            (rect.height * device_scale) as u32,
        );
        self.pump
            .on_surface_resized(size)
            .inspect_err(|err| match err {
                ResizeError::Surface(err) => log::warn!(
                    "unable to resize buffers to {} x {}: {err}",
                    size.width,
                    size.height
                ),
                ResizeError::Present(err) => log::error!(
                    "resized buffers to {} x {}, {err}",
                    size.width,
                    size.height
                ),
            })
    }

    /// ### English
    /// Handles one message from the page. Unknown types are ignored; player failures are logged.
    ///
    /// ### 中文
    /// 处理一条来自页面的消息。未知类型被忽略；播放器调用失败只记录日志。
    pub fn handle_message(&mut self, message: &Value) -> Result<(), MessageError> {
        let Some(command) = HostCommand::parse(message)? else {
            log::debug!("ignoring page message {message}");
            return Ok(());
        };
        if let Err(err) = command.apply(&mut self.player) {
            log::warn!("{err}");
        }
        Ok(())
    }

    /// ### English
    /// Parses `json` and handles it as a page message.
    ///
    /// ### 中文
    /// 解析 `json` 并作为页面消息处理。
    pub fn handle_message_json(&mut self, json: &str) -> Result<(), MessageError> {
        let message: Value = serde_json::from_str(json)?;
        self.handle_message(&message)
    }

    /// ### English
    /// Forwards a page key event to the player. Returns whether a key press was sent.
    ///
    /// ### 中文
    /// 把页面按键事件转发给播放器；返回是否发送了按键。
    pub fn send_key(&mut self, event: &KeyEvent) -> bool {
        let Some(key) = event.to_player_key() else {
            return false;
        };
        match self.player.command(&["keypress", &key]) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("{err}");
                false
            }
        }
    }

    /// ### English
    /// Runs all work posted to the main thread: swap completions, player events, frame requests.
    ///
    /// ### 中文
    /// 执行投递到主线程的全部工作：swap 完成、播放器事件、新帧请求。
    pub fn tick(&mut self) {
        let queue = self.queue.clone();
        queue.drain(|task| self.run(task));
    }

    fn run(&mut self, task: Task) {
        match task {
            Task::FrameReady => {
                if let Err(err) = self.pump.request_frame() {
                    log::error!("{err}");
                }
            }
            Task::PresentComplete(token) => {
                if let Err(err) = self.pump.on_present_complete(token) {
                    log::error!("{err}");
                }
            }
            Task::PlayerEvents => {
                while let Some(event) = self.player.next_event() {
                    if let Some(message) = HostMessage::from_event(event) {
                        self.sink.post_message(message);
                    }
                }
            }
        }
    }

    pub fn presentation_state(&self) -> PresentationState {
        self.pump.snapshot()
    }

    pub fn pump(&self) -> &FramePump<S, R> {
        &self.pump
    }

    pub fn surface_mut(&mut self) -> &mut S {
        self.pump.surface_mut()
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn sink(&self) -> &M {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut M {
        &mut self.sink
    }
}

impl<P, S, R, M> Drop for PluginInstance<P, S, R, M>
where
    P: PlaybackEngine,
    S: PresentSurface,
    R: FrameRenderer,
    M: MessageSink,
{
    /// ### English
    /// Closes the queue and tears the pump down before releasing the player's renderer.
    ///
    /// ### 中文
    /// 先关闭队列并销毁 pump，再释放播放器的渲染器。
    fn drop(&mut self) {
        self.queue.close();
        self.pump.teardown();
        self.player.uninit_renderer();
    }
}
