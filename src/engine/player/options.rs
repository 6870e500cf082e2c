//! ### English
//! Engine options applied on instance creation.
//!
//! ### 中文
//! 实例创建时应用的引擎选项。

/// ### English
/// Option enabling engine terminal output; set before initialization in verbose mode.
///
/// ### 中文
/// 打开引擎终端输出的选项；verbose 模式下在初始化前设置。
pub const VERBOSE_OPTION: (&str, &str) = ("terminal", "yes");

/// ### English
/// Selects the GL callback video output; applied right after the renderer is initialized and
/// mandatory.
///
/// ### 中文
/// 选择 GL 回调视频输出；在渲染器初始化后立即应用，必须成功。
pub const VIDEO_OUTPUT_OPTION: (&str, &str) = ("vo", "opengl-cb");

/// ### English
/// Options applied after the video output, in order. Failures are only logged.
///
/// ### 中文
/// 在视频输出之后依次应用的选项；失败只记录日志。
pub const DEFAULT_OPTIONS: &[(&str, &str)] = &[
    ("vf-defaults", "yadif=interlaced-only=no"),
    ("stop-playback-on-init-failure", "no"),
    ("input-default-bindings", "yes"),
    ("audio-file-auto", "no"),
    ("sub-auto", "no"),
    ("volume-max", "100"),
    ("keep-open", "yes"),
    ("osd-bar", "no"),
    ("pause", "yes"),
];

/// ### English
/// Command used to open the source.
///
/// ### 中文
/// 用于打开媒体源的命令。
pub const LOAD_COMMAND: &str = "loadfile";
