//! ### English
//! Error types shared by the pump, the message bridge and the instance lifecycle.
//!
//! ### 中文
//! pump、消息桥接与实例生命周期共用的错误类型。

/// ### English
/// Presentation-surface failure (resize, bind or swap submission).
///
/// ### 中文
/// 呈现表面错误（resize、绑定或 swap 提交失败）。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    #[error("invalid surface size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("unable to resize buffers (code {0})")]
    ResizeFailed(i32),

    #[error("unable to submit swap (code {0})")]
    SwapFailed(i32),

    #[error("unable to bind graphics context")]
    BindFailed,
}

/// ### English
/// A present could not be submitted; the pump has already returned to idle.
///
/// ### 中文
/// present 提交失败；pump 已回到空闲状态。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("present failed: {0}")]
pub struct PresentError(#[from] pub SurfaceError);

/// ### English
/// Failure of a surface resize.
///
/// `Surface` means the resize itself was refused and nothing changed. `Present` means the surface
/// now has the new size but the first present at that size could not be submitted.
///
/// ### 中文
/// surface resize 失败。
///
/// `Surface` 表示 resize 本身被拒绝，状态未改变；`Present` 表示 surface 已采用新尺寸，
/// 但该尺寸下的首次 present 提交失败。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResizeError {
    #[error("unable to resize surface: {0}")]
    Surface(#[from] SurfaceError),

    #[error("surface resized but {0}")]
    Present(#[from] PresentError),
}

/// ### English
/// Malformed message from the host page.
///
/// ### 中文
/// 宿主页面发来的格式错误消息。
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("message is not a dictionary")]
    NotDictionary,

    #[error("message has no string `type` field")]
    MissingType,

    #[error("invalid `data` for `{kind}`: {source}")]
    InvalidData {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid message JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// ### English
/// Playback-engine call failure, carrying the engine status code.
///
/// ### 中文
/// 播放引擎调用失败，携带引擎状态码。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlayerError {
    #[error("player context creation failed")]
    Create,

    #[error("player initialization failed (code {0})")]
    Initialize(i32),

    #[error("failed to set option `{name}` (code {code})")]
    Option { name: String, code: i32 },

    #[error("failed to set property `{name}` (code {code})")]
    Property { name: String, code: i32 },

    #[error("command `{name}` failed (code {code})")]
    Command { name: String, code: i32 },

    #[error("failed to initialize player GL renderer (code {0})")]
    Renderer(i32),
}

/// ### English
/// Plugin instance creation failure.
///
/// ### 中文
/// 插件实例创建失败。
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("missing `data-boramsrc` attribute")]
    MissingSource,

    #[error("invalid plugin config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("{0} table is incomplete")]
    IncompleteTable(&'static str),

    #[error(transparent)]
    Player(#[from] PlayerError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error("unable to initialize GL: {0}")]
    Gl(String),
}
