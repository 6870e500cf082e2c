//! ### English
//! GL entry points handed to the player's GL renderer.
//!
//! The host's GLES implementation has no usable `getProcAddress` for the player: only a fixed set
//! of GLES2 functions is exposed, and a few query/debug extensions are present but broken, so
//! those resolve to NULL and the player falls back.
//!
//! ### 中文
//! 交给播放器 GL 渲染器的 GL 入口函数。
//!
//! 宿主的 GLES 实现无法为播放器提供可用的 `getProcAddress`：只暴露固定的一组 GLES2 函数，
//! 部分查询/调试扩展虽然存在但不可用，因此解析为 NULL，由播放器自行回退。
use std::ffi::c_void;
use std::ptr;

/// ### English
/// GLES2 functions exposed to the player.
///
/// ### 中文
/// 暴露给播放器的 GLES2 函数。
pub const SUPPORTED_GL_FUNCTIONS: &[&str] = &[
    "glGetString",
    "glActiveTexture",
    "glAttachShader",
    "glBindAttribLocation",
    "glBindBuffer",
    "glBindTexture",
    "glBlendFuncSeparate",
    "glBufferData",
    "glClear",
    "glClearColor",
    "glCompileShader",
    "glCreateProgram",
    "glCreateShader",
    "glDeleteBuffers",
    "glDeleteProgram",
    "glDeleteShader",
    "glDeleteTextures",
    "glDisable",
    "glDisableVertexAttribArray",
    "glDrawArrays",
    "glEnable",
    "glEnableVertexAttribArray",
    "glFinish",
    "glFlush",
    "glGenBuffers",
    "glGenTextures",
    "glGetAttribLocation",
    "glGetError",
    "glGetIntegerv",
    "glGetProgramInfoLog",
    "glGetProgramiv",
    "glGetShaderInfoLog",
    "glGetShaderiv",
    "glGetUniformLocation",
    "glLinkProgram",
    "glPixelStorei",
    "glReadPixels",
    "glScissor",
    "glShaderSource",
    "glTexImage2D",
    "glTexParameteri",
    "glTexSubImage2D",
    "glUniform1f",
    "glUniform2f",
    "glUniform3f",
    "glUniform1i",
    "glUniformMatrix2fv",
    "glUniformMatrix3fv",
    "glUseProgram",
    "glVertexAttribPointer",
    "glViewport",
    "glBindFramebuffer",
    "glGenFramebuffers",
    "glDeleteFramebuffers",
    "glCheckFramebufferStatus",
    "glFramebufferTexture2D",
    "glGetFramebufferAttachmentParameteriv",
    "glGenQueriesEXT",
    "glDeleteQueriesEXT",
    "glBeginQueryEXT",
    "glEndQueryEXT",
    "glIsQueryEXT",
    "glGetQueryObjectuivEXT",
];

/// ### English
/// Functions the host exposes but that do not work; always resolved to NULL.
///
/// ### 中文
/// 宿主虽然暴露但无法正常工作的函数；始终解析为 NULL。
pub const UNAVAILABLE_GL_FUNCTIONS: &[&str] = &[
    "glQueryCounterEXT",
    "glGetQueryObjectivEXT",
    "glGetQueryObjecti64vEXT",
    "glGetQueryObjectui64vEXT",
    "glGetTranslatedShaderSourceANGLE",
];

/// ### English
/// Result of looking a name up in the table.
///
/// ### 中文
/// 在函数表中查找名称的结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlSymbol {
    Supported,
    Unavailable,
    Unknown,
}

pub fn classify(name: &str) -> GlSymbol {
    if SUPPORTED_GL_FUNCTIONS.contains(&name) {
        GlSymbol::Supported
    } else if UNAVAILABLE_GL_FUNCTIONS.contains(&name) {
        GlSymbol::Unavailable
    } else {
        GlSymbol::Unknown
    }
}

/// ### English
/// Resolves `name` through `loader` when it is in the supported table; NULL otherwise.
///
/// Unknown names are logged so missing entries can be added to the table.
///
/// #### Parameters
/// - `name`: GL function name requested by the player.
/// - `loader`: Host-side lookup for supported functions.
///
/// ### 中文
/// 若 `name` 位于支持表中，则通过 `loader` 解析；否则返回 NULL。
///
/// 未知名称会记录日志，便于补充到函数表。
///
/// #### 参数
/// - `name`：播放器请求的 GL 函数名。
/// - `loader`：宿主侧对支持函数的查找。
pub fn resolve(name: &str, loader: &mut dyn FnMut(&str) -> *const c_void) -> *const c_void {
    match classify(name) {
        GlSymbol::Supported => loader(name),
        GlSymbol::Unavailable => ptr::null(),
        GlSymbol::Unknown => {
            log::warn!("missed GL function {name}");
            ptr::null()
        }
    }
}
