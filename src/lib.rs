/// ### English
/// `boram_plugin` crate root.
/// Exposes the plugin-host C ABI via `ffi`; the frame pump and player glue live under `engine`.
///
/// ### 中文
/// `boram_plugin` 的 crate 根。
/// 通过 `ffi` 导出插件宿主 C ABI；帧泵与播放器胶水代码位于 `engine` 模块。
pub mod engine;
pub mod ffi;

pub use engine::*;
