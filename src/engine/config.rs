//! ### English
//! Per-instance configuration built from the embed element's attributes and the environment.
//!
//! ### 中文
//! 由 embed 元素属性与环境变量构建的每实例配置。
use serde::{Deserialize, Serialize};

use super::error::InitError;
use super::surface::FlipConvention;

/// ### English
/// Embed attribute carrying the media source.
///
/// ### 中文
/// 携带媒体源的 embed 属性名。
pub const SOURCE_ATTRIBUTE: &str = "data-boramsrc";

/// ### English
/// Environment variable enabling engine terminal output when non-empty.
///
/// ### 中文
/// 非空时开启引擎终端输出的环境变量。
pub const VERBOSE_ENV: &str = "BORAM_VERBOSE";

/// ### English
/// Settings for one plugin instance.
///
/// JSON overrides use kebab-case keys; missing keys keep their defaults. The source always comes
/// from the embed attributes, which are applied after the JSON.
///
/// ### 中文
/// 单个插件实例的设置。
///
/// JSON 覆盖项使用 kebab-case 键名，缺失的键保持默认值。媒体源总是来自 embed 属性，
/// 且属性在 JSON 之后应用。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PluginConfig {
    /// ### English
    /// Path or URL handed to the engine's load command.
    ///
    /// ### 中文
    /// 传给引擎加载命令的路径或 URL。
    pub source: String,
    pub verbose: bool,
    pub flip: FlipConvention,
    /// ### English
    /// Extra engine options applied after the defaults (later entries win).
    ///
    /// ### 中文
    /// 在默认选项之后应用的额外引擎选项（后者覆盖前者）。
    pub extra_options: Vec<(String, String)>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            source: String::new(),
            verbose: false,
            flip: FlipConvention::TopDown,
            extra_options: Vec::new(),
        }
    }
}

impl PluginConfig {
    /// ### English
    /// Builds a config from `(name, value)` embed attributes. The first source attribute wins.
    ///
    /// ### 中文
    /// 由 `(name, value)` 形式的 embed 属性构建配置；以第一个 source 属性为准。
    pub fn from_attributes<'a, I>(attributes: I) -> Result<Self, InitError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self::default().with_attributes(attributes)
    }

    /// ### English
    /// Parses host-provided JSON overrides (`flip`, `extra-options`, ...). Missing fields keep
    /// their defaults.
    ///
    /// ### 中文
    /// 解析宿主提供的 JSON 覆盖项（`flip`、`extra-options` 等）；缺省字段保持默认值。
    pub fn from_json(json: &str) -> Result<Self, InitError> {
        Ok(serde_json::from_str(json)?)
    }

    /// ### English
    /// Takes the source from the embed attributes, keeping every other field.
    ///
    /// ### 中文
    /// 从 embed 属性中取得 source，其余字段保持不变。
    pub fn with_attributes<'a, I>(mut self, attributes: I) -> Result<Self, InitError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.source = attributes
            .into_iter()
            .find(|(name, _)| *name == SOURCE_ATTRIBUTE)
            .map(|(_, value)| value.to_string())
            .ok_or(InitError::MissingSource)?;
        Ok(self)
    }

    /// ### English
    /// Applies environment overrides (`BORAM_VERBOSE`).
    ///
    /// ### 中文
    /// 应用环境变量覆盖（`BORAM_VERBOSE`）。
    pub fn with_env(self) -> Self {
        self.with_verbose_var(std::env::var(VERBOSE_ENV).ok().as_deref())
    }

    fn with_verbose_var(mut self, value: Option<&str>) -> Self {
        if value.is_some_and(|value| !value.is_empty()) {
            self.verbose = true;
        }
        self
    }
}
