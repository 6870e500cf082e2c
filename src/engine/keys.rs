//! ### English
//! Page keyboard events → player key names.
//!
//! ### 中文
//! 页面键盘事件 → 播放器按键名。
use serde::Deserialize;

/// ### English
/// Keys that only modify other keys; never forwarded on their own.
///
/// ### 中文
/// 仅作为修饰的按键；单独按下时不转发。
const MODIFIER_KEYS: &[&str] = &["Shift", "Control", "Alt", "Compose", "CapsLock", "Meta"];

/// ### English
/// Key names bound to quit/stop by the player's default bindings.
///
/// ### 中文
/// 在播放器默认绑定中对应退出/停止的按键名。
const EXIT_KEYS: &[&str] = &[
    "q",
    "Q",
    "ESC",
    "POWER",
    "STOP",
    "CLOSE_WIN",
    "Ctrl+c",
    "AR_PLAY_HOLD",
    "AR_CENTER_HOLD",
];

/// ### English
/// Keyboard event as reported by the page (`KeyboardEvent.key` plus modifier state).
///
/// ### 中文
/// 页面上报的键盘事件（`KeyboardEvent.key` 与修饰键状态）。
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KeyEvent {
    pub key: String,
    #[serde(alias = "shiftKey")]
    pub shift: bool,
    #[serde(alias = "ctrlKey")]
    pub ctrl: bool,
    #[serde(alias = "altKey")]
    pub alt: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// ### English
    /// Returns the player key name, or `None` if the key must not be forwarded.
    ///
    /// ### 中文
    /// 返回播放器按键名；若该按键不应转发则返回 `None`。
    pub fn to_player_key(&self) -> Option<String> {
        if self.key.is_empty() || MODIFIER_KEYS.contains(&self.key.as_str()) {
            return None;
        }

        let mut key = match self.key.strip_prefix("Arrow") {
            Some(direction) if self.shift => format!("Shift+{}", direction.to_uppercase()),
            Some(direction) => direction.to_uppercase(),
            None => self.key.clone(),
        };
        if self.ctrl {
            key = format!("Ctrl+{key}");
        }
        if self.alt {
            key = format!("Alt+{key}");
        }

        (!EXIT_KEYS.contains(&key.as_str())).then_some(key)
    }
}
