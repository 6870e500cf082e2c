//! ### English
//! Player → page event translation.
//!
//! ### 中文
//! 播放器 → 页面的事件转换。
use serde::Serialize;
use serde_json::Value;

use crate::engine::player::{PlayerEvent, PropertyValue};

/// ### English
/// Message posted to the host page as `{"type": .., "data": ..}`.
///
/// ### 中文
/// 以 `{"type": .., "data": ..}` 形式投递给宿主页面的消息。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HostMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: Value,
}

impl HostMessage {
    /// ### English
    /// Translates a player event. Only flag, int64 and double property changes are forwarded;
    /// int64 values are narrowed to 32 bits.
    ///
    /// ### 中文
    /// 转换播放器事件；只转发 flag、int64 与 double 类型的属性变化，int64 会被截断为 32 位。
    pub fn from_event(event: PlayerEvent) -> Option<Self> {
        let PlayerEvent::PropertyChange {
            name,
            value: Some(value),
        } = event
        else {
            return None;
        };

        let data = match value {
            PropertyValue::Flag(flag) => Value::from(flag),
            PropertyValue::Int64(int) => Value::from(int as i32),
            PropertyValue::Double(double) => Value::from(double),
            PropertyValue::String(_) => return None,
        };
        Some(Self { kind: name, data })
    }

    pub fn to_json(&self) -> String {
        // Both fields are plain JSON values; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// ### English
/// Destination of messages for the host page.
///
/// ### 中文
/// 发往宿主页面的消息出口。
pub trait MessageSink {
    fn post_message(&mut self, message: HostMessage);
}

impl MessageSink for Vec<HostMessage> {
    fn post_message(&mut self, message: HostMessage) {
        self.push(message);
    }
}
