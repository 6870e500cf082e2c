//! ### English
//! Page → player command translation.
//!
//! ### 中文
//! 页面 → 播放器的命令转换。
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::engine::error::{MessageError, PlayerError};
use crate::engine::player::{PlaybackEngine, PropertyValue};

/// ### English
/// Command sent by the host page as `{"type": .., "data": ..}`.
///
/// ### 中文
/// 宿主页面以 `{"type": .., "data": ..}` 形式发送的命令。
#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    Pause(bool),
    Seek(f64),
    Volume { volume: f64, mute: bool },
    Keypress(String),
    Deinterlace(bool),
    /// ### English
    /// Select subtitle track `id`; with `path`, replace that track by an external file.
    ///
    /// ### 中文
    /// 选择字幕轨 `id`；带 `path` 时用外部文件替换该轨。
    Sid { id: i64, path: Option<String> },
    FrameStep,
    FrameBackStep,
}

#[derive(Deserialize)]
struct VolumeData {
    volume: f64,
    mute: bool,
}

#[derive(Deserialize)]
struct SidData {
    id: i64,
    #[serde(default)]
    path: Option<String>,
}

impl HostCommand {
    /// ### English
    /// Parses one page message. Unknown types yield `Ok(None)`.
    ///
    /// ### 中文
    /// 解析一条页面消息；未知类型返回 `Ok(None)`。
    pub fn parse(message: &Value) -> Result<Option<Self>, MessageError> {
        let dict = message.as_object().ok_or(MessageError::NotDictionary)?;
        let kind = dict
            .get("type")
            .and_then(Value::as_str)
            .ok_or(MessageError::MissingType)?;
        let data = dict.get("data").cloned().unwrap_or(Value::Null);

        let command = match kind {
            "pause" => Self::Pause(decode(kind, data)?),
            "seek" => Self::Seek(decode(kind, data)?),
            "volume" => {
                let VolumeData { volume, mute } = decode(kind, data)?;
                Self::Volume { volume, mute }
            }
            "keypress" => Self::Keypress(decode(kind, data)?),
            "deinterlace" => Self::Deinterlace(decode(kind, data)?),
            "sid" => {
                let SidData { id, path } = decode(kind, data)?;
                Self::Sid { id, path }
            }
            "frame-step" => Self::FrameStep,
            "frame-back-step" => Self::FrameBackStep,
            _ => return Ok(None),
        };
        Ok(Some(command))
    }

    /// ### English
    /// Forwards the command to the player.
    ///
    /// ### 中文
    /// 把命令转发给播放器。
    pub fn apply<P: PlaybackEngine + ?Sized>(self, player: &mut P) -> Result<(), PlayerError> {
        match self {
            Self::Pause(pause) => player.set_property("pause", PropertyValue::Flag(pause)),
            Self::Seek(time) => player.set_property("time-pos", PropertyValue::Double(time)),
            Self::Volume { volume, mute } => {
                player.set_property("volume", PropertyValue::Double(volume))?;
                player.set_property("mute", PropertyValue::Flag(mute))
            }
            Self::Keypress(key) => player.command(&["keypress", &key]),
            Self::Deinterlace(on) => player.set_property("deinterlace", PropertyValue::Flag(on)),
            Self::Sid { id, path: None } => player.set_property("sid", PropertyValue::Int64(id)),
            Self::Sid {
                id,
                path: Some(path),
            } => {
                let id = id.to_string();
                if let Err(err) = player.command(&["sub-remove", &id]) {
                    log::debug!("sub-remove {id}: {err}");
                }
                player.command(&["sub-add", &path])
            }
            Self::FrameStep => player.command(&["frame-step"]),
            Self::FrameBackStep => player.command(&["frame-back-step"]),
        }
    }
}

fn decode<T: DeserializeOwned>(kind: &str, data: Value) -> Result<T, MessageError> {
    serde_json::from_value(data).map_err(|source| MessageError::InvalidData {
        kind: kind.to_string(),
        source,
    })
}
