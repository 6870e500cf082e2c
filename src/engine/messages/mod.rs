//! ### English
//! Message bridge between the host page and the player.
//!
//! ### 中文
//! 宿主页面与播放器之间的消息桥接。
mod commands;
mod events;

pub use commands::HostCommand;
pub use events::{HostMessage, MessageSink};
