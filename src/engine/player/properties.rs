use super::PropertyFormat;

/// ### English
/// Properties observed on every instance; each change is forwarded to the page.
///
/// ### 中文
/// 每个实例都会观察的属性；每次变化都会转发给页面。
pub const OBSERVED_PROPERTIES: &[(&str, PropertyFormat)] = &[
    ("sid", PropertyFormat::Int64),
    ("pause", PropertyFormat::Flag),
    ("time-pos", PropertyFormat::Double),
    ("mute", PropertyFormat::Flag),
    ("volume", PropertyFormat::Double),
    ("eof-reached", PropertyFormat::Flag),
    ("deinterlace", PropertyFormat::Flag),
];
