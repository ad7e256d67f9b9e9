use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 水平位置
///
/// 序列化为小写名称；反序列化不区分大小写，`"Left"`、`"LEFT"` 均可。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum XPosition {
    Left,
    Right,
}

const VARIANTS: &[&str] = &["left", "right"];

impl<'de> Deserialize<'de> for XPosition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        match raw.trim() {
            s if s.eq_ignore_ascii_case("left") => Ok(XPosition::Left),
            s if s.eq_ignore_ascii_case("right") => Ok(XPosition::Right),
            _ => Err(de::Error::unknown_variant(&raw, VARIANTS)),
        }
    }
}

impl From<XPosition> for Value {
    fn from(value: XPosition) -> Self {
        match value {
            XPosition::Left => Value::from("left"),
            XPosition::Right => Value::from("right"),
        }
    }
}
