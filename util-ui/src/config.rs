use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// 组件配置
///
/// 以名称保存属性值，另带一段可选的内容。未设置的项与设置为空的项不同：
/// `contains` 只看是否设置过。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    items: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.items.insert(key.into(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    /// 按类型读取配置值；未设置或无法转换时返回 `None`
    pub fn get_value<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.items.get(key)?;
        match T::deserialize(value) {
            Ok(v) => Some(v),
            Err(err) => {
                tracing::debug!(key, %value, error = %err, "config value not convertible");
                None
            }
        }
    }

    /// 读取布尔值，接受 `true` 或字符串 `"true"`（不区分大小写），其余为 `false`
    pub fn get_bool_value(&self, key: &str) -> bool {
        match self.items.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }
}
