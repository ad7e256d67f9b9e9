//! 数据访问配置
//!
//! 控制工作单元的实体跟踪行为以及日志中的数据源标签，
//! 可通过 `bon` 构建器或 JSON 配置加载。
//!
use crate::error::DomainResult as Result;
use bon::Builder;
use serde::{Deserialize, Serialize};

/// 查询结果的跟踪行为
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingBehavior {
    /// 加载的实体进入工作单元缓存，后续查找直接命中缓存
    #[default]
    TrackAll,
    /// 每次查找都回到存储读取，不写入缓存
    NoTracking,
}

/// 工作单元配置
#[derive(Builder, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataOptions {
    /// 数据源名称（用于日志）
    #[builder(into, default = "default".to_string())]
    name: String,
    /// 跟踪行为
    #[builder(default)]
    tracking: TrackingBehavior,
}

impl Default for DataOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl DataOptions {
    /// 从 JSON 文本加载配置，缺失字段使用默认值
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tracking(&self) -> TrackingBehavior {
        self.tracking
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking == TrackingBehavior::TrackAll
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_track_all() {
        let o = DataOptions::default();
        assert_eq!(o.name(), "default");
        assert!(o.is_tracking());
    }

    #[test]
    fn builder_overrides() {
        let o = DataOptions::builder()
            .name("orders")
            .tracking(TrackingBehavior::NoTracking)
            .build();
        assert_eq!(o.name(), "orders");
        assert_eq!(o.tracking(), TrackingBehavior::NoTracking);
    }

    #[test]
    fn from_json_partial() {
        let o = DataOptions::from_json(r#"{ "tracking": "no_tracking" }"#).unwrap();
        assert_eq!(o.name(), "default");
        assert!(!o.is_tracking());

        let err = DataOptions::from_json(r#"{ "tracking": "sometimes" }"#).unwrap_err();
        assert!(matches!(err, crate::error::DomainError::Serde { .. }));
    }
}
