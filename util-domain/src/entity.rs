//! 实体（Entity）基础抽象
//!
//! 为实体提供统一的标识（Id）与版本令牌（optimistic concurrency）能力。
//!
use crate::value_object::VersionToken;
use serde::{Serialize, de::DeserializeOwned};
use std::fmt::Display;

/// 具备唯一标识与版本令牌的实体抽象
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// 实体类型名，作为存储中的分区键
    const TYPE: &'static str;

    /// 实体标识类型，显示形式作为存储键
    type Id: Clone + Display + Send + Sync;

    /// 使用给定标识创建实体，版本令牌为空
    fn new(id: Self::Id) -> Self;

    /// 获取实体标识
    fn id(&self) -> &Self::Id;

    /// 获取当前版本令牌（用于乐观并发控制）
    fn version(&self) -> &VersionToken;

    /// 覆盖版本令牌
    fn set_version(&mut self, version: VersionToken);
}
