//! 存储协议
//!
//! 工作单元只通过该协议访问持久化存储。`Store` 为阻塞式接口，
//! `AsyncStore` 为可挂起接口；任何 `Store` 自动获得 `AsyncStore` 实现。
//!
use crate::{
    error::DomainResult as Result,
    persist::{EntityKey, SerializedEntity},
    value_object::VersionToken,
};
use async_trait::async_trait;

/// 一次提交中的单条变更
#[derive(Debug, Clone)]
pub enum Change {
    /// 插入新行，令牌由存储生成
    Insert(SerializedEntity),
    /// 替换整行，行上的令牌为期望令牌
    Update(SerializedEntity),
    /// 删除一行
    Delete {
        key: EntityKey,
        expected: VersionToken,
    },
}

impl Change {
    pub fn key(&self) -> EntityKey {
        match self {
            Change::Insert(row) | Change::Update(row) => row.key(),
            Change::Delete { key, .. } => key.clone(),
        }
    }
}

/// 存储对一条变更的执行结果
#[derive(Debug, Clone)]
pub enum Applied {
    Inserted(SerializedEntity),
    Updated(SerializedEntity),
    Deleted(EntityKey),
}

/// 阻塞式存储接口
pub trait Store: Send + Sync {
    /// 按键读取一行，不存在返回 `None`
    fn fetch(&self, key: &EntityKey) -> Result<Option<SerializedEntity>>;

    /// 读取某实体类型的全部行
    fn fetch_all(&self, entity_type: &str) -> Result<Vec<SerializedEntity>>;

    /// 原子地应用一批变更：全部校验通过后才写入，否则不产生任何影响。
    /// 插入与更新成功后行上的令牌被重新生成。
    fn apply(&self, changes: Vec<Change>) -> Result<Vec<Applied>>;
}

/// 可挂起的存储接口，语义与 `Store` 相同
#[async_trait]
pub trait AsyncStore: Send + Sync {
    async fn fetch(&self, key: &EntityKey) -> Result<Option<SerializedEntity>>;

    async fn fetch_all(&self, entity_type: &str) -> Result<Vec<SerializedEntity>>;

    async fn apply(&self, changes: Vec<Change>) -> Result<Vec<Applied>>;
}

#[async_trait]
impl<T> AsyncStore for T
where
    T: Store + ?Sized,
{
    async fn fetch(&self, key: &EntityKey) -> Result<Option<SerializedEntity>> {
        Store::fetch(self, key)
    }

    async fn fetch_all(&self, entity_type: &str) -> Result<Vec<SerializedEntity>> {
        Store::fetch_all(self, entity_type)
    }

    async fn apply(&self, changes: Vec<Change>) -> Result<Vec<Applied>> {
        Store::apply(self, changes)
    }
}
