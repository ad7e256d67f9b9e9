use crate::{
    entity::Entity,
    error::{DomainError, DomainResult as Result},
    value_object::VersionToken,
};
use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// 存储中一行实体记录的键
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityKey {
    entity_type: String,
    entity_id: String,
}

impl EntityKey {
    pub fn new(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
        }
    }

    pub fn of<E: Entity>(id: &E::Id) -> Self {
        Self::new(E::TYPE, id.to_string())
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.entity_type, self.entity_id)
    }
}

/// 序列化后的实体记录
///
/// 行上的 `version` 为权威版本令牌，反序列化时覆盖负载中的同名字段。
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
pub struct SerializedEntity {
    entity_type: String,
    entity_id: String,
    #[builder(default)]
    version: VersionToken,
    #[builder(default = Utc::now())]
    persisted_at: DateTime<Utc>,
    payload: Value,
}

impl SerializedEntity {
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub fn version(&self) -> &VersionToken {
        &self.version
    }

    pub fn persisted_at(&self) -> DateTime<Utc> {
        self.persisted_at
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn key(&self) -> EntityKey {
        EntityKey::new(self.entity_type.clone(), self.entity_id.clone())
    }

    /// 由存储在写入时调用：换上新令牌并刷新时间戳
    pub fn stamp(mut self, version: VersionToken) -> Self {
        self.version = version;
        self.persisted_at = Utc::now();
        self
    }

    /// 将记录反序列化为实体实例
    pub fn to_entity<E>(&self) -> Result<E>
    where
        E: Entity,
    {
        if E::TYPE != self.entity_type {
            return Err(DomainError::TypeMismatch {
                expected: E::TYPE.to_string(),
                found: self.entity_type.clone(),
            });
        }

        let mut entity: E = serde_json::from_value(self.payload.clone())?;
        entity.set_version(self.version.clone());
        Ok(entity)
    }

    /// 从实体实例创建记录，版本令牌取自实体本身
    pub fn from_entity<E>(entity: &E) -> Result<Self>
    where
        E: Entity,
    {
        Ok(Self {
            entity_type: E::TYPE.to_string(),
            entity_id: entity.id().to_string(),
            version: entity.version().clone(),
            persisted_at: Utc::now(),
            payload: serde_json::to_value(entity)?,
        })
    }
}
