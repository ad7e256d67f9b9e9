//! 持久化（persist）
//!
//! 定义存储协议、工作单元与仓储，支持：
//! - 序列化实体记录与存储键（`SerializedEntity`、`EntityKey`）；
//! - 阻塞/可挂起两套存储协议（`Store`、`AsyncStore`）及内存实现（`InMemoryStore`）；
//! - 基于版本令牌的乐观并发：提交时令牌不一致即整体失败；
//! - 工作单元（`UnitOfWork`）批量暂存并原子提交，维护本单元内的实体缓存；
//! - 面向实体类型的仓储（`Repository`）。
//!
//! 该模块聚焦协议与装配逻辑，具体存储后端（如关系型数据库）由上层提供实现并注入。
//!
mod memory_store;
mod repository;
mod serialized_entity;
mod store;
mod unit_of_work;

pub use memory_store::InMemoryStore;
pub use repository::Repository;
pub use serialized_entity::{EntityKey, SerializedEntity};
pub use store::{Applied, AsyncStore, Change, Store};
pub use unit_of_work::{EntryState, UnitOfWork};

pub(crate) use unit_of_work::Lookup;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use crate::error::DomainError;
    use util_macros::{entity, entity_id};
    use uuid::Uuid;

    #[entity_id]
    struct UserId(Uuid);

    #[entity(id = UserId, name = "user")]
    struct User {
        name: String,
    }

    #[entity(id = UserId, name = "profile")]
    struct Profile {}

    #[test]
    fn serialized_entity_roundtrip_keeps_row_token() {
        let mut u = User::new(UserId::new(Uuid::new_v4()));
        u.name = "alice".into();

        let row = SerializedEntity::from_entity(&u).unwrap();
        assert_eq!(row.entity_type(), User::TYPE);
        assert_eq!(row.entity_id(), u.id().to_string());
        assert!(row.version().is_empty());

        let token = crate::value_object::VersionToken::generate();
        let restored: User = row.stamp(token.clone()).to_entity().unwrap();
        assert_eq!(restored.name, "alice");
        assert_eq!(restored.id(), u.id());
        assert_eq!(restored.version(), &token);
    }

    #[test]
    fn serialized_entity_type_check() {
        let u = User::new(UserId::new(Uuid::new_v4()));
        let row = SerializedEntity::from_entity(&u).unwrap();

        // 类型不匹配应报错
        let err = row.to_entity::<Profile>().unwrap_err();
        match err {
            DomainError::TypeMismatch { expected, found } => {
                assert_eq!(expected, "profile");
                assert_eq!(found, "user");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn entity_key_display() {
        let id = UserId::new(Uuid::nil());
        let key = EntityKey::of::<User>(&id);
        assert_eq!(key.entity_type(), "user");
        assert_eq!(key.to_string(), format!("user:{}", Uuid::nil()));
    }
}
