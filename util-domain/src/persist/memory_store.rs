//! 内存版存储（InMemoryStore）
//!
//! 基于 `RwLock<HashMap>` 的参考实现，满足 `Store` 协议：
//! - 提交时先在覆盖层上逐条校验，全部通过才写回底层表，保证原子性；
//! - 插入与更新写入时重新生成版本令牌；
//! - 典型用途：测试环境、示例与本地开发。
//!
use crate::error::{DomainError, DomainResult as Result};
use crate::persist::{Applied, Change, EntityKey, SerializedEntity, Store};
use crate::value_object::VersionToken;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

type Rows = HashMap<EntityKey, SerializedEntity>;

#[derive(Default)]
pub struct InMemoryStore {
    rows: RwLock<Rows>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    // 锁中毒时沿用内部数据：写入只在全部校验通过后发生，不会留下半成品
    fn read(&self) -> RwLockReadGuard<'_, Rows> {
        self.rows.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Rows> {
        self.rows.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn conflict(key: &EntityKey) -> DomainError {
    DomainError::Concurrency {
        entity_type: key.entity_type().to_string(),
        entity_id: key.entity_id().to_string(),
    }
}

impl Store for InMemoryStore {
    fn fetch(&self, key: &EntityKey) -> Result<Option<SerializedEntity>> {
        Ok(self.read().get(key).cloned())
    }

    fn fetch_all(&self, entity_type: &str) -> Result<Vec<SerializedEntity>> {
        let mut rows: Vec<SerializedEntity> = self
            .read()
            .values()
            .filter(|row| row.entity_type() == entity_type)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            a.persisted_at()
                .cmp(&b.persisted_at())
                .then_with(|| a.entity_id().cmp(b.entity_id()))
        });
        Ok(rows)
    }

    fn apply(&self, changes: Vec<Change>) -> Result<Vec<Applied>> {
        let mut rows = self.write();

        // 覆盖层：None 表示本批次内已删除
        let mut overlay: HashMap<EntityKey, Option<SerializedEntity>> = HashMap::new();
        let mut applied = Vec::with_capacity(changes.len());

        for change in changes {
            let key = change.key();
            let current = match overlay.get(&key) {
                Some(staged) => staged.as_ref(),
                None => rows.get(&key),
            };

            match change {
                Change::Insert(row) => {
                    if current.is_some() {
                        return Err(DomainError::DuplicateKey {
                            entity_type: key.entity_type().to_string(),
                            entity_id: key.entity_id().to_string(),
                        });
                    }
                    let row = row.stamp(VersionToken::generate());
                    overlay.insert(key, Some(row.clone()));
                    applied.push(Applied::Inserted(row));
                }
                Change::Update(row) => {
                    let next = match current {
                        Some(stored) if stored.version() == row.version() => {
                            stored.version().regenerate()
                        }
                        _ => return Err(conflict(&key)),
                    };
                    let row = row.stamp(next);
                    overlay.insert(key, Some(row.clone()));
                    applied.push(Applied::Updated(row));
                }
                Change::Delete { expected, .. } => {
                    match current {
                        Some(stored) if *stored.version() == expected => {}
                        _ => return Err(conflict(&key)),
                    }
                    overlay.insert(key.clone(), None);
                    applied.push(Applied::Deleted(key));
                }
            }
        }

        for (key, row) in overlay {
            match row {
                Some(row) => {
                    rows.insert(key, row);
                }
                None => {
                    rows.remove(&key);
                }
            }
        }

        tracing::debug!(changes = applied.len(), rows = rows.len(), "in-memory store applied batch");
        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(id: &str, version: VersionToken) -> SerializedEntity {
        SerializedEntity::builder()
            .entity_type("order".to_string())
            .entity_id(id.to_string())
            .version(version)
            .payload(json!({ "id": id, "code": "A" }))
            .build()
    }

    fn inserted_token(applied: &[Applied]) -> VersionToken {
        match &applied[0] {
            Applied::Inserted(row) => row.version().clone(),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn insert_generates_token() {
        let store = InMemoryStore::new();
        let applied = store
            .apply(vec![Change::Insert(row("o-1", VersionToken::default()))])
            .unwrap();
        let token = inserted_token(&applied);
        assert!(!token.is_empty());

        let stored = Store::fetch(&store, &EntityKey::new("order", "o-1"))
            .unwrap()
            .unwrap();
        assert_eq!(stored.version(), &token);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn duplicate_insert_fails() {
        let store = InMemoryStore::new();
        store
            .apply(vec![Change::Insert(row("o-1", VersionToken::default()))])
            .unwrap();
        let err = store
            .apply(vec![Change::Insert(row("o-1", VersionToken::default()))])
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateKey { .. }));
    }

    #[test]
    fn update_with_matching_token_regenerates() {
        let store = InMemoryStore::new();
        let applied = store
            .apply(vec![Change::Insert(row("o-1", VersionToken::default()))])
            .unwrap();
        let t1 = inserted_token(&applied);

        let applied = store.apply(vec![Change::Update(row("o-1", t1.clone()))]).unwrap();
        match &applied[0] {
            Applied::Updated(r) => assert_ne!(r.version(), &t1),
            other => panic!("unexpected {other:?}"),
        }

        // 旧令牌再次更新即冲突
        let err = store.apply(vec![Change::Update(row("o-1", t1))]).unwrap_err();
        assert!(err.is_concurrency());
    }

    #[test]
    fn update_missing_row_conflicts() {
        let store = InMemoryStore::new();
        let err = store
            .apply(vec![Change::Update(row("ghost", VersionToken::generate()))])
            .unwrap_err();
        assert!(err.is_concurrency());
    }

    #[test]
    fn failed_batch_writes_nothing() {
        let store = InMemoryStore::new();
        let err = store
            .apply(vec![
                Change::Insert(row("o-1", VersionToken::default())),
                Change::Update(row("o-2", VersionToken::generate())),
            ])
            .unwrap_err();
        assert!(err.is_concurrency());
        assert!(store.is_empty());
    }

    #[test]
    fn batch_sees_earlier_changes() {
        let store = InMemoryStore::new();
        let applied = store
            .apply(vec![
                Change::Insert(row("o-1", VersionToken::default())),
                Change::Insert(row("o-2", VersionToken::default())),
            ])
            .unwrap();
        assert_eq!(applied.len(), 2);
        let t1 = inserted_token(&applied);

        store
            .apply(vec![
                Change::Delete {
                    key: EntityKey::new("order", "o-1"),
                    expected: t1,
                },
                Change::Insert(row("o-1", VersionToken::default())),
            ])
            .unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(Store::fetch_all(&store, "order").unwrap().len(), 2);
        assert!(Store::fetch_all(&store, "customer").unwrap().is_empty());
    }

    #[test]
    fn delete_with_stale_token_conflicts() {
        let store = InMemoryStore::new();
        store
            .apply(vec![Change::Insert(row("o-1", VersionToken::default()))])
            .unwrap();
        let err = store
            .apply(vec![Change::Delete {
                key: EntityKey::new("order", "o-1"),
                expected: VersionToken::generate(),
            }])
            .unwrap_err();
        assert!(err.is_concurrency());
        assert_eq!(store.len(), 1);

        store.clear();
        assert!(store.is_empty());
    }
}
