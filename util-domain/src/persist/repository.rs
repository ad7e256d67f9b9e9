//! 仓储（Repository）
//!
//! 面向单一实体类型的增删改查入口，所有写操作只在所属工作单元中暂存，
//! 直到工作单元提交。每个操作都提供可挂起版本与 `blocking_` 前缀的阻塞版本，二者语义一致。
//!
use crate::{
    entity::Entity,
    error::{DomainError, DomainResult as Result},
    persist::{AsyncStore, EntityKey, Lookup, SerializedEntity, Store, UnitOfWork},
    specification::Specification,
};
use std::marker::PhantomData;
use std::sync::Arc;

pub struct Repository<E, S> {
    uow: Arc<UnitOfWork<S>>,
    _marker: PhantomData<fn() -> E>,
}

impl<E, S> Clone for Repository<E, S> {
    fn clone(&self) -> Self {
        Self {
            uow: Arc::clone(&self.uow),
            _marker: PhantomData,
        }
    }
}

impl<E, S> Repository<E, S>
where
    E: Entity,
{
    pub fn new(uow: Arc<UnitOfWork<S>>) -> Self {
        Self {
            uow,
            _marker: PhantomData,
        }
    }

    /// 所属工作单元
    pub fn unit_of_work(&self) -> &Arc<UnitOfWork<S>> {
        &self.uow
    }

    /// 暂存新增，提交前不会写入存储
    pub async fn add(&self, entity: E) -> Result<()> {
        self.blocking_add(entity)
    }

    pub fn blocking_add(&self, entity: E) -> Result<()> {
        self.uow.stage_add(SerializedEntity::from_entity(&entity)?)
    }

    /// 暂存整体替换，提交时实体携带的版本令牌必须与存储一致
    pub async fn update(&self, entity: E) -> Result<()> {
        self.blocking_update(entity)
    }

    pub fn blocking_update(&self, entity: E) -> Result<()> {
        self.uow.stage_update(SerializedEntity::from_entity(&entity)?)
    }

    /// 按实体暂存删除，使用实体携带的版本令牌
    pub async fn remove(&self, entity: &E) -> Result<()> {
        self.blocking_remove(entity)
    }

    pub fn blocking_remove(&self, entity: &E) -> Result<()> {
        self.uow.stage_remove(SerializedEntity::from_entity(entity)?)
    }

    /// 把工作单元中跟踪的版本令牌写回实体。提交后令牌由存储重新生成，
    /// 调用方手中的实体可借此继续用于后续的更新或删除。
    /// 实体未被跟踪（或已暂存删除）时返回 `false`，实体保持不变。
    pub fn sync_version(&self, entity: &mut E) -> Result<bool> {
        match self.uow.lookup(&EntityKey::of::<E>(entity.id()))? {
            Lookup::Found(row) => {
                entity.set_version(row.version().clone());
                Ok(true)
            }
            Lookup::Removed | Lookup::Untracked => Ok(false),
        }
    }

    fn materialize(&self, row: Option<SerializedEntity>) -> Result<Option<E>> {
        row.map(|row| self.uow.attach(row, false)?.to_entity::<E>())
            .transpose()
    }

    fn select<P>(&self, rows: Vec<SerializedEntity>, spec: &P, limit: Option<usize>) -> Result<Vec<E>>
    where
        P: Specification<E> + ?Sized,
    {
        let mut out = Vec::new();
        for (row, tracked) in self.uow.overlay(rows)? {
            if limit.is_some_and(|n| out.len() >= n) {
                break;
            }
            let entity: E = row.to_entity()?;
            if !spec.is_satisfied_by(&entity) {
                continue;
            }
            if !tracked {
                self.uow.attach(row, false)?;
            }
            out.push(entity);
        }
        Ok(out)
    }

    fn matches<P>(&self, rows: Vec<SerializedEntity>, spec: &P) -> Result<bool>
    where
        P: Specification<E> + ?Sized,
    {
        for (row, _) in self.uow.overlay(rows)? {
            if spec.is_satisfied_by(&row.to_entity::<E>()?) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    // 直接修改路径：在已跟踪的实体上执行修改，标识不可变，令牌沿用加载时的值
    fn apply_modification<F>(&self, original: SerializedEntity, f: F) -> Result<()>
    where
        F: FnOnce(&mut E),
    {
        let before: E = original.to_entity()?;
        let mut entity = before.clone();
        f(&mut entity);

        if entity.id().to_string() != original.entity_id() {
            return Err(DomainError::invalid_state(format!(
                "entity id is immutable: type={}, id={}",
                E::TYPE,
                original.entity_id()
            )));
        }
        entity.set_version(original.version().clone());

        // 以重新序列化的原值作为比较基线，避免负载中的令牌字段造成误判
        let baseline = SerializedEntity::from_entity(&before)?;
        self.uow
            .stage_modify(&baseline, SerializedEntity::from_entity(&entity)?)
    }
}

impl<E, S> Repository<E, S>
where
    E: Entity,
    S: Store,
{
    fn blocking_load_tracked(&self, key: &EntityKey) -> Result<Option<SerializedEntity>> {
        match self.uow.lookup(key)? {
            Lookup::Found(row) => Ok(Some(row)),
            Lookup::Removed => Ok(None),
            Lookup::Untracked => Store::fetch(&**self.uow.store(), key)?
                .map(|row| self.uow.attach(row, true))
                .transpose(),
        }
    }

    /// 按标识查找；已跟踪时直接返回缓存状态
    pub fn blocking_find(&self, id: &E::Id) -> Result<Option<E>> {
        let key = EntityKey::of::<E>(id);
        match self.uow.lookup(&key)? {
            Lookup::Found(row) => Ok(Some(row.to_entity()?)),
            Lookup::Removed => Ok(None),
            Lookup::Untracked => {
                let row = Store::fetch(&**self.uow.store(), &key)?;
                self.materialize(row)
            }
        }
    }

    /// 返回第一个满足规约的实体，没有则返回 `None`
    pub fn blocking_single<P>(&self, spec: P) -> Result<Option<E>>
    where
        P: Specification<E>,
    {
        let rows = Store::fetch_all(&**self.uow.store(), E::TYPE)?;
        Ok(self.select(rows, &spec, Some(1))?.into_iter().next())
    }

    pub fn blocking_find_all<P>(&self, spec: P) -> Result<Vec<E>>
    where
        P: Specification<E>,
    {
        let rows = Store::fetch_all(&**self.uow.store(), E::TYPE)?;
        self.select(rows, &spec, None)
    }

    pub fn blocking_exists<P>(&self, spec: P) -> Result<bool>
    where
        P: Specification<E>,
    {
        let rows = Store::fetch_all(&**self.uow.store(), E::TYPE)?;
        self.matches(rows, &spec)
    }

    /// 加载并修改实体，负载变化时暂存更新。返回实体是否存在。
    pub fn blocking_modify<F>(&self, id: &E::Id, f: F) -> Result<bool>
    where
        F: FnOnce(&mut E),
    {
        let Some(original) = self.blocking_load_tracked(&EntityKey::of::<E>(id))? else {
            return Ok(false);
        };
        self.apply_modification(original, f)?;
        Ok(true)
    }

    /// 按标识暂存删除；标识不存在时不做任何事
    pub fn blocking_remove_by_id(&self, id: &E::Id) -> Result<()> {
        match self.blocking_load_tracked(&EntityKey::of::<E>(id))? {
            Some(row) => self.uow.stage_remove(row),
            None => Ok(()),
        }
    }
}

impl<E, S> Repository<E, S>
where
    E: Entity,
    S: AsyncStore,
{
    async fn load_tracked(&self, key: &EntityKey) -> Result<Option<SerializedEntity>> {
        match self.uow.lookup(key)? {
            Lookup::Found(row) => Ok(Some(row)),
            Lookup::Removed => Ok(None),
            Lookup::Untracked => AsyncStore::fetch(&**self.uow.store(), key)
                .await?
                .map(|row| self.uow.attach(row, true))
                .transpose(),
        }
    }

    pub async fn find(&self, id: &E::Id) -> Result<Option<E>> {
        let key = EntityKey::of::<E>(id);
        match self.uow.lookup(&key)? {
            Lookup::Found(row) => Ok(Some(row.to_entity()?)),
            Lookup::Removed => Ok(None),
            Lookup::Untracked => {
                let row = AsyncStore::fetch(&**self.uow.store(), &key).await?;
                self.materialize(row)
            }
        }
    }

    pub async fn single<P>(&self, spec: P) -> Result<Option<E>>
    where
        P: Specification<E>,
    {
        let rows = AsyncStore::fetch_all(&**self.uow.store(), E::TYPE).await?;
        Ok(self.select(rows, &spec, Some(1))?.into_iter().next())
    }

    pub async fn find_all<P>(&self, spec: P) -> Result<Vec<E>>
    where
        P: Specification<E>,
    {
        let rows = AsyncStore::fetch_all(&**self.uow.store(), E::TYPE).await?;
        self.select(rows, &spec, None)
    }

    pub async fn exists<P>(&self, spec: P) -> Result<bool>
    where
        P: Specification<E>,
    {
        let rows = AsyncStore::fetch_all(&**self.uow.store(), E::TYPE).await?;
        self.matches(rows, &spec)
    }

    pub async fn modify<F>(&self, id: &E::Id, f: F) -> Result<bool>
    where
        F: FnOnce(&mut E),
    {
        let Some(original) = self.load_tracked(&EntityKey::of::<E>(id)).await? else {
            return Ok(false);
        };
        self.apply_modification(original, f)?;
        Ok(true)
    }

    pub async fn remove_by_id(&self, id: &E::Id) -> Result<()> {
        match self.load_tracked(&EntityKey::of::<E>(id)).await? {
            Some(row) => self.uow.stage_remove(row),
            None => Ok(()),
        }
    }
}
