//! 工作单元（UnitOfWork）
//!
//! 收集仓储暂存的新增/更新/删除，在显式 `commit` 时通过一次 `Store::apply` 原子提交。
//! 同时维护本单元内的实体缓存（identity map）：已加载的实体在 `clear_cache` 之前直接命中缓存。
//!
//! 一个工作单元只归属一个调用方作用域，不支持多线程并发地交错使用。
//!
use crate::error::{DomainError, DomainResult as Result};
use crate::options::DataOptions;
use crate::persist::{Applied, AsyncStore, Change, EntityKey, SerializedEntity, Store};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// 缓存条目的跟踪状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Unchanged,
    Added,
    Modified,
    Deleted,
}

#[derive(Debug, Clone)]
struct Entry {
    state: EntryState,
    // 对 Modified/Deleted 而言，行上的令牌即提交时的期望令牌
    row: SerializedEntity,
}

#[derive(Default)]
struct Session {
    entries: HashMap<EntityKey, Entry>,
    staged: Vec<EntityKey>,
    disposed: bool,
}

impl Session {
    fn stage(&mut self, key: EntityKey, state: EntryState, row: SerializedEntity) {
        if !self.staged.contains(&key) {
            self.staged.push(key.clone());
        }
        self.entries.insert(key, Entry { state, row });
    }

    fn unstage(&mut self, key: &EntityKey) {
        self.staged.retain(|k| k != key);
        self.entries.remove(key);
    }

    fn changes(&self) -> Vec<Change> {
        self.staged
            .iter()
            .filter_map(|key| self.entries.get(key).map(|entry| (key, entry)))
            .filter_map(|(key, entry)| match entry.state {
                EntryState::Added => Some(Change::Insert(entry.row.clone())),
                EntryState::Modified => Some(Change::Update(entry.row.clone())),
                EntryState::Deleted => Some(Change::Delete {
                    key: key.clone(),
                    expected: entry.row.version().clone(),
                }),
                EntryState::Unchanged => None,
            })
            .collect()
    }

    fn discard(&mut self, keys: &[EntityKey]) {
        for key in keys {
            self.unstage(key);
        }
    }

    fn accept(&mut self, keys: &[EntityKey], applied: Vec<Applied>) {
        self.staged.retain(|k| !keys.contains(k));
        for outcome in applied {
            match outcome {
                Applied::Inserted(row) | Applied::Updated(row) => {
                    self.entries.insert(
                        row.key(),
                        Entry {
                            state: EntryState::Unchanged,
                            row,
                        },
                    );
                }
                Applied::Deleted(key) => {
                    self.entries.remove(&key);
                }
            }
        }
    }
}

/// 缓存查找结果
#[derive(Debug)]
pub(crate) enum Lookup {
    /// 已跟踪且未被删除
    Found(SerializedEntity),
    /// 已跟踪但已暂存删除
    Removed,
    /// 未跟踪，需要回到存储读取
    Untracked,
}

/// 提交批次：参与提交的键与对应变更
struct Batch {
    keys: Vec<EntityKey>,
    changes: Vec<Change>,
}

pub struct UnitOfWork<S> {
    store: Arc<S>,
    options: DataOptions,
    session: Mutex<Session>,
}

impl<S> UnitOfWork<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_options(store, DataOptions::default())
    }

    pub fn with_options(store: Arc<S>, options: DataOptions) -> Self {
        Self {
            store,
            options,
            session: Mutex::new(Session::default()),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn options(&self) -> &DataOptions {
        &self.options
    }

    /// 是否存在尚未提交的变更
    pub fn has_changes(&self) -> bool {
        !self.session().staged.is_empty()
    }

    /// 暂存变更数量
    pub fn pending(&self) -> usize {
        self.session().staged.len()
    }

    /// 当前缓存中跟踪的实体数量（含暂存变更）
    pub fn tracked(&self) -> usize {
        self.session().entries.len()
    }

    /// 查询某个键的跟踪状态
    pub fn state_of(&self, key: &EntityKey) -> Option<EntryState> {
        self.session().entries.get(key).map(|e| e.state)
    }

    /// 清空本单元的实体缓存，之后的查找将重新从存储读取。
    /// 尚未提交的暂存变更一并丢弃。
    pub fn clear_cache(&self) {
        let mut session = self.session();
        let dropped = session.entries.len();
        session.entries.clear();
        session.staged.clear();
        tracing::debug!(uow = %self.options.name(), dropped, "unit of work cache cleared");
    }

    /// 释放工作单元：清空会话，后续操作返回 `InvalidState`
    pub fn dispose(&self) {
        let mut session = self.session();
        if session.disposed {
            return;
        }
        session.entries.clear();
        session.staged.clear();
        session.disposed = true;
        tracing::debug!(uow = %self.options.name(), "unit of work disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.session().disposed
    }

    // 会话只做内存簿记，锁中毒时继续使用内部数据
    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn open_session(&self) -> Result<MutexGuard<'_, Session>> {
        let session = self.session();
        if session.disposed {
            return Err(DomainError::invalid_state("unit of work disposed"));
        }
        Ok(session)
    }

    pub(crate) fn lookup(&self, key: &EntityKey) -> Result<Lookup> {
        let session = self.open_session()?;
        Ok(match session.entries.get(key) {
            Some(entry) if entry.state == EntryState::Deleted => Lookup::Removed,
            Some(entry) => Lookup::Found(entry.row.clone()),
            None => Lookup::Untracked,
        })
    }

    /// 挂接从存储加载的行。已跟踪时返回缓存中的行（同一标识只对应一份状态）；
    /// `force` 为 false 且配置为不跟踪时不写入缓存。
    pub(crate) fn attach(&self, row: SerializedEntity, force: bool) -> Result<SerializedEntity> {
        let mut session = self.open_session()?;
        let key = row.key();
        if let Some(entry) = session.entries.get(&key) {
            return Ok(entry.row.clone());
        }
        if force || self.options.is_tracking() {
            session.entries.insert(
                key,
                Entry {
                    state: EntryState::Unchanged,
                    row: row.clone(),
                },
            );
        }
        Ok(row)
    }

    /// 以缓存状态覆盖存储查询结果：暂存删除的行被隐藏，已跟踪的行替换为缓存中的版本。
    /// 返回值中的布尔值表示该行是否已被跟踪。
    pub(crate) fn overlay(
        &self,
        rows: Vec<SerializedEntity>,
    ) -> Result<Vec<(SerializedEntity, bool)>> {
        let session = self.open_session()?;
        Ok(rows
            .into_iter()
            .filter_map(|row| match session.entries.get(&row.key()) {
                Some(entry) if entry.state == EntryState::Deleted => None,
                Some(entry) => Some((entry.row.clone(), true)),
                None => Some((row, false)),
            })
            .collect())
    }

    pub(crate) fn stage_add(&self, row: SerializedEntity) -> Result<()> {
        let mut session = self.open_session()?;
        let key = row.key();
        if session.entries.contains_key(&key) {
            return Err(DomainError::AlreadyTracked {
                entity_type: key.entity_type().to_string(),
                entity_id: key.entity_id().to_string(),
            });
        }
        tracing::debug!(uow = %self.options.name(), %key, "staged insert");
        session.stage(key, EntryState::Added, row);
        Ok(())
    }

    pub(crate) fn stage_update(&self, row: SerializedEntity) -> Result<()> {
        let mut session = self.open_session()?;
        let key = row.key();
        let state = match session.entries.get(&key).map(|e| e.state) {
            Some(EntryState::Added) => EntryState::Added,
            _ => EntryState::Modified,
        };
        tracing::debug!(uow = %self.options.name(), %key, ?state, "staged update");
        session.stage(key, state, row);
        Ok(())
    }

    /// 直接修改路径：负载未变化时不暂存
    pub(crate) fn stage_modify(
        &self,
        original: &SerializedEntity,
        modified: SerializedEntity,
    ) -> Result<()> {
        if original.payload() == modified.payload() {
            return Ok(());
        }
        self.stage_update(modified)
    }

    pub(crate) fn stage_remove(&self, row: SerializedEntity) -> Result<()> {
        let mut session = self.open_session()?;
        let key = row.key();
        match session.entries.get(&key).map(|e| e.state) {
            // 从未持久化，撤销暂存即可
            Some(EntryState::Added) => session.unstage(&key),
            Some(EntryState::Deleted) => {}
            _ => {
                tracing::debug!(uow = %self.options.name(), %key, "staged delete");
                session.stage(key, EntryState::Deleted, row);
            }
        }
        Ok(())
    }

    fn begin_commit(&self) -> Result<Option<Batch>> {
        let session = self.open_session()?;
        if session.staged.is_empty() {
            return Ok(None);
        }
        Ok(Some(Batch {
            keys: session.staged.clone(),
            changes: session.changes(),
        }))
    }

    fn finish_commit(&self, keys: Vec<EntityKey>, outcome: Result<Vec<Applied>>) -> Result<usize> {
        let mut session = self.session();
        match outcome {
            Ok(applied) => {
                let affected = applied.len();
                session.accept(&keys, applied);
                tracing::debug!(uow = %self.options.name(), affected, "unit of work committed");
                Ok(affected)
            }
            Err(err) => {
                session.discard(&keys);
                tracing::warn!(
                    uow = %self.options.name(),
                    discarded = keys.len(),
                    error = %err,
                    "unit of work commit failed, staged changes discarded"
                );
                Err(err)
            }
        }
    }
}

impl<S> UnitOfWork<S>
where
    S: Store,
{
    /// 阻塞式提交，返回受影响的行数
    pub fn blocking_commit(&self) -> Result<usize> {
        let Some(Batch { keys, changes }) = self.begin_commit()? else {
            return Ok(0);
        };
        tracing::debug!(uow = %self.options.name(), staged = changes.len(), "committing unit of work");
        let outcome = Store::apply(&*self.store, changes);
        self.finish_commit(keys, outcome)
    }
}

impl<S> UnitOfWork<S>
where
    S: AsyncStore,
{
    /// 可挂起的提交，语义与 `blocking_commit` 相同
    pub async fn commit(&self) -> Result<usize> {
        let Some(Batch { keys, changes }) = self.begin_commit()? else {
            return Ok(0);
        };
        tracing::debug!(uow = %self.options.name(), staged = changes.len(), "committing unit of work");
        let outcome = AsyncStore::apply(&*self.store, changes).await;
        self.finish_commit(keys, outcome)
    }
}
