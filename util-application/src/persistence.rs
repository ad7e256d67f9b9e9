//! 数据访问服务装配
//!
//! 将存储、工作单元与仓储注册到容器：
//! - 存储为单例，所有作用域共享；
//! - 工作单元为作用域服务，作用域结束时释放；
//! - 仓储为作用域服务，与同一作用域内的工作单元共享会话。
//!
use crate::container::{Container, Dispose, Module};
use crate::error::AppError;
use std::sync::Arc;
use util_domain::entity::Entity;
use util_domain::options::DataOptions;
use util_domain::persist::{Repository, UnitOfWork};

type RegisterFn = Box<dyn Fn(&Container) -> Result<(), AppError> + Send + Sync>;

impl<S> Dispose for UnitOfWork<S>
where
    S: Send + Sync,
{
    fn dispose(&self) {
        UnitOfWork::dispose(self);
    }
}

pub struct PersistenceModule<S> {
    store: Arc<S>,
    options: DataOptions,
    repositories: Vec<RegisterFn>,
}

impl<S> PersistenceModule<S>
where
    S: Send + Sync + 'static,
{
    pub fn new(store: S) -> Self {
        Self::with_store(Arc::new(store))
    }

    /// 使用外部共享的存储实例
    pub fn with_store(store: Arc<S>) -> Self {
        Self {
            store,
            options: DataOptions::default(),
            repositories: Vec::new(),
        }
    }

    pub fn options(mut self, options: DataOptions) -> Self {
        self.options = options;
        self
    }

    /// 为实体类型注册仓储
    pub fn with_repository<E>(mut self) -> Self
    where
        E: Entity,
    {
        self.repositories.push(Box::new(|container: &Container| {
            container.register_scoped(|scope| {
                Ok(Repository::<E, S>::new(scope.create::<UnitOfWork<S>>()?))
            })
        }));
        self
    }
}

impl<S> Module for PersistenceModule<S>
where
    S: Send + Sync + 'static,
{
    fn register(&self, container: &Container) -> Result<(), AppError> {
        container.register_instance(Arc::clone(&self.store))?;

        let options = self.options.clone();
        container.register_scoped_disposable(move |scope| {
            Ok(UnitOfWork::with_options(
                scope.create::<S>()?,
                options.clone(),
            ))
        })?;

        for register in &self.repositories {
            register(container)?;
        }
        Ok(())
    }
}
