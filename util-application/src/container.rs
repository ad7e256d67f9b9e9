use crate::error::AppError;
use dashmap::DashMap;
use std::any::{Any, TypeId, type_name};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

type Instance = Arc<dyn Any + Send + Sync>;

type FactoryFn = Arc<dyn Fn(&Scope) -> Result<Instance, AppError> + Send + Sync>;

type DisposeFn = Arc<dyn Fn(&Instance) + Send + Sync>;

/// 服务生命周期
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// 整个容器共享一个实例
    Singleton,
    /// 每个作用域一个实例，作用域结束时释放
    Scoped,
    /// 每次解析都创建新实例
    Transient,
}

/// 需要在作用域结束时释放资源的服务
pub trait Dispose: Send + Sync {
    fn dispose(&self);
}

/// 配置模块：将一组相关服务注册到容器
pub trait Module {
    fn register(&self, container: &Container) -> Result<(), AppError>;
}

#[derive(Clone)]
struct Registration {
    name: &'static str,
    lifetime: Lifetime,
    factory: FactoryFn,
    dispose: Option<DisposeFn>,
}

/// 依赖注入容器
/// - 通过 TypeId 注册服务工厂
/// - 运行时以类型擦除（Any）方式创建实例，并在解析端还原类型
#[derive(Default)]
pub struct Container {
    registrations: DashMap<TypeId, Registration>,
    singletons: DashMap<TypeId, Instance>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由一组配置模块构建容器
    pub fn from_modules(modules: &[&dyn Module]) -> Result<Arc<Self>, AppError> {
        let container = Self::new();
        for module in modules {
            module.register(&container)?;
        }
        Ok(Arc::new(container))
    }

    fn insert(&self, key: TypeId, registration: Registration) -> Result<(), AppError> {
        if self.registrations.contains_key(&key) {
            return Err(AppError::AlreadyRegistered {
                service: registration.name,
            });
        }
        tracing::debug!(service = registration.name, lifetime = ?registration.lifetime, "service registered");
        self.registrations.insert(key, registration);
        Ok(())
    }

    fn boxed_factory<T, F>(factory: F) -> FactoryFn
    where
        T: Send + Sync + 'static,
        F: Fn(&Scope) -> Result<T, AppError> + Send + Sync + 'static,
    {
        Arc::new(move |scope| factory(scope).map(|value| Arc::new(value) as Instance))
    }

    /// 注册已有实例为单例
    pub fn register_instance<T>(&self, value: Arc<T>) -> Result<(), AppError>
    where
        T: Send + Sync + 'static,
    {
        let key = TypeId::of::<T>();
        let instance: Instance = value;
        let shared = instance.clone();
        self.insert(
            key,
            Registration {
                name: type_name::<T>(),
                lifetime: Lifetime::Singleton,
                factory: Arc::new(move |_| Ok(shared.clone())),
                dispose: None,
            },
        )?;
        self.singletons.insert(key, instance);
        Ok(())
    }

    pub fn register_singleton<T>(&self, value: T) -> Result<(), AppError>
    where
        T: Send + Sync + 'static,
    {
        self.register_instance(Arc::new(value))
    }

    pub fn register_scoped<T, F>(&self, factory: F) -> Result<(), AppError>
    where
        T: Send + Sync + 'static,
        F: Fn(&Scope) -> Result<T, AppError> + Send + Sync + 'static,
    {
        self.insert(
            TypeId::of::<T>(),
            Registration {
                name: type_name::<T>(),
                lifetime: Lifetime::Scoped,
                factory: Self::boxed_factory(factory),
                dispose: None,
            },
        )
    }

    /// 注册作用域服务，作用域结束时调用其 `Dispose::dispose`
    pub fn register_scoped_disposable<T, F>(&self, factory: F) -> Result<(), AppError>
    where
        T: Dispose + 'static,
        F: Fn(&Scope) -> Result<T, AppError> + Send + Sync + 'static,
    {
        let dispose: DisposeFn = Arc::new(|instance: &Instance| {
            if let Some(service) = (**instance).downcast_ref::<T>() {
                service.dispose();
            }
        });
        self.insert(
            TypeId::of::<T>(),
            Registration {
                name: type_name::<T>(),
                lifetime: Lifetime::Scoped,
                factory: Self::boxed_factory(factory),
                dispose: Some(dispose),
            },
        )
    }

    pub fn register_transient<T, F>(&self, factory: F) -> Result<(), AppError>
    where
        T: Send + Sync + 'static,
        F: Fn(&Scope) -> Result<T, AppError> + Send + Sync + 'static,
    {
        self.insert(
            TypeId::of::<T>(),
            Registration {
                name: type_name::<T>(),
                lifetime: Lifetime::Transient,
                factory: Self::boxed_factory(factory),
                dispose: None,
            },
        )
    }

    pub fn is_registered<T: 'static>(&self) -> bool {
        self.registrations.contains_key(&TypeId::of::<T>())
    }

    /// 创建解析作用域
    pub fn create_scope(self: &Arc<Self>) -> Scope {
        Scope {
            container: Arc::clone(self),
            instances: DashMap::new(),
            disposables: Mutex::new(Vec::new()),
            disposed: AtomicBool::new(false),
        }
    }
}

/// 解析作用域
///
/// 作用域服务在同一作用域内只创建一次；作用域被释放（`dispose` 或 drop）时，
/// 按创建的逆序调用可释放服务的释放钩子，且只调用一次。
pub struct Scope {
    container: Arc<Container>,
    instances: DashMap<TypeId, Instance>,
    disposables: Mutex<Vec<(&'static str, Instance, DisposeFn)>>,
    disposed: AtomicBool,
}

impl Scope {
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// 解析服务实例
    pub fn create<T>(&self) -> Result<Arc<T>, AppError>
    where
        T: Send + Sync + 'static,
    {
        if self.is_disposed() {
            return Err(AppError::ScopeDisposed);
        }

        let key = TypeId::of::<T>();
        // 先克隆注册信息再调用工厂，工厂内部可能继续解析其他服务
        let Some(registration) = self.container.registrations.get(&key).map(|r| r.clone()) else {
            return Err(AppError::ServiceNotRegistered(type_name::<T>()));
        };

        let instance = match registration.lifetime {
            Lifetime::Singleton => self.resolve_singleton(key, &registration)?,
            Lifetime::Scoped => self.resolve_scoped(key, &registration)?,
            Lifetime::Transient => (registration.factory)(self)?,
        };

        instance
            .downcast::<T>()
            .map_err(|_| AppError::TypeMismatch {
                expected: type_name::<T>(),
                found: registration.name,
            })
    }

    fn resolve_singleton(&self, key: TypeId, registration: &Registration) -> Result<Instance, AppError> {
        if let Some(existing) = self.container.singletons.get(&key).map(|i| i.clone()) {
            return Ok(existing);
        }
        let created = (registration.factory)(self)?;
        Ok(self
            .container
            .singletons
            .entry(key)
            .or_insert(created)
            .clone())
    }

    fn resolve_scoped(&self, key: TypeId, registration: &Registration) -> Result<Instance, AppError> {
        if let Some(existing) = self.instances.get(&key).map(|i| i.clone()) {
            return Ok(existing);
        }
        let created = (registration.factory)(self)?;
        self.instances.insert(key, created.clone());
        if let Some(dispose) = &registration.dispose {
            self.disposables
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push((registration.name, created.clone(), Arc::clone(dispose)));
        }
        tracing::debug!(service = registration.name, "scoped service created");
        Ok(created)
    }

    /// 释放作用域内的可释放服务（逆序，仅一次）
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        let disposables =
            std::mem::take(&mut *self.disposables.lock().unwrap_or_else(PoisonError::into_inner));
        for (name, instance, dispose) in disposables.into_iter().rev() {
            dispose(&instance);
            tracing::debug!(service = name, "scoped service disposed");
        }
        self.instances.clear();
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct Clock(u64);

    struct Connection {
        id: usize,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Dispose for Connection {
        fn dispose(&self) {
            self.log.lock().unwrap().push(format!("conn-{}", self.id));
        }
    }

    struct Session {
        conn: Arc<Connection>,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Dispose for Session {
        fn dispose(&self) {
            self.log.lock().unwrap().push("session".to_string());
        }
    }

    fn container(log: Arc<Mutex<Vec<String>>>) -> Arc<Container> {
        let counter = Arc::new(AtomicUsize::new(0));
        let c = Container::new();
        c.register_singleton(Clock(42)).unwrap();
        let conn_log = log.clone();
        c.register_scoped_disposable(move |_| {
            Ok(Connection {
                id: counter.fetch_add(1, Ordering::SeqCst),
                log: conn_log.clone(),
            })
        })
        .unwrap();
        c.register_scoped_disposable(move |scope| {
            Ok(Session {
                conn: scope.create::<Connection>()?,
                log: log.clone(),
            })
        })
        .unwrap();
        Arc::new(c)
    }

    #[test]
    fn scoped_instances_are_shared_within_scope() {
        let c = container(Arc::default());
        let scope = c.create_scope();
        let a = scope.create::<Connection>().unwrap();
        let b = scope.create::<Connection>().unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        let session = scope.create::<Session>().unwrap();
        assert!(Arc::ptr_eq(&session.conn, &a));

        let other = c.create_scope();
        assert_ne!(other.create::<Connection>().unwrap().id, a.id);
    }

    #[test]
    fn singletons_are_shared_across_scopes() {
        let c = container(Arc::default());
        let s1 = c.create_scope();
        let s2 = c.create_scope();
        let a = s1.create::<Clock>().unwrap();
        let b = s2.create::<Clock>().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.0, 42);
    }

    #[test]
    fn transient_always_new() {
        let c = Container::new();
        c.register_transient(|_| Ok(String::from("x"))).unwrap();
        let c = Arc::new(c);
        let scope = c.create_scope();
        let a = scope.create::<String>().unwrap();
        let b = scope.create::<String>().unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn dispose_runs_in_reverse_order_once() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let c = container(log.clone());
        {
            let scope = c.create_scope();
            scope.create::<Session>().unwrap();
            scope.dispose();
            assert!(scope.is_disposed());
            assert!(matches!(
                scope.create::<Clock>(),
                Err(AppError::ScopeDisposed)
            ));
        }
        // drop 后不会再次释放
        assert_eq!(*log.lock().unwrap(), vec!["session", "conn-0"]);
    }

    #[test]
    fn drop_disposes_scope() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let c = container(log.clone());
        {
            let scope = c.create_scope();
            scope.create::<Connection>().unwrap();
        }
        assert_eq!(*log.lock().unwrap(), vec!["conn-0"]);
    }

    #[test]
    fn unknown_and_duplicate_registrations() {
        let c = Container::new();
        c.register_singleton(Clock(1)).unwrap();
        let err = c.register_singleton(Clock(2)).unwrap_err();
        assert!(matches!(err, AppError::AlreadyRegistered { .. }));
        assert!(c.is_registered::<Clock>());

        let c = Arc::new(c);
        let scope = c.create_scope();
        let err = scope.create::<String>().unwrap_err();
        assert!(matches!(err, AppError::ServiceNotRegistered(_)));
    }

    struct CountModule;
    impl Module for CountModule {
        fn register(&self, container: &Container) -> Result<(), AppError> {
            container.register_singleton(7usize)
        }
    }

    #[test]
    fn from_modules_registers_all() {
        let c = Container::from_modules(&[&CountModule]).unwrap();
        let scope = c.create_scope();
        assert_eq!(*scope.create::<usize>().unwrap(), 7);

        assert!(matches!(
            Container::from_modules(&[&CountModule, &CountModule]),
            Err(AppError::AlreadyRegistered { .. })
        ));
    }
}
