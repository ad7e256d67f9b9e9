//! 数据访问领域层基础库（util-domain）
//!
//! 提供以仓储与工作单元为中心的通用抽象与构件，用于在应用中实现：
//! - 实体（`entity`）建模：唯一标识 + 乐观并发版本令牌（`value_object::VersionToken`）
//! - 规约（`specification`）：可组合的查询谓词
//! - 持久化协议（`persist`）：存储接口、内存存储、工作单元与仓储
//! - 数据访问配置（`options`）与统一错误类型（`error`）
//!
//! 本 crate 与具体数据库实现解耦，仅定义存储协议（`persist::Store` / `persist::AsyncStore`）
//! 并自带一个内存实现，便于在不同基础设施上进行适配。
//!
//! 典型用法：
//! 1. 使用 `#[entity]` 定义实体；
//! 2. 选择存储实现并创建 `UnitOfWork`；
//! 3. 通过 `Repository` 暂存新增/更新/删除，最后调用 `commit` 一次性提交；
//! 4. 版本令牌不一致时提交失败并返回 `DomainError::Concurrency`，由调用方重新加载后重试。
//!
pub mod entity;
pub mod error;
pub mod options;
pub mod persist;
pub mod specification;
pub mod value_object;

// 允许在本 crate 内部通过 ::util_domain 进行自引用，
// 以便过程宏在本 crate 的单元测试中也能解析到 ::util_domain 路径。
extern crate self as util_domain;
