//! 数据访问层过程宏
//!
//! - `#[entity]`：为具名字段结构体补齐 `id` 与版本令牌字段，并实现 `Entity`
//! - `#[entity_id]`：为单字段 tuple struct 生成标识类型常用实现
//! - `#[value_object]`：为值对象合并常用派生
//!
use proc_macro::TokenStream;

mod entity;
mod entity_id;
mod support;
mod value_object;

/// 实体宏
/// - 追加字段：`id: IdType`, `version: VersionToken`（若缺失）并置于字段最前
/// - 自动实现 `::util_domain::entity::Entity`（`TYPE/new/id/version/set_version`）
/// - 支持参数：`#[entity(id = IdType, name = "order")]`
#[proc_macro_attribute]
pub fn entity(attr: TokenStream, item: TokenStream) -> TokenStream {
    entity::expand(attr, item)
}

/// 实体 ID 宏
/// 用于 `struct OrderId(Uuid);` 形式的标识类型，生成 `new`、`Display`、`FromStr` 与转换实现。
#[proc_macro_attribute]
pub fn entity_id(attr: TokenStream, item: TokenStream) -> TokenStream {
    entity_id::expand(attr, item)
}

/// 值对象宏：合并值语义所需的派生
#[proc_macro_attribute]
pub fn value_object(attr: TokenStream, item: TokenStream) -> TokenStream {
    value_object::expand(attr, item)
}
