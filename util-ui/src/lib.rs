//! 界面标签生成（util-ui）
//!
//! - `config`：组件配置，按名称读取属性值与内容；
//! - `builders`：HTML 标签生成器；
//! - `render`：由配置生成标签的渲染器约定；
//! - `material`：Material 组件渲染器。
//!
pub mod builders;
pub mod config;
pub mod consts;
pub mod material;
pub mod render;

pub use builders::TagBuilder;
pub use config::Config;
pub use render::Render;
