//! 配置项名称

pub const ID: &str = "id";
pub const POSITION: &str = "position";
pub const OPENED: &str = "opened";
