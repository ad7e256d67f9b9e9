//! Material 组件

pub mod enums;
pub mod side_nav;

pub use enums::XPosition;
pub use side_nav::{SideNavBuilder, SideNavRender};
