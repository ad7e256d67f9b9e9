//! 侧边栏导航 `mat-sidenav`

use super::enums::XPosition;
use crate::builders::TagBuilder;
use crate::config::Config;
use crate::consts;
use crate::render::Render;
use std::ops::{Deref, DerefMut};

/// 侧边栏导航标签生成器
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideNavBuilder(TagBuilder);

impl SideNavBuilder {
    pub const TAG: &'static str = "mat-sidenav";

    pub fn new() -> Self {
        Self(TagBuilder::new(Self::TAG))
    }
}

impl Default for SideNavBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for SideNavBuilder {
    type Target = TagBuilder;

    fn deref(&self) -> &TagBuilder {
        &self.0
    }
}

impl DerefMut for SideNavBuilder {
    fn deref_mut(&mut self) -> &mut TagBuilder {
        &mut self.0
    }
}

impl From<SideNavBuilder> for TagBuilder {
    fn from(value: SideNavBuilder) -> Self {
        value.0
    }
}

/// 侧边栏导航渲染器
#[derive(Debug, Clone)]
pub struct SideNavRender {
    config: Config,
}

impl SideNavRender {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    fn configure(&self, builder: &mut TagBuilder) {
        self.config_id(builder);
        self.config_position(builder);
        self.config_opened(builder);
        self.config_content(builder);
    }

    /// 只有 `Left` 为 start，其余取值均为 end
    fn config_position(&self, builder: &mut TagBuilder) {
        if !self.config.contains(consts::POSITION) {
            return;
        }
        let left = self.config.get_value::<XPosition>(consts::POSITION) == Some(XPosition::Left);
        builder.add_attribute(consts::POSITION, if left { "start" } else { "end" });
    }

    fn config_opened(&self, builder: &mut TagBuilder) {
        builder.add_attribute(consts::OPENED, self.config.get_bool_value(consts::OPENED));
    }

    fn config_content(&self, builder: &mut TagBuilder) {
        if let Some(content) = self.config.content() {
            builder.set_content(content);
        }
    }
}

impl Render for SideNavRender {
    fn config(&self) -> &Config {
        &self.config
    }

    fn tag_builder(&self) -> TagBuilder {
        let mut builder = SideNavBuilder::new();
        self.configure(&mut builder);
        builder.into()
    }
}
