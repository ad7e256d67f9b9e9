use crate::builders::TagBuilder;
use crate::config::Config;
use crate::consts;

/// 渲染器：由配置生成标签
pub trait Render {
    fn config(&self) -> &Config;

    fn tag_builder(&self) -> TagBuilder;

    fn render(&self) -> String {
        let builder = self.tag_builder();
        tracing::trace!(tag = builder.tag(), "render");
        builder.to_string()
    }

    /// 配置标识，输出为模板引用变量 `#id`
    fn config_id(&self, builder: &mut TagBuilder) {
        if let Some(id) = self.config().get_value::<String>(consts::ID) {
            builder.add_flag(format!("#{id}"));
        }
    }
}
