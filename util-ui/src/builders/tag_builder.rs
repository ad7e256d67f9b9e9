use std::fmt;

/// HTML 标签生成器
///
/// 属性按首次添加的顺序输出，重复添加同名属性时替换其值。
/// 属性值输出时转义，内容原样输出。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagBuilder {
    tag: String,
    attributes: Vec<(String, Option<String>)>,
    content: Option<String>,
}

impl TagBuilder {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            content: None,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn add_attribute(&mut self, name: impl Into<String>, value: impl fmt::Display) -> &mut Self {
        self.put(name.into(), Some(value.to_string()));
        self
    }

    /// 添加无值属性，如模板引用变量 `#nav`
    pub fn add_flag(&mut self, name: impl Into<String>) -> &mut Self {
        self.put(name.into(), None);
        self
    }

    fn put(&mut self, name: String, value: Option<String>) {
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|(n, _)| n == name)
    }

    /// 属性值；无值属性返回空串
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_deref().unwrap_or(""))
    }

    pub fn remove_attribute(&mut self, name: &str) -> &mut Self {
        self.attributes.retain(|(n, _)| n != name);
        self
    }

    pub fn set_content(&mut self, content: impl Into<String>) -> &mut Self {
        self.content = Some(content.into());
        self
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

fn escape(value: &str, out: &mut impl fmt::Write) -> fmt::Result {
    for c in value.chars() {
        match c {
            '&' => out.write_str("&amp;")?,
            '<' => out.write_str("&lt;")?,
            '>' => out.write_str("&gt;")?,
            '"' => out.write_str("&quot;")?,
            '\'' => out.write_str("&#39;")?,
            c => out.write_char(c)?,
        }
    }
    Ok(())
}

impl fmt::Display for TagBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for (name, value) in &self.attributes {
            write!(f, " {name}")?;
            if let Some(value) = value {
                f.write_str("=\"")?;
                escape(value, f)?;
                f.write_str("\"")?;
            }
        }
        write!(f, ">")?;
        if let Some(content) = &self.content {
            f.write_str(content)?;
        }
        write!(f, "</{}>", self.tag)
    }
}
