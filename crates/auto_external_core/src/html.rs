use std::fmt::{self, Write};

use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Str(String),
    /// `true` renders as a bare attribute, `false` omits it.
    Bool(bool),
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Str(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Str(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

pub type TagAttributes = IndexMap<String, AttrValue>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlTag {
    pub tag_name: String,
    pub attributes: TagAttributes,
    pub inner_html: Option<String>,
    /// Void elements (`<link>`, `<meta>`) have no closing tag.
    pub void_tag: bool,
}

impl HtmlTag {
    pub fn new<T: Into<String>>(tag_name: T) -> Self {
        let tag_name = tag_name.into();
        let void_tag = matches!(tag_name.as_str(), "link" | "meta" | "base");
        Self {
            tag_name,
            attributes: Default::default(),
            inner_html: None,
            void_tag,
        }
    }

    pub fn script_src<T: Into<String>>(src: T) -> Self {
        Self::new("script")
            .attr("type", "text/javascript")
            .attr("src", src.into())
    }

    pub fn inline_script<T: Into<String>>(code: T) -> Self {
        let mut tag = Self::new("script").attr("type", "text/javascript");
        tag.inner_html = Some(code.into());
        tag
    }

    pub fn stylesheet<T: Into<String>>(href: T) -> Self {
        Self::new("link")
            .attr("rel", "stylesheet")
            .attr("href", href.into())
    }

    pub fn attr<K: Into<String>, V: Into<AttrValue>>(mut self, key: K, value: V) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn get_attr(&self, key: &str) -> Option<&str> {
        match self.attributes.get(key)? {
            AttrValue::Str(value) => Some(value),
            AttrValue::Bool(true) => Some(""),
            AttrValue::Bool(false) => None,
        }
    }
}

impl fmt::Display for HtmlTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag_name)?;
        for (key, value) in &self.attributes {
            match value {
                AttrValue::Str(value) => write!(f, " {}=\"{}\"", key, escape_attr(value))?,
                AttrValue::Bool(true) => write!(f, " {}", key)?,
                AttrValue::Bool(false) => {}
            }
        }
        f.write_char('>')?;
        if self.void_tag {
            return Ok(());
        }
        if let Some(inner_html) = &self.inner_html {
            f.write_str(inner_html)?;
        }
        write!(f, "</{}>", self.tag_name)
    }
}

fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Tags a host collects for the generated document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetTagGroups {
    pub head_tags: Vec<HtmlTag>,
    pub body_tags: Vec<HtmlTag>,
}

impl AssetTagGroups {
    pub fn render_document(&self, title: &str) -> String {
        let mut html = String::from("<!DOCTYPE html>\n<html>\n  <head>\n");
        html.push_str("    <meta charset=\"utf-8\">\n");
        html.push_str(&format!("    <title>{}</title>\n", escape_attr(title)));
        self.head_tags
            .iter()
            .for_each(|tag| html.push_str(&format!("    {}\n", tag)));
        html.push_str("  </head>\n  <body>\n");
        self.body_tags
            .iter()
            .for_each(|tag| html.push_str(&format!("    {}\n", tag)));
        html.push_str("  </body>\n</html>\n");
        html
    }
}
