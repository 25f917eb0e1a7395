use std::{fmt, sync::Arc};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{CheckIgnore, ResolveArgs, UsageSet};

/// Externalizable modules keyed by the name they are imported with. Insertion
/// order is the default script order.
pub type ExternalsMap = IndexMap<String, ExternalSpec>;

pub type SortFn = Arc<dyn Fn(Vec<String>) -> Vec<String> + Send + Sync>;
pub type TagAttrsFn = Arc<dyn Fn(&str) -> serde_json::Value + Send + Sync>;
pub type CheckIgnoreFn = Arc<
    dyn Fn(&ResolveArgs<'_>, &str, &ExternalsMap, &UsageSet, &[String]) -> CheckIgnore
        + Send
        + Sync,
>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub var_name: Option<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css: Option<CssSpec>,
}

impl ExternalSpec {
    pub fn new<T: Into<String>>(url: T) -> Self {
        Self {
            var_name: None,
            url: url.into(),
            css: None,
        }
    }

    pub fn with_var_name<T: Into<String>>(mut self, var_name: T) -> Self {
        self.var_name = Some(var_name.into());
        self
    }

    pub fn with_css(mut self, css: CssSpec) -> Self {
        self.css = Some(css);
        self
    }

    /// Global variable the library installs itself under. Falls back to the
    /// module name when `varName` is missing or empty.
    pub fn global_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.var_name
            .as_deref()
            .filter(|var_name| !var_name.is_empty())
            .unwrap_or(name)
    }

    pub fn css_urls(&self) -> Vec<String> {
        flatten_css([self.css.as_ref()])
    }
}

/// A stylesheet url, or a (possibly nested, possibly sparse) list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CssSpec {
    Url(String),
    List(Vec<Option<CssSpec>>),
}

impl From<&str> for CssSpec {
    fn from(url: &str) -> Self {
        CssSpec::Url(url.to_string())
    }
}

impl<T: Into<String>> From<Vec<T>> for CssSpec {
    fn from(urls: Vec<T>) -> Self {
        CssSpec::List(
            urls.into_iter()
                .map(|url| Some(CssSpec::Url(url.into())))
                .collect(),
        )
    }
}

impl CssSpec {
    fn flatten_into(&self, out: &mut Vec<String>) {
        match self {
            CssSpec::Url(url) => {
                if !url.is_empty() {
                    out.push(url.clone());
                }
            }
            CssSpec::List(items) => items
                .iter()
                .flatten()
                .for_each(|item| item.flatten_into(out)),
        }
    }
}

/// Flattens css entries into one ordered url list, dropping missing entries
/// and empty urls.
pub fn flatten_css<'a, I>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = Option<&'a CssSpec>>,
{
    let mut urls = vec![];
    entries
        .into_iter()
        .flatten()
        .for_each(|css| css.flatten_into(&mut urls));
    urls
}

/// The JSON-representable part of the options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawOptions {
    pub externals: ExternalsMap,
    pub required: Vec<String>,
    pub inject_loader: Option<bool>,
}

#[derive(Clone)]
pub struct AutoExternalOptions {
    pub externals: ExternalsMap,
    pub required: Vec<String>,
    pub sort_js: Option<SortFn>,
    pub sort_css: Option<SortFn>,
    pub get_tag_attrs: Option<TagAttrsFn>,
    pub check_ignore: Option<CheckIgnoreFn>,
    pub inject_loader: bool,
}

impl Default for AutoExternalOptions {
    fn default() -> Self {
        Self {
            externals: Default::default(),
            required: Default::default(),
            sort_js: None,
            sort_css: None,
            get_tag_attrs: None,
            check_ignore: None,
            inject_loader: true,
        }
    }
}

impl From<RawOptions> for AutoExternalOptions {
    fn from(raw: RawOptions) -> Self {
        Self {
            externals: raw.externals,
            required: raw.required,
            inject_loader: raw.inject_loader.unwrap_or(true),
            ..Default::default()
        }
    }
}

impl AutoExternalOptions {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<RawOptions>(json).map(Into::into)
    }

    pub fn with_sort_js<F>(mut self, sort: F) -> Self
    where
        F: Fn(Vec<String>) -> Vec<String> + Send + Sync + 'static,
    {
        self.sort_js = Some(Arc::new(sort));
        self
    }

    pub fn with_sort_css<F>(mut self, sort: F) -> Self
    where
        F: Fn(Vec<String>) -> Vec<String> + Send + Sync + 'static,
    {
        self.sort_css = Some(Arc::new(sort));
        self
    }

    pub fn with_tag_attrs<F>(mut self, get_tag_attrs: F) -> Self
    where
        F: Fn(&str) -> serde_json::Value + Send + Sync + 'static,
    {
        self.get_tag_attrs = Some(Arc::new(get_tag_attrs));
        self
    }

    pub fn with_check_ignore<F>(mut self, check_ignore: F) -> Self
    where
        F: Fn(&ResolveArgs<'_>, &str, &ExternalsMap, &UsageSet, &[String]) -> CheckIgnore
            + Send
            + Sync
            + 'static,
    {
        self.check_ignore = Some(Arc::new(check_ignore));
        self
    }
}

impl fmt::Debug for AutoExternalOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoExternalOptions")
            .field("externals", &self.externals)
            .field("required", &self.required)
            .field("sort_js", &self.sort_js.is_some())
            .field("sort_css", &self.sort_css.is_some())
            .field("get_tag_attrs", &self.get_tag_attrs.is_some())
            .field("check_ignore", &self.check_ignore.is_some())
            .field("inject_loader", &self.inject_loader)
            .finish()
    }
}

/// Options with every hook resolved to a concrete function.
#[derive(Clone)]
pub struct NormalizedOptions {
    pub externals: Arc<ExternalsMap>,
    pub required: Vec<String>,
    pub sort_js: SortFn,
    pub sort_css: SortFn,
    pub get_tag_attrs: TagAttrsFn,
    pub check_ignore: CheckIgnoreFn,
    pub inject_loader: bool,
}

fn identity_order(list: Vec<String>) -> Vec<String> {
    list
}

fn no_tag_attrs(_url: &str) -> serde_json::Value {
    serde_json::Value::Object(Default::default())
}

fn no_check_ignore(
    _args: &ResolveArgs<'_>,
    _name: &str,
    _externals: &ExternalsMap,
    _usage: &UsageSet,
    _required: &[String],
) -> CheckIgnore {
    CheckIgnore::Continue
}

impl From<AutoExternalOptions> for NormalizedOptions {
    fn from(options: AutoExternalOptions) -> Self {
        let identity: SortFn = Arc::new(identity_order);
        Self {
            externals: Arc::new(options.externals),
            required: options.required,
            sort_js: options.sort_js.unwrap_or_else(|| identity.clone()),
            sort_css: options.sort_css.unwrap_or(identity),
            get_tag_attrs: options
                .get_tag_attrs
                .unwrap_or_else(|| Arc::new(no_tag_attrs)),
            check_ignore: options
                .check_ignore
                .unwrap_or_else(|| Arc::new(no_check_ignore)),
            inject_loader: options.inject_loader,
        }
    }
}

impl fmt::Debug for NormalizedOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NormalizedOptions")
            .field("externals", &self.externals)
            .field("required", &self.required)
            .field("inject_loader", &self.inject_loader)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattens_nested_css_and_drops_nulls() {
        let entries: Vec<Option<CssSpec>> =
            serde_json::from_str(r#"["a.css", ["b.css", "c.css"], null]"#).unwrap();
        assert_eq!(
            flatten_css(entries.iter().map(Option::as_ref)),
            vec!["a.css", "b.css", "c.css"]
        );
    }

    #[test]
    fn empty_urls_are_dropped() {
        let css = CssSpec::List(vec![Some("".into()), None, Some("x.css".into())]);
        assert_eq!(flatten_css([Some(&css)]), vec!["x.css"]);
    }

    #[test]
    fn global_name_falls_back_to_module_name() {
        let spec = ExternalSpec::new("/v.js");
        assert_eq!(spec.global_name("vue"), "vue");
        let spec = ExternalSpec::new("/v.js").with_var_name("");
        assert_eq!(spec.global_name("vue"), "vue");
        let spec = ExternalSpec::new("/v.js").with_var_name("Vue");
        assert_eq!(spec.global_name("vue"), "Vue");
    }

    #[test]
    fn raw_options_deserialize_camel_case() {
        let options = AutoExternalOptions::from_json(
            r#"{
                "externals": {
                    "lodash": { "varName": "_", "url": "https://cdn/lodash.js" },
                    "element-ui": { "varName": "ELEMENT", "url": "https://cdn/el.js", "css": "https://cdn/el.css" }
                },
                "required": ["lodash"],
                "injectLoader": false
            }"#,
        )
        .unwrap();
        assert_eq!(
            options.externals.keys().collect::<Vec<_>>(),
            vec!["lodash", "element-ui"]
        );
        assert_eq!(options.externals["lodash"].var_name.as_deref(), Some("_"));
        assert_eq!(
            options.externals["element-ui"].css_urls(),
            vec!["https://cdn/el.css"]
        );
        assert_eq!(options.required, vec!["lodash"]);
        assert!(!options.inject_loader);
    }

    #[test]
    fn loader_is_injected_by_default() {
        let options = AutoExternalOptions::from_json(r#"{ "externals": {} }"#).unwrap();
        assert!(options.inject_loader);
        assert!(AutoExternalOptions::default().inject_loader);
    }

    #[test]
    fn serialized_spec_omits_missing_fields() {
        let spec = ExternalSpec::new("/d.js").with_var_name("Demo");
        assert_eq!(
            serde_json::to_string(&spec).unwrap(),
            r#"{"varName":"Demo","url":"/d.js"}"#
        );
    }
}
