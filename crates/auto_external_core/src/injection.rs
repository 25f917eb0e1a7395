use crate::{
    flatten_css, is_required, AssetTagGroups, AttrValue, Error, ExternalsMap, HtmlTag,
    NormalizedOptions, TagAttrsFn, UsageSet,
};

/// Attribute correlating an injected script with its module name.
pub const MODULE_ATTR: &str = "data-module";

const LOADER_RUNTIME: &str = include_str!("../runtime/import_by_cdn.js");
const REGISTRY_PLACEHOLDER: &str = "__AUTO_EXTERNAL_REGISTRY__";

/// Tags produced for one build, ready to be merged into the host's groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetPlan {
    pub scripts: Vec<HtmlTag>,
    pub stylesheets: Vec<HtmlTag>,
    pub bootstrap: Option<HtmlTag>,
}

impl AssetPlan {
    /// Scripts go before everything already in the body, stylesheets and the
    /// bootstrap after everything already in the head.
    pub fn apply(self, tags: &mut AssetTagGroups) {
        tags.body_tags.splice(0..0, self.scripts);
        tags.head_tags.extend(self.stylesheets);
        tags.head_tags.extend(self.bootstrap);
    }
}

/// Configured names, in map order, that were imported or are required.
pub fn candidates(externals: &ExternalsMap, usage: &UsageSet, required: &[String]) -> Vec<String> {
    externals
        .keys()
        .filter(|name| usage.contains(name) || is_required(required, name))
        .cloned()
        .collect()
}

pub fn plan_assets(options: &NormalizedOptions, usage: &UsageSet) -> Result<AssetPlan, Error> {
    let externals = options.externals.as_ref();
    let keys = candidates(externals, usage, &options.required);

    let css_urls = flatten_css(
        keys.iter()
            .filter_map(|key| externals.get(key))
            .map(|spec| spec.css.as_ref()),
    );

    let scripts = (options.sort_js)(keys)
        .into_iter()
        .filter_map(|key| {
            let spec = externals.get(&key)?;
            let tag = HtmlTag::script_src(spec.url.as_str()).attr(MODULE_ATTR, key.as_str());
            Some(with_tag_attrs(tag, &spec.url, &options.get_tag_attrs))
        })
        .collect::<Vec<_>>();

    let stylesheets = (options.sort_css)(css_urls)
        .into_iter()
        .map(|url| with_tag_attrs(HtmlTag::stylesheet(url.as_str()), &url, &options.get_tag_attrs))
        .collect::<Vec<_>>();

    let bootstrap = if options.inject_loader {
        Some(bootstrap_tag(externals)?)
    } else {
        None
    };

    tracing::debug!(
        "planned {} script(s) and {} stylesheet(s), loader: {}",
        scripts.len(),
        stylesheets.len(),
        bootstrap.is_some()
    );

    Ok(AssetPlan {
        scripts,
        stylesheets,
        bootstrap,
    })
}

fn with_tag_attrs(mut tag: HtmlTag, url: &str, get_tag_attrs: &TagAttrsFn) -> HtmlTag {
    match get_tag_attrs(url) {
        serde_json::Value::Object(attrs) => {
            attrs.into_iter().for_each(|(key, value)| {
                if let Some(value) = attr_value(value) {
                    tag.attributes.insert(key, value);
                }
            });
        }
        other => {
            tracing::trace!("ignored non-object tag attributes {} for {}", other, url);
        }
    }
    tag
}

fn attr_value(value: serde_json::Value) -> Option<AttrValue> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::Bool(value) => Some(AttrValue::Bool(value)),
        serde_json::Value::String(value) => Some(AttrValue::Str(value)),
        other => Some(AttrValue::Str(other.to_string())),
    }
}

/// Inline script installing `window.externalsCDN` and `window.importByCDN`.
pub fn bootstrap_tag(externals: &ExternalsMap) -> Result<HtmlTag, Error> {
    let registry = serde_json::to_string(externals)?.replace("</", "<\\/");
    Ok(HtmlTag::inline_script(
        LOADER_RUNTIME.replace(REGISTRY_PLACEHOLDER, &registry),
    ))
}
