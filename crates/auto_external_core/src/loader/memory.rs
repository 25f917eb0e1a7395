use std::fmt;

use hashbrown::HashMap;
use parking_lot::Mutex;

use super::{AssetHost, LinkElement, LoadOutcome, ScriptElement, SettleCallback};
use crate::{AssetTagGroups, MODULE_ATTR};

/// An in-memory document. Load events are dispatched by hand, which makes it
/// usable for headless rendering and for driving the loader in tests.
#[derive(Default)]
pub struct MemoryDocument {
    state: Mutex<DocumentState>,
}

#[derive(Default)]
struct DocumentState {
    scripts: Vec<ScriptElement>,
    links: Vec<LinkElement>,
    listeners: HashMap<String, Vec<SettleCallback>>,
    globals: HashMap<String, serde_json::Value>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// A document holding the correlated scripts and stylesheet links of a
    /// generated page.
    pub fn from_tags(tags: &AssetTagGroups) -> Self {
        let document = Self::new();
        tags.head_tags
            .iter()
            .chain(tags.body_tags.iter())
            .for_each(|tag| match tag.tag_name.as_str() {
                "script" => {
                    if let (Some(src), Some(module)) = (tag.get_attr("src"), tag.get_attr(MODULE_ATTR)) {
                        document.insert_script(ScriptElement {
                            src: src.to_string(),
                            module: module.to_string(),
                        });
                    }
                }
                "link" if tag.get_attr("rel") == Some("stylesheet") => {
                    if let Some(href) = tag.get_attr("href") {
                        document.insert_stylesheet(LinkElement {
                            href: href.to_string(),
                        });
                    }
                }
                _ => {}
            });
        document
    }

    /// Adds an already-loaded script.
    pub fn insert_script(&self, element: ScriptElement) {
        self.state.lock().scripts.push(element);
    }

    /// Adds an already-loaded stylesheet.
    pub fn insert_stylesheet(&self, element: LinkElement) {
        self.state.lock().links.push(element);
    }

    pub fn set_global<T: Into<String>>(&self, name: T, value: serde_json::Value) {
        self.state.lock().globals.insert(name.into(), value);
    }

    pub fn scripts(&self) -> Vec<ScriptElement> {
        self.state.lock().scripts.clone()
    }

    pub fn links(&self) -> Vec<LinkElement> {
        self.state.lock().links.clone()
    }

    /// Urls with listeners still waiting for an event.
    pub fn pending_urls(&self) -> Vec<String> {
        let mut urls = self
            .state
            .lock()
            .listeners
            .keys()
            .cloned()
            .collect::<Vec<_>>();
        urls.sort();
        urls
    }

    /// Fires `load` on every element waiting for `url`. Returns how many
    /// listeners ran.
    pub fn dispatch_load(&self, url: &str) -> usize {
        self.dispatch(url, LoadOutcome::Loaded)
    }

    /// Fires `error` on every element waiting for `url`.
    pub fn dispatch_error(&self, url: &str, reason: &str) -> usize {
        self.dispatch(url, LoadOutcome::Failed(reason.to_string()))
    }

    fn dispatch(&self, url: &str, outcome: LoadOutcome) -> usize {
        let listeners = self.state.lock().listeners.remove(url).unwrap_or_default();
        let count = listeners.len();
        listeners
            .into_iter()
            .for_each(|listener| listener(outcome.clone()));
        count
    }

    fn listen(&self, url: String, on_settle: SettleCallback) {
        self.state
            .lock()
            .listeners
            .entry(url)
            .or_default()
            .push(on_settle);
    }
}

impl AssetHost for MemoryDocument {
    type Global = Option<serde_json::Value>;

    fn has_script(&self, module: &str) -> bool {
        self.state
            .lock()
            .scripts
            .iter()
            .any(|script| script.module == module)
    }

    fn has_stylesheet(&self, href: &str) -> bool {
        self.state.lock().links.iter().any(|link| link.href == href)
    }

    fn append_script(&self, element: ScriptElement, on_settle: SettleCallback) {
        let url = element.src.clone();
        self.insert_script(element);
        self.listen(url, on_settle);
    }

    fn append_stylesheet(&self, element: LinkElement, on_settle: SettleCallback) {
        let url = element.href.clone();
        self.insert_stylesheet(element);
        self.listen(url, on_settle);
    }

    fn global(&self, var_name: &str) -> Self::Global {
        self.state.lock().globals.get(var_name).cloned()
    }
}

impl fmt::Debug for MemoryDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MemoryDocument")
            .field("scripts", &state.scripts)
            .field("links", &state.links)
            .field("pending", &state.listeners.len())
            .field("globals", &state.globals)
            .finish()
    }
}
