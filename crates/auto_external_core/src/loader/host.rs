/// A `<script>` the loader asks the host to append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptElement {
    pub src: String,
    /// Value of the correlation attribute.
    pub module: String,
}

/// A `<link rel="stylesheet">` the loader asks the host to append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkElement {
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Failed(String),
}

/// Called once when an appended element finishes loading or fails.
pub type SettleCallback = Box<dyn FnOnce(LoadOutcome) + Send>;

/// The document the loader works against.
pub trait AssetHost: Send + Sync {
    /// What a global lookup yields.
    type Global: Send + 'static;

    /// A script correlated to `module` is already in the document.
    fn has_script(&self, module: &str) -> bool;

    /// A stylesheet link with exactly this `href` is already in the document.
    fn has_stylesheet(&self, href: &str) -> bool;

    fn append_script(&self, element: ScriptElement, on_settle: SettleCallback);

    fn append_stylesheet(&self, element: LinkElement, on_settle: SettleCallback);

    fn global(&self, var_name: &str) -> Self::Global;
}
