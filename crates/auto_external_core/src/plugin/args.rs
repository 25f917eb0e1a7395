#[derive(Debug, Clone)]
pub struct ResolveArgs<'a> {
    pub importer: Option<&'a str>,
    pub specifier: &'a str,
}

/// One static import declaration seen while parsing `importer`.
#[derive(Debug, Clone)]
pub struct ParseImportArgs<'a> {
    pub importer: &'a str,
    pub source: &'a str,
}

/// What the host offers to plugins at setup time.
#[derive(Debug, Clone, Default)]
pub struct SetupContext {
    /// The host collects head/body tags for a generated document and hands
    /// them to `on_finalize_output`.
    pub asset_tag_groups: bool,
}
