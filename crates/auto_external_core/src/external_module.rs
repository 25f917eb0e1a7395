/// An import satisfied by a global variable instead of bundled code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExternalModule {
    /// The specifier as written in the importing source.
    pub request: String,
    pub var_name: String,
    pub namespace: String,
}

impl ExternalModule {
    pub fn new<R: Into<String>, V: Into<String>>(request: R, var_name: V) -> Self {
        Self::with_namespace(request, var_name, "window")
    }

    pub fn with_namespace<R, V, N>(request: R, var_name: V, namespace: N) -> Self
    where
        R: Into<String>,
        V: Into<String>,
        N: Into<String>,
    {
        Self {
            request: request.into(),
            var_name: var_name.into(),
            namespace: namespace.into(),
        }
    }

    /// Module body binding the import to the global.
    pub fn render(&self) -> String {
        format!(
            "module.exports = {}[{:?}];",
            self.namespace, self.var_name
        )
    }
}

/// What a custom override may resolve a request to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplacementModule {
    External(ExternalModule),
    Source { id: String, code: String },
}

impl ReplacementModule {
    pub fn id(&self) -> &str {
        match self {
            ReplacementModule::External(module) => &module.request,
            ReplacementModule::Source { id, .. } => id,
        }
    }
}
