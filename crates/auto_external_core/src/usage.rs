use dashmap::DashSet;

use crate::ExternalsMap;

/// Externalizable names imported somewhere in the current build.
#[derive(Debug, Default)]
pub struct UsageSet {
    names: DashSet<String>,
}

impl UsageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `source` if it is configured as an external. Returns whether the
    /// name was newly recorded.
    pub fn record_import(&self, source: &str, externals: &ExternalsMap) -> bool {
        if !externals.contains_key(source) {
            return false;
        }
        let inserted = self.names.insert(source.to_string());
        if inserted {
            tracing::debug!("external {:?} is used", source);
        }
        inserted
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn clear(&self) {
        self.names.clear();
    }
}

impl<S: Into<String>> FromIterator<S> for UsageSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}
