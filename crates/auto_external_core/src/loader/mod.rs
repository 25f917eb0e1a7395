//! On-demand loading of configured externals, the Rust side of the
//! `importByCDN` runtime emitted into the page.

use std::sync::Arc;

use futures::{future, future::BoxFuture, FutureExt};
use indexmap::IndexSet;
use parking_lot::Mutex;

use crate::{ExternalSpec, ExternalsMap, LoaderError};

mod host;
pub use host::*;
mod memory;
pub use memory::*;
mod pending;
use pending::PendingLoad;

/// Read-only copy of the externals map, shared for the page's lifetime.
#[derive(Debug, Clone, Default)]
pub struct ExternalsRegistry {
    externals: Arc<ExternalsMap>,
}

impl ExternalsRegistry {
    pub fn new(externals: ExternalsMap) -> Self {
        Self {
            externals: Arc::new(externals),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ExternalSpec> {
        self.externals.get(name)
    }
}

impl From<Arc<ExternalsMap>> for ExternalsRegistry {
    fn from(externals: Arc<ExternalsMap>) -> Self {
        Self { externals }
    }
}

pub type ImportFuture<T> = BoxFuture<'static, Result<T, LoaderError>>;

/// Loads externals into an [`AssetHost`] on demand.
///
/// Concurrent first calls for the same name are not coalesced: both may miss
/// the script check and append their own elements.
pub struct CdnLoader<H> {
    registry: ExternalsRegistry,
    host: Arc<H>,
}

impl<H> Clone for CdnLoader<H> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            host: self.host.clone(),
        }
    }
}

impl<H: AssetHost + 'static> CdnLoader<H> {
    pub fn new(registry: ExternalsRegistry, host: Arc<H>) -> Self {
        Self { registry, host }
    }

    pub fn registry(&self) -> &ExternalsRegistry {
        &self.registry
    }

    /// Starts loading `name` and returns its global once the script and every
    /// stylesheet it had to add have settled.
    ///
    /// Elements are appended before this returns. A script failure rejects;
    /// stylesheet failures only clear their pending entry. There is no
    /// timeout: the future stays pending until the host reports completion.
    pub fn import_by_cdn(&self, name: &str) -> ImportFuture<H::Global> {
        let Some(spec) = self.registry.get(name) else {
            tracing::debug!("import_by_cdn({:?}) is not configured", name);
            return future::ready(Err(LoaderError::NotConfigured(name.to_string()))).boxed();
        };
        let var_name = spec.global_name(name).to_string();

        if self.host.has_script(name) {
            tracing::trace!("{:?} is already in the document", name);
            return future::ready(Ok(self.host.global(&var_name))).boxed();
        }

        let settled = self.begin_load(name, spec);
        let host = self.host.clone();
        async move {
            match settled.await {
                Ok(Ok(())) => Ok(host.global(&var_name)),
                Ok(Err(err)) => Err(err),
                Err(_) => {
                    tracing::warn!("host dropped the callbacks for {:?}, load never settles", var_name);
                    future::pending().await
                }
            }
        }
        .boxed()
    }

    fn begin_load(
        &self,
        name: &str,
        spec: &ExternalSpec,
    ) -> tokio::sync::oneshot::Receiver<Result<(), LoaderError>> {
        let missing_css = spec
            .css_urls()
            .into_iter()
            .filter(|href| !self.host.has_stylesheet(href))
            .collect::<IndexSet<_>>();

        let (pending, settled) = PendingLoad::new(
            std::iter::once(spec.url.clone()).chain(missing_css.iter().cloned()),
        );
        let pending = Arc::new(Mutex::new(pending));
        tracing::debug!(
            "loading {:?} from {} with {} stylesheet(s)",
            name,
            spec.url,
            missing_css.len()
        );

        let on_script: SettleCallback = {
            let pending = pending.clone();
            let name = name.to_string();
            let url = spec.url.clone();
            Box::new(move |outcome: LoadOutcome| match outcome {
                LoadOutcome::Loaded => pending.lock().complete(&url),
                LoadOutcome::Failed(reason) => {
                    pending
                        .lock()
                        .fail(LoaderError::ScriptLoad { name, url, reason })
                }
            })
        };
        self.host.append_script(
            ScriptElement {
                src: spec.url.clone(),
                module: name.to_string(),
            },
            on_script,
        );

        missing_css.into_iter().for_each(|href| {
            let pending = pending.clone();
            let url = href.clone();
            self.host.append_stylesheet(
                LinkElement { href },
                Box::new(move |outcome: LoadOutcome| {
                    if let LoadOutcome::Failed(reason) = &outcome {
                        tracing::debug!("stylesheet {} failed: {}", url, reason);
                    }
                    pending.lock().complete(&url);
                }),
            );
        });

        settled
    }
}
