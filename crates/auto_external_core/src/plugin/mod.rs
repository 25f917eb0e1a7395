use std::fmt::Debug;

use crate::{AssetTagGroups, Decision};

mod args;
pub use args::*;
mod plugin_driver;
pub use plugin_driver::*;

pub type PluginResolveHookOutput = anyhow::Result<Option<Decision>>;

/// Extension points a host pipeline invokes during a build.
///
/// Hooks run serially: `apply` once when the plugin is registered,
/// `build_start` before each build, `on_parse_import` for every import
/// declaration, `on_resolve_dependency` for every dependency request and
/// `on_finalize_output` once the module graph is final.
pub trait Plugin: Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(&self, _ctx: &SetupContext) -> anyhow::Result<()> {
        Ok(())
    }

    fn build_start(&self) {}

    fn on_parse_import(&self, _args: &ParseImportArgs<'_>) {}

    /// `Ok(None)` leaves the request to the next plugin, and finally to the
    /// host's default resolution.
    fn on_resolve_dependency(&self, _args: &ResolveArgs<'_>) -> PluginResolveHookOutput {
        Ok(None)
    }

    fn on_finalize_output(&self, _tags: &mut AssetTagGroups) -> anyhow::Result<()> {
        Ok(())
    }
}
