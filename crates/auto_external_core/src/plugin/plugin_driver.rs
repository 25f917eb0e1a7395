use tracing::instrument;

use crate::{
    AssetTagGroups, Decision, ParseImportArgs, Plugin, PluginResolveHookOutput, ResolveArgs,
    SetupContext,
};

#[derive(Debug, Default)]
pub struct PluginDriver {
    pub plugins: Vec<Box<dyn Plugin>>,
}

impl PluginDriver {
    pub fn new(plugins: Vec<Box<dyn Plugin>>) -> Self {
        Self { plugins }
    }

    /// Runs every plugin's setup. The first failure aborts.
    pub fn apply(&self, ctx: &SetupContext) -> anyhow::Result<()> {
        for plugin in &self.plugins {
            plugin
                .apply(ctx)
                .map_err(|err| err.context(format!("failed to apply plugin `{}`", plugin.name())))?;
        }
        Ok(())
    }

    pub fn build_start(&self) {
        self.plugins.iter().for_each(|plugin| plugin.build_start());
    }

    pub fn parse_import(&self, args: ParseImportArgs<'_>) {
        self.plugins
            .iter()
            .for_each(|plugin| plugin.on_parse_import(&args));
    }

    #[instrument(skip(self))]
    pub fn resolve_dependency(&self, args: ResolveArgs<'_>) -> PluginResolveHookOutput {
        for plugin in &self.plugins {
            let output: Option<Decision> = plugin.on_resolve_dependency(&args)?;
            if output.is_some() {
                return Ok(output);
            }
        }
        Ok(None)
    }

    pub fn finalize_output(&self, tags: &mut AssetTagGroups) -> anyhow::Result<()> {
        for plugin in &self.plugins {
            plugin.on_finalize_output(tags)?;
        }
        Ok(())
    }
}
