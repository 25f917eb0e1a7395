use crate::{
    decide, plan_assets, try_decide, AssetTagGroups, AutoExternalOptions, Decision,
    DecisionInputs, Error, NormalizedOptions, ParseImportArgs, Plugin, PluginResolveHookOutput,
    ResolveArgs, SetupContext, UsageSet,
};

pub const PLUGIN_NAME: &str = "auto-external";

/// Serves configured modules from a CDN instead of the bundle.
#[derive(Debug)]
pub struct AutoExternalPlugin {
    options: NormalizedOptions,
    usage: UsageSet,
}

impl AutoExternalPlugin {
    pub fn new(options: AutoExternalOptions) -> Self {
        Self {
            options: options.into(),
            usage: UsageSet::new(),
        }
    }

    pub fn options(&self) -> &NormalizedOptions {
        &self.options
    }

    pub fn usage(&self) -> &UsageSet {
        &self.usage
    }

    fn inputs(&self) -> DecisionInputs<'_> {
        DecisionInputs {
            externals: &self.options.externals,
            usage: &self.usage,
            required: &self.options.required,
            check_ignore: Some(&self.options.check_ignore),
        }
    }

    pub fn decide(&self, args: &ResolveArgs<'_>) -> Decision {
        decide(args, &self.inputs())
    }
}

impl Plugin for AutoExternalPlugin {
    fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    fn apply(&self, ctx: &SetupContext) -> anyhow::Result<()> {
        if !ctx.asset_tag_groups {
            return Err(Error::Configuration {
                plugin: PLUGIN_NAME,
            }
            .into());
        }
        Ok(())
    }

    fn build_start(&self) {
        self.usage.clear();
    }

    fn on_parse_import(&self, args: &ParseImportArgs<'_>) {
        self.usage.record_import(args.source, &self.options.externals);
    }

    fn on_resolve_dependency(&self, args: &ResolveArgs<'_>) -> PluginResolveHookOutput {
        // a bundle forced by `check_ignore` stops the remaining plugins
        Ok(try_decide(args, &self.inputs()))
    }

    fn on_finalize_output(&self, tags: &mut AssetTagGroups) -> anyhow::Result<()> {
        plan_assets(&self.options, &self.usage)?.apply(tags);
        Ok(())
    }
}
