use crate::{
    CheckIgnoreFn, ExternalModule, ExternalsMap, ReplacementModule, ResolveArgs, UsageSet,
};

/// Result of a `checkIgnore` hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckIgnore {
    /// Bundle the request normally, skipping externalization.
    ForceBundle,
    /// No opinion, apply the default rule.
    Continue,
    /// Resolve the request to this module, bypassing both paths.
    Replace(ReplacementModule),
}

impl From<bool> for CheckIgnore {
    fn from(force_bundle: bool) -> Self {
        if force_bundle {
            CheckIgnore::ForceBundle
        } else {
            CheckIgnore::Continue
        }
    }
}

impl From<Option<ReplacementModule>> for CheckIgnore {
    fn from(replacement: Option<ReplacementModule>) -> Self {
        replacement.map_or(CheckIgnore::Continue, CheckIgnore::Replace)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Bundle,
    Externalize(ExternalModule),
    CustomOverride(ReplacementModule),
}

/// Everything a decision may depend on.
#[derive(Clone, Copy)]
pub struct DecisionInputs<'a> {
    pub externals: &'a ExternalsMap,
    pub usage: &'a UsageSet,
    pub required: &'a [String],
    pub check_ignore: Option<&'a CheckIgnoreFn>,
}

/// Decides how the request in `args` is satisfied.
///
/// A configured `check_ignore` hook is consulted first. Without an override,
/// the request is externalized when it was imported somewhere in the build, or
/// when it is both configured and required; anything else is bundled. The
/// global variable falls back to the request itself when its `ExternalSpec` has no
/// `varName`.
pub fn decide(args: &ResolveArgs<'_>, inputs: &DecisionInputs<'_>) -> Decision {
    try_decide(args, inputs).unwrap_or(Decision::Bundle)
}

/// Like [`decide`], but `None` when the request falls through to the default
/// bundling rule. A bundle forced by `check_ignore` is `Some(Decision::Bundle)`.
pub fn try_decide(args: &ResolveArgs<'_>, inputs: &DecisionInputs<'_>) -> Option<Decision> {
    let name = args.specifier;

    if let Some(check_ignore) = inputs.check_ignore {
        match check_ignore(
            args,
            name,
            inputs.externals,
            inputs.usage,
            inputs.required,
        ) {
            CheckIgnore::ForceBundle => {
                tracing::trace!("{:?} forced into the bundle by checkIgnore", name);
                return Some(Decision::Bundle);
            }
            CheckIgnore::Replace(module) => {
                tracing::trace!("{:?} replaced by checkIgnore with {:?}", name, module.id());
                return Some(Decision::CustomOverride(module));
            }
            CheckIgnore::Continue => {}
        }
    }

    let spec = inputs.externals.get(name);
    match spec {
        Some(spec) if inputs.usage.contains(name) || is_required(inputs.required, name) => {
            let var_name = spec.global_name(name);
            tracing::trace!("externalize {:?} as window.{}", name, var_name);
            Some(Decision::Externalize(ExternalModule::new(name, var_name)))
        }
        // usage filled outside `record_import` may name unconfigured modules
        None if inputs.usage.contains(name) => {
            tracing::trace!("externalize unconfigured {:?} as window.{}", name, name);
            Some(Decision::Externalize(ExternalModule::new(name, name)))
        }
        _ => None,
    }
}

pub fn is_required(required: &[String], name: &str) -> bool {
    required.iter().any(|required| required == name)
}
