use auto_external::{pipeline, HtmlOptions, ImportKind, PipelineOptions, Resolution};
use auto_external_core::{
    log::enable_tracing_by_env, AutoExternalOptions, AutoExternalPlugin, CheckIgnore, Error,
    ExternalModule, ExternalSpec, ExternalsMap, ReplacementModule, MODULE_ATTR,
};
use indexmap::IndexMap;

fn externals() -> ExternalsMap {
    ExternalsMap::from([
        (
            "vue".to_string(),
            ExternalSpec::new("https://cdn/vue.js").with_var_name("Vue"),
        ),
        (
            "lodash".to_string(),
            ExternalSpec::new("https://cdn/lodash.js").with_var_name("_"),
        ),
        ("moment".to_string(), ExternalSpec::new("https://cdn/moment.js")),
    ])
}

fn modules(sources: &[(&str, &str)]) -> IndexMap<String, String> {
    sources
        .iter()
        .map(|(id, code)| (id.to_string(), code.to_string()))
        .collect()
}

fn options(sources: &[(&str, &str)]) -> PipelineOptions {
    PipelineOptions {
        entry: "index.js".to_string(),
        modules: modules(sources),
        html: Some(HtmlOptions::default()),
    }
}

#[test]
fn missing_tag_stage_fails_setup() {
    enable_tracing_by_env();
    let err = pipeline(
        PipelineOptions {
            html: None,
            ..options(&[("index.js", "")])
        },
        vec![Box::new(AutoExternalPlugin::new(AutoExternalOptions::default()))],
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::Configuration { .. })
    ));
    assert!(err.to_string().contains("auto-external"));
}

#[test]
fn records_how_every_dependency_resolved() {
    enable_tracing_by_env();
    let output = pipeline(
        options(&[
            (
                "index.js",
                "import Vue from 'vue'; import './lib/a'; const m = require('moment'); import('react');",
            ),
            ("lib/a.js", "import _ from 'lodash'; import Vue from 'vue'; export * from '../shared';"),
            ("shared/index.js", "export const x = 1;"),
        ]),
        vec![Box::new(AutoExternalPlugin::new(AutoExternalOptions {
            externals: externals(),
            inject_loader: false,
            ..Default::default()
        }))],
    )
    .unwrap()
    .build()
    .unwrap();

    assert_eq!(output.modules, vec!["index.js", "lib/a.js", "shared/index.js"]);
    assert_eq!(
        output.resolution_of("index.js", "vue"),
        Some(&Resolution::External(ExternalModule::new("vue", "Vue")))
    );
    assert_eq!(
        output.resolution_of("index.js", "./lib/a"),
        Some(&Resolution::Local("lib/a.js".to_string()))
    );
    // only seen through require, so it stays in the bundle
    assert_eq!(output.resolution_of("index.js", "moment"), Some(&Resolution::Vendor));
    assert_eq!(output.resolution_of("index.js", "react"), Some(&Resolution::Vendor));
    assert_eq!(
        output.resolution_of("lib/a.js", "lodash"),
        Some(&Resolution::External(ExternalModule::new("lodash", "_")))
    );
    assert_eq!(
        output.resolution_of("lib/a.js", "../shared"),
        Some(&Resolution::Local("shared/index.js".to_string()))
    );
    assert_eq!(
        output
            .dependencies
            .iter()
            .find(|dep| dep.specifier == "react")
            .map(|dep| dep.kind),
        Some(ImportKind::DynamicImport)
    );

    let srcs = output
        .tags
        .body_tags
        .iter()
        .filter_map(|tag| tag.get_attr(MODULE_ATTR))
        .collect::<Vec<_>>();
    assert_eq!(srcs, vec!["vue", "lodash"]);
}

#[test]
fn check_ignore_overrides_the_default_rule() {
    enable_tracing_by_env();
    let plugin_options = AutoExternalOptions {
        externals: externals(),
        inject_loader: false,
        ..Default::default()
    }
    .with_check_ignore(|_args, name, _externals, _usage, _required| match name {
        "vue" => CheckIgnore::ForceBundle,
        "lodash" => CheckIgnore::Replace(ReplacementModule::Source {
            id: "lodash-shim".to_string(),
            code: "module.exports = {};".to_string(),
        }),
        _ => CheckIgnore::Continue,
    });

    let output = pipeline(
        options(&[("index.js", "import Vue from 'vue'; import _ from 'lodash'; import m from 'moment';")]),
        vec![Box::new(AutoExternalPlugin::new(plugin_options))],
    )
    .unwrap()
    .build()
    .unwrap();

    assert_eq!(output.resolution_of("index.js", "vue"), Some(&Resolution::Vendor));
    assert!(matches!(
        output.resolution_of("index.js", "lodash"),
        Some(Resolution::Replaced(module)) if module.id() == "lodash-shim"
    ));
    assert_eq!(
        output.resolution_of("index.js", "moment"),
        Some(&Resolution::External(ExternalModule::new("moment", "moment")))
    );
    // tags follow usage, not the resolution outcome
    assert_eq!(output.tags.body_tags.len(), 4);
}

#[test]
fn rebuilding_starts_from_a_clean_usage_set() {
    enable_tracing_by_env();
    let built = pipeline(
        options(&[("index.js", "import Vue from 'vue';")]),
        vec![Box::new(AutoExternalPlugin::new(AutoExternalOptions {
            externals: externals(),
            inject_loader: false,
            ..Default::default()
        }))],
    )
    .unwrap();
    let first = built.build().unwrap();
    let second = built.build().unwrap();
    assert_eq!(first.html, second.html);
    assert_eq!(second.tags.body_tags.len(), 2);
}

#[test]
fn injects_the_loader_bootstrap_by_default() {
    enable_tracing_by_env();
    let output = pipeline(
        options(&[("index.js", "import Vue from 'vue';")]),
        vec![Box::new(AutoExternalPlugin::new(AutoExternalOptions {
            externals: externals(),
            ..Default::default()
        }))],
    )
    .unwrap()
    .build()
    .unwrap();

    let bootstrap = output.tags.head_tags.last().unwrap();
    let code = bootstrap.inner_html.as_deref().unwrap();
    assert!(code.contains("importByCDN"));
    assert!(code.contains("https://cdn/moment.js"));
    assert!(output.html.unwrap().contains("externalsCDN"));
}

#[test]
fn unresolvable_local_import_fails_the_build() {
    enable_tracing_by_env();
    let err = pipeline(options(&[("index.js", "import './missing';")]), vec![])
        .unwrap()
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("./missing"));
}
