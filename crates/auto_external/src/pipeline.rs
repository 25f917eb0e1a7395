use std::{collections::VecDeque, path::Path};

use auto_external_core::{
    AssetTagGroups, Decision, ExternalModule, HtmlTag, ParseImportArgs, Plugin, PluginDriver,
    ReplacementModule, ResolveArgs, SetupContext,
};
use indexmap::IndexMap;
use linked_hash_set::LinkedHashSet;
use sugar_path::SugarPath;
use swc_core::ecma::visit::VisitWith;

use crate::{parse_file, DependencyScanner, ImportKind, ImportRecord};

#[derive(Debug, Clone)]
pub struct HtmlOptions {
    pub title: String,
    /// The application's own scripts, placed in the body.
    pub scripts: Vec<String>,
    /// The application's own stylesheets, placed in the head.
    pub stylesheets: Vec<String>,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            title: "App".to_string(),
            scripts: vec!["main.js".to_string()],
            stylesheets: vec![],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub entry: String,
    /// Sources keyed by their slash-separated id, e.g. `src/app.js`.
    pub modules: IndexMap<String, String>,
    /// Without it the pipeline has no tag stage.
    pub html: Option<HtmlOptions>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Local(String),
    External(ExternalModule),
    Replaced(ReplacementModule),
    /// A bare specifier left to the bundler's own package resolution.
    Vendor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependency {
    pub importer: String,
    pub specifier: String,
    pub kind: ImportKind,
    pub resolution: Resolution,
}

#[derive(Debug, Clone)]
pub struct BuildOutput {
    /// Local modules in the order they were parsed.
    pub modules: Vec<String>,
    pub dependencies: Vec<ResolvedDependency>,
    pub tags: AssetTagGroups,
    pub html: Option<String>,
}

impl BuildOutput {
    pub fn resolution_of(&self, importer: &str, specifier: &str) -> Option<&Resolution> {
        self.dependencies
            .iter()
            .find(|dep| dep.importer == importer && dep.specifier == specifier)
            .map(|dep| &dep.resolution)
    }
}

/// A minimal host: walks in-memory sources from the entry, driving the
/// plugins at parse, resolution and output time.
#[derive(Debug)]
pub struct Pipeline {
    options: PipelineOptions,
    plugin_driver: PluginDriver,
}

pub fn pipeline(options: PipelineOptions, plugins: Vec<Box<dyn Plugin>>) -> anyhow::Result<Pipeline> {
    Pipeline::new(options, plugins)
}

impl Pipeline {
    pub fn new(options: PipelineOptions, plugins: Vec<Box<dyn Plugin>>) -> anyhow::Result<Self> {
        let plugin_driver = PluginDriver::new(plugins);
        plugin_driver.apply(&SetupContext {
            asset_tag_groups: options.html.is_some(),
        })?;
        Ok(Self {
            options,
            plugin_driver,
        })
    }

    pub fn build(&self) -> anyhow::Result<BuildOutput> {
        self.plugin_driver.build_start();

        if !self.options.modules.contains_key(&self.options.entry) {
            anyhow::bail!("entry {:?} not found", self.options.entry);
        }

        let mut queue = VecDeque::from([self.options.entry.clone()]);
        let mut visited: LinkedHashSet<String> = LinkedHashSet::new();
        let mut dependencies = vec![];

        while let Some(id) = queue.pop_front() {
            if !visited.insert_if_absent(id.clone()) {
                continue;
            }
            let records = self.parse_module(&id)?;

            let mut seen = LinkedHashSet::new();
            for record in records {
                if !seen.insert_if_absent(record.specifier.clone()) {
                    continue;
                }
                let resolution = self.resolve(&id, &record.specifier)?;
                if let Resolution::Local(target) = &resolution {
                    queue.push_back(target.clone());
                }
                dependencies.push(ResolvedDependency {
                    importer: id.clone(),
                    specifier: record.specifier,
                    kind: record.kind,
                    resolution,
                });
            }
        }

        let (tags, html) = match &self.options.html {
            Some(html_options) => {
                let mut tags = AssetTagGroups {
                    head_tags: html_options
                        .stylesheets
                        .iter()
                        .map(HtmlTag::stylesheet)
                        .collect(),
                    body_tags: html_options
                        .scripts
                        .iter()
                        .map(HtmlTag::script_src)
                        .collect(),
                };
                self.plugin_driver.finalize_output(&mut tags)?;
                let html = tags.render_document(&html_options.title);
                (tags, Some(html))
            }
            None => (AssetTagGroups::default(), None),
        };

        Ok(BuildOutput {
            modules: visited.into_iter().collect(),
            dependencies,
            tags,
            html,
        })
    }

    /// Parses `id`, reporting its import declarations to the plugins.
    fn parse_module(&self, id: &str) -> anyhow::Result<Vec<ImportRecord>> {
        let source = self
            .options
            .modules
            .get(id)
            .ok_or_else(|| anyhow::format_err!("fail to load {:?}", id))?;
        let module = parse_file(source, id)?;

        let mut scanner = DependencyScanner::default();
        module.visit_with(&mut scanner);

        scanner
            .records
            .iter()
            .filter(|record| record.kind == ImportKind::Import)
            .for_each(|record| {
                self.plugin_driver.parse_import(ParseImportArgs {
                    importer: id,
                    source: &record.specifier,
                })
            });
        tracing::trace!("parsed {} with {} dependencies", id, scanner.records.len());
        Ok(scanner.records)
    }

    fn resolve(&self, importer: &str, specifier: &str) -> anyhow::Result<Resolution> {
        let decision = self.plugin_driver.resolve_dependency(ResolveArgs {
            importer: Some(importer),
            specifier,
        })?;
        Ok(match decision {
            Some(Decision::Externalize(module)) => Resolution::External(module),
            Some(Decision::CustomOverride(module)) => Resolution::Replaced(module),
            Some(Decision::Bundle) | None => {
                if is_relative(specifier) {
                    Resolution::Local(self.resolve_local(importer, specifier)?)
                } else {
                    Resolution::Vendor
                }
            }
        })
    }

    fn resolve_local(&self, importer: &str, specifier: &str) -> anyhow::Result<String> {
        let base_dir = Path::new(importer).parent().unwrap_or_else(|| Path::new(""));
        let joined = base_dir.join(specifier);
        let normalized = joined.normalize();
        let id = normalized
            .to_string_lossy()
            .replace('\\', "/")
            .trim_start_matches('/')
            .to_string();

        let candidates = if Path::new(&id).extension().is_some() {
            vec![id.clone()]
        } else {
            vec![format!("{}.js", id), format!("{}/index.js", id)]
        };
        tracing::trace!("resolved importer:{:?},specifier:{:?}", importer, specifier);
        candidates
            .into_iter()
            .find(|candidate| self.options.modules.contains_key(candidate))
            .ok_or_else(|| anyhow::format_err!("fail to resolve {:?} from {:?}", specifier, importer))
    }
}

fn is_relative(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../") || specifier.starts_with('/')
}
