use std::path::Path;

use auto_external::{pipeline, BuildOutput, HtmlOptions, PipelineOptions};
use auto_external_core::{AutoExternalOptions, AutoExternalPlugin};
use indexmap::IndexMap;
use sugar_path::SugarPath;

/// Builds the fixture whose entry is `entry_path` and compares the generated
/// page with `expected.html` next to it.
pub fn test_fixture(entry_path: &Path) -> BuildOutput {
    let fixture_dir = entry_path.parent().unwrap();

    let options = match std::fs::read_to_string(fixture_dir.join("options.json")) {
        Ok(json) => AutoExternalOptions::from_json(&json)
            .unwrap_or_else(|err| panic!("invalid options in {:?}: {}", fixture_dir, err)),
        Err(_) => AutoExternalOptions::default(),
    };

    let mut modules = IndexMap::new();
    collect_modules(fixture_dir, fixture_dir, &mut modules);

    let output = pipeline(
        PipelineOptions {
            entry: "index.js".to_string(),
            modules,
            html: Some(HtmlOptions::default()),
        },
        vec![Box::new(AutoExternalPlugin::new(options))],
    )
    .unwrap()
    .build()
    .unwrap_or_else(|err| panic!("failed to build fixture {:?}: {:?}", fixture_dir, err));

    let expected = std::fs::read_to_string(fixture_dir.join("expected.html")).unwrap();
    assert_eq!(
        output.html.as_deref().unwrap().trim(),
        expected.trim(),
        "html test failed in fixture:{:?}",
        fixture_dir
    );
    output
}

fn collect_modules(root: &Path, dir: &Path, modules: &mut IndexMap<String, String>) {
    let mut entries = std::fs::read_dir(dir)
        .unwrap()
        .flat_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .collect::<Vec<_>>();
    entries.sort();
    entries.into_iter().for_each(|path| {
        if path.is_dir() {
            collect_modules(root, &path, modules);
        } else if path.extension().map_or(false, |ext| ext == "js") {
            let id = path
                .relative(root)
                .to_string_lossy()
                .replace('\\', "/");
            modules.insert(id, std::fs::read_to_string(&path).unwrap());
        }
    });
}
