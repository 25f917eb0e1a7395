use std::sync::Arc;

use auto_external::{pipeline, HtmlOptions, PipelineOptions};
use auto_external_core::{
    loader::{CdnLoader, ExternalsRegistry, MemoryDocument},
    log::enable_tracing_by_env,
    AutoExternalOptions, AutoExternalPlugin,
};
use indexmap::IndexMap;

const OPTIONS: &str = r#"{
  "externals": {
    "vue": { "varName": "Vue", "url": "https://unpkg.com/vue@2.6.14/dist/vue.min.js" },
    "echarts": {
      "url": "https://unpkg.com/echarts@5.4.3/dist/echarts.min.js",
      "css": ["https://example.com/echarts-theme.css"]
    }
  }
}"#;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    enable_tracing_by_env();

    let plugin = AutoExternalPlugin::new(AutoExternalOptions::from_json(OPTIONS)?);
    // the page's registry shares the plugin's externals
    let registry = ExternalsRegistry::from(plugin.options().externals.clone());

    let output = pipeline(
        PipelineOptions {
            entry: "index.js".to_string(),
            modules: IndexMap::from([(
                "index.js".to_string(),
                "import Vue from 'vue';\nexport const chart = () => import('echarts');".to_string(),
            )]),
            html: Some(HtmlOptions {
                title: "basic".to_string(),
                ..Default::default()
            }),
        },
        vec![Box::new(plugin)],
    )?
    .build()?;
    println!("{}", output.html.unwrap_or_default());

    // what the bootstrap does in the browser when `echarts` is imported lazily
    let document = Arc::new(MemoryDocument::from_tags(&output.tags));
    document.set_global("echarts", serde_json::json!({ "version": "5.4.3" }));
    let loader = CdnLoader::new(registry, document.clone());

    let loading = loader.import_by_cdn("echarts");
    document
        .pending_urls()
        .iter()
        .for_each(|url| {
            document.dispatch_load(url);
        });
    println!("echarts global: {:?}", loading.await?);
    Ok(())
}
