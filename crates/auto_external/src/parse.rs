use swc_core::{
    common::{sync::Lrc, FileName, SourceMap},
    ecma::{
        ast::{EsVersion, Module},
        parser::{lexer::Lexer, Parser, StringInput, Syntax},
    },
};
use tracing::instrument;

#[instrument(skip(source_code))]
pub fn parse_file(source_code: &str, filename: &str) -> anyhow::Result<Module> {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(FileName::Custom(filename.to_string()), source_code.to_string());
    let lexer = Lexer::new(
        Syntax::Es(Default::default()),
        EsVersion::Es2022,
        StringInput::from(&*fm),
        None,
    );
    let mut parser = Parser::new_from(lexer);
    let module = parser
        .parse_module()
        .map_err(|err| anyhow::format_err!("fail to parse {}: {:?}", filename, err.kind()))?;
    parser.take_errors().into_iter().for_each(|err| {
        tracing::warn!("recovered from {:?} in {}", err.kind(), filename);
    });
    Ok(module)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_es_modules() {
        let module = parse_file("import a from 'a';\nexport default a;", "index.js").unwrap();
        assert_eq!(module.body.len(), 2);
    }

    #[test]
    fn reports_the_file_on_syntax_errors() {
        let err = parse_file("const = 1;", "broken.js").unwrap_err();
        assert!(err.to_string().contains("broken.js"));
    }
}
