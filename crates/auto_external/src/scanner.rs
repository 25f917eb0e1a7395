use swc_core::ecma::{
    ast::{CallExpr, Callee, ExportAll, Expr, ImportDecl, Lit, NamedExport},
    visit::{Visit, VisitWith},
};

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum ImportKind {
    /// `import x from 'a'`
    Import,
    /// `export { x } from 'a'`, `export * from 'a'`
    ReExport,
    /// `import('a')`
    DynamicImport,
    /// `require('a')`
    Require,
}

#[derive(Debug, Hash, PartialEq, Eq, Clone)]
pub struct ImportRecord {
    pub specifier: String,
    pub kind: ImportKind,
}

/// Collects every static specifier a module depends on, in source order.
#[derive(Debug, Default)]
pub struct DependencyScanner {
    pub records: Vec<ImportRecord>,
}

impl DependencyScanner {
    fn add(&mut self, specifier: &str, kind: ImportKind) {
        self.records.push(ImportRecord {
            specifier: specifier.to_string(),
            kind,
        });
    }

    fn add_call(&mut self, node: &CallExpr) {
        let kind = match &node.callee {
            Callee::Import(_) => ImportKind::DynamicImport,
            Callee::Expr(callee) => match callee.as_ref() {
                Expr::Ident(ident) if &*ident.sym == "require" => ImportKind::Require,
                _ => return,
            },
            _ => return,
        };
        if let Some(arg) = node.args.first() {
            if arg.spread.is_none() {
                if let Expr::Lit(Lit::Str(specifier)) = arg.expr.as_ref() {
                    self.add(&specifier.value, kind);
                }
            }
        }
    }
}

impl Visit for DependencyScanner {
    fn visit_import_decl(&mut self, node: &ImportDecl) {
        if !node.type_only {
            self.add(&node.src.value, ImportKind::Import);
        }
    }

    fn visit_named_export(&mut self, node: &NamedExport) {
        if let Some(src) = &node.src {
            self.add(&src.value, ImportKind::ReExport);
        }
    }

    fn visit_export_all(&mut self, node: &ExportAll) {
        self.add(&node.src.value, ImportKind::ReExport);
    }

    fn visit_call_expr(&mut self, node: &CallExpr) {
        self.add_call(node);
        node.visit_children_with(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_file;

    fn scan(code: &str) -> Vec<(String, ImportKind)> {
        let module = parse_file(code, "index.js").unwrap();
        let mut scanner = DependencyScanner::default();
        module.visit_with(&mut scanner);
        scanner
            .records
            .into_iter()
            .map(|record| (record.specifier, record.kind))
            .collect()
    }

    #[test]
    fn finds_every_kind_in_source_order() {
        let records = scan(
            r#"
            import Vue from 'vue';
            import { debounce } from 'lodash';
            export { default as Button } from './button';
            export * from './utils';
            const moment = require('moment');
            function later() {
                return import('echarts').then((m) => m.init(moment()));
            }
            "#,
        );
        assert_eq!(
            records,
            vec![
                ("vue".to_string(), ImportKind::Import),
                ("lodash".to_string(), ImportKind::Import),
                ("./button".to_string(), ImportKind::ReExport),
                ("./utils".to_string(), ImportKind::ReExport),
                ("moment".to_string(), ImportKind::Require),
                ("echarts".to_string(), ImportKind::DynamicImport),
            ]
        );
    }

    #[test]
    fn ignores_non_literal_calls() {
        let records = scan("const name = 'x'; import(name); require(`a`); foo('bar');");
        assert!(records.is_empty());
    }
}
