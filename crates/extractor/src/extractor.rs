use crate::builtins::{is_builtin_function, is_builtin_method};
use crate::config::AnalyzerConfig;
use crate::syntax::{NodeId, NodeKind, SyntaxTree};
use crate::types::{CallSite, ReferenceKind, Symbol, SymbolKind, SymbolReference};
use std::collections::HashSet;

/// The five fact lists recovered from one syntax tree, in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facts {
    pub symbols: Vec<Symbol>,
    pub imports: Vec<String>,
    pub exports: Vec<String>,
    pub call_sites: Vec<CallSite>,
    pub symbol_references: Vec<SymbolReference>,
}

/// Walks a syntax tree once and records declarations, imports, exports,
/// call sites and symbol references.
///
/// Matching is driven by [`NodeKind`] only; no scopes or types are resolved.
#[derive(Debug, Clone, Default)]
pub struct FactExtractor {
    ignored_functions: HashSet<String>,
    ignored_methods: HashSet<String>,
}

impl FactExtractor {
    /// Extractor with the built-in denylists only
    pub fn new() -> Self {
        Self::default()
    }

    /// Extractor with the configured denylist additions
    pub fn with_config(config: &AnalyzerConfig) -> Self {
        Self {
            ignored_functions: config.ignored_functions.iter().cloned().collect(),
            ignored_methods: config.ignored_methods.iter().cloned().collect(),
        }
    }

    fn ignores_function(&self, name: &str) -> bool {
        is_builtin_function(name) || self.ignored_functions.contains(name)
    }

    fn ignores_method(&self, name: &str) -> bool {
        is_builtin_method(name) || self.ignored_methods.contains(name)
    }

    /// Single pre-order pass over `tree`; `path` is stamped on call sites and references
    pub fn extract(&self, tree: &SyntaxTree<'_>, path: &str) -> Facts {
        let mut walk = Walk {
            extractor: self,
            tree,
            path,
            facts: Facts::default(),
        };
        for id in tree.preorder() {
            walk.visit(id);
        }
        walk.facts
    }
}

struct Walk<'a, 't, 'src> {
    extractor: &'a FactExtractor,
    tree: &'t SyntaxTree<'src>,
    path: &'a str,
    facts: Facts,
}

impl<'t> Walk<'_, 't, '_> {
    fn visit(&mut self, id: NodeId) {
        match self.tree.kind(id) {
            NodeKind::FunctionDeclaration
            | NodeKind::FunctionSignature
            | NodeKind::MethodDefinition
            | NodeKind::FunctionExpression
            | NodeKind::ArrowFunction => {
                if let Some(name) = self.function_name(id) {
                    self.export_if_public(id, name);
                    self.push_symbol(id, name, SymbolKind::Function, true);
                }
            }
            NodeKind::ClassDeclaration => {
                if let Some(name) =
                    self.declared_name(id, &[NodeKind::Identifier, NodeKind::TypeIdentifier])
                {
                    self.export_if_public(id, name);
                    self.push_symbol(id, name, SymbolKind::Class, true);
                }
            }
            NodeKind::InterfaceDeclaration => {
                if let Some(name) = self.declared_name(id, &[NodeKind::TypeIdentifier]) {
                    self.export_if_public(id, name);
                    self.push_symbol(id, name, SymbolKind::Interface, true);
                }
            }
            NodeKind::TypeAliasDeclaration => {
                if let Some(name) = self.declared_name(id, &[NodeKind::TypeIdentifier]) {
                    self.export_if_public(id, name);
                    self.push_symbol(id, name, SymbolKind::Type, true);
                }
            }
            NodeKind::VariableDeclaration => {
                for &declarator in self.tree.children(id) {
                    if self.tree.kind(declarator) != NodeKind::VariableDeclarator {
                        continue;
                    }
                    if let Some(name) = self.bound_identifier(declarator) {
                        self.push_symbol(declarator, name, SymbolKind::Variable, false);
                    }
                }
            }
            NodeKind::BindingDeclaration => {
                if let Some(name) = self.bound_identifier(id) {
                    self.export_if_public(id, name);
                    self.push_symbol(id, name, SymbolKind::Variable, false);
                }
            }
            NodeKind::ImportStatement => {
                if let Some(source) = self.import_source(id) {
                    self.push_import(id, source);
                }
            }
            NodeKind::ModuleDeclaration => {
                // `mod name;` pulls in another file; inline modules do not
                if self.tree.child_by_field(id, "body").is_none() {
                    if let Some(name) = self.tree.first_child_of(id, NodeKind::Identifier) {
                        self.facts.imports.push(self.tree.text(name).to_string());
                    }
                }
            }
            NodeKind::ExportStatement => self.collect_exports(id),
            NodeKind::CallExpression => self.collect_call(id),
            NodeKind::NewExpression => self.collect_instantiation(id),
            NodeKind::ClassHeritage => self.collect_heritage(id),
            NodeKind::TypeIdentifier => self.collect_type_usage(id),
            NodeKind::Program
            | NodeKind::VariableDeclarator
            | NodeKind::ExportClause
            | NodeKind::ExportSpecifier
            | NodeKind::MemberExpression
            | NodeKind::ExtendsClause
            | NodeKind::AssignmentExpression
            | NodeKind::TypeAnnotation
            | NodeKind::TypeArguments
            | NodeKind::TypeParameter
            | NodeKind::Identifier
            | NodeKind::PropertyIdentifier
            | NodeKind::StringLiteral
            | NodeKind::ModulePath
            | NodeKind::Visibility
            | NodeKind::Wrapper
            | NodeKind::Error
            | NodeKind::Missing
            | NodeKind::Other => {}
        }
    }

    fn push_symbol(&mut self, id: NodeId, name: &str, kind: SymbolKind, with_end: bool) {
        let node = self.tree.node(id);
        self.facts.symbols.push(Symbol {
            name: name.to_string(),
            kind,
            start_line: node.start.row + 1,
            start_column: node.start.column,
            end_line: with_end.then_some(node.end.row + 1),
            end_column: with_end.then_some(node.end.column),
        });
    }

    fn push_reference(
        &mut self,
        at: NodeId,
        name: &str,
        symbol_kind: SymbolKind,
        reference_kind: ReferenceKind,
    ) {
        let node = self.tree.node(at);
        self.facts.symbol_references.push(SymbolReference {
            symbol_name: name.to_string(),
            symbol_kind,
            referenced_in_file: self.path.to_string(),
            line: node.start.row + 1,
            column: node.start.column,
            reference_kind,
        });
    }

    /// Name of a declaration: its `name` field, else its first child of an accepted kind
    fn declared_name(&self, id: NodeId, kinds: &[NodeKind]) -> Option<&'t str> {
        let tree = self.tree;
        let by_field = tree
            .child_by_field(id, "name")
            .filter(|&child| kinds.contains(&tree.kind(child)));
        by_field
            .or_else(|| {
                tree.children(id)
                    .iter()
                    .copied()
                    .find(|&child| kinds.contains(&tree.kind(child)))
            })
            .map(|child| tree.text(child))
    }

    /// Plain identifier bound by a declarator or binding declaration
    fn bound_identifier(&self, id: NodeId) -> Option<&'t str> {
        let tree = self.tree;
        ["name", "pattern"]
            .into_iter()
            .filter_map(|field| tree.child_by_field(id, field))
            .find(|&child| tree.kind(child) == NodeKind::Identifier)
            .map(|child| tree.text(child))
    }

    fn function_name(&self, id: NodeId) -> Option<&'t str> {
        let tree = self.tree;
        match tree.kind(id) {
            NodeKind::FunctionDeclaration | NodeKind::FunctionSignature => tree
                .first_child_of(id, NodeKind::Identifier)
                .map(|child| tree.text(child)),
            NodeKind::MethodDefinition => tree
                .first_child_of(id, NodeKind::PropertyIdentifier)
                .map(|child| tree.text(child)),
            NodeKind::FunctionExpression | NodeKind::ArrowFunction => self.binding_name(id),
            _ => None,
        }
    }

    /// Name an anonymous function by the declarator or plain assignment that
    /// holds it, looking through enclosing expressions (call arguments,
    /// ternaries, wrappers) but never past a function, class or file.
    fn binding_name(&self, id: NodeId) -> Option<&'t str> {
        let tree = self.tree;
        for ancestor in tree.ancestors(id) {
            match tree.kind(ancestor) {
                NodeKind::VariableDeclarator | NodeKind::BindingDeclaration => {
                    return self.bound_identifier(ancestor);
                }
                NodeKind::AssignmentExpression => {
                    let left = tree
                        .children(ancestor)
                        .first()
                        .copied()
                        .filter(|&left| tree.kind(left) == NodeKind::Identifier);
                    if let Some(left) = left {
                        return Some(tree.text(left));
                    }
                }
                NodeKind::Program | NodeKind::ClassDeclaration => return None,
                kind if kind.is_function_like() => return None,
                _ => {}
            }
        }
        None
    }

    fn export_if_public(&mut self, id: NodeId, name: &str) {
        let public = self
            .tree
            .first_child_of(id, NodeKind::Visibility)
            .is_some_and(|visibility| self.tree.text(visibility) == "pub");
        if public {
            self.facts.exports.push(name.to_string());
        }
    }

    fn import_source(&self, id: NodeId) -> Option<String> {
        let tree = self.tree;
        if let Some(string) = tree.first_child_of(id, NodeKind::StringLiteral) {
            return Some(strip_quotes(tree.text(string)).to_string());
        }
        tree.first_child_of(id, NodeKind::ModulePath)
            .or_else(|| tree.child_by_field(id, "argument"))
            .or_else(|| tree.first_descendant_of(id, NodeKind::ModulePath))
            .map(|path| tree.text(path).to_string())
    }

    fn push_import(&mut self, id: NodeId, source: String) {
        // `from . import a, b` pulls in the sibling modules `.a` and `.b`
        if !source.is_empty() && source.chars().all(|c| c == '.') {
            let names = self.imported_names(id);
            if !names.is_empty() {
                let imports = names.into_iter().map(|name| format!("{source}{name}"));
                self.facts.imports.extend(imports);
                return;
            }
        }
        self.facts.imports.push(source);
    }

    /// Names listed by a Python `from ... import` statement, aliases dropped
    fn imported_names(&self, id: NodeId) -> Vec<&'t str> {
        let tree = self.tree;
        tree.children(id)
            .iter()
            .copied()
            .filter(|&child| tree.node(child).field == Some("name"))
            .filter_map(|child| match tree.kind(child) {
                NodeKind::ModulePath => Some(child),
                _ => tree.child_by_field(child, "name"),
            })
            .map(|name| tree.text(name))
            .collect()
    }

    fn collect_exports(&mut self, id: NodeId) {
        let tree = self.tree;

        // re-exports name another module's symbols
        if tree.child_by_field(id, "source").is_some() {
            return;
        }

        if let Some(identifier) = tree.first_child_of(id, NodeKind::Identifier) {
            self.facts.exports.push(tree.text(identifier).to_string());
            return;
        }

        for &child in tree.children(id) {
            match tree.kind(child) {
                NodeKind::FunctionDeclaration
                | NodeKind::FunctionSignature
                | NodeKind::ClassDeclaration
                | NodeKind::InterfaceDeclaration
                | NodeKind::TypeAliasDeclaration => {
                    let name = self.declared_name(
                        child,
                        &[NodeKind::Identifier, NodeKind::TypeIdentifier],
                    );
                    if let Some(name) = name {
                        self.facts.exports.push(name.to_string());
                    }
                }
                NodeKind::VariableDeclaration => {
                    for &declarator in tree.children(child) {
                        if let Some(name) = self.bound_identifier(declarator) {
                            self.facts.exports.push(name.to_string());
                        }
                    }
                }
                NodeKind::ExportClause => {
                    for &specifier in tree.children(child) {
                        if tree.kind(specifier) != NodeKind::ExportSpecifier {
                            continue;
                        }
                        let exported = tree
                            .child_by_field(specifier, "alias")
                            .or_else(|| tree.child_by_field(specifier, "name"))
                            .filter(|&name| tree.kind(name) == NodeKind::Identifier);
                        if let Some(name) = exported {
                            self.facts.exports.push(tree.text(name).to_string());
                        }
                    }
                }
                _ => {}
            }
        }
    }

    /// Property name of a member access (`a.b`, `a::b`, `a.b` in Python)
    fn member_property(&self, id: NodeId) -> Option<&'t str> {
        let tree = self.tree;
        tree.first_child_of(id, NodeKind::PropertyIdentifier)
            .or_else(|| {
                ["name", "attribute"]
                    .into_iter()
                    .filter_map(|field| tree.child_by_field(id, field))
                    .find(|&child| {
                        matches!(
                            tree.kind(child),
                            NodeKind::Identifier | NodeKind::TypeIdentifier
                        )
                    })
            })
            .map(|child| tree.text(child))
    }

    /// Name of an identifier or the property of a member access
    fn referenced_name(&self, id: NodeId) -> Option<&'t str> {
        match self.tree.kind(id) {
            NodeKind::Identifier | NodeKind::TypeIdentifier => Some(self.tree.text(id)),
            NodeKind::MemberExpression => self.member_property(id),
            _ => None,
        }
    }

    fn collect_call(&mut self, id: NodeId) {
        let tree = self.tree;
        let Some(&first) = tree.children(id).first() else {
            return;
        };
        // `f::<T>()` calls the function inside the turbofish
        let mut callee = first;
        while tree.kind(callee) == NodeKind::Wrapper {
            match tree.child_by_field(callee, "function") {
                Some(inner) => callee = inner,
                None => return,
            }
        }

        let name = match tree.kind(callee) {
            NodeKind::Identifier => {
                let name = tree.text(callee);
                if name == "require" && tree.language().is_ecmascript() {
                    self.collect_require(id);
                }
                if self.extractor.ignores_function(name) {
                    return;
                }
                name
            }
            NodeKind::MemberExpression => match self.member_property(callee) {
                Some(name) if !self.extractor.ignores_method(name) => name,
                _ => return,
            },
            _ => return,
        };

        let node = tree.node(id);
        self.facts.call_sites.push(CallSite {
            callee_name: name.to_string(),
            line: node.start.row + 1,
            column: node.start.column,
            caller_file: self.path.to_string(),
        });
    }

    /// CommonJS `require("x")` imports `x`
    fn collect_require(&mut self, id: NodeId) {
        let tree = self.tree;
        let source = tree
            .child_by_field(id, "arguments")
            .and_then(|arguments| tree.first_child_of(arguments, NodeKind::StringLiteral));
        if let Some(source) = source {
            self.facts
                .imports
                .push(strip_quotes(tree.text(source)).to_string());
        }
    }

    fn collect_instantiation(&mut self, id: NodeId) {
        let tree = self.tree;
        let name = tree
            .child_by_field(id, "constructor")
            .or_else(|| tree.child_by_field(id, "name"))
            .and_then(|constructor| self.referenced_name(constructor));
        if let Some(name) = name {
            self.push_reference(id, name, SymbolKind::Class, ReferenceKind::Instantiation);
        }
    }

    fn collect_heritage(&mut self, id: NodeId) {
        let tree = self.tree;
        let mut bases = Vec::new();
        for &child in tree.children(id) {
            match tree.kind(child) {
                NodeKind::Identifier | NodeKind::MemberExpression => bases.push(child),
                NodeKind::ExtendsClause => bases.extend(tree.children(child).iter().copied().filter(
                    |&base| {
                        matches!(
                            tree.kind(base),
                            NodeKind::Identifier | NodeKind::MemberExpression
                        )
                    },
                )),
                _ => {}
            }
        }

        for base in bases {
            if let Some(name) = self.referenced_name(base) {
                self.push_reference(base, name, SymbolKind::Class, ReferenceKind::Inheritance);
            }
        }
    }

    fn collect_type_usage(&mut self, id: NodeId) {
        let tree = self.tree;
        let node = tree.node(id);

        if let Some(parent) = node.parent {
            let declares = match tree.kind(parent) {
                NodeKind::ClassDeclaration
                | NodeKind::InterfaceDeclaration
                | NodeKind::TypeAliasDeclaration => node.field == Some("name"),
                NodeKind::TypeParameter => matches!(node.field, None | Some("name" | "left")),
                NodeKind::NewExpression => true,
                _ => false,
            };
            if declares {
                return;
            }
        }

        // Known heuristic: anything under an annotation or type-argument
        // list is reported as an interface, everything else as a type.
        let symbol_kind = if self.in_type_annotation(id) {
            SymbolKind::Interface
        } else {
            SymbolKind::Type
        };
        let name = tree.text(id);
        self.push_reference(id, name, symbol_kind, ReferenceKind::Usage);
    }

    fn in_type_annotation(&self, id: NodeId) -> bool {
        for ancestor in self.tree.ancestors(id) {
            match self.tree.kind(ancestor) {
                NodeKind::TypeAnnotation | NodeKind::TypeArguments => return true,
                kind if is_annotation_boundary(kind) => return false,
                _ => {}
            }
        }
        false
    }
}

/// Constructs past which a type identifier no longer belongs to an annotation
fn is_annotation_boundary(kind: NodeKind) -> bool {
    kind.is_function_like()
        || matches!(
            kind,
            NodeKind::Program
                | NodeKind::ClassDeclaration
                | NodeKind::InterfaceDeclaration
                | NodeKind::TypeAliasDeclaration
                | NodeKind::VariableDeclaration
                | NodeKind::VariableDeclarator
                | NodeKind::BindingDeclaration
                | NodeKind::ClassHeritage
                | NodeKind::NewExpression
                | NodeKind::CallExpression
                | NodeKind::ImportStatement
                | NodeKind::ExportStatement
        )
}

fn strip_quotes(text: &str) -> &str {
    let is_quote = |c: char| matches!(c, '"' | '\'' | '`');
    let text = text.strip_prefix(is_quote).unwrap_or(text);
    text.strip_suffix(is_quote).unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::LanguageId;
    use crate::registry::GrammarRegistry;
    use crate::session::ParserSession;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn extract(code: &str, language: LanguageId) -> Facts {
        let mut session = ParserSession::new(Arc::new(GrammarRegistry::new()));
        session.initialize().unwrap();
        let tree = session.parse(code, language).unwrap();
        FactExtractor::new().extract(&tree, "test")
    }

    fn names(symbols: &[Symbol], kind: SymbolKind) -> Vec<&str> {
        symbols
            .iter()
            .filter(|symbol| symbol.kind == kind)
            .map(|symbol| symbol.name.as_str())
            .collect()
    }

    fn callees(facts: &Facts) -> Vec<&str> {
        facts
            .call_sites
            .iter()
            .map(|call| call.callee_name.as_str())
            .collect()
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("'./util'"), "./util");
        assert_eq!(strip_quotes("\"react\""), "react");
        assert_eq!(strip_quotes("plain"), "plain");
    }

    #[test]
    fn test_function_like_declarations() {
        let code = r#"
function declared() {}
const arrow = () => 1;
let expr = function () {};
assigned = function () {};
class Widget {
  render() {}
}
"#;
        let facts = extract(code, LanguageId::JavaScript);
        assert_eq!(
            names(&facts.symbols, SymbolKind::Function),
            vec!["declared", "arrow", "expr", "assigned", "render"]
        );
        assert_eq!(names(&facts.symbols, SymbolKind::Class), vec!["Widget"]);
        assert_eq!(names(&facts.symbols, SymbolKind::Variable), vec!["arrow", "expr"]);
    }

    #[test]
    fn test_anonymous_functions_are_not_symbols() {
        let code = "items.forEach(() => 1);\nsetTimeout(function () {}, 10);\nobj.handler = () => 2;\n";
        let facts = extract(code, LanguageId::JavaScript);
        assert!(names(&facts.symbols, SymbolKind::Function).is_empty());
    }

    #[test]
    fn test_callback_argument_takes_declarator_name() {
        let code = r#"
const handler = useCallback(() => { go() }, []);
const pick = flag ? () => 1 : null;
function outer() {
  items.forEach(() => step());
}
"#;
        let facts = extract(code, LanguageId::JavaScript);
        assert_eq!(
            names(&facts.symbols, SymbolKind::Function),
            vec!["handler", "pick", "outer"]
        );

        let handler = facts
            .symbols
            .iter()
            .find(|s| s.name == "handler" && s.kind == SymbolKind::Function)
            .unwrap();
        assert_eq!(handler.start_line, 2);
        assert_eq!(handler.start_column, 28);
    }

    #[test]
    fn test_nested_callback_does_not_inherit_outer_name() {
        let code = "const load = () => {\n  fetchAll().then(() => done());\n};\n";
        let facts = extract(code, LanguageId::JavaScript);
        assert_eq!(names(&facts.symbols, SymbolKind::Function), vec!["load"]);
    }

    #[test]
    fn test_parenthesized_function_keeps_binding_name() {
        let facts = extract("const wrapped = (() => 1);", LanguageId::JavaScript);
        assert_eq!(names(&facts.symbols, SymbolKind::Function), vec!["wrapped"]);
    }

    #[test]
    fn test_body_constructs_carry_end_positions() {
        let code = "function f() {\n  return 1;\n}\nconst x = 1;\n";
        let facts = extract(code, LanguageId::JavaScript);

        let function = &facts.symbols[0];
        assert_eq!(function.start_line, 1);
        assert_eq!(function.end_line, Some(3));
        assert_eq!(function.end_column, Some(1));

        let variable = &facts.symbols[1];
        assert_eq!(variable.kind, SymbolKind::Variable);
        assert_eq!(variable.start_line, 4);
        assert_eq!(variable.end_line, None);
        assert_eq!(variable.end_column, None);
    }

    #[test]
    fn test_destructuring_is_not_expanded() {
        let facts = extract("const { a, b } = obj;\nconst [c] = list;\nvar d = 1, e = 2;", LanguageId::JavaScript);
        assert_eq!(names(&facts.symbols, SymbolKind::Variable), vec!["d", "e"]);
    }

    #[test]
    fn test_typescript_declarations() {
        let code = r#"
interface Shape { area(): number }
type Id = string;
class Square implements Shape { area() { return 1 } }
declare function helper(x: number): void;
"#;
        let facts = extract(code, LanguageId::TypeScript);
        assert_eq!(names(&facts.symbols, SymbolKind::Interface), vec!["Shape"]);
        assert_eq!(names(&facts.symbols, SymbolKind::Type), vec!["Id"]);
        assert_eq!(names(&facts.symbols, SymbolKind::Class), vec!["Square"]);
        assert!(names(&facts.symbols, SymbolKind::Function).contains(&"helper"));
    }

    #[test]
    fn test_imports_keep_order_and_duplicates() {
        let code = "import a from './a';\nimport \"./b\";\nimport { c } from './a';\nconst d = require('./d');\n";
        let facts = extract(code, LanguageId::JavaScript);
        assert_eq!(facts.imports, vec!["./a", "./b", "./a", "./d"]);
        assert!(callees(&facts).is_empty());
    }

    #[test]
    fn test_exports() {
        let code = r#"
export function add(a, b) { return a + b }
export const one = 1, two = 2;
export default main;
export { helper as assist, other };
export { skipped } from './elsewhere';
export * from './all';
export default class {}
"#;
        let facts = extract(code, LanguageId::JavaScript);
        assert_eq!(
            facts.exports,
            vec!["add", "one", "two", "main", "assist", "other"]
        );
    }

    #[test]
    fn test_call_sites_skip_builtins() {
        let facts = extract("console.log(x); foo(x)", LanguageId::JavaScript);
        assert_eq!(callees(&facts), vec!["foo"]);

        let code = "items.map(f).filter(g);\nservice.fetchUser(1);\nparseInt('2');\nrender();\n";
        let facts = extract(code, LanguageId::JavaScript);
        assert_eq!(callees(&facts), vec!["fetchUser", "render"]);
    }

    #[test]
    fn test_configured_denylist() {
        let config = AnalyzerConfig {
            ignored_functions: vec!["invariant".into()],
            ignored_methods: vec!["emit".into()],
            ..Default::default()
        };
        let mut session = ParserSession::new(Arc::new(GrammarRegistry::new()));
        session.initialize().unwrap();
        let tree = session
            .parse("invariant(ok); bus.emit('x'); run();", LanguageId::JavaScript)
            .unwrap();
        let facts = FactExtractor::with_config(&config).extract(&tree, "test");
        assert_eq!(callees(&facts), vec!["run"]);
    }

    #[test]
    fn test_instantiation_and_inheritance() {
        let code = "class Dog extends Animal {}\nconst d = new Dog();\nconst m = new lib.Model();\n";
        let facts = extract(code, LanguageId::JavaScript);

        let refs: Vec<(&str, ReferenceKind)> = facts
            .symbol_references
            .iter()
            .map(|r| (r.symbol_name.as_str(), r.reference_kind))
            .collect();
        assert_eq!(
            refs,
            vec![
                ("Animal", ReferenceKind::Inheritance),
                ("Dog", ReferenceKind::Instantiation),
                ("Model", ReferenceKind::Instantiation),
            ]
        );
        assert!(facts
            .symbol_references
            .iter()
            .all(|r| r.symbol_kind == SymbolKind::Class));
    }

    #[test]
    fn test_typescript_heritage() {
        let facts = extract("class Square extends Shape {}", LanguageId::TypeScript);
        let inheritance: Vec<&str> = facts
            .symbol_references
            .iter()
            .filter(|r| r.reference_kind == ReferenceKind::Inheritance)
            .map(|r| r.symbol_name.as_str())
            .collect();
        assert_eq!(inheritance, vec!["Shape"]);
    }

    #[test]
    fn test_type_usage_classification() {
        let code = "type Alias = Target;\nlet value: Alias;\nlet list: Array<Item>;\n";
        let facts = extract(code, LanguageId::TypeScript);

        let usages: Vec<(&str, SymbolKind)> = facts
            .symbol_references
            .iter()
            .filter(|r| r.reference_kind == ReferenceKind::Usage)
            .map(|r| (r.symbol_name.as_str(), r.symbol_kind))
            .collect();
        assert_eq!(
            usages,
            vec![
                ("Target", SymbolKind::Type),
                ("Alias", SymbolKind::Interface),
                ("Array", SymbolKind::Interface),
                ("Item", SymbolKind::Interface),
            ]
        );
    }

    #[test]
    fn test_python_facts() {
        let code = r#"
import os.path
from .models import User

class Admin(User):
    def promote(self):
        notify(self)

handler = lambda event: event
"#;
        let facts = extract(code, LanguageId::Python);
        assert_eq!(facts.imports, vec!["os.path", ".models"]);
        assert_eq!(names(&facts.symbols, SymbolKind::Class), vec!["Admin"]);
        assert_eq!(
            names(&facts.symbols, SymbolKind::Function),
            vec!["promote", "handler"]
        );
        assert_eq!(callees(&facts), vec!["notify"]);
        assert_eq!(facts.symbol_references[0].symbol_name, "User");
        assert_eq!(
            facts.symbol_references[0].reference_kind,
            ReferenceKind::Inheritance
        );
    }

    #[test]
    fn test_python_bare_relative_import_names_modules() {
        let code = "from . import models, views as v\nfrom .. import config\nfrom .api import client\n";
        let facts = extract(code, LanguageId::Python);
        assert_eq!(facts.imports, vec![".models", ".views", "..config", ".api"]);
    }

    #[test]
    fn test_rust_facts() {
        let code = r#"
mod util;
use crate::util::add;

pub struct Point { x: i32 }
pub trait Shape {}
type Pair = (i32, i32);
pub const LIMIT: usize = 3;

pub fn total(p: Point) -> i32 {
    let doubled = add(p.x, p.x);
    let origin = Point { x: 0 };
    origin.scale(doubled)
}
"#;
        let facts = extract(code, LanguageId::Rust);
        assert_eq!(facts.imports, vec!["util", "crate::util::add"]);
        assert_eq!(names(&facts.symbols, SymbolKind::Class), vec!["Point"]);
        assert_eq!(names(&facts.symbols, SymbolKind::Interface), vec!["Shape"]);
        assert_eq!(names(&facts.symbols, SymbolKind::Type), vec!["Pair"]);
        assert_eq!(names(&facts.symbols, SymbolKind::Function), vec!["total"]);
        assert_eq!(
            names(&facts.symbols, SymbolKind::Variable),
            vec!["LIMIT", "doubled", "origin"]
        );
        assert_eq!(facts.exports, vec!["Point", "Shape", "LIMIT", "total"]);
        assert_eq!(callees(&facts), vec!["add", "scale"]);
        assert!(facts.symbol_references.iter().any(|r| {
            r.symbol_name == "Point" && r.reference_kind == ReferenceKind::Instantiation
        }));
    }

    #[test]
    fn test_rust_turbofish_calls() {
        let code = "fn run() {\n    let v = decode::<u8>(s);\n    store.lookup::<Record>(v);\n}\n";
        let facts = extract(code, LanguageId::Rust);
        assert_eq!(callees(&facts), vec!["decode", "lookup"]);
    }

    #[test]
    fn test_positions_are_one_based_lines() {
        let facts = extract("\n\nfoo();", LanguageId::JavaScript);
        assert_eq!(facts.call_sites[0].line, 3);
        assert_eq!(facts.call_sites[0].column, 0);
    }
}
