use tree_sitter::{Node, Parser, Tree};

use crate::Error;
use crate::config::ModulePair;

/// Parse a Python source file. Sources that do not form a valid parse tree
/// (for example Python 2 statements) fail here, before any scanning.
pub fn parse_python(source: &str, file_name: &str) -> Result<Tree, Error> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::language())
        .map_err(|err| Error::Config(format!("tree-sitter python grammar: {err}")))?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| Error::parse(file_name, "parser returned no tree"))?;
    if tree.root_node().has_error() || has_legacy_statement(tree.root_node()) {
        return Err(Error::parse(file_name, "invalid syntax"));
    }
    Ok(tree)
}

/// The grammar accepts some Python 2 statements (`print "x"`, `exec "x"`) as
/// dedicated legacy node kinds rather than error nodes. Those dialects are
/// rejected like any other syntax failure; Python 3 `print("x")` is an
/// ordinary call node and passes.
fn has_legacy_statement(node: Node<'_>) -> bool {
    match node.kind() {
        "print_statement" | "exec_statement" => true,
        _ => {
            let mut cursor = node.walk();
            node.named_children(&mut cursor).any(has_legacy_statement)
        }
    }
}

/// Collect the local names bound to a configured command namespace by this
/// file's import statements. An empty result means the file never imports the
/// namespace and needs no scan.
pub fn resolve_aliases(tree: &Tree, source: &str, modules: &[ModulePair]) -> Vec<String> {
    let mut aliases = Vec::new();
    walk(tree.root_node(), source, modules, &mut aliases);
    aliases
}

fn walk(node: Node<'_>, source: &str, modules: &[ModulePair], aliases: &mut Vec<String>) {
    match node.kind() {
        "import_statement" => collect_plain_import(node, source, modules, aliases),
        "import_from_statement" => collect_from_import(node, source, modules, aliases),
        _ => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                walk(child, source, modules, aliases);
            }
        }
    }
}

/// `import a.b.c` binds `a.b.c`; `import a.b.c as x` binds `x`. Only paths
/// equal to a configured `module.member` qualify.
fn collect_plain_import(
    node: Node<'_>,
    source: &str,
    modules: &[ModulePair],
    aliases: &mut Vec<String>,
) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        let Some((name, alias)) = import_entry(child, source) else {
            continue;
        };
        if modules.iter().any(|pair| pair.dotted() == name) {
            aliases.push(alias.unwrap_or(name));
        }
    }
}

/// `from a.b import m` binds `m`; `from a.b import m as x` binds `x`.
/// Restricted to `a.b == module` and `m == member` of a configured pair.
fn collect_from_import(
    node: Node<'_>,
    source: &str,
    modules: &[ModulePair],
    aliases: &mut Vec<String>,
) {
    let Some(module_node) = node.child_by_field_name("module_name") else {
        return;
    };
    let module = node_text(module_node, source);
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.id() == module_node.id() {
            continue;
        }
        let Some((name, alias)) = import_entry(child, source) else {
            continue;
        };
        if modules
            .iter()
            .any(|pair| pair.module == module && pair.member == name)
        {
            aliases.push(alias.unwrap_or(name));
        }
    }
}

/// `(imported name, optional alias)` for one import list entry; `None` for
/// wildcard imports and punctuation.
fn import_entry(node: Node<'_>, source: &str) -> Option<(String, Option<String>)> {
    match node.kind() {
        "dotted_name" => Some((node_text(node, source), None)),
        "aliased_import" => {
            let name = node.child_by_field_name("name")?;
            let alias = node.child_by_field_name("alias")?;
            Some((
                node_text(name, source),
                Some(node_text(alias, source)),
            ))
        }
        _ => None,
    }
}

fn node_text(node: Node<'_>, source: &str) -> String {
    node.utf8_text(source.as_bytes()).unwrap_or("").to_string()
}
