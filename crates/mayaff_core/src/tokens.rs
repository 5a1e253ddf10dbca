use tree_sitter::{Node, Tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifiers and keyword words.
    Name,
    /// Punctuation and operators.
    Op,
    /// A whole string literal, contents opaque.
    Str,
    Number,
}

/// One lexical token with its span: 0-based line, byte columns within that
/// line, end exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub start_col: usize,
    pub end_col: usize,
}

impl Token {
    pub fn is_op(&self, text: &str) -> bool {
        self.kind == TokenKind::Op && self.text == text
    }
}

/// Flatten a parse tree into its lexical tokens, in source order. Comments
/// are dropped; a string literal is one opaque token and is never descended
/// into, so flag-shaped text inside strings (including f-string
/// interpolations) is invisible to the scanner.
pub fn lex_tree(tree: &Tree, source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    collect(tree.root_node(), source, &mut tokens);
    tokens
}

fn collect(node: Node<'_>, source: &str, out: &mut Vec<Token>) {
    match node.kind() {
        "comment" => return,
        "string" | "concatenated_string" => {
            push_token(node, source, TokenKind::Str, out);
            return;
        }
        _ => {}
    }
    if node.child_count() == 0 {
        let kind = leaf_kind(&node, source);
        push_token(node, source, kind, out);
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect(child, source, out);
    }
}

fn leaf_kind(node: &Node<'_>, source: &str) -> TokenKind {
    match node.kind() {
        "identifier" => TokenKind::Name,
        "integer" | "float" => TokenKind::Number,
        _ => {
            // Keywords (`import`, `True`, ...) count as names, matching how a
            // word-shaped token reads in source.
            let text = node.utf8_text(source.as_bytes()).unwrap_or("");
            let mut chars = text.chars();
            match chars.next() {
                Some(first)
                    if (first.is_ascii_alphabetic() || first == '_')
                        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') =>
                {
                    TokenKind::Name
                }
                _ => TokenKind::Op,
            }
        }
    }
}

fn push_token(node: Node<'_>, source: &str, kind: TokenKind, out: &mut Vec<Token>) {
    if node.byte_range().is_empty() {
        return;
    }
    let start = node.start_position();
    let end = node.end_position();
    out.push(Token {
        kind,
        text: node.utf8_text(source.as_bytes()).unwrap_or("").to_string(),
        line: start.row,
        start_col: start.column,
        end_col: end.column,
    });
}

/// Index-based cursor over the token list: one current token plus a
/// one-token peek, which is all the scanner's grammar needs.
#[derive(Debug)]
pub struct TokenCursor {
    tokens: Vec<Token>,
    index: usize,
}

impl TokenCursor {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, index: 0 }
    }

    /// Consume the next token. Returns false at end of stream.
    pub fn advance(&mut self) -> bool {
        if self.index < self.tokens.len() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// The most recently consumed token.
    pub fn current(&self) -> Option<&Token> {
        self.index.checked_sub(1).and_then(|i| self.tokens.get(i))
    }

    /// The next token, without consuming it.
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::{Token, TokenCursor, TokenKind, lex_tree};
    use crate::imports::parse_python;

    fn lex(source: &str) -> Vec<Token> {
        let tree = parse_python(source, "<test>").expect("parse");
        lex_tree(&tree, source)
    }

    #[test]
    fn names_ops_and_spans() {
        let tokens = lex("cmds.delete(ch=True)\n");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["cmds", ".", "delete", "(", "ch", "=", "True", ")"]);

        let ch = &tokens[4];
        assert_eq!(ch.kind, TokenKind::Name);
        assert_eq!(ch.line, 0);
        assert_eq!(ch.start_col, 12);
        assert_eq!(ch.end_col, 14);

        assert!(tokens[3].is_op("("));
        assert_eq!(tokens[6].kind, TokenKind::Name); // keyword True
    }

    #[test]
    fn comments_are_dropped() {
        let tokens = lex("x = 1  # cmds.delete(ch=True)\n");
        assert!(tokens.iter().all(|t| !t.text.contains('#')));
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn strings_are_opaque() {
        let tokens = lex("x = \"cmds.delete(ch=True)\"\n");
        let strings: Vec<&Token> = tokens.iter().filter(|t| t.kind == TokenKind::Str).collect();
        assert_eq!(strings.len(), 1);
        assert_eq!(strings[0].text, "\"cmds.delete(ch=True)\"");
        assert!(tokens.iter().all(|t| t.text != "ch"));
    }

    #[test]
    fn triple_quoted_string_is_one_token() {
        let tokens = lex("x = '''\ncmds.delete(ch=True)\n'''\n");
        assert_eq!(
            tokens
                .iter()
                .filter(|t| t.kind == TokenKind::Str)
                .count(),
            1
        );
        assert!(tokens.iter().all(|t| t.text != "delete"));
    }

    #[test]
    fn second_line_columns_are_relative_to_line() {
        let tokens = lex("x = 1\ny = attr\n");
        let attr = tokens.iter().find(|t| t.text == "attr").expect("attr");
        assert_eq!(attr.line, 1);
        assert_eq!(attr.start_col, 4);
        assert_eq!(attr.end_col, 8);
    }

    #[test]
    fn cursor_peek_does_not_consume() {
        let mut cursor = TokenCursor::new(lex("a.b\n"));
        assert!(cursor.current().is_none());
        assert_eq!(cursor.peek().map(|t| t.text.as_str()), Some("a"));
        assert!(cursor.advance());
        assert_eq!(cursor.current().map(|t| t.text.as_str()), Some("a"));
        assert_eq!(cursor.peek().map(|t| t.text.as_str()), Some("."));
        assert!(cursor.advance());
        assert!(cursor.advance());
        assert_eq!(cursor.current().map(|t| t.text.as_str()), Some("b"));
        assert!(cursor.peek().is_none());
        assert!(!cursor.advance());
    }
}
