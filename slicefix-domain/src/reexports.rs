//! A lightweight scanner for the names a TypeScript/JavaScript module exports.
//!
//! Public-surface files are mostly re-export lists (`export { UserCard } from './ui/UserCard'`),
//! so a token-level scan is enough. Comments and string contents are skipped. The scanner never
//! fails: anything it does not understand contributes no names.

use std::collections::BTreeSet;

/// Names exported by one file plus the specifiers of its `export * from` statements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSet {
    pub names: BTreeSet<String>,
    pub star_sources: Vec<String>,
}

impl ExportSet {
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn extend(&mut self, other: ExportSet) {
        self.names.extend(other.names);
        self.star_sources.extend(other.star_sources);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Str(String),
    Punct(char),
}

impl Token {
    fn ident(&self) -> Option<&str> {
        match self {
            Token::Ident(s) => Some(s),
            _ => None,
        }
    }

    fn is_ident(&self, want: &str) -> bool {
        self.ident() == Some(want)
    }

    fn is_punct(&self, want: char) -> bool {
        matches!(self, Token::Punct(c) if *c == want)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn tokenize(src: &str) -> Vec<Token> {
    let chars: Vec<char> = src.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
        } else if c == '/' && chars.get(i + 1) == Some(&'/') {
            while i < chars.len() && chars[i] != '\n' {
                i += 1;
            }
        } else if c == '/' && chars.get(i + 1) == Some(&'*') {
            i += 2;
            while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                i += 1;
            }
            i += 2;
        } else if c == '"' || c == '\'' {
            let (s, next) = read_quoted(&chars, i + 1, c);
            tokens.push(Token::Str(s));
            i = next;
        } else if c == '`' {
            i = skip_template(&chars, i + 1);
        } else if is_ident_start(c) {
            let start = i;
            while i < chars.len() && is_ident_continue(chars[i]) {
                i += 1;
            }
            tokens.push(Token::Ident(chars[start..i].iter().collect()));
        } else if c.is_ascii_digit() {
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '.') {
                i += 1;
            }
        } else {
            tokens.push(Token::Punct(c));
            i += 1;
        }
    }
    tokens
}

fn read_quoted(chars: &[char], mut i: usize, quote: char) -> (String, usize) {
    let mut out = String::new();
    while i < chars.len() {
        match chars[i] {
            '\\' => {
                if let Some(&escaped) = chars.get(i + 1) {
                    out.push(escaped);
                }
                i += 2;
            }
            '\n' => return (out, i + 1),
            c if c == quote => return (out, i + 1),
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
    (out, i)
}

fn skip_template(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            '`' => return i + 1,
            '$' if chars.get(i + 1) == Some(&'{') => {
                let mut depth = 1usize;
                i += 2;
                while i < chars.len() && depth > 0 {
                    match chars[i] {
                        '{' => depth += 1,
                        '}' => depth -= 1,
                        _ => {}
                    }
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }
    i
}

/// Scans `source` for exported names.
pub fn scan_exports(source: &str) -> ExportSet {
    let tokens = tokenize(source);
    let mut out = ExportSet::default();

    for (idx, tok) in tokens.iter().enumerate() {
        if !tok.is_ident("export") {
            continue;
        }
        // `foo.export` and `{ export: 1 }` are not statements.
        if idx > 0 && tokens[idx - 1].is_punct('.') {
            continue;
        }
        let rest = &tokens[idx + 1..];
        if rest.first().is_some_and(|t| t.is_punct(':')) {
            continue;
        }
        scan_export_statement(rest, &mut out);
    }

    out
}

fn scan_export_statement(rest: &[Token], out: &mut ExportSet) {
    let Some(first) = rest.first() else {
        return;
    };

    match first {
        Token::Punct('{') => collect_braced_list(&rest[1..], out),
        Token::Punct('*') => scan_star(&rest[1..], out),
        Token::Ident(kw) => match kw.as_str() {
            "default" => {
                out.names.insert("default".to_string());
            }
            "type" if rest.get(1).is_some_and(|t| t.is_punct('{')) => {
                collect_braced_list(&rest[2..], out)
            }
            "type" if rest.get(1).is_some_and(|t| t.is_punct('*')) => scan_star(&rest[2..], out),
            "declare" => scan_export_statement(&rest[1..], out),
            "async" => scan_export_statement(&rest[1..], out),
            "abstract" => scan_export_statement(&rest[1..], out),
            "const" if rest.get(1).is_some_and(|t| t.is_ident("enum")) => {
                push_ident(rest.get(2), out)
            }
            "const" | "let" | "var" => collect_binding(&rest[1..], out),
            "function" => {
                let skip = if rest.get(1).is_some_and(|t| t.is_punct('*')) {
                    2
                } else {
                    1
                };
                push_ident(rest.get(skip), out)
            }
            "class" | "interface" | "type" | "enum" | "namespace" | "module" | "import" => {
                push_ident(rest.get(1), out)
            }
            _ => {}
        },
        _ => {}
    }
}

fn push_ident(tok: Option<&Token>, out: &mut ExportSet) {
    if let Some(name) = tok.and_then(Token::ident) {
        out.names.insert(name.to_string());
    }
}

/// `{ a, b as c, type D, "e-f" as g }`: the last name of each entry is what gets exported.
fn collect_braced_list(tokens: &[Token], out: &mut ExportSet) {
    let mut last: Option<String> = None;
    for tok in tokens {
        match tok {
            Token::Punct('}') => break,
            Token::Punct(',') => {
                if let Some(name) = last.take() {
                    out.names.insert(name);
                }
            }
            Token::Ident(s) | Token::Str(s) => {
                if s != "as" || last.is_none() {
                    last = Some(s.clone());
                }
            }
            Token::Punct(_) => {}
        }
    }
    if let Some(name) = last {
        out.names.insert(name);
    }
}

/// After `export *`: either `as ns from '...'` or `from '...'`.
fn scan_star(tokens: &[Token], out: &mut ExportSet) {
    match tokens {
        [Token::Ident(kw), Token::Ident(ns), ..] if kw == "as" => {
            out.names.insert(ns.clone());
        }
        [Token::Ident(kw), Token::Str(source), ..] if kw == "from" => {
            out.star_sources.push(source.clone());
        }
        _ => {}
    }
}

/// `const a = 1, b = 2` and destructuring patterns like `const { a, b: c } = obj`.
///
/// Type annotations and initializers are skipped up to the next `,` outside any bracket,
/// including `<...>`, so type arguments (`Record<string, Selector>`) and type parameter lists
/// (`<T,>(x: T) => x`) never contribute names. A `<` comparison in an initializer hides the
/// names after it.
fn collect_binding(tokens: &[Token], out: &mut ExportSet) {
    let mut depth = 0usize;
    let mut angle = 0usize;
    let mut collecting = true;
    // Bracket depth of a default value inside a pattern: `{ a = fallback }`.
    let mut default_at: Option<usize> = None;
    let mut prev: Option<&Token> = None;
    let mut iter = tokens.iter().peekable();

    while let Some(tok) = iter.next() {
        match tok {
            Token::Punct('{' | '[' | '(') => depth += 1,
            Token::Punct('}' | ']' | ')') => {
                if depth == 0 {
                    return;
                }
                depth -= 1;
                if default_at.is_some_and(|d| depth < d) {
                    default_at = None;
                }
                if depth == 0 && collecting && matches!(tok, Token::Punct('}' | ']')) {
                    // pattern closed; an annotation or the initializer follows.
                    collecting = false;
                }
            }
            Token::Punct('<') if !collecting => angle += 1,
            // `=>` is an arrow, not a closing bracket.
            Token::Punct('>') if !collecting && !prev.is_some_and(|p| p.is_punct('=')) => {
                angle = angle.saturating_sub(1);
            }
            Token::Punct('=') if collecting => {
                if depth == 0 {
                    collecting = false;
                } else if default_at.is_none() {
                    default_at = Some(depth);
                }
            }
            Token::Punct(',') if depth == 0 && angle == 0 => collecting = true,
            Token::Punct(',') if default_at == Some(depth) => default_at = None,
            Token::Punct(';') if depth == 0 => return,
            Token::Ident(name) if collecting && default_at.is_none() => {
                let followed_by_colon = iter.peek().is_some_and(|t| t.is_punct(':'));
                if depth == 0 && followed_by_colon {
                    // type annotation: `const a: Foo = ...`
                    out.names.insert(name.clone());
                    collecting = false;
                } else if !followed_by_colon {
                    out.names.insert(name.clone());
                }
            }
            _ => {}
        }
        prev = Some(tok);
    }
}
