//! Minimal s-expression tree used by KiCad's text formats.
//!
//! Atoms keep their exact source text so that numbers and identifiers
//! survive a read/write cycle unchanged. Quoted strings are kept separate
//! from bare symbols because KiCad distinguishes `(hide yes)` from
//! `(name "yes")`.

use std::fmt;

use super::{KicadError, KicadResult};

/// Lists whose flat rendering fits within this width are written on one line.
const INLINE_WIDTH: usize = 80;

/// Nodes that are always written in block form.
const BLOCK_NODES: &[&str] = &["kicad_symbol_lib", "symbol", "pin", "property"];

/// An s-expression value.
#[derive(Debug, Clone, PartialEq)]
pub enum Sexpr {
    /// Bare atom (`yes`, `0`, `power_in`).
    Symbol(String),
    /// Quoted atom.
    String(String),
    /// Parenthesised list.
    List(Vec<Sexpr>),
}

impl Sexpr {
    /// Creates a bare atom.
    pub fn symbol(s: impl Into<String>) -> Self {
        Self::Symbol(s.into())
    }

    /// Creates a quoted atom.
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    /// Creates a bare numeric atom using KiCad's number formatting.
    #[must_use]
    pub fn number(value: f64) -> Self {
        Self::Symbol(format_number(value))
    }

    /// Creates `(name items...)`.
    pub fn node(name: &str, items: impl IntoIterator<Item = Self>) -> Self {
        let mut list = vec![Self::symbol(name)];
        list.extend(items);
        Self::List(list)
    }

    /// Creates `(name yes|no)`.
    #[must_use]
    pub fn flag(name: &str, value: bool) -> Self {
        Self::node(name, [Self::symbol(if value { "yes" } else { "no" })])
    }

    /// Returns the atom text for symbols and strings.
    #[must_use]
    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Self::Symbol(s) | Self::String(s) => Some(s),
            Self::List(_) => None,
        }
    }

    /// Returns the list items if this is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the leading bare symbol of a list (`pin` for `(pin ...)`).
    #[must_use]
    pub fn head(&self) -> Option<&str> {
        match self.as_list()?.first()? {
            Self::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the atom at `index` in a list.
    #[must_use]
    pub fn atom_at(&self, index: usize) -> Option<&str> {
        self.as_list()?.get(index)?.as_atom()
    }

    /// Parses the atom at `index` as a number.
    #[must_use]
    pub fn number_at(&self, index: usize) -> Option<f64> {
        self.atom_at(index)?.parse().ok()
    }

    /// Iterates over child lists whose head is `name`.
    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.as_list()
            .unwrap_or_default()
            .iter()
            .filter(move |item| item.head() == Some(name))
    }

    /// Returns the first child list whose head is `name`.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.as_list()?.iter().find(|item| item.head() == Some(name))
    }

    /// Returns true if the list contains `(name yes)` or a bare `name` atom.
    ///
    /// KiCad 6/7 wrote flags as bare atoms (`hide`), KiCad 8+ as
    /// `(hide yes)`; both spellings are accepted.
    #[must_use]
    pub fn has_flag(&self, name: &str) -> bool {
        let Some(items) = self.as_list() else {
            return false;
        };
        items.iter().skip(1).any(|item| match item {
            Self::Symbol(s) => s == name,
            Self::List(_) => {
                item.head() == Some(name) && item.atom_at(1).map_or(true, |v| v == "yes")
            }
            Self::String(_) => false,
        })
    }

    /// Reads `(name yes|no)`, returning `None` when the child is absent.
    #[must_use]
    pub fn flag_value(&self, name: &str) -> Option<bool> {
        self.child(name).map(|c| c.atom_at(1) != Some("no"))
    }
}

impl fmt::Display for Sexpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        write_sexpr(&mut out, self, 0);
        f.write_str(&out)
    }
}

/// Formats a coordinate the way KiCad does: at most four decimals, no
/// trailing zeros, no negative zero.
#[must_use]
pub fn format_number(value: f64) -> String {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let text = format!("{rounded:.4}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    text.to_string()
}

/// Parses a complete document containing exactly one top-level list.
///
/// # Errors
///
/// Returns [`KicadError::Syntax`] on malformed input or trailing content.
pub fn parse(input: &str) -> KicadResult<Sexpr> {
    let mut parser = Parser::new(input);
    let value = parser.parse_value()?;
    parser.skip_whitespace();
    if parser.pos < input.len() {
        return Err(KicadError::syntax(parser.pos, "unexpected content after root"));
    }
    Ok(value)
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn parse_value(&mut self) -> KicadResult<Sexpr> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(KicadError::syntax(self.pos, "unexpected end of input")),
            Some('(') => self.parse_list(),
            Some(')') => Err(KicadError::syntax(self.pos, "unexpected ')'")),
            Some('"') => self.parse_string(),
            Some(_) => Ok(self.parse_symbol()),
        }
    }

    fn parse_list(&mut self) -> KicadResult<Sexpr> {
        let start = self.pos;
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(KicadError::syntax(start, "unclosed list")),
                Some(')') => {
                    self.bump();
                    return Ok(Sexpr::List(items));
                }
                Some(_) => items.push(self.parse_value()?),
            }
        }
    }

    fn parse_string(&mut self) -> KicadResult<Sexpr> {
        let start = self.pos;
        self.bump();
        let mut text = String::new();
        loop {
            match self.bump() {
                None => return Err(KicadError::syntax(start, "unterminated string")),
                Some('"') => return Ok(Sexpr::String(text)),
                Some('\\') => match self.bump() {
                    Some('n') => text.push('\n'),
                    Some('r') => text.push('\r'),
                    Some('t') => text.push('\t'),
                    Some(other) => text.push(other),
                    None => return Err(KicadError::syntax(start, "unterminated string")),
                },
                Some(ch) => text.push(ch),
            }
        }
    }

    fn parse_symbol(&mut self) -> Sexpr {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() || ch == '(' || ch == ')' || ch == '"' {
                break;
            }
            self.bump();
        }
        Sexpr::Symbol(self.input[start..self.pos].to_string())
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

fn flat(sexpr: &Sexpr) -> String {
    match sexpr {
        Sexpr::Symbol(s) => s.clone(),
        Sexpr::String(s) => escape(s),
        Sexpr::List(items) => {
            let inner: Vec<String> = items.iter().map(flat).collect();
            format!("({})", inner.join(" "))
        }
    }
}

fn write_sexpr(out: &mut String, sexpr: &Sexpr, depth: usize) {
    let Sexpr::List(items) = sexpr else {
        out.push_str(&flat(sexpr));
        return;
    };

    let block = sexpr.head().is_some_and(|h| BLOCK_NODES.contains(&h));
    let rendered = flat(sexpr);
    if !block && rendered.len() + depth <= INLINE_WIDTH {
        out.push_str(&rendered);
        return;
    }

    out.push('(');
    let mut seen_list = false;
    for (i, item) in items.iter().enumerate() {
        if matches!(item, Sexpr::List(_)) || seen_list {
            seen_list = true;
            out.push('\n');
            out.push_str(&"\t".repeat(depth + 1));
            write_sexpr(out, item, depth + 1);
        } else {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(&flat(item));
        }
    }
    if seen_list {
        out.push('\n');
        out.push_str(&"\t".repeat(depth));
    }
    out.push(')');
}
