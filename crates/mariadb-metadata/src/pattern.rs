//! Catalog and name filters.
//!
//! Caller arguments arrive as `Option<&str>` with JDBC conventions: `None`
//! means "don't filter", `""` has a catalog-specific or configurable meaning,
//! and pattern arguments accept `%` / `_` wildcards with `\` as escape.
//! They are resolved once into [`CatalogFilter`] / [`NamePattern`] values,
//! which can both render a SQL predicate and match a candidate in memory
//! with the same semantics.

use serde::{Deserialize, Serialize};

use crate::config::MetadataOptions;

/// How an empty table/column name pattern is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyPattern {
    /// `""` behaves like `None`: no filtering.
    #[default]
    MatchAll,
    /// `""` only matches objects with an empty name (i.e. nothing).
    MatchEmpty,
}

/// Resolved catalog argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogFilter {
    /// Every catalog.
    Any,
    /// The connection's default catalog; everything when none is selected.
    Current,
    /// One named catalog, compared case-insensitively.
    Named(String),
}

impl CatalogFilter {
    /// Resolve a caller's catalog argument.
    ///
    /// `None` and `""` resolve identically unless
    /// `null_catalog_means_current` is turned off.
    pub fn resolve(catalog: Option<&str>, options: &MetadataOptions) -> Self {
        match catalog {
            None if options.null_catalog_means_current => CatalogFilter::Current,
            None => CatalogFilter::Any,
            Some("") => CatalogFilter::Current,
            Some(name) => CatalogFilter::Named(name.to_string()),
        }
    }

    /// Whether `candidate` passes, given the connection's default catalog.
    pub fn matches(&self, candidate: &str, current: Option<&str>) -> bool {
        match self {
            CatalogFilter::Any => true,
            CatalogFilter::Current => current.map_or(true, |c| c.eq_ignore_ascii_case(candidate)),
            CatalogFilter::Named(name) => name.eq_ignore_ascii_case(candidate),
        }
    }

    /// SQL predicate over `column`, pushing bind values onto `params`.
    ///
    /// Both sides are upper-cased, so the comparison ignores case even where
    /// schema names use a binary collation.
    pub fn sql_clause(&self, column: &str, params: &mut Vec<String>) -> Option<String> {
        match self {
            CatalogFilter::Any => None,
            CatalogFilter::Current => Some(format!(
                "(ISNULL(DATABASE()) OR UPPER({}) = UPPER(DATABASE()))",
                column
            )),
            CatalogFilter::Named(name) => {
                params.push(name.clone());
                Some(format!("UPPER({}) = UPPER(?)", column))
            }
        }
    }
}

/// Resolved table or column name argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamePattern {
    Any,
    /// Matches only the empty name.
    Empty,
    /// Literal name, case-sensitive.
    Exact(String),
    /// LIKE pattern, case-sensitive.
    Like(String),
}

impl NamePattern {
    /// Resolve a pattern argument (`tableNamePattern`, `columnNamePattern`).
    pub fn pattern(arg: Option<&str>, empty: EmptyPattern) -> Self {
        match arg {
            None | Some("%") => NamePattern::Any,
            Some("") => Self::empty(empty),
            Some(p) if has_wildcards(p) => NamePattern::Like(p.to_string()),
            Some(p) => NamePattern::Exact(unescape(p)),
        }
    }

    /// Resolve a plain name argument (the `table` of key and index operations).
    pub fn name(arg: Option<&str>, empty: EmptyPattern) -> Self {
        match arg {
            None => NamePattern::Any,
            Some("") => Self::empty(empty),
            Some(n) => NamePattern::Exact(n.to_string()),
        }
    }

    fn empty(policy: EmptyPattern) -> Self {
        match policy {
            EmptyPattern::MatchAll => NamePattern::Any,
            EmptyPattern::MatchEmpty => NamePattern::Empty,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, NamePattern::Any)
    }

    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            NamePattern::Any => true,
            NamePattern::Empty => candidate.is_empty(),
            NamePattern::Exact(name) => name == candidate,
            NamePattern::Like(pattern) => like_match(pattern, candidate),
        }
    }

    /// SQL predicate over `column`, pushing bind values onto `params`.
    ///
    /// Comparisons go through `CAST(... AS BINARY)` so they stay
    /// case-sensitive whatever the column collation is.
    pub fn sql_clause(&self, column: &str, params: &mut Vec<String>) -> Option<String> {
        match self {
            NamePattern::Any => None,
            NamePattern::Empty => Some(format!("{} = ''", column)),
            NamePattern::Exact(name) => {
                params.push(name.clone());
                Some(format!("CAST({} AS BINARY) = CAST(? AS BINARY)", column))
            }
            NamePattern::Like(pattern) => {
                params.push(pattern.clone());
                Some(format!("CAST({} AS BINARY) LIKE CAST(? AS BINARY)", column))
            }
        }
    }
}

/// Catalog + table name target of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableFilter {
    pub catalog: CatalogFilter,
    pub table: NamePattern,
}

impl TableFilter {
    pub fn new(catalog: CatalogFilter, table: NamePattern) -> Self {
        Self { catalog, table }
    }

    /// Every table of every catalog.
    pub fn any() -> Self {
        Self::new(CatalogFilter::Any, NamePattern::Any)
    }

    pub fn matches(&self, catalog: &str, table: &str, current: Option<&str>) -> bool {
        self.catalog.matches(catalog, current) && self.table.matches(table)
    }

    /// Predicates for the given catalog and table columns.
    pub fn sql_clauses(
        &self,
        catalog_col: &str,
        table_col: &str,
        params: &mut Vec<String>,
    ) -> Vec<String> {
        self.catalog
            .sql_clause(catalog_col, params)
            .into_iter()
            .chain(self.table.sql_clause(table_col, params))
            .collect()
    }
}

fn has_wildcards(pattern: &str) -> bool {
    let mut escaped = false;
    for c in pattern.chars() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '%' | '_' => return true,
            _ => {}
        }
    }
    false
}

fn unescape(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.push(chars.next().unwrap_or('\\'));
        } else {
            out.push(c);
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Many,
    One,
    Lit(char),
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        tokens.push(match c {
            '%' => Token::Many,
            '_' => Token::One,
            '\\' => Token::Lit(chars.next().unwrap_or('\\')),
            other => Token::Lit(other),
        });
    }
    tokens
}

/// SQL LIKE match with `\` escapes, case-sensitive.
pub fn like_match(pattern: &str, candidate: &str) -> bool {
    let tokens = tokenize(pattern);
    let text: Vec<char> = candidate.chars().collect();

    let (mut t, mut c) = (0usize, 0usize);
    // Last `%` seen and the text position it is currently absorbing up to.
    let mut backtrack: Option<(usize, usize)> = None;

    while c < text.len() {
        match tokens.get(t) {
            Some(Token::Many) => {
                backtrack = Some((t, c));
                t += 1;
            }
            Some(Token::One) => {
                t += 1;
                c += 1;
            }
            Some(Token::Lit(l)) if *l == text[c] => {
                t += 1;
                c += 1;
            }
            _ => match backtrack {
                Some((star, pos)) => {
                    backtrack = Some((star, pos + 1));
                    t = star + 1;
                    c = pos + 1;
                }
                None => return false,
            },
        }
    }

    tokens[t..].iter().all(|tok| *tok == Token::Many)
}
