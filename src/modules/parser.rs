//! Import-statement front-end.
//!
//! Extracts position-tagged [`RawImport`] records from Python source text. This
//! is a deliberately narrow scanner: it only consumes `import` and `from ... import`
//! statements and validates only what it consumes. The host language's own parser
//! validated entire programs; replicating that is not this front-end's job, so a
//! file full of broken expressions but well-formed imports still yields records.
//!
//! # Supported Statement Forms
//!
//! - `import a.b`, `import a.b as c, d`
//! - `from a.b import X`, `from a.b import X as Y, Z`
//! - `from . import mod`, `from ..pkg.sub import X`
//! - `from a import (X, Y,)` with the name list split across lines
//! - `from a import *` (no names to disambiguate, records the base module)
//! - backslash continuations and trailing comments on any of the above
//!
//! Lines inside triple-quoted strings are never scanned, so an `import`
//! spelled out in a docstring's usage example does not produce a record.
//!
//! Malformed import statements fail with [`Error::Syntax`] carrying the statement's
//! line and column; the build pipeline treats that as skip-the-whole-file, the same
//! recovery applied to files the host language itself would reject.

use crate::{modules::RawImport, Error, Result};

/// Scanner that turns source text into a sequence of raw import records.
///
/// Stateless and cheap to construct; safe to share across worker threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImportParser;

impl ImportParser {
    /// Create a new parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Extract all import statements from `content`.
    ///
    /// Records are returned in source order. Statements spanning several physical
    /// lines (parenthesized name lists, backslash continuations) are tagged with
    /// the position where the statement started.
    ///
    /// # Errors
    /// Returns [`Error::Syntax`] for a malformed or unterminated import statement.
    pub fn parse(&self, content: &str) -> Result<Vec<RawImport>> {
        let mut records = Vec::new();
        let mut lines = content.lines();

        let mut string_state: Option<&'static str> = None;
        let mut lineno: u32 = 0;
        while let Some(line) = lines.next() {
            lineno += 1;

            // Inside a triple-quoted string nothing on the line is code, and a
            // `#` is literal text rather than a comment.
            if string_state.is_some() {
                string_state = track_triple_quotes(line, string_state);
                continue;
            }

            let stripped = strip_comment(line);
            let trimmed = stripped.trim_start();
            let column = (stripped.len() - trimmed.len()) as u32;

            let is_plain = has_keyword_prefix(trimmed, "import");
            let is_from = has_keyword_prefix(trimmed, "from");
            if !is_plain && !is_from {
                string_state = track_triple_quotes(stripped, None);
                continue;
            }

            // Join the logical statement: pull physical lines while a parenthesized
            // name list is open or the line ends in a backslash continuation. The
            // record is tagged with the line the statement started on.
            let start_line = lineno;
            let mut stmt = trimmed.trim_end().to_string();
            loop {
                let continued = stmt.ends_with('\\');
                if continued {
                    stmt.pop();
                }

                if !continued && paren_depth(&stmt) == 0 {
                    break;
                }

                let Some(next) = lines.next() else {
                    return Err(Error::Syntax {
                        line: start_line,
                        column,
                        message: "unterminated import statement".to_string(),
                    });
                };
                lineno += 1;

                stmt.push(' ');
                stmt.push_str(strip_comment(next).trim());
            }

            if is_plain {
                parse_plain(&stmt, start_line, column, &mut records)?;
            } else {
                records.push(parse_from(&stmt, start_line, column)?);
            }
        }

        Ok(records)
    }
}

/// Slice a physical line up to its trailing comment, if any.
fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Whether `line` starts with `keyword` followed by a token boundary.
fn has_keyword_prefix(line: &str, keyword: &str) -> bool {
    match line.strip_prefix(keyword) {
        Some(rest) => rest.is_empty() || rest.starts_with(char::is_whitespace),
        None => false,
    }
}

/// Advance the triple-quoted-string state across one physical line.
///
/// `state` is the open delimiter when the line starts inside a string, `None`
/// otherwise; the return value is the state after the line. Both delimiters
/// (`"""` and `'''`) may open and close any number of times on one line.
fn track_triple_quotes(line: &str, mut state: Option<&'static str>) -> Option<&'static str> {
    const DELIMS: [&str; 2] = ["\"\"\"", "'''"];

    let mut rest = line;
    loop {
        match state {
            Some(delim) => match rest.find(delim) {
                Some(pos) => {
                    rest = &rest[pos + delim.len()..];
                    state = None;
                }
                None => return state,
            },
            None => {
                let next = DELIMS
                    .iter()
                    .filter_map(|&d| rest.find(d).map(|pos| (pos, d)))
                    .min_by_key(|&(pos, _)| pos);
                match next {
                    Some((pos, delim)) => {
                        rest = &rest[pos + delim.len()..];
                        state = Some(delim);
                    }
                    None => return None,
                }
            }
        }
    }
}

/// Net open-parenthesis depth of a statement fragment.
fn paren_depth(stmt: &str) -> i32 {
    let mut depth = 0;
    for c in stmt.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => {}
        }
    }
    depth
}

/// Whether `s` is a valid bare name.
fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Split a dotted path into validated segments.
fn parse_dotted(dotted: &str, line: u32, column: u32) -> Result<Vec<String>> {
    let segments: Vec<String> = dotted.split('.').map(str::to_owned).collect();

    if segments.iter().any(|s| !is_identifier(s)) {
        return Err(Error::Syntax {
            line,
            column,
            message: format!("invalid module path '{dotted}'"),
        });
    }

    Ok(segments)
}

/// Split an import item into its name, discarding any `as` alias.
fn split_alias<'a>(item: &'a str, line: u32, column: u32) -> Result<&'a str> {
    let tokens: Vec<&str> = item.split_whitespace().collect();

    match *tokens.as_slice() {
        [name] => Ok(name),
        [name, "as", alias] if is_identifier(alias) => Ok(name),
        _ => Err(Error::Syntax {
            line,
            column,
            message: format!("invalid import item '{item}'"),
        }),
    }
}

/// Parse `import a.b as c, d` - one record per comma-separated target.
fn parse_plain(stmt: &str, line: u32, column: u32, records: &mut Vec<RawImport>) -> Result<()> {
    let rest = stmt["import".len()..].trim();
    if rest.is_empty() {
        return Err(Error::Syntax {
            line,
            column,
            message: "expected module name after 'import'".to_string(),
        });
    }

    for item in rest.split(',') {
        let item = item.trim();
        if item.is_empty() {
            return Err(Error::Syntax {
                line,
                column,
                message: "empty name in import list".to_string(),
            });
        }

        let dotted = split_alias(item, line, column)?;
        records.push(RawImport {
            segments: parse_dotted(dotted, line, column)?,
            level: 0,
            names: Vec::new(),
            line,
            column,
        });
    }

    Ok(())
}

/// Parse `from [dots][module] import names` into a single record.
fn parse_from(stmt: &str, line: u32, column: u32) -> Result<RawImport> {
    let rest = stmt["from".len()..].trim_start();

    let Some(kw) = find_import_keyword(rest) else {
        return Err(Error::Syntax {
            line,
            column,
            message: "expected 'import' in from-import".to_string(),
        });
    };

    let module_part = rest[..kw].trim();
    let names_part = rest[kw + "import".len()..].trim();

    let level = module_part.chars().take_while(|&c| c == '.').count() as u32;
    let remainder = &module_part[level as usize..];
    let segments = if remainder.is_empty() {
        Vec::new()
    } else {
        parse_dotted(remainder, line, column)?
    };

    if level == 0 && segments.is_empty() {
        return Err(Error::Syntax {
            line,
            column,
            message: "expected module name after 'from'".to_string(),
        });
    }

    let names = parse_name_list(names_part, line, column)?;

    Ok(RawImport {
        segments,
        level,
        names,
        line,
        column,
    })
}

/// Find the byte offset of the `import` keyword in the rest of a from-statement.
///
/// The keyword must sit at a token boundary on both sides so module paths like
/// `importlib` are not mistaken for it.
fn find_import_keyword(rest: &str) -> Option<usize> {
    for (pos, _) in rest.match_indices("import") {
        let before_ok = pos == 0
            || rest[..pos]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_whitespace() || c == '.');
        let after = &rest[pos + "import".len()..];
        let after_ok = after
            .chars()
            .next()
            .is_some_and(|c| c.is_whitespace() || c == '(' || c == '*');

        if before_ok && after_ok {
            return Some(pos);
        }
    }
    None
}

/// Parse the name list of a from-import: bare, parenthesized, or `*`.
///
/// A star import yields an empty name list - with no names to disambiguate,
/// the record resolves to the base module alone.
fn parse_name_list(names_part: &str, line: u32, column: u32) -> Result<Vec<String>> {
    let inner = if let Some(open) = names_part.strip_prefix('(') {
        match open.strip_suffix(')') {
            Some(inner) => inner.trim(),
            None => {
                return Err(Error::Syntax {
                    line,
                    column,
                    message: "unbalanced parentheses in import list".to_string(),
                })
            }
        }
    } else {
        names_part
    };

    if inner == "*" {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for item in inner.split(',') {
        let item = item.trim();
        if item.is_empty() {
            // permit a trailing comma inside parentheses
            continue;
        }

        let name = split_alias(item, line, column)?;
        if !is_identifier(name) {
            return Err(Error::Syntax {
                line,
                column,
                message: format!("invalid imported name '{name}'"),
            });
        }
        names.push(name.to_owned());
    }

    if names.is_empty() {
        return Err(Error::Syntax {
            line,
            column,
            message: "expected imported names".to_string(),
        });
    }

    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Vec<RawImport> {
        ImportParser::new().parse(content).unwrap()
    }

    #[test]
    fn test_plain_import() {
        let records = parse("import os\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].segments, vec!["os"]);
        assert_eq!(records[0].level, 0);
        assert!(records[0].names.is_empty());
        assert_eq!((records[0].line, records[0].column), (1, 0));
    }

    #[test]
    fn test_plain_import_dotted_with_aliases() {
        let records = parse("import a.b.c as abc, x.y\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].segments, vec!["a", "b", "c"]);
        assert_eq!(records[1].segments, vec!["x", "y"]);
    }

    #[test]
    fn test_from_import_absolute() {
        let records = parse("from pkg.sub import Thing, other as o\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].segments, vec!["pkg", "sub"]);
        assert_eq!(records[0].level, 0);
        assert_eq!(records[0].names, vec!["Thing", "other"]);
    }

    #[test]
    fn test_from_import_relative() {
        let records = parse("from ..sub import X\n");
        assert_eq!(records[0].level, 2);
        assert_eq!(records[0].segments, vec!["sub"]);
        assert_eq!(records[0].names, vec!["X"]);
    }

    #[test]
    fn test_from_import_bare_dot() {
        let records = parse("from . import mod\n");
        assert_eq!(records[0].level, 1);
        assert!(records[0].segments.is_empty());
        assert_eq!(records[0].names, vec!["mod"]);
    }

    #[test]
    fn test_from_import_dot_without_space() {
        let records = parse("from .import mod\n");
        assert_eq!(records[0].level, 1);
        assert!(records[0].segments.is_empty());
        assert_eq!(records[0].names, vec!["mod"]);
    }

    #[test]
    fn test_star_import_records_base_module() {
        let records = parse("from pkg import *\n");
        assert_eq!(records[0].segments, vec!["pkg"]);
        assert!(records[0].names.is_empty());
    }

    #[test]
    fn test_parenthesized_multiline_name_list() {
        let records = parse("from pkg import (\n    A,\n    B as b,\n)\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].names, vec!["A", "B"]);
        assert_eq!(records[0].line, 1);
    }

    #[test]
    fn test_backslash_continuation() {
        let records = parse("from pkg import A, \\\n    B\n");
        assert_eq!(records[0].names, vec!["A", "B"]);
    }

    #[test]
    fn test_indented_statement_column() {
        let records = parse("if True:\n    import os\n");
        assert_eq!((records[0].line, records[0].column), (2, 4));
    }

    #[test]
    fn test_trailing_comment_is_ignored() {
        let records = parse("import os  # the operating system\n");
        assert_eq!(records[0].segments, vec!["os"]);
    }

    #[test]
    fn test_module_named_importlib_not_mistaken_for_keyword() {
        let records = parse("from importlib import util\n");
        assert_eq!(records[0].segments, vec!["importlib"]);
        assert_eq!(records[0].names, vec!["util"]);
    }

    #[test]
    fn test_non_import_lines_are_not_validated() {
        let records = parse("x = (1 +\n2)\nimport os\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].segments, vec!["os"]);
    }

    #[test]
    fn test_docstring_import_lines_are_not_records() {
        let records = parse(
            "\"\"\"Usage:\n\nimport os\nfrom pkg import Thing\n\"\"\"\nimport sys\n",
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].segments, vec!["sys"]);
        assert_eq!(records[0].line, 6);
    }

    #[test]
    fn test_single_quoted_docstring_is_skipped_too() {
        let records = parse("'''\nimport os\n'''\n");
        assert!(records.is_empty());
    }

    #[test]
    fn test_one_line_string_does_not_open_string_state() {
        let records = parse("x = \"\"\"import os\"\"\"\nimport json\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].segments, vec!["json"]);
    }

    #[test]
    fn test_other_delimiter_inside_open_string_does_not_close_it() {
        // the """ on line 2 is literal text inside the '''-string
        let records = parse("s = '''\n\"\"\"\nimport os\n'''\nimport re\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].segments, vec!["re"]);
    }

    #[test]
    fn test_syntax_error_on_bare_import() {
        let err = ImportParser::new().parse("import\n").unwrap_err();
        assert!(matches!(err, Error::Syntax { line: 1, .. }));
    }

    #[test]
    fn test_syntax_error_on_missing_names() {
        let err = ImportParser::new().parse("from pkg import\n").unwrap_err();
        assert!(matches!(err, Error::Syntax { .. }));
    }

    #[test]
    fn test_syntax_error_on_unterminated_list() {
        let err = ImportParser::new().parse("from pkg import (A,\n").unwrap_err();
        assert!(matches!(err, Error::Syntax { .. }));
    }

    #[test]
    fn test_syntax_error_on_invalid_path() {
        let err = ImportParser::new().parse("import a..b\n").unwrap_err();
        assert!(matches!(err, Error::Syntax { .. }));
    }
}
