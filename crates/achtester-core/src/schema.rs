//! Best-effort `CREATE TABLE` parsing.
//!
//! This is not a validating SQL parser. It finds the first `CREATE TABLE`
//! statement, pulls out the table name and a `(name, type)` pair for every
//! column line, and silently drops fragments it does not understand.

use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// Table names become store keys, so only ASCII identifiers are accepted.
static TABLE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)CREATE\s+TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?(?:["'`]?(?-u:\w)+["'`]?\.)?["'`]?((?-u:\w)+)["'`]?\s*\("#,
    )
    .expect("table name pattern")
});
static TABLE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)CREATE\s+TABLE\s+.*?\(").expect("table header pattern"));
static CONSTRAINT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(CONSTRAINT|PRIMARY|FOREIGN|UNIQUE|KEY|CHECK|INDEX|REFERENCES)\b")
        .expect("constraint pattern")
});
static QUOTED_COLUMN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)^(?:"([^"]+)"|`([^`]+)`)\s+([A-Z0-9_]+(?:\([^)]*\))?)"#)
        .expect("quoted column pattern")
});
static BARE_COLUMN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([A-Z0-9_]+)\s+([A-Z0-9_]+(?:\([^)]*\))?)").expect("bare column pattern")
});

/// A column as declared in DDL text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnDefinition {
    pub name: String,
    /// Declared type including any parameters, e.g. `DECIMAL(10,2)`.
    #[serde(rename = "type")]
    pub data_type: String,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// Table name plus ordered column list extracted from one DDL statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TableSchema {
    pub table_name: String,
    pub columns: Vec<ColumnDefinition>,
}

impl TableSchema {
    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|column| column.name == name)
    }
}

/// Extract the bare table name of the first `CREATE TABLE` statement.
///
/// Handles an optional `IF NOT EXISTS`, an optional schema qualifier and
/// identifiers quoted with `"`, `'` or `` ` ``. Returns `None` when the text
/// holds no `CREATE TABLE name (` sequence.
pub fn extract_table_name(sql: &str) -> Option<String> {
    let sql = strip_comments(sql);
    let caps = TABLE_NAME.captures(&sql)?;
    Some(caps[1].to_string())
}

/// Extract column definitions from the body of the first `CREATE TABLE`.
///
/// Returns `None` when no `CREATE TABLE (` is present or its parentheses
/// never balance; `Some(vec![])` means a table body with no recognizable
/// column lines.
pub fn extract_field_defs(sql: &str) -> Option<Vec<ColumnDefinition>> {
    let sql = strip_comments(sql);
    let found = TABLE_HEADER.find(&sql)?;
    let open = found.end() - 1;
    let close = matching_paren(&sql, open)?;
    let body = &sql[open + 1..close];

    let mut columns = Vec::new();
    for fragment in split_top_level(body) {
        let clean = fragment.trim().trim_end_matches(',').trim();
        if clean.is_empty() || CONSTRAINT_LINE.is_match(clean) {
            continue;
        }

        if let Some(caps) = QUOTED_COLUMN.captures(clean) {
            let name = caps.get(1).or_else(|| caps.get(2));
            if let (Some(name), Some(data_type)) = (name, caps.get(3)) {
                columns.push(ColumnDefinition::new(name.as_str(), data_type.as_str()));
            }
        } else if let Some(caps) = BARE_COLUMN.captures(clean) {
            columns.push(ColumnDefinition::new(&caps[1], &caps[2]));
        }
    }

    Some(columns)
}

/// Table name and columns together; `None` only when no table name is found.
pub fn parse_table_schema(sql: &str) -> Option<TableSchema> {
    let table_name = extract_table_name(sql)?;
    let columns = extract_field_defs(sql).unwrap_or_default();
    Some(TableSchema {
        table_name,
        columns,
    })
}

/// Remove `-- line` and `/* block */` comments that sit outside quotes.
fn strip_comments(sql: &str) -> String {
    let bytes = sql.as_bytes();
    let mut out = String::with_capacity(sql.len());
    let mut quote: Option<u8> = None;
    let mut start = 0;
    let mut idx = 0;

    while idx < bytes.len() {
        let byte = bytes[idx];
        if let Some(q) = quote {
            if byte == q {
                quote = None;
            }
            idx += 1;
            continue;
        }
        match byte {
            b'\'' | b'"' | b'`' => {
                quote = Some(byte);
                idx += 1;
            }
            b'-' if bytes.get(idx + 1) == Some(&b'-') => {
                out.push_str(&sql[start..idx]);
                while idx < bytes.len() && bytes[idx] != b'\n' {
                    idx += 1;
                }
                start = idx;
            }
            b'/' if bytes.get(idx + 1) == Some(&b'*') => {
                out.push_str(&sql[start..idx]);
                idx += 2;
                while idx < bytes.len() && !(bytes[idx] == b'*' && bytes.get(idx + 1) == Some(&b'/'))
                {
                    idx += 1;
                }
                idx = (idx + 2).min(bytes.len());
                out.push(' ');
                start = idx;
            }
            _ => idx += 1,
        }
    }

    out.push_str(&sql[start..]);
    out
}

/// Index of the `)` closing the `(` at `open`, skipping quoted text.
fn matching_paren(sql: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;

    for (idx, &byte) in sql.as_bytes().iter().enumerate().skip(open) {
        if let Some(q) = quote {
            if byte == q {
                quote = None;
            }
            continue;
        }
        match byte {
            b'\'' | b'"' | b'`' => quote = Some(byte),
            b'(' => depth += 1,
            b')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }

    None
}

/// Split on commas at parenthesis depth zero and outside quotes.
fn split_top_level(body: &str) -> Vec<&str> {
    let mut fragments = Vec::new();
    let mut depth = 0i32;
    let mut quote: Option<u8> = None;
    let mut start = 0;

    for (idx, &byte) in body.as_bytes().iter().enumerate() {
        if let Some(q) = quote {
            if byte == q {
                quote = None;
            }
            continue;
        }
        match byte {
            b'\'' | b'"' | b'`' => quote = Some(byte),
            b'(' => depth += 1,
            b')' => depth -= 1,
            b',' if depth == 0 => {
                fragments.push(&body[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }

    if !body[start..].trim().is_empty() {
        fragments.push(&body[start..]);
    }
    fragments
}
