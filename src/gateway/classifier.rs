//! Statement classification by leading keyword.
//!
//! This is a first-token heuristic, not a parser. Statements that open with a
//! comment, a CTE (`WITH ...`) or a parenthesis fall through to `Rejected`.

use std::fmt;

const READ_KEYWORDS: &[&str] = &["select"];

const WRITE_KEYWORDS: &[&str] = &[
    "insert", "update", "delete", "create", "drop", "alter", "truncate", "replace", "begin",
    "commit", "rollback",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Read,
    Write,
    Rejected,
}

impl Category {
    /// Wire name, as used in `query_type` and the `X-Query-Type` header.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Read => "select",
            Category::Write => "exec",
            Category::Rejected => "rejected",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the first whitespace-delimited token of `sql`, lower-cased.
///
/// Leading whitespace yields an empty token, matching a plain split on the
/// first whitespace run.
pub fn leading_keyword(sql: &str) -> String {
    sql.split(char::is_whitespace)
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

pub fn classify(sql: &str) -> Category {
    let keyword = leading_keyword(sql);
    if READ_KEYWORDS.contains(&keyword.as_str()) {
        Category::Read
    } else if WRITE_KEYWORDS.contains(&keyword.as_str()) {
        Category::Write
    } else {
        Category::Rejected
    }
}
