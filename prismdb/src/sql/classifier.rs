// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Statement classification
//!
//! Classification decides routing and lock profiles before any parsing
//! happens. Keyword checks run in a fixed order (DDL, then DML, then meta
//! commands, then the plain-query fallback) and the first match is final.

use once_cell::sync::Lazy;
use regex::Regex;

/// DDL keywords, checked in order; first match wins
const DDL_KEYWORDS: [&str; 8] = [
    "ALTER", "COPY", "GRANT", "CREATE", "DROP", "REVOKE", "SHOW", "TRUNCATE",
];

/// DML keywords, checked in order
const DML_KEYWORDS: [&str; 4] = ["INSERT", "DELETE", "UPDATE", "UPSERT"];

const EXPLAIN_CALCITE_PREFIX: &str = "explain calcite";
const EXPLAIN_PREFIX: &str = "explain";

/// `COPY ( <query> ) TO ...` marks an export rather than a bulk load. The
/// `[^#]` guard skips statements already rewritten with shim markers.
static COPY_TO_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)^COPY\s*\(\s*[^#].*\)\s+TO\s").expect("copy-to pattern must compile")
});

/// Direction of a COPY statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyDirection {
    /// `COPY <table> FROM ...`, a bulk load
    Import,
    /// `COPY ( <query> ) TO ...`, an export
    Export,
}

/// DML statement subtype
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DmlKind {
    Insert,
    Delete,
    Update,
    Upsert,
}

/// Which EXPLAIN prefix wrapped the statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplainFlavor {
    Plain,
    Calcite,
}

/// Meta commands resolved from catalog metadata without a planner call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaCommand {
    Describe { target: String },
}

/// Tagged classification of one statement
#[derive(Debug, Clone, PartialEq)]
pub enum StatementClass {
    Ddl {
        keyword: &'static str,
        copy: Option<CopyDirection>,
    },
    Dml(DmlKind),
    ExplainWrap {
        inner: Box<StatementClass>,
        flavor: ExplainFlavor,
        /// Set when the wrapped statement is DDL or DML: the explain is
        /// opaque and cannot be answered with a plan
        other_explain: bool,
    },
    Meta(MetaCommand),
    PlainQuery,
}

/// Classification result: the tagged class plus the query text with any
/// EXPLAIN prefix stripped, which is what the planner receives
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub class: StatementClass,
    pub actual_query: String,
}

impl Classification {
    /// Statements the planner accepts: not DDL, not DML, not an opaque
    /// explain. Meta commands never reach this check; the router answers
    /// them first.
    pub fn is_planner_eligible(&self) -> bool {
        match &self.class {
            StatementClass::PlainQuery => true,
            StatementClass::ExplainWrap { other_explain, .. } => !other_explain,
            _ => false,
        }
    }

    /// Flavor of a plan-explainable EXPLAIN wrap, if any
    pub fn explain_flavor(&self) -> Option<ExplainFlavor> {
        match &self.class {
            StatementClass::ExplainWrap {
                flavor,
                other_explain: false,
                ..
            } => Some(*flavor),
            _ => None,
        }
    }

    pub fn is_ddl(&self) -> bool {
        matches!(self.class, StatementClass::Ddl { .. })
    }

    pub fn is_dml(&self) -> bool {
        matches!(self.class, StatementClass::Dml(_))
    }
}

pub(crate) fn starts_with_ci(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Classify one statement. Lexical only: no grammar validation, never fails.
pub fn classify(query: &str) -> Classification {
    for (prefix, flavor) in [
        (EXPLAIN_CALCITE_PREFIX, ExplainFlavor::Calcite),
        (EXPLAIN_PREFIX, ExplainFlavor::Plain),
    ] {
        if !starts_with_ci(query, prefix) {
            continue;
        }
        let actual_query = query[prefix.len()..].trim().to_string();
        let inner = classify(&actual_query);
        return match inner.class {
            opaque @ (StatementClass::Ddl { .. } | StatementClass::Dml(_)) => Classification {
                class: StatementClass::ExplainWrap {
                    inner: Box::new(opaque),
                    flavor,
                    other_explain: true,
                },
                actual_query,
            },
            // EXPLAIN of a meta command degrades to the meta command itself
            StatementClass::Meta(meta) => Classification {
                class: StatementClass::Meta(meta),
                actual_query: inner.actual_query,
            },
            other => Classification {
                class: StatementClass::ExplainWrap {
                    inner: Box::new(other),
                    flavor,
                    other_explain: false,
                },
                actual_query,
            },
        };
    }

    for keyword in DDL_KEYWORDS {
        if starts_with_ci(query, keyword) {
            let copy = (keyword == "COPY").then(|| {
                if COPY_TO_PATTERN.is_match(query) {
                    CopyDirection::Export
                } else {
                    CopyDirection::Import
                }
            });
            return Classification {
                class: StatementClass::Ddl { keyword, copy },
                actual_query: query.to_string(),
            };
        }
    }

    for (index, keyword) in DML_KEYWORDS.into_iter().enumerate() {
        if starts_with_ci(query, keyword) {
            let kind = match index {
                0 => DmlKind::Insert,
                1 => DmlKind::Delete,
                2 => DmlKind::Update,
                _ => DmlKind::Upsert,
            };
            return Classification {
                class: StatementClass::Dml(kind),
                actual_query: query.to_string(),
            };
        }
    }

    // DESC/DESCRIBE <name> with exactly one operand; anything else,
    // including empty input, falls through to PlainQuery
    let stripped = query.trim_matches(|c: char| c == ';' || c.is_ascii_whitespace());
    let mut tokens = stripped.split_whitespace();
    if let Some(first) = tokens.next() {
        if first.eq_ignore_ascii_case("DESC") || first.eq_ignore_ascii_case("DESCRIBE") {
            if let (Some(target), None) = (tokens.next(), tokens.next()) {
                return Classification {
                    class: StatementClass::Meta(MetaCommand::Describe {
                        target: target.to_string(),
                    }),
                    actual_query: stripped.to_string(),
                };
            }
        }
    }

    Classification {
        class: StatementClass::PlainQuery,
        actual_query: stripped.to_string(),
    }
}
