// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Legacy-path statement objects
//!
//! Statements the planner rejects (DDL, DML, legacy syntax) are split into
//! individual statements and reduced to the shape the lock protocol needs:
//! a category plus target-table names. Extraction is lexical; statements the
//! lexer cannot shape are reported as syntax errors carrying the offending
//! fragment.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ServerError, ServerResult};
use crate::sql::classifier::{classify, starts_with_ci, CopyDirection, DmlKind, StatementClass};

static EXPORT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)^COPY\s*\(\s*([^#].*)\)\s+TO\s+(.+)$").expect("export pattern must compile")
});

/// One statement on the legacy execution path
#[derive(Debug, Clone, PartialEq)]
pub enum LegacyStatement {
    /// `COPY ( <query> ) TO <target>`
    ExportQuery { query: String, sql: String },
    /// `COPY <table> FROM <source>`
    CopyFrom {
        table: String,
        source: String,
        sql: String,
    },
    DropTable { table: String, sql: String },
    TruncateTable { table: String, sql: String },
    /// CREATE / ALTER / GRANT / REVOKE / SHOW; no table locks required
    OtherDdl { sql: String },
    /// `INSERT INTO <table> VALUES ...`
    InsertValues { table: String, sql: String },
    /// `INSERT INTO <table> SELECT ...`
    InsertQuery { table: String, sql: String },
    /// UPDATE or DELETE against one table
    Mutation {
        table: String,
        kind: DmlKind,
        sql: String,
    },
    /// Anything else; executed through the planner with the legacy flag
    Select { sql: String },
}

impl LegacyStatement {
    pub fn sql(&self) -> &str {
        match self {
            LegacyStatement::ExportQuery { sql, .. }
            | LegacyStatement::CopyFrom { sql, .. }
            | LegacyStatement::DropTable { sql, .. }
            | LegacyStatement::TruncateTable { sql, .. }
            | LegacyStatement::OtherDdl { sql }
            | LegacyStatement::InsertValues { sql, .. }
            | LegacyStatement::InsertQuery { sql, .. }
            | LegacyStatement::Mutation { sql, .. }
            | LegacyStatement::Select { sql } => sql,
        }
    }

    /// Statements allowed on a read-only server
    pub fn is_read_only_safe(&self) -> bool {
        matches!(
            self,
            LegacyStatement::Select { .. } | LegacyStatement::ExportQuery { .. }
        )
    }
}

/// Split a request into statements on unquoted semicolons
pub fn split_statements(text: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;
    for ch in text.chars() {
        match ch {
            '\'' => {
                in_quote = !in_quote;
                current.push(ch);
            }
            ';' if !in_quote => {
                if !current.trim().is_empty() {
                    statements.push(current.trim().to_string());
                }
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    if !current.trim().is_empty() {
        statements.push(current.trim().to_string());
    }
    statements
}

/// Strip quoting and a trailing column list from a table identifier token
fn normalize_ident(token: &str) -> String {
    let bare = token.split('(').next().unwrap_or(token);
    bare.trim_matches(|c: char| c == '"' || c == '`' || c == ';' || c == ',')
        .to_string()
}

fn syntax_error(sql: &str) -> ServerError {
    ServerError::SyntaxError(sql.trim().to_string())
}

/// Reduce one legacy statement to its lock-relevant shape
pub fn parse_legacy_statement(sql: &str) -> ServerResult<LegacyStatement> {
    let sql = sql.trim();
    let classification = classify(sql);
    let tokens: Vec<&str> = sql.split_whitespace().collect();

    match classification.class {
        StatementClass::Ddl {
            keyword: "COPY",
            copy: Some(CopyDirection::Export),
        } => {
            let captures = EXPORT_PATTERN.captures(sql).ok_or_else(|| syntax_error(sql))?;
            Ok(LegacyStatement::ExportQuery {
                query: captures[1].trim().to_string(),
                sql: sql.to_string(),
            })
        }
        StatementClass::Ddl {
            keyword: "COPY", ..
        } => {
            if tokens.len() < 4 || !tokens[2].eq_ignore_ascii_case("FROM") {
                return Err(syntax_error(sql));
            }
            Ok(LegacyStatement::CopyFrom {
                table: normalize_ident(tokens[1]),
                source: tokens[3..].join(" ").trim_matches('\'').to_string(),
                sql: sql.to_string(),
            })
        }
        StatementClass::Ddl { keyword: "DROP", .. } => {
            if tokens.len() >= 3 && tokens[1].eq_ignore_ascii_case("TABLE") {
                Ok(LegacyStatement::DropTable {
                    table: normalize_ident(tokens[2]),
                    sql: sql.to_string(),
                })
            } else {
                Ok(LegacyStatement::OtherDdl {
                    sql: sql.to_string(),
                })
            }
        }
        StatementClass::Ddl {
            keyword: "TRUNCATE",
            ..
        } => {
            let target = match tokens.get(1).copied() {
                Some(t) if t.eq_ignore_ascii_case("TABLE") => tokens.get(2).copied(),
                other => other,
            };
            let target = target.ok_or_else(|| syntax_error(sql))?;
            Ok(LegacyStatement::TruncateTable {
                table: normalize_ident(target),
                sql: sql.to_string(),
            })
        }
        StatementClass::Ddl { .. } => Ok(LegacyStatement::OtherDdl {
            sql: sql.to_string(),
        }),
        StatementClass::Dml(DmlKind::Insert) | StatementClass::Dml(DmlKind::Upsert) => {
            if tokens.len() < 3 || !tokens[1].eq_ignore_ascii_case("INTO") {
                return Err(syntax_error(sql));
            }
            let table = normalize_ident(tokens[2]);
            let selects = tokens[3..]
                .iter()
                .copied()
                .any(|t| starts_with_ci(t.trim_start_matches('('), "SELECT"));
            if selects {
                Ok(LegacyStatement::InsertQuery {
                    table,
                    sql: sql.to_string(),
                })
            } else {
                Ok(LegacyStatement::InsertValues {
                    table,
                    sql: sql.to_string(),
                })
            }
        }
        StatementClass::Dml(DmlKind::Update) => {
            let target = tokens.get(1).copied().ok_or_else(|| syntax_error(sql))?;
            Ok(LegacyStatement::Mutation {
                table: normalize_ident(target),
                kind: DmlKind::Update,
                sql: sql.to_string(),
            })
        }
        StatementClass::Dml(DmlKind::Delete) => {
            if tokens.len() < 3 || !tokens[1].eq_ignore_ascii_case("FROM") {
                return Err(syntax_error(sql));
            }
            Ok(LegacyStatement::Mutation {
                table: normalize_ident(tokens[2]),
                kind: DmlKind::Delete,
                sql: sql.to_string(),
            })
        }
        _ => Ok(LegacyStatement::Select {
            sql: sql.to_string(),
        }),
    }
}
