use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::row::Row;
use crate::value::Value;

/// A comparison operator of a WHERE clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl Op {
    fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "=" => Self::Eq,
            "!=" => Self::Ne,
            ">" => Self::Gt,
            "<" => Self::Lt,
            ">=" => Self::Ge,
            "<=" => Self::Le,
            _ => return None,
        })
    }
}

// Two-character operators must come before their one-character prefixes or
// `>=` would lex as `>` followed by a stray `=`.
static CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(\w+(?:\.\w+)?)\s*(!=|>=|<=|=|>|<)\s*(\d+|'[^']*'|"[^"]*")$"#)
        .unwrap_or_else(|e| panic!("invalid clause pattern: {e}"))
});

/// Evaluates one optional WHERE clause against a row.
///
/// An absent or blank clause matches unconditionally. Otherwise the clause
/// must be exactly `<column> <op> <literal>` where the column may be dotted
/// (`table.column`), the operator one of `= != > < >= <=`, and the literal
/// an integer or a quoted string; anything else is [Error::WhereClause].
/// No boolean composition is supported.
///
/// The column name is looked up verbatim as the row's key, so in a join
/// context the caller passes rows already re-keyed as `table.column`.
///
/// A column absent from the row (or holding an explicit null) compares as
/// false under every operator except `!=`, which is true.
pub fn matches(row: &Row, clause: Option<&str>) -> Result<bool> {
    let Some(clause) = clause.map(str::trim).filter(|c| !c.is_empty()) else {
        return Ok(true);
    };

    let caps = CLAUSE
        .captures(clause)
        .ok_or_else(|| Error::WhereClause(clause.to_string()))?;
    let op = Op::from_symbol(&caps[2]).ok_or_else(|| Error::WhereClause(clause.to_string()))?;

    // A quoted literal is text even when its content is all digits; only a
    // bare digit run becomes an integer.
    let raw = &caps[3];
    let literal = if raw.starts_with('\'') || raw.starts_with('"') {
        Value::Text(crate::value::unquote(raw).to_string())
    } else {
        Value::coerce(raw)
    };

    Ok(match row.get(&caps[1]) {
        None | Some(Value::Null) => op == Op::Ne,
        Some(value) => compare(value, op, &literal),
    })
}

/// Compares a row value against a literal.
///
/// Values of different types are never equal and never ordered, so only
/// `!=` can be true across a type mismatch.
fn compare(left: &Value, op: Op, right: &Value) -> bool {
    match (left, right) {
        (Value::Int(l), Value::Int(r)) => ordered(l.cmp(r), op),
        (Value::Text(l), Value::Text(r)) => ordered(l.cmp(r), op),
        _ => op == Op::Ne,
    }
}

fn ordered(ordering: std::cmp::Ordering, op: Op) -> bool {
    match op {
        Op::Eq => ordering.is_eq(),
        Op::Ne => ordering.is_ne(),
        Op::Gt => ordering.is_gt(),
        Op::Lt => ordering.is_lt(),
        Op::Ge => ordering.is_ge(),
        Op::Le => ordering.is_le(),
    }
}
