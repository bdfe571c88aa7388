use tracing::debug;

use crate::ast::{Projection, Statement};
use crate::error::{Error, Result};
use crate::predicate;
use crate::row::Row;
use crate::store::TableStore;
use crate::value::Value;

/// What a statement produces: a sequence of rows for the reading variants
/// (SELECT, JOIN, SHOW TABLES, DESCRIBE) or a status message for the
/// mutating ones.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Rows(Vec<Row>),
    Message(String),
}

/// Interprets one [Statement] against a table store.
///
/// Every mutating variant runs the same cycle: load the whole table, change
/// it in memory, save the whole table back. Nothing is cached between calls
/// and nothing locks; the statement either completes or fails synchronously.
pub fn execute(statement: Statement, store: &mut dyn TableStore) -> Result<Output> {
    match statement {
        Statement::ShowTables => show_tables(store),
        Statement::Describe { table } => describe(store, &table),
        Statement::CreateTable { table, .. } => create_table(store, &table),
        Statement::DropTable { table } => drop_table(store, &table),
        Statement::Select {
            columns,
            table,
            where_clause,
        } => select(store, &columns, &table, where_clause.as_deref()),
        Statement::Join {
            columns,
            left,
            right,
            on,
            where_clause,
        } => join(store, &columns, &left, &right, &on, where_clause.as_deref()),
        Statement::Insert {
            table,
            columns,
            values,
        } => insert(store, &table, columns, values),
        Statement::Update {
            table,
            assignments,
            where_clause,
        } => update(store, &table, &assignments, where_clause.as_deref()),
        Statement::Delete {
            table,
            where_clause,
        } => delete(store, &table, where_clause.as_deref()),
    }
}

fn show_tables(store: &mut dyn TableStore) -> Result<Output> {
    let names = store.list();
    if names.is_empty() {
        // A placeholder entry rather than an empty sequence, so a bare
        // store still renders something.
        return Ok(Output::Rows(vec![Row::from_iter([(
            "table".to_string(),
            Value::Text("No tables found.".into()),
        )])]));
    }
    Ok(Output::Rows(
        names
            .into_iter()
            .map(|name| Row::from_iter([("table".to_string(), Value::Text(name))]))
            .collect(),
    ))
}

/// A missing table and an empty table are both success paths here, reported
/// as messages; only a populated table yields a column listing. The shape
/// difference between the empty and non-empty cases is deliberate.
fn describe(store: &mut dyn TableStore, table: &str) -> Result<Output> {
    if !store.exists(table) {
        return Ok(Output::Message(format!("Table '{table}' does not exist.")));
    }
    let rows = store.load(table)?;
    match rows.first() {
        None => Ok(Output::Message("Table is empty.".into())),
        Some(first) => Ok(Output::Rows(
            first
                .columns()
                .map(|name| {
                    Row::from_iter([("column".to_string(), Value::Text(name.to_string()))])
                })
                .collect(),
        )),
    }
}

/// Persists an empty table, silently truncating any existing table of the
/// same name. The declared schema was already discarded by the caller; it
/// is neither stored nor enforced.
fn create_table(store: &mut dyn TableStore, table: &str) -> Result<Output> {
    store.save(table, &[])?;
    debug!(table, "table created");
    Ok(Output::Message(format!("Table '{table}' created.")))
}

fn drop_table(store: &mut dyn TableStore, table: &str) -> Result<Output> {
    if store.delete(table)? {
        debug!(table, "table dropped");
        Ok(Output::Message(format!("Table '{table}' dropped.")))
    } else {
        Ok(Output::Message(format!("Table '{table}' does not exist.")))
    }
}

fn select(
    store: &mut dyn TableStore,
    columns: &Projection,
    table: &str,
    where_clause: Option<&str>,
) -> Result<Output> {
    let rows = store.load(table)?;
    let mut result = Vec::new();
    for row in &rows {
        if predicate::matches(row, where_clause)? {
            result.push(project(row, columns));
        }
    }
    Ok(Output::Rows(result))
}

/// Wildcard keeps the row as-is; an explicit list builds a fresh row with
/// exactly those keys, filling missing columns with null.
fn project(row: &Row, columns: &Projection) -> Row {
    match columns {
        Projection::Star => row.clone(),
        Projection::Columns(names) => names
            .iter()
            .map(|name| {
                let value = row.get(name).cloned().unwrap_or(Value::Null);
                (name.clone(), value)
            })
            .collect(),
    }
}

/// Inner equality join over the full Cartesian product of the two tables.
///
/// Nested loop, no index, no early exit; cost is |left| x |right|. For each
/// pair the ON sides are resolved against each row's own columns (the
/// qualifier is the alias written in the query, not a physical key). Equal
/// pairs are merged into a row whose every field is re-keyed as
/// `table.column`; the WHERE clause and the projection both see only those
/// dotted keys.
fn join(
    store: &mut dyn TableStore,
    columns: &Projection,
    left: &str,
    right: &str,
    on: &(String, String),
    where_clause: Option<&str>,
) -> Result<Output> {
    let left_rows = store.load(left)?;
    let right_rows = store.load(right)?;

    let mut result = Vec::new();
    for l in &left_rows {
        for r in &right_rows {
            if on_side(l, &on.0) != on_side(r, &on.1) {
                continue;
            }
            let mut merged = Row::new();
            for (column, value) in l.iter() {
                merged.insert(format!("{left}.{column}"), value.clone());
            }
            for (column, value) in r.iter() {
                merged.insert(format!("{right}.{column}"), value.clone());
            }
            if predicate::matches(&merged, where_clause)? {
                result.push(project(&merged, columns));
            }
        }
    }

    debug!(
        left,
        right,
        pairs = left_rows.len() * right_rows.len(),
        matched = result.len(),
        "join evaluated"
    );
    Ok(Output::Rows(result))
}

/// Resolves one qualified ON side (`alias.column`) against a row.
///
/// Missing columns and explicit nulls both come back as `None`, so two rows
/// lacking their ON column pair up. Inherited behavior, kept as-is.
fn on_side<'a>(row: &'a Row, qualified: &str) -> Option<&'a Value> {
    let (_, column) = qualified.split_once('.')?;
    row.get(column).filter(|value| !value.is_null())
}

/// Appends one row, creating the table on first insert. Declared columns
/// and value tokens are zipped positionally; each token is coerced to an
/// integer when all-digit, text otherwise.
fn insert(
    store: &mut dyn TableStore,
    table: &str,
    columns: Vec<String>,
    values: Vec<String>,
) -> Result<Output> {
    if columns.len() != values.len() {
        return Err(Error::MalformedStatement(format!(
            "INSERT column/value arity mismatch: {} columns, {} values",
            columns.len(),
            values.len()
        )));
    }

    let mut rows = if store.exists(table) {
        store.load(table)?
    } else {
        Vec::new()
    };

    let row: Row = columns
        .into_iter()
        .zip(values.iter().map(|token| Value::coerce(token)))
        .collect();
    rows.push(row);
    store.save(table, &rows)?;

    Ok(Output::Message("1 row inserted.".into()))
}

fn update(
    store: &mut dyn TableStore,
    table: &str,
    assignments: &[(String, String)],
    where_clause: Option<&str>,
) -> Result<Output> {
    let mut rows = store.load(table)?;

    let mut count = 0;
    for row in &mut rows {
        if predicate::matches(row, where_clause)? {
            for (column, token) in assignments {
                row.insert(column.clone(), Value::coerce(token));
            }
            count += 1;
        }
    }
    store.save(table, &rows)?;

    Ok(Output::Message(format!("{count} row(s) updated.")))
}

fn delete(
    store: &mut dyn TableStore,
    table: &str,
    where_clause: Option<&str>,
) -> Result<Output> {
    let rows = store.load(table)?;
    let total = rows.len();

    let mut kept = Vec::new();
    for row in rows {
        if !predicate::matches(&row, where_clause)? {
            kept.push(row);
        }
    }
    let removed = total - kept.len();
    store.save(table, &kept)?;

    Ok(Output::Message(format!("{removed} row(s) deleted.")))
}
