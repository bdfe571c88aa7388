use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::ast::{ColumnDef, Projection, Statement};
use crate::error::{Error, Result};
use crate::value::unquote;

/// Converts raw query text into one [Statement].
///
/// The input is trimmed and any trailing `;` removed, then the grammar rules
/// are tried in the fixed order of [RULES]; the first rule that matches wins
/// and no later rule is consulted. If none matches, the offending text comes
/// back inside [Error::Parse] so a front end can route it through a
/// natural-language translation step and try again.
pub fn parse(input: &str) -> Result<Statement> {
    let query = input.trim().trim_end_matches(';').trim();

    for rule in RULES {
        if let Some(statement) = rule(query)? {
            debug!(?statement, "parsed statement");
            return Ok(statement);
        }
    }

    Err(Error::Parse(input.trim().to_string()))
}

type Rule = fn(&str) -> Result<Option<Statement>>;

/// The grammar, in match priority order.
///
/// Ordering is a contract, not an accident: `SELECT ... FROM a JOIN b ...`
/// is a syntactic superset of a plain select, so the join rule must run
/// before the select rule or every join would be read as a select over a
/// mangled table name.
const RULES: [Rule; 9] = [
    show_tables,
    describe,
    create_table,
    drop_table,
    join,
    select,
    insert,
    update,
    delete,
];

static DESCRIBE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)^DESCRIBE\s+(\w+)$"));
static CREATE_TABLE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)^CREATE\s+TABLE\s+(\w+)\s*\((.+)\)$"));
static DROP_TABLE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)^DROP\s+TABLE\s+(\w+)$"));
static JOIN: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"(?i)^SELECT\s+(.+)\s+FROM\s+(\w+)\s+JOIN\s+(\w+)\s+ON\s+(\w+\.\w+)\s*=\s*(\w+\.\w+)(?:\s+WHERE\s+(.+))?$",
    )
});
static SELECT: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)^SELECT\s+(.+)\s+FROM\s+(\w+)(?:\s+WHERE\s+(.+))?$"));
static INSERT: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)^INSERT\s+INTO\s+(\w+)\s*\((.+?)\)\s*VALUES\s*\((.+)\)$"));
static UPDATE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)^UPDATE\s+(\w+)\s+SET\s+(.+?)(?:\s+WHERE\s+(.+))?$"));
static DELETE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)^DELETE\s+FROM\s+(\w+)(?:\s+WHERE\s+(.+))?$"));

fn compile(pattern: &str) -> Regex {
    // Patterns are fixed literals; a failure here is a programming error.
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid grammar pattern {pattern:?}: {e}"))
}

fn show_tables(query: &str) -> Result<Option<Statement>> {
    if query.eq_ignore_ascii_case("SHOW TABLES") {
        return Ok(Some(Statement::ShowTables));
    }
    Ok(None)
}

fn describe(query: &str) -> Result<Option<Statement>> {
    let Some(caps) = DESCRIBE.captures(query) else {
        return Ok(None);
    };
    Ok(Some(Statement::Describe {
        table: caps[1].to_string(),
    }))
}

fn create_table(query: &str) -> Result<Option<Statement>> {
    let Some(caps) = CREATE_TABLE.captures(query) else {
        return Ok(None);
    };

    // Each comma segment is `<name> <type>`, matched positionally on the
    // first two whitespace-separated tokens. Anything past the second token
    // (e.g. `PRIMARY KEY`) is ignored.
    let mut schema = Vec::new();
    for segment in caps[2].split(',') {
        let mut tokens = segment.split_whitespace();
        let (Some(name), Some(type_name)) = (tokens.next(), tokens.next()) else {
            return Err(Error::Parse(query.to_string()));
        };
        schema.push(ColumnDef {
            name: name.to_string(),
            type_name: type_name.to_string(),
        });
    }

    Ok(Some(Statement::CreateTable {
        table: caps[1].to_string(),
        schema,
    }))
}

fn drop_table(query: &str) -> Result<Option<Statement>> {
    let Some(caps) = DROP_TABLE.captures(query) else {
        return Ok(None);
    };
    Ok(Some(Statement::DropTable {
        table: caps[1].to_string(),
    }))
}

fn join(query: &str) -> Result<Option<Statement>> {
    let Some(caps) = JOIN.captures(query) else {
        return Ok(None);
    };
    Ok(Some(Statement::Join {
        columns: Projection::parse(&caps[1]),
        left: caps[2].to_string(),
        right: caps[3].to_string(),
        on: (caps[4].to_string(), caps[5].to_string()),
        where_clause: caps.get(6).map(|m| m.as_str().to_string()),
    }))
}

fn select(query: &str) -> Result<Option<Statement>> {
    let Some(caps) = SELECT.captures(query) else {
        return Ok(None);
    };
    Ok(Some(Statement::Select {
        columns: Projection::parse(&caps[1]),
        table: caps[2].to_string(),
        where_clause: caps.get(3).map(|m| m.as_str().to_string()),
    }))
}

fn insert(query: &str) -> Result<Option<Statement>> {
    let Some(caps) = INSERT.captures(query) else {
        return Ok(None);
    };
    Ok(Some(Statement::Insert {
        table: caps[1].to_string(),
        columns: caps[2].split(',').map(|c| c.trim().to_string()).collect(),
        // Quotes come off here; numeric coercion waits for the executor.
        values: caps[3]
            .split(',')
            .map(|v| unquote(v).to_string())
            .collect(),
    }))
}

fn update(query: &str) -> Result<Option<Statement>> {
    let Some(caps) = UPDATE.captures(query) else {
        return Ok(None);
    };

    // Each assignment splits on its first `=`. A literal containing `=` or
    // `,` therefore cannot be expressed; inherited limitation of this
    // grammar, kept as-is.
    let mut assignments = Vec::new();
    for pair in caps[2].split(',') {
        let Some((column, value)) = pair.split_once('=') else {
            return Err(Error::Parse(query.to_string()));
        };
        assignments.push((column.trim().to_string(), unquote(value).to_string()));
    }

    Ok(Some(Statement::Update {
        table: caps[1].to_string(),
        assignments,
        where_clause: caps.get(3).map(|m| m.as_str().to_string()),
    }))
}

fn delete(query: &str) -> Result<Option<Statement>> {
    let Some(caps) = DELETE.captures(query) else {
        return Ok(None);
    };
    Ok(Some(Statement::Delete {
        table: caps[1].to_string(),
        where_clause: caps.get(2).map(|m| m.as_str().to_string()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_show_tables() {
        assert_eq!(parse("SHOW TABLES").unwrap(), Statement::ShowTables);
        assert_eq!(parse("  show tables ; ").unwrap(), Statement::ShowTables);
    }

    #[test]
    fn test_parse_describe() {
        assert_eq!(
            parse("DESCRIBE users").unwrap(),
            Statement::Describe {
                table: "users".into()
            }
        );
    }

    #[test]
    fn test_parse_create_table() {
        let statement = parse("CREATE TABLE users (id INT, name TEXT)").unwrap();
        match statement {
            Statement::CreateTable { table, schema } => {
                assert_eq!(table, "users");
                assert_eq!(schema.len(), 2);
                assert_eq!(schema[0].name, "id");
                assert_eq!(schema[0].type_name, "INT");
                assert_eq!(schema[1].name, "name");
                assert_eq!(schema[1].type_name, "TEXT");
            }
            other => panic!("expected CreateTable, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_create_table_missing_type() {
        let err = parse("CREATE TABLE users (id)").unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_parse_drop_table() {
        assert_eq!(
            parse("DROP TABLE users;").unwrap(),
            Statement::DropTable {
                table: "users".into()
            }
        );
    }

    #[test]
    fn test_parse_select_star() {
        assert_eq!(
            parse("SELECT * FROM users").unwrap(),
            Statement::Select {
                columns: Projection::Star,
                table: "users".into(),
                where_clause: None,
            }
        );
    }

    #[test]
    fn test_parse_select_columns_and_where() {
        assert_eq!(
            parse("SELECT name, age FROM users WHERE age > 18").unwrap(),
            Statement::Select {
                columns: Projection::Columns(vec!["name".into(), "age".into()]),
                table: "users".into(),
                where_clause: Some("age > 18".into()),
            }
        );
    }

    #[test]
    fn test_parse_join() {
        assert_eq!(
            parse("SELECT A.name, B.val FROM A JOIN B ON A.id = B.aid").unwrap(),
            Statement::Join {
                columns: Projection::Columns(vec!["A.name".into(), "B.val".into()]),
                left: "A".into(),
                right: "B".into(),
                on: ("A.id".into(), "B.aid".into()),
                where_clause: None,
            }
        );
    }

    #[test]
    fn test_parse_join_with_where() {
        let statement =
            parse("SELECT * FROM a JOIN b ON a.x = b.y WHERE a.x > 3").unwrap();
        match statement {
            Statement::Join { where_clause, .. } => {
                assert_eq!(where_clause.as_deref(), Some("a.x > 3"));
            }
            other => panic!("expected Join, got {:?}", other),
        }
    }

    /// Any query with a JOIN must become the Join variant, never Select.
    #[test]
    fn test_join_takes_priority_over_select() {
        let statement = parse("SELECT * FROM t1 JOIN t2 ON t1.a = t2.b").unwrap();
        assert!(matches!(statement, Statement::Join { .. }));
    }

    #[test]
    fn test_parse_insert() {
        assert_eq!(
            parse("INSERT INTO users (id, name) VALUES (1, 'Alice')").unwrap(),
            Statement::Insert {
                table: "users".into(),
                columns: vec!["id".into(), "name".into()],
                values: vec!["1".into(), "Alice".into()],
            }
        );
    }

    #[test]
    fn test_parse_update() {
        assert_eq!(
            parse("UPDATE users SET age = 31, name = 'Bob' WHERE id = 1").unwrap(),
            Statement::Update {
                table: "users".into(),
                assignments: vec![("age".into(), "31".into()), ("name".into(), "Bob".into())],
                where_clause: Some("id = 1".into()),
            }
        );
    }

    #[test]
    fn test_parse_update_without_where() {
        let statement = parse("UPDATE users SET age = 0").unwrap();
        match statement {
            Statement::Update { where_clause, .. } => assert_eq!(where_clause, None),
            other => panic!("expected Update, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_delete() {
        assert_eq!(
            parse("DELETE FROM users WHERE id = 1").unwrap(),
            Statement::Delete {
                table: "users".into(),
                where_clause: Some("id = 1".into()),
            }
        );
        assert_eq!(
            parse("DELETE FROM users").unwrap(),
            Statement::Delete {
                table: "users".into(),
                where_clause: None,
            }
        );
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert!(matches!(
            parse("select * from users where id = 1").unwrap(),
            Statement::Select { .. }
        ));
        assert!(matches!(
            parse("insert into t (a) values (1)").unwrap(),
            Statement::Insert { .. }
        ));
    }

    #[test]
    fn test_unknown_statement_is_parse_error() {
        let err = parse("TRUNCATE TABLE users").unwrap_err();
        match err {
            Error::Parse(text) => assert_eq!(text, "TRUNCATE TABLE users"),
            other => panic!("expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_natural_language_is_parse_error() {
        assert!(parse("show me all the students").unwrap_err().is_parse());
    }
}
