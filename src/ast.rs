/// The statement AST: one variant per grammar rule the parser knows.
///
/// WHERE clauses travel as raw text and are only parsed when the predicate
/// evaluator runs. INSERT values and UPDATE assignment values likewise stay
/// raw tokens until execution coerces them.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    ShowTables,
    Describe {
        table: String,
    },
    CreateTable {
        table: String,
        /// Declared column list. Accepted by the grammar, never persisted
        /// or enforced afterwards.
        schema: Vec<ColumnDef>,
    },
    DropTable {
        table: String,
    },
    Select {
        columns: Projection,
        table: String,
        where_clause: Option<String>,
    },
    Join {
        columns: Projection,
        left: String,
        right: String,
        /// The two qualified `table.column` sides of the ON equality.
        on: (String, String),
        where_clause: Option<String>,
    },
    Insert {
        table: String,
        columns: Vec<String>,
        /// Raw value tokens, quotes already stripped. Coercion to typed
        /// values happens at execution time.
        values: Vec<String>,
    },
    Update {
        table: String,
        /// `(column, raw value token)` pairs in statement order.
        assignments: Vec<(String, String)>,
        where_clause: Option<String>,
    },
    Delete {
        table: String,
        where_clause: Option<String>,
    },
}

/// A declared column in a `CREATE TABLE` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    /// The declared type name, kept verbatim (`INT`, `TEXT`, ...). The
    /// engine stores it nowhere and checks nothing against it.
    pub type_name: String,
}

/// The projected column list of a SELECT or JOIN.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// The `*` wildcard: return rows unchanged.
    Star,
    Columns(Vec<String>),
}

impl Projection {
    /// Splits a raw column list on commas. The list `*` (and only that
    /// exact list) is the wildcard.
    pub fn parse(raw: &str) -> Self {
        let columns: Vec<String> = raw.split(',').map(|c| c.trim().to_string()).collect();
        if columns.len() == 1 && columns[0] == "*" {
            Self::Star
        } else {
            Self::Columns(columns)
        }
    }
}
