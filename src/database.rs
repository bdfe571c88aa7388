use tracing::{debug, warn};

use crate::error::Result;
use crate::executor::{self, Output};
use crate::parser;
use crate::store::TableStore;

/// Translates natural-language text into candidate query text.
///
/// The real translator is an external model and lives outside this crate;
/// front ends plug one in through this trait. The engine only defines the
/// calling convention: translation is attempted once, on parse failure, and
/// a failure of the re-parsed candidate propagates as-is.
pub trait NlTranslator {
    fn translate(&self, text: &str) -> Result<String>;
}

/// The engine facade: a parser and executor bound to one table store.
///
/// Holds no state of its own beyond the store; every call re-reads whatever
/// tables it needs.
pub struct Database<S: TableStore> {
    store: S,
}

impl<S: TableStore> Database<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Parses and executes one statement.
    ///
    /// # Example
    /// ```
    /// use minisql::{Database, MemoryStore, Output};
    ///
    /// let mut db = Database::new(MemoryStore::new());
    /// db.run("INSERT INTO users (id, name) VALUES (1, 'Alice')").unwrap();
    ///
    /// let output = db.run("SELECT name FROM users WHERE id = 1").unwrap();
    /// let Output::Rows(rows) = output else { panic!() };
    /// assert_eq!(rows[0].get("name").unwrap().as_str(), Some("Alice"));
    /// ```
    pub fn run(&mut self, sql: &str) -> Result<Output> {
        let statement = parser::parse(sql)?;
        executor::execute(statement, &mut self.store)
    }

    /// Parses and executes, retrying once through `translator` when the
    /// input does not match the grammar.
    ///
    /// Only a parse failure triggers translation; execution errors of a
    /// well-formed statement never do. If the translated candidate fails to
    /// parse too, that second error propagates.
    pub fn run_or_translate(
        &mut self,
        text: &str,
        translator: &dyn NlTranslator,
    ) -> Result<Output> {
        match parser::parse(text) {
            Ok(statement) => executor::execute(statement, &mut self.store),
            Err(e) if e.is_parse() => {
                warn!(input = text, "not a valid statement, trying translation");
                let candidate = translator.translate(text)?;
                debug!(candidate, "translated query");
                let statement = parser::parse(&candidate)?;
                executor::execute(statement, &mut self.store)
            }
            Err(e) => Err(e),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::store::MemoryStore;

    struct FixedTranslator(&'static str);

    impl NlTranslator for FixedTranslator {
        fn translate(&self, _text: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    /// Fails the test if translation is ever attempted.
    struct NeverTranslator;

    impl NlTranslator for NeverTranslator {
        fn translate(&self, text: &str) -> Result<String> {
            panic!("translator invoked for {text:?}");
        }
    }

    #[test]
    fn test_run_round_trip() {
        let mut db = Database::new(MemoryStore::new());
        db.run("CREATE TABLE t (a INT)").unwrap();
        db.run("INSERT INTO t (a) VALUES (7)").unwrap();

        let Output::Rows(rows) = db.run("SELECT * FROM t").unwrap() else {
            panic!("expected rows");
        };
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_valid_sql_skips_translation() {
        let mut db = Database::new(MemoryStore::new());
        db.run("INSERT INTO t (a) VALUES (1)").unwrap();

        let output = db
            .run_or_translate("SELECT * FROM t", &NeverTranslator)
            .unwrap();
        assert!(matches!(output, Output::Rows(rows) if rows.len() == 1));
    }

    #[test]
    fn test_translation_retry_succeeds() {
        let mut db = Database::new(MemoryStore::new());
        db.run("INSERT INTO t (a) VALUES (1)").unwrap();

        let translator = FixedTranslator("SELECT * FROM t;");
        let output = db
            .run_or_translate("show me everything in t", &translator)
            .unwrap();
        assert!(matches!(output, Output::Rows(rows) if rows.len() == 1));
    }

    #[test]
    fn test_second_parse_failure_propagates() {
        let mut db = Database::new(MemoryStore::new());

        let translator = FixedTranslator("still not sql");
        let err = db
            .run_or_translate("gibberish input", &translator)
            .unwrap_err();
        match err {
            Error::Parse(text) => assert_eq!(text, "still not sql"),
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn test_execution_errors_do_not_translate() {
        let mut db = Database::new(MemoryStore::new());

        // Well-formed statement, missing table: must not reach the translator.
        let err = db
            .run_or_translate("SELECT * FROM ghost", &NeverTranslator)
            .unwrap_err();
        assert!(matches!(err, Error::TableNotFound(_)));
    }
}
