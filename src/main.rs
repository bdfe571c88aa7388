use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use minisql::{Database, JsonDirStore, Output};

/// A minimal SQL engine over a directory of JSON table documents.
#[derive(Parser)]
#[command(name = "minisql", version)]
struct Args {
    /// Directory holding one .json document per table.
    #[arg(long, default_value = "database")]
    data_dir: PathBuf,

    /// A single statement to run instead of starting the interactive shell.
    query: Vec<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut db = Database::new(JsonDirStore::new(&args.data_dir));

    if !args.query.is_empty() {
        let sql = args.query.join(" ");
        return match db.run(&sql) {
            Ok(output) => {
                render(&output);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::FAILURE
            }
        };
    }

    repl(&mut db)
}

fn repl(db: &mut Database<JsonDirStore>) -> ExitCode {
    println!("minisql shell. Type 'exit;' to quit.");

    let stdin = io::stdin();
    loop {
        print!("sql> ");
        if io::stdout().flush().is_err() {
            return ExitCode::FAILURE;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => return ExitCode::SUCCESS, // EOF
            Ok(_) => {}
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("exit;") {
            return ExitCode::SUCCESS;
        }

        match db.run(input) {
            Ok(output) => render(&output),
            Err(e) => eprintln!("error: {e}"),
        }
    }
}

fn render(output: &Output) {
    match output {
        Output::Message(msg) => println!("{msg}"),
        Output::Rows(rows) => {
            for row in rows {
                println!("{row}");
            }
        }
    }
}
