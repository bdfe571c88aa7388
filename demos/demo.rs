use minisql::{Database, MemoryStore, Output, Result};

fn main() -> Result<()> {
    println!("minisql demo\n");

    let mut db = Database::new(MemoryStore::new());

    db.run("CREATE TABLE students (id INT, name TEXT, age INT)")?;
    println!("Created table 'students'");

    db.run("INSERT INTO students (id, name, age) VALUES (1, 'Alice', 22)")?;
    db.run("INSERT INTO students (id, name, age) VALUES (2, 'Bob', 19)")?;
    db.run("INSERT INTO students (id, name, age) VALUES (3, 'Chloe', 25)")?;
    println!("Inserted 3 rows\n");

    show(db.run("SELECT name, age FROM students WHERE age > 20")?);

    db.run("CREATE TABLE grades (sid INT, mark INT)")?;
    db.run("INSERT INTO grades (sid, mark) VALUES (1, 17)")?;
    db.run("INSERT INTO grades (sid, mark) VALUES (3, 12)")?;

    println!("\nJoin:");
    show(db.run(
        "SELECT students.name, grades.mark FROM students JOIN grades ON students.id = grades.sid",
    )?);

    println!("\nCatalog:");
    show(db.run("SHOW TABLES")?);

    Ok(())
}

fn show(output: Output) {
    match output {
        Output::Message(msg) => println!("{msg}"),
        Output::Rows(rows) => {
            for row in rows {
                println!("{row}");
            }
        }
    }
}
