//! Console menu for the Bookshelf catalog.
//!
//! # Responsibility
//! - Read menu choices and record fields, call into `bookshelf_core`, print
//!   one outcome per request.
//! - Release the catalog on exit or end of input.
//!
//! # Invariants
//! - Bad input is reported and the loop continues; nothing aborts the process.

use bookshelf_core::config::LOG_LEVEL_ENV;
use bookshelf_core::{
    init_logging, BookRecord, Catalog, CatalogConfig, CatalogError, FieldPolicy, LoggingConfig,
    UndoOutcome,
};
use log::{info, warn};
use std::io::{self, BufRead, Write};

const MENU: &str =
    "1. Register book | 2. Remove book | 3. Search book | 4. List all | 5. Undo | 6. Exit";
/// stderr shares the terminal with the menu, so keep it quiet by default.
const CONSOLE_LOG_LEVEL: &str = "warn";

enum Flow {
    Continue,
    Exit,
}

fn main() {
    if let Err(err) = init_logging(&logging_config()) {
        eprintln!("logging disabled: {err}");
    }

    let config = CatalogConfig::default().with_field_policy(FieldPolicy::Truncate);
    let mut catalog = Catalog::with_config(config);
    info!(
        "event=cli_start module=cli status=ok version={}",
        bookshelf_core::core_version()
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(err) = run(&mut catalog, stdin.lock(), stdout.lock()) {
        warn!("event=cli_io module=cli status=error error={}", err);
        eprintln!("console error: {err}");
        catalog.teardown();
    }
}

fn logging_config() -> LoggingConfig {
    let mut config = LoggingConfig::from_env();
    if config.log_dir.is_none() && std::env::var_os(LOG_LEVEL_ENV).is_none() {
        config.level = CONSOLE_LOG_LEVEL.to_string();
    }
    config
}

fn run<R: BufRead, W: Write>(catalog: &mut Catalog, mut input: R, mut out: W) -> io::Result<()> {
    loop {
        writeln!(out, "\nBookshelf - book catalog")?;
        writeln!(out, "{MENU}")?;
        let Some(choice) = prompt(&mut input, &mut out, "Choice: ")? else {
            break;
        };
        let flow = match choice.trim() {
            "1" => register(catalog, &mut input, &mut out)?,
            "2" => remove(catalog, &mut input, &mut out)?,
            "3" => search(catalog, &mut input, &mut out)?,
            "4" => list(catalog, &mut out)?,
            "5" => undo(catalog, &mut out)?,
            "6" => Flow::Exit,
            _ => {
                writeln!(out, "Invalid option.")?;
                Flow::Continue
            }
        };
        if let Flow::Exit = flow {
            break;
        }
    }

    let report = catalog.teardown();
    writeln!(
        out,
        "Closing catalog: released {} books and {} undo entries.",
        report.records_freed, report.undo_entries_freed
    )?;
    out.flush()
}

fn register<R: BufRead, W: Write>(
    catalog: &mut Catalog,
    input: &mut R,
    out: &mut W,
) -> io::Result<Flow> {
    let Some(title) = prompt(input, out, "Title: ")? else {
        return Ok(Flow::Exit);
    };
    let Some(author) = prompt(input, out, "Author: ")? else {
        return Ok(Flow::Exit);
    };
    let Some(year) = prompt(input, out, "Year: ")? else {
        return Ok(Flow::Exit);
    };
    let Ok(year) = year.trim().parse::<i32>() else {
        writeln!(out, "Invalid year.")?;
        return Ok(Flow::Continue);
    };

    match catalog.register(&title, &author, year) {
        Ok(registered) => {
            for field in registered.truncated {
                writeln!(
                    out,
                    "Note: {field} truncated to {} characters.",
                    field.max_chars()
                )?;
            }
            writeln!(out, "Book registered.")?;
        }
        Err(err) => writeln!(out, "Could not register: {err}.")?,
    }
    Ok(Flow::Continue)
}

fn remove<R: BufRead, W: Write>(
    catalog: &mut Catalog,
    input: &mut R,
    out: &mut W,
) -> io::Result<Flow> {
    let Some(title) = prompt(input, out, "Title to remove: ")? else {
        return Ok(Flow::Exit);
    };
    match catalog.remove(&title) {
        Ok(_) => writeln!(out, "Book removed.")?,
        Err(CatalogError::NotFound(_)) => writeln!(out, "Book not found.")?,
        Err(err) => writeln!(out, "Could not remove: {err}.")?,
    }
    Ok(Flow::Continue)
}

fn search<R: BufRead, W: Write>(
    catalog: &Catalog,
    input: &mut R,
    out: &mut W,
) -> io::Result<Flow> {
    let Some(title) = prompt(input, out, "Search title: ")? else {
        return Ok(Flow::Exit);
    };
    match catalog.search(&title) {
        Ok(book) => {
            writeln!(out, "\n--- FOUND ---")?;
            writeln!(
                out,
                "Title: {}\nAuthor: {}\nYear: {}",
                book.title, book.author, book.year
            )?;
        }
        Err(_) => writeln!(out, "Book not found in catalog.")?,
    }
    Ok(Flow::Continue)
}

fn list<W: Write>(catalog: &Catalog, out: &mut W) -> io::Result<Flow> {
    writeln!(out, "\n--- CATALOG (alphabetical) ---")?;
    if catalog.is_empty() {
        writeln!(out, "Empty.")?;
    }
    for book in catalog.list() {
        writeln!(out, "{}", book_line(book))?;
    }
    writeln!(out, "------------------------------")?;
    Ok(Flow::Continue)
}

fn undo<W: Write>(catalog: &mut Catalog, out: &mut W) -> io::Result<Flow> {
    match catalog.undo() {
        Ok(UndoOutcome::Unregistered(book)) => {
            writeln!(out, "Undone: registration of \"{}\" reverted.", book.title)?
        }
        Ok(UndoOutcome::Restored(book)) => {
            writeln!(out, "Undone: \"{}\" restored.", book.title)?
        }
        Err(CatalogError::EmptyLog) => writeln!(out, "Nothing to undo.")?,
        Err(err) => writeln!(out, "Undo failed: {err}.")?,
    }
    Ok(Flow::Continue)
}

fn book_line(book: &BookRecord) -> String {
    format!(
        "Title: {} | Author: {} | Year: {}",
        book.title, book.author, book.year
    )
}

/// Prints `label` and reads one line without its line terminator.
///
/// Returns `None` at end of input.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
) -> io::Result<Option<String>> {
    write!(out, "{label}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed_len);
    Ok(Some(line))
}
