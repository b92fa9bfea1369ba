//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::{DatabaseInfo, DecryptedEntry};

/// Fixed-width placeholder so a masked secret does not reveal its length.
const SECRET_MASK: &str = "\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}";

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of decrypted entries (#, Title, Username, Secret, Created).
///
/// Secrets are masked unless `reveal` is set.
pub fn print_entries_table(db: &str, entries: &[DecryptedEntry], reveal: bool) {
    if entries.is_empty() {
        info("No entries in this database yet.");
        tip(&format!(
            "Run `credvault add {db} <TITLE>` to add your first entry."
        ));
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Title", "Username", "Secret", "Created"]);

    for e in entries {
        let secret = if reveal {
            e.secret.to_string()
        } else {
            SECRET_MASK.to_string()
        };
        let created = e
            .created
            .map(|c| c.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();

        table.add_row(vec![
            e.index.to_string(),
            e.title.clone(),
            e.username.clone(),
            secret,
            created,
        ]);
    }

    println!("{table}");
}

/// Print a table of database files (Database, Size).
pub fn print_databases_table(databases: &[DatabaseInfo]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Database", "Size"]);

    for d in databases {
        table.add_row(vec![d.name.clone(), format_size(d.size)]);
    }

    println!("{table}");
}

/// Format file size in human-readable form.
#[allow(clippy::cast_precision_loss)] // File sizes are well within f64 precision range
fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
