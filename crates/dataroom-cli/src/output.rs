//! Table and JSON output formatting for CLI commands.

use dataroom_entity::FolderNode;
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Print a list of rows in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("Nothing here.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }
}

/// Print a single serializable value; tables fall back to key/value lines
pub fn print_item<T: Serialize>(item: &T, format: OutputFormat) {
    let value = serde_json::to_value(item).unwrap_or_default();
    match format {
        OutputFormat::Table => match value.as_object() {
            Some(fields) => {
                for (key, field) in fields {
                    let text = match field {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    print_kv(key, &text);
                }
            }
            None => println!("{value}"),
        },
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string());
            println!("{json}");
        }
    }
}

/// Print a folder tree, indented by depth
pub fn print_tree(node: &FolderNode, format: OutputFormat) {
    match format {
        OutputFormat::Table => print_node(node, ""),
        OutputFormat::Json => print_item(node, format),
    }
}

fn print_node(node: &FolderNode, indent: &str) {
    if node.depth == 0 {
        println!("{}/  ({} files)", node.name, node.file_count);
    } else {
        println!("{indent}├── {}/  ({} files)", node.name, node.file_count);
    }
    let child_indent = if node.depth == 0 {
        String::new()
    } else {
        format!("{indent}│   ")
    };
    for child in &node.children {
        print_node(child, &child_indent);
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{key}:"), value);
}
