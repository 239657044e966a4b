//! Reading, editing and writing a desktop entry file.
//!
//! Run with: cargo run --example desktop_entry

use serde::{Deserialize, Serialize};
use serde_keyfile::{from_str, to_string_pretty, Document, KeyFileOptions};
use std::collections::BTreeMap;
use std::error::Error;

const ENTRY: &str = "\
# Installed by the package manager
[Desktop Entry]
Type = Application
Name = Text Editor
Name[de] = Texteditor
Name[fr] = Éditeur de texte
Exec = editor %F
Terminal = false
Categories = Utility;TextEditor;
Keywords = text;edit
Keywords[de] = Text;Bearbeiten
X-Vendor-Build = 42

[Desktop Action new-window]
Name = New Window
Exec = editor --new-window
";

#[derive(Debug, Serialize, Deserialize)]
struct Entry {
    #[serde(rename = "Type")]
    kind: String,
    #[serde(rename = "Name")]
    name: BTreeMap<String, String>,
    #[serde(rename = "Exec")]
    exec: String,
    #[serde(rename = "Icon,omitempty")]
    icon: Option<String>,
    #[serde(rename = "Terminal")]
    terminal: bool,
    #[serde(rename = "Categories")]
    categories: Vec<String>,
    #[serde(rename = "Keywords")]
    keywords: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Action {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Exec")]
    exec: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct DesktopFile {
    #[serde(rename = "Desktop Entry")]
    entry: Entry,
    #[serde(rename = "Desktop Action new-window,omitempty")]
    new_window: Option<Action>,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Typed view: unknown keys are ignored, missing ones are zero
    let mut file: DesktopFile = from_str(ENTRY)?;
    println!("Parsed: {:#?}\n", file);

    if let Some(german) = file.entry.name.get("de") {
        println!("German name: {}", german);
    }
    println!("Categories: {:?}\n", file.entry.categories);

    file.entry.icon = Some("accessories-text-editor".to_string());
    file.entry
        .name
        .insert("es".to_string(), "Editor de texto".to_string());
    file.new_window = None;

    println!("Rewritten:");
    println!("{}", to_string_pretty(&file)?);

    // Untyped view: every line, including vendor extensions
    let document: Document = ENTRY.parse()?;
    println!("All entries:");
    for entry in document.entries() {
        if entry.subkey.is_empty() {
            println!("  [{}] {} = {:?} (line {})", entry.group, entry.key, entry.value, entry.line);
        } else {
            println!(
                "  [{}] {}[{}] = {:?} (line {})",
                entry.group, entry.key, entry.subkey, entry.value, entry.line
            );
        }
    }

    println!("\nNormalized:");
    println!(
        "{}",
        document.to_string_with_options(&KeyFileOptions::pretty())
    );

    Ok(())
}
