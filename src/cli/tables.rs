//! Table formatting utilities for PacFinder CLI output

use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets};

use crate::cli::style;
use crate::core::classify::InstallReason;

/// Create a new table with PacFinder styling
#[must_use]
pub fn new_table() -> Table {
    let mut table = Table::new();

    if style::use_unicode() {
        table.load_preset(presets::UTF8_FULL);
        table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    } else {
        table.load_preset(presets::ASCII_FULL);
    }
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table
}

/// Create a table with specific columns
#[must_use]
pub fn table_with_columns(columns: &[&str]) -> Table {
    let mut table = new_table();
    let use_color = style::colors_enabled();

    let header_cells: Vec<Cell> = columns
        .iter()
        .map(|col| {
            let mut cell = Cell::new(*col);
            if use_color {
                cell = cell.add_attribute(Attribute::Bold);
            }
            cell
        })
        .collect();

    table.set_header(header_cells);
    table
}

/// Add a colored row to a table
pub fn add_colored_row(table: &mut Table, cells: &[(&str, Option<Color>)]) {
    let use_color = style::colors_enabled();

    let row_cells: Vec<Cell> = cells
        .iter()
        .map(|(cell_text, color)| {
            let mut cell = Cell::new(*cell_text);
            if use_color && let Some(c) = color {
                cell = cell.fg(*c);
            }
            cell
        })
        .collect();

    table.add_row(row_cells);
}

/// Table color for an install reason
#[must_use]
pub const fn reason_color(reason: InstallReason) -> Option<Color> {
    match reason {
        InstallReason::NotInstalled => None,
        InstallReason::Explicit => Some(Color::Green),
        InstallReason::Dependency => Some(Color::Blue),
        InstallReason::Optional => Some(Color::Cyan),
        InstallReason::Orphan => Some(Color::Yellow),
    }
}
