//! Terminal rendering for note lists.

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Color, ContentArrangement, Table};
use dotnote_core::model::note::TAG_DISPLAY_SEPARATOR;
use dotnote_core::Note;

/// Builds the `ID | Note | Tags` table. An empty slice yields a header-only table.
pub(crate) fn notes_table(notes: &[Note]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("ID").fg(Color::Cyan),
        Cell::new("Note").fg(Color::Cyan),
        Cell::new("Tags").fg(Color::Cyan),
    ]);

    for note in notes {
        table.add_row(vec![
            Cell::new(note.id),
            Cell::new(&note.text),
            Cell::new(note.display_tags()),
        ]);
    }

    table
}

/// Formats the distinct tag summary printed under `view`.
pub(crate) fn tags_line(tags: &[String]) -> String {
    if tags.is_empty() {
        return "Tags: (none)".to_string();
    }
    format!("Tags: {}", tags.join(TAG_DISPLAY_SEPARATOR))
}
