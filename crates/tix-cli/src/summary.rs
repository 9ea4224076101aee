use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use tix_cli::pipeline::RunReport;

pub fn print_summary(report: &RunReport) {
    let summary = &report.summary;
    match report.inserted {
        Some(inserted) => println!("Table: {} ({inserted} rows loaded)", report.table),
        None => println!("Table: {} (dry run, not loaded)", report.table),
    }
    if let Some(path) = &report.csv {
        println!("CSV export: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![header_cell("Stage"), header_cell("Metric"), header_cell("Count")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);

    let rows: [(&str, &str, usize, Option<Color>); 10] = [
        ("ingest", "tickets read", summary.tickets, None),
        ("ingest", "staff records read", summary.staff_records, None),
        ("staff", "owners indexed", summary.staff_indexed, None),
        ("staff", "duplicate ids dropped", summary.staff_duplicates, Some(Color::Yellow)),
        ("staff", "non-integer ids dropped", summary.staff_unparseable, Some(Color::Yellow)),
        ("tickets", "without owner", summary.unassigned, Some(Color::Yellow)),
        ("tickets", "owner without staff record", summary.unmatched_owner, Some(Color::Yellow)),
        ("tickets", "closed", summary.closed, None),
        ("tickets", "with handle duration", summary.with_duration, None),
        ("output", "rows", report.rows, None),
    ];
    for (stage, metric, count, highlight) in rows {
        table.add_row(vec![
            dim_cell(stage),
            Cell::new(metric),
            count_cell(count, highlight),
        ]);
    }
    println!("{table}");
    println!("Elapsed: {} ms", report.elapsed.as_millis());
}

fn count_cell(count: usize, highlight: Option<Color>) -> Cell {
    match highlight {
        Some(color) if count > 0 => Cell::new(count).fg(color).add_attribute(Attribute::Bold),
        _ if count == 0 => dim_cell(count),
        _ => Cell::new(count),
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
