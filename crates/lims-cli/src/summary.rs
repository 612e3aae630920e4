use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use lims_catalog::ReferenceData;
use lims_cli::session::ImportReport;
use lims_model::{BatchLink, ImportState, StagingRecord};

pub fn print_clients(reference: &ReferenceData) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("UID"),
        header_cell("Client ID"),
        header_cell("Name"),
        header_cell("Contacts"),
        header_cell("Batches"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for client in &reference.clients {
        table.add_row(vec![
            Cell::new(&client.uid),
            Cell::new(&client.client_id),
            Cell::new(&client.title),
            Cell::new(client.contacts.len()),
            Cell::new(client.batches.len()),
        ]);
    }
    println!("{table}");
}

pub fn print_records(records: &[StagingRecord]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Import"),
        header_cell("Client"),
        header_cell("File"),
        header_cell("State"),
        header_cell("Samples"),
        header_cell("Errors"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    for record in records {
        table.add_row(vec![
            Cell::new(&record.id),
            Cell::new(&record.client_uid),
            Cell::new(&record.filename),
            state_cell(record.state),
            Cell::new(record.samples.len()),
            count_cell(record.errors.len(), Color::Red),
        ]);
    }
    println!("{table}");
}

pub fn print_record(record: &StagingRecord) {
    println!("Import: {} ({})", record.id, record.state);
    let mut header = Table::new();
    apply_summary_table_style(&mut header);
    let batch = match &record.batch {
        Some(BatchLink::Existing { uid, title }) => format!("{title} ({uid})"),
        Some(BatchLink::New { title, .. }) => format!("{title} (new)"),
        None => String::new(),
    };
    let fields = [
        ("File name", record.filename.clone()),
        ("No of Samples", record.declared_sample_count.clone()),
        ("Client name", record.client_name.clone()),
        ("Client ID", record.client_id.clone()),
        ("Client Order Number", record.client_order_number.clone()),
        ("Client Reference", record.client_reference.clone()),
        ("Contact", record.contact.clone().unwrap_or_default()),
        ("CC Names - Report", record.cc_contacts.names_report.join(", ")),
        ("CC Emails - Report", record.cc_contacts.emails_report.join(", ")),
        ("CC Names - Invoice", record.cc_contacts.names_invoice.join(", ")),
        ("CC Emails - Invoice", record.cc_contacts.emails_invoice.join(", ")),
        ("Batch", batch),
    ];
    for (label, value) in fields {
        let value = if value.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(value)
        };
        header.add_row(vec![Cell::new(label).add_attribute(Attribute::Bold), value]);
    }
    println!("{header}");

    if !record.samples.is_empty() {
        let mut samples = Table::new();
        samples.set_header(vec![
            header_cell("Row"),
            header_cell("Matrix"),
            header_cell("Container"),
            header_cell("Fields"),
            header_cell("Analyses"),
            header_cell("Profiles"),
        ]);
        apply_table_style(&mut samples);
        align_column(&mut samples, 3, CellAlignment::Right);
        for (index, row) in record.samples.iter().enumerate() {
            samples.add_row(vec![
                Cell::new(row.display_label(index + 1)),
                optional_cell(row.sample_matrix.as_deref()),
                optional_cell(row.container_type.as_deref()),
                Cell::new(row.fields.len()),
                Cell::new(row.analyses.join(", ")),
                Cell::new(row.profiles.join(", ")),
            ]);
        }
        println!("{samples}");
    }

    print_issues(record);
}

pub fn print_issues(record: &StagingRecord) {
    if record.errors.is_empty() {
        return;
    }
    println!("{}", issue_table(record));
}

pub fn print_import(report: &ImportReport) {
    println!("Imported: {}", report.record_id);
    if let Some(batch) = &report.outcome.batch_uid {
        println!("Batch: {batch}");
    }
    println!("Next: {}", report.outcome.redirect);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Sample"),
        header_cell("Row"),
        header_cell("Contact"),
        header_cell("Analyses"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for sample in &report.samples {
        table.add_row(vec![
            Cell::new(&sample.uid),
            Cell::new(&sample.request.source_label),
            optional_cell(sample.request.contact.as_deref()),
            Cell::new(sample.request.analyses.len()),
        ]);
    }
    println!("{table}");
}

fn issue_table(record: &StagingRecord) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Kind"), header_cell("Error")]);
    apply_issue_table_style(&mut table);
    for issue in &record.errors {
        table.add_row(vec![
            Cell::new(issue.kind.as_str()).fg(Color::Red),
            Cell::new(&issue.message),
        ]);
    }
    table
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .add_attribute(Attribute::Bold)
        .fg(Color::Cyan)
}

fn state_cell(state: ImportState) -> Cell {
    let color = match state {
        ImportState::Draft => Color::Yellow,
        ImportState::Valid => Color::Green,
        ImportState::Invalid => Color::Red,
        ImportState::Imported => Color::Cyan,
    };
    Cell::new(state.as_str()).fg(color)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count == 0 {
        dim_cell("0")
    } else {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    }
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(value) if !value.is_empty() => Cell::new(value),
        _ => dim_cell("-"),
    }
}

fn dim_cell(value: &str) -> Cell {
    Cell::new(value).add_attribute(Attribute::Dim)
}
