use eframe::egui::{RichText, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use rusty_dashboards::data::{ColumnKind, Record, Table};

const ROW_HEIGHT: f32 = 18.0;
const MAX_HEIGHT: f32 = 360.0;

/// Show the filtered rows with every column of the record type.
pub fn data_table<R: Record>(ui: &mut Ui, table: &Table<R>, rows: &[usize]) {
    ui.label(RichText::new("Data").strong().size(16.0));
    let columns = R::columns();
    let records = table.records();

    ui.push_id("data_table", |ui: &mut Ui| {
        let mut builder = TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(MAX_HEIGHT);
        for column in columns {
            let width = match column.kind {
                ColumnKind::Text => 120.0,
                ColumnKind::Date => 90.0,
                ColumnKind::Integer | ColumnKind::Float => 80.0,
            };
            builder = builder.column(TableColumn::initial(width).at_least(40.0));
        }

        builder
            .header(ROW_HEIGHT + 4.0, |mut header| {
                for column in columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(column.name);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                    let Some(record) = records.get(rows[row.index()]) else {
                        return;
                    };
                    for column in columns {
                        let text = record
                            .value(column.name)
                            .map(|v| v.to_string())
                            .unwrap_or_default();
                        row.col(|ui: &mut Ui| {
                            ui.label(text);
                        });
                    }
                });
            });
    });
}
