use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use credit_lens::data::model::Record;

const HEADERS: [&str; 11] = [
    "Age",
    "Sex",
    "Job",
    "Housing",
    "Saving accounts",
    "Checking account",
    "Credit amount",
    "Duration",
    "Purpose",
    "Age_Group",
    "Credit_Amount_Group",
];

fn cells(r: &Record) -> [String; 11] {
    [
        r.age.to_string(),
        r.sex.clone(),
        r.job.clone(),
        r.housing.clone(),
        r.saving_accounts.clone(),
        r.checking_account.clone(),
        r.credit_amount.to_string(),
        r.duration.to_string(),
        r.purpose.clone(),
        r.age_bracket.map(|b| b.label().to_string()).unwrap_or_default(),
        r.credit_bucket.label().to_string(),
    ]
}

/// First rows of the filtered view, derived columns included.
pub fn raw_data_table(ui: &mut Ui, rows: &[Record], total: usize) {
    ui.label(RichText::new(format!("Raw data (first {} of {total})", rows.len())).strong());

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(320.0)
        .columns(Column::auto().at_least(60.0), HEADERS.len())
        .header(20.0, |mut header| {
            for h in HEADERS {
                header.col(|ui| {
                    ui.strong(h);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let values = cells(&rows[row.index()]);
                for v in values {
                    row.col(|ui| {
                        ui.label(v);
                    });
                }
            });
        });
}
