use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use credit_lens::data::aggregate::SummaryStats;
use credit_lens::summary::SummaryOutcome;

use crate::state::{AppState, SummaryState};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Dashboard Controls");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    // Clone what we need so we can mutate state inside the loop.
    let purposes = dataset.purposes().to_vec();
    let housing_types = dataset.housing_types().to_vec();
    let (age_lo, age_hi) = dataset.age_range();
    let (credit_lo, credit_hi) = dataset.credit_range();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Loan purpose ----
            let header = format!("Loan Purpose  ({}/{})", state.filter.purposes.len(), purposes.len());
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("purpose_filter")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_purposes(true);
                        }
                        if ui.small_button("None").clicked() {
                            state.select_all_purposes(false);
                        }
                    });
                    for purpose in &purposes {
                        let mut checked = state.filter.purposes.contains(purpose);
                        if ui.checkbox(&mut checked, purpose.as_str()).changed() {
                            state.toggle_purpose(purpose);
                        }
                    }
                });

            // ---- Housing ----
            let header = format!(
                "Housing Type  ({}/{})",
                state.filter.housing_types.len(),
                housing_types.len()
            );
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("housing_filter")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_housing(true);
                        }
                        if ui.small_button("None").clicked() {
                            state.select_all_housing(false);
                        }
                    });
                    for housing in &housing_types {
                        let mut checked = state.filter.housing_types.contains(housing);
                        if ui.checkbox(&mut checked, housing.as_str()).changed() {
                            state.toggle_housing(housing);
                        }
                    }
                });

            ui.separator();

            // ---- Numeric ranges ----
            let mut changed = false;
            ui.strong("Age Range");
            changed |= ui
                .add(egui::Slider::new(&mut state.filter.age_min, age_lo..=age_hi).text("min"))
                .changed();
            changed |= ui
                .add(egui::Slider::new(&mut state.filter.age_max, age_lo..=age_hi).text("max"))
                .changed();

            ui.strong("Credit Amount Range");
            changed |= ui
                .add(egui::Slider::new(&mut state.filter.credit_min, credit_lo..=credit_hi).text("min"))
                .changed();
            changed |= ui
                .add(egui::Slider::new(&mut state.filter.credit_max, credit_lo..=credit_hi).text("max"))
                .changed();

            if state.filter.age_min > state.filter.age_max
                || state.filter.credit_min > state.filter.credit_max
            {
                ui.colored_label(Color32::YELLOW, "min > max selects no records");
            }

            if changed {
                state.refilter();
            }

            ui.separator();
            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
            ui.checkbox(&mut state.show_raw_data, "Show raw data");
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(ds), Some(snap)) = (&state.dataset, &state.snapshot) {
            ui.label(format!(
                "{} records loaded, {} match filters",
                ds.len(),
                snap.stats.count
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Key metrics row
// ---------------------------------------------------------------------------

fn fmt_mean(v: Option<f64>, prefix: &str, suffix: &str) -> String {
    v.map_or_else(|| "n/a".to_string(), |v| format!("{prefix}{v:.0}{suffix}"))
}

fn fmt_delta(v: Option<f64>, suffix: &str) -> String {
    v.map_or_else(String::new, |v| format!("{v:+.0}{suffix}"))
}

fn metric_card(ui: &mut Ui, label: &str, value: String, delta: String, color: Color32) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.label(RichText::new(value).size(26.0).strong().color(color));
            ui.label(label);
            if !delta.is_empty() {
                ui.weak(delta);
            }
        });
    });
}

/// Four metric cards with deltas against the unfiltered dataset.
pub fn metrics_row(ui: &mut Ui, state: &AppState) {
    let Some(snap) = &state.snapshot else {
        return;
    };
    let SummaryStats {
        count,
        mean_credit_amount,
        mean_age,
        mean_duration,
        ..
    } = snap.stats;
    let delta = &snap.delta;
    let palette = &state.palette;

    ui.columns(4, |cols| {
        metric_card(
            &mut cols[0],
            "Total Records",
            count.to_string(),
            format!("{:+} from total", delta.count),
            palette.nth(0),
        );
        metric_card(
            &mut cols[1],
            "Avg Credit Amount",
            fmt_mean(mean_credit_amount, "$", ""),
            fmt_delta(delta.mean_credit_amount, ""),
            palette.nth(3),
        );
        metric_card(
            &mut cols[2],
            "Avg Duration",
            fmt_mean(mean_duration, "", " months"),
            fmt_delta(delta.mean_duration, " months"),
            palette.nth(4),
        );
        metric_card(
            &mut cols[3],
            "Avg Age",
            fmt_mean(mean_age, "", " years"),
            fmt_delta(delta.mean_age, " years"),
            palette.nth(2),
        );
    });
}

// ---------------------------------------------------------------------------
// AI analysis section
// ---------------------------------------------------------------------------

/// Summary text with a refresh button. Never blocks: the request runs in the
/// background and the charts below keep rendering.
pub fn summary_panel(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("AI-Powered Analysis");
        let busy = matches!(state.summary, SummaryState::Requesting { .. });
        if ui
            .add_enabled(!busy, egui::Button::new("Refresh Analysis"))
            .clicked()
        {
            state.request_summary(ui.ctx());
        }
    });

    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_width(ui.available_width());
        match &state.summary {
            SummaryState::Idle => {
                ui.weak("Press \"Refresh Analysis\" to summarize the current selection.");
            }
            SummaryState::Requesting { .. } => {
                ui.horizontal(|ui: &mut Ui| {
                    ui.spinner();
                    ui.label("Analyzing data…");
                });
            }
            SummaryState::Ready { outcome, .. } => {
                if state.summary_is_stale() {
                    ui.colored_label(Color32::YELLOW, "Filters changed since this analysis.");
                }
                if let SummaryOutcome::Fallback { .. } = outcome {
                    ui.colored_label(Color32::LIGHT_RED, "Text service unavailable, showing local report.");
                }
                ui.label(outcome.text());
            }
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open credit data")
        .add_filter("Supported files", &["csv", "tsv", "txt", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv", "tsv", "txt"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
