use eframe::egui::{self, ScrollArea, Ui};

use credit_lens::summary::SummaryConfig;

use crate::color::ChartPalette;
use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CreditLensApp {
    pub state: AppState,
}

impl CreditLensApp {
    pub fn new(summary_config: SummaryConfig, palette: ChartPalette) -> Self {
        Self {
            state: AppState::new(summary_config, palette),
        }
    }
}

impl eframe::App for CreditLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_summary();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics, analysis, charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.snapshot.is_none() {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading("Open a credit data file to begin  (File → Open…)");
                });
                return;
            }
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    dashboard(ui, &mut self.state);
                });
        });
    }
}

fn dashboard(ui: &mut Ui, state: &mut AppState) {
    panels::metrics_row(ui, state);
    ui.add_space(8.0);
    panels::summary_panel(ui, state);
    ui.add_space(8.0);

    let Some(snap) = &state.snapshot else {
        return;
    };
    let palette = &state.palette;

    ui.columns(2, |cols| {
        plot::stacked_bar_chart(&mut cols[0], "age_sex", "Age Distribution by Gender", &snap.age_by_sex, palette);
        plot::ranked_share_chart(&mut cols[1], "purpose", "Loan Purpose Distribution", &snap.purpose_counts, palette);
    });
    ui.columns(2, |cols| {
        plot::histogram_chart(
            &mut cols[0],
            "credit_hist",
            "Credit Amount Distribution",
            &snap.credit_histogram,
            palette.primary(),
        );
        plot::stacked_bar_chart(&mut cols[1], "housing_job", "Housing Type by Job Category", &snap.housing_by_job, palette);
    });
    ui.columns(2, |cols| {
        plot::box_chart(
            &mut cols[0],
            "credit_housing",
            "Credit Amount Distribution by Housing Type",
            &snap.credit_by_housing,
            palette.nth(2),
        );
        plot::scatter_chart(
            &mut cols[1],
            "duration_credit",
            "Duration vs Credit Amount by Purpose",
            &snap.duration_vs_credit,
            palette,
        );
    });
    ui.columns(2, |cols| {
        plot::stacked_bar_chart(
            &mut cols[0],
            "savings_checking",
            "Savings vs Checking Accounts",
            &snap.savings_by_checking,
            palette,
        );
        plot::risk_chart(&mut cols[1], "risk", &snap.risk, palette);
    });
    ui.columns(2, |cols| {
        plot::ranked_share_chart(
            &mut cols[0],
            "credit_groups",
            "Credit Amount Groups",
            &snap.credit_bucket_counts,
            palette,
        );
    });

    if state.show_raw_data {
        ui.separator();
        table::raw_data_table(ui, &snap.raw_rows, snap.stats.count);
    }
}
