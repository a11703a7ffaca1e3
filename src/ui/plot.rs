use std::ops::RangeInclusive;

use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Plot, PlotPoints, Points,
};

use credit_lens::data::aggregate::{BoxStats, ChartTable, HistogramBin, ScatterSeries};
use credit_lens::dashboard::RiskDistribution;

use crate::color::{ChartPalette, ColorMap};

const CHART_HEIGHT: f32 = 260.0;

fn chart_title(ui: &mut Ui, title: &str) {
    ui.label(RichText::new(title).strong().size(15.0));
}

fn no_data(ui: &mut Ui) {
    ui.allocate_ui(eframe::egui::vec2(ui.available_width(), CHART_HEIGHT), |ui: &mut Ui| {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.weak("No records match the current filters");
        });
    });
}

/// Label integer x positions with category names.
fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let v = mark.value;
        if (v - v.round()).abs() > 1e-6 || v < 0.0 {
            return String::new();
        }
        labels.get(v.round() as usize).cloned().unwrap_or_default()
    }
}

fn base_plot(id: &str) -> Plot {
    Plot::new(id.to_string())
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
}

// ---------------------------------------------------------------------------
// Grouped counts
// ---------------------------------------------------------------------------

/// Stacked bars: x = first key column, one coloured series per second key.
/// Single-key tables become one bar per category.
pub fn stacked_bar_chart(ui: &mut Ui, id: &str, title: &str, table: &ChartTable, palette: &ChartPalette) {
    chart_title(ui, title);
    if table.is_empty() {
        no_data(ui);
        return;
    }

    let categories: Vec<String> = table.distinct_keys(0).into_iter().map(str::to_string).collect();

    let mut charts: Vec<BarChart> = Vec::new();
    if table.key_columns.len() < 2 {
        let colors = ColorMap::new(&table.distinct_keys(0), palette);
        let bars = table
            .pairs()
            .into_iter()
            .enumerate()
            .map(|(i, (key, count))| {
                Bar::new(i as f64, count as f64)
                    .width(0.7)
                    .name(key)
                    .fill(colors.color_for(key))
            })
            .collect();
        charts.push(BarChart::new(bars).name(&table.key_columns[0]));
    } else {
        let series = table.distinct_keys(1);
        let colors = ColorMap::new(&series, palette);
        for s in &series {
            let bars = categories
                .iter()
                .enumerate()
                .map(|(i, cat)| {
                    Bar::new(i as f64, table.count_of(&[cat.as_str(), *s]) as f64)
                        .width(0.7)
                        .name(format!("{cat} / {s}"))
                })
                .collect();
            let chart = {
                let below: Vec<&BarChart> = charts.iter().collect();
                BarChart::new(bars)
                    .name(format!("{}: {s}", table.key_columns[1]))
                    .color(colors.color_for(s))
                    .stack_on(&below)
            };
            charts.push(chart);
        }
    }

    base_plot(id)
        .x_axis_formatter(category_axis(categories))
        .y_axis_label("Count")
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

/// Ranked share chart (largest first) with each segment's share in its name.
pub fn ranked_share_chart(ui: &mut Ui, id: &str, title: &str, table: &ChartTable, palette: &ChartPalette) {
    chart_title(ui, title);
    if table.is_empty() {
        no_data(ui);
        return;
    }
    let total = table.total().max(1) as f64;
    let pairs = table.pairs();
    let keys: Vec<&str> = pairs.iter().map(|(k, _)| *k).collect();
    let colors = ColorMap::new(&keys, palette);

    let bars = pairs
        .iter()
        .enumerate()
        .map(|(i, (key, count))| {
            let share = *count as f64 / total * 100.0;
            Bar::new(i as f64, *count as f64)
                .width(0.7)
                .name(format!("{key} ({share:.1}%)"))
                .fill(colors.color_for(key))
        })
        .collect();

    let labels = keys.iter().map(|k| k.to_string()).collect();
    base_plot(id)
        .x_axis_formatter(category_axis(labels))
        .y_axis_label("Count")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(&table.key_columns[0]));
        });
}

// ---------------------------------------------------------------------------
// Distributions
// ---------------------------------------------------------------------------

pub fn histogram_chart(ui: &mut Ui, id: &str, title: &str, bins: &[HistogramBin], color: Color32) {
    chart_title(ui, title);
    if bins.is_empty() {
        no_data(ui);
        return;
    }
    let bars = bins
        .iter()
        .map(|b| {
            let width = (b.end - b.start).max(1.0);
            Bar::new((b.start + b.end) / 2.0, b.count as f64)
                .width(width)
                .name(format!("{:.0} – {:.0}", b.start, b.end))
        })
        .collect();

    base_plot(id)
        .x_axis_label("Credit amount")
        .y_axis_label("Count")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Credit amount").color(color));
        });
}

pub fn box_chart(ui: &mut Ui, id: &str, title: &str, stats: &[BoxStats], color: Color32) {
    chart_title(ui, title);
    if stats.is_empty() {
        no_data(ui);
        return;
    }
    let boxes = stats
        .iter()
        .enumerate()
        .map(|(i, s)| {
            BoxElem::new(i as f64, BoxSpread::new(s.min, s.q1, s.median, s.q3, s.max))
                .name(format!("{} (n={})", s.key, s.count))
                .box_width(0.5)
                .whisker_width(0.3)
        })
        .collect();

    let labels = stats.iter().map(|s| s.key.clone()).collect();
    base_plot(id)
        .x_axis_formatter(category_axis(labels))
        .y_axis_label("Credit amount")
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(boxes).name("Credit amount").color(color));
        });
}

pub fn scatter_chart(ui: &mut Ui, id: &str, title: &str, series: &[ScatterSeries], palette: &ChartPalette) {
    chart_title(ui, title);
    if series.is_empty() {
        no_data(ui);
        return;
    }
    let keys: Vec<&str> = series.iter().map(|s| s.key.as_str()).collect();
    let colors = ColorMap::new(&keys, palette);

    base_plot(id)
        .x_axis_label("Duration (months)")
        .y_axis_label("Credit amount")
        .show(ui, |plot_ui| {
            for s in series {
                let points = Points::new(PlotPoints::from(s.points.clone()))
                    .radius(2.5)
                    .color(colors.color_for(&s.key))
                    .name(&s.key);
                plot_ui.points(points);
            }
        });
}

/// Good/bad bars for the placeholder risk split, titled as an estimate.
pub fn risk_chart(ui: &mut Ui, id: &str, risk: &RiskDistribution, palette: &ChartPalette) {
    let title = if risk.validated {
        "Credit Risk Distribution"
    } else {
        "Credit Risk Distribution (unvalidated estimate)"
    };
    chart_title(ui, title);
    if risk.good + risk.bad <= 0.0 {
        no_data(ui);
        return;
    }
    let bars = vec![
        Bar::new(0.0, risk.good).width(0.6).name("Good Risk").fill(palette.nth(3)),
        Bar::new(1.0, risk.bad).width(0.6).name("Bad Risk").fill(palette.nth(2)),
    ];
    base_plot(id)
        .x_axis_formatter(category_axis(vec!["Good Risk".into(), "Bad Risk".into()]))
        .y_axis_label("Estimated count")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Risk (estimated)"));
        });
}
