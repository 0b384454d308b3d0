use std::f32::consts::{FRAC_PI_2, TAU};

use chrono::{Datelike, NaiveDate};
use eframe::egui::{self, Color32, RichText, Sense, Shape, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use rusty_dashboards::dashboard::{Chart, ChartKind, Series};
use rusty_dashboards::data::Value;

use crate::color::{self, ColorMap};

const CHART_HEIGHT: f32 = 280.0;
const PIE_SIZE: f32 = 240.0;

// ---------------------------------------------------------------------------
// Chart dispatch (central panel)
// ---------------------------------------------------------------------------

/// Render one chart of the view model.
pub fn chart(ui: &mut Ui, chart: &Chart, colors: &ColorMap) {
    ui.label(RichText::new(&chart.title).strong().size(16.0));
    if chart.is_empty() {
        ui.label(RichText::new("Tidak ada data untuk filter ini.").weak());
        return;
    }
    match chart.kind {
        ChartKind::Bar | ChartKind::HorizontalBar => bar_chart(ui, chart, colors),
        ChartKind::Line => line_chart(ui, chart, colors),
        ChartKind::Pie { hole } => pie_chart(ui, chart, hole, colors),
    }
}

// ---------------------------------------------------------------------------
// Bar chart
// ---------------------------------------------------------------------------

fn bar_chart(ui: &mut Ui, chart: &Chart, colors: &ColorMap) {
    let Some(series) = chart.series.first() else {
        return;
    };
    let horizontal = chart.kind == ChartKind::HorizontalBar;
    let labels: Vec<String> = series.points.iter().map(|(k, _)| k.to_string()).collect();

    // Horizontal bars are ranked by value and shaded on a blue scale.
    let fills: Vec<Color32> = if horizontal {
        let values: Vec<f64> = series.points.iter().map(|(_, v)| *v).collect();
        color::blues_by_value(&values)
    } else {
        series.points.iter().map(|(k, _)| colors.color_for(k)).collect()
    };

    let bars: Vec<Bar> = series
        .points
        .iter()
        .zip(fills)
        .enumerate()
        .map(|(i, ((key, value), fill))| {
            Bar::new(i as f64, *value)
                .name(key.to_string())
                .fill(fill)
                .width(0.6)
        })
        .collect();
    let mut bar_chart = BarChart::new(bars).name(&series.name);
    if horizontal {
        bar_chart = bar_chart.horizontal();
    }

    let plot = Plot::new(&chart.title)
        .height(CHART_HEIGHT)
        .x_axis_label(chart.x_label.as_str())
        .y_axis_label(chart.y_label.as_str())
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false);
    let plot = if horizontal {
        plot.y_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
    } else {
        plot.x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
    };

    plot.show(ui, |plot_ui| plot_ui.bar_chart(bar_chart));
}

/// Label of the category at an integer axis position; empty between bars.
fn category_label(labels: &[String], position: f64) -> String {
    let index = position.round();
    if index < 0.0 || (position - index).abs() > 1e-6 {
        return String::new();
    }
    labels.get(index as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Line chart
// ---------------------------------------------------------------------------

fn line_chart(ui: &mut Ui, chart: &Chart, colors: &ColorMap) {
    let dated = chart
        .series
        .iter()
        .flat_map(|s| s.points.iter())
        .any(|(k, _)| matches!(k, Value::Date(_)));

    Plot::new(&chart.title)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(chart.x_label.as_str())
        .y_axis_label(chart.y_label.as_str())
        .allow_scroll(false)
        .x_axis_formatter(move |mark, _range| axis_label(mark.value, dated))
        .show(ui, |plot_ui| {
            for series in &chart.series {
                let color = series_color(series, colors);
                let points: Vec<[f64; 2]> = series
                    .points
                    .iter()
                    .filter_map(|(k, v)| Some([x_position(k)?, *v]))
                    .collect();

                plot_ui.line(
                    Line::new(PlotPoints::from(points.clone()))
                        .name(&series.name)
                        .color(color)
                        .width(2.0),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .name(&series.name)
                        .color(color)
                        .radius(3.5),
                );
            }
        });
}

/// Multi-series charts colour each series by its category; a lone series
/// keeps the default colour.
fn series_color(series: &Series, colors: &ColorMap) -> Color32 {
    colors.color_for(&Value::from(series.name.as_str()))
}

/// Numeric x position of a key: dates as days since 0001-01-01.
fn x_position(key: &Value) -> Option<f64> {
    match key {
        Value::Date(d) => Some(d.num_days_from_ce() as f64),
        other => other.as_f64(),
    }
}

fn axis_label(value: f64, dated: bool) -> String {
    if (value - value.round()).abs() > 1e-6 {
        return String::new();
    }
    if dated {
        NaiveDate::from_num_days_from_ce_opt(value.round() as i32)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    } else {
        format!("{value:.0}")
    }
}

// ---------------------------------------------------------------------------
// Pie / donut chart
// ---------------------------------------------------------------------------

fn pie_chart(ui: &mut Ui, chart: &Chart, hole: f32, colors: &ColorMap) {
    let Some(series) = chart.series.first() else {
        return;
    };
    let total = series.total();
    if total <= 0.0 {
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        let (rect, _) = ui.allocate_exact_size(egui::vec2(PIE_SIZE, PIE_SIZE), Sense::hover());
        let painter = ui.painter_at(rect);
        let center = rect.center();
        let radius = PIE_SIZE / 2.0 - 4.0;

        // Slices are fans of thin triangles so each piece stays convex.
        let mut start = -FRAC_PI_2;
        for (key, value) in &series.points {
            let sweep = (*value / total) as f32 * TAU;
            let color = colors.color_for(key);
            let steps = ((sweep / 0.05).ceil() as usize).max(1);
            for i in 0..steps {
                let a0 = start + sweep * i as f32 / steps as f32;
                let a1 = start + sweep * (i + 1) as f32 / steps as f32;
                let p0 = center + radius * egui::vec2(a0.cos(), a0.sin());
                let p1 = center + radius * egui::vec2(a1.cos(), a1.sin());
                painter.add(Shape::convex_polygon(
                    vec![center, p0, p1],
                    color,
                    Stroke::new(0.5, color),
                ));
            }
            start += sweep;
        }
        if hole > 0.0 {
            painter.circle_filled(center, radius * hole, ui.visuals().panel_fill);
        }

        ui.vertical(|ui: &mut Ui| {
            for (key, value) in &series.points {
                ui.horizontal(|ui: &mut Ui| {
                    let (swatch, _) = ui.allocate_exact_size(egui::vec2(14.0, 14.0), Sense::hover());
                    ui.painter().rect_filled(swatch, 3.0, colors.color_for(key));
                    ui.label(format!("{key}  {:.1}%", value / total * 100.0));
                });
            }
        });
    });
}
