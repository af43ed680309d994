use eframe::egui::{pos2, vec2, Align2, Color32, FontId, Rect, Sense, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, Plot, PlotPoints, Points,
};

use crate::color::{coolwarm, text_color_on, ColorMap};
use crate::data::aggregate::{BoxSummary, CorrelationMatrix};
use crate::data::model::{AGE_RATING, FAN_RATING, RELEASE_YEAR};
use crate::state::{AppState, ChartTab};

const PLOT_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// Visualizations (tabbed)
// ---------------------------------------------------------------------------

/// Render the tab strip and the active chart.
pub fn charts(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        for tab in ChartTab::ALL {
            if ui
                .selectable_label(state.active_tab == tab, tab.title())
                .clicked()
            {
                state.active_tab = tab;
            }
        }
    });
    ui.separator();

    let charts = &state.charts;
    match state.active_tab {
        ChartTab::TrendByYear => trend_by_year_plot(ui, &charts.trend_by_year),
        ChartTab::TrendByRating => {
            trend_by_rating_plot(ui, &charts.trend_by_rating, &state.color_map)
        }
        ChartTab::Heatmap => {
            ui.label("Correlation Heatmap");
            correlation_heatmap(ui, &charts.correlation);
        }
        ChartTab::Boxplot => {
            ui.label(format!("{FAN_RATING} Distribution by {AGE_RATING}"));
            distribution_plot(ui, &charts.distribution, &state.color_map);
        }
    }
}

// ---------------------------------------------------------------------------
// Line: mean rating per year
// ---------------------------------------------------------------------------

fn trend_by_year_plot(ui: &mut Ui, series: &[(f64, f64)]) {
    // Years whose ratings are all missing have a NaN mean; leave a gap.
    let points: Vec<[f64; 2]> = series
        .iter()
        .filter(|(_, mean)| !mean.is_nan())
        .map(|&(year, mean)| [year, mean])
        .collect();

    Plot::new("trend_by_year")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(RELEASE_YEAR)
        .y_axis_label(FAN_RATING)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(points.clone()))
                    .name(FAN_RATING)
                    .color(Color32::LIGHT_BLUE)
                    .width(2.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(points))
                    .color(Color32::LIGHT_BLUE)
                    .radius(2.5),
            );
        });
}

// ---------------------------------------------------------------------------
// Bars: mean rating per age rating
// ---------------------------------------------------------------------------

fn trend_by_rating_plot(ui: &mut Ui, series: &[(String, f64)], colors: &ColorMap) {
    let bars: Vec<Bar> = series
        .iter()
        .enumerate()
        .filter(|(_, (_, mean))| !mean.is_nan())
        .map(|(i, (label, mean))| {
            Bar::new(i as f64, *mean)
                .name(label)
                .fill(colors.color_for(label))
        })
        .collect();
    let labels: Vec<String> = series.iter().map(|(label, _)| label.clone()).collect();

    Plot::new("trend_by_rating")
        .height(PLOT_HEIGHT)
        .x_axis_label(AGE_RATING)
        .y_axis_label(FAN_RATING)
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).width(0.6));
        });
}

/// Axis label for integer grid marks that fall on a category.
fn category_label(labels: &[String], mark: GridMark) -> String {
    let v = mark.value;
    if v.fract() != 0.0 || v < 0.0 {
        return String::new();
    }
    labels.get(v as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Box plot: rating distribution per age rating
// ---------------------------------------------------------------------------

fn distribution_plot(ui: &mut Ui, boxes: &[BoxSummary], colors: &ColorMap) {
    let labels: Vec<String> = boxes.iter().map(|b| b.label.clone()).collect();

    let elems: Vec<BoxElem> = boxes
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let fill = colors.color_for(&b.label);
            BoxElem::new(
                i as f64,
                BoxSpread::new(b.lower_whisker, b.q1, b.median, b.q3, b.upper_whisker),
            )
            .name(&b.label)
            .fill(fill.gamma_multiply(0.8))
            .stroke(Stroke::new(1.0, Color32::DARK_GRAY))
            .box_width(0.6)
        })
        .collect();

    let outliers: Vec<[f64; 2]> = boxes
        .iter()
        .enumerate()
        .flat_map(|(i, b)| b.outliers.iter().map(move |&v| [i as f64, v]))
        .collect();

    Plot::new("rating_distribution")
        .height(PLOT_HEIGHT)
        .x_axis_label(AGE_RATING)
        .y_axis_label(FAN_RATING)
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(elems));
            if !outliers.is_empty() {
                plot_ui.points(
                    Points::new(PlotPoints::from(outliers))
                        .name("outliers")
                        .color(Color32::DARK_GRAY)
                        .radius(2.5),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Heatmap: annotated correlation matrix
// ---------------------------------------------------------------------------

fn correlation_heatmap(ui: &mut Ui, matrix: &CorrelationMatrix) {
    if matrix.is_empty() {
        ui.weak("No numeric columns.");
        return;
    }

    let n = matrix.len();
    let label_width = 120.0;
    let header_height = 24.0;
    let cell = ((ui.available_width() - label_width) / n as f32).clamp(40.0, 96.0);
    let size = vec2(
        label_width + cell * n as f32,
        header_height + cell * n as f32,
    );

    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let origin = response.rect.min;
    let font = FontId::proportional(12.0);
    let text_color = ui.visuals().text_color();

    for (j, name) in matrix.columns.iter().enumerate() {
        painter.text(
            pos2(
                origin.x + label_width + cell * (j as f32 + 0.5),
                origin.y + header_height * 0.5,
            ),
            Align2::CENTER_CENTER,
            name,
            font.clone(),
            text_color,
        );
    }

    for (i, name) in matrix.columns.iter().enumerate() {
        let top = origin.y + header_height + cell * i as f32;
        painter.text(
            pos2(origin.x + label_width - 6.0, top + cell * 0.5),
            Align2::RIGHT_CENTER,
            name,
            font.clone(),
            text_color,
        );

        for j in 0..n {
            let value = matrix.get(i, j);
            let rect = Rect::from_min_size(
                pos2(origin.x + label_width + cell * j as f32, top),
                vec2(cell, cell),
            );
            let fill = coolwarm(value);
            painter.rect_filled(rect.shrink(1.0), 0.0, fill);
            let annotation = if value.is_nan() {
                "NaN".to_string()
            } else {
                format!("{value:.2}")
            };
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                annotation,
                font.clone(),
                text_color_on(fill),
            );
        }
    }

    response.on_hover_ui(|ui: &mut Ui| {
        ui.label("Pearson correlation over rows where both values are present.");
    });
}
