use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Ui, Vec2};
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints, Points};
use rusty_dashboard::view::chart::{ChartData, ChartKind, ChartSpec, XAxis};
use rusty_dashboard::view::correlation::CorrelationMatrix;

use crate::color::{coolwarm, generate_palette, text_color_on};

const SERIES_COLOR: Color32 = Color32::from_rgb(31, 119, 180);

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

/// Render a resolved chart.
pub fn chart(ui: &mut Ui, spec: &ChartSpec) {
    ui.label(egui::RichText::new(&spec.title).strong());

    let mut plot = Plot::new("dashboard_chart")
        .height(spec.height.get() as f32)
        .x_axis_label(spec.x_label.clone())
        .y_axis_label(spec.y_label.clone())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true);

    // Text and boolean x values sit at 0, 1, 2… and keep their labels.
    if let ChartData::Series {
        x: XAxis::Categorical { categories, .. },
        ..
    } = &spec.data
    {
        let categories = categories.clone();
        plot = plot.x_axis_formatter(move |mark, _range| {
            let pos = mark.value.round();
            if (mark.value - pos).abs() > 1e-6 || pos < 0.0 {
                return String::new();
            }
            categories.get(pos as usize).cloned().unwrap_or_default()
        });
    }

    plot.show(ui, |plot_ui| match &spec.data {
        ChartData::Series { x, y } => {
            let coords: Vec<[f64; 2]> = x
                .positions()
                .iter()
                .zip(y)
                .map(|(&xi, &yi)| [xi, yi])
                .collect();
            match spec.kind {
                ChartKind::Line => {
                    let line_points: PlotPoints = coords.iter().copied().collect();
                    plot_ui.line(Line::new(line_points).color(SERIES_COLOR).width(1.5));
                    let markers: PlotPoints = coords.into_iter().collect();
                    plot_ui.points(Points::new(markers).color(SERIES_COLOR).radius(3.0));
                }
                ChartKind::Scatter => {
                    let points: PlotPoints = coords.into_iter().collect();
                    plot_ui.points(Points::new(points).color(SERIES_COLOR).radius(3.0));
                }
                ChartKind::Bar | ChartKind::Histogram => {
                    let colors = match x {
                        XAxis::Categorical { categories, .. } => generate_palette(categories.len()),
                        XAxis::Numeric(_) => Vec::new(),
                    };
                    let bars = coords
                        .into_iter()
                        .map(|[xi, yi]| {
                            let color = colors
                                .get(xi as usize)
                                .copied()
                                .unwrap_or(SERIES_COLOR);
                            Bar::new(xi, yi).width(0.8).fill(color)
                        })
                        .collect();
                    plot_ui.bar_chart(BarChart::new(bars));
                }
            }
        }
        ChartData::Histogram(bins) => {
            let bars = bins
                .iter()
                .map(|b| {
                    Bar::new((b.start + b.end) / 2.0, b.count as f64)
                        .width(b.end - b.start)
                        .fill(SERIES_COLOR)
                })
                .collect();
            plot_ui.bar_chart(BarChart::new(bars));
        }
    });
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

/// Annotated grid of correlation coefficients.
pub fn heatmap(ui: &mut Ui, matrix: &CorrelationMatrix) {
    let n = matrix.columns.len();
    let label_width = 110.0;
    let cell = ((ui.available_width() - label_width) / n as f32).clamp(28.0, 72.0);
    let size = Vec2::new(label_width + cell * n as f32, label_width + cell * n as f32);

    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let origin = response.rect.min;
    let font = FontId::proportional(12.0);
    let text_color = ui.visuals().text_color();

    for (i, row_name) in matrix.columns.iter().enumerate() {
        let y = origin.y + cell * i as f32;
        painter.text(
            Pos2::new(origin.x + label_width - 6.0, y + cell / 2.0),
            Align2::RIGHT_CENTER,
            row_name,
            font.clone(),
            text_color,
        );

        for (j, &r) in matrix.data[i].iter().enumerate() {
            let min = Pos2::new(origin.x + label_width + cell * j as f32, y);
            let rect = Rect::from_min_size(min, Vec2::splat(cell));
            let fill = coolwarm(r);
            painter.rect_filled(rect.shrink(1.0), 0.0, fill);
            let text = if r.is_nan() { "nan".to_string() } else { format!("{r:.2}") };
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                text,
                font.clone(),
                text_color_on(fill),
            );
        }
    }

    // Column names under the grid.
    let base_y = origin.y + cell * n as f32 + 6.0;
    for (j, name) in matrix.columns.iter().enumerate() {
        painter.text(
            Pos2::new(origin.x + label_width + cell * (j as f32 + 0.5), base_y),
            Align2::CENTER_TOP,
            name,
            font.clone(),
            text_color,
        );
    }
}
