use std::collections::BTreeMap;
use std::f32::consts::{FRAC_PI_2, TAU};
use std::ops::RangeInclusive;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, ScrollArea, Sense, Shape, Stroke, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, Points};

use crate::color::ColorMap;
use crate::data::model::Continent;
use crate::data::views::{DerivedViews, PieRows};
use crate::state::AppState;

const MIN_MARKER_RADIUS: f32 = 2.0;
const MAX_MARKER_RADIUS: f32 = 20.0;

// ---------------------------------------------------------------------------
// Dashboard grid (central panel)
// ---------------------------------------------------------------------------

/// Render the four charts in a 2×2 grid.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some(views) = &state.views else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a dataset to start  (File → Open dataset…)");
        });
        return;
    };

    let colors = &state.continent_colors;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.columns(2, |cols| {
                chart_box(&mut cols[0], &views.titles.scatter, |ui| scatter_chart(ui, views, colors));
                chart_box(&mut cols[1], &views.titles.bar, |ui| bar_chart(ui, views, colors));
            });
            ui.add_space(12.0);
            ui.columns(2, |cols| {
                chart_box(&mut cols[0], &views.titles.line, |ui| line_chart(ui, views, colors));
                chart_box(&mut cols[1], &views.titles.pie, |ui| pie_chart(ui, views, colors));
            });
        });
}

fn chart_box(ui: &mut Ui, title: &str, add_chart: impl FnOnce(&mut Ui)) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.strong(title);
        add_chart(ui);
    });
}

fn empty_chart(ui: &mut Ui, height: f32) {
    ui.allocate_ui(egui::vec2(ui.available_width(), height), |ui: &mut Ui| {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No data for this selection");
        });
    });
}

// ---------------------------------------------------------------------------
// Scatter: GDP per capita vs life expectancy, marker size by population
// ---------------------------------------------------------------------------

fn scatter_chart(ui: &mut Ui, views: &DerivedViews, colors: &ColorMap) {
    let height = views.chart_height as f32;
    if views.scatter.is_empty() {
        empty_chart(ui, height);
        return;
    }

    let log_x = views.log_x;
    let max_pop = views.scatter.iter().map(|r| r.pop).max().unwrap_or(1) as f64;

    let mut plot = Plot::new("scatter_plot")
        .height(height)
        .legend(Legend::default())
        .x_axis_label(if log_x { "GDP per Capita (log)" } else { "GDP per Capita" })
        .y_axis_label("Life Expectancy");
    if log_x {
        plot = plot.x_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| {
            format!("{:.0}", 10f64.powf(mark.value))
        });
    }

    plot.show(ui, |plot_ui| {
        // One item per country so each marker can have its own radius;
        // items sharing a name share one legend entry.
        for r in &views.scatter {
            let x = if log_x { r.gdp_percap.log10() } else { r.gdp_percap };
            let scale = (r.pop as f64 / max_pop).sqrt() as f32;
            let radius = MIN_MARKER_RADIUS + scale * (MAX_MARKER_RADIUS - MIN_MARKER_RADIUS);
            plot_ui.points(
                Points::new(PlotPoints::from(vec![[x, r.life_exp]]))
                    .name(r.continent.name())
                    .color(colors.color_for(r.continent.name()))
                    .radius(radius)
                    .filled(true),
            );
        }
    });
}

// ---------------------------------------------------------------------------
// Bar: top countries by GDP per capita
// ---------------------------------------------------------------------------

fn bar_chart(ui: &mut Ui, views: &DerivedViews, colors: &ColorMap) {
    let height = views.chart_height as f32;
    if views.bar.is_empty() {
        empty_chart(ui, height);
        return;
    }

    let mut by_continent: BTreeMap<Continent, Vec<Bar>> = BTreeMap::new();
    for (i, r) in views.bar.iter().enumerate() {
        let bar = Bar::new(i as f64, r.gdp_percap)
            .name(&r.country)
            .width(0.7)
            .fill(colors.color_for(r.continent.name()));
        by_continent.entry(r.continent).or_default().push(bar);
    }

    let names: Vec<String> = views.bar.iter().map(|r| r.country.clone()).collect();
    Plot::new("bar_chart")
        .height(height)
        .legend(Legend::default())
        .y_axis_label("GDP per Capita")
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            names.get(idx as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            for (continent, bars) in by_continent {
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .name(continent.name())
                        .color(colors.color_for(continent.name())),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Line: mean life expectancy over the years
// ---------------------------------------------------------------------------

fn line_chart(ui: &mut Ui, views: &DerivedViews, colors: &ColorMap) {
    let height = views.chart_height as f32;
    if views.line.is_empty() {
        empty_chart(ui, height);
        return;
    }

    // `None` is the single-continent series.
    let mut series: BTreeMap<Option<Continent>, Vec<[f64; 2]>> = BTreeMap::new();
    for p in &views.line {
        series
            .entry(p.continent)
            .or_default()
            .push([p.year as f64, p.mean_life_exp]);
    }

    Plot::new("line_chart")
        .height(height)
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("Life Expectancy")
        .show(ui, |plot_ui| {
            for (continent, points) in series {
                let (name, color) = match continent {
                    Some(c) => (c.name(), colors.color_for(c.name())),
                    None => ("Mean life expectancy", Color32::LIGHT_BLUE),
                };
                plot_ui.line(
                    Line::new(PlotPoints::from(points))
                        .name(name)
                        .color(color)
                        .width(2.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Pie: population share
// ---------------------------------------------------------------------------

/// Angle covered by one triangle of a wedge.
const WEDGE_STEP: f32 = 0.05;

fn pie_chart(ui: &mut Ui, views: &DerivedViews, colors: &ColorMap) {
    let height = views.chart_height as f32;
    if views.pie.is_empty() {
        empty_chart(ui, height);
        return;
    }

    let slices = views.pie.slices();
    let slice_colors: Vec<Color32> = match &views.pie {
        PieRows::ByContinent(rows) => rows
            .iter()
            .map(|r| colors.color_for(r.continent.name()))
            .collect(),
        PieRows::TopCountries(_) => {
            let countries = ColorMap::new(slices.iter().map(|(label, _)| label.clone()));
            slices.iter().map(|(label, _)| countries.color_for(label)).collect()
        }
    };
    let total = views.pie.total().max(1) as f32;

    let (response, painter) =
        ui.allocate_painter(egui::vec2(ui.available_width(), height), Sense::hover());
    let rect = response.rect;
    let pie_area = Rect::from_min_size(rect.min, egui::vec2(rect.width() * 0.6, rect.height()));
    let center = pie_area.center();
    let radius = 0.45 * pie_area.width().min(pie_area.height());

    let point_at = |angle: f32| center + radius * egui::vec2(angle.cos(), angle.sin());

    // Start at twelve o'clock and go clockwise.
    let mut start = -FRAC_PI_2;
    for ((_, pop), color) in slices.iter().zip(&slice_colors) {
        let sweep = TAU * (*pop as f32 / total);
        let steps = (sweep / WEDGE_STEP).ceil().max(1.0) as usize;
        for i in 0..steps {
            let a0 = start + sweep * i as f32 / steps as f32;
            let a1 = start + sweep * (i + 1) as f32 / steps as f32;
            painter.add(Shape::convex_polygon(
                vec![center, point_at(a0), point_at(a1)],
                *color,
                Stroke::NONE,
            ));
        }
        start += sweep;
    }

    // Legend, with each slice's share.
    let text_color = ui.visuals().text_color();
    let legend_x = pie_area.right() + 8.0;
    let mut y = rect.top() + 12.0;
    for ((label, pop), color) in slices.iter().zip(&slice_colors) {
        let swatch = Rect::from_center_size(Pos2::new(legend_x + 6.0, y), egui::vec2(10.0, 10.0));
        painter.rect_filled(swatch, 2.0, *color);
        painter.text(
            Pos2::new(legend_x + 16.0, y),
            Align2::LEFT_CENTER,
            format!("{label}  {:.1}%", 100.0 * *pop as f32 / total),
            FontId::proportional(13.0),
            text_color,
        );
        y += 18.0;
    }
}
