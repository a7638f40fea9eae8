use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::filter::{ContinentFilter, SizeCategory};
use crate::data::model::YEAR_STEP;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – dashboard controls
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Controls");
    ui.separator();

    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    // ---- Year ----
    ui.strong("Year");
    let (Some(&first), Some(&last)) = (dataset.years().first(), dataset.years().last()) else {
        ui.label("Dataset has no rows.");
        return;
    };
    let mut year = state.filter.year;
    ui.add(
        egui::Slider::new(&mut year, first..=last)
            .step_by(YEAR_STEP as f64)
            .clamping(egui::SliderClamping::Always),
    );
    // Snap onto a year the data actually has.
    let year = dataset
        .years()
        .iter()
        .copied()
        .min_by_key(|y| (y - year).abs())
        .unwrap_or(year);
    state.set_year(year);
    ui.add_space(8.0);

    // ---- Continent ----
    ui.strong("Continent");
    let mut continent = state.filter.continent;
    let selected_text = match continent {
        ContinentFilter::All => "All".to_string(),
        ContinentFilter::Only(c) => c.to_string(),
    };
    egui::ComboBox::from_id_salt("continent")
        .selected_text(selected_text)
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(&mut continent, ContinentFilter::All, "All");
            for &c in dataset.continents() {
                let label = RichText::new(c.name()).color(state.continent_colors.color_for(c.name()));
                ui.selectable_value(&mut continent, ContinentFilter::Only(c), label);
            }
        });
    state.set_continent(continent);
    ui.add_space(8.0);

    // ---- Chart size ----
    ui.strong("Chart size");
    let mut size = state.filter.size;
    ui.horizontal(|ui: &mut Ui| {
        for option in SizeCategory::ALL {
            ui.radio_value(&mut size, option, option.label());
        }
    });
    state.set_size(size);
    ui.add_space(8.0);

    // ---- X axis scale ----
    ui.strong("X axis scale");
    let mut log_x = state.filter.log_x;
    ui.horizontal(|ui: &mut Ui| {
        ui.radio_value(&mut log_x, false, "Linear");
        ui.radio_value(&mut log_x, true, "Logarithmic");
    });
    state.set_log_x(log_x);
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open dataset…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(ds), Some(views)) = (&state.dataset, &state.views) {
            ui.label(format!(
                "{} rows loaded, {} shown for {}",
                ds.len(),
                views.scatter.len(),
                state.filter.year
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open gapminder data")
        .add_filter("Supported files", &["parquet", "pq", "json", "csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
