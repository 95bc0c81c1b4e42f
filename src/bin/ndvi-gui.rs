/*!
 * GUI application for ndvi-rs - interactive world choropleth of monthly
 * country NDVI values.
 *
 * A cross-platform desktop application providing:
 * - A month scrubber driving an animated choropleth recolor
 * - Hover tooltips with country name, value, and month
 * - Pan/zoom over the map layer
 * - A per-country trend panel with summary statistics and CSV/JSON export
 *
 * Platform support: Windows, macOS, Linux
 */

use clap::Parser;
use eframe::egui;
use egui::emath::TSTransform;
use egui::epaint::TextShape;
use egui::{
    Align2, Color32, ColorImage, FontId, Pos2, Rect, RichText, Sense, Shape, Stroke,
    TextureHandle, TextureOptions, pos2, vec2,
};
use ndvi_rs::color::Rgb;
use ndvi_rs::geo::{self, CountryFeature};
use ndvi_rs::index;
use ndvi_rs::map;
use ndvi_rs::models::{MONTH_ABBREV, MonthSeries, SeriesByCountry, month_abbrev};
use ndvi_rs::project::{self, MAP_HEIGHT, MAP_WIDTH, NaturalEarth, ProjectedCountry};
use ndvi_rs::state::{AppState, Event};
use ndvi_rs::storage;
use ndvi_rs::trend::{self, LinearScale};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

/// Default boundary source; each feature's `id` carries the ISO3 code.
const WORLD_GEOJSON_URL: &str =
    "https://raw.githubusercontent.com/holtzy/D3-graph-gallery/master/DATA/world.geojson";

const MIN_ZOOM: f32 = 1.0;
const MAX_ZOOM: f32 = 8.0;

/// Raster resolution: map units to pixels.
const RASTER_SCALE: f64 = 2.0;
const RASTER_W: u32 = (MAP_WIDTH * RASTER_SCALE) as u32;
const RASTER_H: u32 = (MAP_HEIGHT * RASTER_SCALE) as u32;

const LINE_COLOR: Color32 = Color32::from_rgb(0x7c, 0xc7, 0x7c);

#[derive(Parser, Debug)]
#[command(author, version, about = "Interactive monthly NDVI world choropleth")]
struct Args {
    /// CSV file with iso3, month, ndvi_mean columns
    #[arg(long, default_value = "data/ndvi_country_2024_clean.csv")]
    data: PathBuf,

    /// Boundary GeoJSON: a local path or an http(s) URL
    #[arg(long, default_value = WORLD_GEOJSON_URL)]
    geo: String,

    /// Initial scrubber month (1-12)
    #[arg(long, default_value_t = 1)]
    month: u8,
}

fn main() -> Result<(), eframe::Error> {
    env_logger::init();
    let args = Args::parse();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 760.0])
            .with_min_inner_size([900.0, 560.0])
            .with_title("NDVI Country Atlas"),
        ..Default::default()
    };

    eframe::run_native(
        "NDVI Country Atlas",
        options,
        Box::new(move |_cc| Ok(Box::new(NdviApp::new(args)))),
    )
}

/// Messages from the two loader threads.
enum LoadMsg {
    Boundaries(Result<Vec<CountryFeature>, String>),
    Series(Result<SeriesByCountry, String>),
}

/// Main application state.
struct NdviApp {
    initial_month: u8,
    load_rx: mpsc::Receiver<LoadMsg>,
    boundaries: Option<Vec<CountryFeature>>,
    series: Option<SeriesByCountry>,
    load_error: Option<String>,
    session: Option<MapSession>,
}

impl NdviApp {
    fn new(args: Args) -> Self {
        // Both inputs load concurrently; the UI stays in the loading phase
        // until both results have arrived.
        let (tx, rx) = mpsc::channel();

        let data_path = args.data.clone();
        let tx_series = tx.clone();
        thread::spawn(move || {
            let result = index::load_series(&data_path).map_err(|e| format!("{e:#}"));
            let _ = tx_series.send(LoadMsg::Series(result));
        });

        let geo_source = args.geo.clone();
        thread::spawn(move || {
            let result = geo::load_features(&geo_source).map_err(|e| format!("{e:#}"));
            let _ = tx.send(LoadMsg::Boundaries(result));
        });

        Self {
            initial_month: args.month.clamp(1, 12),
            load_rx: rx,
            boundaries: None,
            series: None,
            load_error: None,
            session: None,
        }
    }

    fn poll_loaders(&mut self) {
        while let Ok(msg) = self.load_rx.try_recv() {
            match msg {
                LoadMsg::Boundaries(Ok(features)) => self.boundaries = Some(features),
                LoadMsg::Series(Ok(series)) => self.series = Some(series),
                LoadMsg::Boundaries(Err(err)) => {
                    self.load_error = Some(format!("Failed to load boundaries: {err}"));
                }
                LoadMsg::Series(Err(err)) => {
                    self.load_error = Some(format!("Failed to load NDVI table: {err}"));
                }
            }
        }

        if self.session.is_none()
            && self.load_error.is_none()
            && self.boundaries.is_some()
            && self.series.is_some()
        {
            let boundaries = self.boundaries.take().unwrap_or_default();
            let series = self.series.take().unwrap_or_default();
            self.session = Some(MapSession::new(boundaries, series, self.initial_month));
        }
    }
}

impl eframe::App for NdviApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_loaders();

        if let Some(err) = &self.load_error {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.heading("NDVI Country Atlas");
                ui.add_space(10.0);
                ui.colored_label(Color32::RED, err);
                ui.label("Fix the data sources and restart the application.");
            });
            return;
        }

        let Some(session) = &mut self.session else {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.heading("NDVI Country Atlas");
                ui.add_space(10.0);
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading boundaries and NDVI table...");
                });
            });
            // Keep polling the loader channel.
            ctx.request_repaint();
            return;
        };

        session.show(ctx);
    }
}

/// Everything the app needs once both inputs have loaded.
struct MapSession {
    countries: Vec<ProjectedCountry>,
    series: SeriesByCountry,
    state: AppState,
    transform: TSTransform,
    texture: Option<TextureHandle>,
    frame: Vec<u8>,
    rendered_fills: Vec<Rgb>,
    events: Vec<Event>,
    export_status: String,
}

impl MapSession {
    fn new(boundaries: Vec<CountryFeature>, series: SeriesByCountry, month: u8) -> Self {
        let countries = project::project_countries(&boundaries, &NaturalEarth::default());
        geo::join_coverage(&boundaries, &series).log();

        Self {
            countries,
            series,
            state: AppState::new(month),
            transform: TSTransform::IDENTITY,
            texture: None,
            frame: vec![0; (RASTER_W * RASTER_H * 3) as usize],
            rendered_fills: Vec::new(),
            events: Vec::new(),
            export_status: String::new(),
        }
    }

    fn show(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("scrubber").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.heading("NDVI Country Atlas");
                ui.separator();
                ui.label("Month:");
                let mut month = self.state.month;
                if ui
                    .add(egui::Slider::new(&mut month, 1..=12).show_value(true))
                    .changed()
                {
                    self.events.push(Event::MonthChanged(month));
                }
                ui.label(RichText::new(month_abbrev(month)).strong());
            });
            ui.add_space(4.0);
        });

        if self.state.selected.is_some() {
            egui::SidePanel::right("trend")
                .default_width(320.0)
                .show(ctx, |ui| self.show_trend(ui));
        }

        egui::CentralPanel::default().show(ctx, |ui| self.show_map(ui));

        self.dispatch_events(ctx.input(|i| i.time));
    }

    /// Fills currently on screen: the selected month's colors, blended with
    /// the in-flight transition when one is running.
    fn displayed_fills(&self, now: f64) -> Vec<Rgb> {
        let target = map::fill_colors(&self.countries, &self.series, self.state.month);
        match &self.state.transition {
            Some(t) => t.blend(&target, now),
            None => target,
        }
    }

    fn dispatch_events(&mut self, now: f64) {
        if self.events.is_empty() {
            return;
        }
        let displayed = self.displayed_fills(now);
        for event in std::mem::take(&mut self.events) {
            self.state.apply(event, &displayed, now);
        }
    }

    fn show_map(&mut self, ui: &mut egui::Ui) {
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());

        // Fit the 980x540 map frame into the panel, centered.
        let aspect = (MAP_WIDTH / MAP_HEIGHT) as f32;
        let width = rect.width().min(rect.height() * aspect);
        let base = Rect::from_center_size(rect.center(), vec2(width, width / aspect));

        if response.dragged() {
            self.transform.translation += response.drag_delta();
        }
        if let Some(pointer) = response.hover_pos() {
            let mut zoom = ui.input(|i| i.zoom_delta());
            if zoom == 1.0 {
                let scroll = ui.input(|i| i.smooth_scroll_delta.y);
                if scroll != 0.0 {
                    zoom = (scroll * 0.005).exp();
                }
            }
            if zoom != 1.0 {
                let clamped = (self.transform.scaling * zoom).clamp(MIN_ZOOM, MAX_ZOOM);
                let factor = clamped / self.transform.scaling;
                let pointer_in_layer = self.transform.inverse() * pointer;
                self.transform = self.transform
                    * TSTransform::from_translation(pointer_in_layer.to_vec2())
                    * TSTransform::from_scaling(factor)
                    * TSTransform::from_translation(-pointer_in_layer.to_vec2());
            }
        }

        let now = ui.input(|i| i.time);
        let displayed = self.displayed_fills(now);
        self.state.finish_transition(now);
        self.update_texture(ui, &displayed);

        let painter = ui.painter_at(rect);
        painter.rect_filled(
            rect,
            0.0,
            Color32::from_rgb(map::BACKGROUND.r, map::BACKGROUND.g, map::BACKGROUND.b),
        );
        if let Some(texture) = &self.texture {
            painter.image(
                texture.id(),
                self.transform.mul_rect(base),
                Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                Color32::WHITE,
            );
        }

        // Hover + click resolve through the same hit test, in map units.
        let hovered = response.hover_pos().and_then(|pos| {
            let local = self.transform.inverse() * pos;
            let mx = (local.x - base.min.x) / base.width() * MAP_WIDTH as f32;
            let my = (local.y - base.min.y) / base.height() * MAP_HEIGHT as f32;
            map::hit_test(&self.countries, mx as f64, my as f64)
        });

        if hovered != self.state.hovered {
            self.events.push(match hovered {
                Some(index) => Event::CountryHovered(index),
                None => Event::HoverCleared,
            });
        }

        if let Some(index) = hovered {
            self.show_tooltip(ui, index);
            if response.clicked() {
                self.events.push(Event::CountrySelected(index));
            }
        }

        if self.state.transition.is_some() || !self.events.is_empty() {
            ui.ctx().request_repaint();
        }
    }

    fn update_texture(&mut self, ui: &egui::Ui, displayed: &[Rgb]) {
        if self.texture.is_some() && displayed == self.rendered_fills.as_slice() {
            return;
        }
        if let Err(err) = map::rasterize(
            &self.countries,
            displayed,
            &mut self.frame,
            RASTER_W,
            RASTER_H,
            RASTER_SCALE,
        ) {
            log::error!("choropleth raster failed: {err:#}");
            return;
        }
        let image = ColorImage::from_rgb([RASTER_W as usize, RASTER_H as usize], &self.frame);
        match &mut self.texture {
            Some(texture) => texture.set(image, TextureOptions::LINEAR),
            None => {
                self.texture =
                    Some(ui.ctx().load_texture("choropleth", image, TextureOptions::LINEAR));
            }
        }
        self.rendered_fills = displayed.to_vec();
    }

    fn show_tooltip(&self, ui: &egui::Ui, index: usize) {
        let country = &self.countries[index];
        let value = country
            .iso3
            .as_deref()
            .and_then(|iso| self.series.get(iso))
            .and_then(|s| s.value(self.state.month));
        egui::show_tooltip_at_pointer(
            ui.ctx(),
            ui.layer_id(),
            egui::Id::new("country-tooltip"),
            |ui| {
                ui.strong(&country.name);
                ui.label(match value {
                    Some(v) => format!("NDVI: {v:.3}"),
                    None => "NDVI: No data".to_string(),
                });
                ui.label(month_abbrev(self.state.month));
            },
        );
    }

    fn show_trend(&mut self, ui: &mut egui::Ui) {
        let Some(index) = self.state.selected else {
            return;
        };
        let (label, name, iso3) = {
            let c = &self.countries[index];
            (c.label(), c.name.clone(), c.iso3.clone())
        };
        let series: Option<MonthSeries> = iso3
            .as_deref()
            .and_then(|iso| self.series.get(iso))
            .cloned();

        let Some(series) = series else {
            ui.heading(&name);
            ui.add_space(6.0);
            ui.label("No data available");
            return;
        };
        let iso3 = iso3.unwrap_or_default();

        ui.heading(&label);
        ui.add_space(6.0);

        let summary = trend::summarize(&series);
        ui.label(format!("Average NDVI: {:.3}", summary.mean));
        ui.label(format!("Months with data: {} of 12", summary.count));
        if let (Some(min), Some(max)) = (summary.min, summary.max) {
            ui.label(format!("Min / Max: {min:.3} / {max:.3}"));
        }
        if let Some(median) = summary.median {
            ui.label(format!("Median: {median:.3}"));
        }

        ui.add_space(8.0);
        draw_mini_chart(ui, &series);
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            if ui.button("Export CSV").clicked()
                && let Some(path) = rfd::FileDialog::new()
                    .set_file_name(format!("ndvi_{iso3}.csv"))
                    .save_file()
            {
                self.export_status = match storage::save_country_csv(&iso3, &series, &path) {
                    Ok(()) => format!("Saved {}", path.display()),
                    Err(err) => format!("Export failed: {err:#}"),
                };
            }
            if ui.button("Export JSON").clicked()
                && let Some(path) = rfd::FileDialog::new()
                    .set_file_name(format!("ndvi_{iso3}.json"))
                    .save_file()
            {
                self.export_status =
                    match storage::save_country_json(&iso3, &name, &series, &summary, &path) {
                        Ok(()) => format!("Saved {}", path.display()),
                        Err(err) => format!("Export failed: {err:#}"),
                    };
            }
        });
        if !self.export_status.is_empty() {
            ui.colored_label(Color32::DARK_GREEN, &self.export_status);
        }
    }
}

/// 12-month mini line chart: fixed y domain [0, 1], gaps where values are
/// absent, markers at every present point, rotated month labels.
fn draw_mini_chart(ui: &mut egui::Ui, series: &MonthSeries) {
    let size = vec2(ui.available_width().min(300.0), 200.0);
    let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
    let painter = ui.painter_at(rect);

    let x = LinearScale::new((1.0, 12.0), (30.0, size.x as f64 - 10.0));
    let y = LinearScale::new((0.0, 1.0), (size.y as f64 - 20.0, 20.0));
    let to_pos = |m: f64, v: f64| -> Pos2 {
        pos2(
            rect.min.x + x.apply(m) as f32,
            rect.min.y + y.apply(v) as f32,
        )
    };

    let axis_color = Color32::from_gray(150);
    let axis_stroke = Stroke::new(1.0, axis_color);
    painter.line_segment([to_pos(1.0, 0.0), to_pos(12.0, 0.0)], axis_stroke);
    painter.line_segment([to_pos(1.0, 0.0), to_pos(1.0, 1.0)], axis_stroke);

    let tick_font = FontId::proportional(10.0);
    for (i, abbrev) in MONTH_ABBREV.iter().enumerate() {
        let anchor = to_pos(i as f64 + 1.0, 0.0) + vec2(-10.0, 10.0);
        let galley = painter.layout_no_wrap(abbrev.to_string(), tick_font.clone(), axis_color);
        let mut text = TextShape::new(anchor, galley, axis_color);
        text.angle = -std::f32::consts::FRAC_PI_4;
        painter.add(text);
    }
    for i in 0..=4 {
        let v = i as f64 * 0.25;
        painter.text(
            to_pos(1.0, v) - vec2(4.0, 0.0),
            Align2::RIGHT_CENTER,
            format!("{v:.2}"),
            tick_font.clone(),
            axis_color,
        );
    }

    for segment in trend::line_segments(series) {
        let points: Vec<Pos2> = segment
            .iter()
            .map(|&(m, v)| to_pos(m as f64, v))
            .collect();
        if points.len() >= 2 {
            painter.add(Shape::line(points, Stroke::new(2.0, LINE_COLOR)));
        }
    }
    for (m, v) in trend::markers(series) {
        painter.circle_filled(to_pos(m as f64, v), 2.5, LINE_COLOR);
    }
}
