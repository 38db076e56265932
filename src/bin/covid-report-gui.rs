/*!
 * Desktop dashboard for covid-report-rs
 *
 * A sidebar selects one of three pages:
 * - Homepage: welcome text, health tips, prevention video
 * - Search by Country: per-country report with map link and CSV/JSON export
 * - Top 10 Chart: top countries by cases, exportable as PNG/SVG
 *
 * Platform support: Windows, macOS, Linux
 */

use covid_report::api::{GeocodingClient, StatisticsClient};
use covid_report::cache::CountryListCache;
use covid_report::dashboard::{self, ChartKind, CountryCases, Page, SearchMode};
use covid_report::{Config, Metric, Outcome, Report, ReportService, format, resolver, storage, viz};
use eframe::egui;
use plotters::style::RGBColor;
use std::path::PathBuf;
use std::sync::{Arc, mpsc};
use std::thread;

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 680.0])
            .with_min_inner_size([640.0, 420.0])
            .with_title(dashboard::APP_TITLE),
        ..Default::default()
    };

    eframe::run_native(
        "COVID-19 Tracker",
        options,
        Box::new(|_cc| Ok(Box::new(CovidApp::new()))),
    )
}

/// Remote clients shared with background threads.
struct Backend {
    service: ReportService<StatisticsClient, GeocodingClient>,
    countries: CountryListCache,
}

impl Backend {
    fn from_env() -> anyhow::Result<Self> {
        let cfg = Config::from_env()?;
        Ok(Self {
            service: ReportService::new(StatisticsClient::new(&cfg)?, GeocodingClient::new(&cfg)?),
            countries: CountryListCache::new(cfg.country_ttl),
        })
    }
}

#[derive(Debug)]
enum BackgroundResult {
    Report(Result<Report, String>),
    Countries(Result<Vec<String>, String>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ExportFormat {
    Csv,
    Json,
}

/// Main application state
struct CovidApp {
    page: Page,
    show_tips: bool,

    // Search page
    search_mode: SearchMode,
    code_input: String,
    selected_country: String,
    metrics: [bool; 4],
    locale: String,
    report: Option<Report>,

    // Country dropdown
    countries: Vec<String>,
    countries_loading: bool,
    countries_requested: bool,

    // Top-10 page
    chart_kind: ChartKind,
    bar_color: [u8; 3],

    // UI state
    is_loading: bool,
    status_message: String,
    error_message: String,

    // Background operations
    backend: Option<Arc<Backend>>,
    config_error: String,
    sender: mpsc::Sender<BackgroundResult>,
    receiver: mpsc::Receiver<BackgroundResult>,
}

impl CovidApp {
    fn new() -> Self {
        let (backend, config_error) = match Backend::from_env() {
            Ok(b) => (Some(Arc::new(b)), String::new()),
            Err(err) => {
                log::warn!("report backend unavailable: {:#}", err);
                (None, format!("Configuration error: {:#}", err))
            }
        };
        let (sender, receiver) = mpsc::channel();

        Self {
            page: Page::Homepage,
            show_tips: false,

            search_mode: SearchMode::EnterCode,
            code_input: String::new(),
            selected_country: String::new(),
            metrics: [true; 4],
            locale: "en".to_string(),
            report: None,

            countries: Vec::new(),
            countries_loading: false,
            countries_requested: false,

            chart_kind: ChartKind::Bar,
            bar_color: [255, 0, 0],

            is_loading: false,
            status_message: String::new(),
            error_message: String::new(),

            backend,
            config_error,
            sender,
            receiver,
        }
    }

    fn selected_metrics(&self) -> Vec<Metric> {
        Metric::ALL
            .into_iter()
            .zip(self.metrics)
            .filter_map(|(m, on)| on.then_some(m))
            .collect()
    }

    fn start_report(&mut self) {
        let identifier = match self.search_mode {
            SearchMode::EnterCode => self.code_input.clone(),
            SearchMode::SelectFromDropdown => self.selected_country.clone(),
        };
        let is_code = self.search_mode.is_code();

        // The previous report is discarded whatever happens next.
        self.report = None;
        self.status_message.clear();

        if let Err(err) = resolver::resolve(&identifier, is_code) {
            self.error_message = format!("{}", err);
            return;
        }
        let Some(backend) = self.backend.clone() else {
            self.error_message = self.config_error.clone();
            return;
        };

        self.is_loading = true;
        self.error_message.clear();
        self.status_message = "Fetching report...".to_string();

        let selected = self.selected_metrics();
        let sender = self.sender.clone();
        thread::spawn(move || {
            let result = backend
                .service
                .generate(&identifier, is_code, &selected)
                .map_err(|e| e.to_string());
            let _ = sender.send(BackgroundResult::Report(result));
        });
    }

    fn load_countries(&mut self) {
        let Some(backend) = self.backend.clone() else {
            return;
        };
        self.countries_requested = true;
        self.countries_loading = true;
        let sender = self.sender.clone();
        thread::spawn(move || {
            let result = backend
                .countries
                .get_or_refresh(|| backend.service.stats().fetch_countries())
                .map(|list| list.iter().map(|c| c.name.clone()).collect())
                .map_err(|e| format!("{:#}", e));
            let _ = sender.send(BackgroundResult::Countries(result));
        });
    }

    fn check_background_results(&mut self) {
        while let Ok(result) = self.receiver.try_recv() {
            match result {
                BackgroundResult::Report(Ok(report)) => {
                    self.is_loading = false;
                    match &report.outcome {
                        Outcome::Success => {
                            self.status_message = format::outcome_message(&report.outcome);
                            self.error_message.clear();
                        }
                        other => {
                            self.status_message.clear();
                            self.error_message = format::outcome_message(other);
                        }
                    }
                    self.report = Some(report);
                }
                BackgroundResult::Report(Err(error)) => {
                    self.is_loading = false;
                    self.status_message.clear();
                    self.error_message = error;
                }
                BackgroundResult::Countries(Ok(names)) => {
                    self.countries_loading = false;
                    if self.selected_country.is_empty()
                        && let Some(first) = names.first()
                    {
                        self.selected_country = first.clone();
                    }
                    self.countries = names;
                }
                BackgroundResult::Countries(Err(error)) => {
                    self.countries_loading = false;
                    self.error_message = format!("Failed to load country list: {}", error);
                }
            }
        }
    }

    fn show_homepage(&mut self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new(dashboard::WELCOME).color(egui::Color32::LIGHT_BLUE));
        ui.add_space(10.0);
        ui.label(dashboard::TIPS_INTRO);
        ui.checkbox(&mut self.show_tips, "Show Health Tips");

        if self.show_tips {
            ui.add_space(5.0);
            ui.strong("Health Tips:");
            for (title, text) in dashboard::HEALTH_TIPS {
                ui.horizontal_wrapped(|ui| {
                    ui.strong(format!("{}:", title));
                    ui.label(text);
                });
            }
        }

        ui.add_space(10.0);
        ui.hyperlink_to("Watch: how to protect yourself from COVID-19", dashboard::VIDEO_URL);
    }

    fn show_search(&mut self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new(dashboard::SEARCH_INFO).color(egui::Color32::LIGHT_BLUE));
        ui.add_space(10.0);

        if !self.config_error.is_empty() {
            ui.colored_label(egui::Color32::RED, &self.config_error);
            ui.add_space(5.0);
        }

        ui.group(|ui| {
            egui::ComboBox::from_label("Choose a Category")
                .selected_text(self.search_mode.label())
                .show_ui(ui, |ui| {
                    for mode in [SearchMode::EnterCode, SearchMode::SelectFromDropdown] {
                        ui.selectable_value(&mut self.search_mode, mode, mode.label());
                    }
                });

            match self.search_mode {
                SearchMode::EnterCode => {
                    ui.horizontal(|ui| {
                        ui.label("Country code:");
                        ui.text_edit_singleline(&mut self.code_input)
                            .on_hover_text("Example: 'IT', 'USA', 'CA'");
                    });
                }
                SearchMode::SelectFromDropdown => {
                    if !self.countries_requested {
                        self.load_countries();
                    }
                    if self.countries_loading {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label("Loading countries...");
                        });
                    } else if self.countries.is_empty() {
                        if ui
                            .add_enabled(self.backend.is_some(), egui::Button::new("Reload countries"))
                            .clicked()
                        {
                            self.load_countries();
                        }
                    } else {
                        egui::ComboBox::from_label("Select a country")
                            .selected_text(&self.selected_country)
                            .height(300.0)
                            .show_ui(ui, |ui| {
                                for name in &self.countries {
                                    ui.selectable_value(
                                        &mut self.selected_country,
                                        name.clone(),
                                        name,
                                    );
                                }
                            });
                    }
                }
            }
        });

        ui.add_space(10.0);

        ui.group(|ui| {
            ui.label("What results would you like to see?");
            for (i, metric) in Metric::ALL.iter().enumerate() {
                ui.checkbox(&mut self.metrics[i], metric.label());
            }
            ui.horizontal(|ui| {
                ui.label("Number format:");
                egui::ComboBox::from_id_salt("locale")
                    .selected_text(&self.locale)
                    .show_ui(ui, |ui| {
                        for (tag, name) in [
                            ("en", "English (en)"),
                            ("de", "German (de)"),
                            ("fr", "French (fr)"),
                            ("es", "Spanish (es)"),
                            ("it", "Italian (it)"),
                        ] {
                            ui.selectable_value(&mut self.locale, tag.to_string(), name);
                        }
                    });
            });
        });

        ui.add_space(15.0);

        ui.horizontal(|ui| {
            if ui
                .add_enabled(!self.is_loading, egui::Button::new("Get Report"))
                .clicked()
            {
                self.start_report();
            }
            if self.is_loading {
                ui.spinner();
                ui.label("Processing...");
            }
        });

        ui.add_space(10.0);
        self.show_messages(ui);

        let mut export = None;
        if let Some(report) = &self.report
            && report.outcome.has_statistics()
        {
            ui.add_space(10.0);
            ui.heading(format!("COVID-19 Report for {}:", report.query.identifier()));
            egui::Grid::new("report_grid")
                .striped(true)
                .num_columns(2)
                .show(ui, |ui| {
                    for (label, value) in format::report_rows(report, &self.locale) {
                        ui.label(label);
                        ui.label(value);
                        ui.end_row();
                    }
                });

            if let Some(c) = report.coordinate {
                ui.add_space(5.0);
                ui.label(format!("Location: {}", c));
                ui.hyperlink_to("Open map", c.map_url());
            }

            ui.add_space(5.0);
            ui.horizontal(|ui| {
                if ui.button("Export CSV").clicked() {
                    export = Some(ExportFormat::Csv);
                }
                if ui.button("Export JSON").clicked() {
                    export = Some(ExportFormat::Json);
                }
            });
        }
        if let Some(kind) = export {
            self.export_report(kind);
        }
    }

    fn export_report(&mut self, export: ExportFormat) {
        let Some(report) = self.report.as_ref() else {
            return;
        };
        let (name, ext) = match export {
            ExportFormat::Csv => ("CSV", "csv"),
            ExportFormat::Json => ("JSON", "json"),
        };
        let Some(path) = rfd::FileDialog::new()
            .set_directory(default_dir())
            .set_file_name(format!("covid_report.{}", ext))
            .add_filter(name, &[ext])
            .save_file()
        else {
            return;
        };
        let saved = match export {
            ExportFormat::Csv => storage::save_report_csv(report, &path),
            ExportFormat::Json => storage::save_report_json(report, &path),
        };
        match saved {
            Ok(()) => self.status_message = format!("Saved report to {}", path.display()),
            Err(err) => self.error_message = format!("Failed to save {}: {:#}", name, err),
        }
    }

    fn show_top_ten(&mut self, ui: &mut egui::Ui) {
        let rows = dashboard::top_ten();
        let max = rows.iter().map(|r| r.cases).max().unwrap_or(1).max(1) as f32;

        ui.horizontal(|ui| {
            ui.label("Select Chart Type:");
            for kind in [ChartKind::Bar, ChartKind::Line] {
                ui.radio_value(&mut self.chart_kind, kind, kind.label());
            }
        });
        if self.chart_kind == ChartKind::Bar {
            ui.horizontal(|ui| {
                ui.label("Pick a color for the bar graph:");
                ui.color_edit_button_srgb(&mut self.bar_color);
            });
        }

        ui.add_space(10.0);
        ui.heading(viz::CHART_TITLE);
        let [r, g, b] = self.bar_color;
        let fill = egui::Color32::from_rgb(r, g, b);
        match self.chart_kind {
            ChartKind::Bar => {
                egui::Grid::new("top_ten_grid")
                    .striped(true)
                    .num_columns(3)
                    .show(ui, |ui| {
                        for row in &rows {
                            ui.label(&row.country);
                            ui.label(format::format_count(row.cases, &self.locale));
                            ui.add(
                                egui::ProgressBar::new(row.cases as f32 / max)
                                    .desired_width(320.0)
                                    .fill(fill)
                                    .text(format::format_compact(row.cases as f64)),
                            );
                            ui.end_row();
                        }
                    });
            }
            ChartKind::Line => {
                draw_line_chart(ui, &rows, max, fill);
                ui.add_space(5.0);
                egui::Grid::new("top_ten_grid")
                    .striped(true)
                    .num_columns(2)
                    .show(ui, |ui| {
                        for row in &rows {
                            ui.label(&row.country);
                            ui.label(format::format_count(row.cases, &self.locale));
                            ui.end_row();
                        }
                    });
            }
        }

        ui.add_space(10.0);
        if ui.button("Export chart").clicked()
            && let Some(path) = rfd::FileDialog::new()
                .set_directory(default_dir())
                .set_file_name("covid_top10.svg")
                .add_filter("SVG", &["svg"])
                .add_filter("PNG (no text labels)", &["png"])
                .save_file()
        {
            let color = RGBColor(r, g, b);
            match viz::plot_top_ten(&rows, &path, 1000, 600, self.chart_kind, color) {
                Ok(()) => self.status_message = format!("Wrote chart to {}", path.display()),
                Err(err) => self.error_message = format!("Failed to create chart: {:#}", err),
            }
        }
        self.show_messages(ui);
    }

    fn show_messages(&self, ui: &mut egui::Ui) {
        if !self.status_message.is_empty() {
            ui.colored_label(egui::Color32::DARK_GREEN, &self.status_message);
        }
        if !self.error_message.is_empty() {
            ui.colored_label(egui::Color32::RED, &self.error_message);
        }
    }
}

impl eframe::App for CovidApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for completed background operations
        self.check_background_results();

        // Request repaint if loading (for spinner animation)
        if self.is_loading || self.countries_loading {
            ctx.request_repaint();
        }

        egui::SidePanel::left("navigation").show(ctx, |ui| {
            ui.heading("More Information");
            ui.add_space(5.0);
            for page in Page::ALL {
                if ui
                    .selectable_value(&mut self.page, page, page.title())
                    .clicked()
                {
                    self.status_message.clear();
                    self.error_message.clear();
                }
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading(dashboard::APP_TITLE);
                ui.label("COVID-19 statistics by country");
                ui.add_space(10.0);

                match self.page {
                    Page::Homepage => self.show_homepage(ui),
                    Page::SearchByCountry => self.show_search(ui),
                    Page::TopTenChart => self.show_top_ten(ui),
                }
            });
        });
    }
}

/// Line series with point markers, scaled like the exported chart.
fn draw_line_chart(ui: &mut egui::Ui, rows: &[CountryCases], max: f32, color: egui::Color32) {
    let size = egui::vec2(ui.available_width().min(720.0), 280.0);
    let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
    let plot = response.rect.shrink(20.0);
    let text_color = ui.visuals().text_color();
    painter.rect_stroke(plot, 0.0, egui::Stroke::new(1.0, egui::Color32::GRAY));

    let y_max = max * 1.1;
    let points: Vec<egui::Pos2> = dashboard::line_positions(rows)
        .into_iter()
        .map(|(fx, fy)| egui::pos2(plot.left() + plot.width() * fx, plot.bottom() - plot.height() * fy))
        .collect();

    painter.add(egui::Shape::line(points.clone(), egui::Stroke::new(2.0, color)));
    for (p, r) in points.iter().zip(rows) {
        painter.circle_filled(*p, 4.0, color);
        painter.text(
            egui::pos2(p.x, plot.bottom() + 2.0),
            egui::Align2::CENTER_TOP,
            &r.country,
            egui::FontId::proportional(11.0),
            text_color,
        );
    }
    painter.text(
        plot.left_top() + egui::vec2(4.0, 4.0),
        egui::Align2::LEFT_TOP,
        format::format_compact(y_max as f64),
        egui::FontId::proportional(11.0),
        text_color,
    );
}

/// Start dialogs in the user's home directory.
fn default_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}
