use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use covid_report::api::{GeocodingClient, StatisticsClient};
use covid_report::cache::CountryListCache;
use covid_report::dashboard::{self, ChartKind};
use covid_report::{Config, Metric, Outcome, ReportService, format, resolver, storage, viz};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "covid-report",
    version,
    about = "COVID-19 reports by country: statistics, map position, top-10 chart"
)]
struct Cli {
    /// Log verbosity (RUST_LOG, when set, takes precedence).
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    log_level: LogLevel,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the welcome page (and optionally health tips).
    Home(HomeArgs),
    /// Fetch a report for one country (and optionally save it).
    Report(ReportArgs),
    /// List the countries the statistics service knows.
    Countries(CountriesArgs),
    /// Show the top-10 countries by cases (and optionally draw a chart).
    Top10(Top10Args),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ChartArg {
    Bar,
    Line,
}

impl From<ChartArg> for ChartKind {
    fn from(c: ChartArg) -> Self {
        match c {
            ChartArg::Bar => ChartKind::Bar,
            ChartArg::Line => ChartKind::Line,
        }
    }
}

#[derive(Args, Debug)]
struct HomeArgs {
    /// Include the health tips.
    #[arg(long, default_value_t = false)]
    tips: bool,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Country code (with --code, e.g. IT, USA, CA) or country name (e.g. Italy)
    identifier: String,
    /// Treat IDENTIFIER as a country code instead of a name.
    #[arg(long, default_value_t = false)]
    code: bool,
    /// Metrics to show, separated by comma or semicolon (deaths,confirmed,recovered,critical). Default: all.
    #[arg(short, long)]
    metrics: Option<String>,
    /// Locale for number formatting (en, de, fr, es, it, pt, nl).
    #[arg(long, default_value = "en")]
    locale: String,
    /// Save the report to file (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
}

#[derive(Args, Debug)]
struct CountriesArgs {
    /// Only list names containing this text (case-insensitive).
    #[arg(short, long)]
    filter: Option<String>,
}

#[derive(Args, Debug)]
struct Top10Args {
    /// Create a chart at the given path (.svg or .png). PNG output has no text labels; use .svg for a labelled chart.
    #[arg(long)]
    plot: Option<PathBuf>,
    /// Chart type.
    #[arg(long, value_enum, default_value_t = ChartArg::Bar)]
    kind: ChartArg,
    /// Series colour as #rrggbb.
    #[arg(long, default_value = viz::DEFAULT_BAR_COLOR)]
    color: String,
    /// Width of the plot (default 1000).
    #[arg(long, default_value_t = 1000)]
    width: u32,
    /// Height of the plot (default 600).
    #[arg(long, default_value_t = 600)]
    height: u32,
    /// Locale for number formatting.
    #[arg(long, default_value = "en")]
    locale: String,
}

fn parse_list(s: &str) -> Vec<String> {
    s.split([',', ';'])
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

fn parse_metrics(s: Option<&str>) -> Result<Vec<Metric>> {
    match s {
        None => Ok(Metric::ALL.to_vec()),
        Some(s) => parse_list(s)
            .iter()
            .map(|m| m.parse::<Metric>().map_err(anyhow::Error::msg))
            .collect(),
    }
}

fn init_logging(level: LogLevel) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level.into());
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    builder.init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.log_level);
    match cli.cmd {
        Command::Home(args) => cmd_home(args),
        Command::Report(args) => cmd_report(args),
        Command::Countries(args) => cmd_countries(args),
        Command::Top10(args) => cmd_top10(args),
    }
}

fn cmd_home(args: HomeArgs) -> Result<ExitCode> {
    println!("{}", dashboard::APP_TITLE);
    for line in dashboard::homepage_lines(args.tips) {
        println!("{}", line);
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_report(args: ReportArgs) -> Result<ExitCode> {
    // Validate before touching configuration or the network.
    resolver::resolve(&args.identifier, args.code)?;
    let metrics = parse_metrics(args.metrics.as_deref())?;

    let cfg = Config::from_env()?;
    let service = ReportService::new(StatisticsClient::new(&cfg)?, GeocodingClient::new(&cfg)?);
    let report = service.generate(&args.identifier, args.code, &metrics)?;

    if report.outcome.has_statistics() {
        for line in format::report_lines(&report, &args.locale) {
            println!("{}", line);
        }
    } else {
        eprintln!("{}", format::outcome_message(&report.outcome));
    }

    if let Some(path) = args.out.as_ref() {
        let fmt = match args.format {
            Some(OutFormat::Csv) => "csv",
            Some(OutFormat::Json) => "json",
            None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
        }
        .to_ascii_lowercase();
        match fmt.as_str() {
            "csv" => storage::save_report_csv(&report, path)?,
            "json" => storage::save_report_json(&report, path)?,
            other => anyhow::bail!("unsupported format: {}", other),
        }
        eprintln!("Saved report to {}", path.display());
    }

    Ok(if report.outcome == Outcome::Success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn cmd_countries(args: CountriesArgs) -> Result<ExitCode> {
    let cfg = Config::from_env()?;
    let client = StatisticsClient::new(&cfg)?;
    let cache = CountryListCache::new(cfg.country_ttl);
    let countries = cache
        .get_or_refresh(|| client.fetch_countries())
        .context("load country list")?;

    let needle = args.filter.as_deref().map(str::to_lowercase);
    for c in countries.iter() {
        if let Some(n) = &needle
            && !c.name.to_lowercase().contains(n.as_str())
        {
            continue;
        }
        let codes: Vec<&str> = [c.alpha2.as_deref(), c.alpha3.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if codes.is_empty() {
            println!("{}", c.name);
        } else {
            println!("{} ({})", c.name, codes.join("/"));
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_top10(args: Top10Args) -> Result<ExitCode> {
    let rows = dashboard::top_ten();
    let width = rows.iter().map(|r| r.country.len()).max().unwrap_or(0);
    for (i, r) in rows.iter().enumerate() {
        println!(
            "{:>2}. {:<width$}  {}",
            i + 1,
            r.country,
            format::format_count(r.cases, &args.locale),
            width = width
        );
    }

    if let Some(plot_path) = args.plot.as_ref() {
        let color = viz::parse_hex_color(&args.color)?;
        viz::plot_top_ten(
            &rows,
            plot_path,
            args.width,
            args.height,
            args.kind.into(),
            color,
        )?;
        eprintln!("Wrote plot to {}", plot_path.display());
    }
    Ok(ExitCode::SUCCESS)
}
