//! Top-10 chart rendering to **SVG** or **PNG**.
//!
//! - Bar graph or line chart over a categorical country axis
//! - Compact Y tick labels (`40.1M`, `900.0K`), axis from zero to 110% of the maximum
//! - Single user-picked colour (`#rrggbb`)

use crate::dashboard::{ChartKind, CountryCases};
use crate::format::format_compact;
use anyhow::{Result, anyhow, bail};
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use std::path::Path;

pub const DEFAULT_BAR_COLOR: &str = "#ff0000";
pub const CHART_TITLE: &str = "Top 10 Countries by COVID-19 Cases";

/// Parse `#rrggbb` (leading `#` optional).
pub fn parse_hex_color(s: &str) -> Result<RGBColor> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        bail!("invalid colour {:?}, expected #rrggbb", s);
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
    Ok(RGBColor(byte(0)?, byte(2)?, byte(4)?))
}

/// Render the chart. SVG when `out_path` ends in `.svg`, PNG otherwise.
///
/// PNG output carries shapes only; titles and tick labels need SVG.
pub fn plot_top_ten<P: AsRef<Path>>(
    rows: &[CountryCases],
    out_path: P,
    width: u32,
    height: u32,
    kind: ChartKind,
    color: RGBColor,
) -> Result<()> {
    if rows.is_empty() {
        return Err(anyhow!("no data to plot"));
    }

    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();

    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_chart(root, rows, kind, color)?;
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_chart(root, rows, kind, color)?;
    }
    Ok(())
}

/// Helper that draws to any Plotters backend.
fn draw_chart<DB>(
    root: DrawingArea<DB, Shift>,
    rows: &[CountryCases],
    kind: ChartKind,
    color: RGBColor,
) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    let n = rows.len() as i32;
    let max = rows.iter().map(|r| r.cases).max().unwrap_or(0) as f64;
    let y_max = if max > 0.0 { max * 1.1 } else { 1.0 };

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(CHART_TITLE, ("sans-serif", 24))
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 60)
        .build_cartesian_2d((0..n).into_segmented(), 0f64..y_max)
        .map_err(|e| anyhow!("{:?}", e))?;

    let x_label_fmt = |v: &SegmentValue<i32>| match v {
        SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => usize::try_from(*i)
            .ok()
            .and_then(|i| rows.get(i))
            .map(|r| r.country.clone())
            .unwrap_or_default(),
        SegmentValue::Last => String::new(),
    };
    let y_label_fmt = |v: &f64| format_compact(*v);

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Country")
        .y_desc("Number of COVID-19 Cases")
        .x_labels(rows.len() + 1)
        .y_labels(10)
        .x_label_formatter(&x_label_fmt)
        .y_label_formatter(&y_label_fmt)
        .label_style(("sans-serif", 14))
        .axis_desc_style(("sans-serif", 16))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    match kind {
        ChartKind::Bar => {
            chart
                .draw_series(rows.iter().enumerate().map(|(i, r)| {
                    let i = i as i32;
                    let mut bar = Rectangle::new(
                        [
                            (SegmentValue::Exact(i), 0.0),
                            (SegmentValue::Exact(i + 1), r.cases as f64),
                        ],
                        color.filled(),
                    );
                    bar.set_margin(0, 0, 5, 5);
                    bar
                }))
                .map_err(|e| anyhow!("{:?}", e))?;
        }
        ChartKind::Line => {
            let points: Vec<(SegmentValue<i32>, f64)> = rows
                .iter()
                .enumerate()
                .map(|(i, r)| (SegmentValue::CenterOf(i as i32), r.cases as f64))
                .collect();
            chart
                .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))
                .map_err(|e| anyhow!("{:?}", e))?;
            chart
                .draw_series(points.into_iter().map(|p| Circle::new(p, 4, color.filled())))
                .map_err(|e| anyhow!("{:?}", e))?;
        }
    }

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colours() {
        assert_eq!(parse_hex_color("#ff0000").unwrap(), RGBColor(255, 0, 0));
        assert_eq!(parse_hex_color("4472C4").unwrap(), RGBColor(68, 114, 196));
        assert!(parse_hex_color("#fff").is_err());
        assert!(parse_hex_color("#gg0000").is_err());
    }

    #[test]
    fn empty_rows_are_rejected() {
        let path = std::env::temp_dir().join("covid_report_empty_chart.svg");
        assert!(plot_top_ten(&[], &path, 400, 300, ChartKind::Bar, RED).is_err());
    }
}
