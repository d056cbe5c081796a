/// Chart models and PNG rendering
///
/// Pipelines build plain chart descriptions ([`BarChart`], [`LineChart`]);
/// rendering them to pixels is a separate step so the descriptions can be
/// inspected without a font stack.
use anyhow::{anyhow, Result};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

const FONT: &str = "sans-serif";
const LABEL_FONT_SIZE: u32 = 14;
const MIN_LABEL_AREA: u32 = 120;
const MAX_LABEL_AREA: u32 = 420;

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    /// Drawn with a bold label
    pub emphasized: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarPalette {
    Viridis,
    Plasma,
}

impl BarPalette {
    fn stops(&self) -> &'static [(u8, u8, u8)] {
        match self {
            BarPalette::Viridis => &[
                (68, 1, 84),
                (59, 82, 139),
                (33, 145, 140),
                (94, 201, 98),
                (253, 231, 37),
            ],
            BarPalette::Plasma => &[
                (13, 8, 135),
                (126, 3, 168),
                (204, 71, 120),
                (248, 149, 64),
                (240, 249, 33),
            ],
        }
    }

    /// Color at position `t` in `[0, 1]`, linearly interpolated between stops
    pub fn color_at(&self, t: f64) -> RGBColor {
        let stops = self.stops();
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let scaled = t * (stops.len() - 1) as f64;
        let lower = (scaled.floor() as usize).min(stops.len() - 2);
        let frac = scaled - lower as f64;

        let (r0, g0, b0) = stops[lower];
        let (r1, g1, b1) = stops[lower + 1];
        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;

        RGBColor(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
    }

    /// Color for bar `idx` of `count`
    pub fn pick(&self, idx: usize, count: usize) -> RGBColor {
        if count <= 1 {
            return self.color_at(0.0);
        }
        self.color_at(idx as f64 / (count - 1) as f64)
    }
}

/// Horizontal bar chart; bars are drawn top to bottom in order
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub bars: Vec<Bar>,
    pub palette: BarPalette,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    /// `(key_count, value)`, ascending by key count
    pub points: Vec<(u64, f64)>,
    pub emphasized: bool,
}

/// Line chart over a logarithmic key-count axis
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    Bar(BarChart),
    Line(LineChart),
}

impl Chart {
    pub fn title(&self) -> &str {
        match self {
            Chart::Bar(c) => &c.title,
            Chart::Line(c) => &c.title,
        }
    }
}

/// Render a chart to a PNG file of `size` pixels
pub fn render_png(chart: &Chart, path: &Path, size: (u32, u32)) -> Result<()> {
    match chart {
        Chart::Bar(bar) => draw_bar_chart(bar, path, size),
        Chart::Line(line) => draw_line_chart(line, path, size),
    }
}

fn label_area_width(bars: &[Bar]) -> u32 {
    let longest = bars.iter().map(|b| b.label.chars().count()).max().unwrap_or(0) as u32;
    (longest * LABEL_FONT_SIZE * 6 / 10 + 60).clamp(MIN_LABEL_AREA, MAX_LABEL_AREA)
}

fn value_ceiling(max: f64) -> f64 {
    if max.is_finite() && max > 0.0 {
        max * 1.05
    } else {
        1.0
    }
}

fn draw_bar_chart(chart: &BarChart, path: &Path, size: (u32, u32)) -> Result<()> {
    if chart.bars.is_empty() {
        return Err(anyhow!("Bar chart {:?} has no bars", chart.title));
    }

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let n = chart.bars.len();
    let max = chart.bars.iter().map(|b| b.value).fold(0.0, f64::max);
    let label_width = label_area_width(&chart.bars);

    let mut ctx = ChartBuilder::on(&root)
        .caption(&chart.title, (FONT, 24))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(label_width)
        .build_cartesian_2d(0f64..value_ceiling(max), -0.5f64..(n as f64 - 0.5))?;

    ctx.configure_mesh()
        .disable_y_mesh()
        .y_labels(n)
        .y_label_formatter(&|_| String::new())
        .x_desc(chart.x_desc.as_str())
        .y_desc(chart.y_desc.as_str())
        .axis_desc_style((FONT, 16))
        .draw()?;

    // First bar at the top
    let row_y = |idx: usize| (n - 1 - idx) as f64;

    ctx.draw_series(chart.bars.iter().enumerate().map(|(idx, bar)| {
        let y = row_y(idx);
        let color = chart.palette.pick(idx, n);
        Rectangle::new([(0.0, y - 0.4), (bar.value.max(0.0), y + 0.4)], color.filled())
    }))?;

    for (idx, bar) in chart.bars.iter().enumerate() {
        let (x, y) = ctx.backend_coord(&(0.0, row_y(idx)));
        let font = if bar.emphasized {
            (FONT, LABEL_FONT_SIZE).into_font().style(FontStyle::Bold)
        } else {
            (FONT, LABEL_FONT_SIZE).into_font()
        };
        let style = TextStyle::from(font)
            .color(&BLACK)
            .pos(Pos::new(HPos::Right, VPos::Center));
        root.draw(&Text::new(bar.label.clone(), (x - 8, y), style))?;
    }

    root.present()?;
    Ok(())
}

fn draw_line_chart(chart: &LineChart, path: &Path, size: (u32, u32)) -> Result<()> {
    let points = || chart.series.iter().flat_map(|s| s.points.iter());
    if points().next().is_none() {
        return Err(anyhow!("Line chart {:?} has no points", chart.title));
    }

    let x_min = points().map(|&(k, _)| k.max(1)).min().unwrap_or(1) as f64;
    let x_max = points().map(|&(k, _)| k.max(1)).max().unwrap_or(1) as f64;
    let y_max = points().map(|&(_, v)| v).fold(0.0, f64::max);

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut ctx = ChartBuilder::on(&root)
        .caption(&chart.title, (FONT, 24))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(80)
        .build_cartesian_2d((x_min / 2.0..x_max * 2.0).log_scale(), 0f64..value_ceiling(y_max))?;

    ctx.configure_mesh()
        .x_desc(chart.x_desc.as_str())
        .y_desc(chart.y_desc.as_str())
        .axis_desc_style((FONT, 16))
        .draw()?;

    for (idx, series) in chart.series.iter().enumerate() {
        let color = Palette99::pick(idx).mix(0.9);
        let width = if series.emphasized { 4 } else { 2 };
        let coords: Vec<(f64, f64)> = series
            .points
            .iter()
            .map(|&(k, v)| (k.max(1) as f64, v))
            .collect();

        ctx.draw_series(LineSeries::new(coords.clone(), color.stroke_width(width)))?
            .label(series.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(width)));

        ctx.draw_series(coords.into_iter().map(|c| Circle::new(c, 3, color.filled())))?;
    }

    ctx.configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font((FONT, LABEL_FONT_SIZE))
        .draw()?;

    root.present()?;
    Ok(())
}
