use plotters::coord::Shift;
use plotters::element::{Circle, PathElement, Polygon, Text};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontStyle, register_font};
use std::error::Error;
use tracing::{info, warn};

use crate::error::{ReportError, ReportResult};
use crate::models::time_entry::EmployeeSummary;

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;

pub const CHART_TITLE: &str = "Employee Time Distribution";

/// 0 degrees points right; angles grow clockwise on screen.
pub const START_ANGLE: f64 = 0.0;
pub const ANGLE_SPAN: f64 = 360.0;

/// Labels sit on each slice bisector at this fraction of the radius.
pub const INSIDE_LABEL_POSITION: f64 = 0.8;

const TITLE_PADDING: i32 = 20;
const TITLE_SIZE: i32 = 28;
const LABEL_SIZE: i32 = 14;
const FONT_FAMILY: &str = "sans-serif";
const FONT_BYTES: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

const NO_DATA_FILL: RGBColor = RGBColor(0xdd, 0xdd, 0xdd);

const PALETTE: [RGBColor; 10] = [
    RGBColor(0x4e, 0x79, 0xa7),
    RGBColor(0xf2, 0x8e, 0x2b),
    RGBColor(0xe1, 0x57, 0x59),
    RGBColor(0x76, 0xb7, 0xb2),
    RGBColor(0x59, 0xa1, 0x4f),
    RGBColor(0xed, 0xc9, 0x48),
    RGBColor(0xb0, 0x7a, 0xa1),
    RGBColor(0xff, 0x9d, 0xa7),
    RGBColor(0x9c, 0x75, 0x5f),
    RGBColor(0xba, 0xb0, 0xac),
];

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    /// Share of all hours, 0 to 100.
    pub percentage: f64,
    pub start_angle: f64,
    pub sweep_angle: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    pub title: String,
    pub total_hours: f64,
    pub slices: Vec<PieSlice>,
}

impl ChartModel {
    /// False when no slice would be drawn as a wedge.
    pub fn has_data(&self) -> bool {
        self.slices.iter().any(|slice| slice.sweep_angle > 0.0)
    }
}

/// Builds one slice per employee, in summary order.
///
/// When the hours add up to zero every percentage is 0 and no wedge gets a
/// sweep. Employees with a non-positive total get no sweep either; the
/// remaining wedges split the full circle between them.
pub fn build_chart_model(summary: &[EmployeeSummary]) -> ChartModel {
    let total_hours: f64 = summary.iter().map(|s| s.total_hours).sum();
    let drawable_hours: f64 = summary
        .iter()
        .map(|s| s.total_hours)
        .filter(|hours| *hours > 0.0)
        .sum();

    if total_hours == 0.0 && !summary.is_empty() {
        warn!("Total hours is zero, all slice percentages set to 0");
    }

    let mut angle = START_ANGLE;
    let slices = summary
        .iter()
        .map(|employee| {
            let percentage = if total_hours == 0.0 {
                0.0
            } else {
                (employee.total_hours / total_hours) * 100.0
            };
            let drawable = total_hours != 0.0 && drawable_hours > 0.0;
            let sweep_angle = if drawable && employee.total_hours > 0.0 {
                employee.total_hours / drawable_hours * ANGLE_SPAN
            } else {
                0.0
            };

            let slice = PieSlice {
                label: employee.name.clone(),
                percentage,
                start_angle: angle,
                sweep_angle,
            };
            angle += sweep_angle;
            slice
        })
        .collect();

    ChartModel {
        title: CHART_TITLE.to_string(),
        total_hours,
        slices,
    }
}

/// Draws the model onto a white canvas and returns it PNG encoded.
pub fn rasterize(model: &ChartModel, width: u32, height: u32) -> ReportResult<Vec<u8>> {
    if width == 0 || height == 0 {
        return Err(ReportError::Render(format!(
            "invalid chart size {}x{}",
            width, height
        )));
    }

    register_font(FONT_FAMILY, FontStyle::Normal, FONT_BYTES)
        .map_err(|_| ReportError::Render("failed to load chart font".to_string()))?;

    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw_chart(&root, model, width, height)
            .map_err(|e| ReportError::Render(format!("failed to draw chart: {}", e)))?;
        root.present()
            .map_err(|e| ReportError::Render(format!("failed to draw chart: {}", e)))?;
    }

    let png_bytes = encode_png(&buffer, width, height)?;
    info!(
        "Rasterized chart with {} slices to {}x{} PNG, {} bytes",
        model.slices.len(),
        width,
        height,
        png_bytes.len()
    );
    Ok(png_bytes)
}

fn draw_chart(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    model: &ChartModel,
    width: u32,
    height: u32,
) -> Result<(), Box<dyn Error>> {
    root.fill(&WHITE)?;

    let centered = Pos::new(HPos::Center, VPos::Center);
    let title_style = (FONT_FAMILY, TITLE_SIZE)
        .into_font()
        .color(&BLACK)
        .pos(centered);
    let title_y = TITLE_PADDING + TITLE_SIZE / 2;
    root.draw(&Text::new(
        model.title.as_str(),
        (width as i32 / 2, title_y),
        title_style,
    ))?;

    let top = title_y + TITLE_SIZE / 2 + TITLE_PADDING;
    let plot_height = (height as i32 - top).max(0);
    let center = (width as i32 / 2, top + plot_height / 2);
    let radius = (width.min(plot_height as u32) as f64 / 2.0 - TITLE_PADDING as f64).max(1.0);

    let label_style = (FONT_FAMILY, LABEL_SIZE)
        .into_font()
        .color(&BLACK)
        .pos(centered);

    if !model.has_data() {
        root.draw(&Circle::new(center, radius as i32, NO_DATA_FILL.filled()))?;
        root.draw(&Text::new("No data", center, label_style))?;
        return Ok(());
    }

    let drawn = model.slices.iter().enumerate().filter(|(_, s)| s.sweep_angle > 0.0);

    for (index, slice) in drawn.clone() {
        let outline = wedge_points(center, radius, slice.start_angle, slice.sweep_angle);
        let color = PALETTE[index % PALETTE.len()];
        root.draw(&Polygon::new(outline.clone(), color.filled()))?;
        root.draw(&PathElement::new(outline, BLACK.stroke_width(1)))?;
    }

    for (_, slice) in drawn {
        let bisector = slice.start_angle + slice.sweep_angle / 2.0;
        let (x, y) = point_on_circle(center, radius * INSIDE_LABEL_POSITION, bisector);
        let line_gap = LABEL_SIZE / 2 + 1;
        root.draw(&Text::new(
            slice.label.as_str(),
            (x, y - line_gap),
            label_style.clone(),
        ))?;
        root.draw(&Text::new(
            format!("{:.1}%", slice.percentage),
            (x, y + line_gap),
            label_style.clone(),
        ))?;
    }

    Ok(())
}

/// Closed outline of a wedge: centre, arc points at most one degree apart,
/// back to centre.
fn wedge_points(center: (i32, i32), radius: f64, start: f64, sweep: f64) -> Vec<(i32, i32)> {
    let steps = sweep.ceil().max(1.0) as usize;
    let mut points = Vec::with_capacity(steps + 3);
    points.push(center);
    for step in 0..=steps {
        let angle = start + sweep * step as f64 / steps as f64;
        points.push(point_on_circle(center, radius, angle));
    }
    points.push(center);
    points
}

fn point_on_circle(center: (i32, i32), radius: f64, degrees: f64) -> (i32, i32) {
    let radians = degrees.to_radians();
    (
        center.0 + (radius * radians.cos()).round() as i32,
        center.1 + (radius * radians.sin()).round() as i32,
    )
}

fn encode_png(buffer: &[u8], width: u32, height: u32) -> ReportResult<Vec<u8>> {
    let mut png_bytes = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_bytes, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder
            .write_header()
            .map_err(|e| ReportError::Render(format!("failed to encode PNG: {}", e)))?;
        writer
            .write_image_data(buffer)
            .map_err(|e| ReportError::Render(format!("failed to encode PNG: {}", e)))?;
        writer
            .finish()
            .map_err(|e| ReportError::Render(format!("failed to encode PNG: {}", e)))?;
    }
    Ok(png_bytes)
}
