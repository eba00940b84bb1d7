//! Combined PDF output: every page of a plan, with labels and calibration reference.

use anyhow::{Context, Result};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::*;
use ringmark::layout::PageSize;
use ringmark::render::{self, Shape};
use ringmark::Prepared;

const LABEL_FONT_PT: f32 = 6.0;
const PT_TO_MM: f64 = 25.4 / 72.0;
/// Outline resolution for arcs and discs.
const STEPS_PER_DEGREE: f64 = 1.0;
/// Calibration label sits this many calibration dot radii below the dots.
const CAL_LABEL_OFFSET_MULTIPLIER: f64 = 2.5;

/// Write all pages of `prepared` into one PDF at `path`.
pub fn write_sheet_pdf(prepared: &Prepared, title: &str, path: &str) -> Result<()> {
    let page = prepared.plan.page;
    let (doc, first_page, first_layer) = PdfDocument::new(
        title,
        Mm(page.width as f32),
        Mm(page.height as f32),
        "Page 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .context("loading Helvetica")?;

    for (idx, plan_page) in prepared.plan.pages.iter().enumerate() {
        let layer = if idx == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (p, l) = doc.add_page(
                Mm(page.width as f32),
                Mm(page.height as f32),
                format!("Page {}", idx + 1),
            );
            doc.get_page(p).get_layer(l)
        };
        layer.set_fill_color(black());

        let geometry = &prepared.geometry;
        for placement in &plan_page.placements {
            // Plan coordinates are y-down; PDF is y-up.
            let cy = page.height - placement.y;
            for shape in render::marker_shapes(geometry, placement.code, placement.x, cy) {
                fill_shape(&layer, &shape);
            }
            let label = placement.number.to_string();
            let offset = geometry.label_offset();
            draw_text_top_right(&layer, &font, &label, placement.x + offset, cy + offset);
        }

        if let Some(origin) = plan_page.calibration {
            let config = &prepared.config;
            let origin = ringmark::layout::Point::new(origin.x, page.height - origin.y);
            let dots =
                render::calibration_shapes(origin, config.cal_dot_radius, config.cal_spacing);
            for shape in &dots {
                fill_shape(&layer, shape);
            }
            draw_text_top_center(
                &layer,
                &font,
                &config.cal_label,
                origin.x + config.cal_spacing / 2.0,
                origin.y - config.cal_dot_radius * CAL_LABEL_OFFSET_MULTIPLIER,
            );
        }
    }

    doc.save(&mut std::io::BufWriter::new(
        std::fs::File::create(path).with_context(|| format!("creating {path}"))?,
    ))
    .with_context(|| format!("writing PDF to {path}"))?;

    Ok(())
}

/// Page size as printed, for messages.
pub fn describe_page(page: PageSize) -> String {
    format!("{:.1}x{:.1}mm", page.width, page.height)
}

fn black() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

fn fill_shape(layer: &PdfLayerReference, shape: &Shape) {
    let ring: Vec<(Point, bool)> = shape
        .outline(STEPS_PER_DEGREE)
        .into_iter()
        .map(|(x, y)| (Point::new(Mm(x as f32), Mm(y as f32)), false))
        .collect();
    layer.add_polygon(Polygon {
        rings: vec![ring],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
}

/// Rough Helvetica advance; labels are short digits so this is close enough.
fn approx_text_width_mm(text: &str) -> f64 {
    text.chars().count() as f64 * LABEL_FONT_PT as f64 * 0.55 * PT_TO_MM
}

fn cap_height_mm() -> f64 {
    LABEL_FONT_PT as f64 * 0.72 * PT_TO_MM
}

/// Draw text whose top-right corner sits at (x, y).
fn draw_text_top_right(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    text: &str,
    x: f64,
    y: f64,
) {
    let left = x - approx_text_width_mm(text);
    let baseline = y - cap_height_mm();
    layer.use_text(text, LABEL_FONT_PT, Mm(left as f32), Mm(baseline as f32), font);
}

/// Draw text horizontally centered on `x` with its top at `y`.
fn draw_text_top_center(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    text: &str,
    x: f64,
    y: f64,
) {
    let left = x - approx_text_width_mm(text) / 2.0;
    let baseline = y - cap_height_mm();
    layer.use_text(text, LABEL_FONT_PT, Mm(left as f32), Mm(baseline as f32), font);
}
