//! Latency bar chart of a diagnostic report, written as a PDF.
//!
//! One horizontal bar per endpoint that replied; endpoints without a reply
//! are left out. Rows continue on extra pages when one page is full.

use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use netdiag_common::report::DiagnosticReport;
use printpdf::{BuiltinFont, Color, Mm, PdfDocument, Rect, Rgb};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const TITLE_Y: f32 = 272.0;
const FIRST_ROW_Y: f32 = 255.0;
const ROW_HEIGHT: f32 = 6.0;
const BAR_HEIGHT: f32 = 4.0;
const LABEL_X: f32 = MARGIN;
const BAR_X: f32 = 70.0;
const BAR_MAX_WIDTH: f32 = 100.0;
const MIN_BAR_WIDTH: f32 = 0.5;
const FONT_SIZE_TITLE: f32 = 16.0;
const FONT_SIZE_BODY: f32 = 9.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub latency_ms: f64,
}

/// Bars in report order, skipping rows without a latency.
pub fn bars(report: &DiagnosticReport) -> Vec<Bar> {
    report
        .rows()
        .filter_map(|row| {
            row.latency_ms.map(|latency_ms| Bar {
                label: row.address,
                latency_ms,
            })
        })
        .collect()
}

/// `latency_<YYYYmmdd_HHMMSS>.pdf`, keyed like the CSV report.
pub fn file_name(report: &DiagnosticReport) -> String {
    format!("latency_{}.pdf", report.run_stamp())
}

/// Writes the chart into `dir`. Nothing is written when no endpoint replied.
pub fn write_chart(report: &DiagnosticReport, dir: &Path) -> Result<Option<PathBuf>> {
    let bars = bars(report);
    if bars.is_empty() {
        return Ok(None);
    }

    let subtitle = format!("Run {}", report.created_at.format("%Y-%m-%d %H:%M:%S"));
    let bytes = render(&subtitle, &bars)?;
    let path = dir.join(file_name(report));
    std::fs::write(&path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(Some(path))
}

pub fn render(subtitle: &str, bars: &[Bar]) -> Result<Vec<u8>> {
    let (doc, page, layer) =
        PdfDocument::new("Endpoint Latency", Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let font_bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let mut current_layer = doc.get_page(page).get_layer(layer);
    current_layer.use_text(
        "Endpoint Latency (ms)",
        FONT_SIZE_TITLE,
        Mm(MARGIN),
        Mm(TITLE_Y),
        &font_bold,
    );
    current_layer.use_text(subtitle, FONT_SIZE_BODY, Mm(MARGIN), Mm(TITLE_Y - 7.0), &font);

    let scale = bar_scale(bars);
    let mut y_pos = FIRST_ROW_Y;
    for bar in bars {
        if y_pos < MARGIN {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Latency Continued");
            current_layer = doc.get_page(page).get_layer(layer);
            y_pos = TITLE_Y;
        }

        current_layer.set_fill_color(Color::Rgb(Rgb::new(0.1, 0.1, 0.1, None)));
        current_layer.use_text(&bar.label, FONT_SIZE_BODY, Mm(LABEL_X), Mm(y_pos), &font);

        let width = (bar.latency_ms as f32 * scale).max(MIN_BAR_WIDTH);
        current_layer.set_fill_color(bar_color(bar.latency_ms));
        current_layer.add_rect(Rect::new(
            Mm(BAR_X),
            Mm(y_pos - 1.0),
            Mm(BAR_X + width),
            Mm(y_pos - 1.0 + BAR_HEIGHT),
        ));

        current_layer.set_fill_color(Color::Rgb(Rgb::new(0.1, 0.1, 0.1, None)));
        current_layer.use_text(
            format!("{:.1}", bar.latency_ms),
            FONT_SIZE_BODY,
            Mm(BAR_X + width + 2.0),
            Mm(y_pos),
            &font,
        );

        y_pos -= ROW_HEIGHT;
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)?;
    Ok(buf.into_inner()?)
}

/// Millimetres per millisecond, so the slowest endpoint fills the bar area.
fn bar_scale(bars: &[Bar]) -> f32 {
    let slowest = bars.iter().map(|b| b.latency_ms).fold(0.0, f64::max);
    if slowest > 0.0 {
        BAR_MAX_WIDTH / slowest as f32
    } else {
        0.0
    }
}

// Same thresholds as the terminal table.
fn bar_color(latency_ms: f64) -> Color {
    let (r, g, b) = match latency_ms {
        ms if ms < 20.0 => (0.2, 0.6, 0.3),
        ms if ms < 100.0 => (0.85, 0.65, 0.1),
        _ => (0.8, 0.2, 0.2),
    };
    Color::Rgb(Rgb::new(r, g, b, None))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
