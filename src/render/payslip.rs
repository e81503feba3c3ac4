use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfLayerReference, Point, Rect, Rgb,
};

use crate::error::RenderError;
use crate::payroll::source::REQUIRED_COLUMNS;
use crate::payroll::table::PayrollRecord;
use crate::render::logo::Logo;

// US letter, all layout in points
const PAGE_W: f32 = 612.0;
const PAGE_H: f32 = 792.0;
const MARGIN_X: f32 = 46.0;
const TOP_MARGIN: f32 = 30.0;

const LOGO_HEIGHT: f32 = 60.0;
const TABLE_W: f32 = 520.0;
const CATEGORY_COL_W: f32 = 370.0;
const ROW_H: f32 = 18.0;
const CELL_PAD: f32 = 4.0;

// Rough average glyph width for builtin Helvetica, used for right/center
// alignment; printpdf exposes no metrics for builtin fonts.
const GLYPH_W: f32 = 0.5;

fn brand_blue() -> Color {
    // #4167B1
    Color::Rgb(Rgb::new(0x41 as f32 / 255.0, 0x67 as f32 / 255.0, 0xB1 as f32 / 255.0, None))
}

fn grey(level: f32) -> Color {
    Color::Rgb(Rgb::new(level, level, level, None))
}

fn pt(v: f32) -> Mm {
    Mm(v * 25.4 / 72.0)
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * GLYPH_W
}

fn money(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Static contact block rendered at the bottom of every payslip.
#[derive(Clone)]
pub struct FooterContact {
    pub website: String,
    pub email: String,
    pub phone: String,
}

/// Earning/deduction rows for one record: every non-reserved field whose
/// value is present and numerically non-zero, in table order.
pub fn line_items(record: &PayrollRecord) -> Result<Vec<(String, f64)>, RenderError> {
    let mut items = Vec::new();
    for (field, value) in record.fields() {
        if REQUIRED_COLUMNS.contains(&field) {
            continue;
        }
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        let amount: f64 = value.parse().map_err(|_| RenderError::BadAmount {
            field: field.to_string(),
            value: value.to_string(),
        })?;
        if amount == 0.0 {
            continue;
        }
        items.push((field.to_string(), amount));
    }
    Ok(items)
}

fn net_pay_amount(record: &PayrollRecord) -> Result<f64, RenderError> {
    let value = record.get("Net Pay").unwrap_or("").trim();
    if value.is_empty() {
        return Ok(0.0);
    }
    value.parse().map_err(|_| RenderError::BadAmount {
        field: "Net Pay".to_string(),
        value: value.to_string(),
    })
}

/// Render one employee's payslip. Pure function of its inputs; the only
/// tolerated degradation is a missing logo, which becomes a text line.
///
/// There is no page-overflow handling: a record with enough line items to
/// run past one page renders however printpdf leaves it.
pub fn render_payslip(
    record: &PayrollRecord,
    pay_period: &str,
    logo: &Logo,
    footer: &FooterContact,
) -> Result<Vec<u8>, RenderError> {
    let employee = record.employee();
    let items = line_items(record)?;
    let net_pay = net_pay_amount(record)?;

    let (doc, page, layer) = PdfDocument::new(
        format!("Payslip - {employee}"),
        pt(PAGE_W),
        pt(PAGE_H),
        "Layer 1",
    );
    let layer = doc.get_page(page).get_layer(layer);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;

    let mut y = PAGE_H - TOP_MARGIN;

    // logo, 60pt tall with aspect preserved, or the placeholder line
    match logo {
        Logo::Loaded(img) => {
            let pdf_image = Image::from_dynamic_image(img.as_ref());
            let px_h = pdf_image.image.height.0.max(1) as f32;
            // displayed size = pixels / dpi, so pin dpi to hit LOGO_HEIGHT
            let dpi = px_h * 72.0 / LOGO_HEIGHT;
            pdf_image.add_to_layer(
                layer.clone(),
                ImageTransform {
                    translate_x: Some(pt(MARGIN_X)),
                    translate_y: Some(pt(y - LOGO_HEIGHT)),
                    dpi: Some(dpi),
                    ..Default::default()
                },
            );
        }
        Logo::Placeholder => {
            layer.set_fill_color(grey(0.0));
            layer.use_text("Company Logo Not Found", 12.0, pt(MARGIN_X), pt(y - 12.0), &bold);
        }
    }
    y -= LOGO_HEIGHT + 40.0;

    // header block: employee/rate left, PAYSLIP/period right-aligned
    let rate = match record.get("Rate").map(str::trim) {
        Some(rate) if !rate.is_empty() => rate.to_string(),
        _ => "N/A".to_string(),
    };
    let right_edge = MARGIN_X + TABLE_W;
    layer.set_fill_color(grey(0.0));
    draw_labeled(&layer, &font, &bold, "Employee:", employee, MARGIN_X, y);
    draw_right(&layer, &bold, "PAYSLIP", 12.0, right_edge, y);
    y -= 16.0;
    draw_labeled(&layer, &font, &bold, "Rate:", &rate, MARGIN_X, y);
    let period = format!("Period: {pay_period}");
    draw_right(&layer, &font, &period, 12.0, right_edge, y);
    y -= 16.0 + 60.0;

    // itemized table: header + items + two spacer rows + net pay
    let mut table: Vec<(String, String)> = Vec::with_capacity(items.len() + 4);
    table.push(("Category".to_string(), "Amount".to_string()));
    for (field, amount) in &items {
        table.push((field.clone(), money(*amount)));
    }
    table.push((String::new(), String::new()));
    table.push((String::new(), String::new()));
    table.push(("Net Pay".to_string(), money(net_pay)));

    let table_top = y;
    let item_rows = 1..=items.len();
    for idx in 0..table.len() {
        let row_top = table_top - idx as f32 * ROW_H;
        if idx == 0 {
            fill_row(&layer, row_top, brand_blue());
        } else if item_rows.contains(&idx) {
            // alternating shading on item rows, keyed by table index
            let shade = if idx % 2 == 0 { grey(0.961) } else { grey(0.827) };
            fill_row(&layer, row_top, shade);
        }
    }
    draw_grid(&layer, table_top, table.len());
    for (idx, (category, amount)) in table.iter().enumerate() {
        let baseline = table_top - idx as f32 * ROW_H - ROW_H + 5.0;
        let last = idx == table.len() - 1;
        let row_font = if idx == 0 || last { &bold } else { &font };
        if idx == 0 {
            layer.set_fill_color(grey(1.0));
        } else {
            layer.set_fill_color(grey(0.0));
        }
        layer.use_text(category.as_str(), 10.0, pt(MARGIN_X + CELL_PAD), pt(baseline), row_font);
        layer.use_text(
            amount.as_str(),
            10.0,
            pt(MARGIN_X + CATEGORY_COL_W + CELL_PAD),
            pt(baseline),
            row_font,
        );
    }
    y = table_top - table.len() as f32 * ROW_H;

    // footer rule after a gap that shrinks as the item list grows
    let gap = (380.0 - table.len() as f32 * 10.0).max(10.0);
    y -= gap;
    layer.set_outline_color(brand_blue());
    layer.set_outline_thickness(1.5);
    layer.add_line(hline(MARGIN_X, right_edge, y));
    y -= 5.0 + 12.0;

    let cell_w = TABLE_W / 3.0;
    layer.set_fill_color(grey(0.0));
    for (idx, text) in [
        footer.website.as_str(),
        footer.email.as_str(),
        footer.phone.as_str(),
    ]
    .iter()
    .enumerate()
    {
        let center = MARGIN_X + cell_w * (idx as f32 + 0.5);
        let x = center - text_width(text, 9.0) / 2.0;
        layer.use_text(*text, 9.0, pt(x), pt(y), &font);
    }

    doc.save_to_bytes()
        .map_err(|e| RenderError::Pdf(e.to_string()))
}

/// Bold `Label:` followed by a regular-weight value.
fn draw_labeled(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    bold: &IndirectFontRef,
    label: &str,
    value: &str,
    x: f32,
    y: f32,
) {
    layer.use_text(label, 12.0, pt(x), pt(y), bold);
    layer.use_text(value, 12.0, pt(x + text_width(label, 12.0) + 4.0), pt(y), font);
}

fn draw_right(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    text: &str,
    size: f32,
    right_edge: f32,
    y: f32,
) {
    layer.use_text(text, size, pt(right_edge - text_width(text, size)), pt(y), font);
}

fn fill_row(layer: &PdfLayerReference, row_top: f32, color: Color) {
    layer.set_fill_color(color);
    layer.add_rect(
        Rect::new(
            pt(MARGIN_X),
            pt(row_top - ROW_H),
            pt(MARGIN_X + TABLE_W),
            pt(row_top),
        )
        .with_mode(PaintMode::Fill),
    );
}

fn hline(x1: f32, x2: f32, y: f32) -> Line {
    Line {
        points: vec![
            (Point::new(pt(x1), pt(y)), false),
            (Point::new(pt(x2), pt(y)), false),
        ],
        is_closed: false,
    }
}

/// 0.5pt grey grid over the whole table.
fn draw_grid(layer: &PdfLayerReference, table_top: f32, rows: usize) {
    layer.set_outline_color(grey(0.5));
    layer.set_outline_thickness(0.5);
    let bottom = table_top - rows as f32 * ROW_H;
    for idx in 0..=rows {
        let y = table_top - idx as f32 * ROW_H;
        layer.add_line(hline(MARGIN_X, MARGIN_X + TABLE_W, y));
    }
    for x in [MARGIN_X, MARGIN_X + CATEGORY_COL_W, MARGIN_X + TABLE_W] {
        layer.add_line(Line {
            points: vec![
                (Point::new(pt(x), pt(table_top)), false),
                (Point::new(pt(x), pt(bottom)), false),
            ],
            is_closed: false,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn footer() -> FooterContact {
        FooterContact {
            website: "https://musicadmin.com/".to_string(),
            email: "hello@musicadmin.com".to_string(),
            phone: "615-200-0122".to_string(),
        }
    }

    #[test]
    fn line_items_skip_reserved_zero_and_missing() {
        let record = PayrollRecord::from_pairs(&[
            ("Employee", "Jane Doe"),
            ("Rate", "20"),
            ("Net Pay", "1000"),
            ("Bonus", "50"),
            ("Tax", "0"),
            ("Overtime", ""),
        ]);
        let items = line_items(&record).unwrap();
        assert_eq!(items, vec![("Bonus".to_string(), 50.0)]);
    }

    #[test]
    fn amounts_format_with_two_decimals() {
        assert_eq!(money(50.0), "$50.00");
        assert_eq!(money(1000.0), "$1000.00");
        assert_eq!(money(12.5), "$12.50");
        assert_eq!(money(12.346), "$12.35");
    }

    #[test]
    fn non_numeric_item_is_a_render_error() {
        let record = PayrollRecord::from_pairs(&[
            ("Employee", "Jane"),
            ("Rate", "20"),
            ("Net Pay", "900"),
            ("Bonus", "fifty"),
        ]);
        let err = line_items(&record).unwrap_err();
        match err {
            RenderError::BadAmount { field, value } => {
                assert_eq!(field, "Bonus");
                assert_eq!(value, "fifty");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn renders_nonzero_pdf_without_logo() {
        let record = PayrollRecord::from_pairs(&[
            ("Employee", "Jane Doe"),
            ("Rate", "20"),
            ("Net Pay", "1000"),
            ("Bonus", "50"),
        ]);
        let bytes =
            render_payslip(&record, "March 2024", &Logo::Placeholder, &footer()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn renders_with_decoded_logo() {
        let img = std::sync::Arc::new(image::DynamicImage::new_rgb8(24, 12));
        let record = PayrollRecord::from_pairs(&[
            ("Employee", "Jane Doe"),
            ("Rate", "20"),
            ("Net Pay", "1000"),
        ]);
        let bytes =
            render_payslip(&record, "March 2024", &Logo::Loaded(img), &footer()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn empty_net_pay_renders_as_zero() {
        let record = PayrollRecord::from_pairs(&[
            ("Employee", "Jane"),
            ("Rate", "20"),
            ("Net Pay", ""),
        ]);
        assert_eq!(net_pay_amount(&record).unwrap(), 0.0);
    }
}
