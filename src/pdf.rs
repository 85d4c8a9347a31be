use crate::models::GenerationReport;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use std::io::BufWriter;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PDF error: {0}")] Pdf(String),
}

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const LEFT: f32 = 15.0;
const TOP: f32 = 275.0;
const BOTTOM: f32 = 20.0;
const WRAP: usize = 95;

struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    font: IndirectFontRef,
    layer: PdfLayerReference,
    y: f32,
}

impl PageWriter<'_> {
    fn line(&mut self, text: &str, size: f32) {
        if self.y < BOTTOM {
            self.new_page("Continued");
        }
        self.layer.use_text(latin1(text), size, Mm(LEFT), Mm(self.y), &self.font);
        self.y -= size * 0.45 + 1.5;
    }

    fn gap(&mut self) {
        self.y -= 4.0;
    }

    fn new_page(&mut self, name: &str) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_W), Mm(PAGE_H), name);
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = TOP;
    }

    fn paragraph(&mut self, text: &str, size: f32) {
        for raw in text.lines() {
            if raw.trim().is_empty() {
                self.gap();
                continue;
            }
            for chunk in wrap(raw, WRAP) {
                self.line(&chunk, size);
            }
        }
    }
}

/// Text-only PDF: a summary page, then one page per generated language and the FAQ.
pub fn generate_pdf(report: &GenerationReport) -> Result<Vec<u8>, ExportError> {
    let req = &report.request;
    let (doc, page, layer) = PdfDocument::new(
        format!("Product copy: {}", truncate(&req.product_name, 48)),
        Mm(PAGE_W),
        Mm(PAGE_H),
        "Summary",
    );
    let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(|e| ExportError::Pdf(e.to_string()))?;
    let layer = doc.get_page(page).get_layer(layer);
    let mut w = PageWriter { doc: &doc, font, layer, y: TOP };

    w.line("Product Copy Pack", 20.0);
    w.gap();
    w.paragraph(&req.product_name, 12.0);
    w.paragraph(&format!("Keywords: {}", req.keywords), 10.0);
    w.paragraph(&format!("Selling points: {}", req.selling_points), 10.0);
    w.line(&format!("Style: {}", req.style), 10.0);
    w.line(&format!("Generated: {}", report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")), 10.0);
    for (language, reason) in &report.failures {
        w.paragraph(&format!("Not generated ({}): {}", language, reason), 9.0);
    }

    for (language, result) in &report.results {
        w.new_page(language.name());
        w.line(&format!("{} (model: {})", language, result.model_used), 16.0);
        w.gap();
        w.paragraph(&result.content, 10.0);
    }

    if let Some(faq) = &report.faq {
        w.new_page("FAQ");
        w.line(&format!("FAQ (model: {})", faq.model_used), 16.0);
        w.gap();
        w.paragraph(&faq.content, 10.0);
    }
    drop(w);

    let mut buf: Vec<u8> = Vec::new();
    {
        let mut writer = BufWriter::new(&mut buf);
        doc.save(&mut writer).map_err(|e| ExportError::Pdf(e.to_string()))?;
    }
    Ok(buf)
}

// Built-in fonts only carry a Latin-1 glyph set.
fn latin1(s: &str) -> String {
    s.chars().map(|c| if (c as u32) < 0x100 { c } else { '?' }).collect()
}

fn wrap(line: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    chars.chunks(width).map(|c| c.iter().collect()).collect()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max { s.to_string() } else { format!("{}…", s.chars().take(max).collect::<String>()) }
}
