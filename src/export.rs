use chrono::{DateTime, Utc};

use crate::models::GenerationReport;

/// Plain-text copy pack: one fenced block per generated language, then the FAQ.
pub fn render_document(report: &GenerationReport) -> String {
    let req = &report.request;
    let mut lines = vec![
        format!("# Product copy: {}", req.product_name),
        String::new(),
        format!("Keywords: {}", req.keywords),
        format!("Selling points: {}", req.selling_points),
        format!("Style: {}", req.style),
        format!("Generated: {}", report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")),
    ];

    for (language, result) in &report.results {
        lines.push(String::new());
        lines.push(format!("## {} (model: {})", language, result.model_used));
        push_fenced(&mut lines, &result.content);
    }

    if let Some(faq) = &report.faq {
        lines.push(String::new());
        lines.push(format!("## FAQ (model: {})", faq.model_used));
        push_fenced(&mut lines, &faq.content);
    }

    if !report.failures.is_empty() {
        lines.push(String::new());
        lines.push("## Not generated".to_string());
        lines.extend(report.failures.iter().map(|(language, reason)| format!("- {}: {}", language, reason)));
    }

    let mut doc = lines.join("\n");
    doc.push('\n');
    doc
}

fn push_fenced(lines: &mut Vec<String>, content: &str) {
    // Fence must outrun any backtick run inside the content.
    let longest = content
        .split(|c: char| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest.max(2) + 1);
    lines.push(fence.clone());
    lines.push(content.trim_end_matches('\n').to_string());
    lines.push(fence);
}

/// `<product>_<YYYYMMDD_HHMMSS>.<ext>` with path-unsafe characters replaced.
pub fn export_filename(product_name: &str, at: DateTime<Utc>, ext: &str) -> String {
    let safe: String = product_name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("{}_{}.{}", safe, at.format("%Y%m%d_%H%M%S"), ext)
}

/// Content-Disposition value with an ASCII fallback and an RFC 5987 UTF-8 name.
pub fn content_disposition(filename: &str) -> String {
    let ascii: String = filename
        .chars()
        .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '_' })
        .filter(|&c| c != '"')
        .collect();
    let encoded: String = url::form_urlencoded::byte_serialize(filename.as_bytes())
        .collect::<String>()
        .replace('+', "%20");
    format!("attachment; filename=\"{}\"; filename*=UTF-8''{}", ascii, encoded)
}
