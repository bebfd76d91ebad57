use crate::canvas::{Command, Document, Page};
use crate::font::StandardFont;
use crate::types::{Color, Pt};
use fixed::types::I32F32;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

pub const PRODUCER: &str = concat!("crowley-reports ", env!("CARGO_PKG_VERSION"));

/// Document information dictionary entries.
#[derive(Debug, Clone, Default)]
pub struct PdfOptions {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
}

pub fn document_to_pdf(document: &Document, options: &PdfOptions) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    document_to_pdf_writer(document, options, &mut out)?;
    Ok(out)
}

/// Writes `document` to `path`, returning the number of bytes written.
pub fn document_to_pdf_path(
    document: &Document,
    options: &PdfOptions,
    path: &Path,
) -> io::Result<usize> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let written = document_to_pdf_writer(document, options, &mut writer)?;
    writer.flush()?;
    Ok(written)
}

pub fn document_to_pdf_writer<W: Write>(
    document: &Document,
    options: &PdfOptions,
    writer: &mut W,
) -> io::Result<usize> {
    let fonts = build_font_map(document);
    let page_height = document.page_size.height;
    let contents: Vec<String> = document
        .pages
        .iter()
        .map(|page| render_page(page, page_height, &fonts))
        .collect();

    // 1 catalog, 2 pages, 3 info, then fonts, then page/content pairs.
    let catalog_id = 1usize;
    let pages_id = 2usize;
    let info_id = 3usize;
    let first_font_id = 4usize;
    let first_page_id = first_font_id + fonts.len();
    let object_count = first_page_id - 1 + contents.len() * 2;
    let mut offsets = vec![0usize; object_count + 1];
    let mut offset = 0usize;

    write_bytes(writer, b"%PDF-1.7\n%\xE2\xE3\xCF\xD3\n", &mut offset)?;

    write_pdf_object(
        writer,
        &mut offset,
        &mut offsets,
        catalog_id,
        &format!("<< /Type /Catalog /Pages {} 0 R >>", pages_id),
    )?;

    let kids: Vec<String> = (0..contents.len())
        .map(|idx| format!("{} 0 R", first_page_id + idx * 2))
        .collect();
    write_pdf_object(
        writer,
        &mut offset,
        &mut offsets,
        pages_id,
        &format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            contents.len()
        ),
    )?;

    write_pdf_object(writer, &mut offset, &mut offsets, info_id, &info_object(options))?;

    let mut font_refs = Vec::new();
    for (idx, (font, resource)) in fonts.iter().enumerate() {
        let font_id = first_font_id + idx;
        write_pdf_object(writer, &mut offset, &mut offsets, font_id, &font_object(*font))?;
        font_refs.push(format!("/{} {} 0 R", resource, font_id));
    }
    let resources = format!("<< /Font << {} >> >>", font_refs.join(" "));

    let media_box = format!(
        "[0 0 {} {}]",
        fmt_pt(document.page_size.width),
        fmt_pt(document.page_size.height)
    );
    for (idx, content) in contents.iter().enumerate() {
        let page_id = first_page_id + idx * 2;
        let content_id = page_id + 1;
        write_pdf_object(
            writer,
            &mut offset,
            &mut offsets,
            page_id,
            &format!(
                "<< /Type /Page /Parent {} 0 R /MediaBox {} /Resources {} /Contents {} 0 R >>",
                pages_id, media_box, resources, content_id
            ),
        )?;
        write_pdf_object(
            writer,
            &mut offset,
            &mut offsets,
            content_id,
            &stream_object(content),
        )?;
    }

    let xref_start = offset;
    write_str(writer, &format!("xref\n0 {}\n", object_count + 1), &mut offset)?;
    write_str(writer, "0000000000 65535 f \n", &mut offset)?;
    for entry in offsets.iter().skip(1) {
        write_str(writer, &format!("{:010} 00000 n \n", entry), &mut offset)?;
    }
    let id = document_id(&contents, options);
    write_str(
        writer,
        &format!(
            "trailer\n<< /Size {} /Root {} 0 R /Info {} 0 R /ID [<{}> <{}>] >>\nstartxref\n{}\n%%EOF\n",
            object_count + 1,
            catalog_id,
            info_id,
            id,
            id,
            xref_start
        ),
        &mut offset,
    )?;
    Ok(offset)
}

/// Resource names (`F1`, `F2`, ...) for every font the document sets.
fn build_font_map(document: &Document) -> BTreeMap<StandardFont, String> {
    let mut used = vec![StandardFont::Helvetica];
    for page in &document.pages {
        for command in &page.commands {
            if let Command::SetFont { font, .. } = command {
                if !used.contains(font) {
                    used.push(*font);
                }
            }
        }
    }
    StandardFont::ALL
        .into_iter()
        .filter(|font| used.contains(font))
        .enumerate()
        .map(|(idx, font)| (font, format!("F{}", idx + 1)))
        .collect()
}

fn document_id(contents: &[String], options: &PdfOptions) -> String {
    let mut hasher = Sha256::new();
    for content in contents {
        hasher.update(content.as_bytes());
    }
    hasher.update(info_object(options).as_bytes());
    hasher
        .finalize()
        .iter()
        .take(16)
        .map(|byte| format!("{:02x}", byte))
        .collect()
}

#[derive(Clone, Copy)]
struct TextState {
    font: StandardFont,
    size: Pt,
}

fn render_page(page: &Page, page_height: Pt, fonts: &BTreeMap<StandardFont, String>) -> String {
    let mut out = String::new();
    let mut state = TextState {
        font: StandardFont::Helvetica,
        size: Pt::from_i32(12),
    };
    let mut stack: Vec<TextState> = Vec::new();
    for command in &page.commands {
        match command {
            Command::SaveState => {
                stack.push(state);
                out.push_str("q\n");
            }
            Command::RestoreState => {
                if let Some(previous) = stack.pop() {
                    state = previous;
                    out.push_str("Q\n");
                }
            }
            Command::Meta { .. } => {}
            Command::SetFillColor(color) => out.push_str(&color_to_pdf_fill(*color)),
            Command::SetStrokeColor(color) => out.push_str(&color_to_pdf_stroke(*color)),
            Command::SetLineWidth(width) => out.push_str(&format!("{} w\n", fmt_pt(*width))),
            Command::SetFont { font, size } => {
                state = TextState {
                    font: *font,
                    size: *size,
                };
            }
            Command::DrawString { x, y, text } => {
                let encoded = encode_winansi_pdf_string(text);
                if encoded.replaced > 0 || encoded.fallbacks > 0 {
                    tracing::warn!(
                        replaced = encoded.replaced,
                        fallbacks = encoded.fallbacks,
                        text = %truncate_preview(text, 40),
                        "text not representable in WinAnsi"
                    );
                }
                let resource = fonts.get(&state.font).map(String::as_str).unwrap_or("F1");
                out.push_str(&format!(
                    "BT /{} {} Tf {} {} Td ({}) Tj ET\n",
                    resource,
                    fmt_pt(state.size),
                    fmt_pt(*x),
                    fmt_pt(page_height - *y),
                    encoded.text
                ));
            }
            Command::FillRect {
                x,
                y,
                width,
                height,
            } => {
                out.push_str(&format!(
                    "{} {} {} {} re f\n",
                    fmt_pt(*x),
                    fmt_pt(page_height - *y - *height),
                    fmt_pt(*width),
                    fmt_pt(*height)
                ));
            }
            Command::StrokeRect {
                x,
                y,
                width,
                height,
            } => {
                out.push_str(&format!(
                    "{} {} {} {} re S\n",
                    fmt_pt(*x),
                    fmt_pt(page_height - *y - *height),
                    fmt_pt(*width),
                    fmt_pt(*height)
                ));
            }
            Command::Line { x1, y1, x2, y2 } => {
                out.push_str(&format!(
                    "{} {} m {} {} l S\n",
                    fmt_pt(*x1),
                    fmt_pt(page_height - *y1),
                    fmt_pt(*x2),
                    fmt_pt(page_height - *y2)
                ));
            }
        }
    }
    out
}

fn font_object(font: StandardFont) -> String {
    format!(
        "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
        font.pdf_name()
    )
}

fn stream_object(content: &str) -> String {
    format!(
        "<< /Length {} >>\nstream\n{}\nendstream",
        content.len(),
        content
    )
}

fn info_object(options: &PdfOptions) -> String {
    let mut entries: Vec<String> = Vec::new();
    let fields = [
        ("Title", options.title.as_deref()),
        ("Author", options.author.as_deref()),
        ("Subject", options.subject.as_deref()),
    ];
    for (key, value) in fields {
        if let Some(value) = value {
            entries.push(format!("/{} ({})", key, encode_winansi_pdf_string(value).text));
        }
    }
    entries.push(format!("/Producer ({})", PRODUCER));
    format!("<< {} >>", entries.join(" "))
}

fn write_pdf_object<W: Write>(
    writer: &mut W,
    offset: &mut usize,
    offsets: &mut [usize],
    obj_id: usize,
    body: &str,
) -> io::Result<()> {
    if let Some(slot) = offsets.get_mut(obj_id) {
        *slot = *offset;
    }
    write_str(writer, &format!("{} 0 obj\n", obj_id), offset)?;
    write_bytes(writer, body.as_bytes(), offset)?;
    write_bytes(writer, b"\nendobj\n", offset)?;
    Ok(())
}

fn write_bytes<W: Write>(writer: &mut W, data: &[u8], offset: &mut usize) -> io::Result<()> {
    writer.write_all(data)?;
    *offset += data.len();
    Ok(())
}

fn write_str<W: Write>(writer: &mut W, data: &str, offset: &mut usize) -> io::Result<()> {
    write_bytes(writer, data.as_bytes(), offset)
}

struct WinAnsiEncoded {
    text: String,
    replaced: usize,
    fallbacks: usize,
}

/// Encodes `input` as an escaped PDF literal in WinAnsi (cp1252). Characters
/// outside the code page become `?`; `≥`/`≤` are spelled out.
fn encode_winansi_pdf_string(input: &str) -> WinAnsiEncoded {
    let mut out = String::new();
    let mut replaced = 0usize;
    let mut fallbacks = 0usize;
    for ch in input.chars() {
        match ch {
            '\u{2265}' => {
                out.push_str(">=");
                fallbacks += 1;
                continue;
            }
            '\u{2264}' => {
                out.push_str("<=");
                fallbacks += 1;
                continue;
            }
            _ => {}
        }

        let byte = match ch {
            '\u{0000}'..='\u{007F}' => ch as u8,
            '\u{00A0}'..='\u{00FF}' => ch as u8,
            '\u{20AC}' => 0x80,
            '\u{201A}' => 0x82,
            '\u{0192}' => 0x83,
            '\u{201E}' => 0x84,
            '\u{2026}' => 0x85,
            '\u{2020}' => 0x86,
            '\u{2021}' => 0x87,
            '\u{02C6}' => 0x88,
            '\u{2030}' => 0x89,
            '\u{0160}' => 0x8A,
            '\u{2039}' => 0x8B,
            '\u{0152}' => 0x8C,
            '\u{017D}' => 0x8E,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{02DC}' => 0x98,
            '\u{2122}' => 0x99,
            '\u{0161}' => 0x9A,
            '\u{203A}' => 0x9B,
            '\u{0153}' => 0x9C,
            '\u{017E}' => 0x9E,
            '\u{0178}' => 0x9F,
            _ => {
                replaced += 1;
                b'?'
            }
        };

        match byte {
            b'\\' => out.push_str("\\\\"),
            b'(' => out.push_str("\\("),
            b')' => out.push_str("\\)"),
            b if b < 0x20 || b >= 0x7f => out.push_str(&format!("\\{:03o}", b)),
            b => out.push(b as char),
        }
    }

    WinAnsiEncoded {
        text: out,
        replaced,
        fallbacks,
    }
}

fn truncate_preview(input: &str, max_chars: usize) -> String {
    if input.chars().count() <= max_chars {
        return input.to_string();
    }
    let mut out: String = input.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

fn fmt(value: f32) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let fixed = I32F32::from_num(value.clamp(-1.0e6, 1.0e6));
    let scaled = (fixed * I32F32::from_num(1000)).round();
    let milli: i64 = scaled.to_num();
    format_milli(milli)
}

fn format_milli(milli: i64) -> String {
    if milli == 0 {
        return "0".to_string();
    }
    let sign = if milli < 0 { "-" } else { "" };
    let abs = milli.abs();
    let int_part = abs / 1000;
    let frac_part = abs % 1000;
    if frac_part == 0 {
        format!("{}{}", sign, int_part)
    } else {
        let mut s = format!("{}{}.{:03}", sign, int_part, frac_part);
        while s.ends_with('0') {
            s.pop();
        }
        s
    }
}

fn fmt_pt(value: Pt) -> String {
    format_milli(value.to_milli_i64())
}

fn color_to_pdf_fill(color: Color) -> String {
    format!("{} {} {} rg\n", fmt(color.r), fmt(color.g), fmt(color.b))
}

fn color_to_pdf_stroke(color: Color) -> String {
    format!("{} {} {} RG\n", fmt(color.r), fmt(color.g), fmt(color.b))
}
