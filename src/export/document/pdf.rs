//! Minimal PDF 1.4 writer.
//!
//! Serializes a [`DocumentLayout`] using the two standard Helvetica fonts, so no
//! font data is embedded. Content streams are left uncompressed.
//!
//! Object numbering:
//! 1 catalog, 2 page tree, 3 Helvetica, 4 Helvetica-Bold, 5 document info,
//! then a page object and its content stream for every page.

use std::io::Write;

use crate::error_handling::LayoutError;

use super::layout::{DocumentLayout, DrawOp};

const FIRST_PAGE_OBJECT: usize = 6;

/// Helvetica advance widths for ASCII 32..=126, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' ' to '/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // digits
    278, 278, 584, 584, 584, 556, 1015, // ':' to '@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A' to 'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N' to 'Z'
    278, 278, 278, 469, 556, 333, // '[' to '`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a' to 'm'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n' to 'z'
    334, 260, 334, 584, // '{' to '~'
];

/// Code points of WinAnsi bytes 0x80..=0x9F; `None` marks unassigned bytes.
const WIN_ANSI_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'), None, Some('\u{201A}'), Some('\u{0192}'),
    Some('\u{201E}'), Some('\u{2026}'), Some('\u{2020}'), Some('\u{2021}'),
    Some('\u{02C6}'), Some('\u{2030}'), Some('\u{0160}'), Some('\u{2039}'),
    Some('\u{0152}'), None, Some('\u{017D}'), None,
    None, Some('\u{2018}'), Some('\u{2019}'), Some('\u{201C}'),
    Some('\u{201D}'), Some('\u{2022}'), Some('\u{2013}'), Some('\u{2014}'),
    Some('\u{02DC}'), Some('\u{2122}'), Some('\u{0161}'), Some('\u{203A}'),
    Some('\u{0153}'), None, Some('\u{017E}'), Some('\u{0178}'),
];

/// Helvetica advance widths for WinAnsi 0x80..=0x9F, matching [`WIN_ANSI_HIGH`].
const HELVETICA_HIGH_WIDTHS: [u16; 32] = [
    556, 0, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0, //
    0, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 0, 500, 667,
];

/// Maps a character to its WinAnsi byte, if the encoding has one.
fn win_ansi_byte(c: char) -> Option<u8> {
    match c as u32 {
        code @ (0x20..=0x7E | 0xA0..=0xFF) => Some(code as u8),
        _ => WIN_ANSI_HIGH
            .iter()
            .position(|mapped| *mapped == Some(c))
            .map(|i| 0x80 + i as u8),
    }
}

/// Width of `text` set in Helvetica at `size` points.
///
/// Bold text is estimated from the regular metrics with a small allowance.
pub fn text_width(text: &str, size: f32, bold: bool) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| match win_ansi_byte(c) {
            Some(byte @ 0x20..=0x7E) => HELVETICA_WIDTHS[usize::from(byte - 0x20)],
            Some(byte @ 0x80..=0x9F) => HELVETICA_HIGH_WIDTHS[usize::from(byte - 0x80)],
            _ => 556,
        })
        .map(u32::from)
        .sum();
    let width = units as f32 * size / 1000.0;
    if bold {
        width * 1.06
    } else {
        width
    }
}

/// Encodes a PDF string literal body in WinAnsi.
///
/// Control characters become spaces and characters outside the encoding are
/// replaced with `?`.
fn escape_text(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        let byte = match win_ansi_byte(c) {
            Some(byte) => byte,
            None if (c as u32) < 0x20 => b' ',
            None => b'?',
        };
        match byte {
            b'(' | b')' | b'\\' => {
                out.push(b'\\');
                out.push(byte);
            }
            0x80..=0xFF => out.extend_from_slice(format!("\\{:03o}", byte).as_bytes()),
            _ => out.push(byte),
        }
    }
    out
}

fn content_stream(layout: &DocumentLayout, ops: &[DrawOp]) -> Result<Vec<u8>, LayoutError> {
    let height = layout.geometry.height;
    let mut out = Vec::new();
    for op in ops {
        match op {
            DrawOp::Text {
                x,
                y,
                size,
                bold,
                text,
            } => {
                let font = if *bold { "F2" } else { "F1" };
                write!(
                    out,
                    "BT /{} {:.2} Tf {:.2} {:.2} Td (",
                    font,
                    size,
                    x,
                    height - y
                )?;
                out.extend_from_slice(&escape_text(text));
                out.extend_from_slice(b") Tj ET\n");
            }
            DrawOp::FillRect {
                x,
                y,
                width,
                height: h,
                gray,
            } => {
                writeln!(
                    out,
                    "{:.2} g {:.2} {:.2} {:.2} {:.2} re f 0 g",
                    gray,
                    x,
                    height - y - h,
                    width,
                    h
                )?;
            }
            DrawOp::Rule { x1, x2, y } => {
                writeln!(
                    out,
                    "0.75 G 0.5 w {:.2} {:.2} m {:.2} {:.2} l S 0 G",
                    x1,
                    height - y,
                    x2,
                    height - y
                )?;
            }
        }
    }
    Ok(out)
}

/// Serializes a laid-out document into PDF bytes.
///
/// # Errors
///
/// Returns `LayoutError::Encoding` if writing to the buffer fails.
pub fn encode(layout: &DocumentLayout, title: &str) -> Result<Vec<u8>, LayoutError> {
    let page_count = layout.pages.len();
    let object_count = FIRST_PAGE_OBJECT - 1 + 2 * page_count;
    let mut out: Vec<u8> = Vec::new();
    let mut offsets = vec![0usize; object_count + 1];

    out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

    offsets[1] = out.len();
    out.extend_from_slice(b"1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");

    offsets[2] = out.len();
    let kids: Vec<String> = (0..page_count)
        .map(|i| format!("{} 0 R", FIRST_PAGE_OBJECT + 2 * i))
        .collect();
    writeln!(
        out,
        "2 0 obj\n<< /Type /Pages /Kids [{}] /Count {} >>\nendobj",
        kids.join(" "),
        page_count
    )?;

    for (number, base_font) in [(3, "Helvetica"), (4, "Helvetica-Bold")] {
        offsets[number] = out.len();
        writeln!(
            out,
            "{} 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>\nendobj",
            number, base_font
        )?;
    }

    offsets[5] = out.len();
    out.extend_from_slice(b"5 0 obj\n<< /Title (");
    out.extend_from_slice(&escape_text(title));
    out.extend_from_slice(b") /Producer (report_export) >>\nendobj\n");

    for (i, page) in layout.pages.iter().enumerate() {
        let page_object = FIRST_PAGE_OBJECT + 2 * i;
        let content_object = page_object + 1;

        offsets[page_object] = out.len();
        writeln!(
            out,
            "{} 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
             /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>\nendobj",
            page_object, layout.geometry.width, layout.geometry.height, content_object
        )?;

        let content = content_stream(layout, &page.ops)?;
        offsets[content_object] = out.len();
        writeln!(
            out,
            "{} 0 obj\n<< /Length {} >>\nstream",
            content_object,
            content.len()
        )?;
        out.extend_from_slice(&content);
        out.extend_from_slice(b"\nendstream\nendobj\n");
    }

    let xref_offset = out.len();
    writeln!(out, "xref\n0 {}", object_count + 1)?;
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in &offsets[1..] {
        writeln!(out, "{:010} 00000 n ", offset)?;
    }
    writeln!(
        out,
        "trailer\n<< /Size {} /Root 1 0 R /Info 5 0 R >>\nstartxref\n{}\n%%EOF",
        object_count + 1,
        xref_offset
    )?;

    Ok(out)
}
