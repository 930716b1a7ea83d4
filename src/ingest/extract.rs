//! Text extraction for binary document formats (PDF and OOXML).
//!
//! OOXML containers are ZIP archives whose XML parts are walked with a
//! streaming reader rather than a DOM. Decompressed reads are bounded so
//! a hostile archive cannot balloon memory.

use std::io::{Cursor, Read};

use anyhow::{anyhow, bail, Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Upper bound on decompressed bytes read from a single ZIP entry.
const MAX_ENTRY_BYTES: u64 = 50 * 1024 * 1024;
/// Upper bound on worksheets processed per workbook.
const MAX_SHEETS: usize = 100;

type Archive<'a> = zip::ZipArchive<Cursor<&'a [u8]>>;

pub fn extract_pdf(bytes: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(bytes).context("Failed to extract text from PDF")
}

/// Word: every `w:t` run in `word/document.xml`, with paragraph breaks.
pub fn extract_docx(bytes: &[u8]) -> Result<String> {
    let mut archive = open_archive(bytes)?;
    let xml = read_entry(&mut archive, "word/document.xml")?;
    text_runs(&xml)
}

/// PowerPoint: `a:t` runs from each `ppt/slides/slideN.xml`, in slide order.
pub fn extract_pptx(bytes: &[u8]) -> Result<String> {
    let mut archive = open_archive(bytes)?;

    let mut slides: Vec<String> = archive
        .file_names()
        .filter(|n| n.starts_with("ppt/slides/slide") && n.ends_with(".xml"))
        .map(str::to_string)
        .collect();
    slides.sort_by_key(|n| part_number(n, "ppt/slides/slide"));

    let mut texts = Vec::new();
    for name in slides {
        let xml = read_entry(&mut archive, &name)?;
        let text = text_runs(&xml)?;
        if !text.trim().is_empty() {
            texts.push(text);
        }
    }
    Ok(texts.join("\n"))
}

/// Excel: shared strings and literal cell values from every worksheet,
/// in sheet order.
pub fn extract_xlsx(bytes: &[u8]) -> Result<String> {
    let mut archive = open_archive(bytes)?;

    // Workbooks with no string cells omit the sharedStrings part entirely.
    let has_shared = archive.file_names().any(|n| n == "xl/sharedStrings.xml");
    let shared = if has_shared {
        let xml = read_entry(&mut archive, "xl/sharedStrings.xml")?;
        shared_strings(&xml)?
    } else {
        Vec::new()
    };

    let mut sheets: Vec<String> = archive
        .file_names()
        .filter(|n| n.starts_with("xl/worksheets/sheet") && n.ends_with(".xml"))
        .map(str::to_string)
        .collect();
    sheets.sort_by_key(|n| part_number(n, "xl/worksheets/sheet"));

    let mut cells = Vec::new();
    for name in sheets.into_iter().take(MAX_SHEETS) {
        let xml = read_entry(&mut archive, &name)?;
        collect_sheet_cells(&xml, &shared, &mut cells)?;
    }
    Ok(cells.join(" "))
}

fn open_archive(bytes: &[u8]) -> Result<Archive<'_>> {
    zip::ZipArchive::new(Cursor::new(bytes)).context("File is not a valid OOXML container")
}

fn read_entry(archive: &mut Archive<'_>, name: &str) -> Result<Vec<u8>> {
    let entry = archive
        .by_name(name)
        .with_context(|| format!("Missing OOXML part {name}"))?;
    let mut out = Vec::new();
    entry
        .take(MAX_ENTRY_BYTES)
        .read_to_end(&mut out)
        .with_context(|| format!("Failed to read OOXML part {name}"))?;
    if out.len() as u64 >= MAX_ENTRY_BYTES {
        bail!("OOXML part {name} exceeds the size limit");
    }
    Ok(out)
}

/// Numeric suffix of a part name like `ppt/slides/slide12.xml`.
fn part_number(name: &str, prefix: &str) -> u32 {
    name.trim_start_matches(prefix)
        .trim_end_matches(".xml")
        .parse()
        .unwrap_or(u32::MAX)
}

/// Collect the text of every `t` element, emitting a newline at the end
/// of each enclosing paragraph (`w:p` in Word, `a:p` in PowerPoint).
fn text_runs(xml: &[u8]) -> Result<String> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut out = String::new();
    let mut in_run = false;

    loop {
        match reader
            .read_event_into(&mut buf)
            .map_err(|e| anyhow!("Malformed document XML: {e}"))?
        {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_run = true,
            Event::Text(t) if in_run => {
                out.push_str(t.unescape().unwrap_or_default().as_ref());
            }
            Event::End(e) => {
                let name = e.local_name();
                if name.as_ref() == b"t" {
                    in_run = false;
                } else if name.as_ref() == b"p" && !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    while out.ends_with('\n') {
        out.pop();
    }
    Ok(out)
}

/// One string per `si` element of `xl/sharedStrings.xml`, concatenating
/// its `t` runs (rich-text strings carry several).
fn shared_strings(xml: &[u8]) -> Result<Vec<String>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_si = false;
    let mut in_run = false;

    loop {
        match reader
            .read_event_into(&mut buf)
            .map_err(|e| anyhow!("Malformed sharedStrings XML: {e}"))?
        {
            Event::Start(e) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = true;
                    current.clear();
                }
                b"t" if in_si => in_run = true,
                _ => {}
            },
            Event::Text(t) if in_run => {
                current.push_str(t.unescape().unwrap_or_default().as_ref());
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_run = false,
                b"si" => {
                    strings.push(std::mem::take(&mut current));
                    in_si = false;
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(strings)
}

/// Append every cell value of one worksheet: shared-string cells resolve
/// through the shared table, other cells (numbers, booleans, formula
/// results) keep their literal `v` text.
fn collect_sheet_cells(xml: &[u8], shared: &[String], cells: &mut Vec<String>) -> Result<()> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut cell_is_shared = false;
    let mut in_value = false;

    loop {
        match reader
            .read_event_into(&mut buf)
            .map_err(|e| anyhow!("Malformed worksheet XML: {e}"))?
        {
            Event::Start(e) => match e.local_name().as_ref() {
                b"c" => {
                    cell_is_shared = e.attributes().any(|a| {
                        a.as_ref()
                            .map(|a| a.key.as_ref() == b"t" && a.value.as_ref() == b"s")
                            .unwrap_or(false)
                    });
                }
                b"v" => in_value = true,
                _ => {}
            },
            Event::Text(t) if in_value => {
                let value = t.unescape().unwrap_or_default();
                let value = value.trim();
                if !value.is_empty() {
                    if cell_is_shared {
                        if let Some(s) = value.parse::<usize>().ok().and_then(|i| shared.get(i)) {
                            if !s.is_empty() {
                                cells.push(s.clone());
                            }
                        }
                    } else {
                        cells.push(value.to_string());
                    }
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"v" => in_value = false,
                b"c" => cell_is_shared = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// Build an in-memory ZIP with the given (name, content) entries.
    fn zip_with_entries(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut writer = zip::ZipWriter::new(Cursor::new(&mut buf));
            for (name, content) in entries {
                writer
                    .start_file(*name, zip::write::SimpleFileOptions::default())
                    .unwrap();
                writer.write_all(content.as_bytes()).unwrap();
            }
            writer.finish().unwrap();
        }
        buf
    }

    fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:r><w:t>{p}</w:t></w:r></w:p>"))
            .collect();
        let xml = format!(
            "<?xml version=\"1.0\"?>\
             <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
             <w:body>{body}</w:body></w:document>"
        );
        zip_with_entries(&[("word/document.xml", &xml)])
    }

    #[test]
    fn test_docx_extracts_paragraphs() {
        let bytes = docx_bytes(&["first paragraph", "second paragraph"]);
        let text = extract_docx(&bytes).unwrap();
        assert_eq!(text, "first paragraph\nsecond paragraph");
    }

    #[test]
    fn test_docx_unescapes_entities() {
        let bytes = docx_bytes(&["salt &amp; pepper"]);
        let text = extract_docx(&bytes).unwrap();
        assert_eq!(text, "salt & pepper");
    }

    #[test]
    fn test_docx_missing_document_part() {
        let bytes = zip_with_entries(&[("unrelated.xml", "<a/>")]);
        let err = extract_docx(&bytes).unwrap_err();
        assert!(err.to_string().contains("word/document.xml"));
    }

    #[test]
    fn test_docx_rejects_non_zip() {
        assert!(extract_docx(b"definitely not a zip").is_err());
    }

    #[test]
    fn test_pptx_extracts_slides_in_order() {
        let slide = |t: &str| {
            format!(
                "<p:sld xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\">\
                 <a:p><a:r><a:t>{t}</a:t></a:r></a:p></p:sld>"
            )
        };
        // Entry order is reversed; numeric part order must win.
        let bytes = zip_with_entries(&[
            ("ppt/slides/slide2.xml", &slide("second slide")),
            ("ppt/slides/slide1.xml", &slide("first slide")),
        ]);
        let text = extract_pptx(&bytes).unwrap();
        assert_eq!(text, "first slide\nsecond slide");
    }

    #[test]
    fn test_pptx_skips_empty_slides() {
        let bytes = zip_with_entries(&[
            (
                "ppt/slides/slide1.xml",
                "<p:sld xmlns:a=\"x\"><a:p><a:r><a:t>only text</a:t></a:r></a:p></p:sld>",
            ),
            ("ppt/slides/slide2.xml", "<p:sld xmlns:a=\"x\"></p:sld>"),
        ]);
        let text = extract_pptx(&bytes).unwrap();
        assert_eq!(text, "only text");
    }

    #[test]
    fn test_xlsx_resolves_shared_strings_and_numbers() {
        let shared = "<?xml version=\"1.0\"?>\
            <sst xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\">\
            <si><t>revenue</t></si><si><t>cost</t></si></sst>";
        let sheet = "<?xml version=\"1.0\"?>\
            <worksheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\">\
            <sheetData>\
            <row><c t=\"s\"><v>0</v></c><c><v>1250</v></c></row>\
            <row><c t=\"s\"><v>1</v></c><c><v>800</v></c></row>\
            </sheetData></worksheet>";
        let bytes = zip_with_entries(&[
            ("xl/sharedStrings.xml", shared),
            ("xl/worksheets/sheet1.xml", sheet),
        ]);
        let text = extract_xlsx(&bytes).unwrap();
        assert_eq!(text, "revenue 1250 cost 800");
    }

    #[test]
    fn test_xlsx_without_shared_strings_part() {
        let sheet = "<worksheet><sheetData><row><c><v>42</v></c></row></sheetData></worksheet>";
        let bytes = zip_with_entries(&[("xl/worksheets/sheet1.xml", sheet)]);
        let text = extract_xlsx(&bytes).unwrap();
        assert_eq!(text, "42");
    }

    #[test]
    fn test_xlsx_ignores_out_of_range_shared_index() {
        let shared = "<sst><si><t>only</t></si></sst>";
        let sheet = "<worksheet><sheetData><row><c t=\"s\"><v>9</v></c></row></sheetData></worksheet>";
        let bytes = zip_with_entries(&[
            ("xl/sharedStrings.xml", shared),
            ("xl/worksheets/sheet1.xml", sheet),
        ]);
        let text = extract_xlsx(&bytes).unwrap();
        assert!(text.is_empty());
    }

    #[test]
    fn test_pdf_rejects_garbage() {
        assert!(extract_pdf(b"not a pdf at all").is_err());
    }
}
