//! Document and web-page ingestion: extension dispatch into per-format
//! text extraction, plus URL fetching.

pub mod extract;
pub mod html;

use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Supported upload formats, dispatched by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Text,
    Word,
    Excel,
    PowerPoint,
    Pdf,
}

impl SourceFormat {
    /// Map a lowercased file extension (without the dot) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "txt" => Some(Self::Text),
            "docx" => Some(Self::Word),
            "xlsx" => Some(Self::Excel),
            "pptx" => Some(Self::PowerPoint),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }
}

/// Lowercased extension of a filename, without the dot.
pub fn file_extension(filename: &str) -> String {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default()
}

/// Extract plain text from an uploaded file's bytes.
pub fn extract_file_text(bytes: &[u8], format: SourceFormat) -> Result<String> {
    match format {
        SourceFormat::Text => {
            let text = std::str::from_utf8(bytes).context("File is not valid UTF-8 text")?;
            Ok(text.to_string())
        }
        SourceFormat::Word => extract::extract_docx(bytes),
        SourceFormat::Excel => extract::extract_xlsx(bytes),
        SourceFormat::PowerPoint => extract::extract_pptx(bytes),
        SourceFormat::Pdf => extract::extract_pdf(bytes),
    }
}

/// Fetch a URL and extract the page text.
///
/// The scheme check runs before any network traffic. Failures come back
/// as one error per URL; the handler collects them rather than aborting
/// the batch.
pub async fn fetch_url_text(
    client: &reqwest::Client,
    url: &str,
    timeout_secs: u64,
) -> Result<String> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        bail!("Invalid URL '{url}': no scheme supplied. Perhaps you meant 'https://{url}'?");
    }

    let resp = client
        .get(url)
        .timeout(Duration::from_secs(timeout_secs))
        .send()
        .await
        .with_context(|| format!("Error fetching URL '{url}'"))?;

    let status = resp.status();
    if !status.is_success() {
        bail!("Error fetching URL '{url}': status code {}", status.as_u16());
    }

    let body = resp
        .text()
        .await
        .with_context(|| format!("Error reading body of URL '{url}'"))?;

    Ok(html::extract_page_text(&body))
}
