// src/render/mod.rs
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::{
    fs,
    io::Write,
    path::Path,
};
use tracing::{debug, info};

/// Display surface receiving report blocks in order.
pub trait RenderSink {
    /// Append one block. Empty content is ignored.
    fn append(&mut self, content: &str, category: Option<&str>);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub category: Option<String>,
    pub content: String,
}

/// In-memory HTML page, flushed to disk with [`HtmlPage::write_to`].
#[derive(Debug, Clone)]
pub struct HtmlPage {
    title: String,
    blocks: Vec<Block>,
    created: DateTime<Utc>,
}

impl HtmlPage {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            blocks: Vec::new(),
            created: Utc::now(),
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Full document with every block inside `<div id="app">`.
    pub fn render(&self) -> String {
        let mut body = String::new();
        for b in &self.blocks {
            match &b.category {
                Some(c) => body.push_str(&format!("<div class=\"{}\">{}</div>\n", c, b.content)),
                None => body.push_str(&format!("<div>{}</div>\n", b.content)),
            }
        }
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n\
             <meta name=\"generated\" content=\"{}\">\n</head>\n<body>\n<div id=\"app\">\n{}</div>\n</body>\n</html>\n",
            self.title,
            self.created.to_rfc3339(),
            body
        )
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output directory {:?}", parent))?;
        }
        fs::write(path, self.render())
            .with_context(|| format!("writing page to {:?}", path))?;
        info!(path = %path.display(), blocks = self.blocks.len(), "wrote page");
        Ok(())
    }
}

impl RenderSink for HtmlPage {
    fn append(&mut self, content: &str, category: Option<&str>) {
        if content.is_empty() {
            return;
        }
        debug!(?category, "appending block");
        self.blocks.push(Block {
            category: category.map(str::to_string),
            content: content.to_string(),
        });
    }
}

/// Plain-text sink, one block per line, for terminals and logs.
pub struct TextSink<W: Write> {
    out: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderSink for TextSink<W> {
    fn append(&mut self, content: &str, category: Option<&str>) {
        if content.is_empty() {
            return;
        }
        let line = match category {
            Some(c) => format!("[{}] {}", c, content),
            None => content.to_string(),
        };
        // the sink contract has no error channel
        if let Err(e) = writeln!(self.out, "{}", line) {
            tracing::warn!(error = %e, "text sink write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_html_page_blocks_in_order() {
        let mut page = HtmlPage::new("Film Permits");
        page.append("first", Some("header"));
        page.append("", Some("ignored"));
        page.append("second", None);

        assert_eq!(page.blocks().len(), 2);
        let html = page.render();
        let a = html.find("<div class=\"header\">first</div>").unwrap();
        let b = html.find("<div>second</div>").unwrap();
        assert!(a < b);
        assert!(html.contains("<div id=\"app\">"));
        assert!(html.contains("<title>Film Permits</title>"));
    }

    #[test]
    fn test_html_page_write_to() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("out").join("index.html");
        let mut page = HtmlPage::new("t");
        page.append("hello", Some("borough"));
        page.write_to(&path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("<div class=\"borough\">hello</div>"));
    }

    #[test]
    fn test_text_sink() {
        let mut sink = TextSink::new(Vec::new());
        sink.append("a", Some("header"));
        sink.append("", None);
        sink.append("b", None);
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "[header] a\nb\n");
    }
}
