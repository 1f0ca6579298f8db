use std::path::Path;

use anyhow::{Context, Result};

use crate::common;
use super::Figure;

const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

impl Figure<'_> {
    /// Standalone page that loads plotly.js and draws the figure.
    pub fn to_html_string(&self) -> Result<String> {
        let figure = serde_json::to_string(&self.to_plotly_json())
            .context("Failed to serialize figure")?
            // Keep "</script>" inside string values from closing the script element
            .replace("</", "<\\/");

        Ok(format!(r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{PLOTLY_JS}"></script>
</head>
<body style="margin:0">
<h1 style="text-align:center;font-family:sans-serif">U.S. Grain Production Dashboard</h1>
<div id="production-map" style="height:85vh"></div>
<script>
const figure = {figure};
Plotly.newPlot("production-map", figure.data, figure.layout, {{ responsive: true }});
</script>
</body>
</html>
"#, title = escape(&self.title)))
    }

    pub fn write_html(&self, path: &Path) -> Result<()> {
        common::write_atomic(path, self.to_html_string()?.as_bytes())
    }
}

/// Escape text for HTML and XML content.
pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
