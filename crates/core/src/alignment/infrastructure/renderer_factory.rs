use std::fmt;
use std::str::FromStr;

use crate::alignment::domain::diff_renderer::DiffRenderer;

use super::ansi_renderer::AnsiRenderer;
use super::html_renderer::HtmlRenderer;
use super::plain_renderer::PlainRenderer;

/// Markup flavor for rendered diffs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkupFormat {
    Html,
    Ansi,
    Plain,
}

impl fmt::Display for MarkupFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkupFormat::Html => write!(f, "html"),
            MarkupFormat::Ansi => write!(f, "ansi"),
            MarkupFormat::Plain => write!(f, "plain"),
        }
    }
}

impl FromStr for MarkupFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(MarkupFormat::Html),
            "ansi" => Ok(MarkupFormat::Ansi),
            "plain" => Ok(MarkupFormat::Plain),
            other => Err(format!(
                "Markup format must be one of: html, ansi, plain, got '{other}'"
            )),
        }
    }
}

pub fn create_renderer(format: MarkupFormat) -> Box<dyn DiffRenderer> {
    log::debug!("Using {format} diff renderer");
    match format {
        MarkupFormat::Html => Box::new(HtmlRenderer::new()),
        MarkupFormat::Ansi => Box::new(AnsiRenderer::new()),
        MarkupFormat::Plain => Box::new(PlainRenderer::new()),
    }
}
