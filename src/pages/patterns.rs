//! Pattern library: loads on open.

use super::{Load, describe_error_or, escape_html, render_error};
use crate::api::AieoApi;
use crate::models::{Pattern, format_score};

pub const LOAD_FAILED: &str = "Failed to load patterns";

pub const EMPTY_MESSAGE: &str = "No patterns available yet. Patterns will be displayed here.";

#[derive(Debug)]
pub struct PatternsPage {
    state: Load<Vec<Pattern>>,
}

impl Default for PatternsPage {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternsPage {
    pub fn new() -> Self {
        Self {
            state: Load::Loading,
        }
    }

    pub fn mount(api: &impl AieoApi) -> Self {
        let mut page = Self::new();
        page.load(api);
        page
    }

    pub fn load(&mut self, api: &impl AieoApi) {
        self.state = match api.list_patterns() {
            Ok(list) => Load::Ready(list.patterns),
            Err(err) => Load::Failed(describe_error_or(&err, LOAD_FAILED)),
        };
    }

    pub fn state(&self) -> &Load<Vec<Pattern>> {
        &self.state
    }

    pub fn render(&self) -> String {
        let patterns = match &self.state {
            Load::Loading => return "<div class=\"patterns-page\">Loading...</div>\n".to_string(),
            Load::Failed(message) => {
                return format!("<div class=\"patterns-page\">\n{}\n</div>\n", render_error(message));
            }
            Load::Ready(patterns) => patterns,
        };

        let mut html = String::from(
            r#"<div class="patterns-page">
<h1>AIEO Pattern Library</h1>
<p>Browse proven patterns that increase citation likelihood</p>
"#,
        );

        if patterns.is_empty() {
            html.push_str(&format!("<div class=\"no-patterns\"><p>{EMPTY_MESSAGE}</p></div>\n"));
        } else {
            html.push_str("<div class=\"patterns-grid\">\n");
            for pattern in patterns {
                html.push_str(&render_card(pattern));
            }
            html.push_str("</div>\n");
        }

        html.push_str("</div>\n");
        html
    }
}

fn render_card(pattern: &Pattern) -> String {
    let mut card = format!(
        "<div class=\"pattern-card\" id=\"{}\">\n<h3>{}</h3>\n<span class=\"pattern-category\">{}</span>\n<p class=\"pattern-description\">{}</p>\n",
        escape_html(&pattern.id),
        escape_html(&pattern.name),
        escape_html(&pattern.category),
        escape_html(&pattern.description),
    );
    if let Some(boost) = &pattern.citation_boost {
        card.push_str(&format!(
            "<div class=\"pattern-boost\">Citation boost: {}% - {}%</div>\n",
            format_score(boost.min),
            format_score(boost.max)
        ));
    }
    card.push_str("</div>\n");
    card
}
