//! Citation dashboard: loads on open.

use super::{Load, describe_error_or, escape_html, render_error};
use crate::api::AieoApi;
use crate::models::DashboardData;

pub const LOAD_FAILED: &str = "Failed to load dashboard";

#[derive(Debug)]
pub struct DashboardPage {
    state: Load<DashboardData>,
}

impl Default for DashboardPage {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardPage {
    pub fn new() -> Self {
        Self {
            state: Load::Loading,
        }
    }

    /// Open the page and fetch its data, as on mount.
    pub fn mount(api: &impl AieoApi) -> Self {
        let mut page = Self::new();
        page.load(api);
        page
    }

    pub fn load(&mut self, api: &impl AieoApi) {
        self.state = match api.dashboard() {
            Ok(data) => Load::Ready(data),
            Err(err) => Load::Failed(describe_error_or(&err, LOAD_FAILED)),
        };
    }

    pub fn state(&self) -> &Load<DashboardData> {
        &self.state
    }

    pub fn render(&self) -> String {
        let data = match &self.state {
            Load::Loading => return "<div class=\"dashboard-page\">Loading...</div>\n".to_string(),
            Load::Failed(message) => {
                return format!("<div class=\"dashboard-page\">\n{}\n</div>\n", render_error(message));
            }
            Load::Ready(data) => data,
        };

        let mut html = String::from(
            r#"<div class="dashboard-page">
<h1>Citation Dashboard</h1>
<p>Track your content's citations across AI engines</p>
<div class="dashboard-content">
"#,
        );

        html.push_str(&format!(
            "<div class=\"dashboard-section\">\n<h2>Total Citations</h2>\n<div class=\"total-citations\">{}</div>\n</div>\n",
            data.total_citations
        ));

        html.push_str("<div class=\"dashboard-section\">\n<h2>Citation Rate (Last 30 Days)</h2>\n");
        if data.citation_trend.is_empty() {
            html.push_str("<p class=\"placeholder\">No citation data for this period yet.</p>\n");
        } else {
            html.push_str("<table class=\"trend\">\n<tr><th>Date</th><th>Citations</th></tr>\n");
            for point in &data.citation_trend {
                html.push_str(&format!(
                    "<tr><td>{}</td><td>{}</td></tr>\n",
                    escape_html(&point.date),
                    point.count
                ));
            }
            html.push_str("</table>\n");
        }
        html.push_str("</div>\n");

        html.push_str("<div class=\"dashboard-section\">\n<h2>By Engine</h2>\n<div class=\"engine-stats\">\n");
        for (engine, count) in &data.citations_by_engine {
            html.push_str(&format!(
                "<div class=\"engine-stat\"><div class=\"engine-name\">{}</div><div class=\"engine-count\">{}</div></div>\n",
                escape_html(engine),
                count
            ));
        }
        html.push_str("</div>\n</div>\n");

        html.push_str("<div class=\"dashboard-section\">\n<h2>Top Cited Pages</h2>\n<ol class=\"cited-pages\">\n");
        for page in &data.top_cited_pages {
            let url = escape_html(&page.url);
            let label = if is_web_url(&page.url) {
                format!("<a href=\"{url}\" target=\"_blank\" rel=\"noopener noreferrer\">{url}</a>")
            } else {
                url
            };
            html.push_str(&format!(
                "<li>{label} <span class=\"citation-count\">{} citations</span></li>\n",
                page.citation_count
            ));
        }
        html.push_str("</ol>\n</div>\n");

        html.push_str("</div>\n</div>\n");
        html
    }
}

/// Only `http`/`https` URLs become links.
fn is_web_url(raw: &str) -> bool {
    url::Url::parse(raw).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}
