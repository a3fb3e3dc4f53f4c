//! Audit page: score a URL or pasted markdown.

use super::{describe_error, disabled_attr, escape_html, render_error, render_submit};
use crate::api::{AieoApi, AuditRequest};
use crate::models::{AuditResult, Gap, format_score};

/// Gaps shown per audit, most important first.
pub const MAX_VISIBLE_GAPS: usize = 5;

pub const MISSING_INPUT: &str = "Please provide either a URL or content";

/// Form state for the audit page.
///
/// `url` and `content` are mutually exclusive: setting one clears the other.
#[derive(Debug, Default)]
pub struct AuditPage {
    url: String,
    content: String,
    loading: bool,
    result: Option<AuditResult>,
    error: Option<String>,
}

impl AuditPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
        self.content.clear();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.url.clear();
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn result(&self) -> Option<&AuditResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The gaps the page displays: at most [`MAX_VISIBLE_GAPS`].
    pub fn visible_gaps(&self) -> &[Gap] {
        self.result
            .as_ref()
            .map(|r| &r.gaps[..r.gaps.len().min(MAX_VISIBLE_GAPS)])
            .unwrap_or(&[])
    }

    /// Build the request body; URL wins over content. `None` when both
    /// fields are blank.
    fn build_request(&self) -> Option<AuditRequest> {
        if !self.url.trim().is_empty() {
            Some(AuditRequest::for_url(self.url.trim()))
        } else if !self.content.trim().is_empty() {
            Some(AuditRequest::for_markdown(self.content.as_str()))
        } else {
            None
        }
    }

    /// Submit the form. Blank input is rejected locally without a request.
    pub fn submit(&mut self, api: &impl AieoApi) {
        if self.loading {
            return;
        }
        self.error = None;
        self.result = None;

        let Some(request) = self.build_request() else {
            self.error = Some(MISSING_INPUT.to_string());
            return;
        };

        self.loading = true;
        match api.audit(&request) {
            Ok(result) => self.result = Some(result),
            Err(err) => self.error = Some(describe_error(&err)),
        }
        self.loading = false;
    }

    pub fn render(&self) -> String {
        let mut html = String::from(
            r#"<div class="audit-page">
<h1>Audit Content</h1>
<p>Get an AIEO score and identify gaps in your content</p>
"#,
        );

        let disabled = disabled_attr(self.loading);
        html.push_str(&format!(
            r#"<form method="post" action="/audit" class="audit-form">
<div class="form-group">
<label for="url">URL (optional)</label>
<input id="url" name="url" type="url" value="{url}" placeholder="https://example.com/article" oninput="document.getElementById('content').value=''"{disabled}>
</div>
<div class="form-divider">OR</div>
<div class="form-group">
<label for="content">Content</label>
<textarea id="content" name="content" rows="10" placeholder="Paste your markdown content here..." oninput="document.getElementById('url').value=''"{disabled}>{content}</textarea>
</div>
{submit}
</form>
"#,
            url = escape_html(&self.url),
            content = escape_html(&self.content),
            submit = render_submit(self.loading, "Audit Content", "Auditing..."),
        ));

        if let Some(error) = &self.error {
            html.push_str(&render_error(error));
            html.push('\n');
        }

        if let Some(result) = &self.result {
            html.push_str(&self.render_result(result));
        }

        html.push_str("</div>\n");
        html
    }

    fn render_result(&self, result: &AuditResult) -> String {
        let mut html = format!(
            r#"<div class="audit-result">
<h2>Audit Results</h2>
<div class="score-display">
<div class="score-value">{}</div>
<div class="score-grade">Grade: {}</div>
</div>
"#,
            format_score(result.score),
            escape_html(&result.grade),
        );

        if let Some(benchmark) = &result.benchmark {
            html.push_str(&format!(
                "<p class=\"benchmark\">Percentile: {}</p>\n",
                format_score(benchmark.percentile)
            ));
        }

        let gaps = self.visible_gaps();
        if !gaps.is_empty() {
            html.push_str("<div class=\"gaps-section\">\n<h3>Gaps Found</h3>\n<ul>\n");
            for gap in gaps {
                html.push_str(&format!(
                    "<li><strong>{}</strong> ({}): {}",
                    escape_html(&gap.category),
                    gap.severity,
                    escape_html(&gap.description),
                ));
                if let Some(fix) = &gap.example_fix {
                    html.push_str(&format!(
                        "<div class=\"example-fix\">Fix: {}</div>",
                        escape_html(fix)
                    ));
                }
                html.push_str("</li>\n");
            }
            html.push_str("</ul>\n</div>\n");
        }

        html.push_str("</div>\n");
        html
    }
}
