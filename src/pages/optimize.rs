//! Optimize page: rewrite content for citation likelihood.

use std::fmt;

use super::{describe_error, disabled_attr, escape_html, render_error, render_submit};
use crate::api::{AieoApi, OptimizeRequest};
use crate::models::{OptimizeResult, format_score};

pub const MISSING_CONTENT: &str = "Please provide content to optimize";

/// How far the optimizer may stray from the original voice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OptimizeStyle {
    #[default]
    Preserve,
    Aggressive,
}

impl OptimizeStyle {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "preserve" => Some(Self::Preserve),
            "aggressive" => Some(Self::Aggressive),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Preserve => "preserve",
            Self::Aggressive => "aggressive",
        }
    }
}

impl fmt::Display for OptimizeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Default)]
pub struct OptimizePage {
    content: String,
    style: OptimizeStyle,
    loading: bool,
    result: Option<OptimizeResult>,
    error: Option<String>,
}

impl OptimizePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn set_style(&mut self, style: OptimizeStyle) {
        self.style = style;
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn style(&self) -> OptimizeStyle {
        self.style
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn result(&self) -> Option<&OptimizeResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Submit the form. Blank content is rejected locally without a request.
    pub fn submit(&mut self, api: &impl AieoApi) {
        if self.loading {
            return;
        }
        self.error = None;
        self.result = None;

        if self.content.trim().is_empty() {
            self.error = Some(MISSING_CONTENT.to_string());
            return;
        }

        let request = OptimizeRequest {
            content: self.content.clone(),
            style: Some(self.style.to_string()),
            ..OptimizeRequest::default()
        };

        self.loading = true;
        match api.optimize(&request) {
            Ok(result) => self.result = Some(result),
            Err(err) => self.error = Some(describe_error(&err)),
        }
        self.loading = false;
    }

    pub fn render(&self) -> String {
        let mut html = String::from(
            r#"<div class="optimize-page">
<h1>Optimize Content</h1>
<p>Apply AIEO patterns to improve your content's citation likelihood</p>
"#,
        );

        let disabled = disabled_attr(self.loading);
        let option = |style: OptimizeStyle, label: &str| {
            let selected = if self.style == style { " selected" } else { "" };
            format!(r#"<option value="{style}"{selected}>{label}</option>"#)
        };

        html.push_str(&format!(
            r#"<form method="post" action="/optimize" class="optimize-form">
<div class="form-group">
<label for="content">Content</label>
<textarea id="content" name="content" rows="15" placeholder="Paste your content here..."{disabled}>{content}</textarea>
</div>
<div class="form-group">
<label for="style">Style</label>
<select id="style" name="style"{disabled}>
{preserve}
{aggressive}
</select>
</div>
{submit}
</form>
"#,
            content = escape_html(&self.content),
            preserve = option(OptimizeStyle::Preserve, "Preserve original style"),
            aggressive = option(OptimizeStyle::Aggressive, "Aggressive optimization"),
            submit = render_submit(self.loading, "Optimize Content", "Optimizing..."),
        ));

        if let Some(error) = &self.error {
            html.push_str(&render_error(error));
            html.push('\n');
        }

        if let Some(result) = &self.result {
            html.push_str(&format!(
                r#"<div class="optimize-result">
<h2>Optimization Results</h2>
<div class="score-comparison">
<div class="score-before"><div class="score-label">Before</div><div class="score-value">{before}</div></div>
<div class="score-arrow">&rarr;</div>
<div class="score-after"><div class="score-label">After</div><div class="score-value">{after}</div></div>
<div class="score-uplift">+{uplift} points</div>
</div>
"#,
                before = format_score(result.score_before),
                after = format_score(result.score_after),
                uplift = format_score(result.uplift),
            ));

            if !result.changes.is_empty() {
                html.push_str("<div class=\"changes\">\n<h3>Changes</h3>\n<ul>\n");
                for change in &result.changes {
                    html.push_str(&format!(
                        "<li><strong>{}</strong>: {}</li>\n",
                        escape_html(&change.kind),
                        escape_html(&change.description)
                    ));
                }
                html.push_str("</ul>\n</div>\n");
            }

            if !result.optimized_content.is_empty() {
                html.push_str(&format!(
                    "<div class=\"optimized-content\">\n<h3>Optimized Content</h3>\n<pre>{}</pre>\n</div>\n",
                    escape_html(&result.optimized_content)
                ));
            }
            html.push_str("</div>\n");
        }

        html.push_str("</div>\n");
        html
    }
}
