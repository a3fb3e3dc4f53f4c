//! Route table and the persistent navigation shell.

use crate::pages::escape_html;

/// Every page the shell can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Audit,
    Optimize,
    Dashboard,
    Patterns,
}

/// Links in the top bar, in display order. Home is reached via the logo.
pub const NAV_ROUTES: [Route; 4] = [Route::Audit, Route::Optimize, Route::Dashboard, Route::Patterns];

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Audit => "/audit",
            Self::Optimize => "/optimize",
            Self::Dashboard => "/dashboard",
            Self::Patterns => "/patterns",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Audit => "Audit",
            Self::Optimize => "Optimize",
            Self::Dashboard => "Dashboard",
            Self::Patterns => "Patterns",
        }
    }

    /// Resolve a request URL (query string ignored). A single trailing slash
    /// is tolerated.
    pub fn from_path(url: &str) -> Option<Self> {
        let path = url.split('?').next().unwrap_or(url);
        let path = match path.strip_suffix('/') {
            Some(trimmed) if !trimmed.is_empty() => trimmed,
            _ => path,
        };
        match path {
            "/" | "/index.html" => Some(Self::Home),
            "/audit" => Some(Self::Audit),
            "/optimize" => Some(Self::Optimize),
            "/dashboard" => Some(Self::Dashboard),
            "/patterns" => Some(Self::Patterns),
            _ => None,
        }
    }
}

/// Render the top navigation bar, marking the link for `current` active.
pub fn render_nav(current: Option<Route>) -> String {
    let mut links = String::new();
    for route in NAV_ROUTES {
        let class = if Some(route) == current { " class=\"active\"" } else { "" };
        links.push_str(&format!(
            "<a href=\"{}\"{class}>{}</a>\n",
            route.path(),
            route.label()
        ));
    }

    format!(
        r#"<nav class="navbar">
<div class="nav-container">
<a href="/" class="nav-logo">AIEO</a>
<div class="nav-links">
{links}</div>
</div>
</nav>
"#
    )
}

/// Wrap a page body in the full document with the navigation bar.
pub fn render_layout(current: Option<Route>, title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} - AIEO</title>
<style>{STYLESHEET}</style>
</head>
<body>
<div class="layout">
{nav}<main class="main-content">
{body}</main>
</div>
</body>
</html>
"#,
        title = escape_html(title),
        nav = render_nav(current),
    )
}

const STYLESHEET: &str = r#"
:root {
  --bg: #0d1117;
  --surface: #161b22;
  --border: #30363d;
  --text: #e6edf3;
  --text-muted: #8b949e;
  --accent: #58a6ff;
  --green: #3fb950;
  --red: #f85149;
  --radius: 8px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
  --mono: 'SF Mono', 'Cascadia Code', 'Fira Code', monospace;
}
* { margin: 0; padding: 0; box-sizing: border-box; }
body { background: var(--bg); color: var(--text); font-family: var(--font); font-size: 14px; line-height: 1.5; }
a { color: var(--accent); text-decoration: none; }
.navbar { background: var(--surface); border-bottom: 1px solid var(--border); }
.nav-container { max-width: 1100px; margin: 0 auto; padding: 12px 24px; display: flex; align-items: center; justify-content: space-between; }
.nav-logo { font-family: var(--mono); font-weight: 700; font-size: 18px; }
.nav-links a { color: var(--text-muted); margin-left: 20px; }
.nav-links a.active { color: var(--text); border-bottom: 2px solid var(--accent); }
.main-content { max-width: 1100px; margin: 0 auto; padding: 24px; }
h1 { font-size: 24px; margin-bottom: 8px; }
h2 { font-size: 18px; margin: 16px 0 8px; }
.form-group { margin: 16px 0; display: flex; flex-direction: column; gap: 6px; }
input, textarea, select { background: var(--surface); color: var(--text); border: 1px solid var(--border); border-radius: var(--radius); padding: 8px; font-family: var(--font); }
textarea, pre { font-family: var(--mono); }
.form-divider { color: var(--text-muted); text-align: center; }
.btn { display: inline-block; border: none; border-radius: var(--radius); padding: 8px 16px; cursor: pointer; }
.btn-primary { background: var(--accent); color: var(--bg); }
.btn-secondary { background: var(--surface); color: var(--text); border: 1px solid var(--border); }
.btn[disabled] { opacity: 0.5; cursor: wait; }
.error-message { margin: 16px 0; padding: 12px; border: 1px solid var(--red); border-radius: var(--radius); color: var(--red); }
.score-value { font-size: 48px; font-weight: 700; color: var(--green); }
.score-comparison { display: flex; align-items: center; gap: 24px; }
.patterns-grid, .features, .engine-stats { display: grid; grid-template-columns: repeat(auto-fill, minmax(240px, 1fr)); gap: 16px; }
.pattern-card, .feature, .engine-stat, .dashboard-section { background: var(--surface); border: 1px solid var(--border); border-radius: var(--radius); padding: 16px; margin-bottom: 16px; }
.pattern-category, .placeholder, .citation-count { color: var(--text-muted); }
pre { white-space: pre-wrap; background: var(--surface); padding: 12px; border-radius: var(--radius); }
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_path_resolves_routes() {
        assert_eq!(Route::from_path("/"), Some(Route::Home));
        assert_eq!(Route::from_path("/audit"), Some(Route::Audit));
        assert_eq!(Route::from_path("/audit/"), Some(Route::Audit));
        assert_eq!(Route::from_path("/patterns?x=1"), Some(Route::Patterns));
        assert_eq!(Route::from_path("/nope"), None);
    }

    #[test]
    fn every_route_round_trips_through_its_path() {
        for route in [Route::Home, Route::Audit, Route::Optimize, Route::Dashboard, Route::Patterns] {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
    }

    #[test]
    fn nav_marks_only_current_route_active() {
        let nav = render_nav(Some(Route::Dashboard));
        assert!(nav.contains(r#"<a href="/dashboard" class="active">Dashboard</a>"#));
        assert_eq!(nav.matches("class=\"active\"").count(), 1);
    }

    #[test]
    fn nav_on_home_has_no_active_link() {
        assert!(!render_nav(Some(Route::Home)).contains("active"));
        assert!(!render_nav(None).contains("active"));
    }

    #[test]
    fn layout_escapes_title() {
        let html = render_layout(None, "<x>", "<p>body</p>");
        assert!(html.contains("<title>&lt;x&gt; - AIEO</title>"));
        assert!(html.contains("<p>body</p>"));
    }
}
