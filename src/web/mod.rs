//! Embedded web UI for aieo.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that renders
//! the five pages inside the navigation shell:
//! - `/` home, `/audit`, `/optimize` (forms, `GET` shows, `POST` submits)
//! - `/dashboard`, `/patterns` (load their data on every `GET`)
//!
//! Launched via `aieo web` (default: `http://127.0.0.1:8740`).

pub mod shell;

use std::collections::HashMap;
use std::io::{Cursor, Read};

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::api::AieoApi;
use crate::pages::{
    AuditPage, DashboardPage, HomePage, OptimizePage, OptimizeStyle, PatternsPage, escape_html,
};
use shell::Route;

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the web UI server on the given address.
///
/// Blocks the current thread. Requests are handled one at a time, so each
/// page has at most one backend call in flight.
pub fn serve(addr: &str, api: &impl AieoApi, open: bool) -> Result<()> {
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    println!("aieo web UI running at http://{addr}");
    println!("Press Ctrl+C to stop.\n");

    if open {
        // Best-effort
        let _ = open_browser(&format!("http://{addr}"));
    }

    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        let reply = if matches!(method, Method::Post) {
            match read_form_body(request.as_reader()) {
                Ok(body) => dispatch(api, &method, &url, Some(&body)),
                Err(reply) => reply,
            }
        } else {
            dispatch(api, &method, &url, None)
        };
        let status = reply.status;
        let _ = request.respond(reply.into_response());

        // Brief access log
        println!(
            "{} {} {} {}",
            method,
            url,
            status,
            chrono::Local::now().format("%H:%M:%S")
        );
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// A rendered HTML page and its status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    fn page(route: Route, body: String) -> Self {
        Self {
            status: 200,
            body: shell::render_layout(Some(route), route.label(), &body),
        }
    }

    fn not_found() -> Self {
        Self {
            status: 404,
            body: shell::render_layout(
                None,
                "Not Found",
                "<div class=\"not-found\"><h1>Page not found</h1><p><a href=\"/\">Back to home</a></p></div>\n",
            ),
        }
    }

    fn bad_request(message: &str) -> Self {
        Self {
            status: 400,
            body: shell::render_layout(
                None,
                "Bad Request",
                &format!(
                    "<div class=\"error-message\"><strong>Error:</strong> {}</div>\n",
                    escape_html(message)
                ),
            ),
        }
    }

    fn method_not_allowed(route: Route) -> Self {
        Self {
            status: 405,
            body: shell::render_layout(
                Some(route),
                route.label(),
                "<div class=\"error-message\"><strong>Error:</strong> Method not allowed</div>\n",
            ),
        }
    }

    pub fn into_response(self) -> Response<Cursor<Vec<u8>>> {
        Response::from_data(self.body.into_bytes())
            .with_header(content_type_html())
            .with_status_code(StatusCode(self.status))
    }
}

/// Dispatch an incoming request to the page that owns its route.
pub fn dispatch(api: &impl AieoApi, method: &Method, url: &str, body: Option<&str>) -> Reply {
    let Some(route) = Route::from_path(url) else {
        return Reply::not_found();
    };

    match (method, route) {
        (&Method::Get, Route::Home) => Reply::page(route, HomePage.render()),

        (&Method::Get, Route::Audit) => Reply::page(route, AuditPage::new().render()),
        (&Method::Post, Route::Audit) => {
            let form = parse_form(body.unwrap_or_default());
            let mut page = AuditPage::new();
            match form.get("url").filter(|u| !u.trim().is_empty()) {
                Some(url) => page.set_url(url.as_str()),
                None => page.set_content(form.get("content").cloned().unwrap_or_default()),
            }
            page.submit(api);
            Reply::page(route, page.render())
        }

        (&Method::Get, Route::Optimize) => Reply::page(route, OptimizePage::new().render()),
        (&Method::Post, Route::Optimize) => {
            let form = parse_form(body.unwrap_or_default());
            let mut page = OptimizePage::new();
            page.set_content(form.get("content").cloned().unwrap_or_default());
            if let Some(style) = form.get("style").and_then(|s| OptimizeStyle::parse(s)) {
                page.set_style(style);
            }
            page.submit(api);
            Reply::page(route, page.render())
        }

        (&Method::Get, Route::Dashboard) => Reply::page(route, DashboardPage::mount(api).render()),
        (&Method::Get, Route::Patterns) => Reply::page(route, PatternsPage::mount(api).render()),

        _ => Reply::method_not_allowed(route),
    }
}

/// Read a request body as UTF-8 text, or a 400 reply when it cannot be read.
fn read_form_body(reader: &mut dyn Read) -> Result<String, Reply> {
    let mut buf = String::new();
    reader
        .read_to_string(&mut buf)
        .map(|_| buf)
        .map_err(|_| Reply::bad_request("Request body could not be read as UTF-8 form data"))
}

/// Decode an `application/x-www-form-urlencoded` body. Later duplicates win.
fn parse_form(body: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(body.as_bytes())
        .into_owned()
        .collect()
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// HTML content type header.
fn content_type_html() -> Header {
    Header::from_bytes("Content-Type", "text/html; charset=utf-8")
        .expect("static header is valid")
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_form_decodes_pairs() {
        let form = parse_form("url=https%3A%2F%2Fx.com&content=a+b%26c");
        assert_eq!(form["url"], "https://x.com");
        assert_eq!(form["content"], "a b&c");
    }

    #[test]
    fn invalid_utf8_body_is_bad_request() {
        let mut reader = Cursor::new(vec![b'u', b'r', b'l', b'=', 0xff, 0xfe]);
        let reply = read_form_body(&mut reader).unwrap_err();
        assert_eq!(reply.status, 400);
        assert!(reply.body.contains("could not be read"));
    }

    #[test]
    fn utf8_body_is_read() {
        let mut reader = Cursor::new(b"content=%23+Draft".to_vec());
        assert_eq!(read_form_body(&mut reader).unwrap(), "content=%23+Draft");
    }

    #[test]
    fn parse_form_empty_body() {
        assert!(parse_form("").is_empty());
    }
}
