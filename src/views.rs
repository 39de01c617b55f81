//! HTML rendering. Every function here is pure: data in, markup out.

use std::fmt::Write;
use std::sync::LazyLock;

use axum::http::StatusCode;
use regex::Regex;
use url::Url;

use crate::db::models::{Entry, NewEntry};
use crate::middleware::session::Flash;

static PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\r\n|\r|\n){2,}").expect("valid paragraph regex"));

/// What every page needs besides its own content.
#[derive(Debug, Default)]
pub struct PageContext {
    pub logged_in: bool,
    pub flashes: Vec<Flash>,
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Blank-line separated blocks become paragraphs, remaining newlines become `<br>`.
pub fn nl2br(value: &str) -> String {
    PARAGRAPH_RE
        .split(&escape(value))
        .map(|p| format!("<p>{}</p>", p.replace('\n', "<br>\n")))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Only absolute http(s) URLs are rendered as links.
fn link_target(raw: &str) -> Option<Url> {
    Url::parse(raw.trim())
        .ok()
        .filter(|u| matches!(u.scheme(), "http" | "https"))
}

fn layout(ctx: &PageContext, title: &str, body: &str) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<!doctype html>\n<html>\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n",
        escape(title)
    );
    html.push_str("<nav><a href=\"/\">Recipes</a> <a href=\"/search\">Tags</a>");
    if ctx.logged_in {
        html.push_str(" <a href=\"/add\">Add recipe</a> <a href=\"/logout\">Log out</a>");
    } else {
        html.push_str(" <a href=\"/login\">Log in</a>");
    }
    html.push_str("</nav>\n");
    html.push_str(&search_form(""));
    for flash in &ctx.flashes {
        let _ = writeln!(
            html,
            "<div class=\"flash {}\">{}</div>",
            flash.category.as_str(),
            escape(&flash.message)
        );
    }
    let _ = write!(html, "<h1>{}</h1>\n{}\n</body>\n</html>\n", escape(title), body);
    html
}

fn search_form(value: &str) -> String {
    format!(
        "<form method=\"post\" action=\"/search\"><input name=\"search_query\" value=\"{}\"> <button type=\"submit\">Search</button></form>\n",
        escape(value)
    )
}

fn tag_links(tags: &str) -> String {
    tags.split(' ')
        .filter(|t| !t.is_empty())
        .map(|t| {
            format!(
                "<a class=\"tag\" href=\"/search/{}\">{}</a>",
                url::form_urlencoded::byte_serialize(t.as_bytes()).collect::<String>(),
                escape(t)
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn show_entries(ctx: &PageContext, entries: &[Entry]) -> String {
    let mut body = String::new();
    if entries.is_empty() {
        body.push_str("<p><em>No recipes here so far.</em></p>");
    } else {
        body.push_str("<ul class=\"entries\">\n");
        for e in entries {
            let _ = writeln!(
                body,
                "<li><a href=\"/view/{}\">{}</a> {}</li>",
                e.id,
                escape(&e.title),
                tag_links(&e.tags)
            );
        }
        body.push_str("</ul>");
    }
    layout(ctx, "Recipes", &body)
}

pub fn view_entry(ctx: &PageContext, entries: &[Entry]) -> String {
    let Some(e) = entries.first() else {
        return layout(ctx, "Recipe", "<p><em>No such recipe.</em></p>");
    };
    let mut body = String::new();
    let _ = write!(
        body,
        "<h2>Ingredients</h2>\n{}\n<h2>Steps</h2>\n{}\n<p class=\"tags\">{}</p>\n",
        nl2br(&e.ingredients),
        nl2br(&e.steps),
        tag_links(&e.tags)
    );
    match link_target(&e.url) {
        Some(url) => {
            let href = escape(url.as_str());
            let _ = writeln!(body, "<p>Source: <a href=\"{href}\">{href}</a></p>");
        }
        None if !e.url.trim().is_empty() => {
            let _ = writeln!(body, "<p>Source: {}</p>", escape(&e.url));
        }
        None => {}
    }
    if ctx.logged_in {
        let _ = write!(
            body,
            "<p><a href=\"/edit/{id}\">Edit</a> <a href=\"/delete/{id}\">Delete</a></p>",
            id = e.id
        );
    }
    layout(ctx, &e.title, &body)
}

fn entry_form(action: &str, entry: &NewEntry, submit: &str) -> String {
    format!(
        "<form method=\"post\" action=\"{action}\">\n\
         <label>Title <input name=\"title\" value=\"{title}\"></label>\n\
         <label>Ingredients <textarea name=\"ingredients\">{ingredients}</textarea></label>\n\
         <label>Steps <textarea name=\"steps\">{steps}</textarea></label>\n\
         <label>Tags <input name=\"tags\" value=\"{tags}\"></label>\n\
         <label>URL <input name=\"url\" value=\"{url}\"></label>\n\
         <button type=\"submit\">{submit}</button>\n</form>",
        action = escape(action),
        title = escape(&entry.title),
        ingredients = escape(&entry.ingredients),
        steps = escape(&entry.steps),
        tags = escape(&entry.tags),
        url = escape(&entry.url),
        submit = escape(submit),
    )
}

pub fn add_entry(ctx: &PageContext) -> String {
    layout(
        ctx,
        "New recipe",
        &entry_form("/add", &NewEntry::default(), "Share"),
    )
}

pub fn edit_entry(ctx: &PageContext, entries: &[Entry]) -> String {
    match entries.first() {
        Some(e) => {
            let action = format!("/edit/{}", e.id);
            let form = entry_form(&action, &NewEntry::from(e.clone()), "Save");
            layout(ctx, &format!("Edit {}", e.title), &form)
        }
        None => layout(ctx, "Edit recipe", "<p><em>No such recipe.</em></p>"),
    }
}

pub fn tag_list(ctx: &PageContext, tags: &[String]) -> String {
    let mut body = String::from("<ul class=\"tags\">\n");
    for tag in tags {
        let _ = writeln!(body, "<li>{}</li>", tag_links(tag));
    }
    body.push_str("</ul>");
    layout(ctx, "Tags", &body)
}

pub fn login_form(ctx: &PageContext) -> String {
    let body = "<form method=\"post\" action=\"/login\">\n\
                <label>Username <input name=\"username\"></label>\n\
                <label>Password <input type=\"password\" name=\"password\"></label>\n\
                <button type=\"submit\">Log in</button>\n</form>";
    layout(ctx, "Log in", body)
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let title = status.canonical_reason().unwrap_or("Error");
    layout(
        &PageContext::default(),
        &format!("{} {}", status.as_u16(), title),
        &format!("<p>{}</p>", escape(message)),
    )
}
