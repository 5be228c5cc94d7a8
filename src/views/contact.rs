use askama::Template;
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[a-z0-9._-]+@[a-z0-9._-]+\.[a-z0-9._-]+").unwrap());

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\+[0-9]{1,2}\s?)?\(?[0-9]{3}\)?[\s.-]?[0-9]{3}[\s.-]?[0-9]{4}").unwrap()
});

static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://\S+").unwrap());

static WWW_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"www\.\S+").unwrap());

/// A run of contact text, linked or plain.
struct Piece {
    text: String,
    href: Option<String>,
    new_tab: bool,
}

impl Piece {
    fn plain(text: &str) -> Self {
        Piece {
            text: text.to_string(),
            href: None,
            new_tab: false,
        }
    }
}

#[derive(Template)]
#[template(
    source = r#"{% for piece in pieces %}{% if let Some(href) = piece.href %}<a href="{{ href }}"{% if piece.new_tab %} target="_blank"{% endif %}>{{ piece.text }}</a>{% else %}{{ piece.text }}{% endif %}{% endfor %}"#,
    ext = "html"
)]
struct ContactTemplate<'a> {
    pieces: &'a [Piece],
}

/// Turn free-text contact info into HTML with emails, phone numbers and
/// URLs wrapped in anchors. Everything is HTML-escaped.
///
/// Rules apply in order (http(s) URL, email, bare `www.`, phone) and only
/// to text no earlier rule has already linked, so digits inside a URL or an
/// email never become a phone link.
pub fn format_contact_info(contact: &str) -> String {
    if contact.is_empty() {
        return String::new();
    }

    let mut pieces = vec![Piece::plain(contact)];

    pieces = link_matches(pieces, &URL_RE, |m| (m.to_string(), true));
    pieces = link_matches(pieces, &EMAIL_RE, |m| (format!("mailto:{m}"), false));
    pieces = link_www(pieces);
    pieces = link_matches(pieces, &PHONE_RE, |m| {
        let clean: String = m
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '+')
            .collect();
        (format!("tel:{clean}"), false)
    });

    ContactTemplate { pieces: &pieces }
        .render()
        .unwrap_or_else(|e| {
            tracing::error!("Error rendering contact info: {e}");
            String::new()
        })
}

/// Split every plain piece around the regex's matches, linking each match.
fn link_matches<F>(pieces: Vec<Piece>, re: &Regex, href_for: F) -> Vec<Piece>
where
    F: Fn(&str) -> (String, bool),
{
    let mut out = Vec::with_capacity(pieces.len());
    for piece in pieces {
        if piece.href.is_some() {
            out.push(piece);
            continue;
        }

        let mut last = 0;
        for m in re.find_iter(&piece.text) {
            push_text(&mut out, &piece.text[last..m.start()]);
            let (href, new_tab) = href_for(m.as_str());
            out.push(Piece {
                text: m.as_str().to_string(),
                href: Some(href),
                new_tab,
            });
            last = m.end();
        }
        push_text(&mut out, &piece.text[last..]);
    }
    out
}

/// Bare `www.` hosts get an `http://` scheme, unless the match directly
/// follows `://` (a scheme the URL rule didn't recognize).
fn link_www(pieces: Vec<Piece>) -> Vec<Piece> {
    let mut out = Vec::with_capacity(pieces.len());
    for piece in pieces {
        if piece.href.is_some() {
            out.push(piece);
            continue;
        }

        let text = &piece.text;
        let mut last = 0;
        let mut pos = 0;
        while let Some(m) = WWW_RE.find_at(text, pos) {
            if text[..m.start()].ends_with("://") {
                // Retry one character further, like a failed lookbehind would.
                pos = m.start() + 1;
                continue;
            }
            push_text(&mut out, &text[last..m.start()]);
            out.push(Piece {
                text: m.as_str().to_string(),
                href: Some(format!("http://{}", m.as_str())),
                new_tab: true,
            });
            last = m.end();
            pos = m.end();
        }
        push_text(&mut out, &text[last..]);
    }
    out
}

fn push_text(out: &mut Vec<Piece>, text: &str) {
    if !text.is_empty() {
        out.push(Piece::plain(text));
    }
}
