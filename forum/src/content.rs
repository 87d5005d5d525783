//! Rendering of user-entered body text.
//!
//! Text is escaped first, then bare URLs are turned into markup: image
//! URLs become inline `<img>` tags, anything else becomes a link.

use std::sync::OnceLock;

use maud::{html, Markup, PreEscaped};
use regex::{Captures, Regex};

const IMAGE_EXTENSIONS: [&str; 3] = [".png", ".jpg", ".gif"];

fn url_pattern() -> &'static Regex {
    static URL: OnceLock<Regex> = OnceLock::new();
    URL.get_or_init(|| {
        Regex::new(
            r"[a-zA-Z0-9]+://(?:[a-zA-Z0-9_]+:[a-zA-Z0-9_]+@)?(?:[a-zA-Z0-9.-]+\.[A-Za-z]{2,4})(?::[0-9]+)?(?:/[^ .]*)?(\.[^\s]*)?",
        )
        .unwrap()
    })
}

pub fn render_content(raw: &str) -> Markup {
    let escaped = html! { (raw) }.into_string();

    let linked = url_pattern().replace_all(&escaped, |caps: &Captures| {
        let url = &caps[0];
        match caps.get(1) {
            Some(ext) if IMAGE_EXTENSIONS.contains(&ext.as_str()) => {
                format!("<img src=\"{url}\">")
            }
            _ => format!("<a href=\"{url}\">{url}</a>"),
        }
    });

    PreEscaped(linked.into_owned())
}

#[cfg(test)]
mod tests {
    use super::render_content;

    #[test]
    fn plain_text_is_escaped() {
        assert_eq!(
            render_content("a <b> & c").into_string(),
            "a &lt;b&gt; &amp; c"
        );
    }

    #[test]
    fn image_urls_become_inline_images() {
        assert_eq!(
            render_content("see http://example.com/cat.png").into_string(),
            "see <img src=\"http://example.com/cat.png\">"
        );
    }

    #[test]
    fn other_urls_become_links() {
        assert_eq!(
            render_content("docs at http://example.com/guide").into_string(),
            "docs at <a href=\"http://example.com/guide\">http://example.com/guide</a>"
        );
    }

    #[test]
    fn bare_host_becomes_a_link() {
        assert_eq!(
            render_content("http://example.com").into_string(),
            "<a href=\"http://example.com\">http://example.com</a>"
        );
    }
}
