//! Response formatting utilities

use crate::model::Ticker;

/// User-visible texts produced around an analysis
pub trait Formatter: Send + Sync {
    /// Acknowledgement posted before any provider is called
    fn placeholder(&self, ticker: &Ticker) -> String;
    /// Caption attached to the chart image
    fn chart_caption(&self, ticker: &Ticker) -> String;
    /// Text the placeholder is edited to when a request fails
    fn error_notice(&self, ticker: &Ticker, detail: &str) -> String;
    fn welcome(&self, first_name: &str) -> String;
    /// Reply to a message with no ticker in it
    fn usage_hint(&self) -> String;
}

/// Telegram-flavoured HTML texts
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlFormatter;

impl Formatter for HtmlFormatter {
    fn placeholder(&self, ticker: &Ticker) -> String {
        format!(
            "Analyzing <b>{}</b>...\nThis advanced analysis may take a moment. Please wait.",
            escape_html(ticker.as_str())
        )
    }

    fn chart_caption(&self, ticker: &Ticker) -> String {
        format!(
            "Chart for <b>{}</b> (Powered by Finviz).",
            escape_html(ticker.as_str())
        )
    }

    fn error_notice(&self, ticker: &Ticker, detail: &str) -> String {
        format!(
            "Sorry, an error occurred while analyzing {}.\n<b>Details:</b> {}",
            escape_html(ticker.as_str()),
            escape_html(detail)
        )
    }

    fn welcome(&self, first_name: &str) -> String {
        format!(
            "Welcome, {}! I am your personal Stock Analyst Bot.\n\n\
             Send me a stock ticker (e.g., AAPL, GOOG, TSLA).\n\n\
             I will provide a professional analysis with a real-time chart and market data.",
            escape_html(first_name)
        )
    }

    fn usage_hint(&self) -> String {
        "Please send a stock ticker symbol (e.g., AAPL, GOOG, TSLA).".to_string()
    }
}

/// Escape the three characters Telegram's HTML parse mode treats specially
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Longest text a single chat message may carry
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// Cut `text` into pieces of at most `limit` characters
///
/// Cuts fall on the last paragraph break inside the window, then the last
/// line break, and only split mid-line when a single line is too long.
/// Blank pieces are dropped.
pub fn split_message(text: &str, limit: usize) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = text;

    while let Some((hard, _)) = rest.char_indices().nth(limit) {
        let window = &rest[..hard];
        let cut = window
            .rfind("\n\n")
            .or_else(|| window.rfind('\n'))
            .filter(|&at| at > 0)
            .unwrap_or(hard);

        let (head, tail) = rest.split_at(cut);
        let head = head.trim_end();
        if !head.is_empty() {
            parts.push(head);
        }
        rest = tail.trim_start_matches('\n');
    }

    if !rest.trim().is_empty() {
        parts.push(rest);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticker(symbol: &str) -> Ticker {
        Ticker::parse(symbol).unwrap()
    }

    #[test]
    fn test_placeholder() {
        assert_eq!(
            HtmlFormatter.placeholder(&ticker("aapl")),
            "Analyzing <b>AAPL</b>...\nThis advanced analysis may take a moment. Please wait."
        );
    }

    #[test]
    fn test_chart_caption() {
        assert_eq!(
            HtmlFormatter.chart_caption(&ticker("AAPL")),
            "Chart for <b>AAPL</b> (Powered by Finviz)."
        );
    }

    #[test]
    fn test_error_notice_escapes_detail() {
        let text = HtmlFormatter.error_notice(&ticker("ZZZZ"), "HTTP 500 | Response: <html>");
        assert_eq!(
            text,
            "Sorry, an error occurred while analyzing ZZZZ.\n<b>Details:</b> HTTP 500 | Response: &lt;html&gt;"
        );
    }

    #[test]
    fn test_user_input_escaped() {
        assert!(HtmlFormatter.placeholder(&ticker("<B>")).contains("<b>&lt;B&gt;</b>"));
        assert!(HtmlFormatter.welcome("Tom & Jerry").starts_with("Welcome, Tom &amp; Jerry!"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_short_message_is_one_part() {
        assert_eq!(split_message("Hold.", MAX_MESSAGE_CHARS), vec!["Hold."]);
    }

    #[test]
    fn test_split_prefers_paragraph_breaks() {
        let text = "aaaa\nbbbb\n\ncccc\ndddd";
        assert_eq!(split_message(text, 16), vec!["aaaa\nbbbb", "cccc\ndddd"]);
    }

    #[test]
    fn test_split_falls_back_to_line_breaks() {
        let text = "aaaa\nbbbb\ncccc";
        assert_eq!(split_message(text, 10), vec!["aaaa\nbbbb", "cccc"]);
    }

    #[test]
    fn test_split_long_line_counts_characters() {
        let text = "📊".repeat(10);
        let parts = split_message(&text, 4);
        assert_eq!(parts, vec!["📊📊📊📊", "📊📊📊📊", "📊📊"]);
    }

    #[test]
    fn test_split_keeps_every_line() {
        let paragraph = format!("<b>Section</b>\n{}", "x".repeat(90));
        let text = vec![paragraph; 60].join("\n\n");
        let parts = split_message(&text, MAX_MESSAGE_CHARS);

        assert!(parts.len() > 1);
        assert!(parts.iter().all(|p| p.chars().count() <= MAX_MESSAGE_CHARS));
        assert!(parts.iter().all(|p| p.starts_with("<b>Section</b>")));
        assert_eq!(parts.join("\n\n"), text);
    }
}
