//! Text Normalizer — turns rich-text fields into plain text and plain text into tokens.
//!
//! Both functions are total: any input, including malformed markup, produces a result.

use html_escape::decode_html_entities;

/// Tags whose start or end marks a line break in the rendered text.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "footer", "h1",
    "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "ol", "p", "pre", "section", "table",
    "td", "th", "tr", "ul",
];

/// Tags whose content is never part of the visible text.
const RAW_TEXT_TAGS: &[&str] = &["script", "style"];

/// Converts HTML / rich-text markup into a plain-text rendering of its textual content.
///
/// Tags are dropped, block-level tags become line breaks, `script`/`style` bodies and
/// comments are discarded, and named and numeric character references in text are
/// decoded. An unterminated tag or comment swallows the rest of the input rather than
/// leaking markup.
pub fn normalize_markup(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while !rest.is_empty() {
        let text_end = rest.find('<').unwrap_or(rest.len());
        out.push_str(&decode_html_entities(&rest[..text_end]));
        if text_end == rest.len() {
            break;
        }
        rest = consume_markup(&rest[text_end..], &mut out);
    }

    tidy_lines(&out)
}

/// Lower-cases `text`, removes every character that is not an ASCII letter, digit or
/// whitespace, and splits on whitespace.
///
/// Non-ASCII letters are dropped, so `"café"` becomes `"caf"`.
pub fn canonicalize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();

    cleaned.split_whitespace().map(str::to_string).collect()
}

/// Consumes one `<...>` construct starting at `input` and returns the remaining input.
fn consume_markup<'a>(input: &'a str, out: &mut String) -> &'a str {
    if let Some(after) = input.strip_prefix("<!--") {
        return match after.find("-->") {
            Some(end) => &after[end + 3..],
            None => "",
        };
    }

    let opens_tag = input[1..]
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '/' || c == '!');
    if !opens_tag {
        out.push('<');
        return &input[1..];
    }

    let Some(end) = tag_end(input) else {
        return "";
    };

    let tag = &input[1..end];
    let rest = &input[end + 1..];
    let name = tag_name(tag);

    if !tag.starts_with('/') && RAW_TEXT_TAGS.contains(&name.as_str()) {
        let closing = format!("</{name}");
        return match find_ascii_case_insensitive(rest, &closing) {
            Some(pos) => match rest[pos..].find('>') {
                Some(gt) => &rest[pos + gt + 1..],
                None => "",
            },
            None => "",
        };
    }

    if BLOCK_TAGS.contains(&name.as_str()) {
        out.push('\n');
    }

    rest
}

/// Lower-cased element name of a tag body such as `/P` or `a href="..."`.
fn tag_name(tag: &str) -> String {
    tag.trim_start_matches(['/', '!'])
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

fn find_ascii_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    let needle = needle.as_bytes();
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle))
}

/// Byte offset of the `>` closing the tag at the start of `input`. A `>` inside a
/// quoted attribute value does not close the tag.
fn tag_end(input: &str) -> Option<usize> {
    let mut quote: Option<u8> = None;
    let mut after_equals = false;

    for (i, b) in input.bytes().enumerate().skip(1) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'>' => return Some(i),
                b'"' | b'\'' if after_equals => quote = Some(b),
                b'=' => after_equals = true,
                b if b.is_ascii_whitespace() => {}
                _ => after_equals = false,
            },
        }
        if quote.is_some() {
            after_equals = false;
        }
    }
    None
}

/// Trims every line, collapses runs of blank lines and trims the whole text.
fn tidy_lines(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() && lines.last().map_or(true, |l| l.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}
