//! Mention extraction from message bodies.

/// Extracts the distinct member names mentioned as `@name` in a message
/// body, in first-occurrence order.
///
/// A mention starts at an `@` that is not preceded by a word character and
/// runs over ASCII alphanumerics, `_` and `-`. Bare `@` signs and email
/// addresses are not mentions.
pub fn extract_mentions(body: &str) -> Vec<String> {
    let mut mentions: Vec<String> = Vec::new();
    let bytes = body.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'@' {
            let preceded_by_word = i > 0 && is_name_byte(bytes[i - 1]);
            let start = i + 1;
            let mut end = start;
            while end < bytes.len() && is_name_byte(bytes[end]) {
                end += 1;
            }
            if !preceded_by_word && end > start {
                let name = &body[start..end];
                if !mentions.iter().any(|m| m == name) {
                    mentions.push(name.to_string());
                }
            }
            i = end.max(i + 1);
        } else {
            i += 1;
        }
    }

    mentions
}

/// Wraps every mention in the body with the template's mention markup.
pub fn highlight_mentions(body: &str, css_class: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let bytes = body.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'@' {
            let preceded_by_word = i > 0 && is_name_byte(bytes[i - 1]);
            let start = i + 1;
            let mut end = start;
            while end < bytes.len() && is_name_byte(bytes[end]) {
                end += 1;
            }
            if !preceded_by_word && end > start {
                out.push_str("<span class=\"");
                out.push_str(css_class);
                out.push_str("\">@");
                out.push_str(&body[start..end]);
                out.push_str("</span>");
                i = end;
                continue;
            }
        }
        let ch = body[i..].chars().next().unwrap_or('\u{FFFD}');
        out.push(ch);
        i += ch.len_utf8();
    }

    out
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}
