use unicode_width::UnicodeWidthChar;

const DOC_EXTENSIONS: [&str; 5] = [".html", ".htm", ".php", ".aspx", ".asp"];

/// Safely truncate a string, ensuring it is not truncated in the middle of multi-byte characters
///
/// This function will:
/// 1. Correctly handle Unicode characters (including Chinese, emoji, etc.)
/// 2. Add ellipsis when maximum length is reached
/// 3. Ensure the output string's display width does not exceed the specified length
#[allow(dead_code)]
pub fn truncate_str(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthStr;

    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(1);

        if current_width + char_width + 3 > max_width {
            break;
        }

        result.push(c);
        current_width += char_width;
    }

    result.push_str("...");
    result
}

/// Turns a URL path segment such as `my-first_post.html` into `My First Post`.
pub fn humanize_slug(segment: &str) -> String {
    let spaced = segment.replace(['-', '_'], " ");

    let lower = spaced.to_ascii_lowercase();
    let stem = DOC_EXTENSIONS
        .iter()
        .find(|ext| lower.ends_with(*ext))
        .map(|ext| &spaced[..spaced.len() - ext.len()])
        .unwrap_or(&spaced);

    capitalize_words(stem).trim().to_string()
}

/// Uppercases every word character that starts a word.
fn capitalize_words(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_boundary = true;
    for c in s.chars() {
        let is_word = c.is_alphanumeric() || c == '_';
        if is_word && at_boundary {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_boundary = !is_word;
    }
    out
}
