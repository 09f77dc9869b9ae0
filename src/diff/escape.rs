//! HTML escaping applied to source text before it is split and compared.

/// Escapes `&`, `<`, `>`, `"` and `'` so text can be embedded in HTML.
///
/// Applied identically to both sides of a comparison, so it never changes
/// which lines are considered equal.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::escape_html;

    #[rstest]
    #[case("#include <vector>", "#include &lt;vector&gt;")]
    #[case("a && b", "a &amp;&amp; b")]
    #[case(r#"puts("hi");"#, "puts(&quot;hi&quot;);")]
    #[case("char c = 'x';", "char c = &#x27;x&#x27;;")]
    #[case("plain text\n", "plain text\n")]
    fn escapes_markup_characters(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape_html(input), expected);
    }
}
