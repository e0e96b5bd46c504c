/// Escapes the five XML special characters. Every other character is
/// passed through untouched, so the text a user typed ends up verbatim in
/// the label.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Strips a namespace prefix (`svg:path` -> `path`).
pub fn local_name(qualified: &str) -> &str {
    qualified
        .rsplit_once(':')
        .map_or(qualified, |(_, local)| local)
}

/// Namespace prefix of a qualified name, if any.
pub fn prefix(qualified: &str) -> Option<&str> {
    qualified.split_once(':').map(|(prefix, _)| prefix)
}

#[cfg(test)]
mod tests {
    use super::{escape_xml, local_name, prefix};

    #[test]
    fn escape_special_xml_chars() {
        let s = r#"<tag attr="x&y">'z'"#;
        assert_eq!(
            escape_xml(s),
            "&lt;tag attr=&quot;x&amp;y&quot;&gt;&apos;z&apos;"
        );
    }

    #[test]
    fn leave_other_chars_alone() {
        let s = "Four 230V \u{00e9}\u{2192}\t";
        assert_eq!(escape_xml(s), s);
    }

    #[test]
    fn split_qualified_names() {
        assert_eq!(local_name("svg:path"), "path");
        assert_eq!(local_name("rect"), "rect");
        assert_eq!(prefix("inkscape:label"), Some("inkscape"));
        assert_eq!(prefix("fill"), None);
    }
}
