use crate::types::{OutputFormat, RenderMode};

pub fn escape_xml(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
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

/// Render `raw` as a string literal of the target test language.
///
/// XML content is escaped but not quoted. Kotlin also needs `$` escaped,
/// as it would otherwise start a string template.
pub fn string_literal(raw: &str, mode: RenderMode, target: Option<OutputFormat>) -> String {
    if mode == RenderMode::Xml {
        return escape_xml(raw);
    }

    let quoted = format!("\"{}\"", raw);
    match target {
        None => quoted,
        Some(format) if format.is_kotlin() => quoted.replace('\\', "\\\\").replace('$', "\\$"),
        Some(_) => quoted.replace('\\', "\\\\"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_literal_per_target() {
        let raw = r"a\b$c";
        assert_eq!(string_literal(raw, RenderMode::Raw, None), "\"a\\b$c\"");
        assert_eq!(
            string_literal(raw, RenderMode::Raw, Some(OutputFormat::JavaJunit5)),
            "\"a\\\\b$c\""
        );
        assert_eq!(
            string_literal(raw, RenderMode::Raw, Some(OutputFormat::KotlinJunit5)),
            "\"a\\\\b\\$c\""
        );
    }

    #[test]
    fn test_xml_mode() {
        assert_eq!(
            string_literal("<a & 'b'>", RenderMode::Xml, Some(OutputFormat::JavaJunit4)),
            "&lt;a &amp; &apos;b&apos;&gt;"
        );
    }
}
