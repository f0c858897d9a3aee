use std::borrow::Cow;

use quick_xml::escape::{resolve_html5_entity, resolve_predefined_entity};

const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";

/// Longest entity name we try to resolve. Anything longer is left literal.
const MAX_ENTITY_LEN: usize = 32;

/// Decodes character and entity references in raw markup text.
///
/// Resolves the five predefined XML entities, HTML5 named entities and
/// numeric references (`&#38;`, `&#x26;`). Unknown or malformed references
/// are left untouched, which also covers DTD-declared entities such as
/// `&xxe;` (SEC-002).
///
/// Returns `Cow::Borrowed` when the input contains no `&` (common case).
///
/// # Examples
///
/// ```
/// use feedcraft::util::decode_entities;
///
/// assert_eq!(decode_entities("Tom &amp; Jerry"), "Tom & Jerry");
/// assert_eq!(decode_entities("&#169; &copy;"), "© ©");
/// assert_eq!(decode_entities("&unknown;"), "&unknown;");
/// ```
pub fn decode_entities(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let resolved = after
            .find(';')
            .filter(|&end| end > 0 && end <= MAX_ENTITY_LEN)
            .and_then(|end| resolve_reference(&after[..end]).map(|text| (text, end)));

        match resolved {
            Some((text, end)) => {
                out.push_str(&text);
                rest = &after[end + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn resolve_reference(name: &str) -> Option<Cow<'static, str>> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse::<u32>().ok()?,
        };
        return char::from_u32(code)
            .filter(|c| *c != '\0')
            .map(|c| Cow::Owned(c.to_string()));
    }
    resolve_predefined_entity(name)
        .or_else(|| resolve_html5_entity(name))
        .map(Cow::Borrowed)
}

/// Turns raw element text into its final string value.
///
/// CDATA sections are unwrapped verbatim; everything outside them has
/// entities decoded. The result is trimmed.
///
/// Entity-like text inside a section is never decoded, since XML treats
/// CDATA content as literal characters. Text containing `&` is generated as
/// CDATA, so a value such as `Fish &amp; Chips` reads back unchanged.
///
/// # Examples
///
/// ```
/// use feedcraft::util::decode_text;
///
/// assert_eq!(decode_text("  <![CDATA[a &amp; b]]> &amp; c "), "a &amp; b & c");
/// ```
pub fn decode_text(raw: &str) -> String {
    if !raw.contains(CDATA_OPEN) {
        return decode_entities(raw).trim().to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(open) = rest.find(CDATA_OPEN) {
        out.push_str(&decode_entities(&rest[..open]));
        let inner = &rest[open + CDATA_OPEN.len()..];
        match inner.find(CDATA_CLOSE) {
            Some(close) => {
                out.push_str(&inner[..close]);
                rest = &inner[close + CDATA_CLOSE.len()..];
            }
            None => {
                // Unterminated section: keep the remainder literally.
                out.push_str(inner);
                rest = "";
            }
        }
    }
    out.push_str(&decode_entities(rest));
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text_keeps_cdata_content_literal() {
        assert_eq!(decode_text("<![CDATA[&amp;]]>"), "&amp;");
        assert_eq!(decode_text("<![CDATA[Fish &amp; Chips]]>"), "Fish &amp; Chips");
        assert_eq!(decode_text("&amp;<![CDATA[&lt;]]>&lt;"), "&&lt;<");
    }

    #[test]
    fn test_decode_entities_borrowed_when_no_ampersand() {
        assert!(matches!(decode_entities("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn test_decode_entities_predefined_and_numeric() {
        assert_eq!(decode_entities("&lt;b&gt; &quot;q&quot; &apos;"), "<b> \"q\" '");
        assert_eq!(decode_entities("&#65;&#x42;&#X43;"), "ABC");
    }

    #[test]
    fn test_decode_entities_html5_named() {
        assert_eq!(decode_entities("a&nbsp;b"), "a\u{a0}b");
        assert_eq!(decode_entities("&hellip;"), "…");
    }

    #[test]
    fn test_decode_entities_leaves_unknown_and_malformed() {
        assert_eq!(decode_entities("AT&T"), "AT&T");
        assert_eq!(decode_entities("a & b"), "a & b");
        assert_eq!(decode_entities("&;"), "&;");
        assert_eq!(decode_entities("&#xZZ;"), "&#xZZ;");
        assert_eq!(decode_entities("&xxe;"), "&xxe;");
    }

    #[test]
    fn test_decode_text_unwraps_multiple_cdata_sections() {
        assert_eq!(
            decode_text("<![CDATA[<p>]]>&amp;<![CDATA[</p>]]>"),
            "<p>&</p>"
        );
    }

    #[test]
    fn test_decode_text_unterminated_cdata() {
        assert_eq!(decode_text("<![CDATA[open"), "open");
    }
}
