//! Per-category clean-up applied to raw values read from the page.

use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// Minimum and maximum digit count for a phone number to be kept.
const PHONE_DIGITS: std::ops::RangeInclusive<usize> = 8..=12;

/// Addresses must be strictly longer than this many UTF-16 code units.
const MIN_ADDRESS_LEN: usize = 10;

/// Whitespace as browsers define it for `trim` and `\s`: Unicode
/// `White_Space` plus U+FEFF, minus U+0085.
fn is_page_whitespace(c: char) -> bool {
    c == '\u{feff}' || (c.is_whitespace() && c != '\u{85}')
}

/// Browser-style trim.
pub fn trim_page(text: &str) -> &str {
    text.trim_matches(is_page_whitespace)
}

/// Pick the image source: `src` unless it is absent or empty, else `data-src`.
/// Blank results are dropped.
pub fn image_source(src: Option<String>, data_src: Option<String>) -> Option<String> {
    src.filter(|s| !s.is_empty())
        .or(data_src)
        .map(|s| trim_page(&s).to_string())
        .filter(|s| !s.is_empty())
}

/// Resolve an image source against the page URL.
pub fn resolve_image_url(base: &Url, src: &str) -> Result<String, url::ParseError> {
    base.join(trim_page(src)).map(String::from)
}

/// Digits of a `tel:` link, if there are 8 to 12 of them.
pub fn phone_digits(href: &str) -> Option<String> {
    let number = trim_page(href.strip_prefix("tel:")?);
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    PHONE_DIGITS.contains(&digits.len()).then_some(digits)
}

/// Trimmed heading text, `None` when blank.
pub fn heading(text: &str) -> Option<String> {
    let trimmed = trim_page(text);
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Address text with whitespace runs collapsed, if it is long enough.
pub fn address(text: &str) -> Option<String> {
    let collapsed = collapse_whitespace(text);
    (collapsed.encode_utf16().count() > MIN_ADDRESS_LEN).then_some(collapsed)
}

/// Trim and replace every run of whitespace with a single space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split(is_page_whitespace)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Regex class matching exactly [`is_page_whitespace`].
const PAGE_SPACE_CLASS: &str = r"[\s\x{FEFF}--\x{85}]";

fn copyright_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let ws = PAGE_SPACE_CLASS;
        let years = format!(r"[0-9]{{4}}(?:{ws}*[-–—]{ws}*[0-9]{{4}})?");
        Regex::new(&format!(r"(?i)©{ws}*({years})|copyright{ws}*({years})"))
            .expect("copyright regex is valid")
    })
}

/// Every copyright notice in `text`, verbatim and in order of appearance.
pub fn copyright_notices(text: &str) -> Vec<String> {
    copyright_regex()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Join footer blocks the way they read on the page.
pub fn footer_text(blocks: &[String]) -> String {
    trim_page(&blocks.join(" ")).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_source_prefers_src() {
        assert_eq!(
            image_source(Some("/a.png".into()), Some("/b.png".into())).as_deref(),
            Some("/a.png")
        );
    }

    #[test]
    fn test_image_source_falls_back_on_empty_src() {
        assert_eq!(
            image_source(Some(String::new()), Some(" /lazy.png ".into())).as_deref(),
            Some("/lazy.png")
        );
        assert_eq!(
            image_source(None, Some("/lazy.png".into())).as_deref(),
            Some("/lazy.png")
        );
    }

    #[test]
    fn test_image_source_blank_dropped() {
        assert_eq!(image_source(Some("   ".into()), Some("/b.png".into())), None);
        assert_eq!(image_source(None, None), None);
        assert_eq!(image_source(Some(String::new()), Some(String::new())), None);
    }

    #[test]
    fn test_resolve_relative_image() {
        let base = Url::parse("https://example.com/page").unwrap();
        assert_eq!(
            resolve_image_url(&base, "/img/a.png").unwrap(),
            "https://example.com/img/a.png"
        );
        assert_eq!(
            resolve_image_url(&base, "b.png").unwrap(),
            "https://example.com/b.png"
        );
        assert_eq!(
            resolve_image_url(&base, "//cdn.example.net/c.jpg").unwrap(),
            "https://cdn.example.net/c.jpg"
        );
    }

    #[test]
    fn test_resolve_absolute_image_unchanged() {
        let base = Url::parse("https://example.com/page").unwrap();
        assert_eq!(
            resolve_image_url(&base, "https://other.org/x.png").unwrap(),
            "https://other.org/x.png"
        );
    }

    #[test]
    fn test_phone_digits() {
        assert_eq!(
            phone_digits("tel:+1 (555) 123-4567").as_deref(),
            Some("15551234567")
        );
        assert_eq!(phone_digits("tel:123"), None);
        assert_eq!(phone_digits("tel: 1300 668 370 ").as_deref(), Some("1300668370"));
        assert_eq!(phone_digits("mailto:someone@example.com"), None);
    }

    #[test]
    fn test_phone_digit_bounds() {
        assert_eq!(phone_digits("tel:1234567"), None);
        assert_eq!(phone_digits("tel:12345678").as_deref(), Some("12345678"));
        assert_eq!(phone_digits("tel:123456789012").as_deref(), Some("123456789012"));
        assert_eq!(phone_digits("tel:1234567890123"), None);
    }

    #[test]
    fn test_heading() {
        assert_eq!(heading("  Welcome  ").as_deref(), Some("Welcome"));
        assert_eq!(heading(" \n\t "), None);
    }

    #[test]
    fn test_address_length_filter() {
        assert_eq!(address("1234567890"), None);
        assert_eq!(address("   12345 67890   "), Some("12345 67890".to_string()));
    }

    #[test]
    fn test_address_collapses_whitespace() {
        assert_eq!(
            address("Locked Bag 1797\n\t  Penrith   NSW 2751").as_deref(),
            Some("Locked Bag 1797 Penrith NSW 2751")
        );
    }

    #[test]
    fn test_address_length_in_utf16_units() {
        // Six emoji are twelve UTF-16 units.
        assert_eq!(address("😀😀😀😀😀😀").as_deref(), Some("😀😀😀😀😀😀"));
        assert_eq!(address("😀😀😀😀😀"), None);
    }

    #[test]
    fn test_page_whitespace_rules() {
        assert_eq!(collapse_whitespace("\u{feff}Level 2,\u{feff}\u{a0}1 Main St "), "Level 2, 1 Main St");
        assert_eq!(collapse_whitespace("a\u{85}b"), "a\u{85}b");
        assert_eq!(heading("\u{feff} Welcome \u{3000}").as_deref(), Some("Welcome"));
        assert_eq!(trim_page("\u{85}x\u{85}"), "\u{85}x\u{85}");
    }

    #[test]
    fn test_copyright_with_byte_order_mark() {
        assert_eq!(copyright_notices("©\u{feff}2020"), vec!["©\u{feff}2020"]);
        assert_eq!(copyright_notices("© 2020\u{feff}–\u{feff}2021"), vec!["© 2020\u{feff}–\u{feff}2021"]);
        assert!(copyright_notices("©\u{85}2020").is_empty());
    }

    #[test]
    fn test_copyright_notices() {
        let text = "Terms © 2020-2023 Western Sydney University. Copyright 2019 others.";
        assert_eq!(copyright_notices(text), vec!["© 2020-2023", "Copyright 2019"]);
    }

    #[test]
    fn test_copyright_dash_variants_and_case() {
        assert_eq!(copyright_notices("©2001–2002"), vec!["©2001–2002"]);
        assert_eq!(copyright_notices("COPYRIGHT 2001 — 2002"), vec!["COPYRIGHT 2001 — 2002"]);
        assert_eq!(copyright_notices("copyright2024"), vec!["copyright2024"]);
    }

    #[test]
    fn test_copyright_without_year() {
        assert!(copyright_notices("All rights reserved. Copyright holders.").is_empty());
        assert!(copyright_notices("").is_empty());
    }

    #[test]
    fn test_copyright_partial_range_keeps_first_year() {
        assert_eq!(copyright_notices("© 2020-23"), vec!["© 2020"]);
    }

    #[test]
    fn test_footer_text() {
        let blocks = vec!["  first ".to_string(), "second  ".to_string()];
        assert_eq!(footer_text(&blocks), "first  second");
        assert_eq!(footer_text(&[]), "");
    }
}
