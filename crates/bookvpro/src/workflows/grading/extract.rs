use std::sync::OnceLock;

use regex::Regex;

/// Class names the book vertical uses for the catalog card it shows when it
/// recognizes an exact title.
const REPRESENTATIVE_CARD_MARKERS: &[&str] = &["book_card", "bookCard", "cm_book_card"];

fn seller_count_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:도서\s*)?판매처\s*([0-9]{1,3}(?:,[0-9]{3})+|[0-9]+)")
            .expect("seller count pattern compiles")
    })
}

fn embedded_code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>")
            .expect("embedded code pattern compiles")
    })
}

fn class_attribute_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)\bclass\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
            .expect("class attribute pattern compiles")
    })
}

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern compiles"))
}

/// Largest "판매처 N" figure on the page, or 0 when the page lists none.
pub fn extract_seller_count(html: &str) -> u32 {
    seller_count_pattern()
        .captures_iter(html)
        .filter_map(|captures| captures.get(1))
        .filter_map(|number| number.as_str().replace(',', "").parse::<u32>().ok())
        .max()
        .unwrap_or(0)
}

/// True when an element outside `<script>`/`<style>` carries a card class.
pub fn has_representative_card(html: &str) -> bool {
    let markup = embedded_code_pattern().replace_all(html, "");
    class_attribute_pattern()
        .captures_iter(&markup)
        .filter_map(|captures| captures.get(1).or_else(|| captures.get(2)))
        .flat_map(|classes| classes.as_str().split_whitespace())
        .any(|class| {
            REPRESENTATIVE_CARD_MARKERS
                .iter()
                .any(|marker| class.contains(marker))
        })
}

/// Removes markup (e.g. `<b>` highlighting) and decodes entities.
pub fn strip_tags(text: &str) -> String {
    let stripped = tag_pattern().replace_all(text, "");
    html_escape::decode_html_entities(stripped.trim()).into_owned()
}
