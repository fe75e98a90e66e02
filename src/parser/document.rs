// Small helpers over `scraper` so extractors read as selector + text.

use scraper::{ElementRef, Html, Selector};

/// Compile a selector written in this crate. Panics only on a typo in a
/// literal, which the tests catch.
pub fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("bad selector {css:?}: {e:?}"))
}

/// Concatenated text of every match, trimmed. Empty when nothing matches.
pub fn doc_text(doc: &Html, sel: &Selector) -> String {
    doc.select(sel)
        .flat_map(|el| el.text())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Concatenated text of every match under `el`, trimmed.
pub fn element_text(el: ElementRef<'_>, sel: &Selector) -> String {
    el.select(sel)
        .flat_map(|e| e.text())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Full text content of `el`, trimmed.
pub fn own_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Text of `el` with every nested element dropped, i.e. direct text nodes only.
pub fn direct_text(el: ElementRef<'_>) -> String {
    el.children()
        .filter_map(|node| node.value().as_text())
        .map(|text| &**text)
        .collect::<String>()
}
