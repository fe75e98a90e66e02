use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::parser::document::{doc_text, own_text, selector};

static TITLE_SEL: LazyLock<Selector> = LazyLock::new(|| selector(".page_title span"));
static CRUMB_SEL: LazyLock<Selector> = LazyLock::new(|| selector("#pankuzu a"));

const LISTING_SUFFIX: &str = "のマンション";
const CITY_CRUMB: usize = 2;
const TOWN_CRUMB: usize = 3;

pub fn building_name(doc: &Html) -> String {
    doc_text(doc, &TITLE_SEL)
}

/// Breadcrumb "新宿区のマンション" → "新宿区".
pub fn city(doc: &Html) -> String {
    crumb(doc, CITY_CRUMB).replacen(LISTING_SUFFIX, "", 1)
}

/// Breadcrumb "新宿区西新宿のマンション" → "西新宿". The city is cut first so
/// the suffix never leaves a stray fragment behind.
pub fn town(doc: &Html) -> String {
    let city = city(doc);
    crumb(doc, TOWN_CRUMB)
        .replacen(&city, "", 1)
        .replacen(LISTING_SUFFIX, "", 1)
}

fn crumb(doc: &Html, index: usize) -> String {
    doc.select(&CRUMB_SEL)
        .nth(index)
        .map(own_text)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
      <div class="page_title"><h1><span>パークタワー西新宿</span></h1></div>
      <div id="pankuzu">
        <a href="/">マンションTOP</a>
        <a href="/tokyo">東京都のマンション</a>
        <a href="/tokyo/shinjuku">新宿区のマンション</a>
        <a href="/tokyo/shinjuku/nishishinjuku">新宿区西新宿のマンション</a>
        <span>パークタワー西新宿</span>
      </div>
    </body></html>"#;

    #[test]
    fn name_city_town() {
        let doc = Html::parse_document(PAGE);
        assert_eq!(building_name(&doc), "パークタワー西新宿");
        assert_eq!(city(&doc), "新宿区");
        assert_eq!(town(&doc), "西新宿");
    }

    #[test]
    fn short_breadcrumb() {
        let doc = Html::parse_document(
            r#"<div id="pankuzu"><a>TOP</a><a>東京都のマンション</a><a>港区のマンション</a></div>"#,
        );
        assert_eq!(city(&doc), "港区");
        assert_eq!(town(&doc), "");
    }

    #[test]
    fn missing_everything() {
        let doc = Html::parse_document("<html></html>");
        assert_eq!(building_name(&doc), "");
        assert_eq!(city(&doc), "");
        assert_eq!(town(&doc), "");
    }
}
