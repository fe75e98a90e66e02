use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::parser::document::{element_text, selector};
use crate::parser::normalize::parse_number;
use crate::records::ReviewMetrics;

static CELL_SEL: LazyLock<Selector> = LazyLock::new(|| selector(".deviation_value td"));
static SCORE_SEL: LazyLock<Selector> = LazyLock::new(|| selector("p"));
static VAL_SEL: LazyLock<Selector> = LazyLock::new(|| selector(".val"));
static CAP_SEL: LazyLock<Selector> = LazyLock::new(|| selector(".cap"));

pub fn extract(doc: &Html) -> ReviewMetrics {
    let cells: Vec<ElementRef<'_>> = doc.select(&CELL_SEL).collect();
    let cell = |i: usize| cells.get(i).copied();

    let (city_ranking_val, city_ranking_cap) = cell(1).map(ranking).unwrap_or_default();
    let (town_ranking_val, town_ranking_cap) = cell(2).map(ranking).unwrap_or_default();

    ReviewMetrics {
        deviation: cell(0).and_then(|c| parse_number(&element_text(c, &SCORE_SEL))),
        city_ranking_val,
        city_ranking_cap,
        town_ranking_val,
        town_ranking_cap,
    }
}

/// "12位" over "/ 1,234件中" → (12, 1234).
fn ranking(cell: ElementRef<'_>) -> (Option<u32>, Option<u32>) {
    let val = element_text(cell, &VAL_SEL)
        .replace(['位', ','], "")
        .trim()
        .parse()
        .ok();
    let cap = digits(&element_text(cell, &CAP_SEL));
    (val, cap)
}

fn digits(text: &str) -> Option<u32> {
    let d: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    d.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(cells: &str) -> Html {
        Html::parse_document(&format!(
            r#"<table class="deviation_value"><tr>{cells}</tr></table>"#
        ))
    }

    #[test]
    fn full_review() {
        let doc = page(
            r#"<td><p>58.2</p></td>
               <td><span class="val">1,012位</span><span class="cap">/ 3,456件中</span></td>
               <td><span class="val">3位</span><span class="cap">/ 45件中</span></td>"#,
        );
        let r = extract(&doc);
        assert_eq!(r.deviation, Some(58.2));
        assert_eq!(r.city_ranking_val, Some(1012));
        assert_eq!(r.city_ranking_cap, Some(3456));
        assert_eq!(r.town_ranking_val, Some(3));
        assert_eq!(r.town_ranking_cap, Some(45));
    }

    #[test]
    fn unparseable_is_none_not_zero() {
        let doc = page(
            r#"<td><p>-</p></td>
               <td><span class="val">0位</span><span class="cap">集計中</span></td>"#,
        );
        let r = extract(&doc);
        assert_eq!(r.deviation, None);
        assert_eq!(r.city_ranking_val, Some(0));
        assert_eq!(r.city_ranking_cap, None);
        assert_eq!(r.town_ranking_val, None);
        assert_eq!(r.town_ranking_cap, None);
    }

    #[test]
    fn no_review_block() {
        let doc = Html::parse_document("<html></html>");
        assert_eq!(extract(&doc), ReviewMetrics::default());
    }
}
