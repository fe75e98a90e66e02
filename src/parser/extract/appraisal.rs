use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::parser::document::{doc_text, element_text, selector};
use crate::parser::normalize::{parse_man_yen, parse_number};
use crate::records::EstimatedPrices;

static SALES_SEL: LazyLock<Selector> = LazyLock::new(|| selector("ul > li > div.baikyaku"));
static RENT_SEL: LazyLock<Selector> = LazyLock::new(|| selector("ul > li > div.chintai"));
static YIELD_SEL: LazyLock<Selector> =
    LazyLock::new(|| selector("ul > li > div.yield p.percent span.em"));

static FROM_AMOUNT_SEL: LazyLock<Selector> =
    LazyLock::new(|| selector("div.from p.amount span.em"));
static FROM_TANKA_SEL: LazyLock<Selector> = LazyLock::new(|| selector("div.from p.tanka span.em"));
static TO_AMOUNT_SEL: LazyLock<Selector> = LazyLock::new(|| selector("div.to p.amount span.em"));
static TO_TANKA_SEL: LazyLock<Selector> = LazyLock::new(|| selector("div.to p.tanka span.em"));

/// Low/high end of one appraisal range.
#[derive(Debug, Default, PartialEq)]
struct PriceRange {
    from_amount: Option<u64>,
    from_per_tsubo: Option<f64>,
    to_amount: Option<u64>,
    to_per_tsubo: Option<f64>,
}

/// Amounts are shown in man-yen and stored in yen; per-tsubo prices are kept
/// as displayed.
fn price_range(blocks: &[ElementRef<'_>]) -> PriceRange {
    PriceRange {
        from_amount: parse_man_yen(&blocks_text(blocks, &FROM_AMOUNT_SEL)),
        from_per_tsubo: parse_number(&blocks_text(blocks, &FROM_TANKA_SEL)),
        to_amount: parse_man_yen(&blocks_text(blocks, &TO_AMOUNT_SEL)),
        to_per_tsubo: parse_number(&blocks_text(blocks, &TO_TANKA_SEL)),
    }
}

fn blocks_text(blocks: &[ElementRef<'_>], sel: &Selector) -> String {
    blocks.iter().map(|b| element_text(*b, sel)).collect()
}

pub fn extract(doc: &Html) -> EstimatedPrices {
    let sales_blocks: Vec<_> = doc.select(&SALES_SEL).collect();
    let rent_blocks: Vec<_> = doc.select(&RENT_SEL).collect();
    let sales = price_range(&sales_blocks);
    let rent = price_range(&rent_blocks);

    EstimatedPrices {
        sales_appraisal_from_amount: sales.from_amount,
        sales_appraisal_from_amount_per_tsubo: sales.from_per_tsubo,
        sales_appraisal_to_amount: sales.to_amount,
        sales_appraisal_to_amount_per_tsubo: sales.to_per_tsubo,
        rent_appraisal_from_amount: rent.from_amount,
        rent_appraisal_from_amount_per_tsubo: rent.from_per_tsubo,
        rent_appraisal_to_amount: rent.to_amount,
        rent_appraisal_to_amount_per_tsubo: rent.to_per_tsubo,
        gross_yield: parse_number(&doc_text(doc, &YIELD_SEL)).map(|pct| pct / 100.0),
    }
}
