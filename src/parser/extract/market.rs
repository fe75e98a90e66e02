use std::sync::LazyLock;

use anyhow::{Context, Result};
use scraper::{Html, Selector};
use serde_json::Value;

use crate::parser::document::selector;

static SALES_CHART_SEL: LazyLock<Selector> =
    LazyLock::new(|| selector("#js_sale_souba_chart script.js_chart_data"));
static RENTAL_CHART_SEL: LazyLock<Selector> =
    LazyLock::new(|| selector("#js_chintai_souba_chart script.js_chart_data"));

/// Market-value series behind the sales price chart, as embedded in the page.
pub fn extract_sales(doc: &Html) -> Result<Option<Value>> {
    chart_data(doc, &SALES_CHART_SEL).context("Bad sales chart data")
}

/// Market-value series behind the rent chart.
pub fn extract_rentals(doc: &Html) -> Result<Option<Value>> {
    chart_data(doc, &RENTAL_CHART_SEL).context("Bad rental chart data")
}

fn chart_data(doc: &Html, sel: &Selector) -> Result<Option<Value>> {
    let scripts: Vec<_> = doc.select(sel).collect();
    if scripts.is_empty() {
        return Ok(None);
    }
    let payload: String = scripts.iter().flat_map(|s| s.text()).collect();
    Ok(Some(serde_json::from_str(&payload)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_passes_through() {
        let doc = Html::parse_document(
            r#"<div id="js_sale_souba_chart"><script type="application/json" class="js_chart_data">
            {"labels":["2019/01","2019/02"],"data":[312.5,318.0]}
            </script></div>"#,
        );
        let v = extract_sales(&doc).unwrap().unwrap();
        assert_eq!(v["labels"][1], "2019/02");
        assert_eq!(v["data"][0], 312.5);
        assert_eq!(extract_rentals(&doc).unwrap(), None);
    }

    #[test]
    fn malformed_payload_is_error() {
        let doc = Html::parse_document(
            r#"<div id="js_chintai_souba_chart"><script class="js_chart_data">{"labels": [</script></div>"#,
        );
        assert!(extract_rentals(&doc).is_err());
        assert_eq!(extract_sales(&doc).unwrap(), None);
    }
}
