use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::parser::document::{own_text, selector};
use crate::parser::normalize::*;
use crate::records::{RentalEvent, SaleEvent};

static SALES_ROW_SEL: LazyLock<Selector> = LazyLock::new(|| {
    selector("div.mansionSaleHistoryRow table.tekisei_kakaku_sindan_list_area tbody.display tr")
});
static RENTAL_ROW_SEL: LazyLock<Selector> = LazyLock::new(|| {
    selector("#chintaiHistoryBlock table.mansionOrderContentList tbody:first-child tr")
});
static CELL_SEL: LazyLock<Selector> = LazyLock::new(|| selector("td"));

/// Sales table columns. The site's column order is fixed; cell 0 is a row
/// counter and unused.
mod sales_col {
    pub const SALES_DATE: usize = 1;
    pub const FLOOR: usize = 2;
    pub const FLOOR_PLAN: usize = 3;
    pub const DIRECTION: usize = 4;
    pub const SIZE: usize = 5;
    pub const BALCONY_SIZE: usize = 6;
    pub const SELLING_PRICE: usize = 7;
    pub const PRICE_PER_TSUBO: usize = 8;
    pub const COUNT: usize = 9;
}

mod rental_col {
    pub const LEASE_DATE: usize = 0;
    pub const RENT: usize = 1;
    pub const PRICE_PER_TSUBO: usize = 2;
    pub const MANAGEMENT_FEE: usize = 3;
    pub const DEPOSIT: usize = 4;
    pub const KEY_MONEY: usize = 5;
    pub const DEPOSIT2: usize = 6;
    pub const FLOOR: usize = 7;
    pub const SIZE: usize = 8;
    pub const FLOOR_PLAN: usize = 9;
    pub const DIRECTION: usize = 10;
    pub const COUNT: usize = 11;
}

fn row_cells(row: ElementRef<'_>) -> Vec<String> {
    row.select(&CELL_SEL).map(own_text).collect()
}

pub fn extract_sales(doc: &Html) -> Vec<SaleEvent> {
    use sales_col::*;

    let mut events = Vec::new();
    for row in doc.select(&SALES_ROW_SEL) {
        let cells = row_cells(row);
        if cells.len() < COUNT {
            debug!("Skipping sales row with {} cells", cells.len());
            continue;
        }

        events.push(SaleEvent {
            sales_date: parse_japanese_date(&cells[SALES_DATE]),
            floor: parse_floor_number(&cells[FLOOR]),
            floor_plan: non_empty(&cells[FLOOR_PLAN]),
            direction: non_empty(&cells[DIRECTION]),
            size: parse_number(&cells[SIZE]),
            balcony_size: parse_number(&cells[BALCONY_SIZE]),
            selling_price: parse_man_yen(&cells[SELLING_PRICE]),
            price_per_tsubo: parse_man_yen(&cells[PRICE_PER_TSUBO]),
        });
    }
    events
}

pub fn extract_rentals(doc: &Html) -> Vec<RentalEvent> {
    use rental_col::*;

    let mut events = Vec::new();
    for row in doc.select(&RENTAL_ROW_SEL) {
        let cells = row_cells(row);
        // Header rows carry <th> only.
        if cells.is_empty() {
            continue;
        }
        if cells.len() < COUNT {
            debug!("Skipping rental row with {} cells", cells.len());
            continue;
        }

        events.push(RentalEvent {
            lease_date: parse_japanese_date(&cells[LEASE_DATE]),
            rent: parse_yen(&cells[RENT]),
            price_per_tsubo: parse_yen(&cells[PRICE_PER_TSUBO]),
            management_fee: parse_yen(&cells[MANAGEMENT_FEE]),
            deposit: parse_yen(&cells[DEPOSIT]),
            key_money: parse_yen(&cells[KEY_MONEY]),
            deposit2: parse_yen(&cells[DEPOSIT2]),
            floor: parse_floor_number(&cells[FLOOR]),
            size: parse_number(&cells[SIZE]),
            floor_plan: non_empty(&cells[FLOOR_PLAN]),
            direction: non_empty(&cells[DIRECTION]),
        });
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::ParsedDate;

    fn sales_page(rows: &str) -> Html {
        Html::parse_document(&format!(
            r#"<div class="mansionSaleHistoryRow"><table class="tekisei_kakaku_sindan_list_area">
            <thead><tr><th>No</th><th>時期</th></tr></thead>
            <tbody class="display">{rows}</tbody></table></div>"#
        ))
    }

    fn rental_page(rows: &str) -> Html {
        Html::parse_document(&format!(
            r#"<div id="chintaiHistoryBlock"><table class="mansionOrderContentList"><tbody>{rows}</tbody></table></div>"#
        ))
    }

    #[test]
    fn sales_row_positional() {
        let doc = sales_page(
            "<tr><td>1</td><td>2019年3月</td><td>7階</td><td>3LDK</td><td>南</td>\
             <td>70.5</td><td>10.2</td><td>6,980万円</td><td>327</td></tr>",
        );
        let sales = extract_sales(&doc);
        assert_eq!(sales.len(), 1);
        let s = &sales[0];
        assert_eq!(s.sales_date, Some(ParsedDate { year: 2019, month: 3 }));
        assert_eq!(s.floor, Some(7));
        assert_eq!(s.floor_plan.as_deref(), Some("3LDK"));
        assert_eq!(s.direction.as_deref(), Some("南"));
        assert_eq!(s.size, Some(70.5));
        assert_eq!(s.balcony_size, Some(10.2));
        assert_eq!(s.selling_price, Some(69_800_000));
        assert_eq!(s.price_per_tsubo, Some(3_270_000));
    }

    #[test]
    fn sales_blank_cells_are_none() {
        let doc = sales_page(
            "<tr><td>2</td><td>2017年</td><td>B1階</td><td></td><td> </td>\
             <td>55.1</td><td>-</td><td>4,200万円</td><td></td></tr>",
        );
        let s = &extract_sales(&doc)[0];
        assert_eq!(s.sales_date, Some(ParsedDate { year: 2017, month: 1 }));
        assert_eq!(s.floor, Some(-1));
        assert_eq!(s.floor_plan, None);
        assert_eq!(s.direction, None);
        assert_eq!(s.balcony_size, None);
        assert_eq!(s.price_per_tsubo, None);
    }

    #[test]
    fn short_sales_row_skipped() {
        let doc = sales_page("<tr><td>1</td><td>2019年3月</td></tr>");
        assert!(extract_sales(&doc).is_empty());
    }

    #[test]
    fn rental_skips_header_row() {
        let doc = rental_page(
            "<tr><th>年月</th><th>賃料</th></tr>\
             <tr><td>2021年4月</td><td>18.5万円</td><td>1.1万円</td><td>12,000円</td>\
             <td>18.5万円</td><td>-</td><td>-</td><td>9階</td><td>65.3㎡</td><td>2LDK</td><td>東</td></tr>",
        );
        let rentals = extract_rentals(&doc);
        assert_eq!(rentals.len(), 1);
        let r = &rentals[0];
        assert_eq!(r.lease_date, Some(ParsedDate { year: 2021, month: 4 }));
        assert_eq!(r.rent, Some(185_000));
        assert_eq!(r.price_per_tsubo, Some(11_000));
        assert_eq!(r.management_fee, Some(12_000));
        assert_eq!(r.deposit, Some(185_000));
        assert_eq!(r.key_money, None);
        assert_eq!(r.floor, Some(9));
        assert_eq!(r.size, Some(65.3));
        assert_eq!(r.floor_plan.as_deref(), Some("2LDK"));
        assert_eq!(r.direction.as_deref(), Some("東"));
    }

    #[test]
    fn rental_short_row_skipped() {
        let doc = rental_page("<tr><td>2021年4月</td><td>18.5万円</td></tr>");
        assert!(extract_rentals(&doc).is_empty());
    }

    #[test]
    fn missing_tables_are_empty() {
        let doc = Html::parse_document("<html><body></body></html>");
        assert!(extract_sales(&doc).is_empty());
        assert!(extract_rentals(&doc).is_empty());
    }
}
