pub mod appraisal;
pub mod history;
pub mod info;
pub mod location;
pub mod market;
pub mod review;

// ── Tests ──

#[cfg(test)]
mod tests {
    use scraper::Html;

    use super::*;
    use crate::records::{InfoValue, ParsedDate, StationDistance};

    fn fixture(name: &str) -> Html {
        let html = std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap();
        Html::parse_document(&html)
    }

    #[test]
    fn full_page_info() {
        let doc = fixture("full_listing");
        let info = info::extract(&doc);
        assert_eq!(
            info.get("address"),
            Some(&InfoValue::Text("東京都新宿区西新宿6-14-1".into()))
        );
        match info.get("stations") {
            Some(InfoValue::Stations(s)) => {
                assert_eq!(s.len(), 2);
                assert_eq!(
                    s[0],
                    StationDistance { station_name: "都庁前駅".into(), minutes: 3 }
                );
            }
            other => panic!("stations: {:?}", other),
        }
        match info.get("trainLines") {
            Some(InfoValue::TrainLines(l)) => {
                assert_eq!(l.len(), 2);
                assert_eq!(l[0].station_name, "都庁前駅");
                assert_eq!(l[0].lines, vec!["都営大江戸線"]);
            }
            other => panic!("trainLines: {:?}", other),
        }
        assert_eq!(
            info.get("completionDate"),
            Some(&InfoValue::Date(Some(ParsedDate { year: 2011, month: 6 })))
        );
        assert_eq!(info.get("structure"), Some(&InfoValue::Text("RC造".into())));
    }

    #[test]
    fn full_page_sections() {
        let doc = fixture("full_listing");
        assert_eq!(location::building_name(&doc), "パークタワー西新宿");
        assert_eq!(location::city(&doc), "新宿区");
        assert_eq!(location::town(&doc), "西新宿");
        assert_eq!(history::extract_sales(&doc).len(), 2);
        assert_eq!(history::extract_rentals(&doc).len(), 2);
        assert!(market::extract_sales(&doc).unwrap().is_some());
        assert!(market::extract_rentals(&doc).unwrap().is_some());
        assert_eq!(review::extract(&doc).town_ranking_cap, Some(48));
        assert_eq!(
            appraisal::extract(&doc).sales_appraisal_to_amount,
            Some(92_000_000)
        );
    }

    #[test]
    fn sales_only_page() {
        let doc = fixture("sales_only");
        assert_eq!(history::extract_sales(&doc).len(), 1);
        assert!(history::extract_rentals(&doc).is_empty());
        assert_eq!(market::extract_rentals(&doc).unwrap(), None);
        assert!(appraisal::extract(&doc).rent_appraisal_from_amount.is_none());
    }
}
