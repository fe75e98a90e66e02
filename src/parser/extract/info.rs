use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::parser::document::{direct_text, element_text, selector};
use crate::parser::normalize::*;
use crate::records::{Info, InfoValue};

static ITEM_SEL: LazyLock<Selector> = LazyLock::new(|| selector(".mansion_info ul li"));
static LABEL_SEL: LazyLock<Selector> = LazyLock::new(|| selector("span.named"));
static VALUE_SEL: LazyLock<Selector> = LazyLock::new(|| selector("p"));

/// Building info labels the site uses, with their canonical field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoLabel {
    Stations,
    Address,
    Units,
    Structure,
    NewConstructionSeller,
    ManagementCompany,
    Right,
    ElementarySchoolDistrict,
    Size,
    Other,
    TrainLines,
    CompletionDate,
    Floors,
    ConstructionCompany,
    DesignOffice,
    ManagementForm,
    UseArea,
    MiddleSchoolDistrict,
}

impl InfoLabel {
    pub fn from_label(label: &str) -> Option<Self> {
        let l = match label {
            "駅" => Self::Stations,
            "住所" => Self::Address,
            "総戸数" => Self::Units,
            "構造" => Self::Structure,
            "新築時売主" => Self::NewConstructionSeller,
            "管理会社" => Self::ManagementCompany,
            "権利" => Self::Right,
            "小学校区" => Self::ElementarySchoolDistrict,
            "専有面積" => Self::Size,
            "その他" => Self::Other,
            "路線" => Self::TrainLines,
            "竣工年月" => Self::CompletionDate,
            "階層" => Self::Floors,
            "施工会社" => Self::ConstructionCompany,
            "設計事務所" => Self::DesignOffice,
            "管理形態" => Self::ManagementForm,
            "用途地域" => Self::UseArea,
            "中学校区" => Self::MiddleSchoolDistrict,
            _ => return None,
        };
        Some(l)
    }

    pub fn field_name(self) -> &'static str {
        match self {
            Self::Stations => "stations",
            Self::Address => "address",
            Self::Units => "units",
            Self::Structure => "structure",
            Self::NewConstructionSeller => "newConstructionSeller",
            Self::ManagementCompany => "managementCompany",
            Self::Right => "right",
            Self::ElementarySchoolDistrict => "elementarySchoolDistrict",
            Self::Size => "size",
            Self::Other => "other",
            Self::TrainLines => "trainLines",
            Self::CompletionDate => "completionDate",
            Self::Floors => "floors",
            Self::ConstructionCompany => "constructionCompany",
            Self::DesignOffice => "designOffice",
            Self::ManagementForm => "managementForm",
            Self::UseArea => "useArea",
            Self::MiddleSchoolDistrict => "middleSchoolDistrict",
        }
    }
}

/// A translated label, or the page's own text when it isn't in the dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfoKey {
    Known(InfoLabel),
    Unknown(String),
}

impl InfoKey {
    pub fn translate(label: &str) -> Self {
        match InfoLabel::from_label(label) {
            Some(l) => Self::Known(l),
            None => Self::Unknown(label.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(l) => l.field_name(),
            Self::Unknown(s) => s,
        }
    }
}

pub fn extract(doc: &Html) -> Info {
    let mut info = Info::new();

    for item in doc.select(&ITEM_SEL) {
        let key = InfoKey::translate(&element_text(item, &LABEL_SEL));
        let raw = element_text(item, &VALUE_SEL);

        let value = match key {
            InfoKey::Known(InfoLabel::Stations) => {
                InfoValue::Stations(parse_station_distances(&raw))
            }
            InfoKey::Known(InfoLabel::Address) => {
                let address: String = item.select(&VALUE_SEL).map(direct_text).collect();
                InfoValue::Text(address.trim().to_string())
            }
            InfoKey::Known(InfoLabel::Units) => InfoValue::Count(parse_unit_count(&raw)),
            InfoKey::Known(InfoLabel::Size) => InfoValue::Size(parse_apartment_size_range(&raw)),
            InfoKey::Known(InfoLabel::TrainLines) => {
                InfoValue::TrainLines(parse_station_lines(&raw))
            }
            InfoKey::Known(InfoLabel::CompletionDate) => {
                InfoValue::Date(parse_japanese_date(&raw))
            }
            InfoKey::Known(InfoLabel::Floors) => InfoValue::Floors(parse_building_floors(&raw)),
            _ => InfoValue::Text(raw),
        };

        // Later duplicates of a label win.
        info.insert(key.as_str().to_string(), value);
    }

    info
}
