use super::profile::{PageButton, SearchProfile};

pub const DEFAULT_GROUP: &str = "puheenvuorot-2021";
pub const SPEECH_GROUP_PREFIX: &str = "puheenvuorot-";

/// Parliamentary years listed by `--list-groups`; other years still resolve.
pub const LISTED_YEARS: std::ops::RangeInclusive<u16> = 2015..=2024;

/// Plenary speeches ("varsinainen puheenvuoro") of one parliamentary year.
pub fn speeches(year: u16) -> SearchProfile {
    SearchProfile {
        name: format!("{}{}", SPEECH_GROUP_PREFIX, year),
        buttons: vec![
            PageButton::new(
                "Asiakirjatyyppinimi_Link_Puheenvuoro",
                "Asiakirjatyyppinimi_ChkGroup_Puheenvuoro_ContentLink",
                200,
            ),
            PageButton::new(
                "button-ValtiopaivavuosiTeksti2",
                format!("ValtiopaivavuosiTeksti2_Link_{}", year),
                0,
            ),
            PageButton::new(
                format!("ValtiopaivavuosiTeksti2_Link_{}", year),
                format!("ValtiopaivavuosiTeksti2_ChkGroup_{}_ContentLink", year),
                500,
            ),
            PageButton::new(
                "button-Puheenvuorotyyppi",
                "Puheenvuorotyyppi_Link_Varsinainen_puheenvuoro",
                0,
            ),
            PageButton::new(
                "Puheenvuorotyyppi_Link_Varsinainen_puheenvuoro",
                "PageLinkNext",
                0,
            ),
        ],
        ..Default::default()
    }
}

/// Year encoded in a `puheenvuorot-<year>` group name.
pub fn speech_year(name: &str) -> Option<u16> {
    name.strip_prefix(SPEECH_GROUP_PREFIX)?
        .parse::<u16>()
        .ok()
        .filter(|year| (1907..=2100).contains(year))
}
