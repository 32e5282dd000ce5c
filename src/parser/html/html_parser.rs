use crate::config::ResultSelectors;
use crate::parser::{ParseOutcome, Parser};
use crate::{ScraperError, ScraperResult, SpeechRecord};
use log::{debug, trace, warn};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Pulls [`SpeechRecord`]s out of the inner HTML of a search result group.
pub struct ResultListParser {
    item: Selector,
    title: Selector,
    speaker: Selector,
    intro: Selector,
    date: Selector,
    whitespace: Regex,
    date_pattern: Regex,
}

fn selector(css: &str) -> ScraperResult<Selector> {
    Selector::parse(css)
        .map_err(|e| ScraperError::Config(format!("invalid selector '{}': {}", css, e)))
}

impl ResultListParser {
    pub fn new(selectors: &ResultSelectors) -> ScraperResult<Self> {
        Ok(Self {
            item: selector(&selectors.item)?,
            title: selector(&selectors.title)?,
            speaker: selector(&selectors.speaker)?,
            intro: selector(&selectors.intro)?,
            date: selector(&selectors.date)?,
            whitespace: Regex::new(r"\s+").expect("whitespace pattern is valid"),
            date_pattern: Regex::new(r"\b\d{1,2}\.\d{1,2}\.\d{4}\b")
                .expect("date pattern is valid"),
        })
    }

    fn clean(&self, text: &str) -> String {
        self.whitespace.replace_all(text, " ").trim().to_string()
    }

    fn text_of(&self, item: &ElementRef, selector: &Selector) -> String {
        item.select(selector)
            .next()
            .map(|e| self.clean(&e.text().collect::<String>()))
            .unwrap_or_default()
    }

    fn date_of(&self, item: &ElementRef) -> String {
        let date = self.text_of(item, &self.date);
        if !date.is_empty() {
            return date;
        }
        let text = item.text().collect::<String>();
        self.date_pattern
            .find(&text)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    }

    fn parse_item(&self, item: &ElementRef, base_url: &Url) -> Option<SpeechRecord> {
        let anchor = item.select(&self.title).next()?;
        let link = anchor
            .value()
            .attr("href")
            .and_then(|href| match base_url.join(href) {
                Ok(url) => Some(url.to_string()),
                Err(e) => {
                    warn!("Ignoring unparsable link '{}': {}", href, e);
                    None
                }
            })
            .unwrap_or_default();

        Some(SpeechRecord {
            title: self.clean(&anchor.text().collect::<String>()),
            date: self.date_of(item),
            link,
            speaker: self.text_of(item, &self.speaker),
            intro: self.text_of(item, &self.intro),
        })
    }
}

impl Parser for ResultListParser {
    fn parse(&self, html: &str, base_url: &Url) -> ScraperResult<ParseOutcome> {
        let fragment = Html::parse_fragment(html);
        trace!("Parsing result HTML: {}", html);

        let mut outcome = ParseOutcome::default();
        for item in fragment.select(&self.item) {
            match self.parse_item(&item, base_url) {
                Some(record) => outcome.records.push(record),
                None => {
                    warn!("Skipping search hit without a title link");
                    outcome.skipped += 1;
                }
            }
        }

        debug!(
            "Parsed {} records ({} skipped)",
            outcome.records.len(),
            outcome.skipped
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <div name="Item" class="ms-srch-item">
            <div class="ms-srch-item-title">
                <a href="/FI/vaski/PoytakirjaAsiakohta/Sivut/PTK_12+2021+2.aspx">Täysistunnon   pöytäkirja
                    PTK 12/2021 vp</a>
            </div>
            <div class="edk-srch-tmpl-pvm">16.2.2021</div>
            <div class="edk-srch-tmpl-puhuja">Ben   Zyskowicz  kok</div>
            <div class="edk-srch-tmpl-puheenvuoro">  Arvoisa   puhemies!
                Hallitus esittää...</div>
        </div>
        <div name="Item" class="ms-srch-item">
            <div class="ms-srch-item-title">
                <a href="https://www.eduskunta.fi/FI/vaski/x.aspx">Pöytäkirja 17.3.2021 PTK 25/2021 vp</a>
            </div>
            <div class="edk-srch-tmpl-puhuja">Li Andersson vas</div>
        </div>
        <div name="Item" class="ms-srch-item">
            <div class="edk-srch-tmpl-puhuja">No title here</div>
        </div>
    "#;

    fn parser() -> ResultListParser {
        ResultListParser::new(&ResultSelectors::default()).unwrap()
    }

    fn base() -> Url {
        Url::parse("https://www.eduskunta.fi/FI/search/Sivut/Vaskiresults.aspx").unwrap()
    }

    #[test]
    fn test_extracts_fields_and_normalises_whitespace() {
        let outcome = parser().parse(PAGE, &base()).unwrap();
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.skipped, 1);

        let first = &outcome.records[0];
        assert_eq!(first.title, "Täysistunnon pöytäkirja PTK 12/2021 vp");
        assert_eq!(first.date, "16.2.2021");
        assert_eq!(
            first.link,
            "https://www.eduskunta.fi/FI/vaski/PoytakirjaAsiakohta/Sivut/PTK_12+2021+2.aspx"
        );
        assert_eq!(first.speaker, "Ben Zyskowicz kok");
        assert_eq!(first.intro, "Arvoisa puhemies! Hallitus esittää...");
    }

    #[test]
    fn test_missing_fields_fall_back() {
        let outcome = parser().parse(PAGE, &base()).unwrap();
        let second = &outcome.records[1];
        assert_eq!(second.link, "https://www.eduskunta.fi/FI/vaski/x.aspx");
        assert_eq!(second.date, "17.3.2021");
        assert_eq!(second.intro, "");
    }

    #[test]
    fn test_empty_page_yields_nothing() {
        let outcome = parser().parse("<p>Ei tuloksia</p>", &base()).unwrap();
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.skipped, 0);
    }

    #[test]
    fn test_invalid_selector_is_config_error() {
        let selectors = ResultSelectors {
            title: "div[[".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            ResultListParser::new(&selectors),
            Err(ScraperError::Config(_))
        ));
    }
}
