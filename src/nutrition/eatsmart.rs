//! Nutrient lookup against the eatsmart.jp calorie check.
//!
//! The site has no API: we load the search page, submit its search form,
//! follow the first result whose text contains the dish name, and read the
//! nutrient table on the result page. Selectors below track the site's
//! markup and break when it changes.

use std::{collections::BTreeMap, time::Duration};

use anyhow::Context;
use async_trait::async_trait;
use lazy_static::lazy_static;
use reqwest::{Client, Url};
use scraper::{Html, Selector};
use tracing::{debug, instrument, warn};

use super::lookup::{LookupError, NutrientFacts, NutrientLookupProvider};
use crate::config::LookupConfig;

pub const SEARCH_PATH: &str = "/do/caloriecheck/index";
const SEARCH_FIELD: &str = "searchKey";

lazy_static! {
    static ref FORM_SEL: Selector = Selector::parse("form").unwrap();
    static ref SEARCH_INPUT_SEL: Selector =
        Selector::parse(&format!("input[name='{SEARCH_FIELD}']")).unwrap();
    static ref HIDDEN_INPUT_SEL: Selector =
        Selector::parse("input[type='hidden'][name]").unwrap();
    static ref LINK_SEL: Selector = Selector::parse("a[href]").unwrap();
    static ref LABEL_SEL: Selector = Selector::parse("td.item > a").unwrap();
    static ref VALUE_SEL: Selector = Selector::parse("td.capa").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMethod {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchForm {
    pub action: Url,
    pub method: FormMethod,
    pub hidden: Vec<(String, String)>,
}

pub struct EatSmartLookup {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl EatSmartLookup {
    pub fn new(config: &LookupConfig) -> anyhow::Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("parse lookup base url {}", config.base_url))?;
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()
            .context("build lookup http client")?;
        Ok(Self {
            client,
            base_url,
            timeout: config.timeout(),
        })
    }

    async fn fetch(&self, req: reqwest::RequestBuilder) -> Result<(Url, String), LookupError> {
        let res = req.send().await?;
        let status = res.status();
        let url = res.url().clone();
        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = res.text().await?;
        Ok((url, body))
    }

    /// Submit the search and return the URL of the best matching result.
    async fn find_result(&self, dish: &str) -> Result<Url, LookupError> {
        let search_url = self
            .base_url
            .join(SEARCH_PATH)
            .map_err(|e| LookupError::BadUrl(e.to_string()))?;
        let (page_url, html) = self.fetch(self.client.get(search_url)).await?;

        let form = parse_search_form(&html, &page_url)
            .ok_or_else(|| LookupError::SearchFormMissing(page_url.to_string()))?;

        let mut fields = form.hidden;
        fields.push((SEARCH_FIELD.to_string(), dish.to_string()));
        let req = match form.method {
            FormMethod::Get => self.client.get(form.action).query(&fields),
            FormMethod::Post => self.client.post(form.action).form(&fields),
        };
        let (results_url, results) = self.fetch(req).await?;

        find_result_link(&results, dish, &results_url).ok_or_else(|| {
            LookupError::ResultNotFound {
                dish: dish.to_string(),
            }
        })
    }
}

#[async_trait]
impl NutrientLookupProvider for EatSmartLookup {
    #[instrument(skip(self))]
    async fn per_serving(&self, dish: &str) -> Result<NutrientFacts, LookupError> {
        let result_url = match tokio::time::timeout(self.timeout, self.find_result(dish)).await {
            Ok(found) => found?,
            Err(_) => {
                warn!(dish, timeout = ?self.timeout, "search result wait timed out");
                return Err(LookupError::Timeout(self.timeout));
            }
        };
        debug!(%result_url, "following search result");

        let (_, html) = self.fetch(self.client.get(result_url)).await?;
        let table = parse_nutrient_table(&html);
        debug!(rows = table.len(), "nutrient table parsed");
        NutrientFacts::from_table(&table)
    }
}

/// The form holding the search field, with its action resolved against the
/// page it came from.
pub fn parse_search_form(html: &str, page_url: &Url) -> Option<SearchForm> {
    let doc = Html::parse_document(html);
    let form = doc
        .select(&FORM_SEL)
        .find(|f| f.select(&SEARCH_INPUT_SEL).next().is_some())?;

    let action = match form.value().attr("action").map(str::trim) {
        Some(a) if !a.is_empty() => page_url.join(a).ok()?,
        _ => page_url.clone(),
    };
    let method = match form.value().attr("method") {
        Some(m) if m.eq_ignore_ascii_case("post") => FormMethod::Post,
        _ => FormMethod::Get,
    };
    let hidden = form
        .select(&HIDDEN_INPUT_SEL)
        .filter_map(|input| {
            let name = input.value().attr("name")?;
            let value = input.value().attr("value").unwrap_or_default();
            Some((name.to_string(), value.to_string()))
        })
        .collect();

    Some(SearchForm {
        action,
        method,
        hidden,
    })
}

/// First link whose visible text contains `dish`.
pub fn find_result_link(html: &str, dish: &str, page_url: &Url) -> Option<Url> {
    let doc = Html::parse_document(html);
    doc.select(&LINK_SEL)
        .filter(|a| a.text().collect::<String>().contains(dish))
        .find_map(|a| a.value().attr("href").and_then(|h| page_url.join(h).ok()))
}

/// Label cells and value cells zipped by position. A repeated label keeps the
/// last value.
pub fn parse_nutrient_table(html: &str) -> BTreeMap<String, String> {
    let doc = Html::parse_document(html);
    let labels = doc.select(&LABEL_SEL).map(|e| e.text().collect::<String>());
    let values = doc.select(&VALUE_SEL).map(|e| e.text().collect::<String>());
    labels
        .zip(values)
        .map(|(l, v)| (l.trim().to_string(), v.trim().to_string()))
        .collect()
}
