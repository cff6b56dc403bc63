use crate::{
    config::HarvestConfig, country_scraper::CountryLinkMatcher, errors::ConfigError,
    requests::RequestClient, type_classifier::TypeClassifier,
};

pub struct ScrapingContext {
    pub config: HarvestConfig,
    pub request_client: RequestClient,
    pub link_matcher: CountryLinkMatcher,
    pub classifier: TypeClassifier,
}

impl ScrapingContext {
    pub fn new(config: HarvestConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let request_client = RequestClient::new(
            &config.user_agent,
            config.request_timeout,
            config.max_retries,
            config.retry_backoff,
        )?;
        let link_matcher = CountryLinkMatcher::new()?;
        let classifier = TypeClassifier::new(&config.accept_type_keywords);
        Ok(ScrapingContext {
            config,
            request_client,
            link_matcher,
            classifier,
        })
    }
}
