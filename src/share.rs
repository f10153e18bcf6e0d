//! Social share intents
//!
//! Builds an X (Twitter) intent URL carrying a message, an optional
//! transaction link and the project hashtags, and hands it to a
//! [`ShareSink`].

use url::Url;

const INTENT_URL: &str = "https://x.com/intent/tweet";
const HASHTAGS: &str = "#VinuHub #VinuChain";

/// Opens share intent URLs (browser tab, system opener, ...)
pub trait ShareSink: Send + Sync {
    fn open(&self, url: &str);
}

/// Sink that only logs the intent
#[derive(Debug, Default, Clone, Copy)]
pub struct LogShareSink;

impl ShareSink for LogShareSink {
    fn open(&self, url: &str) {
        log::info!("Share intent: {}", url);
    }
}

/// Intent URL for `message`, linking `link` (transaction page or site origin)
pub fn share_intent_url(message: &str, link: &str) -> String {
    let text = format!("{} {} {}", message, link, HASHTAGS);
    match Url::parse_with_params(INTENT_URL, &[("text", text.as_str())]) {
        Ok(url) => url.to_string(),
        // INTENT_URL is a constant, valid URL
        Err(_) => INTENT_URL.to_string(),
    }
}
