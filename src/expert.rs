use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Social handles and contact details. Every field is optional; `None` means
/// the model did not report it, `Some("")` means it reported an empty value.
/// A value of the wrong JSON type is read as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Socials {
    #[serde(default, deserialize_with = "lenient_string")]
    pub twitter: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub linkedin: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub github: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
}

impl Socials {
    /// Platform label and value for every non-empty handle, in schema order.
    pub fn present(&self) -> Vec<(&'static str, &str)> {
        [
            ("Twitter", &self.twitter),
            ("Linkedin", &self.linkedin),
            ("Github", &self.github),
            ("Website", &self.website),
            ("Email", &self.email),
        ]
        .into_iter()
        .filter_map(|(label, value)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| (label, v))
        })
        .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExpertProfile {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub affiliation: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient_socials")]
    pub socials: Option<Socials>,
}

// Model output drifts from the schema field by field (`"github": 42`,
// `"socials": ""`); one bad field must not cost the whole profile.
fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(d)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

fn lenient_socials<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Socials>, D::Error> {
    match Value::deserialize(d)? {
        value @ Value::Object(_) => Ok(Socials::deserialize(value).ok()),
        _ => Ok(None),
    }
}

/// One page from the search provider, as handed to the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub url: String,
    pub content: String,
}

/// An extracted profile together with the page it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub url: String,
    pub profile: ExpertProfile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpertSearch {
    /// The rewritten query that was sent to the search provider.
    pub query: String,
    pub findings: Vec<Finding>,
}
