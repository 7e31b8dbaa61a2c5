//! Lead records and transmission adapters
//!
//! The simulation only ever produces [`LeadRecord`] values. Getting them off
//! the page is the job of a [`LeadSink`], which must return immediately:
//! whatever happens to the request afterwards is logged and forgotten.

use serde::{Deserialize, Serialize};

use crate::error::LeadError;
use crate::recommend::Summary;

/// Record type tag of the end-of-session submission
pub const COMPLETE_RECORD_TYPE: &str = "COMPLETE - Full Lead with Priorities";

/// A form field a gate can collect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadField {
    Name,
    Email,
    Organization,
    Title,
}

impl LeadField {
    pub const ALL: [LeadField; 4] = [
        LeadField::Name,
        LeadField::Email,
        LeadField::Organization,
        LeadField::Title,
    ];

    /// DOM id of the matching form input
    pub fn input_id(&self) -> &'static str {
        match self {
            LeadField::Name => "name",
            LeadField::Email => "email",
            LeadField::Organization => "organization",
            LeadField::Title => "title",
        }
    }
}

/// Contact details gathered so far
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadInfo {
    pub name: String,
    pub email: String,
    pub organization: String,
    pub title: String,
}

impl LeadInfo {
    pub fn set(&mut self, field: LeadField, value: impl Into<String>) {
        let slot = match field {
            LeadField::Name => &mut self.name,
            LeadField::Email => &mut self.email,
            LeadField::Organization => &mut self.organization,
            LeadField::Title => &mut self.title,
        };
        *slot = value.into();
    }
}

/// Wire format of a lead submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadRecord {
    /// Which capture stage produced the record
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub email: String,
    pub organization: String,
    pub title: String,
    pub score: u64,
    /// `"Label (3x), Label (1x)"`
    pub top_priorities: String,
    /// Comma-joined product names
    pub recommended_games: String,
}

impl LeadRecord {
    fn build(kind: String, info: &LeadInfo, score: u64, summary: &Summary) -> Self {
        Self {
            kind,
            name: info.name.clone(),
            email: info.email.clone(),
            organization: info.organization.clone(),
            title: info.title.clone(),
            score,
            top_priorities: summary.format_priorities(),
            recommended_games: summary.recommended_names(),
        }
    }

    /// Snapshot taken right after gate `gate` (1-based) was submitted
    pub fn partial(gate: u32, info: &LeadInfo, score: u64, summary: &Summary) -> Self {
        Self::build(format!("GATE {} - Partial Lead", gate), info, score, summary)
    }

    /// End-of-session record
    pub fn complete(info: &LeadInfo, score: u64, summary: &Summary) -> Self {
        Self::build(COMPLETE_RECORD_TYPE.to_string(), info, score, summary)
    }

    pub fn to_json(&self) -> Result<String, LeadError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Destination for lead records
pub trait LeadSink {
    /// Hand the record off. Must not block and must not fail loudly.
    fn submit(&self, record: LeadRecord);
}

/// Writes records to the log instead of the network
#[derive(Debug, Default)]
pub struct LogSink;

impl LeadSink for LogSink {
    fn submit(&self, record: LeadRecord) {
        match record.to_json() {
            Ok(json) => log::info!("Lead record ({}): {}", record.kind, json),
            Err(e) => log::error!("{}", e),
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use fetch::FetchSink;

#[cfg(target_arch = "wasm32")]
mod fetch {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    use super::{LeadRecord, LeadSink};
    use crate::error::LeadError;

    /// POSTs records as JSON to a fixed endpoint
    pub struct FetchSink {
        endpoint: String,
    }

    impl FetchSink {
        pub fn new(endpoint: impl Into<String>) -> Self {
            Self {
                endpoint: endpoint.into(),
            }
        }
    }

    impl LeadSink for FetchSink {
        fn submit(&self, record: LeadRecord) {
            let endpoint = self.endpoint.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match post(&endpoint, &record).await {
                    Ok(()) => log::info!("Form submitted successfully ({})", record.kind),
                    Err(e) => log::error!("{}", e),
                }
            });
        }
    }

    fn network(err: JsValue) -> LeadError {
        LeadError::Network(format!("{:?}", err))
    }

    async fn post(endpoint: &str, record: &LeadRecord) -> Result<(), LeadError> {
        let body = record.to_json()?;

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_body(&JsValue::from_str(&body));

        let request = Request::new_with_str_and_init(endpoint, &opts).map_err(network)?;
        let headers = request.headers();
        headers
            .set("Content-Type", "application/json")
            .map_err(network)?;
        headers.set("Accept", "application/json").map_err(network)?;

        let window =
            web_sys::window().ok_or_else(|| LeadError::Network("no window".to_string()))?;
        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(network)?
            .dyn_into()
            .map_err(network)?;

        if response.ok() {
            return Ok(());
        }

        let body = match response.text() {
            Ok(promise) => JsFuture::from(promise)
                .await
                .ok()
                .and_then(|v| v.as_string())
                .unwrap_or_default(),
            Err(_) => String::new(),
        };
        Err(LeadError::Status {
            code: response.status(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::{RankedPriority, Recommendation};

    fn sample_summary() -> Summary {
        Summary {
            top_priorities: vec![
                RankedPriority {
                    label: "Retention".to_string(),
                    hits: 2,
                },
                RankedPriority {
                    label: "Hand Hygiene".to_string(),
                    hits: 1,
                },
            ],
            recommendations: vec![
                Recommendation {
                    name: "New Hire Navigator".to_string(),
                    description: String::new(),
                    score: 2,
                    matched: vec!["Retention".to_string()],
                },
                Recommendation {
                    name: "Care IQ".to_string(),
                    description: String::new(),
                    score: 1,
                    matched: vec!["Hand Hygiene".to_string()],
                },
            ],
        }
    }

    #[test]
    fn test_lead_info_set() {
        let mut info = LeadInfo::default();
        for field in LeadField::ALL {
            info.set(field, field.input_id());
        }
        assert_eq!(info.name, "name");
        assert_eq!(info.email, "email");
        assert_eq!(info.organization, "organization");
        assert_eq!(info.title, "title");
    }

    #[test]
    fn test_complete_record_wire_format() {
        let info = LeadInfo {
            name: "Ada".to_string(),
            email: "ada@example.org".to_string(),
            organization: "General".to_string(),
            title: "CNO".to_string(),
        };
        let record = LeadRecord::complete(&info, 300, &sample_summary());
        let json: serde_json::Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();

        assert_eq!(json["type"], COMPLETE_RECORD_TYPE);
        assert_eq!(json["name"], "Ada");
        assert_eq!(json["score"], 300);
        assert_eq!(json["topPriorities"], "Retention (2x), Hand Hygiene (1x)");
        assert_eq!(json["recommendedGames"], "New Hire Navigator, Care IQ");
    }

    #[test]
    fn test_partial_record_tag() {
        let record = LeadRecord::partial(2, &LeadInfo::default(), 0, &Summary::default());
        assert_eq!(record.kind, "GATE 2 - Partial Lead");
        assert_eq!(record.top_priorities, "");
    }
}
