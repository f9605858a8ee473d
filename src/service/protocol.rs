//! JSON request and response shapes shared by both transports.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::{CareerLensError, Result};
use crate::pipeline::inference::{InferenceService, ItemResult, PredictionResult};

pub const MODEL_NOT_LOADED: &str = "model not loaded";
pub const MISSING_TEXT: &str = "provide `text` or `texts` in JSON body";

/// Extract the texts of a prediction request.
///
/// `text` wins over `texts`. Non-string values are scored by their JSON
/// rendering and `null` counts as blank, so a malformed item never fails the
/// batch.
pub fn request_texts(body: &Value) -> Result<Vec<String>> {
    let object = body
        .as_object()
        .ok_or_else(|| CareerLensError::invalid_input(MISSING_TEXT))?;

    if let Some(text) = object.get("text") {
        return Ok(vec![coerce_text(text)]);
    }
    match object.get("texts") {
        Some(Value::Array(items)) => Ok(items.iter().map(coerce_text).collect()),
        Some(other) => Ok(vec![coerce_text(other)]),
        None => Err(CareerLensError::invalid_input(MISSING_TEXT)),
    }
}

fn coerce_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Answer a request body against the service.
///
/// The readiness check comes first, so an unloaded service reports
/// [`CareerLensError::ArtifactMissing`] whatever the body holds.
pub fn answer(service: &InferenceService, body: &Value, top_k: usize) -> Result<PredictResponse> {
    if !service.is_ready() {
        return Err(CareerLensError::artifact_missing(MODEL_NOT_LOADED));
    }
    let texts = request_texts(body)?;
    let results = service.predict(&texts, top_k)?;
    Ok(PredictResponse::from_results(&texts, results))
}

/// A label with its confidence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredLabel {
    pub label: String,
    pub confidence: f64,
}

/// One entry of `predictions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionItem {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probs: Option<BTreeMap<String, f64>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub top_labels: Vec<ScoredLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PredictionItem {
    fn from_result(text: &str, result: ItemResult) -> Self {
        match result {
            Ok(prediction) => PredictionItem {
                label: Some(prediction.label().to_string()),
                top_labels: prediction
                    .top_labels
                    .iter()
                    .map(|(label, confidence)| ScoredLabel {
                        label: label.clone(),
                        confidence: *confidence,
                    })
                    .collect(),
                probs: prediction.probs,
                text: prediction.text,
                error: None,
            },
            Err(e) => PredictionItem {
                text: text.to_string(),
                label: None,
                probs: None,
                top_labels: Vec::new(),
                error: Some(e.to_string()),
            },
        }
    }
}

/// Body of a successful prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictResponse {
    pub predictions: Vec<PredictionItem>,
}

impl PredictResponse {
    pub fn from_results(texts: &[String], results: Vec<ItemResult>) -> Self {
        PredictResponse {
            predictions: texts
                .iter()
                .zip(results)
                .map(|(text, result)| PredictionItem::from_result(text, result))
                .collect(),
        }
    }

    /// First item that produced a label.
    pub fn first_labeled(&self) -> Option<&PredictionItem> {
        self.predictions.iter().find(|item| item.label.is_some())
    }
}

/// A recommended career as rendered for profile-guidance clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CareerPath {
    pub name: String,
    pub description: String,
    pub skills: Vec<String>,
    pub courses: Vec<String>,
    pub job_roles: Vec<String>,
    pub roadmap: Vec<String>,
}

impl CareerPath {
    pub fn new(label: &str, confidence: f64) -> Self {
        CareerPath {
            name: label.to_string(),
            description: format!(
                "Recommended based on your profile (confidence: {:.0}%)",
                confidence * 100.0
            ),
            skills: Vec::new(),
            courses: Vec::new(),
            job_roles: vec![label.to_string()],
            roadmap: Vec::new(),
        }
    }
}

/// Line-mode response: the predictions plus career paths for the first
/// labeled text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuidanceResponse {
    #[serde(flatten)]
    pub response: PredictResponse,
    pub career_paths: Vec<CareerPath>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl From<PredictResponse> for GuidanceResponse {
    fn from(response: PredictResponse) -> Self {
        let career_paths: Vec<CareerPath> = response
            .first_labeled()
            .map(|item| {
                item.top_labels
                    .iter()
                    .map(|scored| CareerPath::new(&scored.label, scored.confidence))
                    .collect()
            })
            .unwrap_or_default();
        let summary = career_paths.first().map(|top| {
            format!(
                "Based on our career guidance model. Top match: {}.",
                top.name
            )
        });
        GuidanceResponse {
            response,
            career_paths,
            summary,
        }
    }
}

/// Structured failure body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new<S: Into<String>>(error: S) -> Self {
        ErrorResponse {
            error: error.into(),
            message: None,
        }
    }

    pub fn with_message<S: Into<String>>(mut self, message: S) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl From<&CareerLensError> for ErrorResponse {
    fn from(err: &CareerLensError) -> Self {
        match err {
            CareerLensError::ArtifactMissing(msg) | CareerLensError::InvalidInput(msg) => {
                ErrorResponse::new(msg.clone())
            }
            other => ErrorResponse::new(other.to_string()),
        }
    }
}

impl From<PredictionResult> for PredictionItem {
    fn from(result: PredictionResult) -> Self {
        let text = result.text.clone();
        PredictionItem::from_result(&text, Ok(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_texts() {
        assert_eq!(
            request_texts(&json!({"text": "python sql"})).unwrap(),
            vec!["python sql"]
        );
        assert_eq!(
            request_texts(&json!({"texts": ["a", null, 3]})).unwrap(),
            vec!["a", "", "3"]
        );
        // `text` takes precedence
        assert_eq!(
            request_texts(&json!({"text": "x", "texts": ["y"]})).unwrap(),
            vec!["x"]
        );
    }

    #[test]
    fn test_missing_keys() {
        for body in [json!({}), json!({"other": 1}), json!([1, 2]), json!("text")] {
            let err = request_texts(&body).unwrap_err();
            assert!(matches!(err, CareerLensError::InvalidInput(_)));
            assert_eq!(ErrorResponse::from(&err).error, MISSING_TEXT);
        }
    }

    #[test]
    fn test_unloaded_answer() {
        let err = answer(&InferenceService::unloaded(), &json!({}), 3).unwrap_err();
        let body = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(body, json!({"error": "model not loaded"}));
    }

    #[test]
    fn test_item_serialization() {
        let item = PredictionItem::from(PredictionResult {
            text: "python".to_string(),
            top_labels: vec![("Data Scientist".to_string(), 1.0)],
            probs: None,
        });
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["label"], "Data Scientist");
        assert!(value.get("probs").is_none());
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_guidance_rendering() {
        let response = PredictResponse {
            predictions: vec![PredictionItem::from(PredictionResult {
                text: "python".to_string(),
                top_labels: vec![
                    ("Data Scientist".to_string(), 0.8),
                    ("Nurse".to_string(), 0.2),
                ],
                probs: None,
            })],
        };
        let guidance = GuidanceResponse::from(response);

        assert_eq!(guidance.career_paths.len(), 2);
        assert_eq!(
            guidance.career_paths[0].description,
            "Recommended based on your profile (confidence: 80%)"
        );
        assert_eq!(guidance.career_paths[0].job_roles, vec!["Data Scientist"]);
        assert!(guidance.summary.unwrap().ends_with("Top match: Data Scientist."));

        let value = serde_json::to_value(GuidanceResponse::from(PredictResponse {
            predictions: Vec::new(),
        }))
        .unwrap();
        assert!(value["predictions"].as_array().unwrap().is_empty());
        assert!(value.get("summary").is_none());
    }
}
