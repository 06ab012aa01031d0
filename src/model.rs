//! Wire shape of the evaluation endpoint.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// X-axis category: the upstream sends integer step indices, but any JSON
/// number or string is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    /// Numeric tick, displayed exactly as received.
    Tick(serde_json::Number),
    /// Free-form text label.
    Text(String),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tick(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for Label {
    fn from(n: u64) -> Self {
        Self::Tick(n.into())
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// One complete evaluation episode as returned by `GET /api/evaluate`.
///
/// Every numeric series is expected to align index-for-index with
/// `timestamps`. Nothing enforces this; see [`EvaluationResult::misaligned_series`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Shared x-axis categories.
    pub timestamps: Vec<Label>,
    /// Demand (MW).
    pub load: Vec<f64>,
    /// Solar generation (MW).
    pub solar: Vec<f64>,
    /// Wind generation (MW).
    pub wind: Vec<f64>,
    /// Net grid exchange (MW).
    pub net_grid: Vec<f64>,
    /// Battery state of charge (0.0 to 1.0).
    pub soc: Vec<f64>,
    /// Battery control action (-1.0 discharge to 1.0 charge).
    pub actions: Vec<f64>,
}

impl EvaluationResult {
    /// Number of timesteps, taken from the label axis.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Returns `true` when the result carries no timesteps.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Named numeric series in display order.
    pub fn series(&self) -> [(&'static str, &[f64]); 6] {
        [
            ("load", self.load.as_slice()),
            ("solar", self.solar.as_slice()),
            ("wind", self.wind.as_slice()),
            ("net_grid", self.net_grid.as_slice()),
            ("soc", self.soc.as_slice()),
            ("actions", self.actions.as_slice()),
        ]
    }

    /// Names of the series whose length differs from `timestamps`.
    pub fn misaligned_series(&self) -> Vec<&'static str> {
        let n = self.len();
        self.series()
            .into_iter()
            .filter(|(_, values)| values.len() != n)
            .map(|(name, _)| name)
            .collect()
    }
}

/// Decoded body of an evaluation response.
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationResponse {
    /// The upstream ran the episode.
    Completed(EvaluationResult),
    /// The upstream reported an application-level failure.
    Failed(String),
}

impl EvaluationResponse {
    /// Parses a response body.
    ///
    /// A truthy `error` member wins over any other content. Otherwise the
    /// body must decode as a full [`EvaluationResult`].
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` for malformed JSON or missing series.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(body)?;
        if let Some(message) = error_message(&value) {
            return Ok(Self::Failed(message));
        }
        serde_json::from_value(value).map(Self::Completed)
    }
}

fn error_message(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "timestamps": [0, 1, 2],
        "load": [10.0, 12.5, 11.0],
        "solar": [0.0, 3.0, 4.0],
        "wind": [2.0, 2.0, 1.5],
        "net_grid": [8.0, 7.5, -5.5],
        "soc": [0.5, 0.55, 0.6],
        "actions": [0.2, 0.4, -0.1]
    }"#;

    #[test]
    fn parses_completed_result() {
        let resp = EvaluationResponse::from_json(SAMPLE).ok();
        let Some(EvaluationResponse::Completed(result)) = resp else {
            panic!("expected a completed result");
        };
        assert_eq!(result.len(), 3);
        assert_eq!(result.timestamps[2], Label::from(2_u64));
        assert_eq!(result.load[1], 12.5);
        assert!(result.misaligned_series().is_empty());
    }

    #[test]
    fn error_member_wins() {
        let resp = EvaluationResponse::from_json(r#"{"error": "bad config"}"#).ok();
        assert_eq!(resp, Some(EvaluationResponse::Failed("bad config".into())));
    }

    #[test]
    fn falsy_error_member_is_ignored() {
        let body = SAMPLE.replacen('{', r#"{"error": null,"#, 1);
        let resp = EvaluationResponse::from_json(&body).ok();
        assert!(matches!(resp, Some(EvaluationResponse::Completed(_))));

        let body = SAMPLE.replacen('{', r#"{"error": "","#, 1);
        let resp = EvaluationResponse::from_json(&body).ok();
        assert!(matches!(resp, Some(EvaluationResponse::Completed(_))));
    }

    #[test]
    fn non_string_error_is_rendered_as_json() {
        let resp = EvaluationResponse::from_json(r#"{"error": {"code": 7}}"#).ok();
        assert_eq!(
            resp,
            Some(EvaluationResponse::Failed(r#"{"code":7}"#.into()))
        );
    }

    #[test]
    fn missing_series_is_a_parse_error() {
        let resp = EvaluationResponse::from_json(r#"{"timestamps": [0], "load": [1.0]}"#);
        assert!(resp.is_err());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(EvaluationResponse::from_json("<html>502</html>").is_err());
    }

    #[test]
    fn labels_accept_strings_and_numbers() {
        let labels: Vec<Label> = serde_json::from_str(r#"[0, 1.5, "12:00"]"#).unwrap_or_default();
        let shown: Vec<String> = labels.iter().map(ToString::to_string).collect();
        assert_eq!(shown, vec!["0", "1.5", "12:00"]);
    }

    #[test]
    fn reports_misaligned_series() {
        let mut result = match EvaluationResponse::from_json(SAMPLE) {
            Ok(EvaluationResponse::Completed(r)) => r,
            other => panic!("unexpected {other:?}"),
        };
        result.soc.pop();
        result.wind.push(0.0);
        assert_eq!(result.misaligned_series(), vec!["wind", "soc"]);
    }
}
