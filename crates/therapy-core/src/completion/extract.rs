//! Tolerant extraction of the mood JSON the model is asked to emit.
//!
//! The model is told to answer with JSON only, but frequently wraps the
//! object in prose. The span from the first `{` to the last `}` is taken as
//! the candidate object; anything that cannot be used falls back to the
//! caller's defaults, field by field. Extraction never fails.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Lowest and highest mood score a persona can report.
pub const MOOD_MIN: i64 = 1;
pub const MOOD_MAX: i64 = 10;

/// A mood rating with the persona's one-sentence self-reflection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoodAssessment {
    pub mood_score: i64,
    pub self_reflection: String,
}

impl MoodAssessment {
    pub fn new(mood_score: i64, self_reflection: impl Into<String>) -> Self {
        Self { mood_score, self_reflection: self_reflection.into() }
    }
}

/// Pull `{mood_score, self_reflection}` out of free-form model output.
///
/// A numeric `mood_score` is rounded and clamped to `1..=10`. A missing or
/// mistyped key is replaced by the matching field of `defaults`.
pub fn extract_structured(text: &str, defaults: &MoodAssessment) -> MoodAssessment {
    let Some(object) = json_span(text).and_then(parse_object) else {
        debug!(len = text.len(), "no usable JSON object in model output; using defaults");
        return defaults.clone();
    };

    let mood_score = object
        .get("mood_score")
        .and_then(score_from_value)
        .unwrap_or(defaults.mood_score);
    let self_reflection = object
        .get("self_reflection")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| defaults.self_reflection.clone());

    MoodAssessment { mood_score, self_reflection }
}

// Greedy: first opening brace through last closing brace.
fn json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

fn parse_object(span: &str) -> Option<serde_json::Map<String, Value>> {
    match serde_json::from_str::<Value>(span) {
        Ok(Value::Object(map)) => Some(map),
        Ok(_) => None,
        Err(e) => {
            debug!(error = %e, "model output is not valid JSON");
            None
        }
    }
}

fn score_from_value(value: &Value) -> Option<i64> {
    let raw = match value.as_i64() {
        Some(n) => n,
        None => {
            let f = value.as_f64()?;
            if !f.is_finite() {
                return None;
            }
            f.round() as i64
        }
    };
    Some(raw.clamp(MOOD_MIN, MOOD_MAX))
}

#[cfg(test)]
mod test {
    use super::*;
    use tracing_test::traced_test;

    fn defaults() -> MoodAssessment {
        MoodAssessment::new(5, "I am processing my emotions...")
    }

    #[test]
    fn extracts_object_wrapped_in_prose() {
        let got = extract_structured(
            r#"noise {"mood_score":7,"self_reflection":"ok"} trailing"#,
            &defaults(),
        );
        assert_eq!(got, MoodAssessment::new(7, "ok"));
    }

    #[test]
    fn no_braces_yields_defaults() {
        assert_eq!(extract_structured("I feel fine, thanks.", &defaults()), defaults());
        assert_eq!(extract_structured("} backwards {", &defaults()), defaults());
        assert_eq!(extract_structured("", &defaults()), defaults());
    }

    #[test]
    #[traced_test]
    fn malformed_json_yields_defaults() {
        assert_eq!(
            extract_structured(r#"{"mood_score": 7, "self_reflection": }"#, &defaults()),
            defaults()
        );
        assert!(logs_contain("model output is not valid JSON"));
    }

    #[test]
    fn greedy_span_breaks_on_unrelated_braces() {
        let text = r#"{"mood_score": 2, "self_reflection": "low"} and also {curly}"#;
        assert_eq!(extract_structured(text, &defaults()), defaults());
    }

    #[test]
    fn missing_keys_fall_back_individually() {
        assert_eq!(extract_structured("{}", &defaults()), defaults());
        assert_eq!(
            extract_structured(r#"{"mood_score": 8}"#, &defaults()),
            MoodAssessment::new(8, "I am processing my emotions...")
        );
        assert_eq!(
            extract_structured(r#"{"self_reflection": "wary"}"#, &defaults()),
            MoodAssessment::new(5, "wary")
        );
    }

    #[test]
    fn mistyped_fields_fall_back() {
        let got = extract_structured(r#"{"mood_score": "seven", "self_reflection": 3}"#, &defaults());
        assert_eq!(got, defaults());
    }

    #[test]
    fn scores_are_rounded_and_clamped() {
        let d = defaults();
        assert_eq!(extract_structured(r#"{"mood_score": 6.6}"#, &d).mood_score, 7);
        assert_eq!(extract_structured(r#"{"mood_score": 0}"#, &d).mood_score, 1);
        assert_eq!(extract_structured(r#"{"mood_score": 42}"#, &d).mood_score, 10);
        assert_eq!(extract_structured(r#"{"mood_score": -3.2}"#, &d).mood_score, 1);
    }
}
