//! Recurrence rule and its wire codec.
//!
//! Persisted rows carry the rule as a small JSON payload whose keys drifted
//! over time (`intervalDays`, `interval_days`, `everyDays`, or just a bare
//! integer). `decode` normalizes all of those; the rest of the engine only
//! ever sees the strict `RepeatRule` shape — or nothing, when the payload is
//! missing or nonsensical (interval <= 0 means "not recurring").

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A recurrence descriptor: repeat every `interval_days`, and optionally
/// complete unattended (skipping parental review).
///
/// Invariant: `interval_days > 0`. `decode`/`new` enforce it; a rule with a
/// zero interval cannot be observed by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatRule {
    pub interval_days: u32,
    pub auto_complete: bool,
}

impl RepeatRule {
    /// Build a rule, rejecting non-positive intervals.
    pub fn new(interval_days: u32, auto_complete: bool) -> Option<Self> {
        if interval_days == 0 {
            return None;
        }
        Some(Self {
            interval_days,
            auto_complete,
        })
    }

    /// Serialize to the canonical wire payload.
    pub fn encode(&self) -> Value {
        serde_json::json!({
            "interval_days": self.interval_days,
            "auto_complete": self.auto_complete,
        })
    }

    /// Parse a wire payload.
    ///
    /// Accepted shapes:
    /// - object with an interval under `interval_days` / `intervalDays` /
    ///   `everyDays` / `days`, and an optional flag under `auto_complete` /
    ///   `autoComplete` / `auto`
    /// - a bare integer (interval only, manual approval)
    ///
    /// Anything else — including an interval <= 0 — decodes to `None`
    /// ("no rule"), never to an error: a malformed rule on an old row must
    /// not brick the task it is attached to.
    pub fn decode(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Self::new(positive_u32(n)?, false),
            Value::Object(map) => {
                let interval = ["interval_days", "intervalDays", "everyDays", "days"]
                    .iter()
                    .find_map(|key| map.get(*key))
                    .and_then(Value::as_number)
                    .and_then(positive_u32)?;
                let auto = ["auto_complete", "autoComplete", "auto"]
                    .iter()
                    .find_map(|key| map.get(*key))
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                Self::new(interval, auto)
            }
            _ => None,
        }
    }
}

fn positive_u32(n: &serde_json::Number) -> Option<u32> {
    let v = n.as_i64()?;
    if v > 0 { u32::try_from(v).ok() } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn new_rejects_zero_interval() {
        assert_eq!(RepeatRule::new(0, true), None);
        assert!(RepeatRule::new(1, true).is_some());
    }

    #[rstest]
    #[case::canonical(json!({"interval_days": 7, "auto_complete": true}), 7, true)]
    #[case::camel(json!({"intervalDays": 3, "autoComplete": false}), 3, false)]
    #[case::legacy_every(json!({"everyDays": 14}), 14, false)]
    #[case::legacy_days(json!({"days": 2, "auto": true}), 2, true)]
    #[case::bare_integer(json!(5), 5, false)]
    fn decode_normalizes_aliased_shapes(
        #[case] payload: Value,
        #[case] interval: u32,
        #[case] auto: bool,
    ) {
        let rule = RepeatRule::decode(&payload).expect("should decode");
        assert_eq!(rule.interval_days, interval);
        assert_eq!(rule.auto_complete, auto);
    }

    #[rstest]
    #[case::zero(json!({"interval_days": 0}))]
    #[case::negative(json!({"intervalDays": -3}))]
    #[case::bare_zero(json!(0))]
    #[case::missing_interval(json!({"auto_complete": true}))]
    #[case::wrong_type(json!("weekly"))]
    #[case::null(Value::Null)]
    fn decode_yields_no_rule_for_invalid_payloads(#[case] payload: Value) {
        assert_eq!(RepeatRule::decode(&payload), None);
    }

    #[test]
    fn encode_decode_round_trip() {
        for interval in [1u32, 7, 30] {
            for auto in [false, true] {
                let rule = RepeatRule::new(interval, auto).unwrap();
                let back = RepeatRule::decode(&rule.encode()).unwrap();
                assert_eq!(back, rule);
            }
        }
    }
}
