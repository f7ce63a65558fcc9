use crate::entity::activities;
use sea_orm::{ActiveValue::NotSet, Set};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An activity as returned by the remote service.
///
/// Every field is optional: payloads are stored as received and only coerced
/// into the column types, never validated. A value that cannot be coerced
/// leaves that one field empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default, deserialize_with = "coerce::text")]
    pub activity: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "coerce::text")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "coerce::integer")]
    pub participants: Option<i64>,
    #[serde(default, deserialize_with = "coerce::float")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "coerce::text")]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "coerce::text")]
    pub key: Option<String>,
    #[serde(default, deserialize_with = "coerce::float")]
    pub accessibility: Option<f64>,
}

mod coerce {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
    }

    pub fn integer<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        let whole = |f: f64| (f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64);
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(whole))
            }
            _ => None,
        })
    }

    pub fn float<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            _ => None,
        })
    }
}

impl Activity {
    pub(crate) fn into_active_model(self) -> activities::ActiveModel {
        activities::ActiveModel {
            id: NotSet,
            activity: Set(self.activity),
            kind: Set(self.kind),
            participants: Set(self.participants),
            price: Set(self.price),
            link: Set(self.link),
            key: Set(self.key),
            accessibility: Set(self.accessibility),
        }
    }
}

/// A persisted activity together with the id the store assigned to it.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredActivity {
    pub id: i64,
    pub activity: Activity,
}

impl From<activities::Model> for StoredActivity {
    fn from(r: activities::Model) -> Self {
        Self {
            id: r.id,
            activity: Activity {
                activity: r.activity,
                kind: r.kind,
                participants: r.participants,
                price: r.price,
                link: r.link,
                key: r.key,
                accessibility: r.accessibility,
            },
        }
    }
}

struct Shown<'a, T>(&'a Option<T>);

impl<T: fmt::Display> fmt::Display for Shown<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{}", v),
            None => f.write_str("None"),
        }
    }
}

impl fmt::Display for StoredActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = &self.activity;
        write!(
            f,
            "Activity(id={}, activity='{}', type='{}', participants={}, price={}, accessibility={}, link='{}')",
            self.id,
            Shown(&a.activity),
            Shown(&a.kind),
            Shown(&a.participants),
            Shown(&a.price),
            Shown(&a.accessibility),
            Shown(&a.link),
        )
    }
}

/// Optional attributes narrowing which activity the service picks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityFilter {
    pub kind: Option<String>,
    pub participants: Option<i64>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub accessibility_min: Option<f64>,
    pub accessibility_max: Option<f64>,
    pub key: Option<String>,
}

impl ActivityFilter {
    pub fn is_empty(&self) -> bool {
        self.to_query().is_empty()
    }

    /// Query pairs for the fields that are set, using the service's wire names.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        [
            ("type", self.kind.clone()),
            ("participants", self.participants.map(|v| v.to_string())),
            ("price_min", self.price_min.map(|v| v.to_string())),
            ("price_max", self.price_max.map(|v| v.to_string())),
            (
                "accessibility_min",
                self.accessibility_min.map(|v| v.to_string()),
            ),
            (
                "accessibility_max",
                self.accessibility_max.map(|v| v.to_string()),
            ),
            ("key", self.key.clone()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
    }
}
