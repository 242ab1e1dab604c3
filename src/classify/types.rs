//! Ticket classification value types.
//!
//! Every field has a designated fallback value. Parsing is lenient: labels
//! outside the vocabulary, non-string JSON values and missing fields all map
//! to the fallback instead of failing.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Ticket subject category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Topic {
    HowTo,
    Product,
    Connector,
    Lineage,
    ApiSdk,
    Sso,
    Glossary,
    BestPractices,
    SensitiveData,
    #[default]
    Unknown,
}

impl Topic {
    /// Every topic the classifier may return, in prompt order.
    pub const VOCABULARY: [Topic; 9] = [
        Topic::HowTo,
        Topic::Product,
        Topic::Connector,
        Topic::Lineage,
        Topic::ApiSdk,
        Topic::Sso,
        Topic::Glossary,
        Topic::BestPractices,
        Topic::SensitiveData,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Topic::HowTo => "How-to",
            Topic::Product => "Product",
            Topic::Connector => "Connector",
            Topic::Lineage => "Lineage",
            Topic::ApiSdk => "API/SDK",
            Topic::Sso => "SSO",
            Topic::Glossary => "Glossary",
            Topic::BestPractices => "Best practices",
            Topic::SensitiveData => "Sensitive data",
            Topic::Unknown => "Unknown",
        }
    }

    /// Parse a label, falling back to [`Topic::Unknown`].
    pub fn from_label(label: &str) -> Self {
        Self::VOCABULARY
            .into_iter()
            .find(|t| t.label() == label.trim())
            .unwrap_or_default()
    }
}

/// Customer sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Sentiment {
    Angry,
    Frustrated,
    Curious,
    Grateful,
    Happy,
    Confused,
    #[default]
    Neutral,
}

impl Sentiment {
    pub const VOCABULARY: [Sentiment; 7] = [
        Sentiment::Angry,
        Sentiment::Frustrated,
        Sentiment::Curious,
        Sentiment::Grateful,
        Sentiment::Happy,
        Sentiment::Confused,
        Sentiment::Neutral,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Angry => "Angry",
            Sentiment::Frustrated => "Frustrated",
            Sentiment::Curious => "Curious",
            Sentiment::Grateful => "Grateful",
            Sentiment::Happy => "Happy",
            Sentiment::Confused => "Confused",
            Sentiment::Neutral => "Neutral",
        }
    }

    /// Parse a label, falling back to [`Sentiment::Neutral`].
    pub fn from_label(label: &str) -> Self {
        Self::VOCABULARY
            .into_iter()
            .find(|s| s.label() == label.trim())
            .unwrap_or_default()
    }
}

/// Ticket priority, P0 being the most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Priority {
    P0,
    P1,
    #[default]
    P2,
}

impl Priority {
    pub const VOCABULARY: [Priority; 3] = [Priority::P0, Priority::P1, Priority::P2];

    pub fn label(&self) -> &'static str {
        match self {
            Priority::P0 => "P0",
            Priority::P1 => "P1",
            Priority::P2 => "P2",
        }
    }

    /// Parse a label, falling back to [`Priority::P2`].
    pub fn from_label(label: &str) -> Self {
        Self::VOCABULARY
            .into_iter()
            .find(|p| p.label() == label.trim())
            .unwrap_or_default()
    }
}

macro_rules! label_serde {
    ($($ty:ty),*) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = serde_json::Value::deserialize(deserializer)?;
                Ok(value.as_str().map(<$ty>::from_label).unwrap_or_default())
            }
        }
    )*};
}

label_serde!(Topic, Sentiment, Priority);

/// Classifier output for a single ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Classification {
    #[serde(default)]
    pub topic: Topic,
    #[serde(default)]
    pub sentiment: Sentiment,
    #[serde(default)]
    pub priority: Priority,
}

impl Classification {
    pub fn new(topic: Topic, sentiment: Sentiment, priority: Priority) -> Self {
        Self {
            topic,
            sentiment,
            priority,
        }
    }

    /// Build from loosely-typed JSON. Never fails; anything that is not an
    /// object yields the default classification.
    pub fn from_value(value: &serde_json::Value) -> Self {
        let field = |name: &str| value.get(name).and_then(|v| v.as_str()).unwrap_or("");
        Self {
            topic: Topic::from_label(field("topic")),
            sentiment: Sentiment::from_label(field("sentiment")),
            priority: Priority::from_label(field("priority")),
        }
    }
}
