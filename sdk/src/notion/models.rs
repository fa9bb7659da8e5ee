//! Data models for the Notion database query and page update endpoints

use {
    rust_decimal::Decimal,
    serde::{Deserialize, Serialize},
    std::collections::BTreeMap,
};

/// Database query filter. Only the shapes the sync sends are modelled.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Filter {
    Or { or: Vec<Filter> },
    Select { property: String, select: Equals },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Equals {
    pub equals: String,
}

impl Filter {
    pub fn select_equals(property: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Select {
            property: property.into(),
            select: Equals {
                equals: value.into(),
            },
        }
    }

    pub fn or(filters: Vec<Filter>) -> Self {
        Filter::Or { or: filters }
    }
}

/// Body of `POST /v1/databases/{id}/query`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<&'a Filter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<&'a str>,
}

/// One page of query results.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    pub results: Vec<Page>,
    #[serde(default)]
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

/// A database row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,
}

impl Page {
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }
}

/// Property value of a page, tagged by its Notion `type`. Kinds the sync
/// never reads, numbers included, collapse into [`PropertyValue::Other`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Select { select: Option<SelectOption> },
    Title { title: Vec<RichText> },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichText {
    #[serde(default)]
    pub plain_text: String,
}

impl PropertyValue {
    /// Name of the selected option, if this is a select with a value.
    pub fn select_name(&self) -> Option<&str> {
        match self {
            PropertyValue::Select {
                select: Some(option),
            } => Some(option.name.as_str()),
            _ => None,
        }
    }

    /// Concatenated plain text, if this is a title.
    pub fn title_text(&self) -> Option<String> {
        match self {
            PropertyValue::Title { title } => {
                Some(title.iter().map(|t| t.plain_text.as_str()).collect())
            }
            _ => None,
        }
    }
}

/// Typed value written by a page update.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyUpdate {
    Number(Decimal),
    Date(DateValue),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateValue {
    pub start: String,
}

impl PropertyUpdate {
    pub fn date(start: impl Into<String>) -> Self {
        PropertyUpdate::Date(DateValue {
            start: start.into(),
        })
    }
}

/// Body of `PATCH /v1/pages/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdatePageRequest<'a> {
    pub properties: &'a BTreeMap<String, PropertyUpdate>,
}
