// src/column_config.rs
//! Per-column display settings sent alongside editable tables.

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

use crate::error::{MarshalError, Result};

/// Narrowest column the frontend will lay out, in pixels.
pub const MIN_WIDTH: u32 = 25;

/// Keyed by column name (or position, as a string).
pub type ColumnConfigs = BTreeMap<String, ColumnConfig>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Int,
    Float,
    String,
    Text,
    Datetime,
    Time,
    Date,
    Boolean,
    Id,
    Markdown,
    Image,
    Url,
    Uri,
}

impl ColumnType {
    pub const ALL: [ColumnType; 13] = [
        ColumnType::Int,
        ColumnType::Float,
        ColumnType::String,
        ColumnType::Text,
        ColumnType::Datetime,
        ColumnType::Time,
        ColumnType::Date,
        ColumnType::Boolean,
        ColumnType::Id,
        ColumnType::Markdown,
        ColumnType::Image,
        ColumnType::Url,
        ColumnType::Uri,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::Int => "int",
            ColumnType::Float => "float",
            ColumnType::String => "string",
            ColumnType::Text => "text",
            ColumnType::Datetime => "datetime",
            ColumnType::Time => "time",
            ColumnType::Date => "date",
            ColumnType::Boolean => "boolean",
            ColumnType::Id => "id",
            ColumnType::Markdown => "markdown",
            ColumnType::Image => "image",
            ColumnType::Url => "url",
            ColumnType::Uri => "uri",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ColumnType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = ColumnType::ALL.iter().map(|t| t.as_str()).collect();
                format!("unknown column type '{}', expected one of {}", s, known.join(", "))
            })
    }
}

/// Unset fields are left out of the JSON entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editable: Option<bool>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub column_type: Option<ColumnType>,
}

impl ColumnConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty title counts as unset.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        self.title = (!title.is_empty()).then_some(title);
        self
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = Some(editable);
        self
    }

    pub fn column_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = Some(column_type);
        self
    }

    /// Set the type from its wire name, e.g. `"markdown"`.
    pub fn type_name(self, column: &str, name: &str) -> Result<Self> {
        let t = name.parse().map_err(|message| MarshalError::InvalidColumnConfig {
            column: column.to_string(),
            message,
        })?;
        Ok(self.column_type(t))
    }

    pub fn validate(&self, column: &str) -> Result<()> {
        let invalid = |message: String| MarshalError::InvalidColumnConfig {
            column: column.to_string(),
            message,
        };
        if let Some(title) = &self.title {
            if !title.is_empty() && title.chars().all(char::is_numeric) {
                return Err(invalid(format!("title '{}' must not be numeric", title)));
            }
        }
        if let Some(width) = self.width {
            if width < MIN_WIDTH {
                return Err(invalid(format!(
                    "width {} is below the minimum of {}",
                    width, MIN_WIDTH
                )));
            }
        }
        Ok(())
    }
}

/// Validate every entry and serialize the map as one JSON object.
pub fn to_json(configs: &ColumnConfigs) -> Result<String> {
    for (column, cfg) in configs {
        cfg.validate(column)?;
    }
    Ok(serde_json::to_string(configs)?)
}

/// Parse and validate a JSON column configuration.
pub fn from_json(json: &str) -> Result<ColumnConfigs> {
    let configs: ColumnConfigs = serde_json::from_str(json)?;
    for (column, cfg) in &configs {
        cfg.validate(column)?;
    }
    Ok(configs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_fields_are_omitted() -> Result<()> {
        let mut configs = ColumnConfigs::new();
        configs.insert("a".into(), ColumnConfig::new().width(40));
        configs.insert(
            "b".into(),
            ColumnConfig::new()
                .title("Bee")
                .editable(false)
                .column_type(ColumnType::Markdown),
        );
        assert_eq!(
            to_json(&configs)?,
            r#"{"a":{"width":40},"b":{"title":"Bee","editable":false,"type":"markdown"}}"#
        );
        Ok(())
    }

    #[test]
    fn empty_title_is_unset() {
        assert_eq!(ColumnConfig::new().title(""), ColumnConfig::new());
    }

    #[test]
    fn numeric_titles_and_narrow_widths_fail() {
        let numeric = ColumnConfig::new().title("123");
        assert!(matches!(
            numeric.validate("a"),
            Err(MarshalError::InvalidColumnConfig { .. })
        ));

        let narrow = ColumnConfig::new().width(MIN_WIDTH - 1);
        assert!(narrow.validate("a").is_err());
        assert!(ColumnConfig::new().width(MIN_WIDTH).validate("a").is_ok());
        assert!(ColumnConfig::new().title("Q3").validate("a").is_ok());
    }

    #[test]
    fn type_names() -> Result<()> {
        for t in ColumnType::ALL {
            assert_eq!(t.as_str().parse::<ColumnType>(), Ok(t));
        }
        let cfg = ColumnConfig::new().type_name("a", "uri")?;
        assert_eq!(cfg.column_type, Some(ColumnType::Uri));

        let err = ColumnConfig::new().type_name("a", "blob").unwrap_err();
        assert!(err.to_string().contains("unknown column type 'blob'"));
        Ok(())
    }

    #[test]
    fn json_is_validated_on_the_way_in() -> Result<()> {
        let ok = from_json(r#"{"x":{"type":"date","width":30}}"#)?;
        assert_eq!(ok["x"].column_type, Some(ColumnType::Date));

        assert!(matches!(
            from_json(r#"{"x":{"type":"blob"}}"#),
            Err(MarshalError::Json(_))
        ));
        assert!(matches!(
            from_json(r#"{"x":{"width":3}}"#),
            Err(MarshalError::InvalidColumnConfig { .. })
        ));
        Ok(())
    }
}
