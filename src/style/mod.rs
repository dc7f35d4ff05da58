// src/style/mod.rs

pub mod adapter;
pub mod css;
pub mod display;

pub use adapter::{translate, TranslatedStyle, TranslatedStyleAdapter};
pub use css::CssRule;

use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use tracing::debug;

use crate::config::MarshalConfig;
use crate::error::Result;
use crate::normalize::{normalize_frame, Frame};
use crate::table::CanonicalTable;

/// A frame plus the styling engine's output for it.
///
/// `translated` is the engine's translated-style structure (table styles,
/// cell styles, body cells with display values) as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct Styler {
    data: Frame,
    translated: JsonValue,
    uuid: Option<String>,
    caption: Option<String>,
}

impl Styler {
    pub fn new(data: Frame, translated: JsonValue) -> Self {
        Self {
            data,
            translated,
            uuid: None,
            caption: None,
        }
    }

    pub fn with_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = Some(uuid.into());
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn data(&self) -> &Frame {
        &self.data
    }

    pub fn translated(&self) -> &JsonValue {
        &self.translated
    }

    pub fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }
}

/// Visual overrides bound to one table by shape.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleOverlay {
    pub uuid: String,
    pub caption: Option<String>,
    pub rules: Vec<CssRule>,
    /// `(row, column)` → string shown instead of the raw value.
    pub display_values: BTreeMap<(usize, usize), String>,
}

impl StyleOverlay {
    /// All rules as one stylesheet, one rule per line.
    pub fn styles(&self) -> String {
        self.rules
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Compute the overlay and the display-values table for a styled input.
///
/// The styler's own uuid wins when set and non-empty, otherwise
/// `default_uuid` is used. Nothing is returned unless the whole translated
/// style was understood.
#[tracing::instrument(level = "debug", skip(styler, cfg), fields(has_uuid = styler.uuid().is_some()))]
pub fn extract(
    styler: &Styler,
    default_uuid: &str,
    cfg: &MarshalConfig,
) -> Result<(CanonicalTable, StyleOverlay)> {
    let uuid = styler
        .uuid()
        .filter(|u| !u.is_empty())
        .unwrap_or(default_uuid)
        .to_string();

    // 1) read the engine structure before doing any work on the data
    let translated = translate(styler.translated())?;

    // 2) rules
    let rules = css::build_rules(&translated, &uuid, &cfg.table_selector_prefix);

    // 3) display values on a stringified copy
    let base = normalize_frame(styler.data(), cfg)?;
    let (display_table, overrides) =
        display::display_values(&base, &translated.body, &cfg.null_display)?;

    debug!(
        uuid = %uuid,
        rules = rules.len(),
        overrides = overrides.len(),
        "extracted style overlay"
    );

    Ok((
        display_table,
        StyleOverlay {
            uuid,
            caption: styler.caption.clone(),
            rules,
            display_values: overrides,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MarshalError;
    use crate::table::Value;
    use serde_json::json;

    fn frame() -> Frame {
        Frame::from_rows(vec!["a", "b"], vec![vec![1.0, 2.0], vec![3.0, 4.0]])
    }

    fn translated() -> JsonValue {
        json!({
            "table_styles": [
                {"selector": "caption", "props": [["color", "grey"]]}
            ],
            "cellstyle": [
                {"selectors": ["row1_col0"], "props": [["background-color", "yellow"]]},
                {"selectors": ["row0_col0"], "props": [["", ""]]}
            ],
            "body": [
                [{"id": "row0_col0", "display_value": "1.0"}, {"id": "row0_col1", "display_value": "2.0"}],
                [{"id": "row1_col0", "display_value": "3.00"}, {"id": "row1_col1", "display_value": "4.0"}]
            ]
        })
    }

    #[test]
    fn own_uuid_wins() -> Result<()> {
        let styler = Styler::new(frame(), translated()).with_uuid("mine");
        let (_, overlay) = extract(&styler, "fallback", &MarshalConfig::default())?;
        assert_eq!(overlay.uuid, "mine");
        assert!(overlay.styles().starts_with("#T_mine caption"));
        Ok(())
    }

    #[test]
    fn empty_uuid_uses_default() -> Result<()> {
        let styler = Styler::new(frame(), translated()).with_uuid("");
        let (_, overlay) = extract(&styler, "42", &MarshalConfig::default())?;
        assert_eq!(overlay.uuid, "42");
        Ok(())
    }

    #[test]
    fn full_overlay() -> Result<()> {
        let styler = Styler::new(frame(), translated()).with_caption("Totals");
        let (table, overlay) = extract(&styler, "7", &MarshalConfig::default())?;

        assert_eq!(overlay.caption.as_deref(), Some("Totals"));
        assert_eq!(
            overlay.styles(),
            "#T_7 caption { color: grey }\n#T_7row1_col0 { background-color: yellow }"
        );
        assert_eq!(table.names(), ["a", "b"]);
        assert_eq!(table.value(1, 0), Some(&Value::from("3.00")));
        assert_eq!(table.value(1, 1), Some(&Value::from("4.0")));
        assert_eq!(overlay.display_values.len(), 4);
        Ok(())
    }

    #[test]
    fn broken_structure_gives_no_overlay() {
        let styler = Styler::new(frame(), json!({"cellstyle": 3}));
        assert!(matches!(
            extract(&styler, "x", &MarshalConfig::default()),
            Err(MarshalError::StyleIntrospection(_))
        ));
    }
}
