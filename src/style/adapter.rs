// src/style/adapter.rs
//! Readers for the styling engine's "translated style" structure.
//!
//! The engine has emitted at least two shapes over time. Cell styles were
//! first keyed by a single selector:
//!
//! ```text
//! {"props": [["color", " black"], ["", ""]], "selector": "row0_col0"}
//! ```
//!
//! and later by a list of selectors sharing one declaration block:
//!
//! ```text
//! {"props": [["color", " black"]], "selectors": ["row0_col0", "row1_col0"]}
//! ```
//!
//! Each shape gets its own adapter producing the same [`TranslatedStyle`].
//! The adapter is picked by probing the data, not by an engine version.

use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::{MarshalError, Result};

/// Engine-independent form of a translated style.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TranslatedStyle {
    /// Table-wide rules, in engine order.
    pub table_styles: Vec<StyleEntry>,
    /// Per-cell rules, in engine order.
    pub cell_styles: Vec<StyleEntry>,
    /// Body cells carrying a display value.
    pub body: Vec<DisplayCell>,
}

/// Raw declarations bound to one or more engine selectors.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleEntry {
    pub selectors: Vec<String>,
    pub props: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayCell {
    /// Engine cell id, e.g. `row3_col1`.
    pub id: String,
    pub display_value: String,
}

/// One supported upstream shape.
pub trait TranslatedStyleAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Cheap structural check: can this adapter read `raw`?
    fn probe(&self, raw: &JsonValue) -> bool;

    fn adapt(&self, raw: &JsonValue) -> Result<TranslatedStyle>;
}

/// Cell entries carry `"selector": "<id>"`.
pub struct SingleSelectorAdapter;

/// Cell entries carry `"selectors": ["<id>", ...]`.
pub struct MultiSelectorAdapter;

/// Probe order: the newer shape first. With no cell styles at all both
/// probes pass and the first wins; the result is the same either way.
static ADAPTERS: &[&dyn TranslatedStyleAdapter] = &[&MultiSelectorAdapter, &SingleSelectorAdapter];

/// Convert an engine structure into a [`TranslatedStyle`].
///
/// Fails with `StyleIntrospection` when the value is not an object, when
/// no adapter recognises it, or when the chosen adapter cannot read it.
pub fn translate(raw: &JsonValue) -> Result<TranslatedStyle> {
    if !raw.is_object() {
        return Err(MarshalError::style("translated style is not an object"));
    }
    let adapter = ADAPTERS
        .iter()
        .find(|a| a.probe(raw))
        .ok_or_else(|| MarshalError::style("no adapter recognises the cell style shape"))?;
    debug!(adapter = adapter.name(), "selected style adapter");
    adapter.adapt(raw)
}

// ─── serde shapes ──────────────────────────────────────────────────────

#[derive(Deserialize)]
struct SelectorShape {
    selector: String,
    props: Vec<(String, String)>,
}

#[derive(Deserialize)]
struct SelectorsShape {
    selectors: Vec<String>,
    props: Vec<(String, String)>,
}

#[derive(Deserialize)]
struct BodyCellShape {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    display_value: Option<JsonValue>,
}

#[derive(Deserialize)]
struct SingleSelectorShape {
    #[serde(default)]
    table_styles: Vec<SelectorShape>,
    #[serde(default)]
    cellstyle: Vec<SelectorShape>,
    #[serde(default)]
    body: Vec<Vec<BodyCellShape>>,
}

#[derive(Deserialize)]
struct MultiSelectorShape {
    #[serde(default)]
    table_styles: Vec<SelectorShape>,
    #[serde(default)]
    cellstyle: Vec<SelectorsShape>,
    #[serde(default)]
    body: Vec<Vec<BodyCellShape>>,
}

/// Every `cellstyle` entry has `key` of the expected JSON type.
fn cells_have(raw: &JsonValue, key: &str, check: fn(&JsonValue) -> bool) -> bool {
    match raw.get("cellstyle") {
        None => true,
        Some(JsonValue::Array(entries)) => entries
            .iter()
            .all(|e| e.get(key).map_or(false, check)),
        Some(_) => false,
    }
}

fn parse<T: for<'de> Deserialize<'de>>(raw: &JsonValue, adapter: &str) -> Result<T> {
    serde_json::from_value(raw.clone())
        .map_err(|e| MarshalError::style(format!("{} adapter: {}", adapter, e)))
}

fn table_entries(shapes: Vec<SelectorShape>) -> Vec<StyleEntry> {
    shapes
        .into_iter()
        .map(|s| StyleEntry {
            selectors: vec![s.selector],
            props: s.props,
        })
        .collect()
}

/// Python-style rendering of a JSON display value.
fn display_string(v: JsonValue) -> String {
    match v {
        JsonValue::String(s) => s,
        JsonValue::Bool(true) => "True".to_string(),
        JsonValue::Bool(false) => "False".to_string(),
        JsonValue::Null => "None".to_string(),
        other => other.to_string(),
    }
}

fn body_cells(rows: Vec<Vec<BodyCellShape>>) -> Vec<DisplayCell> {
    rows.into_iter()
        .flatten()
        .filter_map(|cell| match (cell.id, cell.display_value) {
            (Some(id), Some(v)) => Some(DisplayCell {
                id,
                display_value: display_string(v),
            }),
            _ => None,
        })
        .collect()
}

impl TranslatedStyleAdapter for SingleSelectorAdapter {
    fn name(&self) -> &'static str {
        "single-selector"
    }

    fn probe(&self, raw: &JsonValue) -> bool {
        cells_have(raw, "selector", JsonValue::is_string)
    }

    fn adapt(&self, raw: &JsonValue) -> Result<TranslatedStyle> {
        let shape: SingleSelectorShape = parse(raw, self.name())?;
        Ok(TranslatedStyle {
            table_styles: table_entries(shape.table_styles),
            cell_styles: table_entries(shape.cellstyle),
            body: body_cells(shape.body),
        })
    }
}

impl TranslatedStyleAdapter for MultiSelectorAdapter {
    fn name(&self) -> &'static str {
        "multi-selector"
    }

    fn probe(&self, raw: &JsonValue) -> bool {
        cells_have(raw, "selectors", JsonValue::is_array)
    }

    fn adapt(&self, raw: &JsonValue) -> Result<TranslatedStyle> {
        let shape: MultiSelectorShape = parse(raw, self.name())?;
        Ok(TranslatedStyle {
            table_styles: table_entries(shape.table_styles),
            cell_styles: shape
                .cellstyle
                .into_iter()
                .map(|s| StyleEntry {
                    selectors: s.selectors,
                    props: s.props,
                })
                .collect(),
            body: body_cells(shape.body),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_selector_shape() -> Result<()> {
        let raw = json!({
            "table_styles": [{"selector": "th", "props": [["font-size", "12px"]]}],
            "cellstyle": [
                {"selector": "row0_col0", "props": [["color", " black"], ["", ""]]}
            ],
            "body": [[
                {"type": "th", "id": "level0_row0", "display_value": 0},
                {"type": "td", "id": "row0_col0", "display_value": "1.00"}
            ]]
        });
        assert!(SingleSelectorAdapter.probe(&raw));
        assert!(!MultiSelectorAdapter.probe(&raw));

        let t = translate(&raw)?;
        assert_eq!(t.table_styles[0].selectors, vec!["th"]);
        assert_eq!(t.cell_styles[0].selectors, vec!["row0_col0"]);
        assert_eq!(t.cell_styles[0].props.len(), 2);
        assert_eq!(t.body.len(), 2);
        assert_eq!(t.body[1].display_value, "1.00");
        Ok(())
    }

    #[test]
    fn multi_selector_shape() -> Result<()> {
        let raw = json!({
            "cellstyle": [
                {"selectors": ["row0_col0", "row1_col0"], "props": [["color", "red"]]}
            ],
            "body": []
        });
        assert!(MultiSelectorAdapter.probe(&raw));
        assert!(!SingleSelectorAdapter.probe(&raw));

        let t = translate(&raw)?;
        assert_eq!(t.cell_styles[0].selectors, vec!["row0_col0", "row1_col0"]);
        Ok(())
    }

    #[test]
    fn missing_sections_are_empty() -> Result<()> {
        assert_eq!(translate(&json!({}))?, TranslatedStyle::default());
        Ok(())
    }

    #[test]
    fn unknown_shapes_fail() {
        for raw in [
            json!([1, 2]),
            json!({"cellstyle": [{"props": [["color", "red"]]}]}),
            json!({"cellstyle": "row0_col0"}),
            json!({"cellstyle": [{"selector": "row0_col0", "props": "color: red"}]}),
            json!({"body": [{"id": "row0_col0"}]}),
        ] {
            assert!(
                matches!(translate(&raw), Err(MarshalError::StyleIntrospection(_))),
                "{}",
                raw
            );
        }
    }

    #[test]
    fn display_values_render_like_python() {
        assert_eq!(display_string(json!(true)), "True");
        assert_eq!(display_string(json!(1.5)), "1.5");
        assert_eq!(display_string(json!("x")), "x");
    }
}
