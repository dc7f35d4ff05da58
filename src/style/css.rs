// src/style/css.rs

use std::fmt;

use super::adapter::{StyleEntry, TranslatedStyle};

/// One emitted rule: selectors sharing a non-empty declaration block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssRule {
    pub selectors: Vec<String>,
    pub declarations: Vec<(String, String)>,
}

impl fmt::Display for CssRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let block = self
            .declarations
            .iter()
            .map(|(p, v)| format!("{}: {}", p, v))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{} {{ {} }}", self.selectors.join(", "), block)
    }
}

/// Build rules for a whole translated style.
///
/// Table-wide rules come first (`#T_<id> <selector>`), then cell rules
/// (`#T_<id><selector>`), each group in engine order. Later rules win on
/// the rendering side, so the order is part of the output.
pub fn build_rules(style: &TranslatedStyle, uuid: &str, prefix: &str) -> Vec<CssRule> {
    let table_selector = format!("{}{}", prefix, uuid);
    let table = style
        .table_styles
        .iter()
        .filter_map(|e| rule_for(e, &table_selector, " "));
    let cells = style
        .cell_styles
        .iter()
        .filter_map(|e| rule_for(e, &table_selector, ""));
    table.chain(cells).collect()
}

/// `None` when every declaration is empty on both sides. Emptiness is
/// judged after trimming, so a whitespace-only pair counts as empty.
fn rule_for(entry: &StyleEntry, table_selector: &str, separator: &str) -> Option<CssRule> {
    let declarations: Vec<(String, String)> = entry
        .props
        .iter()
        .map(|(p, v)| (p.trim().to_string(), v.trim().to_string()))
        .filter(|(p, v)| !(p.is_empty() && v.is_empty()))
        .collect();
    if declarations.is_empty() || entry.selectors.is_empty() {
        return None;
    }
    let selectors = entry
        .selectors
        .iter()
        .map(|s| format!("{}{}{}", table_selector, separator, s))
        .collect();
    Some(CssRule {
        selectors,
        declarations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(selectors: &[&str], props: &[(&str, &str)]) -> StyleEntry {
        StyleEntry {
            selectors: selectors.iter().map(|s| s.to_string()).collect(),
            props: props
                .iter()
                .map(|(p, v)| (p.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn table_rules_come_before_cell_rules() {
        let style = TranslatedStyle {
            table_styles: vec![entry(&["th"], &[("font-size", "12px")])],
            cell_styles: vec![entry(
                &["row0_col0", "row1_col0"],
                &[("color", " black"), ("background-color", "orange")],
            )],
            body: vec![],
        };
        let rendered: Vec<String> = build_rules(&style, "abc", "#T_")
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            rendered,
            vec![
                "#T_abc th { font-size: 12px }".to_string(),
                "#T_abcrow0_col0, #T_abcrow1_col0 { color: black; background-color: orange }"
                    .to_string(),
            ]
        );
    }

    #[test]
    fn empty_declarations_produce_no_rule() {
        let style = TranslatedStyle {
            table_styles: vec![],
            cell_styles: vec![
                entry(&["row0_col0"], &[("", "")]),
                entry(&["row0_col1"], &[(" ", " "), ("color", "red")]),
            ],
            body: vec![],
        };
        let rules = build_rules(&style, "u", "#T_");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].to_string(), "#T_urow0_col1 { color: red }");
    }

    #[test]
    fn whitespace_only_declarations_count_as_empty() {
        let style = TranslatedStyle {
            table_styles: vec![entry(&["th"], &[(" ", "  ")])],
            cell_styles: vec![entry(&["row0_col0"], &[("\t", " "), ("", "")])],
            body: vec![],
        };
        assert!(build_rules(&style, "u", "#T_").is_empty());
    }
}
