// src/marshal.rs
//! Single entry point tying normalization, encoding, styling and appends
//! together.

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};
use tracing::{debug, warn};

use crate::append;
use crate::column_config::{self, ColumnConfigs};
use crate::config::MarshalConfig;
use crate::encode;
use crate::envelope::{Envelope, StyleRecord};
use crate::error::{MarshalError, Result};
use crate::normalize::{self, TableInput};
use crate::style::{self, Styler};
use crate::table::CanonicalTable;

/// Stable id derived from an element's position in the page tree.
///
/// Used as the style id when the styler carries none, so re-running the
/// same script yields the same selectors.
pub fn default_uuid(delta_path: &[u32]) -> String {
    let mut h = DefaultHasher::new();
    delta_path.hash(&mut h);
    h.finish().to_string()
}

/// Stateless apart from its config; safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct Marshaller {
    config: MarshalConfig,
}

impl Marshaller {
    pub fn new(config: MarshalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MarshalConfig {
        &self.config
    }

    pub fn normalize(&self, input: &TableInput) -> Result<CanonicalTable> {
        normalize::normalize(input, &self.config)
    }

    /// Full payload for `input`, with a style record when it is styled.
    #[tracing::instrument(level = "debug", skip(self, input), fields(source = input.kind_name()))]
    pub fn marshal(&self, input: &TableInput, default_uuid: &str) -> Result<Envelope> {
        let style = match input {
            TableInput::Styled(styler) => Some(self.style_record(styler, default_uuid)?),
            _ => None,
        };
        let table = self.normalize(input)?;
        let env = Envelope::build(encode::encode(&table)?, style, None)?;
        debug!(
            rows = table.num_rows(),
            cols = table.num_columns(),
            styled = env.style().is_some(),
            "marshalled table"
        );
        Ok(env)
    }

    /// Full payload for `input` ignoring any styling.
    pub fn marshal_unstyled(&self, input: &TableInput) -> Result<Envelope> {
        let table = self.normalize(input)?;
        Envelope::build(encode::encode(&table)?, None, None)
    }

    /// Like [`marshal`](Self::marshal), but a style that cannot be read
    /// downgrades to a plain payload instead of failing the call.
    pub fn marshal_or_degrade(&self, input: &TableInput, default_uuid: &str) -> Result<Envelope> {
        match self.marshal(input, default_uuid) {
            Err(MarshalError::StyleIntrospection(reason)) => {
                warn!(%reason, "dropping unreadable style, sending plain table");
                self.marshal_unstyled(input)
            }
            other => other,
        }
    }

    /// Delta payload adding `input`'s rows after `prior`.
    ///
    /// A styled batch carries its own style record, bound to the delta's
    /// rows only.
    pub fn append(
        &self,
        prior: &Envelope,
        input: &TableInput,
        default_uuid: &str,
    ) -> Result<Envelope> {
        let batch = self.normalize(input)?;
        let delta = append::append_to(prior, &batch)?;
        match input {
            TableInput::Styled(styler) => {
                let style = self.style_record(styler, default_uuid)?;
                Envelope::build(delta.table().to_vec(), Some(style), delta.append_info())
            }
            _ => Ok(delta),
        }
    }

    /// Full payload for an editable table, with its column configuration.
    pub fn marshal_editor(
        &self,
        input: &TableInput,
        default_uuid: &str,
        columns: &ColumnConfigs,
    ) -> Result<Envelope> {
        let json = column_config::to_json(columns)?;
        Ok(self.marshal(input, default_uuid)?.with_column_config(json))
    }

    fn style_record(&self, styler: &Styler, default_uuid: &str) -> Result<StyleRecord> {
        let (display, overlay) = style::extract(styler, default_uuid, &self.config)?;
        Ok(StyleRecord::from_overlay(&overlay, encode::encode(&display)?))
    }
}
