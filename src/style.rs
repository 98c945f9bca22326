//! Renderer independent style documents.
//!
//! A [`Style`] is an ordered list of [`Rule`]s. Each rule pairs an optional
//! [`Filter`] with the [`Symbolizer`]s applied to every feature it matches. The
//! shapes mirror the GeoStyler JSON documents hosts already store, so a style can
//! be loaded straight from JSON:
//!
//! ```rust
//! use scenestyle::style::{Style, Symbolizer};
//!
//! let style = Style::from_json(r##"{
//!     "name": "roads",
//!     "rules": [{
//!         "name": "highway",
//!         "filter": ["==", "type", "highway"],
//!         "symbolizers": [{ "kind": "Line", "color": "#ff0000", "width": 2 }]
//!     }]
//! }"##).unwrap();
//!
//! assert!(matches!(style.rules[0].symbolizers[0], Symbolizer::Line(_)));
//! ```

mod filter;
mod symbolizer;

use serde::{Deserialize, Serialize};

use crate::errors::StyleError;

pub use filter::{ExpressionFilter, Filter, FilterEvaluator};
pub use symbolizer::{
    image_id_for_symbolizer, FillSymbolizer, IconSymbolizer, LeaderLineOptions, LineSymbolizer,
    MarkSymbolizer, ModelSymbolizer, Symbolizer, TextSymbolizer,
};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Style {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default)]
    pub name: String,
    /// `None` matches every feature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    #[serde(default)]
    pub symbolizers: Vec<Symbolizer>,
}

impl Style {
    pub fn from_json(source: &str) -> Result<Style, StyleError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Checks every symbolizer for the fields its kind requires.
    pub fn validate(&self) -> Result<(), StyleError> {
        for rule in &self.rules {
            for symbolizer in &rule.symbolizers {
                symbolizer
                    .validate()
                    .map_err(|reason| StyleError::malformed(&rule.name, reason))?;
            }
        }
        Ok(())
    }
}
