//! Symbolizer compiler: maps one symbolizer onto one entity.
//!
//! Every kind has its own mapping function. They share a contract: they only
//! touch the graphics of the entity they are given, and they are no-ops when
//! the entity's geometry cannot carry the drawable (a Fill on a point, a Mark
//! on a line). Each returns whether it styled the entity.

mod billboard;
mod label;
mod model;
mod polygon;
mod polyline;

pub use billboard::{apply_icon, apply_mark};
pub use label::{apply_text, render_label_template};
pub use model::apply_model;
pub use polygon::apply_fill;
pub use polyline::apply_line;

use crate::config::StyleParserConfig;
use crate::errors::StyleError;
use crate::icons::IconImage;
use crate::leader_line::attach_leader_line;
use crate::scene::Entity;
use crate::style::Symbolizer;

/// Per entity bookkeeping for one styling pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassState {
    pub leader_line_attached: bool,
}

/// Applies a symbolizer to an entity.
///
/// `icon` is the resolved bitmap for Mark and Icon symbolizers; when it is
/// missing those symbolizers leave the entity untouched. Point symbolizers
/// first raise the entity to their display height, then attach a leader line
/// (once per pass), then place the symbol itself.
pub fn apply_symbolizer(
    entity: &mut Entity,
    symbolizer: &Symbolizer,
    icon: Option<&IconImage>,
    state: &mut PassState,
    config: &StyleParserConfig,
) -> Result<bool, StyleError> {
    if symbolizer.is_point_symbolizer() {
        if !entity.geometry_kind().is_point() {
            return Ok(false);
        }
        if symbolizer.needs_icon() && icon.is_none() {
            return Ok(false);
        }
        place_at_display_height(entity, symbolizer);
        if !state.leader_line_attached && attach_leader_line(entity, symbolizer, config)? {
            state.leader_line_attached = true;
        }
    }

    match (symbolizer, icon) {
        (Symbolizer::Fill(s), _) => apply_fill(entity, s, config),
        (Symbolizer::Line(s), _) => apply_line(entity, s, config),
        (Symbolizer::Mark(s), Some(icon)) => apply_mark(entity, s, icon),
        (Symbolizer::Icon(s), Some(icon)) => apply_icon(entity, s, icon),
        (Symbolizer::Model(s), _) => apply_model(entity, s),
        (Symbolizer::Text(s), _) => apply_text(entity, s, config),
        (Symbolizer::Mark(_) | Symbolizer::Icon(_), None) => Ok(false),
        (Symbolizer::Unknown, _) => {
            log::trace!("skipping symbolizer of unknown kind");
            Ok(false)
        }
    }
}

fn place_at_display_height(entity: &mut Entity, symbolizer: &Symbolizer) {
    if let (Some(height), Some(position)) = (symbolizer.display_height(), entity.position) {
        entity.position = Some(position.with_height(height));
    }
}
