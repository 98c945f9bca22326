use crate::codec::{to_dash_encoding, to_packed_color, DashEncoding};
use crate::config::StyleParserConfig;
use crate::errors::StyleError;
use crate::scene::{Cartographic, ClassificationType, Entity, PolylineGraphics, PolylineMaterial};
use crate::style::LineSymbolizer;

/// Stroke parameters shared by Line symbolizers and Fill outlines.
pub(crate) struct Stroke<'a> {
    pub color: Option<&'a str>,
    pub opacity: Option<f64>,
    pub width: Option<f64>,
    pub dasharray: Option<&'a [f64]>,
    pub clamp_to_ground: Option<bool>,
    pub classification: Option<&'a str>,
}

pub(crate) fn stroke_graphics(
    positions: Vec<Cartographic>,
    stroke: &Stroke<'_>,
    config: &StyleParserConfig,
) -> Result<PolylineGraphics, StyleError> {
    let color = to_packed_color(stroke.color.unwrap_or("#000000"), stroke.opacity.unwrap_or(1.0))?;
    Ok(PolylineGraphics {
        positions,
        width: stroke.width.unwrap_or(1.0),
        material: PolylineMaterial::new(color, dash_for(stroke.dasharray, config)),
        clamp_to_ground: stroke.clamp_to_ground.unwrap_or(false),
        classification_type: classification_for(stroke.classification, config),
    })
}

/// Dash settings for a declared dash array. Arrays the codec cannot encode fall
/// back to the renderer default pattern with the configured length.
pub(crate) fn dash_for(dasharray: Option<&[f64]>, config: &StyleParserConfig) -> Option<DashEncoding> {
    let dasharray = dasharray.filter(|d| !d.is_empty())?;
    Some(to_dash_encoding(dasharray).unwrap_or_else(|| {
        log::debug!("dash array {dasharray:?} cannot be encoded, using the default pattern");
        DashEncoding {
            length: config.default_dash_length,
            pattern: 0x00FF,
        }
    }))
}

pub(crate) fn classification_for(value: Option<&str>, config: &StyleParserConfig) -> ClassificationType {
    value
        .and_then(ClassificationType::from_style)
        .unwrap_or(config.default_classification)
}

/// Line symbolizer: strokes line strings and polygon outlines.
pub fn apply_line(entity: &mut Entity, symbolizer: &LineSymbolizer, config: &StyleParserConfig) -> Result<bool, StyleError> {
    let kind = entity.geometry_kind();
    if !(kind.is_line() || kind.is_polygon()) {
        return Ok(false);
    }

    let stroke = Stroke {
        color: symbolizer.color.as_deref(),
        opacity: symbolizer.opacity,
        width: symbolizer.width,
        dasharray: symbolizer.dasharray.as_deref(),
        clamp_to_ground: symbolizer.ms_clamp_to_ground,
        classification: symbolizer.ms_classification_type.as_deref(),
    };
    entity.polyline = Some(stroke_graphics(entity.geometry.line_positions(), &stroke, config)?);
    Ok(true)
}
