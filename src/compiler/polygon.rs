use crate::codec::to_packed_color;
use crate::compiler::polyline::{classification_for, stroke_graphics, Stroke};
use crate::config::StyleParserConfig;
use crate::errors::StyleError;
use crate::scene::{Entity, PolygonGraphics};
use crate::style::FillSymbolizer;

/// Fill symbolizer: polygon fill plus an optional outline polyline.
///
/// The outline is styled exactly like a Line symbolizer on the exterior ring.
/// A fill without `color` leaves the polygon unfilled; the outline is only drawn
/// when an outline color or width is given.
pub fn apply_fill(entity: &mut Entity, symbolizer: &FillSymbolizer, config: &StyleParserConfig) -> Result<bool, StyleError> {
    if !entity.geometry_kind().is_polygon() {
        return Ok(false);
    }

    let clamp_to_ground = symbolizer.ms_clamp_to_ground.unwrap_or(false);
    let classification = symbolizer.ms_classification_type.as_deref();

    if let Some(color) = symbolizer.color.as_deref() {
        entity.polygon = Some(PolygonGraphics {
            hierarchy: entity.geometry.polygon_rings(),
            material: to_packed_color(color, symbolizer.fill_opacity.unwrap_or(1.0))?,
            classification_type: classification_for(classification, config),
            per_position_height: !clamp_to_ground,
        });
    }

    if symbolizer.outline_color.is_some() || symbolizer.outline_width.is_some() {
        let stroke = Stroke {
            color: symbolizer.outline_color.as_deref(),
            opacity: symbolizer.outline_opacity,
            width: symbolizer.outline_width,
            dasharray: symbolizer.outline_dasharray.as_deref(),
            clamp_to_ground: Some(clamp_to_ground),
            classification,
        };
        entity.polyline = Some(stroke_graphics(entity.geometry.line_positions(), &stroke, config)?);
    }

    Ok(true)
}
