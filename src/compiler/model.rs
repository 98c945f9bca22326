use crate::codec::to_packed_color;
use crate::errors::StyleError;
use crate::scene::{Entity, HeightReference, ModelGraphics};
use crate::style::ModelSymbolizer;

/// Model symbolizer: a 3D asset placed at the point, tinted with the symbolizer color.
pub fn apply_model(entity: &mut Entity, symbolizer: &ModelSymbolizer) -> Result<bool, StyleError> {
    if !entity.geometry_kind().is_point() {
        return Ok(false);
    }
    let Some(uri) = symbolizer.model.clone() else {
        return Ok(false);
    };

    entity.model = Some(ModelGraphics {
        uri,
        scale: symbolizer.scale.unwrap_or(1.0),
        color: to_packed_color(
            symbolizer.color.as_deref().unwrap_or("#ffffff"),
            symbolizer.opacity.unwrap_or(1.0),
        )?,
        height_reference: HeightReference::from_style(symbolizer.ms_height_reference.as_deref()),
        heading: symbolizer.heading.unwrap_or(0.0),
        pitch: symbolizer.pitch.unwrap_or(0.0),
        roll: symbolizer.roll.unwrap_or(0.0),
    });
    Ok(true)
}
