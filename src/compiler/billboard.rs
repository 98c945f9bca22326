use crate::codec::{to_packed_color, to_rotation_radians, to_scale_factor};
use crate::errors::StyleError;
use crate::icons::IconImage;
use crate::scene::{BillboardGraphics, Entity, HeightReference, PixelOffset};
use crate::style::{IconSymbolizer, MarkSymbolizer};

/// Mark symbolizer: a rasterized shape whose diameter is `2 * radius`.
pub fn apply_mark(entity: &mut Entity, symbolizer: &MarkSymbolizer, icon: &IconImage) -> Result<bool, StyleError> {
    if !entity.geometry_kind().is_point() {
        return Ok(false);
    }

    entity.billboard = Some(BillboardGraphics {
        image: icon.image.clone(),
        scale: symbolizer
            .radius
            .map(|r| to_scale_factor(r * 2.0, icon.natural_size()))
            .unwrap_or(1.0),
        rotation: to_rotation_radians(symbolizer.rotate.unwrap_or(0.0)),
        color: None,
        pixel_offset: symbolizer.offset.map(PixelOffset::from).unwrap_or_default(),
        disable_depth_test_distance: f64::INFINITY,
        height_reference: HeightReference::from_style(symbolizer.ms_height_reference.as_deref()),
    });
    Ok(true)
}

/// Icon symbolizer: an external image tinted white at the symbolizer opacity.
pub fn apply_icon(entity: &mut Entity, symbolizer: &IconSymbolizer, icon: &IconImage) -> Result<bool, StyleError> {
    if !entity.geometry_kind().is_point() {
        return Ok(false);
    }

    let color = to_packed_color(
        symbolizer.color.as_deref().unwrap_or("#ffffff"),
        symbolizer.opacity.unwrap_or(1.0),
    )?;

    entity.billboard = Some(BillboardGraphics {
        image: icon.image.clone(),
        scale: symbolizer
            .size
            .map(|s| to_scale_factor(s, icon.natural_size()))
            .unwrap_or(1.0),
        rotation: to_rotation_radians(symbolizer.rotate.unwrap_or(0.0)),
        color: Some(color),
        pixel_offset: symbolizer.offset.map(PixelOffset::from).unwrap_or_default(),
        disable_depth_test_distance: f64::INFINITY,
        height_reference: HeightReference::from_style(symbolizer.ms_height_reference.as_deref()),
    });
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Color;
    use crate::scene::{Cartographic, Geometry, Properties, RasterImage};
    use std::f64::consts::PI;
    use std::sync::Arc;

    fn point() -> Entity {
        Entity::new(Geometry::Point(Cartographic::new(7.0, 41.0, 0.0)), Properties::new())
    }

    #[test]
    fn mark_billboard() {
        let icon = IconImage::new("mark", RasterImage::new(32, 32).unwrap());
        let s = MarkSymbolizer {
            well_known_name: Some("Circle".into()),
            radius: Some(16.0),
            rotate: Some(90.0),
            ..Default::default()
        };
        let mut e = point();
        assert!(apply_mark(&mut e, &s, &icon).unwrap());

        let b = e.billboard.unwrap();
        assert!(Arc::ptr_eq(&b.image, &icon.image));
        assert_eq!(b.scale, 1.0);
        assert_eq!(b.rotation, -PI / 2.0);
        assert_eq!(b.disable_depth_test_distance, f64::INFINITY);
        assert_eq!(b.height_reference, HeightReference::None);
    }

    #[test]
    fn icon_billboard() {
        let icon = IconImage::new("icon", RasterImage::new(256, 256).unwrap());
        let s = IconSymbolizer {
            image: Some("path/to/image".into()),
            opacity: Some(0.5),
            size: Some(32.0),
            rotate: Some(90.0),
            offset: Some([4.0, -2.0]),
            ms_height_reference: Some("clamp".into()),
            ..Default::default()
        };
        let mut e = point();
        apply_icon(&mut e, &s, &icon).unwrap();

        let b = e.billboard.unwrap();
        assert_eq!(b.color, Some(Color::new(1.0, 1.0, 1.0, 0.5)));
        assert_eq!(b.scale, 0.125);
        assert_eq!(b.rotation, -PI / 2.0);
        assert_eq!(b.pixel_offset, PixelOffset::new(4.0, -2.0));
        assert_eq!(b.height_reference, HeightReference::ClampToGround);
    }

    #[test]
    fn icon_explicit_color() {
        let icon = IconImage::new("icon", RasterImage::new(64, 16).unwrap());
        let s = IconSymbolizer {
            image: Some("a.png".into()),
            color: Some("#ff0000".into()),
            size: Some(32.0),
            ..Default::default()
        };
        let mut e = point();
        apply_icon(&mut e, &s, &icon).unwrap();

        let b = e.billboard.unwrap();
        assert_eq!(b.color, Some(Color::new(1.0, 0.0, 0.0, 1.0)));
        // measured against the larger side
        assert_eq!(b.scale, 0.5);
    }
}
