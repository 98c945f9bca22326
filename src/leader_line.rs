//! Leader lines for point symbols.
//!
//! A point symbolizer that carries any of `msLeaderLineColor`,
//! `msLeaderLineOpacity` or `msLeaderLineWidth` gets a connector from the
//! ground below the feature up to where the symbol is displayed. Labels with a
//! pixel offset additionally get a short rasterized segment from the anchor to
//! the label, drawn as a billboard half way along the offset. The segment is
//! skipped when the entity already shows a billboard, and its image is capped
//! at `leader_line_max_extent` pixels per side.
//!
//! Attaching is not idempotent: styling the same entity twice stacks a second
//! connector. The styling pass guards against duplicates within one pass only.

use std::sync::Arc;

use crate::codec::{to_packed_color, Color};
use crate::config::StyleParserConfig;
use crate::errors::StyleError;
use crate::scene::{BillboardGraphics, Entity, HeightReference, PixelOffset, PolylineGraphics, PolylineMaterial, RasterImage};
use crate::style::{LeaderLineOptions, Symbolizer};

const LEADER_PIXEL: [u8; 4] = [255, 255, 255, 255];

/// Attaches a leader line to `entity` for `symbolizer`.
///
/// Returns `Ok(false)` when the symbolizer requests no leader line or the
/// entity is not a point. Call after the entity has been raised to its
/// display height and before the symbol is placed.
pub fn attach_leader_line(
    entity: &mut Entity,
    symbolizer: &Symbolizer,
    config: &StyleParserConfig,
) -> Result<bool, StyleError> {
    let Some(options) = symbolizer.leader_line() else {
        return Ok(false);
    };
    if !entity.geometry_kind().is_point() {
        return Ok(false);
    }
    let Some(display) = entity.position else {
        return Ok(false);
    };

    let color = leader_color(options)?;
    let width = options.ms_leader_line_width.unwrap_or(1.0);

    entity.leader_lines.push(PolylineGraphics {
        positions: vec![display.with_height(0.0), display],
        width,
        material: PolylineMaterial::Solid { color },
        clamp_to_ground: false,
        classification_type: config.default_classification,
    });

    if let Symbolizer::Text(text) = symbolizer {
        if let Some(offset) = text.offset {
            if entity.billboard.is_some() {
                log::debug!("entity {} already has a billboard, skipping label connector", entity.id);
            } else {
                entity.billboard = label_connector(offset, width, color, config, text.ms_height_reference.as_deref());
            }
        }
    }

    log::trace!("leader line attached to entity {}", entity.id);
    Ok(true)
}

fn leader_color(options: &LeaderLineOptions) -> Result<Color, StyleError> {
    to_packed_color(
        options.ms_leader_line_color.as_deref().unwrap_or("#000000"),
        options.ms_leader_line_opacity.unwrap_or(1.0),
    )
}

/// Segment from the label anchor to the offset label, centred on the offset.
fn label_connector(
    offset: [f64; 2],
    width: f64,
    color: Color,
    config: &StyleParserConfig,
    height_reference: Option<&str>,
) -> Option<BillboardGraphics> {
    let (min, max) = (config.leader_line_min_extent, config.leader_line_max_extent);
    // Float to int casts saturate, NaN becomes 0.
    let w = (offset[0].abs().round() as u32).min(max).max(min);
    let h = (offset[1].abs().round() as u32).min(max).max(min);
    let pen = (width.round().max(1.0) as u32).min(w.min(h));

    // Screen y grows downwards, so the segment runs between opposite corners
    // when the offset signs differ.
    let (x0, x1) = if offset[0] < 0.0 { (w as i64 - 1, 0) } else { (0, w as i64 - 1) };
    let (y0, y1) = if offset[1] < 0.0 { (h as i64 - 1, 0) } else { (0, h as i64 - 1) };

    let mut image = match RasterImage::new(w, h) {
        Ok(image) => image,
        Err(e) => {
            log::warn!("label connector not drawn: {e}");
            return None;
        }
    };
    image.draw_line((x0, y0), (x1, y1), pen, LEADER_PIXEL);

    Some(BillboardGraphics {
        image: Arc::new(image),
        scale: 1.0,
        rotation: 0.0,
        color: Some(color),
        pixel_offset: PixelOffset::new(offset[0] / 2.0, offset[1] / 2.0),
        disable_depth_test_distance: f64::INFINITY,
        height_reference: HeightReference::from_style(height_reference),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Cartographic, Geometry, Properties};
    use crate::style::{MarkSymbolizer, TextSymbolizer};

    fn leader() -> LeaderLineOptions {
        LeaderLineOptions {
            ms_leader_line_color: Some("#ff0000".into()),
            ms_leader_line_opacity: Some(0.5),
            ms_leader_line_width: Some(2.0),
        }
    }

    fn point(height: f64) -> Entity {
        Entity::new(Geometry::Point(Cartographic::new(7.0, 41.0, height)), Properties::new())
    }

    #[test]
    fn connector_from_ground_to_display_position() {
        let mark = Symbolizer::Mark(MarkSymbolizer {
            well_known_name: Some("Circle".into()),
            leader_line: leader(),
            ..Default::default()
        });
        let mut e = point(500.0);
        assert!(attach_leader_line(&mut e, &mark, &StyleParserConfig::default()).unwrap());

        assert_eq!(e.leader_lines.len(), 1);
        let line = &e.leader_lines[0];
        assert_eq!(line.width, 2.0);
        assert_eq!(line.material.color(), Color::new(1.0, 0.0, 0.0, 0.5));
        assert_eq!(line.positions[0], Cartographic::new(7.0, 41.0, 0.0));
        assert_eq!(line.positions[1], Cartographic::new(7.0, 41.0, 500.0));
        assert!(e.billboard.is_none());
    }

    #[test]
    fn label_connector_billboard() {
        let text = Symbolizer::Text(TextSymbolizer {
            label: Some("x".into()),
            offset: Some([16.0, 16.0]),
            leader_line: leader(),
            ..Default::default()
        });
        let mut e = point(500.0);
        attach_leader_line(&mut e, &text, &StyleParserConfig::default()).unwrap();

        let b = e.billboard.unwrap();
        assert_eq!(b.color, Some(Color::new(1.0, 0.0, 0.0, 0.5)));
        assert_eq!(b.pixel_offset, PixelOffset::new(8.0, 8.0));
        assert_eq!((b.image.width, b.image.height), (16, 16));
        assert_eq!(b.image.pixel(0, 0), Some(LEADER_PIXEL));
        assert_eq!(b.image.pixel(15, 15), Some(LEADER_PIXEL));
    }

    #[test]
    fn label_connector_respects_min_extent() {
        let config = StyleParserConfig::builder().leader_line_min_extent(4).build().unwrap();
        let text = Symbolizer::Text(TextSymbolizer {
            label: Some("x".into()),
            offset: Some([0.0, -10.0]),
            leader_line: leader(),
            ..Default::default()
        });
        let mut e = point(0.0);
        attach_leader_line(&mut e, &text, &config).unwrap();

        let b = e.billboard.unwrap();
        assert_eq!((b.image.width, b.image.height), (4, 10));
        assert_eq!(b.pixel_offset, PixelOffset::new(0.0, -5.0));
    }

    #[test]
    fn label_connector_is_capped_for_huge_offsets() {
        let config = StyleParserConfig::builder().leader_line_max_extent(64).build().unwrap();
        let text = Symbolizer::Text(TextSymbolizer {
            label: Some("x".into()),
            offset: Some([1.5e9, 1.0]),
            leader_line: LeaderLineOptions {
                ms_leader_line_width: Some(1.0e5),
                ..leader()
            },
            ..Default::default()
        });
        let mut e = point(0.0);
        assert!(attach_leader_line(&mut e, &text, &config).unwrap());

        assert_eq!(e.leader_lines.len(), 1);
        let b = e.billboard.unwrap();
        assert_eq!((b.image.width, b.image.height), (64, 1));
        assert_eq!(b.image.pixel(63, 0), Some(LEADER_PIXEL));
        assert_eq!(b.pixel_offset, PixelOffset::new(7.5e8, 0.5));
    }

    #[test]
    fn label_connector_uses_default_cap() {
        let text = Symbolizer::Text(TextSymbolizer {
            label: Some("x".into()),
            offset: Some([1.5e9, 1.0]),
            leader_line: leader(),
            ..Default::default()
        });
        let config = StyleParserConfig::default();
        let mut e = point(0.0);
        attach_leader_line(&mut e, &text, &config).unwrap();

        let b = e.billboard.unwrap();
        assert_eq!((b.image.width, b.image.height), (config.leader_line_max_extent, 1));
    }

    #[test]
    fn label_connector_keeps_existing_billboard() {
        let icon = Arc::new(RasterImage::new(8, 8).unwrap());
        let mut e = point(0.0);
        e.billboard = Some(BillboardGraphics {
            image: icon.clone(),
            scale: 1.0,
            rotation: 0.0,
            color: None,
            pixel_offset: PixelOffset::default(),
            disable_depth_test_distance: f64::INFINITY,
            height_reference: HeightReference::None,
        });
        let text = Symbolizer::Text(TextSymbolizer {
            label: Some("x".into()),
            offset: Some([16.0, 16.0]),
            leader_line: leader(),
            ..Default::default()
        });
        assert!(attach_leader_line(&mut e, &text, &StyleParserConfig::default()).unwrap());

        assert_eq!(e.leader_lines.len(), 1);
        let b = e.billboard.unwrap();
        assert!(Arc::ptr_eq(&b.image, &icon));
        assert_eq!(b.color, None);
    }

    #[test]
    fn requires_requested_options_and_a_point() {
        let config = StyleParserConfig::default();
        let plain = Symbolizer::Mark(MarkSymbolizer {
            well_known_name: Some("Circle".into()),
            ..Default::default()
        });
        let mut e = point(0.0);
        assert!(!attach_leader_line(&mut e, &plain, &config).unwrap());
        assert!(e.leader_lines.is_empty());

        let with_leader = Symbolizer::Mark(MarkSymbolizer {
            well_known_name: Some("Circle".into()),
            leader_line: leader(),
            ..Default::default()
        });
        let mut line = Entity::new(
            Geometry::LineString(vec![Cartographic::new(0.0, 0.0, 0.0), Cartographic::new(1.0, 1.0, 0.0)]),
            Properties::new(),
        );
        assert!(!attach_leader_line(&mut line, &with_leader, &config).unwrap());
        assert!(line.leader_lines.is_empty());
    }

    #[test]
    fn attaching_twice_stacks_connectors() {
        let mark = Symbolizer::Mark(MarkSymbolizer {
            well_known_name: Some("Circle".into()),
            leader_line: leader(),
            ..Default::default()
        });
        let mut e = point(10.0);
        let config = StyleParserConfig::default();
        attach_leader_line(&mut e, &mark, &config).unwrap();
        attach_leader_line(&mut e, &mark, &config).unwrap();
        assert_eq!(e.leader_lines.len(), 2);
    }
}
