use serde_json::Value;

use crate::codec::to_packed_color;
use crate::config::StyleParserConfig;
use crate::errors::StyleError;
use crate::scene::{Entity, HeightReference, LabelGraphics, LabelStyle, PixelOffset, Properties};
use crate::style::TextSymbolizer;

/// Text symbolizer: a label built from the template and the feature attributes.
pub fn apply_text(entity: &mut Entity, symbolizer: &TextSymbolizer, config: &StyleParserConfig) -> Result<bool, StyleError> {
    if !entity.geometry_kind().is_point() {
        return Ok(false);
    }
    let Some(template) = symbolizer.label.as_deref() else {
        return Ok(false);
    };

    let outline_width = symbolizer.halo_width.unwrap_or(0.0);
    entity.label = Some(LabelGraphics {
        text: render_label_template(template, &entity.properties),
        font: font_string(symbolizer, config),
        fill_color: to_packed_color(
            symbolizer.color.as_deref().unwrap_or("#000000"),
            symbolizer.opacity.unwrap_or(1.0),
        )?,
        outline_color: to_packed_color(
            symbolizer.halo_color.as_deref().unwrap_or("#ffffff"),
            symbolizer.halo_opacity.unwrap_or(1.0),
        )?,
        outline_width,
        style: if outline_width > 0.0 { LabelStyle::FillAndOutline } else { LabelStyle::Fill },
        pixel_offset: symbolizer.offset.map(PixelOffset::from).unwrap_or_default(),
        disable_depth_test_distance: f64::INFINITY,
        height_reference: HeightReference::from_style(symbolizer.ms_height_reference.as_deref()),
    });
    Ok(true)
}

/// `<style> <weight> <size>px <family>`, the first listed family wins.
fn font_string(symbolizer: &TextSymbolizer, config: &StyleParserConfig) -> String {
    let family = symbolizer
        .font
        .as_ref()
        .and_then(|fonts| fonts.first())
        .map(String::as_str)
        .unwrap_or(&config.default_font_family);
    format!(
        "{} {} {}px {}",
        symbolizer.font_style.as_deref().unwrap_or("normal"),
        symbolizer.font_weight.as_deref().unwrap_or("normal"),
        symbolizer.size.unwrap_or(config.default_font_size),
        family
    )
}

/// Replaces `{{attribute}}` tokens with feature values; everything else is kept verbatim.
///
/// Missing or null attributes render as an empty string, strings as-is and any
/// other value as its JSON text. An unterminated `{{` is kept literally.
pub fn render_label_template(template: &str, properties: &Properties) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        let Some(len) = rest[start + 2..].find("}}") else {
            break;
        };
        out.push_str(&rest[..start]);
        let name = rest[start + 2..start + 2 + len].trim();
        match properties.get(name) {
            Some(Value::String(s)) => out.push_str(s),
            Some(Value::Null) | None => {}
            Some(other) => out.push_str(&other.to_string()),
        }
        rest = &rest[start + 2 + len + 2..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Color;
    use crate::scene::{Cartographic, Geometry};
    use serde_json::json;

    fn props(v: Value) -> Properties {
        v.as_object().cloned().unwrap()
    }

    fn sample_text() -> TextSymbolizer {
        TextSymbolizer {
            label: Some("{{text}} World!".into()),
            offset: Some([16.0, 16.0]),
            color: Some("#000000".into()),
            halo_color: Some("#ffffff".into()),
            halo_width: Some(2.0),
            font_style: Some("italic".into()),
            font_weight: Some("bold".into()),
            font: Some(vec!["Arial".into()]),
            size: Some(32.0),
            rotate: Some(90.0),
            ..Default::default()
        }
    }

    #[test]
    fn label_graphics() {
        let mut e = Entity::new(
            Geometry::Point(Cartographic::new(7.0, 41.0, 0.0)),
            props(json!({ "text": "Hello" })),
        );
        assert!(apply_text(&mut e, &sample_text(), &StyleParserConfig::default()).unwrap());

        let l = e.label.unwrap();
        assert_eq!(l.text, "Hello World!");
        assert_eq!(l.font, "italic bold 32px Arial");
        assert_eq!(l.pixel_offset, PixelOffset::new(16.0, 16.0));
        assert_eq!(l.fill_color, Color::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(l.outline_color, Color::new(1.0, 1.0, 1.0, 1.0));
        assert_eq!(l.outline_width, 2.0);
        assert_eq!(l.style, LabelStyle::FillAndOutline);
        assert_eq!(l.height_reference, HeightReference::None);
    }

    #[test]
    fn font_defaults_from_config() {
        let config = StyleParserConfig::builder()
            .default_font_family("Noto Sans")
            .default_font_size(12.5)
            .build()
            .unwrap();
        let s = TextSymbolizer {
            label: Some("x".into()),
            ..Default::default()
        };
        assert_eq!(font_string(&s, &config), "normal normal 12.5px Noto Sans");
    }

    #[test]
    fn template_substitution() {
        let p = props(json!({ "text": "Hello", "n": 3, "empty": null }));
        assert_eq!(render_label_template("{{text}} World!", &p), "Hello World!");
        assert_eq!(render_label_template("{{ n }} items", &p), "3 items");
        assert_eq!(render_label_template("[{{missing}}{{empty}}]", &p), "[]");
        assert_eq!(render_label_template("plain", &p), "plain");
        assert_eq!(render_label_template("a {{text", &p), "a {{text");
    }
}
