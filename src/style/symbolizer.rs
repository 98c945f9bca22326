use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::codec::to_packed_color;

/// A single rendering instruction, keyed by `kind` in style documents.
///
/// Kinds this engine does not know deserialize into [`Symbolizer::Unknown`] and are
/// skipped when styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Symbolizer {
    Fill(FillSymbolizer),
    Line(LineSymbolizer),
    Mark(MarkSymbolizer),
    Icon(IconSymbolizer),
    Model(ModelSymbolizer),
    Text(TextSymbolizer),
    #[serde(other)]
    Unknown,
}

/// `msLeaderLine*` fields shared by point symbolizers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderLineOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ms_leader_line_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ms_leader_line_opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ms_leader_line_width: Option<f64>,
}

impl LeaderLineOptions {
    pub fn is_requested(&self) -> bool {
        self.ms_leader_line_color.is_some()
            || self.ms_leader_line_opacity.is_some()
            || self.ms_leader_line_width.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillSymbolizer {
    pub color: Option<String>,
    pub fill_opacity: Option<f64>,
    pub outline_color: Option<String>,
    pub outline_opacity: Option<f64>,
    pub outline_width: Option<f64>,
    pub outline_dasharray: Option<Vec<f64>>,
    pub ms_classification_type: Option<String>,
    pub ms_clamp_to_ground: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSymbolizer {
    pub color: Option<String>,
    pub opacity: Option<f64>,
    pub width: Option<f64>,
    pub dasharray: Option<Vec<f64>>,
    pub ms_classification_type: Option<String>,
    pub ms_clamp_to_ground: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkSymbolizer {
    pub well_known_name: Option<String>,
    pub color: Option<String>,
    pub fill_opacity: Option<f64>,
    pub stroke_color: Option<String>,
    pub stroke_opacity: Option<f64>,
    pub stroke_width: Option<f64>,
    pub radius: Option<f64>,
    pub rotate: Option<f64>,
    pub offset: Option<[f64; 2]>,
    pub ms_bring_to_front: Option<bool>,
    pub ms_height_reference: Option<String>,
    pub ms_height: Option<f64>,
    #[serde(flatten)]
    pub leader_line: LeaderLineOptions,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconSymbolizer {
    pub image: Option<String>,
    pub color: Option<String>,
    pub opacity: Option<f64>,
    pub size: Option<f64>,
    pub rotate: Option<f64>,
    pub offset: Option<[f64; 2]>,
    pub ms_bring_to_front: Option<bool>,
    pub ms_height_reference: Option<String>,
    pub ms_height: Option<f64>,
    #[serde(flatten)]
    pub leader_line: LeaderLineOptions,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSymbolizer {
    pub model: Option<String>,
    pub scale: Option<f64>,
    pub heading: Option<f64>,
    pub pitch: Option<f64>,
    pub roll: Option<f64>,
    pub color: Option<String>,
    pub opacity: Option<f64>,
    pub height: Option<f64>,
    pub ms_bring_to_front: Option<bool>,
    pub ms_height_reference: Option<String>,
    #[serde(flatten)]
    pub leader_line: LeaderLineOptions,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSymbolizer {
    /// Label template, `{{attribute}}` tokens are replaced by feature values.
    pub label: Option<String>,
    pub offset: Option<[f64; 2]>,
    pub color: Option<String>,
    pub opacity: Option<f64>,
    pub halo_color: Option<String>,
    pub halo_opacity: Option<f64>,
    pub halo_width: Option<f64>,
    pub font: Option<Vec<String>>,
    pub font_style: Option<String>,
    pub font_weight: Option<String>,
    pub size: Option<f64>,
    /// Accepted for compatibility; labels are always drawn upright.
    pub rotate: Option<f64>,
    pub ms_bring_to_front: Option<bool>,
    pub ms_height_reference: Option<String>,
    pub ms_height: Option<f64>,
    #[serde(flatten)]
    pub leader_line: LeaderLineOptions,
}

impl Symbolizer {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Symbolizer::Fill(_) => "Fill",
            Symbolizer::Line(_) => "Line",
            Symbolizer::Mark(_) => "Mark",
            Symbolizer::Icon(_) => "Icon",
            Symbolizer::Model(_) => "Model",
            Symbolizer::Text(_) => "Text",
            Symbolizer::Unknown => "Unknown",
        }
    }

    /// Mark and Icon symbolizers are drawn from a rasterized image.
    pub fn needs_icon(&self) -> bool {
        matches!(self, Symbolizer::Mark(_) | Symbolizer::Icon(_))
    }

    pub fn is_point_symbolizer(&self) -> bool {
        matches!(
            self,
            Symbolizer::Mark(_) | Symbolizer::Icon(_) | Symbolizer::Model(_) | Symbolizer::Text(_)
        )
    }

    pub fn leader_line(&self) -> Option<&LeaderLineOptions> {
        match self {
            Symbolizer::Mark(s) => Some(&s.leader_line),
            Symbolizer::Icon(s) => Some(&s.leader_line),
            Symbolizer::Model(s) => Some(&s.leader_line),
            Symbolizer::Text(s) => Some(&s.leader_line),
            _ => None,
        }
        .filter(|l| l.is_requested())
    }

    pub fn brings_to_front(&self) -> bool {
        let flag = match self {
            Symbolizer::Mark(s) => s.ms_bring_to_front,
            Symbolizer::Icon(s) => s.ms_bring_to_front,
            Symbolizer::Model(s) => s.ms_bring_to_front,
            Symbolizer::Text(s) => s.ms_bring_to_front,
            _ => None,
        };
        flag.unwrap_or(false)
    }

    /// Height the point symbol is displayed at, when the symbolizer sets one.
    pub fn display_height(&self) -> Option<f64> {
        match self {
            Symbolizer::Mark(s) => s.ms_height,
            Symbolizer::Icon(s) => s.ms_height,
            Symbolizer::Model(s) => s.height,
            Symbolizer::Text(s) => s.ms_height,
            _ => None,
        }
    }

    /// Checks the fields required by the symbolizer kind.
    pub fn validate(&self) -> Result<(), String> {
        let colors: Vec<Option<&String>> = match self {
            Symbolizer::Fill(s) => vec![s.color.as_ref(), s.outline_color.as_ref()],
            Symbolizer::Line(s) => vec![s.color.as_ref()],
            Symbolizer::Mark(s) => {
                require(self, "wellKnownName", s.well_known_name.as_deref())?;
                if let Some(r) = s.radius {
                    if !(r.is_finite() && r > 0.0) {
                        return Err(format!("Mark radius {r} must be a positive number"));
                    }
                }
                vec![s.color.as_ref(), s.stroke_color.as_ref(), s.leader_line.ms_leader_line_color.as_ref()]
            }
            Symbolizer::Icon(s) => {
                require(self, "image", s.image.as_deref())?;
                vec![s.color.as_ref(), s.leader_line.ms_leader_line_color.as_ref()]
            }
            Symbolizer::Model(s) => {
                require(self, "model", s.model.as_deref())?;
                vec![s.color.as_ref(), s.leader_line.ms_leader_line_color.as_ref()]
            }
            Symbolizer::Text(s) => {
                require(self, "label", s.label.as_deref())?;
                vec![s.color.as_ref(), s.halo_color.as_ref(), s.leader_line.ms_leader_line_color.as_ref()]
            }
            Symbolizer::Unknown => Vec::new(),
        };

        for color in colors.into_iter().flatten() {
            to_packed_color(color, 1.0).map_err(|e| format!("{} symbolizer: {e}", self.kind_name()))?;
        }
        Ok(())
    }
}

fn require(symbolizer: &Symbolizer, field: &str, value: Option<&str>) -> Result<(), String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(format!("{} symbolizer requires `{field}`", symbolizer.kind_name())),
    }
}

/// Default image identifier: derived from every field that changes the raster,
/// so visually identical symbolizers share one image.
pub fn image_id_for_symbolizer(symbolizer: &Symbolizer) -> Option<String> {
    match symbolizer {
        Symbolizer::Mark(s) => Some(format!(
            "mark:{}",
            json!({
                "wellKnownName": s.well_known_name,
                "color": s.color,
                "fillOpacity": s.fill_opacity,
                "strokeColor": s.stroke_color,
                "strokeOpacity": s.stroke_opacity,
                "strokeWidth": s.stroke_width,
                "radius": s.radius,
            })
        )),
        Symbolizer::Icon(s) => s.image.as_ref().map(|image| format!("icon:{image}")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mark() -> MarkSymbolizer {
        MarkSymbolizer {
            well_known_name: Some("Circle".into()),
            color: Some("#ff0000".into()),
            radius: Some(16.0),
            ..Default::default()
        }
    }

    #[test]
    fn image_id_ignores_placement_fields() {
        let a = Symbolizer::Mark(mark());
        let b = Symbolizer::Mark(MarkSymbolizer {
            rotate: Some(90.0),
            ms_bring_to_front: Some(true),
            ..mark()
        });
        let c = Symbolizer::Mark(MarkSymbolizer { radius: Some(8.0), ..mark() });

        assert_eq!(image_id_for_symbolizer(&a), image_id_for_symbolizer(&b));
        assert_ne!(image_id_for_symbolizer(&a), image_id_for_symbolizer(&c));
    }

    #[test]
    fn image_id_for_icon_uses_path() {
        let icon = Symbolizer::Icon(IconSymbolizer {
            image: Some("path/to/image".into()),
            ..Default::default()
        });
        assert_eq!(image_id_for_symbolizer(&icon).as_deref(), Some("icon:path/to/image"));
        assert_eq!(image_id_for_symbolizer(&Symbolizer::Unknown), None);
    }

    #[test]
    fn validate_required_fields() {
        assert!(Symbolizer::Mark(mark()).validate().is_ok());
        assert!(Symbolizer::Mark(MarkSymbolizer::default()).validate().is_err());
        assert!(Symbolizer::Model(ModelSymbolizer::default()).validate().is_err());
        assert!(Symbolizer::Text(TextSymbolizer { label: Some(" ".into()), ..Default::default() })
            .validate()
            .is_err());
        assert!(Symbolizer::Line(LineSymbolizer::default()).validate().is_ok());
    }

    #[test]
    fn validate_colors() {
        let bad = Symbolizer::Line(LineSymbolizer {
            color: Some("red".into()),
            ..Default::default()
        });
        assert!(bad.validate().unwrap_err().contains("Line"));

        let bad_radius = Symbolizer::Mark(MarkSymbolizer { radius: Some(0.0), ..mark() });
        assert!(bad_radius.validate().is_err());
    }

    #[test]
    fn leader_line_only_when_requested() {
        let plain = Symbolizer::Mark(mark());
        assert!(plain.leader_line().is_none());

        let with_leader = Symbolizer::Mark(MarkSymbolizer {
            leader_line: LeaderLineOptions {
                ms_leader_line_width: Some(2.0),
                ..Default::default()
            },
            ..mark()
        });
        assert!(with_leader.leader_line().is_some());
        assert!(Symbolizer::Fill(FillSymbolizer::default()).leader_line().is_none());
    }
}
