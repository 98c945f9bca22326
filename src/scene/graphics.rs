use std::sync::Arc;

use crate::codec::{Color, DashEncoding};
use crate::scene::entity::Cartographic;
use crate::scene::raster::RasterImage;

/// How a clamped shape interacts with terrain and 3D tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassificationType {
    Terrain,
    Cesium3DTile,
    #[default]
    Both,
}

impl ClassificationType {
    /// Maps the `msClassificationType` style value; unknown values yield `None`.
    pub fn from_style(value: &str) -> Option<Self> {
        match value {
            "terrain" => Some(ClassificationType::Terrain),
            "3d" => Some(ClassificationType::Cesium3DTile),
            "both" => Some(ClassificationType::Both),
            _ => None,
        }
    }
}

/// Vertical positioning of point drawables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeightReference {
    #[default]
    None,
    ClampToGround,
    RelativeToGround,
}

impl HeightReference {
    /// Maps the `msHeightReference` style value; anything unknown is `None`.
    pub fn from_style(value: Option<&str>) -> Self {
        match value {
            Some("clamp") => HeightReference::ClampToGround,
            Some("relative") => HeightReference::RelativeToGround,
            _ => HeightReference::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelStyle {
    #[default]
    Fill,
    Outline,
    FillAndOutline,
}

/// Screen space offset in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelOffset {
    pub x: f64,
    pub y: f64,
}

impl PixelOffset {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for PixelOffset {
    fn from(v: [f64; 2]) -> Self {
        Self { x: v[0], y: v[1] }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PolylineMaterial {
    Solid { color: Color },
    Dash { color: Color, dash_length: f64, dash_pattern: u16 },
}

impl PolylineMaterial {
    pub fn new(color: Color, dash: Option<DashEncoding>) -> Self {
        match dash {
            Some(d) => PolylineMaterial::Dash {
                color,
                dash_length: d.length,
                dash_pattern: d.pattern,
            },
            None => PolylineMaterial::Solid { color },
        }
    }

    pub fn color(&self) -> Color {
        match self {
            PolylineMaterial::Solid { color } | PolylineMaterial::Dash { color, .. } => *color,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolylineGraphics {
    pub positions: Vec<Cartographic>,
    pub width: f64,
    pub material: PolylineMaterial,
    pub clamp_to_ground: bool,
    pub classification_type: ClassificationType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolygonGraphics {
    pub hierarchy: Vec<Vec<Cartographic>>,
    pub material: Color,
    pub classification_type: ClassificationType,
    /// Polygons draped on the terrain ignore vertex heights.
    pub per_position_height: bool,
}

#[derive(Debug, Clone)]
pub struct BillboardGraphics {
    pub image: Arc<RasterImage>,
    pub scale: f64,
    pub rotation: f64,
    pub color: Option<Color>,
    pub pixel_offset: PixelOffset,
    pub disable_depth_test_distance: f64,
    pub height_reference: HeightReference,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelGraphics {
    pub text: String,
    pub font: String,
    pub fill_color: Color,
    pub outline_color: Color,
    pub outline_width: f64,
    pub style: LabelStyle,
    pub pixel_offset: PixelOffset,
    pub disable_depth_test_distance: f64,
    pub height_reference: HeightReference,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelGraphics {
    pub uri: String,
    pub scale: f64,
    pub color: Color,
    pub height_reference: HeightReference,
    /// Degrees, passed through untouched.
    pub heading: f64,
    pub pitch: f64,
    pub roll: f64,
}
