use std::fmt::Display;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scene::graphics::{
    BillboardGraphics, LabelGraphics, ModelGraphics, PolygonGraphics, PolylineGraphics,
};

/// Attribute bag of a feature, used for filters and label templates.
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// A unique identifier for an entity, represented as a UUID.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for EntityId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position in degrees with a height in meters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cartographic {
    pub longitude: f64,
    pub latitude: f64,
    pub height: f64,
}

impl Cartographic {
    pub fn new(longitude: f64, latitude: f64, height: f64) -> Self {
        Self { longitude, latitude, height }
    }

    /// Same location, at the given height.
    pub fn with_height(self, height: f64) -> Self {
        Self { height, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
}

impl GeometryKind {
    pub fn is_point(&self) -> bool {
        matches!(self, GeometryKind::Point | GeometryKind::MultiPoint)
    }

    pub fn is_line(&self) -> bool {
        matches!(self, GeometryKind::LineString | GeometryKind::MultiLineString)
    }

    pub fn is_polygon(&self) -> bool {
        matches!(self, GeometryKind::Polygon | GeometryKind::MultiPolygon)
    }
}

/// Feature geometry. Polygons are lists of rings, the first one being the exterior.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Cartographic),
    MultiPoint(Vec<Cartographic>),
    LineString(Vec<Cartographic>),
    MultiLineString(Vec<Vec<Cartographic>>),
    Polygon(Vec<Vec<Cartographic>>),
    MultiPolygon(Vec<Vec<Vec<Cartographic>>>),
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::MultiPoint(_) => GeometryKind::MultiPoint,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::MultiLineString(_) => GeometryKind::MultiLineString,
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
        }
    }

    /// Where a point symbol is anchored. Only point geometries have one.
    pub fn anchor(&self) -> Option<Cartographic> {
        match self {
            Geometry::Point(p) => Some(*p),
            Geometry::MultiPoint(points) => points.first().copied(),
            _ => None,
        }
    }

    /// Positions a polyline follows on this geometry: the line itself, or the
    /// exterior ring of a polygon. Multi geometries contribute their first part;
    /// hosts that need every part split them into one entity per part.
    pub fn line_positions(&self) -> Vec<Cartographic> {
        match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => Vec::new(),
            Geometry::LineString(line) => line.clone(),
            Geometry::MultiLineString(lines) => lines.first().cloned().unwrap_or_default(),
            Geometry::Polygon(rings) => rings.first().cloned().unwrap_or_default(),
            Geometry::MultiPolygon(polys) => polys
                .first()
                .and_then(|rings| rings.first())
                .cloned()
                .unwrap_or_default(),
        }
    }

    /// Rings of the (first) polygon, exterior first.
    pub fn polygon_rings(&self) -> Vec<Vec<Cartographic>> {
        match self {
            Geometry::Polygon(rings) => rings.clone(),
            Geometry::MultiPolygon(polys) => polys.first().cloned().unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}

/// A drawable bound to a single feature.
///
/// Graphics are `None` until a symbolizer assigns them. `position` is where point
/// symbols are displayed; it starts at the geometry anchor and may be raised by a
/// symbolizer height.
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub properties: Properties,
    pub geometry: Geometry,
    pub position: Option<Cartographic>,

    pub polygon: Option<PolygonGraphics>,
    pub polyline: Option<PolylineGraphics>,
    pub billboard: Option<BillboardGraphics>,
    pub label: Option<LabelGraphics>,
    pub model: Option<ModelGraphics>,
    /// Connectors from the ground to the displayed point symbol.
    pub leader_lines: Vec<PolylineGraphics>,
}

impl Entity {
    pub fn new(geometry: Geometry, properties: Properties) -> Self {
        Self {
            id: EntityId::new(),
            properties,
            position: geometry.anchor(),
            geometry,
            polygon: None,
            polyline: None,
            billboard: None,
            label: None,
            model: None,
            leader_lines: Vec::new(),
        }
    }

    #[inline]
    pub fn geometry_kind(&self) -> GeometryKind {
        self.geometry.kind()
    }

    /// True when no symbolizer has touched this entity.
    pub fn is_unstyled(&self) -> bool {
        self.polygon.is_none()
            && self.polyline.is_none()
            && self.billboard.is_none()
            && self.label.is_none()
            && self.model.is_none()
            && self.leader_lines.is_empty()
    }
}
