//! Scene model the styling engine writes into.
//!
//! The host owns the scene: it builds one [`Entity`] per feature, hands an
//! [`EntityCollection`] to a [`StyleFunction`](crate::StyleFunction) and draws
//! whatever graphics come back. The engine only ever fills in or replaces the
//! graphics of the entities it is given.
//!
//! - [`Geometry`] / [`GeometryKind`] describe what the feature is.
//! - [`BillboardGraphics`], [`LabelGraphics`], [`ModelGraphics`], [`PolygonGraphics`]
//!   and [`PolylineGraphics`] are the renderer-native drawables.
//! - [`RasterImage`] is the bitmap type used for billboard images.

mod collection;
mod entity;
mod graphics;
mod raster;

pub use collection::EntityCollection;
pub use entity::{Cartographic, Entity, EntityId, Geometry, GeometryKind, Properties};
pub use graphics::{
    BillboardGraphics, ClassificationType, HeightReference, LabelGraphics, LabelStyle, ModelGraphics,
    PixelOffset, PolygonGraphics, PolylineGraphics, PolylineMaterial,
};
pub use raster::RasterImage;
