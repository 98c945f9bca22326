//! Compiles GeoStyler style documents into 3D scene graphics.
//!
//! A [`StyleParser`] validates a [`Style`](style::Style), resolves the icons
//! its Mark and Icon symbolizers need through the host's
//! [`IconDrawer`](icons::IconDrawer) and returns a [`StyleFunction`]. Applying
//! the function to an [`EntityCollection`](scene::EntityCollection) assigns
//! polygons, polylines, billboards, labels and models to the matching entities.

pub mod codec;
pub mod compiler;
pub mod config;
pub mod errors;
pub mod icons;
pub mod leader_line;
pub mod scene;
pub mod style;
mod parser;

pub use config::StyleParserConfig;
pub use errors::StyleError;
pub use parser::{StyleFunction, StyleParser, StyleParserBuilder};
