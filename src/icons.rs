//! Icon resolution for Mark and Icon symbolizers.
//!
//! Billboards need a bitmap, and producing one (drawing a mark shape, loading an
//! image) is the host's job. The engine only:
//!
//! - derives a stable identifier for each symbolizer that needs a bitmap,
//! - looks it up in an [`IconCache`],
//! - asks the injected [`IconDrawer`] for all misses in **one** batched call,
//! - and hands the results out through [`ResolvedIcons`].
//!
//! The cache is an explicit object: several parsers (and concurrent
//! `write_style` calls) may share one through an `Arc`, and the host decides
//! when to clear it. Inserts are idempotent, so two passes racing to draw the
//! same identifier at worst rasterize it twice.

mod cache;
mod drawer;
mod resolver;

use std::sync::Arc;

use crate::scene::RasterImage;
use crate::style::Symbolizer;

pub use cache::IconCache;
pub use drawer::{IconDrawer, NullIconDrawer};
pub use resolver::{IconResolver, ResolvedIcons};

/// Computes the identifier of the bitmap a symbolizer needs, `None` if it needs none.
pub type ImageIdFn = Arc<dyn Fn(&Symbolizer) -> Option<String> + Send + Sync>;

/// A rasterized icon and its natural size in pixels.
#[derive(Debug, Clone)]
pub struct IconImage {
    pub id: String,
    pub image: Arc<RasterImage>,
    pub width: u32,
    pub height: u32,
}

impl IconImage {
    pub fn new(id: impl Into<String>, image: RasterImage) -> Self {
        let (width, height) = (image.width, image.height);
        Self {
            id: id.into(),
            image: Arc::new(image),
            width,
            height,
        }
    }

    /// Largest side, the size a symbolizer size is measured against.
    pub fn natural_size(&self) -> f64 {
        self.width.max(self.height) as f64
    }
}

/// A bitmap the drawer is asked to produce.
#[derive(Debug, Clone)]
pub struct IconRequest {
    pub id: String,
    pub symbolizer: Symbolizer,
}
