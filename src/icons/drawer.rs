use futures::future::{self, BoxFuture};
use futures::FutureExt;

use crate::icons::{IconImage, IconRequest};

/// Host capability that rasterizes icons.
///
/// Called at most once per `write_style`, with every identifier missing from the
/// cache. Returning fewer images than requested, or an error, only degrades the
/// symbolizers whose images are missing.
pub trait IconDrawer: Send + Sync {
    fn draw_icons<'a>(&'a self, requests: &'a [IconRequest]) -> BoxFuture<'a, anyhow::Result<Vec<IconImage>>>;
}

/// Drawer for hosts without rasterization support. Draws nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullIconDrawer;

impl NullIconDrawer {
    pub fn new() -> Self {
        Self
    }
}

impl IconDrawer for NullIconDrawer {
    fn draw_icons<'a>(&'a self, _requests: &'a [IconRequest]) -> BoxFuture<'a, anyhow::Result<Vec<IconImage>>> {
        future::ready(Ok(Vec::new())).boxed()
    }
}
