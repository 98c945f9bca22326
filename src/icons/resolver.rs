use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::errors::StyleError;
use crate::icons::{IconCache, IconDrawer, IconImage, IconRequest, ImageIdFn};
use crate::style::Symbolizer;

/// Outcome of one batched resolution, keyed by image identifier.
#[derive(Debug, Clone, Default)]
pub struct ResolvedIcons {
    icons: HashMap<String, IconImage>,
    failures: HashMap<String, String>,
}

impl ResolvedIcons {
    pub fn lookup(&self, id: &str) -> Result<&IconImage, StyleError> {
        self.icons.get(id).ok_or_else(|| StyleError::IconResolution {
            id: id.to_string(),
            reason: self
                .failures
                .get(id)
                .cloned()
                .unwrap_or_else(|| "icon was not part of the resolution batch".to_string()),
        })
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    pub fn failed_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.failures.keys().map(String::as_str)
    }
}

/// Resolves symbolizer bitmaps through a shared [`IconCache`] and a host [`IconDrawer`].
#[derive(Clone)]
pub struct IconResolver {
    cache: Arc<IconCache>,
    drawer: Arc<dyn IconDrawer>,
    image_id: ImageIdFn,
}

impl std::fmt::Debug for IconResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IconResolver")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl IconResolver {
    pub fn new(cache: Arc<IconCache>, drawer: Arc<dyn IconDrawer>, image_id: ImageIdFn) -> Self {
        Self { cache, drawer, image_id }
    }

    pub fn cache(&self) -> &Arc<IconCache> {
        &self.cache
    }

    pub fn image_id_fn(&self) -> ImageIdFn {
        self.image_id.clone()
    }

    pub fn image_id(&self, symbolizer: &Symbolizer) -> Option<String> {
        (self.image_id)(symbolizer)
    }

    /// Resolves every icon the given symbolizers need.
    ///
    /// Cached identifiers are served directly; all the others go to the drawer in
    /// a single call. Identical identifiers are requested once.
    pub async fn resolve_all(&self, symbolizers: &[&Symbolizer]) -> ResolvedIcons {
        let mut resolved = ResolvedIcons::default();
        let mut seen = HashSet::new();
        let mut requests = Vec::new();

        for symbolizer in symbolizers.iter().filter(|s| s.needs_icon()) {
            let Some(id) = self.image_id(symbolizer) else {
                continue;
            };
            if !seen.insert(id.clone()) {
                continue;
            }
            match self.cache.get(&id) {
                Some(icon) => {
                    resolved.icons.insert(id, icon);
                }
                None => requests.push(IconRequest {
                    id,
                    symbolizer: (*symbolizer).clone(),
                }),
            }
        }

        if requests.is_empty() {
            return resolved;
        }

        log::debug!("drawing {} icon(s), {} served from cache", requests.len(), resolved.icons.len());
        match self.drawer.draw_icons(&requests).await {
            Ok(images) => {
                for image in images {
                    self.cache.insert(image);
                }
            }
            Err(e) => {
                log::warn!("icon drawer failed for {} icon(s): {e:#}", requests.len());
                for request in &requests {
                    resolved.failures.insert(request.id.clone(), format!("icon drawer failed: {e}"));
                }
            }
        }

        for request in requests {
            match self.cache.get(&request.id) {
                Some(icon) => {
                    resolved.failures.remove(&request.id);
                    resolved.icons.insert(request.id, icon);
                }
                None => {
                    resolved
                        .failures
                        .entry(request.id)
                        .or_insert_with(|| "icon drawer returned no image".to_string());
                }
            }
        }

        resolved
    }

    /// Resolves the bitmap of a single symbolizer.
    pub async fn resolve_icon(&self, symbolizer: &Symbolizer) -> Result<IconImage, StyleError> {
        let id = self.image_id(symbolizer).ok_or_else(|| StyleError::IconResolution {
            id: String::new(),
            reason: format!("{} symbolizer has no image identifier", symbolizer.kind_name()),
        })?;
        let resolved = self.resolve_all(&[symbolizer]).await;
        resolved.lookup(&id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icons::NullIconDrawer;
    use crate::scene::RasterImage;
    use crate::style::{image_id_for_symbolizer, IconSymbolizer, MarkSymbolizer};
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use std::sync::Mutex;

    /// Draws a square image for every request and records the batches.
    #[derive(Default)]
    struct RecordingDrawer {
        batches: Mutex<Vec<Vec<String>>>,
    }

    impl IconDrawer for RecordingDrawer {
        fn draw_icons<'a>(&'a self, requests: &'a [IconRequest]) -> BoxFuture<'a, anyhow::Result<Vec<IconImage>>> {
            self.batches
                .lock()
                .unwrap()
                .push(requests.iter().map(|r| r.id.clone()).collect());
            let images: Vec<IconImage> = requests
                .iter()
                .map(|r| IconImage::new(r.id.clone(), RasterImage::new(32, 32).unwrap()))
                .collect();
            async move { Ok(images) }.boxed()
        }
    }

    struct FailingDrawer;

    impl IconDrawer for FailingDrawer {
        fn draw_icons<'a>(&'a self, _requests: &'a [IconRequest]) -> BoxFuture<'a, anyhow::Result<Vec<IconImage>>> {
            async { Err(anyhow::anyhow!("canvas unavailable")) }.boxed()
        }
    }

    fn resolver(drawer: Arc<dyn IconDrawer>) -> IconResolver {
        IconResolver::new(Arc::new(IconCache::new()), drawer, Arc::new(image_id_for_symbolizer))
    }

    fn mark(radius: f64) -> Symbolizer {
        Symbolizer::Mark(MarkSymbolizer {
            well_known_name: Some("Circle".into()),
            radius: Some(radius),
            ..Default::default()
        })
    }

    fn icon(path: &str) -> Symbolizer {
        Symbolizer::Icon(IconSymbolizer {
            image: Some(path.into()),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn misses_are_drawn_in_one_batch() {
        let drawer = Arc::new(RecordingDrawer::default());
        let r = resolver(drawer.clone());

        let (a, b, c) = (mark(8.0), mark(8.0), icon("img.png"));
        let resolved = r.resolve_all(&[&a, &b, &c]).await;

        assert_eq!(resolved.len(), 2);
        let batches = drawer.batches.lock().unwrap().clone();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 2);
    }

    #[tokio::test]
    async fn cached_icons_skip_the_drawer() {
        let drawer = Arc::new(RecordingDrawer::default());
        let r = resolver(drawer.clone());
        let a = icon("img.png");

        r.resolve_all(&[&a]).await;
        let again = r.resolve_all(&[&a]).await;

        assert!(again.lookup("icon:img.png").is_ok());
        assert_eq!(drawer.batches.lock().unwrap().len(), 1);
        assert_eq!(r.cache().len(), 1);
    }

    #[tokio::test]
    async fn missing_images_become_resolution_errors() {
        let r = resolver(Arc::new(NullIconDrawer::new()));
        let a = icon("img.png");

        let resolved = r.resolve_all(&[&a]).await;
        match resolved.lookup("icon:img.png") {
            Err(StyleError::IconResolution { id, reason }) => {
                assert_eq!(id, "icon:img.png");
                assert!(reason.contains("no image"));
            }
            other => panic!("expected resolution error, got {other:?}"),
        }
        assert_eq!(resolved.failed_ids().count(), 1);
    }

    #[tokio::test]
    async fn drawer_errors_are_localized() {
        let r = resolver(Arc::new(FailingDrawer));
        let a = icon("img.png");

        let err = r.resolve_icon(&a).await.unwrap_err();
        assert!(err.to_string().contains("canvas unavailable"));
        assert!(r.cache().is_empty());
    }

    #[tokio::test]
    async fn non_icon_symbolizers_are_ignored() {
        let drawer = Arc::new(RecordingDrawer::default());
        let r = resolver(drawer.clone());

        let resolved = r.resolve_all(&[&Symbolizer::Unknown]).await;
        assert!(resolved.is_empty());
        assert!(drawer.batches.lock().unwrap().is_empty());
    }
}
