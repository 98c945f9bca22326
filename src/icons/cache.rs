use std::collections::HashMap;
use std::sync::RwLock;

use crate::icons::IconImage;

/// Identifier keyed store of rasterized icons. Never evicts on its own.
#[derive(Debug, Default)]
pub struct IconCache {
    icons: RwLock<HashMap<String, IconImage>>,
}

impl IconCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<IconImage> {
        self.icons.read().unwrap().get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.icons.read().unwrap().contains_key(id)
    }

    /// Stores an icon under its id. The first image stored for an id wins.
    pub fn insert(&self, icon: IconImage) {
        self.icons.write().unwrap().entry(icon.id.clone()).or_insert(icon);
    }

    pub fn remove(&self, id: &str) -> Option<IconImage> {
        self.icons.write().unwrap().remove(id)
    }

    pub fn clear(&self) {
        self.icons.write().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.icons.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
