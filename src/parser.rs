use std::sync::Arc;

use crate::compiler::{apply_symbolizer, PassState};
use crate::config::StyleParserConfig;
use crate::errors::StyleError;
use crate::icons::{IconCache, IconDrawer, IconImage, IconResolver, ImageIdFn, NullIconDrawer, ResolvedIcons};
use crate::scene::{Entity, EntityCollection};
use crate::style::{image_id_for_symbolizer, ExpressionFilter, FilterEvaluator, Rule, Style, Symbolizer};

/// Compiles [`Style`] documents into [`StyleFunction`]s.
///
/// The parser owns the host capabilities a style needs: the icon drawer, the
/// icon cache and the filter evaluator. Compiling validates the whole document
/// and resolves every icon up front, so applying the result never waits on the
/// host again.
#[derive(Clone)]
pub struct StyleParser {
    config: Arc<StyleParserConfig>,
    resolver: IconResolver,
    filter_evaluator: Arc<dyn FilterEvaluator>,
}

impl std::fmt::Debug for StyleParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleParser")
            .field("config", &self.config)
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

impl Default for StyleParser {
    fn default() -> Self {
        StyleParser::builder().build()
    }
}

impl StyleParser {
    pub fn builder() -> StyleParserBuilder {
        StyleParserBuilder::default()
    }

    pub fn config(&self) -> &StyleParserConfig {
        &self.config
    }

    /// Cache shared with every function this parser compiles.
    pub fn icon_cache(&self) -> &Arc<IconCache> {
        self.resolver.cache()
    }

    /// Validates `style`, resolves its icons and returns the function that applies it.
    ///
    /// A malformed rule fails the whole call before any entity is touched. Icons
    /// that cannot be drawn do not fail it; the symbolizers using them are
    /// skipped when the function runs.
    pub async fn write_style(&self, style: &Style) -> Result<StyleFunction, StyleError> {
        style.validate()?;

        let icon_symbolizers: Vec<&Symbolizer> = style
            .rules
            .iter()
            .flat_map(|rule| rule.symbolizers.iter())
            .filter(|s| s.needs_icon())
            .collect();
        let icons = self.resolver.resolve_all(&icon_symbolizers).await;

        log::debug!(
            "compiled style {:?}: {} rule(s), {} icon(s) resolved",
            style.name,
            style.rules.len(),
            icons.len()
        );
        for id in icons.failed_ids() {
            log::warn!("icon {id} is unavailable, symbolizers using it will be skipped");
        }

        Ok(StyleFunction {
            style: Arc::new(style.clone()),
            icons: Arc::new(icons),
            image_id: self.resolver.image_id_fn(),
            filter_evaluator: self.filter_evaluator.clone(),
            config: self.config.clone(),
        })
    }

    /// [`write_style`](Self::write_style) for hosts without an async runtime.
    pub fn write_style_blocking(&self, style: &Style) -> Result<StyleFunction, StyleError> {
        futures::executor::block_on(self.write_style(style))
    }

    /// Reading styles back from a scene is not supported; always resolves to `None`.
    pub async fn read_style(&self, _source: &str) -> Option<Style> {
        None
    }
}

/// Builder for [`StyleParser`]. Every capability has a default.
#[derive(Default)]
pub struct StyleParserBuilder {
    config: Option<StyleParserConfig>,
    icon_drawer: Option<Arc<dyn IconDrawer>>,
    icon_cache: Option<Arc<IconCache>>,
    image_id: Option<ImageIdFn>,
    filter_evaluator: Option<Arc<dyn FilterEvaluator>>,
}

impl StyleParserBuilder {
    pub fn config(mut self, config: StyleParserConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn icon_drawer(mut self, drawer: Arc<dyn IconDrawer>) -> Self {
        self.icon_drawer = Some(drawer);
        self
    }

    /// Shares an existing cache, e.g. between several parsers.
    pub fn icon_cache(mut self, cache: Arc<IconCache>) -> Self {
        self.icon_cache = Some(cache);
        self
    }

    pub fn image_id(mut self, image_id: ImageIdFn) -> Self {
        self.image_id = Some(image_id);
        self
    }

    pub fn filter_evaluator(mut self, evaluator: Arc<dyn FilterEvaluator>) -> Self {
        self.filter_evaluator = Some(evaluator);
        self
    }

    pub fn build(self) -> StyleParser {
        let resolver = IconResolver::new(
            self.icon_cache.unwrap_or_default(),
            self.icon_drawer.unwrap_or_else(|| Arc::new(NullIconDrawer)),
            self.image_id.unwrap_or_else(|| Arc::new(image_id_for_symbolizer)),
        );
        StyleParser {
            config: Arc::new(self.config.unwrap_or_default()),
            resolver,
            filter_evaluator: self.filter_evaluator.unwrap_or_else(|| Arc::new(ExpressionFilter)),
        }
    }
}

/// A compiled style, ready to be applied to entity collections.
///
/// Cheap to clone and safe to apply concurrently to different collections.
#[derive(Clone)]
pub struct StyleFunction {
    style: Arc<Style>,
    icons: Arc<ResolvedIcons>,
    image_id: ImageIdFn,
    filter_evaluator: Arc<dyn FilterEvaluator>,
    config: Arc<StyleParserConfig>,
}

impl std::fmt::Debug for StyleFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleFunction")
            .field("style", &self.style.name)
            .field("rules", &self.style.rules.len())
            .field("icons", &self.icons.len())
            .finish_non_exhaustive()
    }
}

impl StyleFunction {
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Styles every entity of `entities` and hands the collection back.
    ///
    /// Rules are evaluated in document order and symbolizers in rule order, so
    /// a later symbolizer overwrites graphics set by an earlier one. Entities are
    /// kept in the order they were given; brought-to-front entities are listed
    /// last in [`EntityCollection::draw_order`].
    ///
    /// Leader lines are appended, so applying twice to the same entities adds
    /// a second connector per entity.
    pub async fn apply(&self, mut entities: EntityCollection) -> EntityCollection {
        self.apply_in_place(&mut entities);
        entities
    }

    /// Synchronous form of [`apply`](Self::apply); icons are already resolved so
    /// styling never waits.
    pub fn apply_in_place(&self, entities: &mut EntityCollection) {
        let mut states = vec![PassState::default(); entities.len()];
        let mut front = vec![false; entities.len()];

        for rule in &self.style.rules {
            let icons = self.rule_icons(rule);
            let mut matched = 0usize;

            for (idx, entity) in entities.entities_mut().iter_mut().enumerate() {
                if !self.matches(rule, entity) {
                    continue;
                }
                matched += 1;

                for (symbolizer, icon) in rule.symbolizers.iter().zip(&icons) {
                    if symbolizer.needs_icon() && icon.is_none() {
                        continue;
                    }
                    match apply_symbolizer(entity, symbolizer, *icon, &mut states[idx], &self.config) {
                        Ok(true) => front[idx] |= symbolizer.brings_to_front(),
                        Ok(false) => {}
                        Err(e) => log::warn!(
                            "rule {:?}: {} symbolizer failed on entity {}: {e}",
                            rule.name,
                            symbolizer.kind_name(),
                            entity.id
                        ),
                    }
                }
            }
            log::debug!("rule {:?} matched {matched} entit(ies)", rule.name);
        }

        entities.rebuild_draw_order(&front);
    }

    /// The icon of each symbolizer in `rule`, `None` for those without one.
    fn rule_icons<'a>(&'a self, rule: &Rule) -> Vec<Option<&'a IconImage>> {
        rule.symbolizers
            .iter()
            .map(|symbolizer| {
                if !symbolizer.needs_icon() {
                    return None;
                }
                let id = (self.image_id)(symbolizer)?;
                match self.icons.lookup(&id) {
                    Ok(icon) => Some(icon),
                    Err(e) => {
                        log::warn!("rule {:?}: skipping {} symbolizer: {e}", rule.name, symbolizer.kind_name());
                        None
                    }
                }
            })
            .collect()
    }

    fn matches(&self, rule: &Rule, entity: &Entity) -> bool {
        let Some(filter) = &rule.filter else {
            return true;
        };
        self.filter_evaluator
            .matches(filter, &entity.properties)
            .unwrap_or_else(|e| {
                log::warn!("rule {:?}: filter treated as not matching: {e}", rule.name);
                false
            })
    }
}
