use crate::scene::entity::Entity;

/// The entities handed to a style function, plus the order they are drawn in.
///
/// `entities` keeps the order the host supplied. `draw_order` holds indices into
/// it; a styling pass rebuilds it from scratch, moving brought-to-front entities
/// last while every other entity keeps its relative position.
#[derive(Debug, Clone, Default)]
pub struct EntityCollection {
    entities: Vec<Entity>,
    draw_order: Vec<usize>,
}

impl EntityCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entity: Entity) {
        self.draw_order.push(self.entities.len());
        self.entities.push(entity);
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Entity> {
        self.entities.get(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub(crate) fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    pub fn into_entities(self) -> Vec<Entity> {
        self.entities
    }

    pub fn draw_order(&self) -> &[usize] {
        &self.draw_order
    }

    /// Entities in the order they are drawn, last one on top.
    pub fn iter_draw_order(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.draw_order.iter().map(|i| &self.entities[*i])
    }

    /// Resets the draw order, then moves the flagged entities on top.
    pub(crate) fn rebuild_draw_order(&mut self, bring_to_front: &[bool]) {
        let (front, rest): (Vec<usize>, Vec<usize>) =
            (0..self.entities.len()).partition(|i| bring_to_front.get(*i).copied().unwrap_or(false));
        self.draw_order = rest;
        self.draw_order.extend(front);
    }
}

impl From<Vec<Entity>> for EntityCollection {
    fn from(entities: Vec<Entity>) -> Self {
        let draw_order = (0..entities.len()).collect();
        Self { entities, draw_order }
    }
}

impl FromIterator<Entity> for EntityCollection {
    fn from_iter<T: IntoIterator<Item = Entity>>(iter: T) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<'a> IntoIterator for &'a EntityCollection {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Cartographic, Geometry, Properties};

    fn point() -> Entity {
        Entity::new(Geometry::Point(Cartographic::new(0.0, 0.0, 0.0)), Properties::new())
    }

    #[test]
    fn draw_order_starts_as_insertion_order() {
        let mut c = EntityCollection::new();
        c.push(point());
        c.push(point());
        assert_eq!(c.draw_order(), &[0, 1]);
        let from_vec = EntityCollection::from(vec![point(), point(), point()]);
        assert_eq!(from_vec.draw_order(), &[0, 1, 2]);
    }

    #[test]
    fn bring_to_front_is_stable() {
        let mut c: EntityCollection = (0..5).map(|_| point()).collect();
        c.rebuild_draw_order(&[false, true, false, true, false]);
        assert_eq!(c.draw_order(), &[0, 2, 4, 1, 3]);

        // a fresh pass without flags restores the host order
        c.rebuild_draw_order(&[false; 5]);
        assert_eq!(c.draw_order(), &[0, 1, 2, 3, 4]);
    }
}
