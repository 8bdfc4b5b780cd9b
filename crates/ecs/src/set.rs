use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::component::{Component, ComponentData, ComponentKind};

/// The components attached to one entity: at most one instance per kind,
/// iterated in [`ComponentKind`] order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentSet {
    components: BTreeMap<ComponentKind, Component>,
}

impl ComponentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `component`, returning the instance of the same kind it replaced.
    pub fn insert(&mut self, component: impl Into<Component>) -> Option<Component> {
        let component = component.into();
        self.components.insert(component.kind(), component)
    }

    pub fn remove(&mut self, kind: ComponentKind) -> Option<Component> {
        self.components.remove(&kind)
    }

    pub fn contains(&self, kind: ComponentKind) -> bool {
        self.components.contains_key(&kind)
    }

    pub fn get<T: ComponentData>(&self) -> Option<&T> {
        self.components.get(&T::KIND).and_then(T::from_component)
    }

    pub fn get_mut<T: ComponentData>(&mut self) -> Option<&mut T> {
        self.components
            .get_mut(&T::KIND)
            .and_then(T::from_component_mut)
    }

    pub fn get_kind(&self, kind: ComponentKind) -> Option<&Component> {
        self.components.get(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = ComponentKind> + '_ {
        self.components.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Detach everything, returning the removed components in kind order.
    pub fn clear(&mut self) -> Vec<Component> {
        std::mem::take(&mut self.components).into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Holdable, Hoverable, Interactor, PhysicsBody};

    #[test]
    fn insert_replaces_same_kind() {
        let mut set = ComponentSet::new();
        assert!(set.insert(Interactor::new("leftHand")).is_none());
        let replaced = set.insert(Interactor::new("rightHand"));
        assert_eq!(replaced, Some(Component::Interactor(Interactor::new("leftHand"))));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get::<Interactor>().unwrap().id, "rightHand");
    }

    #[test]
    fn kinds_are_ordered() {
        let mut set = ComponentSet::new();
        set.insert(PhysicsBody::default());
        set.insert(Hoverable);
        set.insert(Holdable);
        let kinds: Vec<_> = set.kinds().collect();
        assert_eq!(
            kinds,
            vec![ComponentKind::Holdable, ComponentKind::Hoverable, ComponentKind::PhysicsBody]
        );
    }

    #[test]
    fn remove_and_clear() {
        let mut set = ComponentSet::new();
        set.insert(Hoverable);
        set.insert(Holdable);
        assert!(set.remove(ComponentKind::Hoverable).is_some());
        assert!(!set.contains(ComponentKind::Hoverable));
        let removed = set.clear();
        assert_eq!(removed.len(), 1);
        assert!(set.is_empty());
    }

    #[test]
    fn get_mut_writes_through() {
        let mut set = ComponentSet::new();
        set.insert(PhysicsBody::default());
        set.get_mut::<PhysicsBody>().unwrap().needs_update = false;
        assert!(!set.get::<PhysicsBody>().unwrap().needs_update);
    }
}
