//! Per-image box storage.
//!
//! The store is the only owner of committed boxes. Every write replaces the
//! whole list for one image key; there is no in-place mutation of a box.

use std::collections::HashMap;

use crate::model::BoundingBox;

/// Storage seam for committed boxes, keyed by image identifier.
pub trait BoxStore {
    /// Boxes for an image in drawing order (empty if none).
    fn get(&self, image_key: &str) -> &[BoundingBox];

    /// Replace the box list for an image.
    fn save(&mut self, image_key: &str, boxes: Vec<BoundingBox>);

    /// Drop the boxes for one image.
    fn clear(&mut self, image_key: &str);

    /// Drop everything.
    fn clear_all(&mut self);

    /// Keys of images that currently hold at least one box, sorted.
    fn annotated_keys(&self) -> Vec<String>;
}

/// In-memory box store. State lives for the process only.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    /// Map from image key to its boxes
    boxes: HashMap<String, Vec<BoundingBox>>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of images with at least one box.
    pub fn annotated_image_count(&self) -> usize {
        self.boxes.len()
    }

    pub fn total_boxes(&self) -> usize {
        self.boxes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

impl BoxStore for AnnotationStore {
    fn get(&self, image_key: &str) -> &[BoundingBox] {
        self.boxes.get(image_key).map(Vec::as_slice).unwrap_or(&[])
    }

    fn save(&mut self, image_key: &str, boxes: Vec<BoundingBox>) {
        log::trace!("Store: save {} boxes for '{}'", boxes.len(), image_key);
        if boxes.is_empty() {
            self.boxes.remove(image_key);
        } else {
            self.boxes.insert(image_key.to_string(), boxes);
        }
    }

    fn clear(&mut self, image_key: &str) {
        if self.boxes.remove(image_key).is_some() {
            log::debug!("Store: cleared '{}'", image_key);
        }
    }

    fn clear_all(&mut self) {
        log::debug!("Store: cleared {} images", self.boxes.len());
        self.boxes.clear();
    }

    fn annotated_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.boxes.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(name: &str) -> BoundingBox {
        BoundingBox::new(10.0, 10.0, 50.0, 50.0, name)
    }

    #[test]
    fn test_get_missing_is_empty() {
        let store = AnnotationStore::new();
        assert!(store.get("nope").is_empty());
    }

    #[test]
    fn test_save_replaces_whole_list() {
        let mut store = AnnotationStore::new();
        store.save("a", vec![boxed("x"), boxed("y")]);
        store.save("a", vec![boxed("z")]);
        assert_eq!(store.get("a").len(), 1);
        assert_eq!(store.get("a")[0].violation_name, "z");
    }

    #[test]
    fn test_save_leaves_other_keys_untouched() {
        let mut store = AnnotationStore::new();
        store.save("a", vec![boxed("x")]);
        let before = store.get("a").to_vec();
        store.save("b", vec![boxed("y")]);
        assert_eq!(store.get("a"), before.as_slice());
        assert_eq!(store.annotated_keys(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_saving_empty_list_removes_key() {
        let mut store = AnnotationStore::new();
        store.save("a", vec![boxed("x")]);
        store.save("a", Vec::new());
        assert_eq!(store.annotated_image_count(), 0);
    }

    #[test]
    fn test_clear_and_clear_all() {
        let mut store = AnnotationStore::new();
        store.save("a", vec![boxed("x")]);
        store.save("b", vec![boxed("y"), boxed("z")]);
        assert_eq!(store.total_boxes(), 3);

        store.clear("a");
        assert_eq!(store.annotated_image_count(), 1);

        store.clear_all();
        assert!(store.is_empty());
    }
}
