use std::collections::HashMap;

use chromiumoxide::element::Element;

use super::driver::ElementRef;
use crate::error::{Error, Result};

/// Elements resolved during the session, addressed by [`ElementRef`].
pub struct ElementTable {
    elements: HashMap<u64, Element>,
    next_id: u64,
}

impl ElementTable {
    pub fn new() -> Self {
        Self {
            elements: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn insert(&mut self, element: Element) -> ElementRef {
        let id = self.next_id;
        self.next_id += 1;
        self.elements.insert(id, element);
        ElementRef(id)
    }

    pub fn get(&self, element: ElementRef) -> Result<&Element> {
        self.elements
            .get(&element.0)
            .ok_or(Error::StaleElement(element.0))
    }

    /// Empty the table, handing back the elements it held. Ids keep
    /// counting up, so refs issued before the drain never resolve again.
    pub fn drain(&mut self) -> Vec<Element> {
        self.elements.drain().map(|(_, element)| element).collect()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Default for ElementTable {
    fn default() -> Self {
        Self::new()
    }
}
