/// The selected elements of the current page.
///
/// Indices are kept sorted and unique. The *primary* element is the one a click
/// selected; it anchors click-through cycling and the property panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    indices: Vec<usize>,
    primary: Option<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(index: usize) -> Self {
        Self {
            indices: vec![index],
            primary: Some(index),
        }
    }

    /// Replaces the selection with `indices`; the lowest becomes primary
    pub fn from_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        let mut indices: Vec<usize> = indices.into_iter().collect();
        indices.sort_unstable();
        indices.dedup();
        let primary = indices.first().copied();
        Self { indices, primary }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn primary(&self) -> Option<usize> {
        self.primary
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.binary_search(&index).is_ok()
    }

    /// The index when exactly one element is selected
    pub fn only(&self) -> Option<usize> {
        match self.indices.as_slice() {
            [index] => Some(*index),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.indices.clear();
        self.primary = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_requires_exactly_one() {
        assert_eq!(Selection::single(4).only(), Some(4));
        assert_eq!(Selection::from_indices([3, 1, 3]).only(), None);
        assert_eq!(Selection::from_indices([3, 1, 3]).indices(), &[1, 3]);
    }
}
