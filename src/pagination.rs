//! Incremental reveal of a generated name set.

use crate::types::GeneratedNameSet;

/// Shows the first `page * per_page` names of a set, one page more per
/// [`load_more`](Self::load_more).
#[derive(Debug, Clone)]
pub struct NamePager {
    names: GeneratedNameSet,
    per_page: usize,
    page: usize,
}

impl NamePager {
    /// Start on page 1. A zero page size is treated as 1.
    pub fn new(names: GeneratedNameSet, per_page: u32) -> Self {
        Self {
            names,
            per_page: (per_page as usize).max(1),
            page: 1,
        }
    }

    fn visible_len(&self) -> usize {
        self.page
            .saturating_mul(self.per_page)
            .min(self.names.len())
    }

    pub fn visible(&self) -> &[String] {
        &self.names.names()[..self.visible_len()]
    }

    /// Reveal one more page. Returns `false`, leaving the page unchanged, when every name
    /// is already visible.
    pub fn load_more(&mut self) -> bool {
        if !self.has_more() {
            return false;
        }
        self.page += 1;
        true
    }

    pub fn has_more(&self) -> bool {
        self.visible_len() < self.names.len()
    }

    pub fn is_complete(&self) -> bool {
        !self.has_more()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        self.names.len().div_ceil(self.per_page).max(1)
    }

    pub fn names(&self) -> &GeneratedNameSet {
        &self.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(n: usize) -> GeneratedNameSet {
        (0..n).map(|i| format!("N{}", i)).collect::<Vec<_>>().into()
    }

    #[test]
    fn test_pages_through_set() {
        let mut p = NamePager::new(set(7), 3);
        assert_eq!(p.visible().len(), 3);
        assert_eq!(p.total_pages(), 3);
        assert!(p.load_more());
        assert_eq!(p.visible().len(), 6);
        assert!(p.load_more());
        assert_eq!(p.visible().len(), 7);
        assert!(p.is_complete());
        assert!(!p.load_more());
        assert_eq!(p.page(), 3);
    }

    #[test]
    fn test_short_set_fits_one_page() {
        let p = NamePager::new(set(2), 10);
        assert_eq!(p.visible(), &["N0".to_string(), "N1".to_string()]);
        assert!(!p.has_more());
        assert_eq!(p.total_pages(), 1);
    }

    #[test]
    fn test_zero_page_size() {
        let p = NamePager::new(set(2), 0);
        assert_eq!(p.visible().len(), 1);
    }
}
