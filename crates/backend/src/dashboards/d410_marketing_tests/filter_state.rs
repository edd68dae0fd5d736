use std::collections::BTreeSet;

/// Test types currently active for one session.
///
/// An empty active set admits no rows: clearing every toggle shows an empty
/// dashboard rather than silently falling back to the full table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    /// Known categories in table order
    known: Vec<String>,
    active: BTreeSet<String>,
}

impl FilterState {
    /// Seed a state with every known category selected
    pub fn initialize<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut known: Vec<String> = Vec::new();
        for category in categories {
            let category = category.into();
            if !known.contains(&category) {
                known.push(category);
            }
        }
        let active = known.iter().cloned().collect();
        Self { known, active }
    }

    /// Flip `category` in or out of the active set.
    /// Returns false (and does nothing) for unknown categories.
    pub fn toggle(&mut self, category: &str) -> bool {
        if !self.is_known(category) {
            return false;
        }
        if !self.active.remove(category) {
            self.active.insert(category.to_string());
        }
        true
    }

    /// Copying form of [`FilterState::toggle`]
    pub fn toggled(&self, category: &str) -> Self {
        let mut next = self.clone();
        next.toggle(category);
        next
    }

    pub fn is_known(&self, category: &str) -> bool {
        self.known.iter().any(|c| c == category)
    }

    pub fn is_active(&self, category: &str) -> bool {
        self.active.contains(category)
    }

    pub fn known(&self) -> &[String] {
        &self.known
    }

    /// Active categories in table order
    pub fn active(&self) -> impl Iterator<Item = &str> + '_ {
        self.known
            .iter()
            .filter(|c| self.active.contains(c.as_str()))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Whether a row of `category` passes the effective filter
    pub fn admits(&self, category: &str) -> bool {
        self.active.contains(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::btreeset;

    fn abc() -> FilterState {
        FilterState::initialize(["A", "B", "C"])
    }

    #[test]
    fn test_initialize_selects_everything_once() {
        let state = FilterState::initialize(["B", "A", "B", "C"]);
        assert_eq!(state.known(), ["B", "A", "C"]);
        assert_eq!(state.active().collect::<Vec<_>>(), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_toggle_removes_then_adds() {
        let mut state = abc();
        assert!(state.toggle("B"));
        assert!(!state.is_active("B"));
        assert_eq!(
            state.active().collect::<BTreeSet<_>>(),
            btreeset! {"A", "C"}
        );

        assert!(state.toggle("B"));
        assert!(state.is_active("B"));
    }

    #[test]
    fn test_toggle_is_its_own_inverse() {
        let full = abc();
        let partial = full.toggled("A");
        for state in [full, partial] {
            for category in ["A", "B", "C", "Z"] {
                assert_eq!(state.toggled(category).toggled(category), state);
            }
        }
    }

    #[test]
    fn test_unknown_category_is_ignored() {
        let mut state = abc();
        assert!(!state.toggle("Z"));
        assert_eq!(state, abc());
        assert!(!state.is_known("Z"));
    }

    #[test]
    fn test_empty_selection_admits_nothing() {
        let state = abc().toggled("A").toggled("B").toggled("C");
        assert!(state.is_empty());
        for category in ["A", "B", "C"] {
            assert!(!state.admits(category));
        }
    }
}
