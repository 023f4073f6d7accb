// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Page history and reading position shared by the interactive-fiction
//! entities.
//!
//! A history is either empty (`len == 0`, `current == 0`) or positioned on
//! an existing page (`current < len`). Every transition that would break
//! this fails with [`KeepsakeError::InvalidPageIndex`] instead of clamping,
//! since callers use the index to request exactly the right continuation.

use serde::Serialize;

use crate::error::KeepsakeError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageHistory {
    pages: Vec<String>,
    #[serde(rename = "currentPageIndex")]
    current: usize,
}

impl PageHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a history from persisted parts, checking the position.
    pub fn from_parts(pages: Vec<String>, current: usize) -> Result<Self, KeepsakeError> {
        let valid = if pages.is_empty() {
            current == 0
        } else {
            current < pages.len()
        };
        if !valid {
            return Err(KeepsakeError::InvalidPageIndex {
                index: current,
                len: pages.len(),
            });
        }
        Ok(Self { pages, current })
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_page(&self) -> Option<&str> {
        self.pages.get(self.current).map(String::as_str)
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn is_at_latest(&self) -> bool {
        self.pages.is_empty() || self.current + 1 == self.pages.len()
    }

    /// Append a page and move onto it. Only allowed from the latest page.
    pub fn append(&mut self, page: impl Into<String>) -> Result<(), KeepsakeError> {
        if !self.is_at_latest() {
            return Err(KeepsakeError::InvalidPageIndex {
                index: self.current,
                len: self.pages.len(),
            });
        }
        self.pages.push(page.into());
        self.current = self.pages.len() - 1;
        Ok(())
    }

    /// Move to an existing page. Later pages are kept.
    pub fn go_to(&mut self, index: usize) -> Result<(), KeepsakeError> {
        if index >= self.pages.len() {
            return Err(KeepsakeError::InvalidPageIndex {
                index,
                len: self.pages.len(),
            });
        }
        self.current = index;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.pages.clear();
        self.current = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn three_pages_at_last() -> PageHistory {
        PageHistory::from_parts(vec!["p1".into(), "p2".into(), "p3".into()], 2).unwrap()
    }

    #[test]
    fn append_from_latest_advances() {
        let mut history = three_pages_at_last();
        history.append("p4").unwrap();
        assert_eq!(history.len(), 4);
        assert_eq!(history.current_index(), 3);
        assert_eq!(history.current_page(), Some("p4"));
    }

    #[test]
    fn go_to_out_of_range_fails_without_moving() {
        let mut history = three_pages_at_last();
        history.append("p4").unwrap();
        let err = history.go_to(5).unwrap_err();
        assert!(matches!(err, KeepsakeError::InvalidPageIndex { index: 5, len: 4 }));
        assert_eq!(history.current_index(), 3);

        history.go_to(1).unwrap();
        assert_eq!(history.current_index(), 1);
        assert_eq!(history.len(), 4);
    }

    #[test]
    fn append_while_rereading_fails() {
        let mut history = three_pages_at_last();
        history.go_to(0).unwrap();
        assert!(history.append("branch").is_err());
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn empty_history_accepts_first_page() {
        let mut history = PageHistory::new();
        assert!(history.current_page().is_none());
        assert!(history.go_to(0).is_err());
        history.append("opening").unwrap();
        assert_eq!(history.current_index(), 0);
    }

    #[test]
    fn from_parts_rejects_bad_position() {
        assert!(PageHistory::from_parts(vec![], 1).is_err());
        assert!(PageHistory::from_parts(vec!["a".into()], 1).is_err());
        assert!(PageHistory::from_parts(vec![], 0).is_ok());
    }

    #[test]
    fn clear_resets_to_empty() {
        let mut history = three_pages_at_last();
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.current_index(), 0);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Append,
        GoTo(usize),
        Clear,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => Just(Op::Append),
            3 => (0usize..8).prop_map(Op::GoTo),
            1 => Just(Op::Clear),
        ]
    }

    proptest! {
        #[test]
        fn position_always_valid(ops in prop::collection::vec(op(), 0..40)) {
            let mut history = PageHistory::new();
            for op in ops {
                let _ = match op {
                    Op::Append => history.append("page"),
                    Op::GoTo(i) => history.go_to(i),
                    Op::Clear => {
                        history.clear();
                        Ok(())
                    }
                };
                if history.is_empty() {
                    prop_assert_eq!(history.current_index(), 0);
                } else {
                    prop_assert!(history.current_index() < history.len());
                }
            }
        }
    }
}
