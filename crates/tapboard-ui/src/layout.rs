//! Key layout data.
//!
//! A layout is an ordered list of rows, each an ordered list of key labels,
//! left to right. Layouts are immutable once built.

use std::sync::OnceLock;

use tapboard_core::LayoutError;

const QWERTY_ROWS: [&[&str]; 4] = [
    &["Q", "W", "E", "R", "T", "Y", "U", "I", "O", "P"],
    &["A", "S", "D", "F", "G", "H", "J", "K", "L"],
    &["Z", "X", "C", "V", "B", "N", "M", "DEL"],
    &["SPACE", "ENTER"],
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyboardLayout {
    rows: Vec<Vec<String>>,
}

impl KeyboardLayout {
    /// The built-in four-row layout, shared by every surface.
    pub fn qwerty() -> &'static KeyboardLayout {
        static QWERTY: OnceLock<KeyboardLayout> = OnceLock::new();
        QWERTY.get_or_init(|| KeyboardLayout {
            rows: QWERTY_ROWS
                .iter()
                .map(|row| row.iter().map(|k| (*k).to_string()).collect())
                .collect(),
        })
    }

    pub fn from_rows<R, K>(rows: impl IntoIterator<Item = R>) -> Result<Self, LayoutError>
    where
        R: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let rows: Vec<Vec<String>> = rows
            .into_iter()
            .map(|r| r.into_iter().map(Into::into).collect())
            .collect();

        if rows.is_empty() {
            return Err(LayoutError::Empty);
        }
        for (row, keys) in rows.iter().enumerate() {
            if keys.is_empty() {
                return Err(LayoutError::EmptyRow { row });
            }
            if let Some(column) = keys.iter().position(|k| k.trim().is_empty()) {
                return Err(LayoutError::BlankLabel { row, column });
            }
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Every label, row by row.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().flatten().map(String::as_str)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels().any(|l| l == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qwerty_has_four_rows_in_display_order() {
        let l = KeyboardLayout::qwerty();
        assert_eq!(l.row_count(), 4);
        assert_eq!(l.rows()[0].first().map(String::as_str), Some("Q"));
        assert_eq!(l.rows()[0].last().map(String::as_str), Some("P"));
        assert_eq!(l.rows()[2].last().map(String::as_str), Some("DEL"));
        assert_eq!(l.rows()[3], vec!["SPACE", "ENTER"]);
        assert_eq!(l.labels().count(), 10 + 9 + 8 + 2);
    }

    #[test]
    fn qwerty_is_built_once() {
        assert!(std::ptr::eq(KeyboardLayout::qwerty(), KeyboardLayout::qwerty()));
    }

    #[test]
    fn letters_are_single_uppercase() {
        for label in KeyboardLayout::qwerty().labels() {
            if matches!(label, "SPACE" | "DEL" | "ENTER") {
                continue;
            }
            assert_eq!(label.chars().count(), 1);
            assert!(label.chars().all(|c| c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn custom_layout_validation() {
        assert_eq!(
            KeyboardLayout::from_rows(Vec::<Vec<String>>::new()),
            Err(LayoutError::Empty)
        );
        assert_eq!(
            KeyboardLayout::from_rows(vec![vec!["A"], vec![]]),
            Err(LayoutError::EmptyRow { row: 1 })
        );
        assert_eq!(
            KeyboardLayout::from_rows(vec![vec!["A", " "]]),
            Err(LayoutError::BlankLabel { row: 0, column: 1 })
        );

        let l = KeyboardLayout::from_rows(vec![vec!["1", "2"], vec!["DEL"]]).unwrap();
        assert!(l.contains("DEL"));
        assert!(!l.contains("Q"));
    }
}
