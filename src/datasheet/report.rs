//! Listing helpers for datasheet reports.

use std::cmp::Ordering;

use super::types::Datasheet;

/// Sort direction for type ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Orders datasheets national, local, school (or the reverse).
///
/// Stable: records of the same type keep their relative order.
pub fn sort_by_type(sheets: &mut [Datasheet], order: SortOrder) {
    sheets.sort_by(|a, b| {
        let ord = a.bundle.sort_weight().cmp(&b.bundle.sort_weight());
        match order {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    });
}

/// Compares two datasheets by type weight only
pub fn compare_type(a: &Datasheet, b: &Datasheet) -> Ordering {
    a.bundle.sort_weight().cmp(&b.bundle.sort_weight())
}

impl Datasheet {
    /// Label shown in listings
    pub fn display_label(&self) -> &str {
        &self.title
    }

    /// SEN support plus EHC plan; a missing figure counts as zero
    pub fn overall(&self) -> f64 {
        self.sen_support.unwrap_or(0.0) + self.ehc_plan.unwrap_or(0.0)
    }

    /// Overall figure formatted for display, e.g. `12.5%`
    pub fn overall_display(&self) -> String {
        format!("{:.1}%", self.overall())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasheet::types::{ActorId, DatasheetType};

    fn sheet(bundle: DatasheetType, title: &str) -> Datasheet {
        Datasheet::new(bundle, title, ActorId(1)).unwrap()
    }

    #[test]
    fn test_sort_by_type_ascending() {
        let mut sheets = vec![
            sheet(DatasheetType::School, "s1"),
            sheet(DatasheetType::National, "n1"),
            sheet(DatasheetType::Local, "l1"),
            sheet(DatasheetType::School, "s2"),
        ];
        sort_by_type(&mut sheets, SortOrder::Ascending);
        let titles: Vec<_> = sheets.iter().map(|s| s.display_label()).collect();
        assert_eq!(titles, vec!["n1", "l1", "s1", "s2"]);
    }

    #[test]
    fn test_sort_by_type_descending_is_stable() {
        let mut sheets = vec![
            sheet(DatasheetType::National, "n1"),
            sheet(DatasheetType::School, "s1"),
            sheet(DatasheetType::School, "s2"),
        ];
        sort_by_type(&mut sheets, SortOrder::Descending);
        let titles: Vec<_> = sheets.iter().map(|s| s.display_label()).collect();
        assert_eq!(titles, vec!["s1", "s2", "n1"]);
    }

    #[test]
    fn test_overall_calculation() {
        let s = sheet(DatasheetType::Local, "l").with_figures(Some(10.25), Some(2.25));
        assert_eq!(s.overall(), 12.5);
        assert_eq!(s.overall_display(), "12.5%");
    }

    #[test]
    fn test_overall_missing_figures_count_as_zero() {
        let s = sheet(DatasheetType::Local, "l").with_figures(None, Some(3.0));
        assert_eq!(s.overall_display(), "3.0%");
        let empty = sheet(DatasheetType::Local, "e");
        assert_eq!(empty.overall_display(), "0.0%");
    }

    #[test]
    fn test_compare_type() {
        let n = sheet(DatasheetType::National, "n");
        let s = sheet(DatasheetType::School, "s");
        assert_eq!(compare_type(&n, &s), Ordering::Less);
    }
}
