//! Ordering predicates over possibly-absent dates.
//!
//! Every predicate here answers `false` when either side is missing. Deciding what a missing date
//! means for a business rule is left to the rule itself (see [crate::Rule]).

use crate::date::CalendarDate;

/// True if `a` is strictly after `b`.
pub fn is_after(a: Option<&CalendarDate>, b: Option<&CalendarDate>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a > b)
}

/// True if `a` is strictly before `b`.
pub fn is_before(a: Option<&CalendarDate>, b: Option<&CalendarDate>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a < b)
}

/// True if both dates are present and the same day.
pub fn is_equal(a: Option<&CalendarDate>, b: Option<&CalendarDate>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a == b)
}

/// True if no date was given.
pub fn is_absent(date: Option<&CalendarDate>) -> bool {
    date.is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    fn samples() -> Vec<Option<CalendarDate>> {
        vec![
            None,
            Some(CalendarDate::new(2023, 12, 31).unwrap()),
            Some(CalendarDate::new(2024, 1, 1).unwrap()),
            Some(CalendarDate::new(2024, 1, 2).unwrap()),
            Some(CalendarDate::new(2024, 2, 1).unwrap()),
        ]
    }

    #[test]
    fn test_absent_operand_is_false() {
        let date = CalendarDate::new(2024, 1, 1).unwrap();
        for (a, b) in [(None, Some(&date)), (Some(&date), None), (None, None)] {
            assert!(!is_after(a, b));
            assert!(!is_before(a, b));
            assert!(!is_equal(a, b));
        }
        assert!(is_absent(None));
        assert!(!is_absent(Some(&date)));
    }

    #[test]
    fn test_exactly_one_relation_holds_for_present_dates() {
        let samples = samples();
        for (a, b) in samples.iter().flatten().cartesian_product(samples.iter().flatten()) {
            let relations = [
                is_before(Some(a), Some(b)),
                is_equal(Some(a), Some(b)),
                is_after(Some(a), Some(b)),
            ];
            assert_eq!(1, relations.iter().filter(|r| **r).count());
        }
    }

    #[test]
    fn test_after_is_before_flipped() {
        for (a, b) in samples().iter().tuple_combinations() {
            assert_eq!(is_after(a.as_ref(), b.as_ref()), is_before(b.as_ref(), a.as_ref()));
            assert_eq!(is_before(a.as_ref(), b.as_ref()), is_after(b.as_ref(), a.as_ref()));
        }
    }

    #[test]
    fn test_strict() {
        let date = CalendarDate::new(2024, 1, 1).unwrap();
        assert!(!is_after(Some(&date), Some(&date)));
        assert!(!is_before(Some(&date), Some(&date)));
        assert!(is_equal(Some(&date), Some(&date)));
    }
}
