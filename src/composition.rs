//! Per-class character counts, for display.
//!
//! Unlike the scoring classes, these counts are Unicode-aware: any
//! lowercase/uppercase letter or numeric character is counted, and
//! "special" is everything that is not alphanumeric.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassShare {
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Composition {
    pub length: usize,
    pub lowercase: ClassShare,
    pub uppercase: ClassShare,
    pub digits: ClassShare,
    pub special: ClassShare,
}

pub fn analyze_composition(password: &str) -> Composition {
    let length = password.chars().count();
    let share = |count: usize| ClassShare {
        count,
        percentage: if length == 0 {
            0.0
        } else {
            count as f64 / length as f64 * 100.0
        },
    };
    let count_where = |pred: fn(&char) -> bool| password.chars().filter(pred).count();

    Composition {
        length,
        lowercase: share(count_where(|c| c.is_lowercase())),
        uppercase: share(count_where(|c| c.is_uppercase())),
        digits: share(count_where(|c| c.is_numeric())),
        special: share(count_where(|c| !c.is_alphanumeric())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composition_counts() {
        let c = analyze_composition("aB3!");
        assert_eq!(c.length, 4);
        assert_eq!(c.lowercase.count, 1);
        assert_eq!(c.uppercase.count, 1);
        assert_eq!(c.digits.count, 1);
        assert_eq!(c.special.count, 1);
        assert_eq!(c.special.percentage, 25.0);
    }

    #[test]
    fn test_composition_empty() {
        let c = analyze_composition("");
        assert_eq!(c.length, 0);
        assert_eq!(c.lowercase.percentage, 0.0);
    }

    #[test]
    fn test_composition_unicode_letters() {
        let c = analyze_composition("éÉ");
        assert_eq!(c.lowercase.count, 1);
        assert_eq!(c.uppercase.count, 1);
        assert_eq!(c.special.count, 0);
    }
}
