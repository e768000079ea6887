//! Hydrant lists as the operator sees them.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::ids::HydrantId;
use crate::models::Hydrant;

/// Hydrants on `trail`, ordered by name with digit runs compared as numbers.
pub fn hydrants_for_trail<'a>(
    hydrants: &'a BTreeMap<HydrantId, Hydrant>,
    trail: &str,
) -> Vec<&'a Hydrant> {
    let mut list: Vec<&Hydrant> = hydrants
        .values()
        .filter(|hydrant| hydrant.trail == trail)
        .collect();
    list.sort_by(|a, b| natural_cmp(&a.name, &b.name).then_with(|| a.id.cmp(&b.id)));
    list
}

/// Case-insensitive comparison treating runs of ASCII digits as numbers,
/// so "H2" sorts before "H10".
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let l_digits = take_digits(&mut left);
                let r_digits = take_digits(&mut right);
                let l_trimmed = l_digits.trim_start_matches('0');
                let r_trimmed = r_digits.trim_start_matches('0');
                let ordering = l_trimmed
                    .len()
                    .cmp(&r_trimmed.len())
                    .then_with(|| l_trimmed.cmp(r_trimmed));
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(l), Some(r)) => {
                let ordering = l.to_lowercase().cmp(r.to_lowercase());
                if ordering != Ordering::Equal {
                    return ordering;
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        digits.push(c);
        chars.next();
    }
    digits
}
