//! Station name ordering for export.
//!
//! `START` comes first. Names made of a letter prefix followed by digits
//! (`CsFree2`, `GPS10`) order by number when the prefixes agree, so
//! `CsFree2` sorts before `CsFree10`. Everything else is plain string order.

use std::cmp::Ordering;

use regex::Regex;

use crate::Result;
use crate::station::START;

const SUFFIXED_NAME_RE: &str = r"^([A-Za-z]+)([0-9]+)";

pub struct NameOrder {
    re: Regex,
}

impl NameOrder {
    pub fn new() -> Result<Self> {
        Ok(Self {
            re: Regex::new(SUFFIXED_NAME_RE)?,
        })
    }

    fn split<'a>(&self, name: &'a str) -> Option<(&'a str, &'a str)> {
        let caps = self.re.captures(name)?;
        Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match (a == START, b == START) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {}
        }

        if let (Some((pa, na)), Some((pb, nb))) = (self.split(a), self.split(b)) {
            if pa == pb {
                let by_number = compare_digits(na, nb);
                if by_number != Ordering::Equal {
                    return by_number;
                }
            }
        }
        a.cmp(b)
    }
}

/// Numeric comparison of two ASCII digit strings of any length.
fn compare_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
