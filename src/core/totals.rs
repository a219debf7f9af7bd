//! Control-total engine
//!
//! Counts, entry hash and dollar totals are a pure function of the entries.
//! The same computation feeds batch controls and, summed across batches, the
//! file control.

use crate::core::traits::ControlEntry;
use crate::record::field::parse_num;
use crate::types::codes::Direction;
use serde::{Deserialize, Serialize};

/// The entry hash keeps only its low-order 10 digits
pub const ENTRY_HASH_MODULUS: u64 = 10_000_000_000;

/// Totals carried by batch and file control records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlTotals {
    /// Entries plus their addenda records
    pub entry_addenda_count: u32,
    /// Sum of RDFI identifications mod 10^10
    pub entry_hash: u64,
    pub total_debit: u64,
    pub total_credit: u64,
}

impl ControlTotals {
    /// Tabulate a batch's entries
    pub fn tabulate<'a, E, I>(entries: I) -> Self
    where
        E: ControlEntry + 'a,
        I: IntoIterator<Item = &'a E>,
    {
        let mut totals = ControlTotals::default();
        let mut hash: u64 = 0;
        for entry in entries {
            let records = 1 + entry.addenda_count();
            totals.entry_addenda_count = totals
                .entry_addenda_count
                .saturating_add(u32::try_from(records).unwrap_or(u32::MAX));
            hash = (hash + parse_num(entry.rdfi_identification())) % ENTRY_HASH_MODULUS;
            if entry.is_prenote() {
                continue;
            }
            match entry.direction() {
                Some(Direction::Debit) => {
                    totals.total_debit = totals.total_debit.saturating_add(entry.amount())
                }
                Some(Direction::Credit) => {
                    totals.total_credit = totals.total_credit.saturating_add(entry.amount())
                }
                None => {}
            }
        }
        totals.entry_hash = hash;
        totals
    }

    /// Fold another batch's totals into a file-level total
    pub fn accumulate(&mut self, other: &ControlTotals) {
        self.entry_addenda_count = self
            .entry_addenda_count
            .saturating_add(other.entry_addenda_count);
        self.entry_hash = (self.entry_hash + other.entry_hash) % ENTRY_HASH_MODULUS;
        self.total_debit = self.total_debit.saturating_add(other.total_debit);
        self.total_credit = self.total_credit.saturating_add(other.total_credit);
    }
}

impl<'a> std::iter::Sum<&'a ControlTotals> for ControlTotals {
    fn sum<I: Iterator<Item = &'a ControlTotals>>(iter: I) -> Self {
        let mut total = ControlTotals::default();
        for totals in iter {
            total.accumulate(totals);
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Addenda05, EntryDetail};
    use rstest::rstest;

    fn entry(code: u8, rdfi: &str, amount: u64) -> EntryDetail {
        let mut entry = EntryDetail::new(code);
        entry.set_rdfi(rdfi);
        entry.amount = amount;
        entry
    }

    #[test]
    fn test_tabulate_counts_addenda_and_splits_directions() {
        let mut credit = entry(22, "231380104", 25000);
        credit.add_addenda05(Addenda05::new("Vacation pay"));
        let debit = entry(27, "121042882", 1000);
        let totals = ControlTotals::tabulate(&[credit, debit]);
        assert_eq!(totals.entry_addenda_count, 3);
        assert_eq!(totals.entry_hash, 23138010 + 12104288);
        assert_eq!(totals.total_credit, 25000);
        assert_eq!(totals.total_debit, 1000);
    }

    #[rstest]
    #[case(23)]
    #[case(28)]
    fn test_prenotes_excluded_from_dollar_totals(#[case] code: u8) {
        let totals = ControlTotals::tabulate(&[entry(code, "231380104", 500)]);
        assert_eq!(totals.total_credit + totals.total_debit, 0);
        assert_eq!(totals.entry_addenda_count, 1);
    }

    #[test]
    fn test_entry_hash_truncates_high_order_digits() {
        let entries: Vec<EntryDetail> = (0..200)
            .map(|_| entry(22, "999999995", 1))
            .collect();
        let totals = ControlTotals::tabulate(&entries);
        let untruncated: u64 = 99_999_999 * 200;
        assert!(untruncated >= ENTRY_HASH_MODULUS);
        assert_eq!(totals.entry_hash, untruncated % ENTRY_HASH_MODULUS);
    }

    #[test]
    fn test_accumulate_sums_batches() {
        let a = ControlTotals {
            entry_addenda_count: 2,
            entry_hash: 9_999_999_999,
            total_debit: 10,
            total_credit: 0,
        };
        let b = ControlTotals {
            entry_addenda_count: 1,
            entry_hash: 2,
            total_debit: 0,
            total_credit: 5,
        };
        let total: ControlTotals = [a, b].iter().sum();
        assert_eq!(total.entry_addenda_count, 3);
        assert_eq!(total.entry_hash, 1);
        assert_eq!(total.total_debit, 10);
        assert_eq!(total.total_credit, 5);
    }
}
