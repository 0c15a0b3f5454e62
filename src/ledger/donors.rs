use std::collections::HashMap;

/// A donor is identified by name and 5 digit zip code.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct DonorId {
    pub name: String,
    pub zip_code: String,
}

impl DonorId {
    pub fn new(name: impl Into<String>, zip_code: impl Into<String>) -> Self {
        DonorId {
            name: name.into(),
            zip_code: zip_code.into(),
        }
    }
}

/// outcome of looking up a donation's year against the donor's history
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Classification {
    FirstSeen,
    Repeat,
}

/// Earliest donation year of every donor seen so far.
/// Only the minimum of a donor's years is ever needed, so that is all we keep.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DonorLedger {
    pub state: HashMap<DonorId, i32>,
}

impl DonorLedger {
    /// creates an empty ledger
    pub fn new() -> Self {
        DonorLedger {
            state: HashMap::new(),
        }
    }

    /// `Repeat` iff the donor already has a donation on file from a year strictly
    /// before `year`. Unknown donors, and donations in or before the earliest year
    /// on file, are `FirstSeen`.
    /// Does not modify the ledger; call `record` afterwards.
    pub fn classify(&self, donor: &DonorId, year: i32) -> Classification {
        match self.state.get(donor) {
            Some(&year_min) if year_min < year => Classification::Repeat,
            _ => Classification::FirstSeen,
        }
    }

    /// adds a donation in `year` to the donor's history
    pub fn record(&mut self, donor: DonorId, year: i32) {
        self.state
            .entry(donor)
            .and_modify(|year_min| *year_min = (*year_min).min(year))
            .or_insert(year);
    }

    /// earliest year on file for `donor`
    #[cfg(test)]
    pub fn year_min(&self, donor: &DonorId) -> Option<i32> {
        self.state.get(donor).copied()
    }

    /// number of distinct donors
    pub fn len(&self) -> usize {
        self.state.len()
    }
}
