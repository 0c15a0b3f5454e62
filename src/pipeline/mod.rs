use crate::ledger::donors::{Classification, DonorId, DonorLedger};
use crate::ledger::recipients::{RecipientAggregator, RecipientId};
use crate::parser::percentile::Percentile;
use crate::parser::records::{DonationRecord, RecordError};
use anyhow::Result;
use csv::{ByteRecord, QuoteStyle, ReaderBuilder, WriterBuilder};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{Read, Write};
use tracing::{debug, info};


/// One output line: the running statistics of a recipient group right after
/// a repeat donation was added to it.
#[derive(Serialize, Debug, Clone, Eq, PartialEq)]
pub struct RepeatDonation {
    pub cmte_id: String,
    pub zip_code: String,
    pub year: i32,
    pub percentile: i64,
    pub total_amount: i64,
    pub total_count: usize,
}

/// Counters for a run. Nothing is logged per record, only these totals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineStats {
    pub lines_read: u64,
    pub accepted: u64,
    pub repeat_donations: u64,
    pub rejected: BTreeMap<&'static str, u64>,
}

impl PipelineStats {
    fn reject(&mut self, err: RecordError) {
        *self.rejected.entry(err.kind()).or_insert(0) += 1;
    }

    pub fn rejected_total(&self) -> u64 {
        self.rejected.values().sum()
    }

    pub fn log(&self) {
        info!(
            lines_read = self.lines_read,
            accepted = self.accepted,
            rejected = self.rejected_total(),
            repeat_donations = self.repeat_donations,
            "finished processing contributions"
        );
        for (kind, count) in self.rejected.iter() {
            debug!(reason = kind, count, "rejected records");
        }
    }
}

/// Owns all state of a run: the donor ledger, the recipient groups and the
/// percentile to report. Records are processed strictly one after the other.
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub donors: DonorLedger,
    pub recipients: RecipientAggregator,
    pub stats: PipelineStats,
    percentile: Percentile,
}

impl Pipeline {
    pub fn new(percentile: Percentile) -> Self {
        Pipeline {
            donors: DonorLedger::new(),
            recipients: RecipientAggregator::new(),
            stats: PipelineStats::default(),
            percentile,
        }
    }

    /// Processes one raw line. Invalid lines are counted and otherwise leave
    /// no trace: the ledger and the groups are untouched.
    pub fn process_record(&mut self, record: &ByteRecord) -> Option<RepeatDonation> {
        self.stats.lines_read += 1;
        match DonationRecord::from_record(record) {
            Ok(donation) => self.process_donation(donation),
            Err(err) => {
                self.stats.reject(err);
                None
            }
        }
    }

    /// Processes one validated donation.
    /// - classify the donor against the years already on file
    /// - a repeat donation is added to its recipient group and reported
    /// - the donation's year is always recorded, after classification
    pub fn process_donation(&mut self, donation: DonationRecord) -> Option<RepeatDonation> {
        self.stats.accepted += 1;
        let DonationRecord {
            cmte_id,
            name,
            zip_code,
            year,
            amount,
        } = donation;
        let donor = DonorId::new(name, zip_code.clone());
        let event = match self.donors.classify(&donor, year) {
            Classification::FirstSeen => None,
            Classification::Repeat => {
                let recipient = RecipientId {
                    cmte_id: cmte_id.clone(),
                    zip_code: zip_code.clone(),
                    year,
                };
                let report = self
                    .recipients
                    .add_and_query(recipient, amount, self.percentile);
                self.stats.repeat_donations += 1;
                Some(RepeatDonation {
                    cmte_id,
                    zip_code,
                    year,
                    percentile: report.percentile,
                    total_amount: report.total_amount,
                    total_count: report.total_count,
                })
            }
        };
        self.donors.record(donor, year);
        event
    }

    /// Streams `input` line by line and writes every repeat donation to `output`
    /// as soon as it is found, one complete line per write.
    /// Read and write failures abort the run; invalid lines never do.
    pub fn run(&mut self, input: impl Read, output: impl Write) -> Result<PipelineStats> {
        // better to be explicit in case library defaults change
        let mut rdr = ReaderBuilder::new()
            .delimiter(b'|')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(input);
        let mut wtr = WriterBuilder::new()
            .delimiter(b'|')
            .has_headers(false)
            .quote_style(QuoteStyle::Never)
            .from_writer(output);
        let mut record = ByteRecord::new();
        while rdr.read_byte_record(&mut record)? {
            if let Some(event) = self.process_record(&record) {
                wtr.serialize(&event)?;
                // the csv writer buffers; hand every line to `output` as it is found
                wtr.flush()?;
            }
        }
        wtr.flush()?;
        Ok(self.stats.clone())
    }
}
