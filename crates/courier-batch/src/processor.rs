//! # Shipment Processor
//!
//! Streams a transaction file through the discount engine.
//!
//! ## Processing Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       ShipmentProcessor::process                        │
//! │                                                                         │
//! │  BufRead ──► line ──► TransactionLine::parse ──► ShipmentRecord        │
//! │                            │                          │                 │
//! │                  blank? skip                          ▼                 │
//! │                                           DiscountEngine::apply_discount│
//! │                                                       │                 │
//! │                                                       ▼                 │
//! │  Write ◄── render_text / JsonRow ◄───────────────── Quote              │
//! │                                                       │                 │
//! │                                                       ▼                 │
//! │                                                  RunSummary             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rows are handled one at a time in input order. A malformed row is
//! written out as `Ignored` and processing carries on. Bytes that are not
//! valid UTF-8 are decoded lossily, so such a row is malformed, not fatal.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use courier_core::{DiscountEngine, Money, Quote, ShipmentRecord};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{BatchError, BatchResult};
use crate::format::{render_text, JsonRow, OutputFormat, RowStatus};

/// Output path that means "write to stdout".
pub const STDOUT_PATH: &str = "-";

// =============================================================================
// Transaction Line
// =============================================================================

/// The whitespace-separated fields of one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionLine<'a> {
    /// The line with surrounding whitespace removed, echoed in the output.
    pub text: &'a str,
    pub date: &'a str,
    pub size: &'a str,
    /// `None` unless the line has exactly three fields.
    pub provider: Option<&'a str>,
}

impl<'a> TransactionLine<'a> {
    /// Splits a raw line. Returns `None` for blank lines.
    ///
    /// ```rust
    /// use courier_batch::TransactionLine;
    ///
    /// let line = TransactionLine::parse("2015-02-01 S MR\n").unwrap();
    /// assert_eq!((line.date, line.size, line.provider), ("2015-02-01", "S", Some("MR")));
    ///
    /// let short = TransactionLine::parse("2015-02-29 CUSPS").unwrap();
    /// assert_eq!(short.provider, None);
    ///
    /// assert!(TransactionLine::parse("   ").is_none());
    /// ```
    pub fn parse(raw: &'a str) -> Option<Self> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }

        let fields: Vec<&str> = text.split_whitespace().collect();
        let (date, size, provider) = match fields.as_slice() {
            [date, size, provider] => (*date, *size, Some(*provider)),
            [date, size, ..] => (*date, *size, None),
            [date] => (*date, "", None),
            [] => return None,
        };

        Some(TransactionLine {
            text,
            date,
            size,
            provider,
        })
    }

    /// Builds the engine input, resolving the provider against the
    /// registered catalogs.
    pub fn to_record(&self, engine: &DiscountEngine) -> ShipmentRecord {
        let provider = self.provider.and_then(|raw| engine.resolve_provider(raw));
        ShipmentRecord::new(self.date, self.size, provider)
    }
}

// =============================================================================
// Run Summary
// =============================================================================

/// Counts for one processed file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Non-blank input lines.
    pub rows: usize,
    pub priced: usize,
    pub discounted: usize,
    pub ignored: usize,
    /// Sum of every granted discount.
    pub total_discount: Money,
}

impl RunSummary {
    fn record(&mut self, quote: &Quote) {
        self.rows += 1;
        match RowStatus::of(quote) {
            RowStatus::Priced => self.priced += 1,
            RowStatus::Discounted => self.discounted += 1,
            RowStatus::Ignored => self.ignored += 1,
        }
        self.total_discount += quote.discount;
    }
}

// =============================================================================
// Processor
// =============================================================================

/// Drives a [`DiscountEngine`] over transaction streams.
#[derive(Debug)]
pub struct ShipmentProcessor {
    engine: DiscountEngine,
    format: OutputFormat,
}

impl ShipmentProcessor {
    pub fn new(engine: DiscountEngine, format: OutputFormat) -> Self {
        ShipmentProcessor { engine, format }
    }

    pub fn engine(&self) -> &DiscountEngine {
        &self.engine
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Prices every line of `input`, writing one output line per non-blank
    /// input line.
    ///
    /// The engine's ledger carries over between calls, so feeding two
    /// readers in turn behaves like one concatenated file.
    pub fn process<R, W>(&mut self, mut input: R, mut output: W) -> BatchResult<RunSummary>
    where
        R: BufRead,
        W: Write,
    {
        let mut summary = RunSummary::default();
        let mut buf = Vec::new();
        let mut line_no = 0usize;

        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_no += 1;

            let raw = String::from_utf8_lossy(&buf);
            let Some(line) = TransactionLine::parse(&raw) else {
                continue;
            };

            let record = line.to_record(&self.engine);
            let quote = self.engine.apply_discount(&record);
            debug!(
                line_no,
                line = line.text,
                price = %quote.price,
                discount = %quote.discount,
                "Row processed"
            );

            self.write_row(&mut output, line.text, &quote)?;
            summary.record(&quote);
        }

        output.flush()?;
        Ok(summary)
    }

    fn write_row<W: Write>(&self, output: &mut W, line: &str, quote: &Quote) -> BatchResult<()> {
        match self.format {
            OutputFormat::Text => writeln!(output, "{}", render_text(line, quote))?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut *output, &JsonRow::new(line, quote))?;
                writeln!(output)?;
            }
        }
        Ok(())
    }

    /// Processes `input_path` into `output_path`.
    ///
    /// `output_path` of `-` writes to stdout. Missing parent directories of
    /// the output file are created. A missing input file is
    /// [`BatchError::InputNotFound`] and nothing is written.
    pub fn process_file(&mut self, input_path: &Path, output_path: &Path) -> BatchResult<RunSummary> {
        let input = File::open(input_path).map_err(|e| BatchError::input(input_path, e))?;
        let reader = BufReader::new(input);

        let summary = if output_path.as_os_str() == STDOUT_PATH {
            let stdout = io::stdout();
            self.process(reader, stdout.lock())?
        } else {
            if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| BatchError::file(parent, e))?;
            }
            let output = File::create(output_path).map_err(|e| BatchError::file(output_path, e))?;
            self.process(reader, BufWriter::new(output))?
        };

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            rows = summary.rows,
            priced = summary.priced,
            discounted = summary.discounted,
            ignored = summary.ignored,
            total_discount = %summary.total_discount,
            "Transactions processed"
        );
        Ok(summary)
    }
}
