pub mod address;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod table;
pub mod tracker;
pub mod translator;
pub mod validator;
pub mod virtual_memory;

use address::AddressReader;
use config::{AddressSpaceConfig, Config};
use error::{ExpectationCountSnafu, IoSnafu, Result};
use event::{ConsoleSink, EventSink};
use indicatif::{ProgressBar, ProgressStyle};
use snafu::{ensure, ResultExt};
use std::io::{self, Write};
use tracker::Tracker;
use validator::{Expected, ValidationReader};
use virtual_memory::VirtualMemory;

pub use error::{ConfigurationError, Error, InvalidAddress};
pub use event::Event;

const PROMPT: &str = "enter a virtual address (q to quit): ";
const PROGRESS_TEMPLATE: &str = "[{elapsed_precise}] {bar:40} {pos}/{len} accesses";

/// A trace entry whose outcome disagrees with the expectation file.
#[derive(Debug, PartialEq)]
pub struct Mismatch {
    /// 1-based position of the entry in the trace.
    pub entry: usize,
    pub expected: Expected,
    pub received: std::result::Result<u64, InvalidAddress>,
}

/// Everything a trace replay produced: the counters, the outcome of each entry in trace order,
/// and the entries that failed verification.
#[derive(Debug)]
pub struct Replay {
    pub tracker: Tracker,
    pub outcomes: Vec<std::result::Result<u64, InvalidAddress>>,
    pub mismatches: Vec<Mismatch>,
}

/// Validate the configuration and run one session. With an address file configured the file is
/// replayed (and verified when an expectation file is given as well); otherwise addresses are
/// read from stdin one at a time. The summary statistics are printed at the end.
///
/// # Arguments
///
/// * `config` - the parsed command line. The three address space values are still raw text
/// at this point and are validated here.
///
/// # Errors
///
/// Fails on an invalid address space configuration, when an input file cannot be read, or when
/// the expectation file does not hold exactly one entry per trace entry. Individual bad
/// addresses are reported in the event log and do not end the run.
pub fn run_simulation(config: Config) -> Result<()> {
    let address_space = config.validate()?;

    let tracker = match &config.file_address {
        Some(path) => replay_trace(&config, address_space, path)?,
        None => run_interactive(&config, address_space)?,
    };

    println!("{}", tracker);
    Ok(())
}

fn replay_trace(config: &Config, address_space: AddressSpaceConfig, path: &str) -> Result<Tracker> {
    let addresses = AddressReader::from_path(path)
        .and_then(|reader| reader.collect::<io::Result<Vec<String>>>())
        .context(IoSnafu { path })?;

    let expectations = match &config.file_expected {
        Some(expected) => Some(
            ValidationReader::from_path(expected)
                .and_then(|reader| reader.collect::<io::Result<Vec<Expected>>>())
                .context(IoSnafu { path: expected })?,
        ),
        None => None,
    };

    let progress = ProgressBar::new(addresses.len() as u64);
    if let Ok(style) = ProgressStyle::with_template(PROGRESS_TEMPLATE) {
        progress.set_style(style);
    }
    let mut console = match config.quiet {
        true => None,
        false => Some(ConsoleSink::with_progress(progress.clone())),
    };

    let outcome = replay(
        address_space,
        &addresses,
        expectations.as_deref(),
        &mut console,
        &progress,
    )?;
    for mismatch in &outcome.mismatches {
        progress.println(format!("expected: {} (entry {})", mismatch.expected, mismatch.entry));
        progress.println(format!("received: {:?}", mismatch.received));
    }
    progress.finish_and_clear();

    Ok(outcome.tracker)
}

/// Feed every trace entry through a fresh session, forwarding all events to `console` while
/// counting them, and compare each outcome with its expectation when there is one.
///
/// # Arguments
///
/// * `address_space` - validated parameters for the session.
/// * `addresses` - raw trace entries; entries that are not integers are reported and counted
/// as invalid input.
/// * `expectations` - optional expected outcome for each entry, in the same order.
/// * `console` - receives every event after the internal tracker has counted it.
/// * `progress` - advanced by one per entry.
///
/// # Errors
///
/// Returns `Error::ExpectationCount` before anything is replayed if `expectations` is present
/// and its length differs from the number of trace entries.
pub fn replay(
    address_space: AddressSpaceConfig,
    addresses: &[String],
    expectations: Option<&[Expected]>,
    console: &mut dyn EventSink,
    progress: &ProgressBar,
) -> Result<Replay> {
    if let Some(expected) = expectations {
        ensure!(
            expected.len() == addresses.len(),
            ExpectationCountSnafu {
                addresses: addresses.len(),
                expectations: expected.len(),
            }
        );
    }

    let mut tracker = Tracker::new();
    let mut outcomes = Vec::with_capacity(addresses.len());
    let mut mismatches = Vec::new();
    let mut correct = 0;

    let mut sink = (&mut tracker, console);
    let mut memory = VirtualMemory::build(address_space, &mut sink);
    for (index, input) in addresses.iter().enumerate() {
        let received = memory.access_input(input, &mut sink);
        if let Some(expected) = expectations.map(|expected| expected[index]) {
            match expected.matches(&received) {
                true => correct += 1,
                false => mismatches.push(Mismatch {
                    entry: index + 1,
                    expected,
                    received: received.clone(),
                }),
            }
        }
        outcomes.push(received);
        progress.inc(1);
    }
    tracker.correct_memory_accesses = correct;

    Ok(Replay {
        tracker,
        outcomes,
        mismatches,
    })
}

fn run_interactive(config: &Config, address_space: AddressSpaceConfig) -> Result<Tracker> {
    let mut tracker = Tracker::new();
    let console = match config.quiet {
        true => None,
        false => Some(ConsoleSink::new()),
    };
    let mut sink = (&mut tracker, console);
    let mut memory = VirtualMemory::build(address_space, &mut sink);

    let stdin = io::stdin();
    let mut reader = AddressReader::new(stdin.lock());
    loop {
        print!("{}", PROMPT);
        io::stdout().flush().context(IoSnafu { path: "<stdout>" })?;

        let input = match reader.next_line() {
            Some(line) => line.context(IoSnafu { path: "<stdin>" })?,
            None => break,
        };
        if input.is_empty() {
            continue;
        }
        if is_quit(&input) {
            break;
        }
        // Rejections are already part of the event log.
        let _ = memory.access_input(&input, &mut sink);
    }
    println!();

    Ok(tracker)
}

fn is_quit(input: &str) -> bool {
    matches!(input, "q" | "Q" | "quit" | "exit")
}
