use crate::error::{
    AddressSpaceTooLargeSnafu, ConfigurationError, NotAnIntegerSnafu, NotPositiveSnafu,
};
use crate::table::{Frame, Page};
use clap::Parser;
use snafu::{ensure, OptionExt};
use std::env;
use std::mem::size_of;

const DEFAULT_NUM_PAGES: &str = "8";
const DEFAULT_NUM_FRAMES: &str = "4";
const DEFAULT_PAGE_SIZE: &str = "1024";

/// Immutable parameters of a simulated address space. Instances only exist once every value has
/// been checked, so the rest of the crate never re-validates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressSpaceConfig {
    num_pages: usize,
    num_frames: usize,
    page_size: u64,
}

impl AddressSpaceConfig {
    /// Validate the three parameters and build a configuration from them.
    ///
    /// # Errors
    ///
    /// Any value that is not positive yields `ConfigurationError::NotPositive`. A virtual or
    /// physical address space that cannot be addressed with a signed 64-bit integer, or a page or
    /// frame table too large to ever be allocated, yields `ConfigurationError::AddressSpaceTooLarge`.
    pub fn build(
        num_pages: i64,
        num_frames: i64,
        page_size: i64,
    ) -> Result<Self, ConfigurationError> {
        let pages = positive("num_pages", num_pages)?;
        let frames = positive("num_frames", num_frames)?;
        let page_size = positive("page_size", page_size)?;

        fits_address_type(pages, page_size).context(AddressSpaceTooLargeSnafu {
            field: "num_pages",
        })?;
        fits_address_type(frames, page_size).context(AddressSpaceTooLargeSnafu {
            field: "num_frames",
        })?;
        fits_allocation::<Page>(pages).context(AddressSpaceTooLargeSnafu { field: "num_pages" })?;
        fits_allocation::<Frame>(frames).context(AddressSpaceTooLargeSnafu {
            field: "num_frames",
        })?;

        Ok(Self {
            num_pages: usize::try_from(pages)
                .ok()
                .context(AddressSpaceTooLargeSnafu { field: "num_pages" })?,
            num_frames: usize::try_from(frames)
                .ok()
                .context(AddressSpaceTooLargeSnafu { field: "num_frames" })?,
            page_size,
        })
    }

    /// The same as `build`, but starting from raw text such as command line or environment
    /// values. Surrounding whitespace is ignored.
    pub fn parse(
        num_pages: &str,
        num_frames: &str,
        page_size: &str,
    ) -> Result<Self, ConfigurationError> {
        Self::build(
            integer("num_pages", num_pages)?,
            integer("num_frames", num_frames)?,
            integer("page_size", page_size)?,
        )
    }

    pub fn num_pages(&self) -> usize {
        self.num_pages
    }

    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// One past the largest valid virtual address.
    pub fn virtual_limit(&self) -> u64 {
        self.num_pages as u64 * self.page_size
    }

    /// One past the largest physical address a translation may produce.
    pub fn physical_limit(&self) -> u64 {
        self.num_frames as u64 * self.page_size
    }
}

fn integer(field: &'static str, raw: &str) -> Result<i64, ConfigurationError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .context(NotAnIntegerSnafu { field, value: raw })
}

fn positive(field: &'static str, value: i64) -> Result<u64, ConfigurationError> {
    ensure!(value > 0, NotPositiveSnafu { field, value });
    Ok(value as u64)
}

fn fits_address_type(count: u64, page_size: u64) -> Option<u64> {
    count
        .checked_mul(page_size)
        .filter(|limit| *limit <= i64::MAX as u64)
}

// A table of `count` entries must stay under the `isize::MAX` byte limit of a single allocation.
fn fits_allocation<T>(count: u64) -> Option<u64> {
    count
        .checked_mul(size_of::<T>() as u64)
        .filter(|bytes| *bytes <= isize::MAX as u64)
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    #[arg(long, default_value_t = env_or_default_str("SIM_NUM_PAGES", DEFAULT_NUM_PAGES))]
    pub num_pages: String,

    #[arg(long, default_value_t = env_or_default_str("SIM_NUM_FRAMES", DEFAULT_NUM_FRAMES))]
    pub num_frames: String,

    #[arg(long, default_value_t = env_or_default_str("SIM_PAGE_SIZE", DEFAULT_PAGE_SIZE))]
    pub page_size: String,

    /// Replay the addresses in this file instead of prompting for them.
    #[arg(long)]
    pub file_address: Option<String>,

    /// Expected outcome for every line of the address file.
    #[arg(long, requires = "file_address")]
    pub file_expected: Option<String>,

    /// Print only the summary statistics.
    #[arg(long)]
    pub quiet: bool,
}

impl Config {
    pub fn validate(&self) -> Result<AddressSpaceConfig, ConfigurationError> {
        AddressSpaceConfig::parse(&self.num_pages, &self.num_frames, &self.page_size)
    }

    pub fn display(&self) {
        println!("simulation configuration values: ");
        println!("{:#?}", self);
    }
}

fn env_or_default_str(varname: &str, default: &str) -> String {
    match env::var(varname) {
        Ok(val) => val,
        _ => String::from(default),
    }
}
