use crate::config::AddressSpaceConfig;
use crate::error::{InvalidAddress, NotANumberSnafu};
use snafu::OptionExt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// `VirtualAddress` holds the components of an in-range virtual address: the page it falls in
/// and the byte offset inside that page.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct VirtualAddress {
    pub number_page: usize,
    pub number_offset: u64,
}

impl VirtualAddress {
    /// Split a raw address into page number and offset for the given address space.
    ///
    /// Returns `None` when the address is negative or lies past the last page.
    ///
    /// # Examples
    ///
    /// ```
    /// use fifo_memory_sim::address::VirtualAddress;
    /// use fifo_memory_sim::config::AddressSpaceConfig;
    /// let config = AddressSpaceConfig::build(4, 2, 100).unwrap();
    /// let address = VirtualAddress::split(250, &config).unwrap();
    /// assert_eq!(address.number_page, 2);
    /// assert_eq!(address.number_offset, 50);
    /// assert!(VirtualAddress::split(400, &config).is_none());
    /// ```
    pub fn split(value: i64, config: &AddressSpaceConfig) -> Option<Self> {
        let value = u64::try_from(value).ok()?;
        let number_page = value / config.page_size();
        if number_page >= config.num_pages() as u64 {
            return None;
        }
        Some(Self {
            number_page: number_page as usize,
            number_offset: value % config.page_size(),
        })
    }
}

/// Parse one line of user input as a virtual address. Anything that is not an integer is rejected
/// here and never reaches translation.
pub fn parse_virtual_address(input: &str) -> Result<i64, InvalidAddress> {
    let trimmed = input.trim();
    trimmed
        .parse::<i64>()
        .ok()
        .context(NotANumberSnafu { input: trimmed })
}

/// `AddressReader` sequentially obtains raw address lines from any buffered source, such as a
/// trace file or stdin. Lines are trimmed and blank lines are skipped; parsing is left to the
/// caller so malformed entries can be reported individually.
pub struct AddressReader<R> {
    reader: R,
    pub line_number: u64,
}

impl<R: BufRead> AddressReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
        }
    }
}

impl AddressReader<BufReader<File>> {
    /// Open the trace file at `path`.
    ///
    /// # Errors
    ///
    /// Fails if the file does not exist or cannot be opened.
    pub fn from_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> AddressReader<R> {
    /// Read the next line, trimmed, without skipping blank ones. An interactive caller uses this
    /// to prompt again after an empty entry.
    ///
    /// Returns `None` once the source is exhausted.
    pub fn next_line(&mut self) -> Option<io::Result<String>> {
        let mut buffer = String::new();
        match self.reader.read_line(&mut buffer) {
            Err(err) => Some(Err(err)),
            Ok(0) => None,
            Ok(_) => {
                self.line_number += 1;
                Some(Ok(buffer.trim().to_string()))
            }
        }
    }
}

impl<R: BufRead> Iterator for AddressReader<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.next_line()? {
                Ok(line) if line.is_empty() => continue,
                other => return Some(other),
            }
        }
    }
}
