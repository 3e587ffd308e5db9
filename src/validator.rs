use std::{
    fmt,
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

/// Expected outcome of one access in a trace: either the physical address it must translate to,
/// or a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Physical(u64),
    Invalid,
}

impl Expected {
    fn parse(line: &str) -> Option<Self> {
        match line {
            "invalid" | "-" => Some(Expected::Invalid),
            value => value.parse::<u64>().ok().map(Expected::Physical),
        }
    }

    /// Whether an access outcome agrees with this expectation.
    pub fn matches<E>(&self, result: &Result<u64, E>) -> bool {
        match (self, result) {
            (Expected::Physical(expected), Ok(actual)) => expected == actual,
            (Expected::Invalid, Err(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Physical(address) => write!(f, "{}", address),
            Expected::Invalid => write!(f, "invalid"),
        }
    }
}

// Similar to `address::AddressReader`, `ValidationReader` reads one entry per line. Where the
// former supplies the raw addresses, the latter states what the translation of each one must be.
pub struct ValidationReader<R> {
    reader: R,
    pub line_number: u64,
}

impl<R: BufRead> ValidationReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
        }
    }
}

impl ValidationReader<BufReader<File>> {
    /// Open the expectation file at `path`.
    ///
    /// # Errors
    ///
    /// Fails if the file does not exist or cannot be opened.
    pub fn from_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> Iterator for ValidationReader<R> {
    type Item = io::Result<Expected>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut buffer = String::new();
            match self.reader.read_line(&mut buffer) {
                Err(err) => return Some(Err(err)),
                Ok(0) => return None,
                Ok(_) => {
                    self.line_number += 1;
                    let line = buffer.trim();
                    if line.is_empty() {
                        continue;
                    }
                    return Some(Expected::parse(line).ok_or_else(|| {
                        io::Error::new(
                            io::ErrorKind::InvalidData,
                            format!(
                                "line {}: expected a physical address or 'invalid', found '{}'",
                                self.line_number, line
                            ),
                        )
                    }));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use std::io::Cursor;

    #[cfg(test)]
    mod expected_tests {
        use super::*;

        #[test]
        fn matches() {
            let ok: Result<u64, ()> = Ok(50);
            let err: Result<u64, ()> = Err(());
            assert!(Expected::Physical(50).matches(&ok));
            assert!(!Expected::Physical(51).matches(&ok));
            assert!(!Expected::Physical(50).matches(&err));
            assert!(Expected::Invalid.matches(&err));
            assert!(!Expected::Invalid.matches(&ok));
        }
    }

    #[cfg(test)]
    mod validation_reader_tests {
        use super::*;

        #[test]
        fn iterator() {
            let mut reader = ValidationReader::new(Cursor::new("50\n\ninvalid\n-\n"));
            assert_eq!(reader.next().unwrap().unwrap(), Expected::Physical(50));
            assert_eq!(reader.next().unwrap().unwrap(), Expected::Invalid);
            assert_eq!(reader.next().unwrap().unwrap(), Expected::Invalid);
            assert!(reader.next().is_none());
            assert_eq!(reader.line_number, 4);
        }

        #[test]
        fn malformed_line() {
            let mut reader = ValidationReader::new(Cursor::new("fifty\n"));
            let err = reader.next().unwrap().unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        }
    }
}
