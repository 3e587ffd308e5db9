use snafu::Snafu;

/// Raised when the address space parameters are missing, unparseable, or not positive. No engine
/// state exists until a valid configuration is supplied.
#[derive(Debug, Snafu, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum ConfigurationError {
    #[snafu(display("'{}' must be an integer value (received '{}')", field, value))]
    NotAnInteger { field: &'static str, value: String },
    #[snafu(display("'{}' must be a positive integer value (received {})", field, value))]
    NotPositive { field: &'static str, value: i64 },
    #[snafu(display("'{}' describes an address space larger than this platform can address", field))]
    AddressSpaceTooLarge { field: &'static str },
}

/// Raised per translation request. The engine state is left untouched and the caller may retry
/// with another address right away.
#[derive(Debug, Snafu, Clone, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum InvalidAddress {
    #[snafu(display("invalid virtual address: {}", virtual_address))]
    OutOfRange { virtual_address: i64 },
    #[snafu(display("'{}' is not a valid virtual address", input))]
    NotANumber { input: String },
}

/// Failures of a whole simulation session as driven by the binary.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(context(false), display("configuration error: {}", source))]
    Configuration { source: ConfigurationError },
    #[snafu(display("could not read '{}': {}", path, source))]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[snafu(display(
        "the address file has {} entries but the expectation file has {}",
        addresses,
        expectations
    ))]
    ExpectationCount {
        addresses: usize,
        expectations: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
