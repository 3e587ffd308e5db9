use crate::address::parse_virtual_address;
use crate::config::AddressSpaceConfig;
use crate::engine::ReplacementEngine;
use crate::error::{ConfigurationError, InvalidAddress};
use crate::event::{Event, EventSink};
use crate::translator;

/// The `VirtualMemory` struct is one simulation session: a validated address space and the
/// replacement engine built for it. Re-initializing means building a new instance; the previous
/// tables go away with the old one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualMemory {
    engine: ReplacementEngine,
}

impl VirtualMemory {
    /// Validate the parameters and create a session with every page unmapped and every frame
    /// empty. Emits `Event::Initialized` on success.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if any parameter is not a positive integer or the address
    /// space is too large. Nothing is built and nothing is emitted in that case.
    pub fn initialize(
        num_pages: i64,
        num_frames: i64,
        page_size: i64,
        sink: &mut dyn EventSink,
    ) -> Result<Self, ConfigurationError> {
        let config = AddressSpaceConfig::build(num_pages, num_frames, page_size)?;
        Ok(Self::build(config, sink))
    }

    /// Create a session from an already validated configuration. Emits `Event::Initialized`.
    pub fn build(config: AddressSpaceConfig, sink: &mut dyn EventSink) -> Self {
        sink.emit(Event::Initialized {
            num_pages: config.num_pages(),
            num_frames: config.num_frames(),
            page_size: config.page_size(),
        });
        Self {
            engine: ReplacementEngine::build(config),
        }
    }

    pub fn config(&self) -> &AddressSpaceConfig {
        self.engine.config()
    }

    pub fn engine(&self) -> &ReplacementEngine {
        &self.engine
    }

    /// Translate a virtual address, faulting the page in when needed. See
    /// `translator::translate`.
    pub fn translate(
        &mut self,
        virtual_address: i64,
        sink: &mut dyn EventSink,
    ) -> Result<u64, InvalidAddress> {
        translator::translate(&mut self.engine, virtual_address, sink)
    }

    /// A full memory access as seen in the event log: the request, any fault and eviction, and
    /// the resulting physical address.
    ///
    /// # Arguments
    ///
    /// * `virtual_address` - the address to access. Negative or out of range values are
    /// reported, not rejected up front.
    /// * `sink` - receives `AccessRequested` first and `TranslationResult` last when the
    /// translation succeeds.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAddress::OutOfRange` as `translate` does. No `TranslationResult` is
    /// emitted then.
    pub fn access(
        &mut self,
        virtual_address: i64,
        sink: &mut dyn EventSink,
    ) -> Result<u64, InvalidAddress> {
        sink.emit(Event::AccessRequested { virtual_address });
        let physical_address = self.translate(virtual_address, sink)?;
        sink.emit(Event::TranslationResult { physical_address });
        Ok(physical_address)
    }

    /// Access an address given as raw text. Text that is not an integer is reported as
    /// `Event::InvalidInput` and never reaches the engine.
    pub fn access_input(
        &mut self,
        input: &str,
        sink: &mut dyn EventSink,
    ) -> Result<u64, InvalidAddress> {
        match parse_virtual_address(input) {
            Ok(virtual_address) => self.access(virtual_address, sink),
            Err(err) => {
                sink.emit(Event::InvalidInput {
                    input: input.trim().to_string(),
                });
                Err(err)
            }
        }
    }
}
