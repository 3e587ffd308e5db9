use crate::address::VirtualAddress;
use crate::engine::ReplacementEngine;
use crate::error::{InvalidAddress, OutOfRangeSnafu};
use crate::event::{Event, EventSink};
use log::trace;

/// Translate `virtual_address` into a physical address, resolving a page fault first when the
/// page is not resident.
///
/// An address that is negative or past the last page is reported to `sink` as
/// `Event::InvalidAddress` and returned as an error; the engine is not touched in that case.
/// Otherwise the result lies in `[0, num_frames * page_size)` and keeps the offset of the
/// virtual address.
///
/// # Arguments
///
/// * `engine` - the replacement engine owning the page and frame tables. It is only mutated
/// when the address is in range and its page is not resident.
/// * `virtual_address` - raw address as supplied by the caller; may be negative.
/// * `sink` - receives `PageFault`, then `PageEvicted` when a frame was occupied, or
/// `InvalidAddress` for a rejected address.
///
/// # Errors
///
/// `InvalidAddress::OutOfRange` for a negative address or one at or past
/// `num_pages * page_size`. Retrying with another address is always possible.
pub fn translate(
    engine: &mut ReplacementEngine,
    virtual_address: i64,
    sink: &mut dyn EventSink,
) -> Result<u64, InvalidAddress> {
    let address = match VirtualAddress::split(virtual_address, engine.config()) {
        Some(address) => address,
        None => {
            sink.emit(Event::InvalidAddress { virtual_address });
            return OutOfRangeSnafu { virtual_address }.fail();
        }
    };

    let frame_index = match engine.resident_frame(address.number_page) {
        Some(frame_index) => {
            trace!("page {} resident in frame {}", address.number_page, frame_index);
            frame_index
        }
        None => {
            sink.emit(Event::PageFault {
                page_number: address.number_page,
            });
            let fault = engine.handle_page_fault(address.number_page);
            if let Some(page_number) = fault.evicted_page {
                sink.emit(Event::PageEvicted {
                    page_number,
                    frame_index: fault.frame_index,
                });
            }
            fault.frame_index
        }
    };

    Ok(frame_index as u64 * engine.config().page_size() + address.number_offset)
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::config::AddressSpaceConfig;

    fn standard_engine() -> ReplacementEngine {
        ReplacementEngine::build(AddressSpaceConfig::build(4, 2, 100).unwrap())
    }

    #[test]
    fn fault_then_hit() {
        let mut engine = standard_engine();
        let mut events: Vec<Event> = Vec::new();

        assert_eq!(translate(&mut engine, 250, &mut events), Ok(50));
        assert_eq!(translate(&mut engine, 299, &mut events), Ok(99));

        assert_eq!(events, vec![Event::PageFault { page_number: 2 }]);
    }

    #[test]
    fn eviction_reported_after_fault() {
        let mut engine = standard_engine();
        let mut events: Vec<Event> = Vec::new();
        translate(&mut engine, 0, &mut events).unwrap();
        translate(&mut engine, 100, &mut events).unwrap();
        events.clear();

        assert_eq!(translate(&mut engine, 210, &mut events), Ok(10));

        assert_eq!(
            events,
            vec![
                Event::PageFault { page_number: 2 },
                Event::PageEvicted {
                    page_number: 0,
                    frame_index: 0
                }
            ]
        );
    }

    #[test]
    fn out_of_range() {
        let mut engine = standard_engine();
        translate(&mut engine, 120, &mut Vec::<Event>::new()).unwrap();
        let before = engine.clone();
        let mut events: Vec<Event> = Vec::new();

        assert_eq!(
            translate(&mut engine, 400, &mut events),
            Err(InvalidAddress::OutOfRange {
                virtual_address: 400
            })
        );
        assert_eq!(
            translate(&mut engine, -5, &mut events),
            Err(InvalidAddress::OutOfRange {
                virtual_address: -5
            })
        );

        assert_eq!(engine, before);
        assert_eq!(
            events,
            vec![
                Event::InvalidAddress {
                    virtual_address: 400
                },
                Event::InvalidAddress {
                    virtual_address: -5
                }
            ]
        );
    }
}
