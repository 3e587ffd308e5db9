use crate::config::AddressSpaceConfig;
use crate::table::{Frame, FrameTable, Page, PageTable};
use log::debug;

/// Outcome of resolving one page fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fault {
    pub page_number: usize,
    pub frame_index: usize,
    /// The page that previously occupied `frame_index`, if the frame was not empty.
    pub evicted_page: Option<usize>,
}

/// Owner of the page and frame tables. Faults are resolved by FIFO replacement: a single cursor
/// walks the frames round-robin, and because frames are filled in cursor order from the start,
/// the frame under the cursor always holds the page loaded longest ago.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementEngine {
    config: AddressSpaceConfig,
    pages: PageTable,
    frames: FrameTable,
    next_victim: usize,
}

impl ReplacementEngine {
    /// Create an engine with every page unmapped, every frame empty, and the cursor on frame 0.
    pub fn build(config: AddressSpaceConfig) -> Self {
        Self {
            config,
            pages: PageTable::build(config.num_pages()),
            frames: FrameTable::build(config.num_frames()),
            next_victim: 0,
        }
    }

    pub fn config(&self) -> &AddressSpaceConfig {
        &self.config
    }

    pub fn pages(&self) -> &PageTable {
        &self.pages
    }

    pub fn frames(&self) -> &FrameTable {
        &self.frames
    }

    pub fn page(&self, page_number: usize) -> Option<&Page> {
        self.pages.get(page_number)
    }

    pub fn frame(&self, frame_index: usize) -> Option<&Frame> {
        self.frames.get(frame_index)
    }

    /// Frame the next fault will be loaded into.
    pub fn next_victim(&self) -> usize {
        self.next_victim
    }

    /// Frame currently holding `page_number`, or `None` when the page is not resident or does
    /// not exist.
    pub fn resident_frame(&self, page_number: usize) -> Option<usize> {
        self.pages.get(page_number).and_then(Page::resident_frame)
    }

    /// Load `page_number` into the frame under the cursor, evicting its occupant if there is one,
    /// then advance the cursor. The cursor advances on every fault, including the first fill of
    /// an empty frame.
    ///
    /// Only the entries of `page_number`, the evicted page, and the victim frame change.
    ///
    /// # Arguments
    ///
    /// * `page_number` - the faulting page. Must be below `num_pages` and not resident.
    ///
    /// # Panics
    ///
    /// Indexing panics if `page_number` is out of range. In debug builds a resident
    /// `page_number` trips an assertion as well.
    pub fn handle_page_fault(&mut self, page_number: usize) -> Fault {
        debug_assert!(page_number < self.pages.len());
        debug_assert!(!self.pages[page_number].valid);

        let frame_index = self.next_victim;
        let evicted_page = self.frames[frame_index].associated_page_id;

        if let Some(evicted) = evicted_page {
            self.pages[evicted].unmap();
            debug!("evicted page {} from frame {}", evicted, frame_index);
        }

        self.pages[page_number].map(frame_index);
        self.frames[frame_index].associated_page_id = Some(page_number);
        self.next_victim = (frame_index + 1) % self.frames.len();

        debug!(
            "loaded page {} into frame {}, next victim is frame {}",
            page_number, frame_index, self.next_victim
        );
        debug_assert!(self.is_consistent());

        Fault {
            page_number,
            frame_index,
            evicted_page,
        }
    }

    /// Check that the page table and frame table agree in both directions: every occupied frame
    /// names a page that is valid and mapped back to it, and every valid page names a frame that
    /// holds it. Invalid pages carry no frame.
    pub fn is_consistent(&self) -> bool {
        let frames_agree = self.frames.iter().enumerate().all(|(index, frame)| {
            match frame.associated_page_id {
                Some(page_number) => self
                    .pages
                    .get(page_number)
                    .map_or(false, |page| page.resident_frame() == Some(index)),
                None => true,
            }
        });

        let pages_agree = self.pages.iter().enumerate().all(|(number, page)| {
            match (page.valid, page.frame_index) {
                (true, Some(index)) => self
                    .frames
                    .get(index)
                    .map_or(false, |frame| frame.associated_page_id == Some(number)),
                (true, None) => false,
                (false, frame_index) => frame_index.is_none(),
            }
        });

        frames_agree && pages_agree && self.next_victim < self.frames.len()
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    fn make_engine(num_pages: i64, num_frames: i64) -> ReplacementEngine {
        ReplacementEngine::build(AddressSpaceConfig::build(num_pages, num_frames, 100).unwrap())
    }

    #[cfg(test)]
    mod replacement_engine_tests {

        use super::*;

        #[test]
        fn build() {
            let engine = make_engine(4, 2);
            assert_eq!(engine.pages().len(), 4);
            assert_eq!(engine.frames().len(), 2);
            assert_eq!(engine.next_victim(), 0);
            assert!(engine.pages().iter().all(|page| !page.valid));
            assert!(engine.frames().iter().all(Frame::is_empty));
            assert!(engine.is_consistent());
        }

        #[test]
        fn fault_fills_empty_frame() {
            let mut engine = make_engine(4, 2);

            let fault = engine.handle_page_fault(2);

            assert_eq!(
                fault,
                Fault {
                    page_number: 2,
                    frame_index: 0,
                    evicted_page: None
                }
            );
            assert_eq!(engine.resident_frame(2), Some(0));
            assert_eq!(engine.frame(0).unwrap().associated_page_id, Some(2));
            assert_eq!(engine.next_victim(), 1);
        }

        #[test]
        fn fault_evicts_oldest() {
            let mut engine = make_engine(4, 2);
            engine.handle_page_fault(2);
            engine.handle_page_fault(0);

            let fault = engine.handle_page_fault(1);

            assert_eq!(fault.frame_index, 0);
            assert_eq!(fault.evicted_page, Some(2));
            assert_eq!(engine.page(2), Some(&Page { frame_index: None, valid: false }));
            assert_eq!(engine.resident_frame(0), Some(1));
            assert_eq!(engine.resident_frame(1), Some(0));
            assert_eq!(engine.next_victim(), 1);
            assert!(engine.is_consistent());
        }

        #[test]
        fn cursor_wraps_with_single_frame() {
            let mut engine = make_engine(3, 1);
            (0..3).for_each(|page| {
                let fault = engine.handle_page_fault(page);
                assert_eq!(fault.frame_index, 0);
                assert_eq!(engine.next_victim(), 0);
            });
            assert_eq!(engine.frame(0).unwrap().associated_page_id, Some(2));
            assert_eq!(engine.frames().occupied(), 1);
        }

        #[test]
        fn fault_touches_only_victim_entries() {
            let mut engine = make_engine(6, 3);
            (0..3).for_each(|page| {
                engine.handle_page_fault(page);
            });
            let before = engine.clone();

            let fault = engine.handle_page_fault(4);

            assert_eq!(fault.evicted_page, Some(0));
            (0..6).filter(|page| ![0, 4].contains(page)).for_each(|page| {
                assert_eq!(engine.page(page), before.page(page));
            });
            (1..3).for_each(|frame| {
                assert_eq!(engine.frame(frame), before.frame(frame));
            });
        }

        #[test]
        fn inconsistency_detected() {
            let mut engine = make_engine(4, 2);
            engine.handle_page_fault(1);
            engine.frames[1].associated_page_id = Some(1);
            assert!(!engine.is_consistent());
        }
    }
}
