use crate::event::{Event, EventSink};

/// The `Tracker` struct is a simple collection of named counters fed from the event stream of a
/// session. Attach it as a sink next to whatever renders the log and print it at the end.
#[derive(Debug, PartialEq, Default)]
pub struct Tracker {
    pub attempted_memory_accesses: usize,
    pub translations: usize,
    pub page_faults: usize,
    pub page_evictions: usize,
    pub invalid_addresses: usize,
    pub invalid_inputs: usize,
    pub correct_memory_accesses: usize,
}

impl Tracker {
    /// Create a new instance of the `Tracker` struct with all counters initialized to zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Translations that found their page already resident.
    pub fn page_hits(&self) -> usize {
        self.translations.saturating_sub(self.page_faults)
    }

    pub fn page_fault_ratio(&self) -> f32 {
        match self.translations {
            0 => 0.0,
            n => self.page_faults as f32 / n as f32,
        }
    }
}

impl EventSink for Tracker {
    fn emit(&mut self, event: Event) {
        match event {
            Event::AccessRequested { .. } => self.attempted_memory_accesses += 1,
            Event::PageFault { .. } => self.page_faults += 1,
            Event::PageEvicted { .. } => self.page_evictions += 1,
            Event::TranslationResult { .. } => self.translations += 1,
            Event::InvalidAddress { .. } => self.invalid_addresses += 1,
            Event::InvalidInput { .. } => self.invalid_inputs += 1,
            Event::Initialized { .. } => {}
        }
    }
}

impl std::fmt::Display for Tracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "
Stats Tracked
---------------------------------
attempted_memory_accesses: {:08}
translations:              {:08}
page_hits:                 {:08}
page_faults:               {:08}
page_evictions:            {:08}
invalid_addresses:         {:08}
invalid_inputs:            {:08}
correct_memory_accesses:   {:08}


page fault ratio:          {:.06}
               ",
            self.attempted_memory_accesses,
            self.translations,
            self.page_hits(),
            self.page_faults,
            self.page_evictions,
            self.invalid_addresses,
            self.invalid_inputs,
            self.correct_memory_accesses,
            self.page_fault_ratio(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[cfg(test)]
    mod tracker_tests {

        use super::*;

        #[test]
        fn new() {
            let tracker = Tracker::new();
            assert_eq!(tracker.attempted_memory_accesses, 0);
            assert_eq!(tracker.page_faults, 0);
            assert_eq!(tracker.page_hits(), 0);
            assert_eq!(tracker.correct_memory_accesses, 0);
            assert_eq!(tracker.page_fault_ratio(), 0.0);
        }

        #[test]
        fn equals() {
            assert_eq!(Tracker::new(), Tracker::new());
        }

        #[test]
        fn counts_events() {
            let mut tracker = Tracker::new();
            tracker.emit(Event::AccessRequested { virtual_address: 5 });
            tracker.emit(Event::PageFault { page_number: 0 });
            tracker.emit(Event::TranslationResult {
                physical_address: 5,
            });
            tracker.emit(Event::AccessRequested { virtual_address: 6 });
            tracker.emit(Event::TranslationResult {
                physical_address: 6,
            });
            tracker.emit(Event::InvalidInput {
                input: String::from("x"),
            });

            assert_eq!(tracker.attempted_memory_accesses, 2);
            assert_eq!(tracker.translations, 2);
            assert_eq!(tracker.page_faults, 1);
            assert_eq!(tracker.page_hits(), 1);
            assert_eq!(tracker.invalid_inputs, 1);
            assert_eq!(tracker.page_fault_ratio(), 0.5);
        }

        #[test]
        fn to_string() {
            let tracker = Tracker::new();
            let str = tracker.to_string();
            assert!(str.contains("page_faults:"))
        }
    }
}
