use indicatif::ProgressBar;
use std::fmt;

/// Something observable that happened during a simulation session. The core only produces these;
/// rendering them is up to the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Initialized {
        num_pages: usize,
        num_frames: usize,
        page_size: u64,
    },
    AccessRequested {
        virtual_address: i64,
    },
    PageFault {
        page_number: usize,
    },
    PageEvicted {
        page_number: usize,
        frame_index: usize,
    },
    TranslationResult {
        physical_address: u64,
    },
    InvalidAddress {
        virtual_address: i64,
    },
    InvalidInput {
        input: String,
    },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Initialized {
                num_pages,
                num_frames,
                page_size,
            } => write!(
                f,
                "Memory manager initialized. Virtual pages: {}, physical frames: {}, page size: {} bytes",
                num_pages, num_frames, page_size
            ),
            Event::AccessRequested { virtual_address } => {
                write!(f, "Accessing virtual address: {}", virtual_address)
            }
            Event::PageFault { page_number } => write!(f, "Page fault for page {}", page_number),
            Event::PageEvicted {
                page_number,
                frame_index,
            } => write!(f, "Replacing page {} in frame {}", page_number, frame_index),
            Event::TranslationResult { physical_address } => {
                write!(f, "Translated to physical address: {}", physical_address)
            }
            Event::InvalidAddress { virtual_address } => {
                write!(f, "Invalid virtual address: {}", virtual_address)
            }
            Event::InvalidInput { input } => {
                write!(f, "Please enter a valid virtual address (received '{}')", input)
            }
        }
    }
}

/// Receiver of the ordered event stream.
pub trait EventSink {
    fn emit(&mut self, event: Event);
}

impl EventSink for Vec<Event> {
    fn emit(&mut self, event: Event) {
        self.push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: Event) {
        (**self).emit(event);
    }
}

impl<S: EventSink> EventSink for Option<S> {
    fn emit(&mut self, event: Event) {
        if let Some(sink) = self {
            sink.emit(event);
        }
    }
}

impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn emit(&mut self, event: Event) {
        self.0.emit(event.clone());
        self.1.emit(event);
    }
}

/// Writes every event as one line of text. With a progress bar attached, lines are printed above
/// the bar so it is not torn.
pub struct ConsoleSink {
    progress: Option<ProgressBar>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self { progress: None }
    }

    pub fn with_progress(progress: ProgressBar) -> Self {
        Self {
            progress: Some(progress),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for ConsoleSink {
    fn emit(&mut self, event: Event) {
        match &self.progress {
            Some(bar) => bar.println(event.to_string()),
            None => println!("{}", event),
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[cfg(test)]
    mod event_tests {

        use super::*;

        #[test]
        fn to_string() {
            assert_eq!(
                Event::PageFault { page_number: 2 }.to_string(),
                "Page fault for page 2"
            );
            assert_eq!(
                Event::PageEvicted {
                    page_number: 2,
                    frame_index: 0
                }
                .to_string(),
                "Replacing page 2 in frame 0"
            );
            assert_eq!(
                Event::TranslationResult {
                    physical_address: 50
                }
                .to_string(),
                "Translated to physical address: 50"
            );
        }
    }

    #[cfg(test)]
    mod sink_tests {

        use super::*;

        #[test]
        fn vec_collects_in_order() {
            let mut sink: Vec<Event> = Vec::new();
            sink.emit(Event::AccessRequested { virtual_address: 1 });
            sink.emit(Event::PageFault { page_number: 0 });
            assert_eq!(
                sink,
                vec![
                    Event::AccessRequested { virtual_address: 1 },
                    Event::PageFault { page_number: 0 }
                ]
            );
        }

        #[test]
        fn option_forwards_when_present() {
            let mut absent: Option<Vec<Event>> = None;
            absent.emit(Event::PageFault { page_number: 0 });
            assert!(absent.is_none());

            let mut present: Option<Vec<Event>> = Some(Vec::new());
            present.emit(Event::PageFault { page_number: 0 });
            assert_eq!(present.unwrap().len(), 1);
        }

        #[test]
        fn pair_fans_out() {
            let mut pair: (Vec<Event>, Vec<Event>) = (Vec::new(), Vec::new());
            pair.emit(Event::InvalidInput {
                input: String::from("abc"),
            });
            assert_eq!(pair.0, pair.1);
            assert_eq!(pair.0.len(), 1);
        }

        #[test]
        fn borrowed_sink_forwards() {
            let mut events: Vec<Event> = Vec::new();
            let mut pair = (&mut events, None::<Vec<Event>>);
            pair.emit(Event::PageFault { page_number: 3 });
            assert_eq!(events, vec![Event::PageFault { page_number: 3 }]);
        }
    }
}
