use std::ops::{Index, IndexMut};

/// Mapping state of a single virtual page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub frame_index: Option<usize>,
    pub valid: bool,
}

impl Page {
    fn new() -> Self {
        Self {
            frame_index: None,
            valid: false,
        }
    }

    /// The frame holding this page, if the page is resident.
    pub fn resident_frame(&self) -> Option<usize> {
        match self.valid {
            true => self.frame_index,
            false => None,
        }
    }

    pub(crate) fn map(&mut self, frame_index: usize) {
        self.frame_index = Some(frame_index);
        self.valid = true;
    }

    pub(crate) fn unmap(&mut self) {
        self.frame_index = None;
        self.valid = false;
    }
}

/// One entry per virtual page, indexed by page number. The length is fixed when built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTable {
    entries: Vec<Page>,
}

impl PageTable {
    pub fn build(table_size: usize) -> Self {
        Self {
            entries: vec![Page::new(); table_size],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, page_number: usize) -> Option<&Page> {
        self.entries.get(page_number)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.entries.iter()
    }
}

impl Index<usize> for PageTable {
    type Output = Page;

    fn index(&self, index: usize) -> &Self::Output {
        &self.entries[index]
    }
}

impl IndexMut<usize> for PageTable {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.entries[index]
    }
}

/// Occupant record of a single physical frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub associated_page_id: Option<usize>,
}

impl Frame {
    fn new() -> Self {
        Self {
            associated_page_id: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.associated_page_id.is_none()
    }
}

/// One slot per physical frame, indexed by frame number. Frames hold no data; only which page
/// occupies them is tracked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameTable {
    entries: Vec<Frame>,
}

impl FrameTable {
    pub fn build(table_size: usize) -> Self {
        Self {
            entries: vec![Frame::new(); table_size],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, frame_index: usize) -> Option<&Frame> {
        self.entries.get(frame_index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Frame> {
        self.entries.iter()
    }

    /// Number of frames currently holding a page.
    pub fn occupied(&self) -> usize {
        self.entries.iter().filter(|frame| !frame.is_empty()).count()
    }
}

impl Index<usize> for FrameTable {
    type Output = Frame;

    fn index(&self, index: usize) -> &Self::Output {
        &self.entries[index]
    }
}

impl IndexMut<usize> for FrameTable {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.entries[index]
    }
}
