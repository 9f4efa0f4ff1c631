//! Shadow copies of the controller's display RAM and the diff between them
//!
//! [`DisplayMemory`] keeps two equally sized images of the SED1560 RAM, laid
//! out page by page: the image the driver wants on the panel and the image
//! it believes is already there. [`DiffScan`] walks one page and yields the
//! [`Run`]s of columns that have to be resent.
use core::ops::Range;

use crate::{BUFFER_LEN, PAGES, SCOLS, SROWS};

/// Clean columns a run may swallow before it is closed.
///
/// Addressing a new run costs two command bytes, so two unchanged columns
/// are cheaper to resend than to skip.
pub const GAP_TOLERANCE: usize = 2;

/// Contiguous columns of one page selected for a single transmission
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Run {
    /// Page of the run
    pub page: usize,
    /// First column
    pub start: usize,
    /// One past the last column
    pub end: usize,
}

impl Run {
    /// Number of data bytes in the run
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Columns covered by the run
    pub fn columns(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Desired and last transmitted images of controller RAM
pub struct DisplayMemory {
    desired: [u8; BUFFER_LEN],
    sent: [u8; BUFFER_LEN],
}

impl Default for DisplayMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayMemory {
    /// Both images zeroed
    pub const fn new() -> Self {
        DisplayMemory {
            desired: [0; BUFFER_LEN],
            sent: [0; BUFFER_LEN],
        }
    }

    const fn index(page: usize, column: usize) -> usize {
        page * SCOLS + column
    }

    /// Set or clear one pixel of the desired image.
    ///
    /// Returns false, leaving the image untouched, if the pixel lies outside
    /// the controller's rows or columns.
    pub fn set_pixel(&mut self, row: usize, column: usize, on: bool) -> bool {
        if row >= SROWS || column >= SCOLS {
            return false;
        }
        let a = Self::index(row / 8, column);
        let mask = 1 << (row % 8);
        if on {
            self.desired[a] |= mask;
        } else {
            self.desired[a] &= !mask;
        }
        true
    }

    /// Byte the driver wants at `page`/`column`
    pub fn desired(&self, page: usize, column: usize) -> u8 {
        self.desired[Self::index(page, column)]
    }

    /// Byte last sent to `page`/`column`
    pub fn sent(&self, page: usize, column: usize) -> u8 {
        self.sent[Self::index(page, column)]
    }

    /// True if `page`/`column` differs from what the panel shows
    pub fn is_dirty(&self, page: usize, column: usize) -> bool {
        let a = Self::index(page, column);
        self.desired[a] != self.sent[a]
    }

    /// Record that the desired byte at `page`/`column` has been sent
    pub fn mark_sent(&mut self, page: usize, column: usize) {
        let a = Self::index(page, column);
        self.sent[a] = self.desired[a];
    }

    /// Zero both images, including the symbol page
    pub fn clear(&mut self) {
        self.desired.fill(0);
        self.sent.fill(0);
    }

    /// True if both images agree everywhere
    pub fn is_synced(&self) -> bool {
        self.desired == self.sent
    }

    /// Start scanning `columns` of `page` for runs.
    ///
    /// Columns past [`SCOLS`] are dropped from the scan.
    pub fn scan(&self, page: usize, columns: Range<usize>) -> DiffScan {
        debug_assert!(page <= PAGES);
        DiffScan {
            page,
            column: columns.start,
            end: columns.end.min(SCOLS),
        }
    }
}

/// Run scanner over one page.
///
/// The scanner holds no borrow of the memory, so the caller can mark each
/// run's bytes as sent before asking for the next one.
#[derive(Clone, Debug)]
pub struct DiffScan {
    page: usize,
    column: usize,
    end: usize,
}

impl DiffScan {
    /// Next run of dirty columns, or None when the page is done
    pub fn next_run(&mut self, memory: &DisplayMemory) -> Option<Run> {
        while self.column < self.end {
            if !memory.is_dirty(self.page, self.column) {
                self.column += 1;
                continue;
            }
            let start = self.column;
            let mut last = start;
            let mut gap = 0;
            self.column += 1;
            while self.column < self.end {
                if memory.is_dirty(self.page, self.column) {
                    last = self.column;
                    gap = 0;
                } else {
                    gap += 1;
                    if gap > GAP_TOLERANCE {
                        break;
                    }
                }
                self.column += 1;
            }
            return Some(Run {
                page: self.page,
                start,
                end: last + 1,
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::vec::Vec;

    fn dirty_columns(columns: &[usize]) -> DisplayMemory {
        let mut memory = DisplayMemory::new();
        for &c in columns {
            memory.set_pixel(0, c, true);
        }
        memory
    }

    fn runs(memory: &DisplayMemory, page: usize, columns: Range<usize>) -> Vec<Run> {
        let mut scan = memory.scan(page, columns);
        let mut runs = Vec::new();
        while let Some(run) = scan.next_run(memory) {
            runs.push(run);
        }
        runs
    }

    #[test]
    fn pixels_map_to_page_and_bit() {
        let mut memory = DisplayMemory::new();
        assert!(memory.set_pixel(0, 0, true));
        assert!(memory.set_pixel(7, 0, true));
        assert!(memory.set_pixel(13, 4, true));
        assert_eq!(memory.desired(0, 0), 0x81);
        assert_eq!(memory.desired(1, 4), 1 << 5);

        assert!(memory.set_pixel(7, 0, false));
        assert_eq!(memory.desired(0, 0), 0x01);
    }

    #[test]
    fn out_of_bounds_pixels_are_ignored() {
        let mut memory = DisplayMemory::new();
        assert!(!memory.set_pixel(SROWS, 0, true));
        assert!(!memory.set_pixel(0, SCOLS, true));
        assert!(memory.is_synced());
    }

    #[test]
    fn one_clean_column_is_merged() {
        let memory = dirty_columns(&[5, 6, 7, 9]);
        assert_eq!(
            runs(&memory, 0, 0..SCOLS),
            [Run {
                page: 0,
                start: 5,
                end: 10
            }]
        );
    }

    #[test]
    fn two_clean_columns_are_merged() {
        let memory = dirty_columns(&[5, 8]);
        let found = runs(&memory, 0, 0..SCOLS);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].columns(), 5..9);
    }

    #[test]
    fn three_clean_columns_split_the_run() {
        let memory = dirty_columns(&[5, 6, 10]);
        assert_eq!(
            runs(&memory, 0, 0..SCOLS),
            [
                Run {
                    page: 0,
                    start: 5,
                    end: 7
                },
                Run {
                    page: 0,
                    start: 10,
                    end: 11
                },
            ]
        );
    }

    #[test]
    fn trailing_clean_columns_are_not_sent() {
        let memory = dirty_columns(&[3]);
        assert_eq!(runs(&memory, 0, 0..5)[0].columns(), 3..4);
        assert_eq!(runs(&memory, 0, 0..4)[0].columns(), 3..4);
    }

    #[test]
    fn scan_is_limited_to_requested_columns() {
        let memory = dirty_columns(&[2, 20]);
        assert!(runs(&memory, 0, 3..20).is_empty());
        assert_eq!(runs(&memory, 0, 10..SCOLS * 2)[0].columns(), 20..21);
    }

    #[test]
    fn last_column_of_a_page_can_be_dirty() {
        let memory = dirty_columns(&[SCOLS - 1]);
        assert_eq!(runs(&memory, 0, 0..SCOLS)[0].columns(), SCOLS - 1..SCOLS);
        // stays on page 0 even if asked for more
        assert!(runs(&memory, 1, 0..SCOLS).is_empty());
    }

    #[test]
    fn clear_zeroes_both_images() {
        let mut memory = dirty_columns(&[1, 2, 3]);
        memory.mark_sent(0, 1);
        memory.clear();
        assert!(memory.is_synced());
        assert_eq!(memory.desired(0, 1), 0);
        assert_eq!(memory.sent(0, 1), 0);
    }

    proptest! {
        #[test]
        fn runs_cover_exactly_the_dirty_columns(
            dirty in proptest::collection::vec(any::<bool>(), SCOLS),
            start in 0..SCOLS,
            width in 0..SCOLS,
        ) {
            let columns: Vec<usize> = dirty
                .iter()
                .enumerate()
                .filter_map(|(c, &d)| d.then_some(c))
                .collect();
            let mut memory = dirty_columns(&columns);
            let end = (start + width).min(SCOLS);

            let mut scan = memory.scan(0, start..end);
            let mut previous: Option<Run> = None;
            while let Some(run) = scan.next_run(&memory) {
                prop_assert!(run.start >= start && run.end <= end);
                prop_assert!(memory.is_dirty(0, run.start));
                prop_assert!(memory.is_dirty(0, run.end - 1));
                let mut gap = 0;
                for c in run.columns() {
                    if memory.is_dirty(0, c) { gap = 0 } else { gap += 1 }
                    prop_assert!(gap <= GAP_TOLERANCE);
                }
                if let Some(p) = previous {
                    prop_assert!(run.start - p.end > GAP_TOLERANCE);
                }
                for c in run.columns() {
                    memory.mark_sent(0, c);
                }
                previous = Some(run);
            }
            for c in start..end {
                prop_assert!(!memory.is_dirty(0, c));
            }
        }
    }
}
