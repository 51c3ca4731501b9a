use alloc::vec::Vec;

use crate::HeightMode;
use crate::fenwick::Fenwick;

/// Maps scroll offsets to row indexes and reports the total content extent.
///
/// In [`HeightMode::Fixed`] every row is `row_height` tall. In [`HeightMode::Variable`] each row
/// carries its own measured height; unmeasured rows count as `0` until measured, so the total
/// extent may undercount until the window has been populated.
#[derive(Clone, Debug)]
pub struct HeightModel {
    row_height: u32,
    heights: Heights,
}

#[derive(Clone, Debug)]
enum Heights {
    Fixed {
        count: usize,
    },
    Variable {
        sizes: Vec<u32>,
        measured: Vec<bool>,
        sums: Fenwick,
        measured_count: usize,
        measured_total: u64,
    },
}

impl HeightModel {
    pub fn new(mode: HeightMode, row_height: u32, count: usize) -> Self {
        let heights = match mode {
            HeightMode::Fixed => Heights::Fixed { count },
            HeightMode::Variable => {
                let sizes = alloc::vec![0u32; count];
                Heights::Variable {
                    sums: Fenwick::from_sizes(&sizes),
                    measured: alloc::vec![false; count],
                    sizes,
                    measured_count: 0,
                    measured_total: 0,
                }
            }
        };
        Self {
            row_height,
            heights,
        }
    }

    pub fn mode(&self) -> HeightMode {
        match self.heights {
            Heights::Fixed { .. } => HeightMode::Fixed,
            Heights::Variable { .. } => HeightMode::Variable,
        }
    }

    pub fn row_height(&self) -> u32 {
        self.row_height
    }

    pub fn len(&self) -> usize {
        match &self.heights {
            Heights::Fixed { count } => *count,
            Heights::Variable { sizes, .. } => sizes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn total_extent(&self) -> u64 {
        match &self.heights {
            Heights::Fixed { count } => (*count as u64).saturating_mul(self.row_height as u64),
            Heights::Variable { sums, .. } => sums.total(),
        }
    }

    /// Returns the index of the first row that starts at or after `scroll_offset`.
    ///
    /// Fixed mode floors `scroll_offset / row_height`; Variable mode returns the smallest `i`
    /// with `start(i) >= scroll_offset`, or the row count when every row starts earlier. A row
    /// starting exactly at the offset is selected.
    pub fn start_index_for_offset(&self, scroll_offset: u64) -> usize {
        match &self.heights {
            Heights::Fixed { .. } => {
                if self.row_height == 0 {
                    return 0;
                }
                let index = scroll_offset / self.row_height as u64;
                usize::try_from(index).unwrap_or(usize::MAX)
            }
            Heights::Variable { sums, .. } => sums.first_start_at_or_after(scroll_offset),
        }
    }

    /// Start offset of the row at `index` (clamped to the end of the content).
    pub fn row_start(&self, index: usize) -> u64 {
        let index = index.min(self.len());
        match &self.heights {
            Heights::Fixed { .. } => (index as u64).saturating_mul(self.row_height as u64),
            Heights::Variable { sums, .. } => sums.prefix_sum(index),
        }
    }

    pub fn row_size(&self, index: usize) -> Option<u32> {
        match &self.heights {
            Heights::Fixed { count } => (index < *count).then_some(self.row_height),
            Heights::Variable { sizes, .. } => sizes.get(index).copied(),
        }
    }

    pub fn is_measured(&self, index: usize) -> bool {
        match &self.heights {
            Heights::Fixed { count } => index < *count,
            Heights::Variable { measured, .. } => measured.get(index).copied().unwrap_or(false),
        }
    }

    /// The height used to turn a viewport extent into a row count.
    ///
    /// Variable mode averages the measured rows and falls back to `row_height` (an estimate)
    /// before anything has been measured. `None` means no usable height is known.
    pub fn average_row_height(&self) -> Option<u32> {
        let avg = match &self.heights {
            Heights::Fixed { .. } => self.row_height,
            Heights::Variable {
                measured_count,
                measured_total,
                ..
            } => {
                if *measured_count == 0 {
                    self.row_height
                } else {
                    let avg = measured_total / *measured_count as u64;
                    u32::try_from(avg).unwrap_or(u32::MAX)
                }
            }
        };
        (avg > 0).then_some(avg)
    }

    /// Splices an unmeasured row in at `index`.
    pub fn insert(&mut self, index: usize) {
        match &mut self.heights {
            Heights::Fixed { count } => *count += 1,
            Heights::Variable {
                sizes,
                measured,
                sums,
                ..
            } => {
                let index = index.min(sizes.len());
                if index == sizes.len() {
                    sizes.push(0);
                    measured.push(false);
                    sums.push_value(0);
                } else {
                    sizes.insert(index, 0);
                    measured.insert(index, false);
                    *sums = Fenwick::from_sizes(sizes);
                }
            }
        }
    }

    pub fn remove(&mut self, index: usize) {
        match &mut self.heights {
            Heights::Fixed { count } => {
                if index < *count {
                    *count -= 1;
                }
            }
            Heights::Variable {
                sizes,
                measured,
                sums,
                measured_count,
                measured_total,
            } => {
                if index >= sizes.len() {
                    return;
                }
                let size = sizes.remove(index);
                if measured.remove(index) {
                    *measured_count -= 1;
                    *measured_total = measured_total.saturating_sub(size as u64);
                }
                if index == sizes.len() {
                    sums.truncate(index);
                } else {
                    *sums = Fenwick::from_sizes(sizes);
                }
            }
        }
    }

    /// Records a sampled height for the row at `index`.
    ///
    /// Returns the change in total extent. Fixed mode ignores measurements.
    pub fn measure(&mut self, index: usize, height: u32) -> i64 {
        let Heights::Variable {
            sizes,
            measured,
            sums,
            measured_count,
            measured_total,
        } = &mut self.heights
        else {
            return 0;
        };
        let Some(prev) = sizes.get(index).copied() else {
            return 0;
        };
        if measured[index] {
            *measured_total = measured_total.saturating_sub(prev as u64);
        } else {
            measured[index] = true;
            *measured_count += 1;
        }
        *measured_total = measured_total.saturating_add(height as u64);

        let delta = height as i64 - prev as i64;
        if delta != 0 {
            sizes[index] = height;
            sums.add(index, delta);
        }
        ltrace!(index, height, delta, "HeightModel::measure");
        delta
    }
}
