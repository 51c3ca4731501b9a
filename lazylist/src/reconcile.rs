use alloc::vec::Vec;

/// The live sequence of rendered rows that the reconciler patches.
///
/// A DOM adapter maps these onto child-node operations; a terminal UI can use [`VecSurface`].
/// Indexes are positions in the live sequence, `0` being the head.
pub trait RowSurface<R> {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn row(&self, index: usize) -> Option<&R>;

    fn insert_renderable(&mut self, index: usize, row: R);

    fn remove_renderable(&mut self, index: usize) -> Option<R>;

    fn replace_renderable(&mut self, index: usize, row: R) -> Option<R>;

    fn replace_all(&mut self, rows: Vec<R>);
}

/// A plain in-memory [`RowSurface`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VecSurface<R> {
    rows: Vec<R>,
}

impl<R> VecSurface<R> {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<R> {
        self.rows
    }
}

impl<R> RowSurface<R> for VecSurface<R> {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn row(&self, index: usize) -> Option<&R> {
        self.rows.get(index)
    }

    fn insert_renderable(&mut self, index: usize, row: R) {
        let index = index.min(self.rows.len());
        self.rows.insert(index, row);
    }

    fn remove_renderable(&mut self, index: usize) -> Option<R> {
        (index < self.rows.len()).then(|| self.rows.remove(index))
    }

    fn replace_renderable(&mut self, index: usize, row: R) -> Option<R> {
        let slot = self.rows.get_mut(index)?;
        Some(core::mem::replace(slot, row))
    }

    fn replace_all(&mut self, rows: Vec<R>) {
        self.rows = rows;
    }
}

/// What a reconcile pass did to the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Patch {
    /// Rows appended or prepended by drift.
    pub inserted: usize,
    /// Rows dropped from the opposite end by drift.
    pub removed: usize,
    /// Slots whose content was swapped in place.
    pub replaced: usize,
    /// Whether the whole sequence was replaced.
    pub full: bool,
}

impl Patch {
    pub fn ops(&self) -> usize {
        self.inserted + self.removed + self.replaced
    }
}

/// Moves the surface from the previous window to the new one with as few edits as possible.
#[derive(Clone, Copy, Debug, Default)]
pub struct Reconciler;

impl Reconciler {
    /// Applies `rows` (the new window's elements, in order) to `surface`.
    ///
    /// `drift` is `new_start - previous_start`. For `0 < |drift| <= rows.len()` the rows entering
    /// the window are added at one end and the same number removed from the other end; otherwise
    /// every slot is synchronized with `rows`. Whenever the surface ends up with the expected
    /// length, remaining mismatched slots (e.g. a placeholder whose content has since arrived) are
    /// replaced in place; a length mismatch falls back to replacing everything.
    pub fn apply_window<R, S>(&self, surface: &mut S, rows: Vec<R>, drift: isize) -> Patch
    where
        R: Clone + PartialEq,
        S: RowSurface<R> + ?Sized,
    {
        let mut patch = Patch::default();
        let steps = drift.unsigned_abs();
        if drift != 0 && steps <= rows.len() && steps <= surface.len() {
            if drift > 0 {
                for row in &rows[rows.len() - steps..] {
                    let tail = surface.len();
                    surface.insert_renderable(tail, row.clone());
                    surface.remove_renderable(0);
                }
            } else {
                for (i, row) in rows[..steps].iter().enumerate() {
                    surface.insert_renderable(i, row.clone());
                    let last = surface.len() - 1;
                    surface.remove_renderable(last);
                }
            }
            patch.inserted = steps;
            patch.removed = steps;
        }

        if surface.len() != rows.len() {
            ltrace!(
                live = surface.len(),
                expected = rows.len(),
                "Reconciler: full replacement"
            );
            surface.replace_all(rows);
            patch.full = true;
            return patch;
        }

        for (i, row) in rows.into_iter().enumerate() {
            if surface.row(i) != Some(&row) {
                surface.replace_renderable(i, row);
                patch.replaced += 1;
            }
        }
        patch
    }
}
