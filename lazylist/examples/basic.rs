// Example: render a window, serve the fetch batch, then scroll.
use lazylist::{ListOptions, RowId, VecSurface, VirtualList};

fn main() {
    let ids = (1..=1000u64).map(RowId::from);
    let mut list = VirtualList::new(
        ListOptions::new(ids, 20, |id: &RowId| format!("loading {id}...")).with_viewport_extent(200),
    );
    let mut surface = VecSurface::new();

    let out = list.tick(0, &mut surface);
    println!("first frame: {:?}", out.frame.map(|f| f.window));

    let batch = list.tick(200, &mut surface).fetch.expect("missing rows are fetched");
    println!("fetching {} rows", batch.ids.len());
    let rows = batch
        .ids
        .iter()
        .map(|id| (id.clone(), format!("ID {id}")))
        .collect();
    list.complete_fetch(&batch, Ok(rows));

    list.set_scroll_offset(40 * 20);
    let frame = list.tick(216, &mut surface).frame.expect("scroll schedules a frame");
    println!(
        "after scroll: window={:?} patch={:?} first={:?}",
        frame.window,
        frame.patch,
        surface.rows().first()
    );
}
