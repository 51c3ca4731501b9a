use lazylist::{FetchBatch, FetchError, MutationMessage, RowId, VecSurface};
use lazylist_adapter::{Controller, MemoryScrollStore, MountConfig, query_pairs};

fn main() {
    // Example: a host frame loop around the controller.
    //
    // An adapter would:
    // - build a `MountConfig` from the element's attributes
    // - register its scroll/resize/stream listeners through `listen`
    // - forward host events and call `tick(now_ms)` from its frame callback
    // - send each fetch batch over its transport (here: served synchronously)
    let mut config = MountConfig::new((1..=500u64).map(RowId::from), 24);
    config.height = "50vh".parse().expect("valid extent");
    config.scope = "inbox".into();

    let options = config.into_options(960, |id: &RowId| format!("loading {id}..."));
    let mut c = Controller::mount(options, VecSurface::new(), MemoryScrollStore::new());
    c.listen(|| println!("scroll listener detached"));

    let mut fetcher = |batch: &FetchBatch| -> Result<Vec<(RowId, String)>, FetchError> {
        let query: Vec<String> = query_pairs(batch).map(|(k, v)| format!("{k}={v}")).collect();
        println!("GET /rows?{}", query.join("&"));
        Ok(batch
            .ids
            .iter()
            .map(|id| (id.clone(), format!("row {id}")))
            .collect())
    };

    let mut now_ms = 0u64;
    for step in 0..20 {
        if step == 5 {
            c.on_scroll(24 * 120);
        }
        if step == 12 {
            c.on_message(
                MutationMessage::new("prepend", "0")
                    .with_scope("inbox")
                    .with_content("row 0 (new)".to_string()),
            );
        }
        if let Some(frame) = c.tick_with(now_ms, &mut fetcher) {
            println!(
                "t={now_ms} window={}..{} patch={:?}",
                frame.window.start_index, frame.window.stop_index, frame.patch
            );
        }
        now_ms += 50;
    }

    println!("stats: {:?}", c.list().stats());
    c.unmount();
}
