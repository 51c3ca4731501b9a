use crate::*;

use std::cell::{Cell, RefCell};
use std::format;
use std::rc::Rc;
use std::string::{String, ToString};
use std::vec::Vec;

use lazylist::{
    FetchBatch, FetchError, ListOptions, MutationMessage, RowId, RowSurface, VecSurface,
};

fn ids(n: u64) -> Vec<RowId> {
    (1..=n).map(RowId::from).collect()
}

fn options(n: u64) -> ListOptions<String> {
    MountConfig::new(ids(n), 20).into_options(200, |id: &RowId| format!("placeholder {id}"))
}

fn serve(batch: &FetchBatch) -> Result<Vec<(RowId, String)>, FetchError> {
    Ok(batch
        .ids
        .iter()
        .map(|id| (id.clone(), format!("ID {id}")))
        .collect())
}

#[test]
fn viewport_extent_parses_host_heights() {
    let parse = |s: &str| s.parse::<ViewportExtent>();
    assert_eq!(parse("400px"), Ok(ViewportExtent::Pixels(400)));
    assert_eq!(parse(" 50vh "), Ok(ViewportExtent::WindowPercent(50)));
    assert_eq!(parse("12.5vh"), Ok(ViewportExtent::WindowPercent(12)));
    assert_eq!(parse("auto"), Ok(ViewportExtent::Window));
    assert_eq!(parse(""), Ok(ViewportExtent::Window));

    let err = parse("tallpx").unwrap_err();
    assert_eq!(err.input(), "tallpx");

    assert_eq!(ViewportExtent::Pixels(400).resolve(900), 400);
    assert_eq!(ViewportExtent::WindowPercent(50).resolve(900), 450);
    assert_eq!(ViewportExtent::Window.resolve(900), 900);
}

#[test]
fn viewport_extent_round_trips_through_height_strings() {
    for extent in [
        ViewportExtent::Pixels(400),
        ViewportExtent::WindowPercent(50),
        ViewportExtent::Window,
    ] {
        let s = String::from(extent);
        assert_eq!(ViewportExtent::try_from(s), Ok(extent));
    }
    assert_eq!(ViewportExtent::Pixels(400).to_string(), "400px");
    assert!(ViewportExtent::try_from(String::from("abcvh")).is_err());
}

#[test]
fn malformed_heights_degrade_to_an_empty_window() {
    assert_eq!(ViewportExtent::parse_lossy("px"), ViewportExtent::Pixels(0));
    assert_eq!(ViewportExtent::parse_lossy("abcvh"), ViewportExtent::Pixels(0));
    assert_eq!(ViewportExtent::parse_lossy("50vh"), ViewportExtent::WindowPercent(50));

    let mut config = MountConfig::new(ids(100), 20);
    config.height = ViewportExtent::parse_lossy("px");
    let options = config.into_options(900, |id: &RowId| format!("placeholder {id}"));
    let mut c = Controller::mount(options, VecSurface::new(), NoScrollStore);
    let (frame, fetch) = c.tick(0);
    assert!(frame.unwrap().window.is_empty());
    assert!(c.surface().is_empty());
    assert_eq!(fetch, None);
}

#[cfg(feature = "serde")]
#[test]
fn mount_config_reads_host_height_strings() {
    let config: MountConfig =
        serde_json::from_str(r#"{"row_height":20,"height":"50vh","ids":["a","b"]}"#).unwrap();
    assert_eq!(config.height, ViewportExtent::WindowPercent(50));
    assert_eq!(config.row_height, 20);
    assert_eq!(config.page_size, 50);
    assert_eq!(config.ids, [RowId::from("a"), RowId::from("b")]);

    let config: MountConfig = serde_json::from_str(r#"{"row_height":20,"height":"px"}"#).unwrap();
    assert_eq!(config.height, ViewportExtent::Pixels(0));

    let json = serde_json::to_string(&ViewportExtent::Pixels(400)).unwrap();
    assert_eq!(json, r#""400px""#);
    let extent: ViewportExtent = serde_json::from_str(r#""auto""#).unwrap();
    assert_eq!(extent, ViewportExtent::Window);
}

#[test]
fn mount_config_fills_in_defaults() {
    let config = MountConfig::new(ids(3), 30);
    assert_eq!(config.page_size, 50);
    assert_eq!(config.render_ahead, 10);
    assert_eq!(config.scope, "virtualized");

    let config = MountConfig {
        height: ViewportExtent::WindowPercent(50),
        scope: "virtual-a".into(),
        ..config
    };
    let options = config.into_options(800, |_: &RowId| ());
    assert_eq!(options.viewport_extent, 400);
    assert_eq!(options.row_height, 30);
    assert_eq!(options.scope, "virtual-a");
    assert_eq!(options.ids.len(), 3);
}

#[test]
fn listeners_detach_once_in_reverse_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut listeners = Listeners::new();
    for name in ["scroll", "resize", "stream"] {
        let log = Rc::clone(&log);
        listeners.push(move || log.borrow_mut().push(name));
    }
    assert_eq!(listeners.len(), 3);

    listeners.release();
    listeners.release();
    assert!(listeners.is_empty());
    assert_eq!(*log.borrow(), ["stream", "resize", "scroll"]);
}

#[test]
fn dropping_listeners_detaches_them() {
    let detached = Rc::new(Cell::new(0));
    {
        let mut listeners = Listeners::new();
        let d = Rc::clone(&detached);
        listeners.push(move || d.set(d.get() + 1));
    }
    assert_eq!(detached.get(), 1);
}

#[test]
fn scroll_position_is_saved_per_scope_and_restored() {
    let mut c = Controller::mount(options(1000), VecSurface::new(), MemoryScrollStore::new());
    c.tick(0);
    c.on_scroll(4000);
    c.tick(16);
    assert_eq!(c.positions().load("virtualized/position"), Some(4000));

    let positions = c.positions().clone();
    let mut restored = Controller::mount(options(1000), VecSurface::new(), positions);
    assert_eq!(restored.list().scroll_offset(), 4000);
    let (frame, _) = restored.tick(0);
    assert_eq!(frame.unwrap().window.start_index, 190);
}

#[test]
fn missing_storage_is_not_an_error() {
    let mut c = Controller::mount(options(10), VecSurface::new(), NoScrollStore);
    assert_eq!(c.list().scroll_offset(), 0);
    assert!(c.tick(0).0.is_some());
}

#[test]
fn tick_with_loads_rows_through_the_fetcher() {
    let mut c = Controller::mount(options(1000), VecSurface::new(), NoScrollStore);
    let mut fetcher = |batch: &FetchBatch| serve(batch);

    c.tick_with(0, &mut fetcher);
    assert_eq!(c.surface().rows()[0], "placeholder 1");
    assert!(c.tick_with(200, &mut fetcher).is_none());
    let frame = c.tick_with(216, &mut fetcher).unwrap();
    assert_eq!(frame.patch.replaced, 30);
    assert_eq!(c.surface().rows()[0], "ID 1");
}

#[test]
fn host_events_reach_the_list() {
    let mut c = Controller::mount(options(3), VecSurface::new(), NoScrollStore);
    assert!(c.on_row_added("1", "1b", "new row".into()).is_some());
    assert!(
        c.on_message(MutationMessage::new("remove", "2").with_scope("virtualized"))
            .is_some()
    );
    assert!(
        c.on_message(MutationMessage::new("remove", "3").with_scope("elsewhere"))
            .is_none()
    );
    let order: Vec<&str> = c.list().ids().iter().map(RowId::as_str).collect();
    assert_eq!(order, ["1", "1b", "3"]);

    c.on_resize(0);
    let (frame, _) = c.tick(0);
    assert!(frame.unwrap().window.is_empty());
    assert!(c.surface().is_empty());
}

#[test]
fn unmount_releases_listeners_and_state() {
    let detached = Rc::new(Cell::new(0));
    let mut c = Controller::mount(options(100), VecSurface::new(), NoScrollStore);
    for _ in 0..3 {
        let d = Rc::clone(&detached);
        c.listen(move || d.set(d.get() + 1));
    }
    c.tick(0);
    assert!(!c.surface().is_empty());

    c.unmount();
    c.unmount();
    assert_eq!(detached.get(), 3);
    assert!(!c.is_mounted());
    assert!(c.list().is_empty());
    assert!(c.surface().is_empty());

    c.on_scroll(100);
    assert_eq!(c.tick(16), (None, None));
}

#[test]
fn query_pairs_repeat_the_id_parameter() {
    let batch = FetchBatch {
        ticket: lazylist::FetchTicket(0),
        ids: ids(2),
    };
    let pairs: Vec<_> = query_pairs(&batch).collect();
    assert_eq!(pairs, [("q[id_in][]", "1"), ("q[id_in][]", "2")]);
}
