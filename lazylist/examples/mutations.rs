// Example: structural edits delivered as scoped messages.
use lazylist::{ListOptions, MutationMessage, RowId, VecSurface, VirtualList};

fn main() {
    let ids = (1..=5u64).map(RowId::from);
    let mut list = VirtualList::new(
        ListOptions::new(ids, 20, |id: &RowId| format!("loading {id}..."))
            .with_viewport_extent(200)
            .with_scope("items"),
    );
    let mut surface = VecSurface::new();

    let messages = [
        // An optimistic row with a temporary id...
        MutationMessage::new("append", "tmp-1").with_content("draft".to_string()),
        // ...later persisted under its real id.
        MutationMessage::new("replace", "tmp-1")
            .with_row_id("6")
            .with_content("ID 6".to_string()),
        MutationMessage::new("remove", "2").with_scope("items"),
        MutationMessage::new("remove", "3").with_scope("other-list"),
        MutationMessage::new("frobnicate", "4"),
    ];
    for message in messages {
        let action = message.action.clone();
        println!("{action}: {:?}", list.handle_message(message));
    }

    list.tick(0, &mut surface);
    println!("ids: {:?}", list.ids());
    println!("rows: {:?}", surface.rows());
    println!("stats: {:?}", list.stats());
}
