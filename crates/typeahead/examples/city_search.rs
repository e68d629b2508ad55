//! Scripted demo: drives a [`SearchBox`] over the built-in city dataset the
//! way an embedding renderer would, printing each state it would draw.
//!
//! Run with logging to watch the controller's internals:
//!
//! ```text
//! RUST_LOG=typeahead=trace cargo run --example city_search
//! ```

use std::time::Duration;

use typeahead::{Key, SearchBox, SearchBoxSnapshot};

/// Print the snapshot roughly the way a renderer would draw it.
fn render(snapshot: &SearchBoxSnapshot) {
    println!("input: {:?}{}", snapshot.query, if snapshot.disabled { " (disabled)" } else { "" });
    if snapshot.is_loading {
        println!("  loading...");
    }
    if snapshot.is_open {
        for index in snapshot.visible_range.clone() {
            let item = &snapshot.items[index];
            let marker = if index as i32 == snapshot.active_index {
                '>'
            } else {
                ' '
            };
            let mut line = String::new();
            for segment in &item.segments {
                if segment.highlighted {
                    line.push('[');
                    line.push_str(&segment.text);
                    line.push(']');
                } else {
                    line.push_str(&segment.text);
                }
            }
            println!("  {marker} {line}");
        }
    }
}

/// Pump the widget until it goes quiet, sleeping until the next deadline.
fn settle(search: &mut SearchBox) {
    loop {
        search.poll();
        if !search.is_loading() && search.next_deadline().is_none() {
            return;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    let mut search = SearchBox::with_default_dataset()
        .with_min_chars(2)
        .with_debounce_interval(Duration::from_millis(150));

    search.selected.connect(|value: &String| {
        if value.is_empty() {
            println!("-- selection cleared");
        } else {
            println!("-- selected: {value}");
        }
    });

    search.set_focused(true);

    // The user types "san", one keystroke at a time.
    for query in ["s", "sa", "san"] {
        println!("\ntype {query:?}");
        search.set_query(query);
        std::thread::sleep(Duration::from_millis(60));
        search.poll();
    }
    settle(&mut search);
    render(&search.snapshot());

    // Arrow down to the second match and commit it.
    println!("\npress ArrowDown, ArrowDown, Enter");
    search.handle_key(Key::ArrowDown);
    search.handle_key(Key::ArrowDown);
    render(&search.snapshot());
    search.handle_key(Key::Enter);
    render(&search.snapshot());
}
