//! End-to-end flow over the public API: type, debounce, fetch, highlight,
//! navigate, commit — against the built-in dataset on a real runtime.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use typeahead::{Key, SearchBox, Segment, StaticListSource};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Pump the widget with the real clock until `done` holds.
fn pump_until(search: &mut SearchBox, mut done: impl FnMut(&SearchBox) -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !done(search) {
        assert!(Instant::now() < deadline, "condition not met in time");
        search.poll();
        std::thread::sleep(ms(5));
    }
}

#[test]
fn type_navigate_commit() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let source = Arc::new(StaticListSource::with_default_dataset().with_latency(ms(30)));
    let mut search = SearchBox::new(source, runtime.handle().clone())
        .with_min_chars(2)
        .with_debounce_interval(ms(50));

    let selections = Arc::new(Mutex::new(Vec::new()));
    let selections_clone = selections.clone();
    search.selected.connect(move |value: &String| {
        selections_clone.lock().unwrap().push(value.clone());
    });

    search.set_focused(true);

    // One character is below the gate: nothing happens.
    search.set_query("s");
    search.poll();
    assert!(!search.is_open());
    assert!(search.next_deadline().is_none());

    // A burst of keystrokes coalesces into one fetch for the last query.
    search.set_query("sa");
    search.set_query("san");
    pump_until(&mut search, |s| s.is_open() && !s.is_loading());

    let snapshot = search.snapshot();
    let values: Vec<_> = snapshot.items.iter().map(|i| i.value.as_str()).collect();
    assert_eq!(values, vec!["San Antonio", "San Diego", "San Jose"]);

    // The match is highlighted case-insensitively at the right offset.
    assert_eq!(
        snapshot.items[0].segments,
        vec![
            Segment {
                text: "San".to_string(),
                highlighted: true,
            },
            Segment {
                text: " Antonio".to_string(),
                highlighted: false,
            },
        ]
    );

    // Navigate down twice, clamp checks live in unit tests.
    search.handle_key(Key::ArrowDown);
    search.handle_key(Key::ArrowDown);
    assert_eq!(search.active_index(), 1);

    search.handle_key(Key::Enter);
    assert_eq!(*selections.lock().unwrap(), vec!["San Diego".to_string()]);

    let snapshot = search.snapshot();
    assert_eq!(snapshot.query, "San Diego");
    assert!(!snapshot.is_open);
    assert!(!snapshot.focused);
    assert!(snapshot.items.is_empty());
}

#[test]
fn superseding_query_wins_even_with_slower_first_fetch() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let source = Arc::new(StaticListSource::with_default_dataset().with_latency(ms(80)));
    let mut search = SearchBox::new(source, runtime.handle().clone())
        .with_min_chars(1)
        .with_debounce_interval(ms(20));

    search.set_focused(true);

    // First query's fetch goes out...
    let t0 = Instant::now();
    search.set_query_at("c", t0);
    search.poll_at(t0 + ms(20));
    assert!(search.is_loading());

    // ...then a narrower query supersedes it while it is still in flight.
    let t1 = Instant::now();
    search.set_query_at("ch", t1);
    search.poll_at(t1 + ms(20));

    pump_until(&mut search, |s| !s.is_loading());
    // Give the superseded fetch time to land (and be discarded).
    std::thread::sleep(ms(120));
    search.poll();

    let snapshot = search.snapshot();
    let values: Vec<_> = snapshot.items.iter().map(|i| i.value.as_str()).collect();
    assert_eq!(values, vec!["Chicago", "Charlotte"]);
}

#[test]
fn controlled_round_trip() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let source = Arc::new(StaticListSource::with_default_dataset());
    let mut search =
        SearchBox::new(source, runtime.handle().clone()).with_debounce_interval(ms(20));

    let selections = Arc::new(Mutex::new(Vec::new()));
    let selections_clone = selections.clone();
    search.selected.connect(move |value: &String| {
        selections_clone.lock().unwrap().push(value.clone());
    });

    // The external caller commits a value: the widget disables itself.
    search.set_external_value(Some("Houston".to_string()));
    assert!(search.snapshot().disabled);
    search.set_query("dal");
    assert!(!search.handle_key(Key::ArrowDown));
    assert!(search.snapshot().items.is_empty());

    // Clearing reports "" and, once the caller drops its value, typing
    // resumes from the previous selection.
    search.clear_external_selection();
    search.set_external_value(None);
    assert_eq!(*selections.lock().unwrap(), vec![String::new()]);
    let snapshot = search.snapshot();
    assert!(!snapshot.disabled);
    assert_eq!(snapshot.query, "Houston");
    assert!(snapshot.focused);

    search.set_focused(true);
    search.set_query("dal");
    pump_until(&mut search, |s| !s.is_loading() && s.is_open());
    let values: Vec<_> = search
        .snapshot()
        .items
        .iter()
        .map(|i| i.value.clone())
        .collect();
    assert_eq!(values, vec!["Dallas".to_string()]);
}
