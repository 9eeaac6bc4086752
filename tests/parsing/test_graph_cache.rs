// Tests for call-graph memoization keyed by source hash.

use std::sync::Arc;

use warden_parsers::cache::CallGraphCache;
use warden_parsers::source::SourceUnit;

#[test]
fn test_cache_is_keyed_by_function_and_source() {
    let cache = CallGraphCache::new();
    let unit = SourceUnit::python("def a():\n    x()\n\ndef b():\n    y()\n");

    let a = cache.function_graph(&unit, "a").unwrap();
    let b = cache.function_graph(&unit, "b").unwrap();
    assert_eq!(a.calls[0].name, "x");
    assert_eq!(b.calls[0].name, "y");
    assert_eq!(cache.len(), 2);

    let again = cache.function_graph(&unit, "a").unwrap();
    assert!(Arc::ptr_eq(&a, &again));
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_cache_distinguishes_languages() {
    let cache = CallGraphCache::new();
    cache
        .function_graph(&SourceUnit::python("def f():\n    g()\n"), "f")
        .unwrap();
    cache
        .function_graph(&SourceUnit::rust("fn f() { g(); }"), "f")
        .unwrap();
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_cache_is_shareable_across_threads() {
    let cache = Arc::new(CallGraphCache::new());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let cache = Arc::clone(&cache);
            std::thread::spawn(move || {
                let unit = SourceUnit::python("def f():\n    g()\n");
                cache.function_graph(&unit, "f").unwrap().calls.len()
            })
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), 1);
    }
    assert_eq!(cache.len(), 1);
}
