#![no_main]

use libfuzzer_sys::fuzz_target;
use nestbox_layout::{LayoutConfig, LayoutEngine, NodeSet};

fuzz_target!(|data: &[u8]| {
    // Arbitrary JSON must either be rejected or load into a collection the
    // engine can settle without panicking, cycles included.
    let Ok(nodes) = serde_json::from_slice::<NodeSet>(data) else {
        return;
    };
    let Ok(engine) = LayoutEngine::new(LayoutConfig::default()) else {
        return;
    };
    if nodes.len() > 256 {
        return;
    }
    let settled = engine.update_children_layout(&nodes);
    assert_eq!(settled.len(), nodes.len(), "cascade changed the node count");
});
