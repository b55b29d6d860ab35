#![no_main]

use libfuzzer_sys::fuzz_target;
use peaky_layout::{Tree, TreeSnapshot};

fuzz_target!(|data: &[u8]| {
    let Ok(snapshot) = serde_json::from_slice::<TreeSnapshot>(data) else {
        return;
    };
    // Decoding may reject, but an accepted tree must be valid and stable.
    let Ok(tree) = Tree::from_snapshot(&snapshot) else {
        return;
    };
    tree.validate().expect("decoded tree is valid");
    let encoded = tree.to_snapshot();
    let again = Tree::from_snapshot(&encoded).expect("re-encoded snapshot decodes");
    assert_eq!(again.to_snapshot(), encoded);
    let _ = tree.rects();
});
