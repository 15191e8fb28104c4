#![no_main]
use libfuzzer_sys::fuzz_target;

use std::path::Path;

use form_routes::url_path;

fuzz_target!(|data: &[u8]| {
    if let Ok(name) = std::str::from_utf8(data) {
        let root = Path::new("routes");
        let file = root.join(name);

        // must never panic, and a derived path always starts at the root
        if let Ok(Some(path)) = url_path(&file, root, &["html", "md"]) {
            assert!(path.starts_with('/'));
        }
    }
});
