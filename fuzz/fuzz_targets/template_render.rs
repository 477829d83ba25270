#![no_main]

use libfuzzer_sys::fuzz_target;
use serde_json::Value;
use tela_runtime::Engine;

fuzz_target!(|data: &[u8]| {
    if let Ok(source) = std::str::from_utf8(data) {
        let engine = Engine::new();
        let _ = engine.render("fuzz-template", source, &Value::Null);
    }
});
