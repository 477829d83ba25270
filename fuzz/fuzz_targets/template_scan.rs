#![no_main]

use libfuzzer_sys::fuzz_target;
use tela_engine::{compile, Scanner};

fuzz_target!(|data: &[u8]| {
    if let Ok(source) = std::str::from_utf8(data) {
        let mut pulled = String::new();
        let mut scanner = Scanner::new(source);
        while let Some(fragment) = scanner.next_fragment() {
            pulled.push_str(fragment.as_str());
        }
        assert_eq!(pulled, compile(source));
        assert!(scanner.next_fragment().is_none());
    }
});
