#![no_main]

use deedreveal_core::amount::{format_amount, parse_amount, sanitize_amount_input};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (&str, u8)| {
    let (input, decimals) = data;
    let decimals = decimals % 37;

    if let Ok(units) = parse_amount(input, decimals) {
        let text = format_amount(units, decimals);
        assert_eq!(parse_amount(&text, decimals), Ok(units));
    }

    let sanitized = sanitize_amount_input(input);
    assert_eq!(sanitize_amount_input(&sanitized), sanitized);
});
