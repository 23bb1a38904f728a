#![no_main]

use libfuzzer_sys::fuzz_target;

use plane_format::{DocumentFormattingParams, FormatConfig, FormattingOptions};

fuzz_target!(|data: &[u8]| {
    if let Ok(sql) = std::str::from_utf8(data) {
        let params = DocumentFormattingParams {
            options: FormattingOptions {
                tab_size: 2,
                insert_spaces: true,
            },
        };
        let _ = plane_format::format(sql, &params, &FormatConfig::default());
    }
});
