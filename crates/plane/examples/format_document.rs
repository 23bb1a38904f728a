//! Formats a document the way a language server would: parse, rewrite,
//! and apply the returned edit.

use plane::format::{format, DocumentFormattingParams, FormatConfig, FormattingOptions};

fn main() {
    let document = "SELECT u.id, u.name AS label FROM users u \
                    INNER JOIN orders o ON u.id = o.user_id \
                    WHERE o.total > 100 ORDER BY o.total";

    let params = DocumentFormattingParams {
        options: FormattingOptions {
            tab_size: 2,
            insert_spaces: true,
        },
    };

    match format(document, &params, &FormatConfig::default()) {
        Ok(edits) => {
            for edit in &edits {
                println!(
                    "edit {}:{} .. {}:{}",
                    edit.range.start.line,
                    edit.range.start.character,
                    edit.range.end.line,
                    edit.range.end.character
                );
                println!("{}", edit.new_text);
            }
        }
        Err(err) => eprintln!("format failed: {err}"),
    }
}
