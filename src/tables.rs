/*!
 * Registry of the braille translation tables known to the application.
 *
 * Tables are addressed by an opaque, filename-shaped key that is passed
 * unchanged to the transliteration engine. The registry only supplies
 * human-readable labels and groupings; keys that are not listed here are
 * still forwarded to the engine, which reports them as a translation failure.
 */

use serde::Serialize;

/// Key of the table used when a request does not name one
pub const DEFAULT_TABLE: &str = "en-ueb-g2.ctb";

/// A single translation table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TranslationTable {
    /// Engine key, e.g. `en-ueb-g2.ctb`
    pub key: &'static str,
    /// Label shown to users
    pub label: &'static str,
}

/// Tables sharing a language or purpose
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TableGroup {
    /// Group name
    pub name: &'static str,
    /// Tables in display order
    pub tables: &'static [TranslationTable],
}

const fn table(key: &'static str, label: &'static str) -> TranslationTable {
    TranslationTable { key, label }
}

/// Every table group, in display order
pub static TABLE_GROUPS: &[TableGroup] = &[
    TableGroup {
        name: "English",
        tables: &[
            table("en-ueb-g2.ctb", "English - UEB Grade 2 (Contracted, default)"),
            table("en-ueb-g1.ctb", "English - UEB Grade 1 (Uncontracted)"),
            table("en-us-g2.ctb", "English - US Grade 2 (EBAE Contracted)"),
            table("en-us-g1.ctb", "English - US Grade 1 (EBAE)"),
            table("en-us-comp6.ctb", "English - US Computer (6-dot)"),
            table("en-us-comp8.ctb", "English - US Computer (8-dot)"),
            table("en-GB-g2.ctb", "English - GB Grade 2"),
            table("en-gb-comp8.ctb", "English - GB Computer (8-dot)"),
            table("en-in-g1.ctb", "English - India Grade 1"),
            table("en-ueb-math.ctb", "English - UEB Math"),
            table("en-chess.ctb", "English - Chess Notation"),
        ],
    },
    TableGroup {
        name: "Mathematics",
        tables: &[
            table("nemeth.ctb", "Nemeth Braille Code (US Math)"),
            table("marburg.ctb", "Marburg Math (UK/International)"),
            table("ukmaths.ctb", "UK Mathematics (RNIB)"),
            table("wiskunde.ctb", "Dutch Mathematics (Wiskunde)"),
            table("en-us-mathtext.ctb", "English US Math Text"),
        ],
    },
    TableGroup {
        name: "French",
        tables: &[
            table("Fr-Ca-g2.ctb", "French - Canada Grade 2"),
            table("Fr-Fr-g2.ctb", "French - France Grade 2"),
        ],
    },
    TableGroup {
        name: "German",
        tables: &[
            table("de-de-g1.ctb", "German - Grade 1"),
            table("de-de-g2.ctb", "German - Grade 2"),
            table("de-de-comp8.ctb", "German - Computer (8-dot)"),
            table("de-ch-g1.ctb", "German - Switzerland Grade 1"),
            table("de-ch-g2.ctb", "German - Switzerland Grade 2"),
        ],
    },
    TableGroup {
        name: "Nordic Languages",
        tables: &[
            table("da-dk-g16.ctb", "Danish - Grade 1.6"),
            table("da-dk-g26.ctb", "Danish - Grade 2.6"),
            table("no-no-g1.ctb", "Norwegian - Grade 1"),
            table("no-no-g2.ctb", "Norwegian - Grade 2"),
            table("sv-1996.ctb", "Swedish - 1996 Standard"),
        ],
    },
    TableGroup {
        name: "Other European",
        tables: &[
            table("pt-pt-g2.ctb", "Portuguese - Portugal Grade 2"),
            table("ca-g1.ctb", "Catalan - Grade 1"),
            table("el.ctb", "Greek"),
            table("ru-litbrl.ctb", "Russian - Literary"),
            table("cs-g1.ctb", "Czech - Grade 1"),
            table("cy-cy-g2.ctb", "Welsh - Grade 2"),
        ],
    },
    TableGroup {
        name: "Asian and Middle Eastern",
        tables: &[
            table("ar.tbl", "Arabic"),
            table("ur-pk-g2.ctb", "Urdu - Grade 2"),
            table("ta-ta-g1.ctb", "Tamil - Grade 1"),
            table("vi-g1.ctb", "Vietnamese - Grade 1"),
            table("zh-chn.ctb", "Chinese - Mainland China (Mandarin)"),
            table("zh-tw.ctb", "Chinese - Taiwan"),
        ],
    },
];

/// Iterate over every registered table
pub fn all_tables() -> impl Iterator<Item = &'static TranslationTable> {
    TABLE_GROUPS.iter().flat_map(|group| group.tables.iter())
}

/// Find a table by key.
///
/// The extension may be omitted, so `en-ueb-g2` finds `en-ueb-g2.ctb`.
pub fn find_table(key: &str) -> Option<&'static TranslationTable> {
    all_tables().find(|t| t.key == key || strip_extension(t.key) == key)
}

/// Label for a table key, or the key itself when it is not registered
pub fn table_label(key: &str) -> &str {
    match find_table(key) {
        Some(table) => table.label,
        None => key,
    }
}

/// Name of the group a table belongs to
pub fn table_group(key: &str) -> Option<&'static str> {
    TABLE_GROUPS
        .iter()
        .find(|group| group.tables.iter().any(|t| t.key == key || strip_extension(t.key) == key))
        .map(|group| group.name)
}

/// Resolve a user-supplied key to the engine key.
///
/// Registered tables resolve to their full filename; anything else is passed
/// through untouched so the engine can decide.
pub fn resolve_table_key(key: &str) -> String {
    match find_table(key) {
        Some(table) => table.key.to_string(),
        None => key.to_string(),
    }
}

fn strip_extension(key: &str) -> &str {
    key.rsplit_once('.').map_or(key, |(stem, _)| stem)
}
