use crate::model::{Diagnostic, DirectoryRecord};

/// Join key for one directory record, plus the fallback diagnostic when
/// the display-name rule was attempted and failed.
pub struct NormalizedKey {
    pub key: String,
    pub fallback: Option<Diagnostic>,
}

/// Derive the canonical join key for a directory record.
///
/// Default rule: uppercase the SAM account name. Accounts whose raw
/// Office equals `display_name_key_office` (case-sensitive) use the
/// display-name rule instead; if that fails for any reason the default
/// rule applies and a `NameFallback` diagnostic is recorded. Key
/// derivation never fails a run.
pub fn join_key(record: &DirectoryRecord, display_name_key_office: &str) -> NormalizedKey {
    if record.office == display_name_key_office {
        match display_name_key(&record.display_name) {
            Ok(key) => {
                return NormalizedKey {
                    key,
                    fallback: None,
                }
            }
            Err(reason) => {
                return NormalizedKey {
                    key: record.sam_account_name.to_uppercase(),
                    fallback: Some(Diagnostic::NameFallback {
                        sam_account_name: record.sam_account_name.clone(),
                        reason,
                    }),
                }
            }
        }
    }

    NormalizedKey {
        key: record.sam_account_name.to_uppercase(),
        fallback: None,
    }
}

/// "Last, First Middle" -> uppercase(first 6 chars of the surname token
/// + first 2 chars of the given-name token). Only alphabetic
/// characters, spaces, and commas participate; short tokens contribute
/// whatever they have.
fn display_name_key(display_name: &str) -> Result<String, String> {
    let filtered: String = display_name
        .chars()
        .filter(|c| c.is_alphabetic() || *c == ' ' || *c == ',')
        .collect();

    let (last_part, first_part) = filtered
        .split_once(',')
        .ok_or_else(|| "no comma-separated name parts".to_string())?;

    let surname = last_part
        .split_whitespace()
        .next()
        .ok_or_else(|| "no surname token before the comma".to_string())?;
    let given = first_part
        .split_whitespace()
        .next()
        .ok_or_else(|| "no given-name token after the comma".to_string())?;

    let key: String = surname.chars().take(6).chain(given.chars().take(2)).collect();
    Ok(key.to_uppercase())
}
