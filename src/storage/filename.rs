//! Stored filename generation
//!
//! Uploaded files are renamed to `<stem>-<unix millis>-<8 hex chars><ext>`,
//! where `<stem>` is the original base name with whitespace runs collapsed
//! to `-` and lowercased. The time plus random suffix keeps names unique
//! without any coordination between concurrent uploads.

use chrono::{DateTime, Utc};
use rand::RngCore;

const RANDOM_SUFFIX_BYTES: usize = 4;

/// Build the name an upload is stored under.
pub fn storage_filename<R: RngCore + ?Sized>(
    original_name: &str,
    now: DateTime<Utc>,
    rng: &mut R,
) -> String {
    let base = base_name(original_name);
    let (stem, extension) = split_extension(base);
    let stem = collapse_whitespace(stem).to_lowercase();

    let mut token = [0u8; RANDOM_SUFFIX_BYTES];
    rng.fill_bytes(&mut token);

    format!(
        "{}-{}-{}{}",
        stem,
        now.timestamp_millis(),
        hex::encode(token),
        extension
    )
}

/// Last path component, so a client-supplied name can never point outside
/// the uploads directory.
fn base_name(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

/// Split at the last dot. A leading dot (`.profile`) is part of the stem.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_whitespace = false;
    for c in s.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('-');
            }
            in_whitespace = true;
        } else {
            out.push(c);
            in_whitespace = false;
        }
    }
    out
}
