//! vCard 3.0 export.
//!
//! [`export_vcard`] turns a [`ContactRecord`] into the text of a `.vcf` file.
//! It is total: any record serializes, empty optional fields are skipped
//! rather than emitted as empty properties.
//!
//! ## Emission order
//!
//! ```text
//! BEGIN:VCARD
//! VERSION:3.0
//! FN:<name>                          always
//! N:<last>;<first>;;;                always
//! TITLE:<title>                      if non-empty
//! NOTE:<description>                 if non-empty
//! TEL;TYPE=CELL:+<phone>             if non-empty
//! EMAIL;TYPE=INTERNET:<email>        if non-empty, unescaped
//! URL:<website>                      if non-empty, unescaped
//! ADR;TYPE=WORK:;;;;;;<city>         if non-empty
//! PHOTO;VALUE=URI:<avatar url>       if present
//! X-SOCIALPROFILE;TYPE=<KIND>:<url>  per visible social link, in order
//! END:VCARD
//! ```
//!
//! Lines are joined with CRLF and there is no trailing line break.
//!
//! Only FN, N, TITLE, NOTE and the ADR city are escaped. EMAIL, URL, PHOTO and
//! social URLs go out verbatim, and the city sits in the seventh ADR
//! component; address-book imports already rely on both.

use crate::types::ContactRecord;

pub const LINE_ENDING: &str = "\r\n";

/// Media type of an exported card.
pub const VCARD_MEDIA_TYPE: &str = "text/vcard;charset=utf-8";

/// Escape a text value: `\` → `\\`, `;` → `\;`, `,` → `\,`, newline → `\n`.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out
}

/// Inverse of [`escape`].
///
/// `\n` and `\N` both decode to a newline; any other escaped character
/// decodes to itself. A lone trailing backslash is kept.
pub fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Split a display name into `(first, last)`.
///
/// The last whitespace-separated token is the last name; the rest, joined
/// by single spaces, is the first name. A single token is all first name.
pub fn split_name(name: &str) -> (String, String) {
    let tokens: Vec<&str> = name.split_whitespace().collect();
    match tokens.split_last() {
        Some((last, rest)) if !rest.is_empty() => (rest.join(" "), last.to_string()),
        Some((only, _)) => (only.to_string(), String::new()),
        None => (String::new(), String::new()),
    }
}

/// The document's lines in emission order, without line endings.
pub fn lines(record: &ContactRecord) -> Vec<String> {
    let mut lines = vec!["BEGIN:VCARD".to_string(), "VERSION:3.0".to_string()];

    lines.push(format!("FN:{}", escape(&record.name)));

    let (first, last) = split_name(&record.name);
    lines.push(format!("N:{};{};;;", escape(&last), escape(&first)));

    if !record.title.is_empty() {
        lines.push(format!("TITLE:{}", escape(&record.title)));
    }
    if !record.description.is_empty() {
        lines.push(format!("NOTE:{}", escape(&record.description)));
    }
    if !record.phone.is_empty() {
        let plus = if record.phone.starts_with('+') { "" } else { "+" };
        lines.push(format!("TEL;TYPE=CELL:{}{}", plus, record.phone));
    }
    if !record.email.is_empty() {
        lines.push(format!("EMAIL;TYPE=INTERNET:{}", record.email));
    }
    if !record.website.is_empty() {
        lines.push(format!("URL:{}", record.website));
    }
    if !record.city.is_empty() {
        lines.push(format!("ADR;TYPE=WORK:;;;;;;{}", escape(&record.city)));
    }
    if let Some(avatar) = record.avatar_url.as_deref().filter(|a| !a.is_empty()) {
        lines.push(format!("PHOTO;VALUE=URI:{}", avatar));
    }
    for link in record.social_links.iter().filter(|l| l.visible) {
        lines.push(format!(
            "X-SOCIALPROFILE;TYPE={}:{}",
            link.kind.as_str().to_uppercase(),
            link.url
        ));
    }

    lines.push("END:VCARD".to_string());
    lines
}

/// Serialize a record as a vCard 3.0 document.
pub fn export_vcard(record: &ContactRecord) -> String {
    lines(record).join(LINE_ENDING)
}
