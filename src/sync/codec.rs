//! XML document codec.
//!
//! Parses a `<jobs>` document into a validated [`JobMap`] and serializes a
//! sequence of jobs back into the same shape:
//!
//! ```xml
//! <jobs>
//!   <job>
//!     <depCode>D1</depCode>
//!     <depJob>Engineer</depJob>
//!     <description>Optional</description>
//!   </job>
//! </jobs>
//! ```
//!
//! Parsing is strict: any structural violation or invalid job aborts the
//! whole document, so callers never see a partial collection.
//!
//! Input is transcoded to UTF-8 before parsing. The encoding comes from a
//! byte order mark, then the 16-bit `<?` signature, then the `encoding`
//! pseudo-attribute of the declaration, and defaults to UTF-8.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use tracing::debug;

use crate::model::{Job, JobMap};
use crate::sync::types::{SyncError, SyncResult};
use crate::validate::{validate_job, JobFields};

const ROOT: &str = "jobs";
const JOB: &str = "job";
const DEP_CODE: &str = "depCode";
const DEP_JOB: &str = "depJob";
const DESCRIPTION: &str = "description";

/// A recognized child element of `<job>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    DepCode,
    DepJob,
    Description,
}

impl Field {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            n if n == DEP_CODE.as_bytes() => Some(Self::DepCode),
            n if n == DEP_JOB.as_bytes() => Some(Self::DepJob),
            n if n == DESCRIPTION.as_bytes() => Some(Self::Description),
            _ => None,
        }
    }

    fn slot(self, fields: &mut JobFields) -> &mut Option<String> {
        match self {
            Self::DepCode => &mut fields.dep_code,
            Self::DepJob => &mut fields.dep_job,
            Self::Description => &mut fields.description,
        }
    }
}

/// Parse an XML document into a keyed collection of jobs.
///
/// Jobs are validated and keyed one at a time in document order, so for a
/// repeated natural key the first occurrence is accepted and the second
/// fails. Parsed jobs carry no id.
///
/// # Errors
///
/// - [`SyncError::Format`] for a wrong root, unexpected elements, repeated
///   or unknown job fields, duplicate natural keys, and ill-formed XML
/// - [`SyncError::Validation`] for a missing natural key or an overlong field
pub fn parse_document(bytes: &[u8]) -> SyncResult<JobMap> {
    let text = decode_document(bytes)?;
    let mut reader = Reader::from_str(&text);
    let mut buf = Vec::new();

    let mut jobs = JobMap::new();
    let mut depth = 0usize;
    let mut seen_root = false;
    let mut current: Option<JobFields> = None;
    let mut field: Option<(Field, String)> = None;

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|e| {
            SyncError::format(format!(
                "malformed XML at position {}: {e}",
                reader.buffer_position()
            ))
        })?;

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                let name = e.name();

                match depth {
                    0 => {
                        if seen_root || name.as_ref() != ROOT.as_bytes() {
                            return Err(SyncError::format("invalid root"));
                        }
                        seen_root = true;
                    }
                    1 => {
                        if name.as_ref() != JOB.as_bytes() {
                            return Err(SyncError::format("unexpected element"));
                        }
                        if is_empty {
                            accept_job(&mut jobs, JobFields::default())?;
                        } else {
                            current = Some(JobFields::default());
                        }
                    }
                    2 => {
                        let fields = current.as_mut().ok_or_else(unbalanced)?;
                        let Some(f) = Field::from_name(name.as_ref())
                            .filter(|f| f.slot(fields).is_none())
                        else {
                            return Err(SyncError::format("duplicate or unsupported field"));
                        };
                        if is_empty {
                            *f.slot(fields) = Some(String::new());
                        } else {
                            field = Some((f, String::new()));
                        }
                    }
                    // Markup nested inside a field contributes only its text
                    _ => {}
                }

                if !is_empty {
                    depth += 1;
                }
            }
            Event::Text(ref t) => {
                if depth == 0 && !t.iter().all(u8::is_ascii_whitespace) {
                    return Err(SyncError::format("text outside root element"));
                }
                if let Some((_, value)) = field.as_mut() {
                    let text = t
                        .unescape()
                        .map_err(|e| SyncError::format(format!("malformed XML: {e}")))?;
                    value.push_str(&text);
                }
            }
            Event::CData(ref c) => {
                if depth == 0 {
                    return Err(SyncError::format("text outside root element"));
                }
                if let Some((_, value)) = field.as_mut() {
                    let text = std::str::from_utf8(c)
                        .map_err(|e| SyncError::format(format!("malformed XML: {e}")))?;
                    value.push_str(text);
                }
            }
            Event::End(_) => {
                depth = depth.checked_sub(1).ok_or_else(unbalanced)?;
                match depth {
                    2 => {
                        if let Some((f, value)) = field.take() {
                            let fields = current.as_mut().ok_or_else(unbalanced)?;
                            *f.slot(fields) = Some(value);
                        }
                    }
                    1 => {
                        let fields = current.take().ok_or_else(unbalanced)?;
                        accept_job(&mut jobs, fields)?;
                    }
                    _ => {}
                }
            }
            Event::Eof => {
                if !seen_root {
                    return Err(SyncError::format("invalid root"));
                }
                if depth > 0 {
                    return Err(SyncError::format(
                        "malformed XML: unexpected end of document",
                    ));
                }
                break;
            }
            // Declarations, comments, processing instructions, doctype
            _ => {}
        }
        buf.clear();
    }

    debug!(jobs = jobs.len(), "Parsed document");
    Ok(jobs)
}

/// Decode raw document bytes into UTF-8 text, without the byte order mark.
fn decode_document(bytes: &[u8]) -> SyncResult<Cow<'_, str>> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
        None => (sniff_encoding(bytes)?, bytes),
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or_else(|| {
            SyncError::format(format!(
                "malformed XML: invalid byte sequence for {}",
                encoding.name()
            ))
        })
}

/// Pick the encoding of a document that has no byte order mark.
fn sniff_encoding(bytes: &[u8]) -> SyncResult<&'static Encoding> {
    match bytes {
        [b'<', 0, b'?', 0, ..] => Ok(UTF_16LE),
        [0, b'<', 0, b'?', ..] => Ok(UTF_16BE),
        _ => match declared_encoding(bytes) {
            // A 16-bit label on 8-bit bytes is a mislabel; the bytes win
            Some(label) => Encoding::for_label(label)
                .map(|e| if e.is_ascii_compatible() { e } else { UTF_8 })
                .ok_or_else(|| {
                    SyncError::format(format!(
                        "unsupported encoding: {}",
                        String::from_utf8_lossy(label)
                    ))
                }),
            None => Ok(UTF_8),
        },
    }
}

/// The `encoding` value of an ASCII-compatible XML declaration, if any.
fn declared_encoding(bytes: &[u8]) -> Option<&[u8]> {
    let decl = bytes.strip_prefix(b"<?xml")?;
    let decl = &decl[..decl.windows(2).position(|w| w == b"?>")?];

    let at = decl.windows(8).position(|w| w == b"encoding")?;
    let value = decl[at + 8..].trim_ascii_start().strip_prefix(b"=")?.trim_ascii_start();
    let (&quote, value) = value.split_first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let len = value.iter().position(|&b| b == quote)?;
    Some(&value[..len])
}

/// Validate a finished `<job>` and add it under its natural key.
fn accept_job(jobs: &mut JobMap, fields: JobFields) -> SyncResult<()> {
    let job = validate_job(fields)?;
    let key = job.key();

    if jobs.contains_key(&key) {
        return Err(SyncError::format(format!("duplicate natural key: {key}")));
    }
    jobs.insert(key, job);
    Ok(())
}

fn unbalanced() -> SyncError {
    SyncError::format("malformed XML: unbalanced elements")
}

/// Serialize jobs into an XML document, preserving the given order.
///
/// `depCode` and `depJob` are always written; `description` only when
/// present. Ids are not serialized.
///
/// # Errors
///
/// Returns an error if the XML writer fails.
pub fn serialize_document(jobs: &[Job]) -> SyncResult<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(write_error)?;
    writer
        .write_event(Event::Start(BytesStart::new(ROOT)))
        .map_err(write_error)?;

    for job in jobs {
        writer
            .write_event(Event::Start(BytesStart::new(JOB)))
            .map_err(write_error)?;
        write_field(&mut writer, DEP_CODE, &job.dep_code)?;
        write_field(&mut writer, DEP_JOB, &job.dep_job)?;
        if let Some(description) = &job.description {
            write_field(&mut writer, DESCRIPTION, description)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(JOB)))
            .map_err(write_error)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new(ROOT)))
        .map_err(write_error)?;

    let mut out = writer.into_inner();
    out.push(b'\n');

    debug!(jobs = jobs.len(), bytes = out.len(), "Serialized document");
    Ok(out)
}

/// Write `<name>value</name>` with the value kept verbatim (escaped).
fn write_field(writer: &mut Writer<Vec<u8>>, name: &str, value: &str) -> SyncResult<()> {
    writer
        .create_element(name)
        .write_text_content(BytesText::new(value))
        .map_err(write_error)?;
    Ok(())
}

fn write_error(err: impl std::fmt::Display) -> SyncError {
    SyncError::Io(std::io::Error::other(format!("XML write failed: {err}")))
}
