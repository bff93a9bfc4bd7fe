//! X11 property queries

use anyhow::{Context, Result};
use tracing::{debug, warn};
use x11rb::errors::ReplyError;
use x11rb::protocol::xproto::*;

use super::{PropertyLimits, X11Session};
use crate::common::types::WindowHandle;

/// Raw property contents, concatenated across chunks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyValue {
    pub type_: Atom,
    pub format: u8,
    pub value: Vec<u8>,
}

impl PropertyValue {
    /// Items of a format-32 property
    pub fn value32(&self) -> Option<impl Iterator<Item = u32> + '_> {
        (self.format == 32).then(|| {
            self.value
                .chunks_exact(4)
                .map(|b| u32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
        })
    }
}

fn is_bad_window(err: &ReplyError) -> bool {
    matches!(err, ReplyError::X11Error(e) if e.error_kind == x11rb::protocol::ErrorKind::Window)
}

/// Decode a title property into text
///
/// `UTF8_STRING` is decoded as UTF-8, `STRING` as Latin-1; anything else
/// (e.g. `COMPOUND_TEXT`) falls back to lossy UTF-8. Only 8-bit properties
/// carry text.
pub fn decode_title(prop: &PropertyValue) -> Option<String> {
    if prop.format != 8 {
        return None;
    }
    let value = match prop.value.iter().position(|&b| b == 0) {
        Some(end) => &prop.value[..end],
        None => &prop.value[..],
    };
    Some(if prop.type_ == u32::from(AtomEnum::STRING) {
        value.iter().map(|&b| char::from(b)).collect()
    } else {
        String::from_utf8_lossy(value).into_owned()
    })
}

/// One GetProperty reply, as far as chunked reads care
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyChunk {
    pub type_: Atom,
    pub format: u8,
    pub value: Vec<u8>,
    pub bytes_after: u32,
}

impl From<GetPropertyReply> for PropertyChunk {
    fn from(reply: GetPropertyReply) -> Self {
        Self {
            type_: reply.type_,
            format: reply.format,
            value: reply.value,
            bytes_after: reply.bytes_after,
        }
    }
}

/// Result of a chunked read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkedRead {
    /// `None` when the property does not exist
    pub value: Option<PropertyValue>,
    /// Bytes the server still held when the chunk limit was reached
    pub bytes_left: u32,
}

/// Read a property through `fetch(offset)` until the server reports nothing left
///
/// Offsets are in 32-bit units. A reply of type `None` means the property is
/// absent. A reply with no data but a non-zero `bytes_after` is a type
/// mismatch: the actual type is kept and reading stops. After
/// `limits.max_chunks` replies the value is returned as is, with the unread
/// remainder in `bytes_left`.
pub fn read_chunked<F, E>(limits: PropertyLimits, mut fetch: F) -> Result<ChunkedRead, E>
where
    F: FnMut(u32) -> Result<PropertyChunk, E>,
{
    let mut offset: u32 = 0;
    let mut value: Option<PropertyValue> = None;
    let mut bytes_left: u32 = 0;

    for _ in 0..limits.max_chunks {
        let chunk = fetch(offset)?;
        if chunk.type_ == x11rb::NONE {
            return Ok(ChunkedRead { value, bytes_left: 0 });
        }

        let fetched = chunk.value.len() as u32;
        bytes_left = chunk.bytes_after;
        match value.as_mut() {
            Some(prop) => prop.value.extend_from_slice(&chunk.value),
            None => {
                value = Some(PropertyValue {
                    type_: chunk.type_,
                    format: chunk.format,
                    value: chunk.value,
                })
            }
        }

        if bytes_left == 0 || fetched == 0 {
            return Ok(ChunkedRead { value, bytes_left: 0 });
        }
        offset += fetched / 4;
    }

    Ok(ChunkedRead { value, bytes_left })
}

impl X11Session {
    /// Read a whole property, looping until the server reports nothing left
    ///
    /// Returns `Ok(None)` when the property does not exist. Values longer than
    /// `max_chunks` requests are truncated with a warning.
    pub fn read_property(
        &self,
        window: Window,
        property: Atom,
        type_: impl Into<Atom> + Copy,
    ) -> Result<Option<PropertyValue>, ReplyError> {
        let read = read_chunked(self.limits, |offset| {
            let reply = self
                .conn
                .get_property(false, window, property, type_, offset, self.limits.chunk_len)?
                .reply()?;
            Ok::<_, ReplyError>(PropertyChunk::from(reply))
        })?;

        if read.bytes_left > 0 {
            warn!(
                window = window,
                property = property,
                bytes_after = read.bytes_left,
                "Property exceeds read limit, truncating"
            );
        }
        Ok(read.value)
    }

    /// Managed client windows from `_NET_CLIENT_LIST` on the root window
    pub fn get_client_list(&self) -> Result<Vec<Window>> {
        let prop = self
            .read_property(self.root, self.atoms.net_client_list, AtomEnum::WINDOW)
            .context("Failed to query _NET_CLIENT_LIST property")?;

        let Some(prop) = prop else {
            warn!("_NET_CLIENT_LIST is not set; is an EWMH window manager running?");
            return Ok(Vec::new());
        };

        let windows: Vec<Window> = prop
            .value32()
            .ok_or_else(|| anyhow::anyhow!("Invalid return from _NET_CLIENT_LIST"))?
            .collect();

        debug!(count = windows.len(), "Read client list");
        Ok(windows)
    }

    /// Title from `WM_NAME`, falling back to `_NET_WM_NAME` when enabled
    ///
    /// The fallback is consulted only when `WM_NAME` is missing or empty. A
    /// window destroyed while being queried has no title.
    pub fn get_window_title(&self, window: Window) -> Result<Option<String>> {
        let wm_name = match self.read_property(window, self.atoms.wm_name, AtomEnum::ANY) {
            Ok(prop) => prop,
            Err(err) if is_bad_window(&err) => {
                debug!(window = window, "Window destroyed before WM_NAME reply, skipping");
                return Ok(None);
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to get WM_NAME reply for window {}", window));
            }
        };

        let title = wm_name.as_ref().and_then(decode_title);
        if !self.title_fallback || title.as_deref().is_some_and(|t| !t.is_empty()) {
            return Ok(title);
        }

        match self.read_property(window, self.atoms.net_wm_name, self.atoms.utf8_string) {
            Ok(prop) => Ok(prop.as_ref().and_then(decode_title).or(title)),
            Err(err) if is_bad_window(&err) => {
                debug!(window = window, "Window destroyed before _NET_WM_NAME reply, skipping");
                Ok(None)
            }
            Err(err) => Err(err)
                .with_context(|| format!("Failed to get _NET_WM_NAME reply for window {}", window)),
        }
    }

    /// Currently focused window from `_NET_ACTIVE_WINDOW`, if any
    pub fn get_active_window(&self) -> Result<Option<WindowHandle>> {
        let active_window_prop = self
            .conn
            .get_property(false, self.root, self.atoms.net_active_window, AtomEnum::WINDOW, 0, 1)
            .context("Failed to query _NET_ACTIVE_WINDOW property")?
            .reply()
            .context("Failed to get reply for _NET_ACTIVE_WINDOW query")?;

        if active_window_prop.format != 32 || active_window_prop.value.len() < 4 {
            return Ok(None);
        }
        let raw = u32::from_ne_bytes(
            active_window_prop.value[0..4]
                .try_into()
                .context("Invalid _NET_ACTIVE_WINDOW property format")?,
        );
        Ok(WindowHandle::new(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UTF8_STRING: Atom = 300;
    const CARDINAL: Atom = 6;

    /// Serves `data` the way the X server does for GetProperty
    fn serve<'a>(
        type_: Atom,
        data: &'a [u8],
        chunk_len: u32,
        offsets: &'a mut Vec<u32>,
    ) -> impl FnMut(u32) -> Result<PropertyChunk, ()> + 'a {
        move |offset| {
            offsets.push(offset);
            let start = (offset as usize * 4).min(data.len());
            let end = (start + chunk_len as usize * 4).min(data.len());
            Ok(PropertyChunk {
                type_,
                format: 32,
                value: data[start..end].to_vec(),
                bytes_after: (data.len() - end) as u32,
            })
        }
    }

    fn limits(chunk_len: u32, max_chunks: u32) -> PropertyLimits {
        PropertyLimits {
            chunk_len,
            max_chunks,
        }
    }

    fn window_list(ids: std::ops::Range<u32>) -> Vec<u8> {
        ids.flat_map(u32::to_ne_bytes).collect()
    }

    #[test]
    fn test_read_concatenates_chunks() {
        let data = window_list(1..6);
        let mut offsets = Vec::new();
        let read = read_chunked(limits(2, 64), serve(CARDINAL, &data, 2, &mut offsets)).unwrap();

        let value = read.value.unwrap();
        assert_eq!(value.value, data);
        assert_eq!(value.value32().unwrap().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        assert_eq!(read.bytes_left, 0);
        assert_eq!(offsets, vec![0, 2, 4]);
    }

    #[test]
    fn test_read_offsets_advance_in_32_bit_units() {
        let data = window_list(0..10);
        let mut offsets = Vec::new();
        read_chunked(limits(3, 64), serve(CARDINAL, &data, 3, &mut offsets)).unwrap();
        assert_eq!(offsets, vec![0, 3, 6, 9]);
    }

    #[test]
    fn test_read_truncates_at_chunk_limit() {
        let data = window_list(0..5);
        let mut offsets = Vec::new();
        let read = read_chunked(limits(1, 2), serve(CARDINAL, &data, 1, &mut offsets)).unwrap();

        assert_eq!(offsets, vec![0, 1]);
        assert_eq!(read.value.unwrap().value, window_list(0..2));
        assert_eq!(read.bytes_left, 12);
    }

    #[test]
    fn test_read_exactly_at_chunk_limit_is_not_truncated() {
        let data = window_list(0..4);
        let mut offsets = Vec::new();
        let read = read_chunked(limits(2, 2), serve(CARDINAL, &data, 2, &mut offsets)).unwrap();

        assert_eq!(read.value.unwrap().value, data);
        assert_eq!(read.bytes_left, 0);
    }

    #[test]
    fn test_read_absent_property() {
        let mut offsets = Vec::new();
        let read = read_chunked(limits(1024, 64), serve(x11rb::NONE, &[], 1024, &mut offsets))
            .unwrap();
        assert_eq!(read.value, None);
        assert_eq!(offsets, vec![0]);
    }

    #[test]
    fn test_read_type_mismatch_stops_after_one_reply() {
        let mut fetches = 0;
        let read = read_chunked(limits(1024, 64), |_| {
            fetches += 1;
            Ok::<_, ()>(PropertyChunk {
                type_: AtomEnum::STRING.into(),
                format: 8,
                value: Vec::new(),
                bytes_after: 17,
            })
        })
        .unwrap();

        assert_eq!(fetches, 1);
        let value = read.value.unwrap();
        assert_eq!(value.type_, u32::from(AtomEnum::STRING));
        assert!(value.value.is_empty());
        assert_eq!(read.bytes_left, 0);
    }

    #[test]
    fn test_read_propagates_fetch_error() {
        let result = read_chunked(limits(1024, 64), |_| Err::<PropertyChunk, _>("gone"));
        assert_eq!(result, Err("gone"));
    }

    fn prop(type_: Atom, format: u8, value: &[u8]) -> PropertyValue {
        PropertyValue {
            type_,
            format,
            value: value.to_vec(),
        }
    }

    #[test]
    fn test_decode_latin1_string() {
        let p = prop(AtomEnum::STRING.into(), 8, b"Caf\xE9");
        assert_eq!(decode_title(&p).as_deref(), Some("Café"));
    }

    #[test]
    fn test_decode_utf8_string() {
        let p = prop(UTF8_STRING, 8, "Firefox – Mozilla".as_bytes());
        assert_eq!(decode_title(&p).as_deref(), Some("Firefox – Mozilla"));
    }

    #[test]
    fn test_decode_stops_at_nul() {
        let p = prop(UTF8_STRING, 8, b"Terminal\0garbage");
        assert_eq!(decode_title(&p).as_deref(), Some("Terminal"));
    }

    #[test]
    fn test_decode_empty_is_present() {
        assert_eq!(decode_title(&prop(UTF8_STRING, 8, b"")).as_deref(), Some(""));
        assert_eq!(decode_title(&prop(UTF8_STRING, 8, b"\0")).as_deref(), Some(""));
    }

    #[test]
    fn test_decode_rejects_wrong_format() {
        let p = prop(AtomEnum::WINDOW.into(), 32, &10u32.to_ne_bytes());
        assert_eq!(decode_title(&p), None);
    }

    #[test]
    fn test_value32_reads_native_endian_ids() {
        let mut bytes = Vec::new();
        for id in [10u32, 0, 30] {
            bytes.extend_from_slice(&id.to_ne_bytes());
        }
        let p = prop(AtomEnum::WINDOW.into(), 32, &bytes);
        assert_eq!(p.value32().unwrap().collect::<Vec<_>>(), vec![10, 0, 30]);
    }

    #[test]
    fn test_value32_requires_format_32() {
        assert!(prop(UTF8_STRING, 8, b"abcd").value32().is_none());
    }
}
