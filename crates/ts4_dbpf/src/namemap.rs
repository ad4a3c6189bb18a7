//! Decoding of name map resources.
//!
//! A name map resource (type `0x0166038C`) associates instance ids with the
//! names the creator gave them.
//!
//! | Offset (bytes) | Field        | Description                                    |
//! |----------------|--------------|------------------------------------------------|
//! | 0x0000         | Version      | 4 bytes: always 1                              |
//! | 0x0004         | Count        | 4 bytes: signed number of entries              |
//! | 0x0008         | Entries      | `Count` records                                |
//!
//! Each record is the instance as two 4-byte words (low word first), a 4-byte
//! byte length and that many bytes of UTF-8.

use derive_more::derive::{Constructor, Deref, IntoIterator};
use std::collections::HashMap;
use tracing::{instrument, warn};

use crate::cursor::ByteCursor;
use crate::error::Result;

/// Version of the name map layout this reader understands
pub const NAME_MAP_VERSION: u32 = 1;

/// Instance id to name table
#[derive(Constructor, Clone, Debug, Default, PartialEq, Eq, Deref, IntoIterator)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NameMap(HashMap<u64, String>);

impl NameMap {
    /// Add every entry of `other`, replacing names of instances already present
    pub fn merge(&mut self, other: NameMap) {
        self.0.extend(other.0);
    }

    /// Name of an instance, if it has one
    pub fn name(&self, instance: u64) -> Option<&str> {
        self.0.get(&instance).map(String::as_str)
    }
}

fn read_record(cursor: &mut ByteCursor<'_>) -> Result<(u64, String)> {
    let instance = cursor.read_u64_split()?;
    let length = cursor.read_u32()? as usize;
    let bytes = cursor.read_bytes(length)?;
    let name = String::from_utf8_lossy(bytes).replace('\0', "");
    Ok((instance, name))
}

/// Decode a name map payload
///
/// Never fails: a malformed payload yields the entries read before the problem
/// and a warning.
#[instrument(skip(data), fields(len = data.len()))]
pub fn decode_name_map(data: &[u8]) -> NameMap {
    let mut map = NameMap::default();
    let mut cursor = ByteCursor::new(data);

    let (version, count) = match (cursor.read_u32(), cursor.read_i32()) {
        (Ok(version), Ok(count)) => (version, count),
        _ => {
            warn!("name map is too short to hold a header");
            return map;
        }
    };

    if version != NAME_MAP_VERSION {
        warn!(version, "unexpected name map version, expected {NAME_MAP_VERSION}");
    }

    for index in 0..count.max(0) {
        match read_record(&mut cursor) {
            Ok((instance, name)) => {
                map.0.insert(instance, name);
            }
            Err(error) => {
                warn!(index, count, %error, "name map ends early");
                break;
            }
        }
    }

    map
}

#[cfg(test)]
mod test {
    use byteorder::{LittleEndian, WriteBytesExt};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use tracing_test::traced_test;

    use crate::namemap::{decode_name_map, NameMap};

    fn payload(version: u32, count: i32, records: &[(u64, &[u8])]) -> Vec<u8> {
        let mut data = Vec::new();
        data.write_u32::<LittleEndian>(version).unwrap();
        data.write_i32::<LittleEndian>(count).unwrap();
        for (instance, name) in records {
            data.write_u32::<LittleEndian>(*instance as u32).unwrap();
            data.write_u32::<LittleEndian>((*instance >> 32) as u32).unwrap();
            data.write_u32::<LittleEndian>(name.len() as u32).unwrap();
            data.extend_from_slice(name);
        }
        data
    }

    #[test]
    fn read_name_map() {
        #[rustfmt::skip]
        let input = [
            0x01, 0x00, 0x00, 0x00,
            0x02, 0x00, 0x00, 0x00,
            0x0F, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
            0x04, 0x00, 0x00, 0x00,
            b'h', b'a', b'i', b'r',
            0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x05, 0x00, 0x00, 0x00,
            b'b', b'a', 0x00, b'n', b'g',
        ];

        let map = decode_name_map(&input);
        assert_eq!(
            map,
            NameMap::new(HashMap::from([
                (0x0000_0001_0000_000F, "hair".to_string()),
                (0x10, "bang".to_string()),
            ]))
        );
        assert_eq!(map.name(0x10), Some("bang"));
        assert_eq!(map.name(0x11), None);
    }

    #[traced_test]
    #[test]
    fn truncated_after_last_string() {
        let mut input = payload(1, 3, &[(1, b"one"), (2, b"two"), (3, b"three")]);
        input.truncate(input.len() - 3);

        let map = decode_name_map(&input);
        assert_eq!(map.len(), 2);
        assert_eq!(map.name(1), Some("one"));
        assert_eq!(map.name(2), Some("two"));
        assert!(logs_contain("name map ends early"));
    }

    #[test]
    fn truncated_inside_instance() {
        let mut input = payload(1, 2, &[(1, b"one"), (2, b"two")]);
        input.truncate(8 + 15 + 6);

        assert_eq!(decode_name_map(&input).len(), 1);
    }

    #[traced_test]
    #[test]
    fn unexpected_version_still_decodes() {
        let input = payload(7, 1, &[(42, b"answer")]);

        let map = decode_name_map(&input);
        assert_eq!(map.name(42), Some("answer"));
        assert!(logs_contain("unexpected name map version"));
    }

    #[test]
    fn degenerate_payloads() {
        assert!(decode_name_map(&[]).is_empty());
        assert!(decode_name_map(&[0x01, 0x00, 0x00]).is_empty());
        assert!(decode_name_map(&payload(1, -5, &[(1, b"x")])).is_empty());
        assert!(decode_name_map(&payload(1, 0, &[(1, b"x")])).is_empty());
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let input = payload(1, 1, &[(9, &[b'a', 0xFF, b'b'])]);
        assert_eq!(decode_name_map(&input).name(9), Some("a\u{FFFD}b"));
    }

    #[test]
    fn merge_last_wins() {
        let mut first = NameMap::new(HashMap::from([(1, "a".into()), (2, "b".into())]));
        let second = NameMap::new(HashMap::from([(2, "c".into()), (3, "d".into())]));

        first.merge(second);
        assert_eq!(first.len(), 3);
        assert_eq!(first.name(2), Some("c"));
    }
}
