use super::header::ResponseFrame;
use super::record::{InstanceRecord, Property};

const DELIMITER: u8 = b';';

fn find_delimiter(data: &[u8], from: usize) -> Option<usize> {
    data[from..]
        .iter()
        .position(|&b| b == DELIMITER)
        .map(|offset| from + offset)
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Parses a semicolon-delimited SSRP payload into instance records.
///
/// A payload may describe several instances, each terminated by an empty
/// key (`...;;`). `;;` cannot be searched for directly because an empty
/// value followed by the next key's delimiter looks the same, so the
/// terminator is recognised by the key being empty.
///
/// A key or value left without its delimiter at the end of the buffer is
/// dropped. Records that decoded no property at all are not returned.
pub fn parse(data: &[u8]) -> Vec<InstanceRecord> {
    let mut records = vec![InstanceRecord::default()];

    let mut line = 0;
    let mut pos = 0;

    while let Some(key_end) = find_delimiter(data, pos) {
        let key = &data[pos..key_end];
        pos = key_end + 1;

        if key.is_empty() {
            if let Some(current) = records.last_mut() {
                current.raw = text(&data[line..pos]);
            }
            records.push(InstanceRecord::default());
            line = pos;
            continue;
        }

        let Some(value_end) = find_delimiter(data, pos) else {
            break;
        };

        if let Some(current) = records.last_mut() {
            current.add(Property::new(text(key), text(&data[pos..value_end])));
        }
        pos = value_end + 1;
    }

    if let Some(current) = records.last_mut() {
        current.raw = text(&data[line..]);
    }

    records.retain(|r| !r.is_empty());
    records
}

/// Parses a whole datagram: framing first, then the payload.
pub fn parse_datagram(datagram: &[u8]) -> Vec<InstanceRecord> {
    parse(ResponseFrame::deserialize(datagram).payload)
}
