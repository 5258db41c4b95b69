#[cfg(test)]
mod tests {
    use crate::codec::header::{ResponseFrame, WireRequest};
    use crate::codec::parser::{parse, parse_datagram};
    use crate::codec::record::{InstanceRecord, Property};

    const BLUE: &str = concat!(
        "ServerName;BLUE;InstanceName;SQL2008;IsClustered;No;Version;10.50.6000.34;tcp;51297;np;\\\\BLUE\\pipe\\MSSQL$SQL2008\\sql\\query;;",
        "ServerName;BLUE;InstanceName;SQL2012STD;IsClustered;No;Version;11.0.5058.0;tcp;1534;np;\\\\BLUE\\pipe\\MSSQL$SQL2012STD\\sql\\query;;",
        "ServerName;BLUE;InstanceName;SQL2014STD;IsClustered;No;Version;12.0.4100.1;tcp;7317;np;\\\\BLUE\\pipe\\MSSQL$SQL2014STD\\sql\\query;;",
    );

    #[test]
    fn test_request_bytes() {
        assert_eq!(WireRequest::broadcast().serialize(), [0x02]);
        assert_eq!(WireRequest::unicast().serialize(), [0x03]);
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse(b"").is_empty());
        assert!(parse(b";;").is_empty());
        assert!(parse(b";").is_empty());
    }

    #[test]
    fn test_parse_single_instance() {
        let input = "ServerName;A;InstanceName;I1;IsClustered;No;Version;1.2.3.4;tcp;1433;;";
        let records = parse(input.as_bytes());

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.server, "A");
        assert_eq!(r.instance, "I1");
        assert_eq!(r.clustered, "No");
        assert_eq!(r.version, "1.2.3.4");
        assert_eq!(r.tcp, "1433");
        assert_eq!(r.np, "");
        assert!(r.props.is_empty());
        assert_eq!(r.raw, input);
        assert!(!r.is_clustered());
    }

    #[test]
    fn test_parse_multiple_instances() {
        let records = parse(BLUE.as_bytes());

        assert_eq!(records.len(), 3);
        let names: Vec<_> = records.iter().map(|r| r.instance.as_str()).collect();
        assert_eq!(names, ["SQL2008", "SQL2012STD", "SQL2014STD"]);
        assert_eq!(records[1].tcp, "1534");
        assert_eq!(records[2].version, "12.0.4100.1");
        assert_eq!(records[0].np, "\\\\BLUE\\pipe\\MSSQL$SQL2008\\sql\\query");
        for r in &records {
            assert_eq!(r.server, "BLUE");
            assert!(r.raw.starts_with("ServerName;BLUE;"));
            assert!(r.raw.ends_with(";;"));
        }
    }

    #[test]
    fn test_parse_two_groups_single_boundary() {
        let input = "ServerName;A;InstanceName;X;Version;9.0.1;tcp;1433;;ServerName;B;InstanceName;Y;Version;10.0.2;tcp;2433;;";
        let records = parse(input.as_bytes());

        assert_eq!(records.len(), 2);
        assert_eq!((records[0].server.as_str(), records[0].tcp.as_str()), ("A", "1433"));
        assert_eq!((records[1].server.as_str(), records[1].tcp.as_str()), ("B", "2433"));
        assert_eq!(records[1].version, "10.0.2");
    }

    #[test]
    fn test_empty_value_is_not_a_terminator() {
        // `InstanceName;;` is an empty value, not the end of the record.
        let records = parse(b"ServerName;A;InstanceName;;tcp;1433;;");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].server, "A");
        assert_eq!(records[0].instance, "");
        assert_eq!(records[0].tcp, "1433");
        assert_eq!(records[0].display_name(), "A");
    }

    #[test]
    fn test_unknown_keys_kept_in_order() {
        let records = parse(b"ServerName;A;AnyKey;AnyValue;via;A,1433;rpc;A;;");

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.server, "A");
        assert_eq!(
            r.props,
            vec![
                Property::new("AnyKey", "AnyValue"),
                Property::new("via", "A,1433"),
                Property::new("rpc", "A"),
            ]
        );
        assert_eq!(r.get("via"), Some("A,1433"));
        assert_eq!(r.instance, "");
        assert_eq!(r.version, "");
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let records = parse(b"servername;a;TCP;1;ServerName;A;;");

        assert_eq!(records[0].server, "A");
        assert_eq!(records[0].tcp, "");
        assert_eq!(records[0].props.len(), 2);
        assert_eq!(records[0].props[0].key, "servername");
        assert_eq!(records[0].props[1].key, "TCP");
    }

    #[test]
    fn test_truncated_property_dropped() {
        let records = parse(b"ServerName;A;InstanceName;I1;Version");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].instance, "I1");
        assert_eq!(records[0].version, "");
        assert_eq!(records[0].raw, "ServerName;A;InstanceName;I1;Version");

        let records = parse(b"ServerName;A;;ServerName;B;Version;1.0");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].server, "A");
        assert_eq!(records[1].server, "B");
        assert_eq!(records[1].version, "");

        assert!(parse(b"ServerName").is_empty());
    }

    #[test]
    fn test_clustered_flag() {
        let records = parse(b"ServerName;C;InstanceName;FCI;IsClustered;Yes;;");
        assert!(records[0].is_clustered());
        assert_eq!(records[0].display_name(), "C\\FCI");
    }

    #[test]
    fn test_frame_declared_length_clamped() {
        let payload = b"ServerName;A;InstanceName;I1;;";
        let mut datagram = vec![0x05, 0xFF, 0xFF];
        datagram.extend_from_slice(payload);

        let frame = ResponseFrame::deserialize(&datagram);
        assert_eq!(frame.declared_len, 0xFFFF);
        assert_eq!(frame.payload, payload);
        assert!(frame.is_truncated());
        assert!(frame.is_expected_tag());

        let records = parse_datagram(&datagram);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].instance, "I1");
    }

    #[test]
    fn test_frame_honours_shorter_declared_length() {
        let mut datagram = vec![0x05, 12, 0];
        datagram.extend_from_slice(b"ServerName;A;InstanceName;I1;;");

        let frame = ResponseFrame::deserialize(&datagram);
        assert_eq!(frame.payload, b"ServerName;A");
        // The server name value is never delimited, so nothing survives.
        assert!(parse(frame.payload).is_empty());
    }

    #[test]
    fn test_frame_clamped_to_max_payload() {
        let mut datagram = vec![0x05, 0xFF, 0xFF];
        datagram.extend(std::iter::repeat_n(b'x', ResponseFrame::MAX_PAYLOAD + 100));

        let frame = ResponseFrame::deserialize(&datagram);
        assert_eq!(frame.payload.len(), ResponseFrame::MAX_PAYLOAD);
    }

    #[test]
    fn test_frame_short_and_odd_tag() {
        assert_eq!(ResponseFrame::deserialize(&[]).payload, b"");
        assert_eq!(ResponseFrame::deserialize(&[0x05, 0x01]).payload, b"");

        let mut datagram = vec![0x04];
        datagram.extend_from_slice(&4u16.to_le_bytes());
        datagram.extend_from_slice(b"a;b;");
        let frame = ResponseFrame::deserialize(&datagram);
        assert!(!frame.is_expected_tag());
        assert_eq!(parse(frame.payload)[0].get("a"), Some("b"));
    }

    #[test]
    fn test_frame_serialize() {
        let datagram = ResponseFrame::serialize(b"ServerName;A;;");
        assert_eq!(datagram[0], 0x05);
        assert_eq!(u16::from_le_bytes([datagram[1], datagram[2]]), 14);
        assert_eq!(parse_datagram(&datagram)[0].server, "A");
    }

    #[test]
    fn test_record_add_routes_fields() {
        let mut r = InstanceRecord::default();
        assert!(r.is_empty());
        r.add(Property::new("np", "\\\\H\\pipe\\sql\\query"));
        r.add(Property::new("Extra", "1"));
        assert_eq!(r.np, "\\\\H\\pipe\\sql\\query");
        assert_eq!(r.props, vec![Property::new("Extra", "1")]);
        assert!(!r.is_empty());
    }
}
