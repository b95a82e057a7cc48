#![cfg(test)]

use std::io::{Cursor, Seek, SeekFrom};
use crate::ident::{Class, Tag};
use crate::node::{Node, NodeType};
use super::*;

/// An OID followed by a SET containing a single INTEGER.
const OID_AND_SET: &[u8] = b"\
    \x06\x09\x2b\x06\x01\x04\x01\x82\x37\x15\x14\
    \x31\x03\x02\x01\x09\
";

/// An OID followed by a SET of a SEQUENCE of an INTEGER and three
/// UTF8Strings.
const COMPLEX: &[u8] = b"\
    \x06\x09\x2b\x06\x01\x04\x01\x82\x37\x15\x14\
    \x31\x4a\
        \x30\x48\
            \x02\x01\x09\
            \x0c\x23vich3d.jdomcsc.nttest.microsoft.com\
            \x0c\x15JDOMCSC\\administrator\
            \x0c\x07certreq\
";

/// An indefinite length SEQUENCE containing an OCTET STRING.
const INDEFINITE: &[u8] = b"\x30\x80\x04\x03\x56\x78\x90\x00\x00";

fn ber_reader(data: &[u8]) -> BerReader<Cursor<&[u8]>> {
    BerReader::new(Cursor::new(data))
}

fn step<'a>(
    reader: &'a mut BerReader<Cursor<&[u8]>>,
    node_type: NodeType,
    tag: Tag,
    length: u64,
    depth: usize,
) -> &'a Node {
    let node = reader.step().unwrap();
    assert_eq!(node.node_type(), node_type);
    assert_eq!(node.tag(), tag);
    assert_eq!(node.length(), length);
    assert_eq!(reader.depth(), depth);
    reader.current()
}

#[test]
fn starts_at_document_start() {
    let reader = ber_reader(b"");
    let node = reader.current();
    assert_eq!(node.node_type(), NodeType::DocumentStart);
    assert_eq!(node.tag(), Tag::END_OF_CONTENTS);
    assert_eq!(node.length(), 0);
    assert_eq!(reader.depth(), 0);
}

#[test]
fn does_not_touch_source_before_step() {
    let mut cursor = Cursor::new(OID_AND_SET);
    cursor.seek(SeekFrom::Start(3)).unwrap();
    {
        let reader = BerReader::new(&mut cursor);
        assert_eq!(reader.current().node_type(), NodeType::DocumentStart);
    }
    assert_eq!(cursor.position(), 3);
}

#[test]
fn borrowed_source_stays_usable() {
    let mut cursor = Cursor::new(OID_AND_SET);
    {
        let mut reader = BerReader::new(&mut cursor);
        reader.step().unwrap();
    }
    cursor.seek(SeekFrom::Start(0)).unwrap();
    let mut reader = BerReader::new(&mut cursor);
    assert_eq!(reader.step().unwrap().tag(), Tag::OID);
}

#[test]
fn owned_source_is_returned() {
    let mut reader = ber_reader(OID_AND_SET);
    reader.step().unwrap();
    let cursor = reader.into_inner();
    assert_eq!(cursor.get_ref().len(), OID_AND_SET.len());
}

#[test]
fn empty_source() {
    let mut reader = ber_reader(b"");
    assert_eq!(reader.step().unwrap().node_type(), NodeType::DocumentEnd);
    assert_eq!(reader.step().unwrap().node_type(), NodeType::DocumentEnd);
    let root = reader.read_to_end();
    assert!(root.is_err());
}

#[test]
fn object_identifier() {
    let mut reader = ber_reader(OID_AND_SET);
    let node = reader.step().unwrap().clone();
    assert_eq!(node.node_type(), NodeType::Primitive);
    assert_eq!(node.tag(), Tag::OID);
    assert_eq!(node.length(), 9);
    assert!(node.raw().is_none());

    let mut node = node;
    reader.load_content(&mut node).unwrap();
    assert_eq!(node.to_oid().unwrap().to_string(), "1.3.6.1.4.1.311.21.20");
}

#[test]
fn set_start_and_end() {
    let mut reader = ber_reader(OID_AND_SET);
    step(&mut reader, NodeType::Primitive, Tag::OID, 9, 0);
    let set = step(&mut reader, NodeType::ConstructedStart, Tag::SET, 3, 0);
    assert!(set.is_constructed());
    step(&mut reader, NodeType::Primitive, Tag::INTEGER, 1, 1);
    let end = step(&mut reader, NodeType::ConstructedEnd, Tag::SET, 0, 1);
    assert!(end.is_constructed());
    step(&mut reader, NodeType::DocumentEnd, Tag::END_OF_CONTENTS, 0, 0);
    step(&mut reader, NodeType::DocumentEnd, Tag::END_OF_CONTENTS, 0, 0);
}

#[test]
fn complex_parse() {
    let mut reader = ber_reader(COMPLEX);

    step(&mut reader, NodeType::Primitive, Tag::OID, 9, 0);
    assert_eq!(
        reader.load_current_content().unwrap().to_oid().unwrap().to_string(),
        "1.3.6.1.4.1.311.21.20"
    );
    step(&mut reader, NodeType::ConstructedStart, Tag::SET, 0x4a, 0);
    step(&mut reader, NodeType::ConstructedStart, Tag::SEQUENCE, 0x48, 1);
    step(&mut reader, NodeType::Primitive, Tag::INTEGER, 1, 2);
    assert_eq!(
        reader.load_current_content().unwrap().to_integer().unwrap()
            .to_i64(),
        Some(9)
    );
    for (len, text) in [
        (0x23, "vich3d.jdomcsc.nttest.microsoft.com"),
        (0x15, "JDOMCSC\\administrator"),
        (0x07, "certreq"),
    ] {
        step(&mut reader, NodeType::Primitive, Tag::UTF8_STRING, len, 2);
        assert_eq!(
            reader.load_current_content().unwrap().to_utf8_string().unwrap(),
            text
        );
    }
    step(&mut reader, NodeType::ConstructedEnd, Tag::SEQUENCE, 0, 2);
    step(&mut reader, NodeType::ConstructedEnd, Tag::SET, 0, 1);
    step(&mut reader, NodeType::DocumentEnd, Tag::END_OF_CONTENTS, 0, 0);
}

#[test]
fn read_to_end_tree() {
    let root = ber_reader(COMPLEX).read_to_end().unwrap();
    assert_eq!(root.node_type(), NodeType::DocumentStart);
    assert_eq!(root.children().len(), 2);

    let oid = &root.children()[0];
    assert_eq!(oid.tag(), Tag::OID);
    assert!(oid.children().is_empty());

    let set = &root.children()[1];
    assert_eq!(set.tag(), Tag::SET);
    assert_eq!(set.children().len(), 1);

    let seq = &set.children()[0];
    assert_eq!(seq.tag(), Tag::SEQUENCE);
    assert_eq!(seq.children().len(), 4);
    assert!(seq.children().iter().all(|child| child.raw().is_none()));

    // Siblings never exceed the content of their parent.
    let total: u64 = seq.children().iter().map(|child| {
        child.end() - child.start()
    }).sum();
    assert_eq!(total, seq.length());
}

#[test]
fn read_to_end_with_content() {
    let mut reader = BerReader::with_options(
        Cursor::new(COMPLEX), Options::default().read_content(true)
    );
    let root = reader.read_to_end().unwrap();
    let seq = &root.children()[1].children()[0];
    assert_eq!(seq.children()[3].to_utf8_string().unwrap(), "certreq");
    assert!(seq.raw().is_none());
}

#[test]
fn multiple_roots() {
    let root = ber_reader(OID_AND_SET).read_to_end().unwrap();
    assert_eq!(root.children().len(), 2);
    assert_eq!(root.children()[0].tag(), Tag::OID);
    assert_eq!(root.children()[1].tag(), Tag::SET);
    assert_eq!(root.children()[1].children()[0].tag(), Tag::INTEGER);
}

#[test]
fn indefinite_length() {
    let root = ber_reader(INDEFINITE).read_to_end().unwrap();
    assert_eq!(root.children().len(), 1);

    let seq = &root.children()[0];
    assert!(seq.is_indefinite());
    assert_eq!(seq.length(), 5);
    assert_eq!(seq.end(), 9);
    assert_eq!(seq.children().len(), 2);

    let octets = &seq.children()[0];
    assert_eq!(octets.tag(), Tag::OCTET_STRING);
    assert_eq!(octets.length(), 3);

    let eoc = &seq.children()[1];
    assert_eq!(eoc.class(), Class::Universal);
    assert!(!eoc.is_constructed());
    assert_eq!(eoc.tag(), Tag::END_OF_CONTENTS);
    assert_eq!(eoc.length(), 0);
}

#[test]
fn nested_indefinite_length() {
    // SEQUENCE (indefinite) { SEQUENCE (indefinite) { NULL }, INTEGER 5 }
    let data = b"\
        \x30\x80\x30\x80\x05\x00\x00\x00\
        \x02\x01\x05\x00\x00\x01\x01\xff\
    ";
    let mut reader = ber_reader(data);
    step(&mut reader, NodeType::ConstructedStart, Tag::SEQUENCE, 9, 0);
    step(&mut reader, NodeType::ConstructedStart, Tag::SEQUENCE, 2, 1);
    step(&mut reader, NodeType::Primitive, Tag::NULL, 0, 2);
    step(&mut reader, NodeType::Primitive, Tag::END_OF_CONTENTS, 0, 2);
    step(&mut reader, NodeType::ConstructedEnd, Tag::SEQUENCE, 0, 2);
    step(&mut reader, NodeType::Primitive, Tag::INTEGER, 1, 1);
    step(&mut reader, NodeType::Primitive, Tag::END_OF_CONTENTS, 0, 1);
    step(&mut reader, NodeType::ConstructedEnd, Tag::SEQUENCE, 0, 1);
    step(&mut reader, NodeType::Primitive, Tag::BOOLEAN, 1, 0);
    step(&mut reader, NodeType::DocumentEnd, Tag::END_OF_CONTENTS, 0, 0);
}

#[test]
fn indefinite_without_end_of_contents() {
    let mut reader = ber_reader(b"\x30\x80\x04\x03\x56\x78\x90");
    assert_eq!(reader.step().unwrap_err().kind(), ErrorKind::Truncated);
}

#[test]
fn indefinite_primitive() {
    let mut reader = ber_reader(b"\x04\x80\x56\x00\x00");
    assert_eq!(
        reader.step().unwrap_err().kind(), ErrorKind::MalformedLength
    );
}

#[test]
fn extract_raw() {
    let mut reader = ber_reader(COMPLEX);
    reader.step().unwrap();
    let set = reader.step().unwrap().clone();
    let raw = reader.extract_raw(&set).unwrap();
    assert_eq!(raw.len(), 2 + 0x4a);
    assert_eq!(raw.as_ref(), &COMPLEX[11..]);

    let mut again = BerReader::new(Cursor::new(raw.as_ref()));
    let node = again.step().unwrap();
    assert_eq!(node.ident(), set.ident());
    assert_eq!(node.length(), set.length());
    assert_eq!(node.node_type(), set.node_type());

    // Stepping continues normally after extracting.
    step(&mut reader, NodeType::ConstructedStart, Tag::SEQUENCE, 0x48, 1);

    let root = ber_reader(INDEFINITE).read_to_end().unwrap();
    let raw = ber_reader(INDEFINITE).extract_raw(
        &root.children()[0]
    ).unwrap();
    assert_eq!(raw.as_ref(), INDEFINITE);
}

#[test]
fn read_content() {
    let mut reader = ber_reader(COMPLEX);
    let oid = reader.step().unwrap().clone();
    assert_eq!(
        reader.read_content(&oid).unwrap().as_ref(), &COMPLEX[2..11]
    );

    let mut buf = [0u8; 9];
    reader.read_content_into(&oid, &mut buf).unwrap();
    assert_eq!(&buf[..], &COMPLEX[2..11]);

    let mut short = [0u8; 3];
    assert_eq!(
        reader.read_content_into(&oid, &mut short).unwrap_err().kind(),
        ErrorKind::InvalidOperation
    );

    let set = reader.step().unwrap().clone();
    assert_eq!(
        reader.read_content(&set).unwrap_err().kind(),
        ErrorKind::InvalidOperation
    );
}

#[test]
fn read_content_of_context_constructed() {
    let mut reader = ber_reader(b"\xa0\x03\x02\x01\x07");
    let node = reader.step().unwrap().clone();
    assert_eq!(node.class(), Class::Context);
    assert_eq!(
        reader.read_content(&node).unwrap().as_ref(), b"\x02\x01\x07"
    );

    let mut reader = ber_reader(b"\xa0\x80\x02\x01\x07\x00\x00");
    let node = reader.step().unwrap().clone();
    assert_eq!(
        reader.read_content(&node).unwrap_err().kind(),
        ErrorKind::InvalidOperation
    );
}

#[test]
fn read_content_of_markers() {
    let mut reader = ber_reader(OID_AND_SET);
    let start = reader.current().clone();
    assert_eq!(
        reader.read_content(&start).unwrap_err().kind(),
        ErrorKind::InvalidOperation
    );
    assert!(reader.extract_raw(&start).unwrap().is_empty());

    reader.step().unwrap();
    reader.step().unwrap();
    reader.step().unwrap();
    let end = reader.step().unwrap().clone();
    assert_eq!(end.node_type(), NodeType::ConstructedEnd);
    assert!(reader.extract_raw(&end).unwrap().is_empty());
}

#[test]
fn multi_octet_tag() {
    let mut reader = ber_reader(b"\x1f\x81\x00\x00");
    assert_eq!(reader.step().unwrap_err().kind(), ErrorKind::Unsupported);
}

#[test]
fn illegal_length() {
    let mut reader = ber_reader(b"\x04\xff\x00");
    assert_eq!(
        reader.step().unwrap_err().kind(), ErrorKind::MalformedLength
    );
}

#[test]
fn length_exceeds_data() {
    let mut reader = ber_reader(b"\x04\x05\x01\x02");
    let err = reader.step().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedLength);
    assert_eq!(err.pos(), Some(Pos::from(0)));
}

#[test]
fn child_exceeds_parent() {
    let mut reader = ber_reader(b"\x30\x03\x04\x02\x01\x02\x05\x00");
    reader.step().unwrap();
    assert_eq!(
        reader.step().unwrap_err().kind(), ErrorKind::MalformedLength
    );
}

#[test]
fn truncated_header() {
    let mut reader = ber_reader(b"\x04");
    assert_eq!(reader.step().unwrap_err().kind(), ErrorKind::Truncated);

    let mut reader = ber_reader(b"\x04\x82\x01");
    assert_eq!(reader.step().unwrap_err().kind(), ErrorKind::Truncated);
}

#[test]
fn read_to_end_mid_structure() {
    let mut reader = ber_reader(OID_AND_SET);
    reader.step().unwrap();
    reader.step().unwrap();
    assert_eq!(
        reader.read_to_end().unwrap_err().kind(), ErrorKind::Structure
    );
}

#[test]
fn failed_step_keeps_position() {
    // SEQUENCE whose only child claims more content than the SEQUENCE has.
    let mut reader = ber_reader(b"\x30\x02\x04\x05\x01\x02\x03\x04\x05");
    step(&mut reader, NodeType::ConstructedStart, Tag::SEQUENCE, 2, 0);
    for _ in 0..2 {
        assert_eq!(
            reader.step().unwrap_err().kind(), ErrorKind::MalformedLength
        );
        assert_eq!(reader.depth(), 0);
        assert_eq!(reader.current().node_type(), NodeType::ConstructedStart);
    }

    // The sibling following a SEQUENCE is longer than the data.
    let mut reader = ber_reader(b"\x30\x02\x05\x00\x04\x05\x01");
    step(&mut reader, NodeType::ConstructedStart, Tag::SEQUENCE, 2, 0);
    step(&mut reader, NodeType::Primitive, Tag::NULL, 0, 1);
    step(&mut reader, NodeType::ConstructedEnd, Tag::SEQUENCE, 0, 1);
    for _ in 0..2 {
        assert_eq!(
            reader.step().unwrap_err().kind(), ErrorKind::MalformedLength
        );
        assert_eq!(reader.depth(), 1);
        assert_eq!(reader.current().node_type(), NodeType::ConstructedEnd);
    }
}
