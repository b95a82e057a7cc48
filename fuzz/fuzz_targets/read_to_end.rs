#![no_main]

use std::io::Cursor;
use libfuzzer_sys::fuzz_target;
use berstream::{BerReader, Node, NodeType, Options};

fn check_children(root: &Node) {
    let mut stack: Vec<&Node> = root.children().iter().collect();
    while let Some(node) = stack.pop() {
        let mut total = 0;
        for child in node.children() {
            assert!(child.start() >= node.data_offset());
            assert!(child.end() <= node.end());
            total += child.end() - child.start();
            stack.push(child);
        }
        assert!(total <= node.end() - node.data_offset());
    }
}

fuzz_target!(|data: &[u8]| {
    let mut reader = BerReader::with_options(
        Cursor::new(data), Options::default().read_content(true)
    );
    if let Ok(root) = reader.read_to_end() {
        assert_eq!(root.node_type(), NodeType::DocumentStart);
        check_children(&root);
        let _ = root.dump().to_string();

        let mut reader = BerReader::new(Cursor::new(data));
        for child in root.children() {
            let raw = reader.extract_raw(child).unwrap();
            assert_eq!(raw.len() as u64, child.end() - child.start());
        }
    }
});
