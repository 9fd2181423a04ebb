//! CSV ingestion: one "Book" node per data row.
//!
//! The format is deliberately naive. Lines are split on `'\n'` and fields on
//! `','`, with no quoting or escaping, so a comma inside a value shifts every
//! later field of that row. Columns are positional:
//! `id,title,author,description,imagePath,price,isbn`. The first non-empty
//! line is a header and is skipped without being inspected.

use shelfsync_core::Result;
use tracing::{debug, warn};

use crate::schema::BOOK_MODEL;
use crate::store::NodeSink;
use crate::types::{BookNode, Node, RawRecord};

/// Number of positional columns in a well-formed row.
pub const FIELD_COUNT: usize = 7;

/// Split a payload into records, dropping empty lines and the header.
pub fn parse_records(payload: &str) -> Vec<RawRecord> {
    payload
        .split('\n')
        .filter(|line| !line.is_empty())
        .skip(1)
        .map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> RawRecord {
    let parts: Vec<&str> = line.split(',').collect();
    if parts.len() != FIELD_COUNT {
        warn!(
            "CSV row has {} fields, expected {}: {:?}",
            parts.len(),
            FIELD_COUNT,
            line
        );
    }

    let mut fields = parts.into_iter().map(str::to_string);
    RawRecord {
        identifier: fields.next().unwrap_or_default(),
        title: fields.next(),
        author: fields.next(),
        description: fields.next(),
        image_path: fields.next(),
        price: fields.next(),
        isbn: fields.next(),
    }
}

/// Turns CSV payloads into "Book" node creations on a sink.
pub struct CsvIngestor<'a> {
    sink: &'a dyn NodeSink,
}

impl<'a> CsvIngestor<'a> {
    pub fn new(sink: &'a dyn NodeSink) -> Self {
        Self { sink }
    }

    /// Create one node per data row, in file order. Returns the number created.
    ///
    /// Stops at the first sink error; nodes created before it are kept and
    /// flushed. The sink is flushed exactly once per call.
    pub fn ingest(&self, payload: &str) -> Result<usize> {
        let outcome = self.create_nodes(parse_records(payload));
        let flushed = self.sink.flush();

        let created = outcome?;
        flushed?;
        Ok(created)
    }

    fn create_nodes(&self, records: Vec<RawRecord>) -> Result<usize> {
        let mut created = 0;
        for record in records {
            let node = Node::try_from(BookNode::from(record))?;
            debug!("Ingesting book {}", node.id);
            self.sink.create(BOOK_MODEL, node)?;
            created += 1;
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::model_definitions;
    use crate::store::NodeStore;
    use parking_lot::Mutex;
    use shelfsync_core::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const HEADER: &str = "id,title,author,description,image,price,isbn";

    /// Records every create call.
    #[derive(Default)]
    struct RecordingSink {
        calls: Mutex<Vec<(String, Node)>>,
        fail_on: Option<String>,
        flushes: AtomicUsize,
    }

    impl NodeSink for RecordingSink {
        fn create(&self, model: &str, node: Node) -> Result<()> {
            if self.fail_on.as_deref() == Some(node.id.as_str()) {
                return Err(Error::Internal(format!("rejected {}", node.id)));
            }
            self.calls.lock().push((model.to_string(), node));
            Ok(())
        }

        fn flush(&self) -> Result<()> {
            self.flushes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    impl RecordingSink {
        fn ids(&self) -> Vec<String> {
            self.calls.lock().iter().map(|(_, n)| n.id.clone()).collect()
        }
    }

    #[test]
    fn test_single_row_example() {
        let sink = RecordingSink::default();
        let payload = format!("{}\nb1,Dune,Herbert,Epic,img.png,9.99,111\n", HEADER);

        let created = CsvIngestor::new(&sink).ingest(&payload).unwrap();
        assert_eq!(created, 1);

        let calls = sink.calls.lock();
        let (model, node) = &calls[0];
        assert_eq!(model, "Book");
        assert_eq!(node.id, "b1");
        assert_eq!(
            serde_json::Value::Object(node.attributes.clone()),
            serde_json::json!({
                "title": "Dune",
                "author": "Herbert",
                "description": "Epic",
                "imagePath": "img.png",
                "price": "9.99",
                "isbn": "111",
            })
        );
    }

    #[test]
    fn test_n_rows_in_order() {
        let sink = RecordingSink::default();
        let payload = format!(
            "{}\na,A,x,d,i,1,10\nb,B,y,d,i,2,20\nc,C,z,d,i,3,30",
            HEADER
        );

        let created = CsvIngestor::new(&sink).ingest(&payload).unwrap();
        assert_eq!(created, 3);
        assert_eq!(sink.ids(), ["a", "b", "c"]);

        let calls = sink.calls.lock();
        assert_eq!(calls[2].1.attributes["author"], "z");
        assert_eq!(calls[2].1.attributes["isbn"], "30");
    }

    #[test]
    fn test_empty_and_header_only() {
        let sink = RecordingSink::default();
        let ingestor = CsvIngestor::new(&sink);

        assert_eq!(ingestor.ingest("").unwrap(), 0);
        assert_eq!(ingestor.ingest(HEADER).unwrap(), 0);
        assert_eq!(ingestor.ingest(&format!("{}\n", HEADER)).unwrap(), 0);
        assert!(sink.calls.lock().is_empty());
    }

    #[test]
    fn test_blank_lines_ignored() {
        let records = parse_records(&format!("\n{}\n\nb1,T,A,D,I,P,S\n\n\n", HEADER));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].identifier, "b1");
    }

    #[test]
    fn test_short_row_leaves_trailing_fields_absent() {
        let records = parse_records(&format!("{}\nb1,Dune,Herbert", HEADER));
        assert_eq!(
            records[0],
            RawRecord {
                identifier: "b1".into(),
                title: Some("Dune".into()),
                author: Some("Herbert".into()),
                ..Default::default()
            }
        );

        let sink = RecordingSink::default();
        CsvIngestor::new(&sink)
            .ingest(&format!("{}\nb1,Dune,Herbert", HEADER))
            .unwrap();
        let calls = sink.calls.lock();
        assert_eq!(calls[0].1.attributes.len(), 2);
        assert!(calls[0].1.attributes.get("price").is_none());
    }

    #[test]
    fn test_extra_fields_ignored() {
        let records = parse_records(&format!("{}\nb1,T,A,D,I,P,S,extra", HEADER));
        assert_eq!(records[0].isbn.as_deref(), Some("S"));
    }

    #[test]
    fn test_embedded_comma_misaligns() {
        let records = parse_records(&format!(
            "{}\nb1,Dune,Herbert,Epic, vast,img.png,9.99,111",
            HEADER
        ));
        let r = &records[0];
        assert_eq!(r.description.as_deref(), Some("Epic"));
        assert_eq!(r.image_path.as_deref(), Some(" vast"));
        assert_eq!(r.isbn.as_deref(), Some("9.99"));
    }

    #[test]
    fn test_empty_fields_kept() {
        let records = parse_records(&format!("{}\n,,,,,,", HEADER));
        assert_eq!(records[0].identifier, "");
        assert_eq!(records[0].isbn.as_deref(), Some(""));
    }

    #[test]
    fn test_carriage_return_not_stripped() {
        let records = parse_records("h\r\nb1,T,A,D,I,P,S\r\n");
        assert_eq!(records[0].isbn.as_deref(), Some("S\r"));
    }

    #[test]
    fn test_sink_error_stops_without_rollback() {
        let sink = RecordingSink {
            fail_on: Some("b".into()),
            ..Default::default()
        };
        let payload = format!("{}\na,1,,,,,\nb,2,,,,,\nc,3,,,,,", HEADER);

        let result = CsvIngestor::new(&sink).ingest(&payload);
        assert!(result.is_err());
        assert_eq!(sink.ids(), ["a"]);
        assert_eq!(sink.flushes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_single_flush_per_ingest() {
        let sink = RecordingSink::default();
        let rows: String = (0..500)
            .map(|i| format!("b{},T,A,D,I,P,S\n", i))
            .collect();

        let created = CsvIngestor::new(&sink)
            .ingest(&format!("{}\n{}", HEADER, rows))
            .unwrap();
        assert_eq!(created, 500);
        assert_eq!(sink.flushes.load(Ordering::SeqCst), 1);

        CsvIngestor::new(&sink).ingest("").unwrap();
        assert_eq!(sink.flushes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_ingest_persists_store() {
        let dir = tempfile::tempdir().unwrap();
        let nodes_file = dir.path().join("nodes.json");
        let models = model_definitions("Example");

        {
            let store = NodeStore::open(&nodes_file, &models);
            let rows: String = (0..1000)
                .map(|i| format!("b{},T,A,D,I,P,S\n", i))
                .collect();
            let created = CsvIngestor::new(&store)
                .ingest(&format!("{}\n{}", HEADER, rows))
                .unwrap();
            assert_eq!(created, 1000);
        }

        let store = NodeStore::open(&nodes_file, &models);
        assert_eq!(store.len(), 1000);
    }
}
