use insta::assert_snapshot;
use xee_doc::{Document, Error, Level, Node, ResultKind};

mod common;

use common::{parse, ENTRY_XML, LIST_XML};

#[test]
fn test_entry_title() {
    let mut document = parse(ENTRY_XML);
    let title: String = document.xpath("string((//EntryType/@name)[1])");
    assert_eq!(title, "demo");
    assert!(document.last_error().is_none());
}

#[test]
fn test_entry_comments() {
    let mut document = parse(ENTRY_XML);
    let mut comments: Vec<Node> = document.xpath("//EntryType/Comment");
    assert!(document.last_error().is_none());
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].xml(), "<Comment>hi</Comment>");
}

#[test]
fn test_number() {
    let mut document = parse(LIST_XML);
    assert_eq!(document.xpath::<f64>("count(//item)"), 3.0);
    assert_eq!(document.xpath::<f64>("sum(//item/@n)"), 6.0);
    assert_eq!(document.xpath::<f64>("1.5"), 1.5);
    assert!(document.last_error().is_none());
}

#[test]
fn test_boolean() {
    let mut document = parse(LIST_XML);
    assert!(document.xpath::<bool>("count(//item) = 3"));
    assert!(!document.xpath::<bool>("exists(//missing)"));
    assert!(document.last_error().is_none());
}

#[test]
fn test_untyped_value_is_text() {
    let mut document = parse(LIST_XML);
    let n: String = document.xpath("(//item)[2]/@n/data(.)");
    assert_eq!(n, "2");
}

#[test]
fn test_integer() {
    let mut document = parse(LIST_XML);
    assert_eq!(document.xpath::<i64>("count(//item)"), 3);
    assert!(document.last_error().is_none());
    assert_eq!(document.xpath::<i64>("-7"), -7);
    assert!(document.last_error().is_none());
}

#[test]
fn test_integer_truncation_warns() {
    let mut document = parse(LIST_XML);
    assert_eq!(document.xpath::<i64>("3.7"), 3);
    let err = document.last_error().unwrap();
    assert_eq!(err.level, Level::Warning);
    assert_snapshot!(err.to_string(), @r"
    WARN: Result is not an integer, truncating
    DATA: 3.7
    ");

    assert_eq!(document.try_xpath::<i64>("-3.7").unwrap(), -3);
    assert_eq!(document.last_error().unwrap().level, Level::Warning);
}

#[test]
fn test_out_of_range_integer_warns() {
    let mut document = parse(LIST_XML);
    assert_eq!(document.xpath::<i64>("1e20"), i64::MAX);
    let err = document.last_error().unwrap();
    assert_eq!(err.level, Level::Warning);
    assert_eq!(err.data, "1e20");
}

#[test]
fn test_type_mismatch_returns_zero_value() {
    let mut document = parse(LIST_XML);

    assert_eq!(document.xpath::<String>("count(//item)"), "");
    let err = document.last_error().unwrap();
    assert_eq!(err.message(), "Result type is not \"string\"");
    assert_eq!(err.data, "count(//item)");

    assert_eq!(document.xpath::<f64>("//item"), 0.0);
    assert_eq!(
        document.last_error().unwrap().message(),
        "Result type is not \"number\""
    );

    assert!(!document.xpath::<bool>("'yes'"));
    assert_eq!(
        document.last_error().unwrap().message(),
        "Result type is not \"boolean\""
    );

    assert_eq!(document.xpath::<i64>("true()"), 0);
    assert_eq!(
        document.last_error().unwrap().message(),
        "Result type is not \"number\""
    );

    assert!(document.xpath::<Vec<Node>>("'text'").is_empty());
    assert_eq!(
        document.last_error().unwrap().message(),
        "Result type is not \"nodelist/resultset\""
    );
}

#[test]
fn test_type_mismatch_error() {
    let mut document = parse(LIST_XML);
    let err = document.try_xpath::<f64>("'1'").unwrap_err();
    assert!(matches!(
        err,
        Error::TypeMismatch {
            expected: ResultKind::Number,
            ..
        }
    ));
}

#[test]
fn test_empty_result_is_an_empty_node_list() {
    let mut document = parse(LIST_XML);
    let nodes: Vec<Node> = document.xpath("//missing");
    assert!(nodes.is_empty());
    assert!(document.last_error().is_none());
}

#[test]
fn test_nodes_in_result_order() {
    let mut document = parse(LIST_XML);
    let nodes: Vec<Node> = document.xpath("//item");
    let texts: Vec<String> = nodes
        .into_iter()
        .map(|mut node| node.xpath::<String>("string()"))
        .collect();
    assert_eq!(texts, vec!["a", "b", "c"]);
}

#[test]
fn test_unsupported_result() {
    let mut document = parse(LIST_XML);
    assert_eq!(document.xpath::<String>("('a', 'b')"), "");
    let err = document.try_xpath::<String>("('a', 'b')").unwrap_err();
    assert!(matches!(err, Error::Unsupported { .. }));
    assert_eq!(err.data(), "('a', 'b')");
}

#[test]
fn test_syntax_error() {
    let mut document = parse(LIST_XML);
    let nodes: Vec<Node> = document.xpath("//item[");
    assert!(nodes.is_empty());
    let err = document.last_error().unwrap();
    assert_eq!(err.level, Level::Error);
    assert_eq!(err.data, "//item[");
}

#[test]
fn test_dynamic_error() {
    let mut document = parse(LIST_XML);
    let err = document.try_xpath::<f64>("1 div 0").unwrap_err();
    assert!(matches!(err, Error::Evaluation { .. }));
    assert_eq!(err.data(), "1 div 0");
}

#[test]
fn test_query_without_tree_is_fatal() {
    let mut document = Document::parse("<broken");
    let title: String = document.xpath("string(/)");
    assert_eq!(title, "");
    let err = document.last_error().unwrap();
    assert_snapshot!(err.to_string(), @r"
    ERROR: Fatal error on XPath context
    DATA: unknown
    ");
}

#[test]
fn test_failed_open_has_no_origin() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.xml");
    std::fs::write(&path, "<broken").unwrap();
    let mut document = Document::open(&path);
    assert_eq!(document.origin(), None);
    let err = document.try_xpath::<String>("string(/)").unwrap_err();
    assert!(matches!(err, Error::Context { .. }));
    assert_eq!(err.data(), "unknown");
}

#[test]
fn test_successful_query_clears_error() {
    let mut document = parse(LIST_XML);
    document.xpath::<String>("count(//item)");
    assert!(document.last_error().is_some());
    document.xpath::<f64>("count(//item)");
    assert!(document.last_error().is_none());
}

#[test]
fn test_node_scoped_query() {
    let mut document = parse(LIST_XML);
    let mut items: Vec<Node> = document.xpath("//item");
    let second = &mut items[1];
    assert_eq!(second.xpath::<String>("string(@n)"), "2");
    assert_eq!(second.xpath::<f64>("count(preceding-sibling::item)"), 1.0);
    let parents: Vec<Node> = second.xpath("..");
    assert_eq!(parents.len(), 1);
    assert!(second.last_error().is_none());
}

#[test]
fn test_node_query_error_stays_on_node() {
    let mut document = parse(LIST_XML);
    let mut items: Vec<Node> = document.xpath("//item");
    assert_eq!(items[0].xpath::<i64>("string(@n)"), 0);
    assert!(items[0].last_error().is_some());
    assert!(document.last_error().is_none());
}
