use ltsv::{ltsv, to_string, Mapping, Writer};

#[test]
fn test_empty_record() {
    let record: Mapping = ltsv! {};
    assert!(record.is_empty());
}

#[test]
fn test_string_pairs() {
    let record = ltsv! {
        "host" => "127.0.0.1",
        "user" => "frank",
    };
    assert_eq!(record.len(), 2);
    assert_eq!(record.get("host").map(String::as_str), Some("127.0.0.1"));
    assert_eq!(record.get("user").map(String::as_str), Some("frank"));
}

#[test]
fn test_mixed_value_types() {
    let status = 200;
    let record = ltsv! {
        "status" => status,
        "ratio" => 0.5,
        "ok" => true,
        "grade" => 'A',
    };
    assert_eq!(record["status"], "200");
    assert_eq!(record["ratio"], "0.5");
    assert_eq!(record["ok"], "true");
    assert_eq!(record["grade"], "A");
}

#[test]
fn test_insertion_order_is_kept() {
    let record = ltsv! { "z" => 1, "a" => 2, "m" => 3 };
    let labels: Vec<&str> = record.keys().map(String::as_str).collect();
    assert_eq!(labels, vec!["z", "a", "m"]);
    assert_eq!(to_string(&record).unwrap(), "z:1\ta:2\tm:3");
}

#[test]
fn test_macro_output_is_writable() {
    let mut writer = Writer::new(Vec::new());
    writer
        .write_map(&ltsv! { "req" => "GET / HTTP/1.1", "size" => 0 })
        .unwrap();
    assert_eq!(writer.into_inner(), b"req:GET / HTTP/1.1\tsize:0\n");
}
