/// Builds a [`Mapping`](crate::Mapping) from `label => value` pairs.
///
/// Labels and values may be anything implementing `ToString`. A repeated
/// label keeps its last value, as when parsing.
///
/// ```rust
/// use ltsv::ltsv;
///
/// let record = ltsv! {
///     "host" => "127.0.0.1",
///     "status" => 200,
/// };
/// assert_eq!(record["status"], "200");
///
/// let empty = ltsv! {};
/// assert!(empty.is_empty());
/// ```
#[macro_export]
macro_rules! ltsv {
    () => {
        $crate::Mapping::new()
    };

    ($($label:expr => $value:expr),+ $(,)?) => {{
        let mut record = $crate::Mapping::new();
        $(
            record.insert(::std::string::ToString::to_string(&$label), ::std::string::ToString::to_string(&$value));
        )+
        record
    }};
}
