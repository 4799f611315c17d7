//! LTSV Format Reference
//!
//! This module documents the LTSV (Labeled Tab-Separated Values) format as
//! implemented by this library. It contains no code.
//!
//! # Overview
//!
//! LTSV is a line-oriented log format. Each line is one record; a record is
//! a sequence of `label:value` fields separated by tabs:
//!
//! ```text
//! host:127.0.0.1<TAB>ident:-<TAB>user:frank<TAB>time:[10/Oct/2000:13:55:36 -0700]<TAB>status:200
//! ```
//!
//! # Grammar
//!
//! ```text
//! line   = *( field FIELD-DELIM ) [ field ]
//! field  = label VALUE-DELIM value
//! label  = 1*labelchar     ; labelchar = ALPHA / DIGIT / "_" / "." / "-"
//! value  = *valuechar      ; valuechar = any byte except %x08 / %x09 / %x0A / %x0D
//! ```
//!
//! | Delimiter | Default | Option |
//! |-----------|---------|--------|
//! | `FIELD-DELIM` | `\t` (0x09) | [`ParserOptions::field_delimiter`](crate::ParserOptions) |
//! | `VALUE-DELIM` | `:` (0x3A) | [`ParserOptions::value_delimiter`](crate::ParserOptions) |
//!
//! ## Splitting rules
//!
//! - A field is split at the **first** value delimiter; later ones belong to
//!   the value (`time:13:55:36` has label `time`, value `13:55:36`).
//! - Empty segments produced by leading, trailing or doubled field
//!   delimiters are skipped. A line with no fields is an empty record.
//! - There is no quoting or escaping, and a field never spans lines.
//! - Values are raw bytes. Non-ASCII bytes are allowed.
//!
//! ## Strict and lenient parsing
//!
//! | Check | Strict | Lenient |
//! |-------|--------|---------|
//! | value delimiter present | yes | yes |
//! | label non-empty | yes | yes |
//! | label charset `[0-9A-Za-z_.-]` | yes | no |
//! | value excludes BS, TAB, CR, LF | yes | no |
//!
//! Strict mode checks the label before the value, so the reported error
//! names the first half of the field that breaks the grammar.
//!
//! ## Duplicate labels
//!
//! When a record is built as a [`Mapping`](crate::Mapping), the last
//! occurrence of a label wins. Building it as a field list keeps every
//! occurrence in order.
//!
//! # Reference
//!
//! <http://ltsv.org/>
