//! The renoting engine for BMS charts.
//!
//! Rewrites a chart in the BMS text format so that chosen notes leave the shared autoplay
//! channel and land on dedicated playable channels, while every other byte of the chart is kept
//! as it was. The main entry point is [`renote::renote`], and the types callers usually need are
//! collected in [`renote::prelude`].
//!
//! # Example
//!
//! ```
//! use bms_renote::renote::prelude::*;
//!
//! let source = b"#00101:AABB\r\n";
//! let mut request = RenoteRequest::default();
//! request.add_note("1:480".parse().unwrap(), TargetKey::Key1, NoteOverride::new("BB".parse().unwrap()));
//!
//! let RenoteOutput { bytes, warnings } = renote(source, &request);
//! assert!(warnings.is_empty());
//! assert_eq!(bytes, b"#00101:AA00\r\n#00111:00BB\r\n");
//! ```
//!
//! # Features
//!
//! - `serde`: (De)serialization of requests and line models.
//! - `json`: Loading a [`renote::RenoteRequest`] from JSON text.
//! - `diagnostics`: Rendering warnings with `ariadne`.
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "diagnostics")]
#[cfg_attr(docsrs, doc(cfg(feature = "diagnostics")))]
pub mod diagnostics;
pub mod renote;
