//! Blocking client for the EnsEMBL REST API.
//!
//! # Overview
//! A static table maps operation names (`lookup_id`, `sequence_region`, ...)
//! to an HTTP method and a URL template with `{{placeholder}}` tokens. A call
//! substitutes the caller's parameters into the template, sends the request,
//! and decodes the JSON response.
//!
//! ```no_run
//! use ensembl_core::{params, EnsemblClient};
//!
//! let client = EnsemblClient::new()?;
//! let gene = client.lookup_id(&params! { "id" => "ENSG00000157764", "expand" => true })?;
//! println!("{}", gene.content["display_name"]);
//! # Ok::<(), ensembl_core::Error>(())
//! ```
//!
//! # Design
//! - `Dispatcher` builds `HttpRequest` values and parses `HttpResponse`
//!   values without touching the network (host-does-IO pattern).
//! - `Transport` performs the round-trip; `UreqTransport` is the default.
//! - `EnsemblClient` joins the two, and keeps a copy of the latest
//!   `CallRecord` for inspection. Each `Reply` also carries its own record.
//! - Bodies that are not JSON decode to an empty object by default; the
//!   `Strict` decode policy turns them into errors instead.

pub mod client;
pub mod dispatcher;
pub mod error;
pub mod http;
pub mod params;
pub mod registry;
pub mod template;
pub mod transport;
pub mod types;

pub use client::{ClientBuilder, EnsemblClient, Operation, DEFAULT_SERVER, GENOMES_SERVER};
pub use dispatcher::{Dispatcher, USER_AGENT};
pub use error::{Error, Result, TransportError};
pub use http::{Attachment, HttpMethod, HttpRequest, HttpResponse};
pub use params::{ParamValue, Params};
pub use registry::{Endpoint, Registry};
pub use transport::{Transport, UreqTransport};
pub use types::{status_text, CallRecord, DecodePolicy, Reply};
