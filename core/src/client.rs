//! Client facade binding a server, a registry and a transport.
//!
//! # Design
//! `EnsemblClient` owns a stateless `Dispatcher` and a `Transport`. Each call
//! builds the request, executes it, and decodes the response; local errors
//! (unknown operation, bad method, missing placeholder) are raised before the
//! transport is touched. The only state kept between calls is a copy of the
//! latest `CallRecord`, behind a mutex.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use crate::dispatcher::Dispatcher;
use crate::error::{Error, Result};
use crate::http::{Attachment, HttpMethod};
use crate::params::Params;
use crate::registry::{Endpoint, Registry};
use crate::transport::{Transport, UreqTransport};
use crate::types::{CallRecord, DecodePolicy, Reply};

/// Primary EnsEMBL REST server.
pub const DEFAULT_SERVER: &str = "https://rest.ensembl.org";

/// EnsEMBL Genomes REST server (plants, fungi, protists, metazoa, bacteria).
pub const GENOMES_SERVER: &str = "https://rest.ensemblgenomes.org";

/// Builder for [`EnsemblClient`].
#[derive(Default)]
pub struct ClientBuilder {
    server: Option<String>,
    proxy: Option<String>,
    registry: Option<Registry>,
    transport: Option<Box<dyn Transport>>,
    decode_policy: DecodePolicy,
    user_agent: Option<String>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `server` instead of [`DEFAULT_SERVER`].
    pub fn server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    /// Use [`GENOMES_SERVER`].
    pub fn genomes(self) -> Self {
        self.server(GENOMES_SERVER)
    }

    /// Route requests through `proxy`. Ignored when a custom transport is set.
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Replace the built-in endpoint table.
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    pub fn decode_policy(mut self, policy: DecodePolicy) -> Self {
        self.decode_policy = policy;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> Result<EnsemblClient> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Box::new(UreqTransport::new(self.proxy.as_deref())?),
        };
        let registry = Arc::new(self.registry.unwrap_or_else(Registry::ensembl));
        let server = self.server.as_deref().unwrap_or(DEFAULT_SERVER);
        let mut dispatcher = Dispatcher::new(server, registry);
        if let Some(user_agent) = self.user_agent {
            dispatcher = dispatcher.with_user_agent(user_agent);
        }
        Ok(EnsemblClient {
            dispatcher,
            transport,
            decode_policy: self.decode_policy,
            last_call: Mutex::new(None),
        })
    }
}

/// Blocking client for the EnsEMBL REST API.
///
/// Besides [`invoke`](Self::invoke), every built-in endpoint has a method of
/// the same name, e.g. `client.lookup_id(&params)`.
pub struct EnsemblClient {
    dispatcher: Dispatcher,
    transport: Box<dyn Transport>,
    decode_policy: DecodePolicy,
    last_call: Mutex<Option<CallRecord>>,
}

impl EnsemblClient {
    /// Client for [`DEFAULT_SERVER`] with the built-in endpoint table.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn server(&self) -> &str {
        self.dispatcher.server()
    }

    pub fn registry(&self) -> &Registry {
        self.dispatcher.registry()
    }

    pub fn decode_policy(&self) -> DecodePolicy {
        self.decode_policy
    }

    /// Call `operation` with `params`.
    pub fn invoke(&self, operation: &str, params: &Params) -> Result<Reply> {
        self.invoke_with_attachments(operation, params, &[])
    }

    /// Call `operation`, sending `attachments` as multipart file fields.
    pub fn invoke_with_attachments(
        &self,
        operation: &str,
        params: &Params,
        attachments: &[Attachment],
    ) -> Result<Reply> {
        let request = self
            .dispatcher
            .build_request_with_attachments(operation, params, attachments)?;
        let response = self.transport.execute(&request).map_err(Error::Transport)?;
        let decoded = self.dispatcher.decode(operation, &request, response)?;
        *self.lock_last_call() = Some(decoded.reply.record.clone());
        debug!(operation, status = decoded.reply.record.status, "call complete");
        decoded.into_reply(self.decode_policy)
    }

    /// Handle bound to one endpoint definition.
    pub fn operation(&self, name: &str) -> Result<Operation<'_>> {
        let endpoint = self.registry().lookup(name)?;
        Ok(Operation { client: self, endpoint })
    }

    /// Handles for every endpoint in the registry, sorted by name.
    pub fn operations(&self) -> impl Iterator<Item = Operation<'_>> {
        self.registry()
            .iter()
            .map(move |endpoint| Operation { client: self, endpoint })
    }

    /// Record of the most recent call that received a response.
    pub fn last_call(&self) -> Option<CallRecord> {
        self.lock_last_call().clone()
    }

    fn lock_last_call(&self) -> MutexGuard<'_, Option<CallRecord>> {
        // The slot holds plain data; a panic elsewhere cannot leave it torn.
        self.last_call.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for EnsemblClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnsemblClient")
            .field("server", &self.server())
            .field("operations", &self.registry().len())
            .field("decode_policy", &self.decode_policy)
            .finish_non_exhaustive()
    }
}

/// One operation bound to its client.
#[derive(Debug, Clone, Copy)]
pub struct Operation<'a> {
    client: &'a EnsemblClient,
    endpoint: &'a Endpoint,
}

impl<'a> Operation<'a> {
    pub fn name(&self) -> &'a str {
        &self.endpoint.name
    }

    pub fn endpoint(&self) -> &'a Endpoint {
        self.endpoint
    }

    pub fn method(&self) -> Result<HttpMethod> {
        self.endpoint.http_method()
    }

    pub fn call(&self, params: &Params) -> Result<Reply> {
        self.client.invoke(&self.endpoint.name, params)
    }

    pub fn call_with_attachments(&self, params: &Params, attachments: &[Attachment]) -> Result<Reply> {
        self.client
            .invoke_with_attachments(&self.endpoint.name, params, attachments)
    }
}
