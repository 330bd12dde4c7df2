//! The language server loop.
//!
//! Synchronous and single-threaded: `lsp-server` owns the stdio threads and
//! hands us one message at a time. Every document event goes through the
//! kernel's [`DocumentStore`] and publishes the full replacement diagnostic
//! list for that document.

use anyhow::{Context, Result};
use carnival_kernel::completion::completions;
use carnival_kernel::fixes::quick_fix_for_code;
use carnival_kernel::{DocumentId, DocumentStore, Finding};
use lsp_server::{Connection, ErrorCode, Message, Notification, Request, Response};
use lsp_types::notification::{
    DidChangeTextDocument, DidCloseTextDocument, DidOpenTextDocument, DidSaveTextDocument,
    Notification as _, PublishDiagnostics,
};
use lsp_types::request::{CodeActionRequest, Completion, Request as _};
use lsp_types::{
    CodeActionKind, CodeActionOptions, CodeActionOrCommand, CodeActionParams,
    CodeActionProviderCapability, CompletionOptions, CompletionParams, CompletionResponse,
    DidChangeTextDocumentParams, DidCloseTextDocumentParams, DidOpenTextDocumentParams,
    DidSaveTextDocumentParams, InitializeParams, InitializeResult, PublishDiagnosticsParams,
    SaveOptions, ServerCapabilities, ServerInfo, TextDocumentSyncCapability,
    TextDocumentSyncKind, TextDocumentSyncOptions, TextDocumentSyncSaveOptions, Uri,
};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ServerConfig;
use crate::convert;

pub fn capabilities() -> ServerCapabilities {
    ServerCapabilities {
        text_document_sync: Some(TextDocumentSyncCapability::Options(
            TextDocumentSyncOptions {
                open_close: Some(true),
                change: Some(TextDocumentSyncKind::FULL),
                save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                    include_text: Some(true),
                })),
                ..Default::default()
            },
        )),
        completion_provider: Some(CompletionOptions::default()),
        code_action_provider: Some(CodeActionProviderCapability::Options(CodeActionOptions {
            code_action_kinds: Some(vec![CodeActionKind::QUICKFIX]),
            ..Default::default()
        })),
        ..Default::default()
    }
}

/// Server state: open documents and the effective config.
#[derive(Debug)]
pub struct Server {
    store: DocumentStore<'static>,
    config: ServerConfig,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            store: DocumentStore::default(),
            config,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Handle a notification, returning the diagnostics to publish if any.
    pub fn handle_notification(&mut self, not: Notification) -> Option<Notification> {
        match not.method.as_str() {
            DidOpenTextDocument::METHOD => {
                let params: DidOpenTextDocumentParams = parse_params(not)?;
                let doc = params.text_document;
                self.store.did_open(document_id(&doc.uri), doc.text);
                Some(self.publish(doc.uri, Some(doc.version)))
            }
            DidChangeTextDocument::METHOD => {
                let params: DidChangeTextDocumentParams = parse_params(not)?;
                // Full sync: the last change carries the whole document.
                let text = params.content_changes.into_iter().last()?.text;
                let doc = params.text_document;
                self.store.did_change(document_id(&doc.uri), text);
                Some(self.publish(doc.uri, Some(doc.version)))
            }
            DidSaveTextDocument::METHOD => {
                let params: DidSaveTextDocumentParams = parse_params(not)?;
                let uri = params.text_document.uri;
                self.store.did_save(document_id(&uri), params.text);
                Some(self.publish(uri, None))
            }
            DidCloseTextDocument::METHOD => {
                let params: DidCloseTextDocumentParams = parse_params(not)?;
                let uri = params.text_document.uri;
                self.store.close(&document_id(&uri));
                Some(publish_notification(PublishDiagnosticsParams::new(
                    uri,
                    Vec::new(),
                    None,
                )))
            }
            other => {
                tracing::trace!(method = other, "ignoring notification");
                None
            }
        }
    }

    /// Handle a request other than `shutdown`.
    pub fn handle_request(&self, req: Request) -> Response {
        let id = req.id.clone();
        match req.method.as_str() {
            Completion::METHOD => match req.extract::<CompletionParams>(Completion::METHOD) {
                Ok((id, _params)) => {
                    let items = completions(self.store.catalog())
                        .into_iter()
                        .map(convert::completion_item)
                        .collect();
                    ok(id, CompletionResponse::Array(items))
                }
                Err(e) => invalid_params(id, e),
            },
            CodeActionRequest::METHOD => {
                match req.extract::<CodeActionParams>(CodeActionRequest::METHOD) {
                    Ok((id, params)) => ok(id, self.code_actions(params)),
                    Err(e) => invalid_params(id, e),
                }
            }
            other => {
                tracing::debug!(method = other, "unsupported request");
                Response::new_err(
                    id,
                    ErrorCode::MethodNotFound as i32,
                    format!("unsupported request: {other}"),
                )
            }
        }
    }

    /// One quickfix per missing-meta diagnostic in the request context.
    fn code_actions(&self, params: CodeActionParams) -> Vec<CodeActionOrCommand> {
        let uri = params.text_document.uri;
        params
            .context
            .diagnostics
            .into_iter()
            .filter_map(|diagnostic| {
                let fix = quick_fix_for_code(
                    convert::diagnostic_code(&diagnostic)?,
                    &self.config.quick_fix,
                )?;
                Some(CodeActionOrCommand::CodeAction(convert::code_action(
                    &uri, fix, diagnostic,
                )))
            })
            .collect()
    }

    fn publish(&self, uri: Uri, version: Option<i32>) -> Notification {
        let id = document_id(&uri);
        let text = self.store.text(&id).unwrap_or_default();
        let findings: &[Finding] = self.store.findings(&id).unwrap_or_default();
        let diagnostics = convert::diagnostics(text, findings, &self.config.diagnostics.source);
        tracing::debug!(uri = uri.as_str(), count = diagnostics.len(), "publishing diagnostics");
        publish_notification(PublishDiagnosticsParams::new(uri, diagnostics, version))
    }
}

/// Run the initialize handshake, then serve until shutdown.
pub fn run(connection: &Connection, mut config: ServerConfig) -> Result<()> {
    let (init_id, init_params) = connection
        .initialize_start()
        .context("initialize handshake failed")?;
    let init_params: InitializeParams =
        serde_json::from_value(init_params).context("invalid initialize params")?;

    if let Some(options) = init_params.initialization_options {
        if let Err(e) = config.apply_init_options(options) {
            tracing::warn!(error = %e, "ignoring initializationOptions");
        }
    }

    let result = InitializeResult {
        capabilities: capabilities(),
        server_info: Some(ServerInfo {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }),
    };
    connection
        .initialize_finish(init_id, serde_json::to_value(result)?)
        .context("initialize handshake failed")?;
    tracing::info!(source = %config.diagnostics.source, "initialized");

    let mut server = Server::new(config);
    for msg in &connection.receiver {
        match msg {
            Message::Request(req) => {
                if connection.handle_shutdown(&req)? {
                    tracing::info!("shutdown requested");
                    return Ok(());
                }
                let resp = server.handle_request(req);
                connection.sender.send(Message::Response(resp))?;
            }
            Message::Notification(not) => {
                if let Some(publish) = server.handle_notification(not) {
                    connection.sender.send(Message::Notification(publish))?;
                }
            }
            Message::Response(resp) => {
                tracing::trace!(id = ?resp.id, "ignoring response");
            }
        }
    }
    Ok(())
}

fn document_id(uri: &Uri) -> DocumentId {
    DocumentId::new(uri.as_str())
}

fn parse_params<P: DeserializeOwned>(not: Notification) -> Option<P> {
    match serde_json::from_value(not.params) {
        Ok(params) => Some(params),
        Err(e) => {
            tracing::warn!(method = %not.method, error = %e, "malformed notification params");
            None
        }
    }
}

fn publish_notification(params: PublishDiagnosticsParams) -> Notification {
    Notification::new(PublishDiagnostics::METHOD.to_string(), params)
}

fn ok(id: lsp_server::RequestId, result: impl Serialize) -> Response {
    Response::new_ok(id, result)
}

fn invalid_params(id: lsp_server::RequestId, e: impl std::fmt::Debug) -> Response {
    Response::new_err(
        id,
        ErrorCode::InvalidParams as i32,
        format!("invalid params: {e:?}"),
    )
}
