//! End-to-end session over an in-memory connection.

use std::thread;
use std::time::Duration;

use carnival_lsp::ServerConfig;
use lsp_server::{Connection, Message, Notification, Request, RequestId};
use lsp_types::PublishDiagnosticsParams;
use serde_json::json;

const TIMEOUT: Duration = Duration::from_secs(10);

fn recv(client: &Connection) -> Message {
    client.receiver.recv_timeout(TIMEOUT).expect("server message")
}

fn send_request(client: &Connection, id: i32, method: &str, params: serde_json::Value) {
    client
        .sender
        .send(Message::Request(Request::new(
            RequestId::from(id),
            method.to_string(),
            params,
        )))
        .expect("send request");
}

fn send_notification(client: &Connection, method: &str, params: serde_json::Value) {
    client
        .sender
        .send(Message::Notification(Notification::new(
            method.to_string(),
            params,
        )))
        .expect("send notification");
}

#[test]
fn initialize_open_and_shutdown() {
    let (server, client) = Connection::memory();
    let handle = thread::spawn(move || carnival_lsp::run(&server, ServerConfig::default()));

    send_request(
        &client,
        1,
        "initialize",
        json!({
            "processId": null,
            "capabilities": {},
            "initializationOptions": { "diagnostics": { "source": "cnvl" } }
        }),
    );
    let Message::Response(init) = recv(&client) else {
        panic!("expected initialize response");
    };
    let caps = &init.result.expect("initialize result")["capabilities"];
    assert_eq!(caps["textDocumentSync"]["change"], json!(1));
    assert_eq!(caps["textDocumentSync"]["save"]["includeText"], json!(true));
    assert!(caps["completionProvider"].is_object());
    send_notification(&client, "initialized", json!({}));

    send_notification(
        &client,
        "textDocument/didOpen",
        json!({
            "textDocument": {
                "uri": "file:///demo.cnvl",
                "languageId": "carnival",
                "version": 1,
                "text": "meta.name 'D'\nmeta.version '1'\nmeta.author 'A'\nMOV 5\n"
            }
        }),
    );
    let Message::Notification(publish) = recv(&client) else {
        panic!("expected publishDiagnostics");
    };
    assert_eq!(publish.method, "textDocument/publishDiagnostics");
    let params: PublishDiagnosticsParams =
        serde_json::from_value(publish.params).expect("publish params");
    assert_eq!(params.diagnostics.len(), 1);
    assert_eq!(params.diagnostics[0].source.as_deref(), Some("cnvl"));
    assert_eq!(params.diagnostics[0].range.start.line, 3);

    send_request(&client, 2, "shutdown", serde_json::Value::Null);
    let Message::Response(shutdown) = recv(&client) else {
        panic!("expected shutdown response");
    };
    assert_eq!(shutdown.id, RequestId::from(2));
    send_notification(&client, "exit", serde_json::Value::Null);

    handle
        .join()
        .expect("server thread")
        .expect("server result");
}
