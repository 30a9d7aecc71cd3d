use std::sync::Mutex;

use serde_json::{json, Value};
use tyntec_client::{Client, ClientError, MESSAGES_ENDPOINT};
use tyntec_schema::content::{Location, Template};
use tyntec_schema::management::TemplateCategory;
use tyntec_schema::IssueKind;
use tyntec_transport::{
    ClientConfig, HttpMethod, HttpRequest, HttpResponse, Transport, TransportError,
};

/// Records every request and answers with a canned response.
struct MockTransport {
    requests: Mutex<Vec<HttpRequest>>,
    status: u16,
    body: String,
}

impl MockTransport {
    fn answering(status: u16, body: Value) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            status,
            body: body.to_string(),
        }
    }

    fn ok() -> Self {
        Self::answering(202, json!({ "messageId": "77185196-664a-43ec-b14a-fe97036c697f" }))
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    fn execute(&self, request: &HttpRequest) -> tyntec_transport::Result<HttpResponse> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(HttpResponse {
            status: self.status,
            status_text: if self.status < 300 { "OK" } else { "Bad Request" }.to_string(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: self.body.clone(),
        })
    }
}

/// Fails every request before reaching a server.
struct Unreachable;

impl Transport for Unreachable {
    fn execute(&self, request: &HttpRequest) -> tyntec_transport::Result<HttpResponse> {
        Err(TransportError::Request {
            endpoint: request.endpoint.clone(),
            message: "connection refused".to_string(),
        })
    }
}

fn config() -> ClientConfig {
    ClientConfig::new("test-key")
        .with_base_url("https://api.test/conversations/v3")
        .unwrap()
}

fn client(transport: &MockTransport) -> Client<&MockTransport> {
    Client::with_transport(config(), transport)
}

fn sent_body(request: &HttpRequest) -> Value {
    serde_json::from_str(request.body.as_deref().expect("request should carry a body")).unwrap()
}

#[test]
fn text_message_posts_canonical_json() {
    let mock = MockTransport::ok();
    let response = client(&mock)
        .send_text_message("4923147790", "4917612345678", "hello")
        .expect("valid text should be sent");

    assert_eq!(response.status, 202);
    assert_eq!(response.data["messageId"], "77185196-664a-43ec-b14a-fe97036c697f");

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, HttpMethod::Post);
    assert_eq!(requests[0].endpoint, MESSAGES_ENDPOINT);
    assert_eq!(requests[0].url, "https://api.test/conversations/v3/messages");
    assert_eq!(requests[0].header("apikey"), Some("test-key"));
    assert_eq!(
        sent_body(&requests[0]),
        json!({
            "from": "4923147790",
            "to": "4917612345678",
            "channel": "whatsapp",
            "content": { "contentType": "text", "text": "hello" }
        })
    );
}

#[test]
fn invalid_message_never_reaches_transport() {
    let mock = MockTransport::ok();
    let err = client(&mock)
        .send_whatsapp_message(&json!({
            "from": "4923147790",
            "to": "4917612345678",
            "channel": "whatsapp",
            "content": { "contentType": "image", "image": { "url": "not a url" } }
        }))
        .unwrap_err();

    assert!(err.is_validation());
    let validation = err.validation().unwrap();
    let issue = validation.issue_at("content.image.url").expect("url issue");
    assert_eq!(issue.kind, IssueKind::InvalidFormat);
    assert!(mock.requests().is_empty());
}

#[test]
fn typed_helpers_are_validated_too() {
    let mock = MockTransport::ok();
    let err = client(&mock)
        .send_location_message("4923147790", "4917612345678", Location::new(91.0, 13.4, "Here", "Somewhere"))
        .unwrap_err();

    assert!(err.validation().unwrap().issue_at("content.location.latitude").is_some());
    assert!(mock.requests().is_empty());

    client(&mock)
        .send_image_message("4923147790", "4917612345678", "https://cdn.example.com/cat.png", Some("cat"))
        .unwrap();
    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(sent_body(&requests[0])["content"]["image"]["caption"], "cat");
}

#[test]
fn template_message_carries_components() {
    let mock = MockTransport::ok();
    let template = Template::new("order_shipped", "en").with_body_text("1234");
    client(&mock)
        .send_template_message("4923147790", "4917612345678", template)
        .unwrap();

    let body = sent_body(&mock.requests()[0]);
    assert_eq!(body["content"]["contentType"], "template");
    assert_eq!(body["content"]["template"]["templateId"], "order_shipped");
}

#[test]
fn unknown_schema_is_a_schema_error() {
    let mock = MockTransport::ok();
    let err = client(&mock)
        .send_validated("whatsapp.carrierPigeon", &json!({}))
        .unwrap_err();

    assert!(matches!(
        err,
        ClientError::Schema(tyntec_schema::SchemaError::NotFound { ref name }) if name == "whatsapp.carrierPigeon"
    ));
    assert!(mock.requests().is_empty());
}

#[test]
fn api_error_status_is_a_transport_error() {
    let mock = MockTransport::answering(400, json!({ "title": "Bad Request", "status": 400 }));
    let err = client(&mock)
        .send_text_message("4923147790", "4917612345678", "hello")
        .unwrap_err();

    assert!(err.is_transport());
    assert!(!err.is_validation());
    let ClientError::Transport(transport) = &err else {
        panic!("expected transport error, got {err:?}");
    };
    assert_eq!(transport.status(), Some(400));
    assert_eq!(transport.body_json().unwrap()["title"], "Bad Request");
}

#[test]
fn network_failure_is_a_transport_error() {
    let client = Client::with_transport(config(), Unreachable);
    let err = client
        .send_text_message("4923147790", "4917612345678", "hello")
        .unwrap_err();

    assert!(matches!(err, ClientError::Transport(TransportError::Request { .. })));
    assert!(err.to_string().contains("connection refused"));
}

#[test]
fn template_endpoints_need_an_account() {
    let mock = MockTransport::ok();
    let err = client(&mock).list_templates(None).unwrap_err();
    assert!(matches!(err, ClientError::MissingAccount));
    assert!(mock.requests().is_empty());
}

#[test]
fn template_management_endpoints() {
    let mock = MockTransport::answering(
        200,
        json!({ "templates": [{ "name": "order_shipped", "category": "UTILITY" }] }),
    );
    let client = Client::with_transport(config().with_whatsapp_account("acc-1"), &mock);

    let list = client.list_templates(None).unwrap();
    assert_eq!(list.templates[0].name, "order_shipped");
    assert_eq!(list.templates[0].category, TemplateCategory::Utility);

    client.delete_template("order_shipped", Some("acc-2")).unwrap();
    client.list_localizations("order_shipped", None).unwrap();
    client
        .edit_template("order_shipped", "en", &json!({ "components": [] }), None)
        .unwrap();

    let seen: Vec<(HttpMethod, String)> = mock
        .requests()
        .into_iter()
        .map(|request| (request.method, request.endpoint))
        .collect();
    assert_eq!(
        seen,
        vec![
            (HttpMethod::Get, "/channels/whatsapp/accounts/acc-1/templates".to_string()),
            (HttpMethod::Delete, "/channels/whatsapp/accounts/acc-2/templates/order_shipped".to_string()),
            (
                HttpMethod::Get,
                "/channels/whatsapp/accounts/acc-1/templates/order_shipped/localizations".to_string()
            ),
            (HttpMethod::Patch, "/channels/whatsapp/accounts/acc-1/templates/order_shipped/en".to_string()),
        ]
    );
}

#[test]
fn create_template_validates_first() {
    let mock = MockTransport::answering(201, json!({}));
    let client = Client::with_transport(config().with_whatsapp_account("acc-1"), &mock);

    let err = client
        .create_template(&json!({ "name": "x", "category": "PROMO", "localizations": [] }), None)
        .unwrap_err();
    assert!(err.validation().unwrap().issue_at("category").is_some());
    assert!(mock.requests().is_empty());

    client
        .create_template(
            &json!({
                "name": "welcome",
                "category": "MARKETING",
                "localizations": [{
                    "language": "en",
                    "components": [{ "type": "BODY", "text": "Welcome!" }]
                }]
            }),
            None,
        )
        .unwrap();
    let requests = mock.requests();
    assert_eq!(requests[0].method, HttpMethod::Post);
    assert_eq!(requests[0].endpoint, "/channels/whatsapp/accounts/acc-1/templates");
    assert_eq!(sent_body(&requests[0])["localizations"][0]["components"][0]["type"], "BODY");
}

#[test]
fn category_patch_is_validated() {
    let mock = MockTransport::answering(200, json!({}));
    let client = Client::with_transport(config().with_whatsapp_account("acc-1"), &mock);

    assert!(client
        .patch_template_category("welcome", "en", &json!({ "category": "NOPE" }), None)
        .unwrap_err()
        .is_validation());
    client
        .patch_template_category("welcome", "en", &json!({ "category": "UTILITY" }), None)
        .unwrap();

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(sent_body(&requests[0]), json!({ "category": "UTILITY" }));
}
