use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};
use tyntec_schema::content::{Contact, Interactive, Location, Reaction, Template};
use tyntec_schema::{Content, Message, SchemaRegistry};
use tyntec_transport::{ApiResponse, ClientConfig, HttpMethod, Transport};

use crate::error::{ClientError, Result};

pub const MESSAGES_ENDPOINT: &str = "/messages";

/// Registry key used for untyped messages.
pub const GENERIC_SCHEMA: &str = "whatsapp.message";

#[derive(Debug, Clone)]
enum RegistryHandle {
    Builtin,
    Shared(Arc<SchemaRegistry>),
}

/// Conversations API client.
///
/// Every outbound payload is validated against a registry schema first; a
/// payload that fails validation never reaches the transport.
#[derive(Debug, Clone)]
pub struct Client<T> {
    transport: T,
    config: ClientConfig,
    registry: RegistryHandle,
}

#[cfg(feature = "ureq")]
impl Client<tyntec_transport::UreqTransport> {
    /// Client over the blocking `ureq` transport.
    pub fn new(config: ClientConfig) -> Self {
        let transport = tyntec_transport::UreqTransport::from_config(&config);
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            transport,
            config,
            registry: RegistryHandle::Builtin,
        }
    }

    /// Validate against `registry` instead of the built-in schemas.
    pub fn with_schema_registry(mut self, registry: Arc<SchemaRegistry>) -> Self {
        self.registry = RegistryHandle::Shared(registry);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn registry(&self) -> &SchemaRegistry {
        match &self.registry {
            RegistryHandle::Builtin => SchemaRegistry::builtin(),
            RegistryHandle::Shared(registry) => registry.as_ref(),
        }
    }

    pub(crate) fn call(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse> {
        let response = self.transport.send(&self.config, method, endpoint, body)?;
        info!(%method, endpoint, status = response.status, "api call completed");
        Ok(response)
    }

    /// Validate `candidate` against the schema registered as `schema` and
    /// post the canonical message.
    pub fn send_validated(&self, schema: &str, candidate: &Value) -> Result<ApiResponse> {
        let message = self.registry().validate(schema, candidate).inspect_err(|err| {
            debug!(schema, error = %err, "refusing to send invalid message");
        })?;
        let body = serde_json::to_value(&message)?;
        self.call(HttpMethod::Post, MESSAGES_ENDPOINT, Some(&body))
    }

    /// Send a typed message, validated against the schema of its content type.
    pub fn send_message(&self, message: &Message) -> Result<ApiResponse> {
        let schema = format!("whatsapp.{}", message.content_type());
        let candidate = serde_json::to_value(message)?;
        self.send_validated(&schema, &candidate)
    }

    /// Send an untyped message. Any content type is accepted.
    pub fn send_whatsapp_message(&self, candidate: &Value) -> Result<ApiResponse> {
        self.send_validated(GENERIC_SCHEMA, candidate)
    }

    fn send_content(&self, from: &str, to: &str, content: Content) -> Result<ApiResponse> {
        self.send_message(&Message::whatsapp(from, to, content))
    }

    pub fn send_text_message(&self, from: &str, to: &str, text: &str) -> Result<ApiResponse> {
        self.send_content(from, to, Content::text(text))
    }

    pub fn send_image_message(
        &self,
        from: &str,
        to: &str,
        url: &str,
        caption: Option<&str>,
    ) -> Result<ApiResponse> {
        self.send_content(from, to, Content::image(url, caption.map(str::to_string)))
    }

    pub fn send_video_message(
        &self,
        from: &str,
        to: &str,
        url: &str,
        caption: Option<&str>,
    ) -> Result<ApiResponse> {
        self.send_content(from, to, Content::video(url, caption.map(str::to_string)))
    }

    pub fn send_document_message(
        &self,
        from: &str,
        to: &str,
        url: &str,
        caption: Option<&str>,
        filename: Option<&str>,
    ) -> Result<ApiResponse> {
        let content = Content::document(url, caption.map(str::to_string), filename.map(str::to_string));
        self.send_content(from, to, content)
    }

    pub fn send_audio_message(&self, from: &str, to: &str, url: &str) -> Result<ApiResponse> {
        self.send_content(from, to, Content::audio(url))
    }

    pub fn send_sticker_message(&self, from: &str, to: &str, url: &str) -> Result<ApiResponse> {
        self.send_content(from, to, Content::sticker(url))
    }

    pub fn send_location_message(&self, from: &str, to: &str, location: Location) -> Result<ApiResponse> {
        self.send_content(from, to, Content::Location { location })
    }

    pub fn send_contacts_message(
        &self,
        from: &str,
        to: &str,
        contacts: Vec<Contact>,
    ) -> Result<ApiResponse> {
        self.send_content(from, to, Content::Contacts { contacts })
    }

    pub fn send_reaction_message(
        &self,
        from: &str,
        to: &str,
        message_id: &str,
        emoji: &str,
    ) -> Result<ApiResponse> {
        let reaction = Reaction {
            message_id: message_id.to_string(),
            emoji: emoji.to_string(),
        };
        self.send_content(from, to, Content::Reaction { reaction })
    }

    pub fn send_template_message(&self, from: &str, to: &str, template: Template) -> Result<ApiResponse> {
        self.send_content(from, to, Content::Template { template })
    }

    pub fn send_interactive_message(
        &self,
        from: &str,
        to: &str,
        interactive: Interactive,
    ) -> Result<ApiResponse> {
        self.send_content(from, to, Content::Interactive { interactive })
    }

    /// Account id to use: the explicit one, else the configured default.
    pub(crate) fn account<'a>(&'a self, account: Option<&'a str>) -> Result<&'a str> {
        account
            .or_else(|| self.config.whatsapp_account_id())
            .ok_or(ClientError::MissingAccount)
    }
}
