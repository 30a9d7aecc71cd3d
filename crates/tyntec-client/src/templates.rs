//! WhatsApp template management endpoints.

use serde_json::Value;
use tyntec_schema::management::{
    LocalizationRequest, TemplateList, TemplatePatchRequest, TemplateRequest, TemplateResponse,
};
use tyntec_transport::{ApiResponse, HttpMethod, Transport};

use crate::client::Client;
use crate::error::Result;

fn templates_endpoint(account: &str) -> String {
    format!("/channels/whatsapp/accounts/{account}/templates")
}

fn template_endpoint(account: &str, name: &str) -> String {
    format!("{}/{name}", templates_endpoint(account))
}

impl<T: Transport> Client<T> {
    /// `GET /channels/whatsapp/accounts/{account}/templates`
    pub fn list_templates(&self, account: Option<&str>) -> Result<TemplateList> {
        let endpoint = templates_endpoint(self.account(account)?);
        Ok(self.call(HttpMethod::Get, &endpoint, None)?.parse()?)
    }

    /// `GET /channels/whatsapp/accounts/{account}/templates/{name}`
    pub fn get_template(&self, name: &str, account: Option<&str>) -> Result<TemplateResponse> {
        let endpoint = template_endpoint(self.account(account)?, name);
        Ok(self.call(HttpMethod::Get, &endpoint, None)?.parse()?)
    }

    /// Validate and submit a new template.
    pub fn create_template(&self, template: &Value, account: Option<&str>) -> Result<ApiResponse> {
        let endpoint = templates_endpoint(self.account(account)?);
        let request = TemplateRequest::validate(template)?;
        let body = serde_json::to_value(&request)?;
        self.call(HttpMethod::Post, &endpoint, Some(&body))
    }

    /// Validate and add a localization to the template `name`.
    pub fn add_template_localization(
        &self,
        name: &str,
        localization: &Value,
        account: Option<&str>,
    ) -> Result<ApiResponse> {
        let endpoint = format!("{}/localizations", template_endpoint(self.account(account)?, name));
        let request = LocalizationRequest::validate(localization)?;
        let body = serde_json::to_value(&request)?;
        self.call(HttpMethod::Post, &endpoint, Some(&body))
    }

    pub fn delete_template(&self, name: &str, account: Option<&str>) -> Result<ApiResponse> {
        let endpoint = template_endpoint(self.account(account)?, name);
        self.call(HttpMethod::Delete, &endpoint, None)
    }

    pub fn list_localizations(&self, name: &str, account: Option<&str>) -> Result<ApiResponse> {
        let endpoint = format!("{}/localizations", template_endpoint(self.account(account)?, name));
        self.call(HttpMethod::Get, &endpoint, None)
    }

    /// `PATCH .../templates/{name}/{language}` with `updates` passed through as given.
    pub fn edit_template(
        &self,
        name: &str,
        language: &str,
        updates: &Value,
        account: Option<&str>,
    ) -> Result<ApiResponse> {
        let endpoint = format!("{}/{language}", template_endpoint(self.account(account)?, name));
        self.call(HttpMethod::Patch, &endpoint, Some(updates))
    }

    /// Change the category of a template localization.
    pub fn patch_template_category(
        &self,
        name: &str,
        language: &str,
        patch: &Value,
        account: Option<&str>,
    ) -> Result<ApiResponse> {
        let patch = TemplatePatchRequest::validate(patch)?;
        self.edit_template(name, language, &serde_json::to_value(&patch)?, account)
    }
}
