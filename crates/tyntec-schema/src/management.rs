//! Request and response payloads of the WhatsApp template management endpoints.
//!
//! Requests are validated with the same issue-collecting [`Checker`] as
//! messages. Responses are plain serde types read leniently from the API.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::checker::Checker;
use crate::config::RegistryConfig;
use crate::error::ValidationResult;
use crate::union::DiscriminatedUnion;

const TYPE_FIELD: &str = "type";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemplateCategory {
    Authentication,
    Marketing,
    Utility,
}

impl TemplateCategory {
    const CHOICES: [(&'static str, TemplateCategory); 3] = [
        ("AUTHENTICATION", TemplateCategory::Authentication),
        ("MARKETING", TemplateCategory::Marketing),
        ("UTILITY", TemplateCategory::Utility),
    ];
}

/// Review state of a template localization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemplateStatus {
    Approved,
    Pending,
    Rejected,
    Disabled,
    Deleted,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OtpType {
    CopyCode,
    OneTap,
    ZeroTap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowAction {
    Navigate,
    DataExchange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextExample {
    pub texts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaExample {
    pub url: String,
}

/// One component of a template localization, keyed by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum ComponentRequest {
    Text {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        example: Option<TextExample>,
    },
    Image {
        example: MediaExample,
    },
    Video {
        example: MediaExample,
    },
    Document {
        example: MediaExample,
    },
    Location,
    Body {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        add_security_recommendation: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        example: Option<TextExample>,
    },
    Footer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code_expiration_minutes: Option<u32>,
    },
    Buttons {
        buttons: Vec<ButtonRequest>,
    },
    Carousel {
        cards: Vec<CarouselCard>,
    },
}

/// A carousel card. Its components are limited to headers, body and buttons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarouselCard {
    pub components: Vec<ComponentRequest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum ButtonRequest {
    QuickReply {
        text: String,
    },
    Url {
        text: String,
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        example: Option<Vec<String>>,
    },
    PhoneNumber {
        text: String,
        phone_number: String,
    },
    Otp {
        otp_type: OtpType,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        autofill_button_text: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        package_name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        signature_hash: Option<String>,
    },
    Flow {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        flow_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        flow_action: Option<FlowAction>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        navigate_screen: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizationRequest {
    pub language: String,
    pub components: Vec<ComponentRequest>,
}

/// Payload for creating a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRequest {
    pub name: String,
    pub category: TemplateCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_category_change: Option<bool>,
    pub localizations: Vec<LocalizationRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatePatchRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<TemplateCategory>,
}

fn run<T>(
    value: &Value,
    config: RegistryConfig,
    check: impl FnOnce(&mut Checker, &Value) -> Option<T>,
) -> ValidationResult<T> {
    let mut checker = Checker::new(config);
    let out = check(&mut checker, value);
    checker.finish(out)
}

impl TemplateRequest {
    pub fn validate(value: &Value) -> ValidationResult<Self> {
        Self::validate_with(value, RegistryConfig::default())
    }

    pub fn validate_with(value: &Value, config: RegistryConfig) -> ValidationResult<Self> {
        run(value, config, check_template_request)
    }
}

impl LocalizationRequest {
    pub fn validate(value: &Value) -> ValidationResult<Self> {
        Self::validate_with(value, RegistryConfig::default())
    }

    pub fn validate_with(value: &Value, config: RegistryConfig) -> ValidationResult<Self> {
        run(value, config, check_localization)
    }
}

impl TemplatePatchRequest {
    pub fn validate(value: &Value) -> ValidationResult<Self> {
        run(value, RegistryConfig::default(), |c, value| {
            let map = c.object(value, "template patch object")?;
            let category = c.optional(map, "category", |c, v| c.one_of(v, &TemplateCategory::CHOICES));
            c.allow_only(map, &["category"]);
            Some(TemplatePatchRequest {
                category: category?,
            })
        })
    }
}

fn check_text_example(c: &mut Checker, value: &Value) -> Option<TextExample> {
    let map = c.object(value, "example object")?;
    let texts = c.required(map, "texts", "array of strings", |c, v| {
        c.array(v, "array of strings", Checker::string)
    });
    c.allow_only(map, &["texts"]);
    Some(TextExample { texts: texts? })
}

fn check_media_example(c: &mut Checker, value: &Value) -> Option<MediaExample> {
    let map = c.object(value, "example object")?;
    let url = c.required_url(map, "url");
    c.allow_only(map, &["url"]);
    Some(MediaExample { url: url? })
}

fn media_header(
    c: &mut Checker,
    map: &Map<String, Value>,
    build: fn(MediaExample) -> ComponentRequest,
) -> Option<ComponentRequest> {
    let example = c.required(map, "example", "example object", check_media_example);
    c.allow_only(map, &[TYPE_FIELD, "example"]);
    Some(build(example?))
}

fn component_union() -> &'static DiscriminatedUnion<ComponentRequest> {
    static UNION: OnceLock<DiscriminatedUnion<ComponentRequest>> = OnceLock::new();
    UNION.get_or_init(|| {
        DiscriminatedUnion::new(TYPE_FIELD)
            .variant("TEXT", |c, map| {
                let text = c.optional_string(map, "text");
                let example = c.optional(map, "example", check_text_example);
                c.allow_only(map, &[TYPE_FIELD, "text", "example"]);
                Some(ComponentRequest::Text {
                    text: text?,
                    example: example?,
                })
            })
            .variant("IMAGE", |c, map| {
                media_header(c, map, |example| ComponentRequest::Image { example })
            })
            .variant("VIDEO", |c, map| {
                media_header(c, map, |example| ComponentRequest::Video { example })
            })
            .variant("DOCUMENT", |c, map| {
                media_header(c, map, |example| ComponentRequest::Document { example })
            })
            .variant("LOCATION", |c, map| {
                c.allow_only(map, &[TYPE_FIELD]);
                Some(ComponentRequest::Location)
            })
            .variant("BODY", |c, map| {
                let text = c.optional_string(map, "text");
                let add_security_recommendation = c.optional_bool(map, "addSecurityRecommendation");
                let example = c.optional(map, "example", check_text_example);
                c.allow_only(map, &[TYPE_FIELD, "text", "addSecurityRecommendation", "example"]);
                Some(ComponentRequest::Body {
                    text: text?,
                    add_security_recommendation: add_security_recommendation?,
                    example: example?,
                })
            })
            .variant("FOOTER", |c, map| {
                let text = c.optional_string(map, "text");
                let code_expiration_minutes = c.optional(map, "codeExpirationMinutes", Checker::index);
                c.allow_only(map, &[TYPE_FIELD, "text", "codeExpirationMinutes"]);
                Some(ComponentRequest::Footer {
                    text: text?,
                    code_expiration_minutes: code_expiration_minutes?,
                })
            })
            .variant("BUTTONS", |c, map| {
                let buttons = c.required(map, "buttons", "array of buttons", |c, v| {
                    c.array(v, "array of buttons", |c, button| {
                        button_union().check(c, button, "button object")
                    })
                });
                c.allow_only(map, &[TYPE_FIELD, "buttons"]);
                Some(ComponentRequest::Buttons { buttons: buttons? })
            })
            .variant("CAROUSEL", |c, map| {
                let cards = c.required(map, "cards", "array of cards", |c, v| {
                    c.array(v, "array of cards", check_card)
                });
                c.allow_only(map, &[TYPE_FIELD, "cards"]);
                Some(ComponentRequest::Carousel { cards: cards? })
            })
    })
}

fn card_union() -> &'static DiscriminatedUnion<ComponentRequest> {
    static UNION: OnceLock<DiscriminatedUnion<ComponentRequest>> = OnceLock::new();
    UNION.get_or_init(|| {
        component_union().restrict(&["TEXT", "IMAGE", "VIDEO", "DOCUMENT", "LOCATION", "BODY", "BUTTONS"])
    })
}

fn check_card(c: &mut Checker, value: &Value) -> Option<CarouselCard> {
    let map = c.object(value, "card object")?;
    let components = c.required(map, "components", "array of card components", |c, v| {
        c.array(v, "array of card components", |c, component| {
            card_union().check(c, component, "component object")
        })
    });
    c.allow_only(map, &["components"]);
    Some(CarouselCard {
        components: components?,
    })
}

fn button_union() -> &'static DiscriminatedUnion<ButtonRequest> {
    static UNION: OnceLock<DiscriminatedUnion<ButtonRequest>> = OnceLock::new();
    UNION.get_or_init(|| {
        DiscriminatedUnion::new(TYPE_FIELD)
            .variant("QUICK_REPLY", |c, map| {
                let text = c.required_string(map, "text");
                c.allow_only(map, &[TYPE_FIELD, "text"]);
                Some(ButtonRequest::QuickReply { text: text? })
            })
            .variant("URL", |c, map| {
                let text = c.required_string(map, "text");
                let url = c.required_url(map, "url");
                let example = c.optional(map, "example", |c, v| {
                    c.array(v, "array of strings", Checker::string)
                });
                c.allow_only(map, &[TYPE_FIELD, "text", "url", "example"]);
                Some(ButtonRequest::Url {
                    text: text?,
                    url: url?,
                    example: example?,
                })
            })
            .variant("PHONE_NUMBER", |c, map| {
                let text = c.required_string(map, "text");
                let phone_number = c.required_string(map, "phoneNumber");
                c.allow_only(map, &[TYPE_FIELD, "text", "phoneNumber"]);
                Some(ButtonRequest::PhoneNumber {
                    text: text?,
                    phone_number: phone_number?,
                })
            })
            .variant("OTP", |c, map| {
                let otp_type = c.required(map, "otpType", "OTP type", |c, v| {
                    c.one_of(
                        v,
                        &[
                            ("COPY_CODE", OtpType::CopyCode),
                            ("ONE_TAP", OtpType::OneTap),
                            ("ZERO_TAP", OtpType::ZeroTap),
                        ],
                    )
                });
                let text = c.optional_string(map, "text");
                let autofill_button_text = c.optional_string(map, "autofillButtonText");
                let package_name = c.optional_string(map, "packageName");
                let signature_hash = c.optional_string(map, "signatureHash");
                c.allow_only(
                    map,
                    &[
                        TYPE_FIELD,
                        "otpType",
                        "text",
                        "autofillButtonText",
                        "packageName",
                        "signatureHash",
                    ],
                );
                Some(ButtonRequest::Otp {
                    otp_type: otp_type?,
                    text: text?,
                    autofill_button_text: autofill_button_text?,
                    package_name: package_name?,
                    signature_hash: signature_hash?,
                })
            })
            .variant("FLOW", |c, map| {
                let text = c.required_string(map, "text");
                let flow_id = c.optional_string(map, "flowId");
                let flow_action = c.optional(map, "flowAction", |c, v| {
                    c.one_of(
                        v,
                        &[
                            ("navigate", FlowAction::Navigate),
                            ("data_exchange", FlowAction::DataExchange),
                        ],
                    )
                });
                let navigate_screen = c.optional_string(map, "navigateScreen");
                c.allow_only(
                    map,
                    &[TYPE_FIELD, "text", "flowId", "flowAction", "navigateScreen"],
                );
                Some(ButtonRequest::Flow {
                    text: text?,
                    flow_id: flow_id?,
                    flow_action: flow_action?,
                    navigate_screen: navigate_screen?,
                })
            })
    })
}

fn check_localization(c: &mut Checker, value: &Value) -> Option<LocalizationRequest> {
    let map = c.object(value, "localization object")?;
    let language = c.required_string(map, "language");
    let components = c.required(map, "components", "array of components", |c, v| {
        c.array(v, "array of components", |c, component| {
            component_union().check(c, component, "component object")
        })
    });
    c.allow_only(map, &["language", "components"]);
    Some(LocalizationRequest {
        language: language?,
        components: components?,
    })
}

fn check_template_request(c: &mut Checker, value: &Value) -> Option<TemplateRequest> {
    let map = c.object(value, "template request object")?;
    let name = c.required_string(map, "name");
    let category = c.required(map, "category", "template category", |c, v| {
        c.one_of(v, &TemplateCategory::CHOICES)
    });
    let allow_category_change = c.optional_bool(map, "allowCategoryChange");
    let localizations = c.required(map, "localizations", "array of localizations", |c, v| {
        c.array(v, "array of localizations", check_localization)
    });
    c.allow_only(
        map,
        &["name", "category", "allowCategoryChange", "localizations"],
    );
    Some(TemplateRequest {
        name: name?,
        category: category?,
        allow_category_change: allow_category_change?,
        localizations: localizations?,
    })
}

/// A button as reported back by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonResponse {
    #[serde(rename = "type")]
    pub button_type: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otp_type: Option<OtpType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autofill_button_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigate_screen: Option<String>,
}

/// A localization component as reported back by the API. Fields that do not
/// apply to the component's `type` are absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentResponse {
    #[serde(rename = "type")]
    pub component_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_expiration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buttons: Option<Vec<ButtonResponse>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards: Option<Vec<CardResponse>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardResponse {
    #[serde(default)]
    pub components: Vec<ComponentResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizationResponse {
    pub language: String,
    pub status: TemplateStatus,
    #[serde(default)]
    pub components: Vec<ComponentResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub category: TemplateCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TemplateStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localizations: Option<Vec<LocalizationResponse>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateList {
    #[serde(default)]
    pub templates: Vec<TemplateResponse>,
}
