#[derive(Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub service: String,
}

/// Login posts these as a form, register as JSON.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default = "bearer")]
    pub token_type: String,
}

fn bearer() -> String {
    "bearer".into()
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct NoteCreate {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct NoteUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl NoteUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PlanCreate {
    pub title: String,
    pub is_done: bool,
}

impl PlanCreate {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            is_done: false,
        }
    }
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct PlanUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_done: Option<bool>,
}

impl PlanUpdate {
    pub fn done(is_done: bool) -> Self {
        Self {
            title: None,
            is_done: Some(is_done),
        }
    }

    pub fn rename(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            is_done: None,
        }
    }
}

/// Error payload the backend attaches to 4xx responses. `detail` is a plain message for
/// handled errors and a list of field errors for request validation failures.
#[derive(Debug, serde::Deserialize)]
pub struct ErrorMessage {
    pub detail: ErrorDetail,
}

#[derive(Debug, serde::Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Fields(Vec<FieldError>),
}

#[derive(Debug, serde::Deserialize)]
pub struct FieldError {
    pub msg: String,
}

impl ErrorMessage {
    pub fn message(&self) -> String {
        match &self.detail {
            ErrorDetail::Message(v) => v.clone(),
            ErrorDetail::Fields(v) => v
                .iter()
                .map(|x| x.msg.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn partial_updates_skip_unset_fields() {
        let value = serde_json::to_value(PlanUpdate::done(true)).unwrap();
        assert_eq!(value, json!({"is_done": true}));

        let value = serde_json::to_value(NoteUpdate {
            title: Some("new".into()),
            content: None,
        })
        .unwrap();
        assert_eq!(value, json!({"title": "new"}));
    }

    #[test]
    fn validation_detail_is_joined() {
        let err: ErrorMessage = serde_json::from_value(json!({
            "detail": [
                {"loc": ["body", "username"], "msg": "too short", "type": "value_error"},
                {"loc": ["body", "password"], "msg": "field required", "type": "missing"},
            ]
        }))
        .unwrap();
        assert_eq!(err.message(), "too short; field required");
    }

    #[test]
    fn token_type_defaults_to_bearer() {
        let token: Token = serde_json::from_value(json!({"access_token": "abc"})).unwrap();
        assert_eq!(token.token_type, "bearer");
    }
}
