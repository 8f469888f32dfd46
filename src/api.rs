use serde::Serialize;

/// JSON envelope returned by every endpoint.
#[derive(Debug, Serialize)]
pub struct APIResponse<T = ()> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl APIResponse {
    pub fn new_from_msg(msg: &str) -> Self {
        APIResponse {
            message: msg.to_owned(),
            data: None,
        }
    }
}

impl<T: Serialize> APIResponse<T> {
    pub fn new(msg: &str, data: T) -> Self {
        APIResponse {
            message: msg.to_owned(),
            data: Some(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_only_omits_data() {
        let body = serde_json::to_value(APIResponse::new_from_msg("book has been added")).unwrap();
        assert_eq!(body, serde_json::json!({ "message": "book has been added" }));
    }

    #[test]
    fn test_empty_list_is_kept() {
        let body = serde_json::to_value(APIResponse::new("books fetched successfully", Vec::<i32>::new())).unwrap();
        assert_eq!(body["data"], serde_json::json!([]));
    }
}
