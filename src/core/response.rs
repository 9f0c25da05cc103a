use serde_json::Value;

/// Provider return code for a successful call.
pub const SUCCESS_CODE: u16 = 200;

/// A provider reply together with the request that produced it.
///
/// Accessors never fail: absent optional data reads as `None`. Operations
/// with specialised replies add inherent accessors on `Response<TheirRequest>`.
#[derive(Debug, Clone)]
pub struct Response<R> {
    request: R,
    reply: Value,
}

impl<R> Response<R> {
    pub fn new(request: R, reply: Value) -> Self {
        Self { request, reply }
    }

    pub fn request(&self) -> &R {
        &self.request
    }

    pub fn reply(&self) -> &Value {
        &self.reply
    }

    pub fn into_parts(self) -> (R, Value) {
        (self.request, self.reply)
    }

    /// Dotted-path lookup (`transaction.VID`, `refunds.0.VID`). Nulls read as absent.
    pub fn field(&self, path: &str) -> Option<&Value> {
        let mut current = &self.reply;
        for segment in path.split('.') {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        if current.is_null() {
            None
        } else {
            Some(current)
        }
    }

    pub fn str_field(&self, path: &str) -> Option<&str> {
        self.field(path).and_then(Value::as_str)
    }

    /// Return code, sent as a number or a numeric string depending on the call.
    pub fn code(&self) -> Option<u16> {
        match self.field("return.returnCode")? {
            Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.str_field("return.returnString")
    }

    pub fn soap_id(&self) -> Option<&str> {
        self.str_field("return.soapId")
    }

    pub fn is_successful(&self) -> bool {
        self.code() == Some(SUCCESS_CODE)
    }

    pub fn transaction_id(&self) -> Option<&str> {
        self.str_field("transaction.merchantTransactionId")
    }

    pub fn transaction_reference(&self) -> Option<&str> {
        self.str_field("transaction.VID")
    }

    pub fn customer_id(&self) -> Option<&str> {
        self.str_field("account.merchantAccountId")
    }

    pub fn customer_reference(&self) -> Option<&str> {
        self.str_field("account.VID")
    }

    pub fn subscription_id(&self) -> Option<&str> {
        self.str_field("autobill.merchantAutoBillId")
    }

    pub fn subscription_reference(&self) -> Option<&str> {
        self.str_field("autobill.VID")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_successful_reply() {
        let response = Response::new(
            (),
            json!({
                "return": {"returnCode": "200", "returnString": "OK", "soapId": "abc"},
                "transaction": {"merchantTransactionId": "t-1", "VID": "v-1"}
            }),
        );

        assert!(response.is_successful());
        assert_eq!(response.code(), Some(200));
        assert_eq!(response.message(), Some("OK"));
        assert_eq!(response.soap_id(), Some("abc"));
        assert_eq!(response.transaction_id(), Some("t-1"));
        assert_eq!(response.transaction_reference(), Some("v-1"));
    }

    #[test]
    fn test_business_failure_is_not_successful() {
        let response = Response::new(
            (),
            json!({"return": {"returnCode": 402, "returnString": "Declined"}}),
        );
        assert!(!response.is_successful());
        assert_eq!(response.code(), Some(402));
    }

    #[test]
    fn test_missing_fields_read_as_none() {
        let response = Response::new((), json!({"autobill": {"VID": null}}));
        assert!(!response.is_successful());
        assert_eq!(response.code(), None);
        assert_eq!(response.subscription_id(), None);
        assert_eq!(response.subscription_reference(), None);
        assert_eq!(response.field("autobill.items.0"), None);
    }

    #[test]
    fn test_field_walks_arrays() {
        let response = Response::new((), json!({"refunds": [{"VID": "r-1"}, {"VID": "r-2"}]}));
        assert_eq!(response.str_field("refunds.1.VID"), Some("r-2"));
        assert_eq!(response.str_field("refunds.x.VID"), None);
    }
}
