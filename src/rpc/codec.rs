/*!
codec.rs - XML-RPC documents for the supervisor interface.

  encode_call(method, params) -> `<methodCall>` body
  decode_response(body)       -> Value | RemoteError::Fault | RemoteError::Malformed

Responses are read through quick-xml's serde deserializer into a wire
model mirroring the XML-RPC grammar, then folded into `Value`. `Value`
converts into `serde_json::Value` so typed records (ProcessInfo, call
statuses) come out of plain `serde_json::from_value`.

Supported value types: int / i4, boolean, string, double,
dateTime.iso8601, base64, nil, struct, array and untyped text.
*/

use quick_xml::escape::escape;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;

use super::RemoteError;

/// An XML-RPC value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Bool(bool),
    String(String),
    Double(f64),
    DateTime(String),
    Base64(String),
    Struct(BTreeMap<String, Value>),
    Array(Vec<Value>),
    Nil,
}

impl Value {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn member(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Struct(members) => members.get(key),
            _ => None,
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Int(n) => serde_json::Value::Number(n.into()),
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::String(s) | Value::DateTime(s) | Value::Base64(s) => {
                serde_json::Value::String(s)
            }
            Value::Double(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Struct(members) => serde_json::Value::Object(
                members
                    .into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
            Value::Array(items) => {
                serde_json::Value::Array(items.into_iter().map(serde_json::Value::from).collect())
            }
            Value::Nil => serde_json::Value::Null,
        }
    }
}

/* ---- Encoding ---- */

/// Build a `<methodCall>` document.
pub fn encode_call(method: &str, params: &[Value]) -> String {
    let mut out = String::from("<?xml version=\"1.0\"?>\n<methodCall>");
    let _ = write!(out, "<methodName>{}</methodName><params>", escape(method));
    for p in params {
        out.push_str("<param>");
        write_value(&mut out, p);
        out.push_str("</param>");
    }
    out.push_str("</params></methodCall>");
    out
}

fn write_value(out: &mut String, value: &Value) {
    out.push_str("<value>");
    match value {
        Value::Int(n) => {
            let _ = write!(out, "<int>{n}</int>");
        }
        Value::Bool(b) => {
            let _ = write!(out, "<boolean>{}</boolean>", u8::from(*b));
        }
        Value::String(s) => {
            let _ = write!(out, "<string>{}</string>", escape(s.as_str()));
        }
        Value::Double(f) => {
            let _ = write!(out, "<double>{f}</double>");
        }
        Value::DateTime(s) => {
            let _ = write!(
                out,
                "<dateTime.iso8601>{}</dateTime.iso8601>",
                escape(s.as_str())
            );
        }
        Value::Base64(s) => {
            let _ = write!(out, "<base64>{}</base64>", escape(s.as_str()));
        }
        Value::Struct(members) => {
            out.push_str("<struct>");
            for (name, v) in members {
                let _ = write!(out, "<member><name>{}</name>", escape(name.as_str()));
                write_value(out, v);
                out.push_str("</member>");
            }
            out.push_str("</struct>");
        }
        Value::Array(items) => {
            out.push_str("<array><data>");
            for v in items {
                write_value(out, v);
            }
            out.push_str("</data></array>");
        }
        Value::Nil => out.push_str("<nil/>"),
    }
    out.push_str("</value>");
}

/* ---- Decoding ---- */

#[derive(Debug, Deserialize)]
struct MethodResponse {
    params: Option<WireParams>,
    fault: Option<WireFault>,
}

#[derive(Debug, Deserialize)]
struct WireParams {
    #[serde(default)]
    param: Vec<WireParam>,
}

#[derive(Debug, Deserialize)]
struct WireParam {
    value: WireValue,
}

#[derive(Debug, Deserialize)]
struct WireFault {
    value: WireValue,
}

/// `<value></value>` has no child; XML-RPC reads it as an empty string.
#[derive(Debug, Deserialize)]
struct WireValue {
    #[serde(rename = "$value", default)]
    kind: Option<WireKind>,
}

#[derive(Debug, Deserialize)]
enum WireKind {
    #[serde(rename = "int", alias = "i4")]
    Int(i64),
    #[serde(rename = "boolean")]
    Bool(bool),
    #[serde(rename = "string")]
    String(String),
    #[serde(rename = "double")]
    Double(f64),
    #[serde(rename = "dateTime.iso8601")]
    DateTime(String),
    #[serde(rename = "base64")]
    Base64(String),
    #[serde(rename = "nil")]
    Nil,
    #[serde(rename = "struct")]
    Struct(WireStruct),
    #[serde(rename = "array")]
    Array(WireArray),
    #[serde(rename = "$text")]
    Text(String),
}

#[derive(Debug, Deserialize)]
struct WireStruct {
    #[serde(rename = "member", default)]
    members: Vec<WireMember>,
}

#[derive(Debug, Deserialize)]
struct WireMember {
    name: String,
    value: WireValue,
}

#[derive(Debug, Deserialize)]
struct WireArray {
    data: WireData,
}

#[derive(Debug, Deserialize)]
struct WireData {
    #[serde(rename = "value", default)]
    values: Vec<WireValue>,
}

impl From<WireValue> for Value {
    fn from(wire: WireValue) -> Self {
        let Some(kind) = wire.kind else {
            return Value::String(String::new());
        };
        match kind {
            WireKind::Int(n) => Value::Int(n),
            WireKind::Bool(b) => Value::Bool(b),
            WireKind::String(s) | WireKind::Text(s) => Value::String(s),
            WireKind::Double(f) => Value::Double(f),
            WireKind::DateTime(s) => Value::DateTime(s),
            WireKind::Base64(s) => Value::Base64(s),
            WireKind::Nil => Value::Nil,
            WireKind::Struct(s) => Value::Struct(
                s.members
                    .into_iter()
                    .map(|m| (m.name, Value::from(m.value)))
                    .collect(),
            ),
            WireKind::Array(a) => {
                Value::Array(a.data.values.into_iter().map(Value::from).collect())
            }
        }
    }
}

/// Decode a `<methodResponse>` body into its single return value.
///
/// A fault response becomes `RemoteError::Fault`; a response without
/// parameters decodes to `Value::Nil`.
pub fn decode_response(body: &str) -> Result<Value, RemoteError> {
    let response: MethodResponse =
        quick_xml::de::from_str(body).map_err(|e| RemoteError::Malformed(e.to_string()))?;

    if let Some(fault) = response.fault {
        let value = Value::from(fault.value);
        let code = value
            .member("faultCode")
            .and_then(Value::as_i64)
            .unwrap_or_default();
        let message = value
            .member("faultString")
            .and_then(Value::as_str)
            .unwrap_or("unknown fault")
            .to_string();
        return Err(RemoteError::Fault { code, message });
    }

    let Some(params) = response.params else {
        return Err(RemoteError::Malformed(
            "methodResponse carries neither params nor fault".into(),
        ));
    };

    Ok(params
        .param
        .into_iter()
        .next()
        .map(|p| Value::from(p.value))
        .unwrap_or(Value::Nil))
}

/* ---- Tests ---- */
#[cfg(test)]
mod tests {
    use super::*;

    const ALL_INFO: &str = r#"<?xml version='1.0'?>
<methodResponse>
<params>
<param>
<value><array><data>
<value><struct>
<member>
<name>name</name>
<value><string>web_1</string></value>
</member>
<member>
<name>group</name>
<value><string>web</string></value>
</member>
<member>
<name>pid</name>
<value><int>321</int></value>
</member>
<member>
<name>state</name>
<value><i4>20</i4></value>
</member>
<member>
<name>statename</name>
<value><string>RUNNING</string></value>
</member>
<member>
<name>start</name>
<value><int>1700000000</int></value>
</member>
<member>
<name>stop</name>
<value><int>0</int></value>
</member>
<member>
<name>description</name>
<value>pid 321, uptime 0:01:02</value>
</member>
</struct></value>
</data></array></value>
</param>
</params>
</methodResponse>
"#;

    #[test]
    fn encode_escapes_string_params() {
        let body = encode_call(
            "supervisor.startProcess",
            &[Value::String("a<b&c".into()), Value::Bool(true)],
        );
        assert!(body.contains("<methodName>supervisor.startProcess</methodName>"));
        assert!(body.contains("<string>a&lt;b&amp;c</string>"));
        assert!(body.contains("<boolean>1</boolean>"));
        assert!(body.ends_with("</params></methodCall>"));
    }

    #[test]
    fn encode_without_params() {
        let body = encode_call("supervisor.getAllProcessInfo", &[]);
        assert!(body.contains("<params></params>"));
    }

    #[test]
    fn decode_process_info_array() {
        let value = decode_response(ALL_INFO).unwrap();
        let Value::Array(items) = &value else {
            panic!("expected array, got {value:?}");
        };
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].member("pid"), Some(&Value::Int(321)));
        assert_eq!(items[0].member("state"), Some(&Value::Int(20)));
        assert_eq!(
            items[0].member("description").and_then(Value::as_str),
            Some("pid 321, uptime 0:01:02")
        );
    }

    #[test]
    fn decoded_value_converts_to_json() {
        let json = serde_json::Value::from(decode_response(ALL_INFO).unwrap());
        assert_eq!(json[0]["name"], serde_json::json!("web_1"));
        assert_eq!(json[0]["start"], serde_json::json!(1_700_000_000));
    }

    #[test]
    fn decode_boolean_result() {
        let body = "<?xml version='1.0'?><methodResponse><params><param>\
<value><boolean>1</boolean></value></param></params></methodResponse>";
        assert_eq!(decode_response(body).unwrap(), Value::Bool(true));
    }

    #[test]
    fn empty_untyped_value_is_an_empty_string() {
        let body = "<?xml version='1.0'?><methodResponse><params><param><value><struct>\
<member><name>spawnerr</name><value></value></member>\
<member><name>pid</name><value><int>7</int></value></member>\
</struct></value></param></params></methodResponse>";
        let value = decode_response(body).unwrap();
        assert_eq!(value.member("spawnerr"), Some(&Value::String(String::new())));
        assert_eq!(value.member("pid"), Some(&Value::Int(7)));
    }

    #[test]
    fn decode_fault() {
        let body = r#"<?xml version='1.0'?>
<methodResponse>
<fault>
<value><struct>
<member>
<name>faultCode</name>
<value><int>10</int></value>
</member>
<member>
<name>faultString</name>
<value><string>BAD_NAME: ghost</string></value>
</member>
</struct></value>
</fault>
</methodResponse>"#;
        let err = decode_response(body).unwrap_err();
        assert_eq!(
            err,
            RemoteError::Fault {
                code: 10,
                message: "BAD_NAME: ghost".into()
            }
        );
    }

    #[test]
    fn decode_garbage_is_malformed() {
        let err = decode_response("<html>nope</html>").unwrap_err();
        assert!(matches!(err, RemoteError::Malformed(_)), "got {err:?}");
    }
}
