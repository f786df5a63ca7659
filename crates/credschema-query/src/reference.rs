//! # Schema Reference Helpers
//!
//! Pure helpers for filling the query's schema reference from a published
//! JSON-LD document: pick out the context URL and the credential type, and
//! classify or rewrite IPFS locations. Nothing here touches the network.

use serde_json::{Map, Value};
use url::Url;

/// Public gateway used to resolve bare IPFS hashes and `ipfs://` URLs.
pub const IPFS_GATEWAY: &str = "https://ipfs.io/ipfs/";

const CONTEXT_KEYWORDS: &[&str] = &["@protected", "@version", "@id", "@type", "id", "type"];
const GENERIC_TYPES: &[&str] = &["object", "array", "string", "number", "boolean", "null"];
const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// The document's JSON-LD context URL.
///
/// A string `@context` is returned as is; for an array, the first string
/// entry starting with `http`.
pub fn extract_json_ld_context(document: &Value) -> Option<String> {
    match document.get("@context")? {
        Value::String(context) => Some(context.clone()),
        Value::Array(entries) => entries
            .iter()
            .filter_map(Value::as_str)
            .find(|entry| entry.starts_with("http"))
            .map(str::to_string),
        _ => None,
    }
}

/// The credential type the document defines.
///
/// Prefers a term of `@context` whose definition is an object carrying
/// `@context` or `@id`. Falls back to the document's `type`, skipping
/// JSON-LD keywords, `VerifiableCredential`, and JSON Schema primitive names.
pub fn extract_schema_type(document: &Value) -> Option<String> {
    let from_context = match document.get("@context") {
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(Value::as_object)
            .find_map(type_term),
        Some(Value::Object(context)) => type_term(context),
        _ => None,
    };
    if from_context.is_some() {
        return from_context;
    }

    match document.get("type")? {
        Value::String(ty) if !is_generic_type(ty) => Some(ty.clone()),
        Value::Array(types) => types
            .iter()
            .filter_map(Value::as_str)
            .find(|ty| !ty.starts_with('@') && *ty != "VerifiableCredential" && !is_generic_type(ty))
            .map(str::to_string),
        _ => None,
    }
}

fn type_term(context: &Map<String, Value>) -> Option<String> {
    context.iter().find_map(|(key, definition)| {
        if CONTEXT_KEYWORDS.contains(&key.as_str()) || key.starts_with('@') {
            return None;
        }
        let definition = definition.as_object()?;
        (definition.contains_key("@context") || definition.contains_key("@id")).then(|| key.clone())
    })
}

fn is_generic_type(ty: &str) -> bool {
    GENERIC_TYPES.contains(&ty.to_lowercase().as_str())
}

/// Whether the input names IPFS content: a gateway or `ipfs://` URL, a
/// CIDv0 (`Qm` + 44 base58 chars) or CIDv1 (`baf...`) hash, or any https
/// URL mentioning `ipfs`.
pub fn is_valid_ipfs_url(input: &str) -> bool {
    if input.contains("ipfs.io/ipfs/") || input.contains("ipfs://") {
        return true;
    }
    if is_cid_v0(input) || is_cid_v1(input) {
        return true;
    }
    input.starts_with("https://") && input.contains("ipfs")
}

fn is_cid_v0(input: &str) -> bool {
    input
        .strip_prefix("Qm")
        .is_some_and(|rest| rest.len() == 44 && rest.chars().all(|c| BASE58_ALPHABET.contains(c)))
}

fn is_cid_v1(input: &str) -> bool {
    input.strip_prefix("baf").is_some_and(|rest| {
        !rest.is_empty()
            && rest
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    })
}

/// Whether the input parses as an absolute `http` or `https` URL.
pub fn is_valid_http_url(input: &str) -> bool {
    Url::parse(input).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

/// Rewrite a bare hash or `ipfs://` URL to its gateway URL. Anything else is
/// returned unchanged.
pub fn ipfs_gateway_url(input: &str) -> String {
    if input.starts_with("Qm") || input.starts_with("baf") {
        format!("{IPFS_GATEWAY}{input}")
    } else if input.contains("ipfs://") {
        input.replacen("ipfs://", IPFS_GATEWAY, 1)
    } else {
        input.to_string()
    }
}
