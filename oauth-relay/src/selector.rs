//! Environment selectors.
//!
//! Every backend environment prefixes the tokens it issues with its selector
//! and an underscore before base64url-encoding them. Authorization codes carry
//! the prefix directly; refresh tokens are JWTs whose `jti` claim carries it.

use base64::Engine;
use base64::alphabet::URL_SAFE;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

/// base64url that accepts input with or without padding.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decodes base64url, also accepting the standard alphabet's `+` and `/`.
fn decode(encoded: &str) -> Option<Vec<u8>> {
    let normalized: String = encoded
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            c => c,
        })
        .collect();
    URL_SAFE_LENIENT.decode(normalized).ok()
}

/// Text before the first underscore. `None` when there is no underscore.
fn prefix(text: &str) -> Option<String> {
    text.split_once('_').map(|(selector, _)| selector.to_string())
}

/// Pads a base64 string to a multiple of four characters.
pub fn pad_base64(encoded: &str) -> String {
    let missing = (4 - encoded.len() % 4) % 4;
    let mut padded = String::with_capacity(encoded.len() + missing);
    padded.push_str(encoded);
    padded.extend(std::iter::repeat_n('=', missing));
    padded
}

/// Selector of an authorization code.
///
/// Codes are normally base64url; a code that does not decode to text holding
/// an underscore is read as plain text.
pub fn from_authorization_code(code: &str) -> Option<String> {
    decode(code)
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .and_then(|text| prefix(&text))
        .or_else(|| prefix(code))
}

/// Selector of a JWT-shaped refresh token.
///
/// The payload segment is decoded; when it is a JSON object with a string
/// `jti` claim, the claim is decoded again and its prefix taken. Otherwise the
/// decoded payload text is used as is.
pub fn from_refresh_token(token: &str) -> Option<String> {
    let payload = token.split('.').nth(1)?;
    let payload = String::from_utf8_lossy(&decode(payload)?).into_owned();

    let jti = serde_json::from_str::<serde_json::Value>(&payload)
        .ok()
        .and_then(|claims| claims.get("jti")?.as_str().map(str::to_string));

    match jti {
        Some(jti) => {
            let decoded = decode(&jti)?;
            prefix(&String::from_utf8_lossy(&decoded))
        }
        None => prefix(&payload),
    }
}

#[cfg(test)]
pub(crate) fn encode(raw: &str) -> String {
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(raw)
}

#[cfg(test)]
pub(crate) fn refresh_token_for(service_token: &str) -> String {
    let header = encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let claims = encode(&format!(
        r#"{{"user_name":"device","jti":"{}","exp":1700000000}}"#,
        encode(service_token)
    ));
    format!("{header}.{claims}.c2lnbmF0dXJl")
}
