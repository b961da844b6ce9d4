use crate::errors::OauthRelayError;
use crate::inbound::InboundRequest;
use crate::selector;

/// The part of a token request that decides which environment serves it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Grant {
    AuthorizationCode { code: Option<String> },
    Refresh { refresh_token: Option<String> },
}

impl Grant {
    /// Reads the grant type and its credential from the query string, or from
    /// the JSON or form body.
    pub fn extract(request: &InboundRequest) -> Result<Self, OauthRelayError> {
        let grant_type = request
            .param("grant_type")
            .ok_or(OauthRelayError::MissingGrantType)?;

        if grant_type.eq_ignore_ascii_case("authorization_code") {
            Ok(Grant::AuthorizationCode {
                code: request.param("code"),
            })
        } else {
            Ok(Grant::Refresh {
                refresh_token: request.param("refresh_token"),
            })
        }
    }

    pub fn selector(&self) -> Option<String> {
        match self {
            Grant::AuthorizationCode { code } => {
                code.as_deref().and_then(selector::from_authorization_code)
            }
            Grant::Refresh { refresh_token } => {
                refresh_token.as_deref().and_then(selector::from_refresh_token)
            }
        }
    }

    pub fn invalid(&self) -> OauthRelayError {
        OauthRelayError::InvalidGrant {
            refresh_token: match self {
                Grant::Refresh { refresh_token } => refresh_token.clone(),
                Grant::AuthorizationCode { .. } => None,
            },
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Grant::AuthorizationCode { .. } => "authorization_code",
            Grant::Refresh { .. } => "refresh_token",
        }
    }
}
