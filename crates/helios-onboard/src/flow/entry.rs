/*
[INPUT]:  Entry URL or its query string
[OUTPUT]: Referral code and account-linking flags captured at page load
[POS]:    Flow layer - read-only entry parameters for the auth controller
[UPDATE]: When query parameter names change
*/

use url::Url;

use crate::http::Result;

const PARAM_REFERRAL: &str = "ref";
const PARAM_LINKED: &str = "linked";
const PARAM_INVITE_REQUIRED: &str = "invite_required";

/// Parameters read from the URL the user arrived on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryParams {
    /// Invite/referral code to fall back on when the invite field is empty
    pub referral_code: Option<String>,
    /// An external account-linking step just completed
    pub account_linked: bool,
    /// The server asked for an invite code before redirecting here
    pub invite_required: bool,
}

impl EntryParams {
    pub fn from_url(url: &str) -> Result<Self> {
        let url = Url::parse(url)?;
        Ok(Self::from_pairs(url.query_pairs()))
    }

    /// Parse a bare query string, with or without the leading `?`
    pub fn from_query(query: &str) -> Self {
        let query = query.trim_start_matches('?');
        Self::from_pairs(url::form_urlencoded::parse(query.as_bytes()))
    }

    fn from_pairs<'a>(
        pairs: impl Iterator<Item = (std::borrow::Cow<'a, str>, std::borrow::Cow<'a, str>)>,
    ) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key.as_ref() {
                PARAM_REFERRAL => {
                    let code = value.trim();
                    if !code.is_empty() {
                        params.referral_code = Some(code.to_string());
                    }
                }
                PARAM_LINKED => params.account_linked = is_truthy(&value),
                PARAM_INVITE_REQUIRED => params.invite_required = is_truthy(&value),
                _ => {}
            }
        }
        params
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "yes")
}
