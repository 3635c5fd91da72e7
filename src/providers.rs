//! Built-in providers.
//!
//! | driver | struct |
//! |---|---|
//! | `github` | [`GitHub`] |
//! | `wechat` | [`WeChat`] |
//! | `douban` | [`Douban`] |
//! | `wework` | [`WeWork`] |
//! | `outlook` | [`Outlook`] |
//! | `douyin` | [`DouYin`] |
//! | `tiktok` | [`TikTok`] |

pub mod douban;
pub mod douyin;
pub mod github;
pub mod outlook;
pub mod tiktok;
pub mod wechat;
pub mod wework;

pub use douban::Douban;
pub use douyin::DouYin;
pub use github::GitHub;
pub use outlook::Outlook;
pub use tiktok::TikTok;
pub use wechat::{WeChat, WeChatComponent};
pub use wework::WeWork;

// crates.io
use oauth2::http::header::AUTHORIZATION;
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Attributes},
	http,
	provider::ProviderCore,
};

pub(crate) fn with_grant_type(mut fields: BTreeMap<String, String>) -> BTreeMap<String, String> {
	fields.insert("grant_type".to_owned(), "authorization_code".to_owned());

	fields
}

// DouYin and TikTok identify the client as `client_key`.
pub(crate) fn client_key_code_fields(
	core: &ProviderCore,
	state: Option<&str>,
) -> BTreeMap<String, String> {
	let mut fields = BTreeMap::from([
		("client_key".to_owned(), core.client_id().to_owned()),
		("redirect_uri".to_owned(), core.redirect_uri().to_owned()),
		("scope".to_owned(), core.scope_string()),
		("response_type".to_owned(), "code".to_owned()),
	]);

	fields.extend(core.parameters.clone());

	if let Some(state) = state {
		fields.insert("state".to_owned(), state.to_owned());
	}

	fields
}

// Order-preserving variant of the map merge: caller keys replace defaults in place, new keys are
// appended.
pub(crate) fn merge_parameters(pairs: &mut Vec<(String, String)>, core: &ProviderCore) {
	for (key, value) in &core.parameters {
		match pairs.iter_mut().find(|(k, _)| k == key) {
			Some((_, existing)) => existing.clone_from(value),
			None => pairs.push((key.clone(), value.clone())),
		}
	}
}

pub(crate) async fn fetch_bearer_json(
	core: &ProviderCore,
	url: &str,
	token: &AccessToken,
) -> Result<Attributes> {
	let url = http::parse_url(url)?;
	let bearer = format!("Bearer {}", token.secret());
	let request = http::get(&url, &[], &[(AUTHORIZATION, bearer.as_str()), http::accept_json()])?;

	let body = http::send(core.http_client(), request).await?;

	http::decode_json(&body)
}
