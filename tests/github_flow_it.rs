#![cfg(feature = "reqwest")]

mod common;

// crates.io
use httpmock::prelude::*;
// self
use common::*;
use oauth2_socialite::{callback::Callback, error::Error, provider::ProviderExt};

#[tokio::test]
async fn redirect_then_callback_yields_normalized_user_with_primary_email() {
	let server = MockServer::start_async().await;
	let (manager, _) = mock_manager(&server.base_url());
	let github = manager.driver("github").expect("GitHub driver should resolve.");
	let mut github = github.lock().await;
	let url = github.redirect(None).expect("Authorization URL should build.");

	assert!(url.as_str().starts_with("https://github.com/login/oauth/authorize?"));
	assert!(url.as_str().contains("scope=user%3Aemail"));
	assert_eq!(query_value(&url, "client_id").as_deref(), Some("github-id"));
	assert_eq!(query_value(&url, "redirect_uri").as_deref(), Some(REDIRECT_URI));
	assert_eq!(query_value(&url, "response_type").as_deref(), Some("code"));

	let state = query_value(&url, "state").expect("Stateful redirects should carry a state.");
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/login/oauth/access_token")
				.header("content-type", "application/x-www-form-urlencoded")
				.header("accept", "application/json")
				.form_urlencoded_tuple("code", "code-1")
				.form_urlencoded_tuple("client_secret", "github-secret");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"access_token":"t1","token_type":"bearer","scope":"user:email"}"#);
		})
		.await;
	let user_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/user").header("authorization", "token t1");
			then.status(200).body(r#"{"id":1,"login":"bob"}"#);
		})
		.await;
	let emails_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/user/emails").header("authorization", "token t1");
			then.status(200).body(
				r#"[{"email":"bob@users.noreply.github.com","primary":false,"verified":true},{"email":"bob@example.com","primary":true,"verified":true}]"#,
			);
		})
		.await;
	let callback = Callback::from_query(&format!("code=code-1&state={state}"));
	let user = github.user(&callback).await.expect("Callback should complete the flow.");

	token_mock.assert_async().await;
	user_mock.assert_async().await;
	emails_mock.assert_async().await;

	assert_eq!(user.id(), Some("1"));
	assert_eq!(user.username(), Some("bob"));
	assert_eq!(user.nickname(), Some("bob"));
	assert_eq!(user.name(), None);
	assert_eq!(user.email(), Some("bob@example.com"));
	assert_eq!(user.avatar(), None);
	assert_eq!(user.provider, "github");
	assert_eq!(user.token.secret(), "t1");
	assert_eq!(user.raw.get_string("login").as_deref(), Some("bob"));
}

#[tokio::test]
async fn failed_email_lookup_leaves_email_empty() {
	let server = MockServer::start_async().await;
	let (manager, _) = mock_manager(&server.base_url());
	let github = manager.driver("github").expect("GitHub driver should resolve.");
	let mut github = github.lock().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/login/oauth/access_token");
			then.status(200).body(r#"{"access_token":"t1"}"#);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/user");
			then.status(200).body(r#"{"id":1,"login":"bob","name":"Bob"}"#);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/user/emails");
			then.status(500).body("upstream exploded");
		})
		.await;

	let user = github
		.stateless()
		.user(&Callback::new(Some("code-1"), None::<String>))
		.await
		.expect("E-mail failures must not abort the flow.");

	assert_eq!(user.id(), Some("1"));
	assert_eq!(user.name(), Some("Bob"));
	assert_eq!(user.email(), None);
}

#[tokio::test]
async fn token_endpoint_error_surfaces_the_raw_body() {
	let server = MockServer::start_async().await;
	let (manager, _) = mock_manager(&server.base_url());
	let github = manager.driver("github").expect("GitHub driver should resolve.");
	let mut github = github.lock().await;
	let user_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/user");
			then.status(200).body(r#"{"id":1}"#);
		})
		.await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/login/oauth/access_token");
			then.status(200).body(r#"{"error":"bad_verification_code","error_description":"The code passed is incorrect or expired."}"#);
		})
		.await;

	let err = github
		.stateless()
		.user(&Callback::new(Some("stale"), None::<String>))
		.await
		.expect_err("Token errors must fail the flow.");

	match err {
		Error::AuthorizationFailed { body } => {
			assert_eq!(body["error"], "bad_verification_code");
		},
		other => panic!("Unexpected error: {other:?}."),
	}

	user_mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn token_endpoint_redirects_are_not_followed() {
	let server = MockServer::start_async().await;
	let (manager, _) = mock_manager(&server.base_url());
	let moved_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/login/oauth/access_token");
			then.status(302)
				.header("location", server.url("/elsewhere"))
				.body(r#"{"moved":true}"#);
		})
		.await;
	let elsewhere_mock = server
		.mock_async(|when, then| {
			when.path("/elsewhere");
			then.status(200).body(r#"{"access_token":"leaked"}"#);
		})
		.await;
	let github = manager.driver("github").expect("GitHub driver should resolve.");
	let mut github = github.lock().await;
	let err = github
		.stateless()
		.user(&Callback::from_query("code=code-1"))
		.await
		.expect_err("A redirected token response carries no token.");

	moved_mock.assert_async().await;
	elsewhere_mock.assert_calls_async(0).await;

	assert!(matches!(err, Error::AuthorizationFailed { body } if body["moved"] == true));
}
