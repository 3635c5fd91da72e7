//! Signs a user in with GitHub from the terminal.
//!
//! Set `GITHUB_CLIENT_ID`, `GITHUB_CLIENT_SECRET`, and `GITHUB_REDIRECT_URI`, open the printed URL,
//! then paste the full callback URL the browser lands on.

// std
use std::{env, io};
// crates.io
use color_eyre::Result;
// self
use oauth2_socialite::{
	callback::Callback,
	config::{Config, ProviderConfig},
	manager::Manager,
	provider::ProviderServices,
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = Config::default().with_provider(
		"github",
		ProviderConfig::new(
			env::var("GITHUB_CLIENT_ID")?,
			env::var("GITHUB_CLIENT_SECRET")?,
			env::var("GITHUB_REDIRECT_URI")?,
		),
	);
	let manager = Manager::with_services(config, ProviderServices::reqwest()?);
	let github = manager.driver("github")?;
	let mut github = github.lock().await;
	let authorize_url = github.redirect(None)?;

	println!("Open {authorize_url} and paste the callback URL below.");

	let mut line = String::new();

	io::stdin().read_line(&mut line)?;

	let callback = Callback::from_url(&Url::parse(line.trim())?);
	let user = github.user(&callback).await?;

	println!("Signed in as {} ({}).", user.nickname().unwrap_or("?"), user.id().unwrap_or("?"));

	if let Some(email) = user.email() {
		println!("Primary e-mail: {email}.");
	}

	Ok(())
}
