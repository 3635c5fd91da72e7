//! Driver registry: resolves names to configured providers and caches the instances.

// std
use std::str::FromStr;
// crates.io
use async_lock::OnceCell;
// self
use crate::{
	_prelude::*,
	config::{Config, ProviderConfig},
	error::ConfigError,
	provider::{Credentials, Provider, ProviderServices},
	providers::{DouYin, Douban, GitHub, Outlook, TikTok, WeChat, WeChatComponent, WeWork},
};

/// Provider instance shared by every caller of [`Manager::driver`].
///
/// The async mutex lets a caller hold the provider across `.await` points while it runs a flow.
pub type SharedProvider = Arc<AsyncMutex<Box<dyn Provider>>>;

type DriverSlot = Arc<OnceCell<SharedProvider>>;

/// Builds a custom provider from the full configuration and the manager's collaborators.
pub type DriverFactory =
	Arc<dyn Fn(&Config, &ProviderServices) -> Result<Box<dyn Provider>> + Send + Sync>;

/// Providers shipped with the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BuiltinDriver {
	/// [`GitHub`].
	GitHub,
	/// [`WeChat`].
	WeChat,
	/// [`Douban`].
	Douban,
	/// [`WeWork`].
	WeWork,
	/// [`Outlook`].
	Outlook,
	/// [`DouYin`].
	DouYin,
	/// [`TikTok`].
	TikTok,
}
impl BuiltinDriver {
	/// Every built-in driver.
	pub const ALL: [Self; 7] = [
		Self::GitHub,
		Self::WeChat,
		Self::Douban,
		Self::WeWork,
		Self::Outlook,
		Self::DouYin,
		Self::TikTok,
	];

	/// Looks up a built-in driver by its registry name.
	pub fn from_name(name: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|driver| driver.as_str() == name)
	}

	/// Registry name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::GitHub => GitHub::NAME,
			Self::WeChat => WeChat::NAME,
			Self::Douban => Douban::NAME,
			Self::WeWork => WeWork::NAME,
			Self::Outlook => Outlook::NAME,
			Self::DouYin => DouYin::NAME,
			Self::TikTok => TikTok::NAME,
		}
	}

	/// Constructs the provider with default scopes and quirks.
	pub fn construct(self, credentials: Credentials, services: ProviderServices) -> Box<dyn Provider> {
		match self {
			Self::GitHub => Box::new(GitHub::new(credentials, services)),
			Self::WeChat => Box::new(WeChat::new(credentials, services)),
			Self::Douban => Box::new(Douban::new(credentials, services)),
			Self::WeWork => Box::new(WeWork::new(credentials, services)),
			Self::Outlook => Box::new(Outlook::new(credentials, services)),
			Self::DouYin => Box::new(DouYin::new(credentials, services)),
			Self::TikTok => Box::new(TikTok::new(credentials, services)),
		}
	}
}
impl Display for BuiltinDriver {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for BuiltinDriver {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::from_name(s).ok_or_else(|| Error::UnsupportedDriver { driver: s.to_owned() })
	}
}

/// Resolves driver names to configured providers.
///
/// Instances are built lazily on first request and cached for the manager's lifetime: at most one
/// per name, never evicted. Concurrent first lookups of one name wait for a single build, so a
/// factory runs once per successful resolution. Clones share the cache and the factory table.
#[derive(Clone)]
pub struct Manager {
	/// Per-driver configuration.
	pub config: Config,
	/// Transport and session handed to every provider.
	pub services: ProviderServices,
	factories: Arc<RwLock<HashMap<String, DriverFactory>>>,
	drivers: Arc<Mutex<BTreeMap<String, DriverSlot>>>,
}
impl Manager {
	/// Creates a manager that injects the caller's transport and session store.
	pub fn with_services(config: Config, services: ProviderServices) -> Self {
		Self { config, services, factories: Default::default(), drivers: Default::default() }
	}

	/// Returns the provider registered under `name`, building it on first use.
	///
	/// Built-in names resolve before custom factories. Unknown names fail with
	/// [`Error::UnsupportedDriver`].
	///
	/// A factory that resolves its own name from inside the build deadlocks.
	pub fn driver(&self, name: &str) -> Result<SharedProvider> {
		let slot = self
			.drivers
			.lock()
			.entry(name.to_owned())
			.or_insert_with(|| Arc::new(OnceCell::new()))
			.clone();
		let built = slot.get_or_try_init_blocking(|| {
			self.create(name).map(|provider| Arc::new(AsyncMutex::new(provider)))
		});

		match built {
			Ok(provider) => Ok(provider.clone()),
			Err(e) => {
				self.forget_unbuilt(name, &slot);

				Err(e)
			},
		}
	}

	/// Registers a custom driver factory, replacing any previous one under `name`.
	///
	/// Already-built instances stay cached; the factory only affects names not yet resolved.
	pub fn extend<F>(&self, name: impl Into<String>, factory: F) -> &Self
	where
		F: 'static + Fn(&Config, &ProviderServices) -> Result<Box<dyn Provider>> + Send + Sync,
	{
		self.factories.write().insert(name.into(), Arc::new(factory));

		self
	}

	/// Snapshot of every instance built so far.
	pub fn drivers(&self) -> BTreeMap<String, SharedProvider> {
		self.drivers
			.lock()
			.iter()
			.filter_map(|(name, slot)| slot.get().map(|provider| (name.clone(), provider.clone())))
			.collect()
	}

	/// Builds a fresh built-in provider from a configuration section.
	///
	/// Fails with [`ConfigError::MissingCredential`] when `client_id`, `client_secret`, or
	/// `redirect` is absent. Optional keys are applied when present: `agent_id` for WeWork and
	/// `component_appid` plus `component_access_token` for WeChat.
	pub fn build_provider(
		&self,
		driver: BuiltinDriver,
		config: &ProviderConfig,
	) -> Result<Box<dyn Provider>> {
		let credentials = Credentials::from_config(driver.as_str(), config)?;
		let mut provider = driver.construct(credentials, self.services.clone());

		if let Some(wework) = provider.downcast_mut::<WeWork>() {
			if let Some(agent_id) = config.extra_string("agent_id") {
				wework.agent(agent_id);
			}
		}
		if let Some(wechat) = provider.downcast_mut::<WeChat>() {
			let app_id = config.extra_string("component_appid");
			let token = config.extra_string("component_access_token");

			if let (Some(app_id), Some(token)) = (app_id, token) {
				wechat.with_component(WeChatComponent::new(app_id, token));
			}
		}

		Ok(provider)
	}

	// Failed builds leave no slot behind, so unknown names do not accumulate.
	fn forget_unbuilt(&self, name: &str, slot: &DriverSlot) {
		let mut drivers = self.drivers.lock();

		if drivers.get(name).is_some_and(|kept| Arc::ptr_eq(kept, slot) && kept.get().is_none()) {
			drivers.remove(name);
		}
	}

	fn create(&self, name: &str) -> Result<Box<dyn Provider>> {
		if let Some(driver) = BuiltinDriver::from_name(name) {
			let config = self
				.config
				.get(name)
				.ok_or_else(|| ConfigError::MissingDriverConfig { driver: name.to_owned() })?;

			return self.build_provider(driver, config);
		}

		let factory = self.factories.read().get(name).cloned();

		match factory {
			Some(factory) => factory(&self.config, &self.services),
			None => Err(Error::UnsupportedDriver { driver: name.to_owned() }),
		}
	}
}
#[cfg(feature = "reqwest")]
impl Manager {
	/// Creates a manager backed by reqwest and an in-memory session.
	///
	/// The client follows redirects; use [`ProviderServices::reqwest`] with
	/// [`with_services`](Self::with_services) when token endpoints must not redirect.
	pub fn new(config: Config) -> Self {
		Self::with_services(config, ProviderServices::default())
	}
}
impl Debug for Manager {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Manager")
			.field("configured", &self.config.drivers().collect::<Vec<_>>())
			.field("custom", &self.factories.read().keys().cloned().collect::<Vec<_>>())
			.field("built", &self.drivers().into_keys().collect::<Vec<_>>())
			.finish()
	}
}
