//! Demonstrates acquiring a bearer token with the password grant against a mock realm,
//! reusing the cached record on the second call.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use keycloak_token_client::{
	auth::{ClientId, GrantType, TokenSettings},
	manager::TokenManager,
	store::{MemoryStore, TokenStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let store: Arc<dyn TokenStore> = Arc::new(MemoryStore::default());
	let manager = TokenManager::new(store);
	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/realms/master/protocol/openid-connect/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"refresh_token\":\"demo-refresh\",\"token_type\":\"Bearer\",\"expires_in\":300,\"refresh_expires_in\":1800}",
			);
		})
		.await;
	let base_url = Url::parse(&server.base_url())?;
	let settings = TokenSettings::new(GrantType::Password, ClientId::new("admin-cli")?)
		.with_username("admin")
		.with_password("admin");
	let first = manager.acquire_token(&base_url, &settings).await?;
	let second = manager.acquire_token(&base_url, &settings).await?;

	println!("Bearer token: {first}.");

	assert_eq!(first, second);

	token_mock.assert_async().await;

	Ok(())
}
