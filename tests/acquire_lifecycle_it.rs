#![cfg(feature = "reqwest")]

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
use time::{Duration, OffsetDateTime};
use url::Url;
// self
use keycloak_token_client::{
	auth::{ClientId, GrantType, RealmName, TokenSettings},
	http::{ReqwestTransport, TokenResponse},
	manager::TokenManager,
	store::{CacheKey, MemoryStore, TokenStore},
	token::TokenRecord,
};

const TOKEN_PATH: &str = "/realms/master/protocol/openid-connect/token";

fn build_manager() -> (TokenManager<ReqwestTransport>, Arc<MemoryStore>) {
	let store_backend = Arc::new(MemoryStore::default());
	let store: Arc<dyn TokenStore> = store_backend.clone();

	(TokenManager::new(store), store_backend)
}

fn password_settings() -> TokenSettings {
	TokenSettings::new(
		GrantType::Password,
		ClientId::new("admin-cli").expect("Client identifier fixture should be valid."),
	)
	.with_username("alice")
	.with_password("wonderland")
}

fn base_url(server: &MockServer) -> Url {
	Url::parse(&server.base_url()).expect("Mock server base URL should parse successfully.")
}

fn seed_record(access: &str, refresh: Option<&str>, issued_at: OffsetDateTime) -> TokenRecord {
	let response = TokenResponse {
		access_token: access.into(),
		token_type: Some("Bearer".into()),
		expires_in: 300,
		refresh_expires_in: refresh.map(|_| 1800),
		refresh_token: refresh.map(Into::into),
		scope: None,
		session_state: None,
	};

	TokenRecord::from_response(response, issued_at)
}

#[tokio::test]
async fn cold_start_authenticates_and_caches() {
	let server = MockServer::start_async().await;
	let (manager, store) = build_manager();
	let url = base_url(&server);
	let settings = password_settings();
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(TOKEN_PATH)
				.form_urlencoded_tuple("grant_type", "password")
				.form_urlencoded_tuple("client_id", "admin-cli")
				.form_urlencoded_tuple("username", "alice")
				.form_urlencoded_tuple("password", "wonderland");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"cold-access\",\"refresh_token\":\"cold-refresh\",\"token_type\":\"Bearer\",\"expires_in\":300,\"refresh_expires_in\":1800}",
			);
		})
		.await;
	let token = manager
		.acquire_token(&url, &settings)
		.await
		.expect("Cold-start acquisition should succeed.");

	assert_eq!(token, "cold-access");

	mock.assert_async().await;

	let record = store
		.fetch(&CacheKey::new(&url, &settings))
		.expect("Successful acquisition should cache a record.");

	assert_eq!(record.access_token.expose(), "cold-access");
	assert_eq!(record.refresh_token.as_ref().map(|secret| secret.expose()), Some("cold-refresh"));
	assert_eq!(record.expires_at, record.issued_at + Duration::seconds(300));
	assert_eq!(record.refresh_expires_at, Some(record.issued_at + Duration::seconds(1800)));
}

#[tokio::test]
async fn fresh_record_is_reused_without_network() {
	let server = MockServer::start_async().await;
	let (manager, _store) = build_manager();
	let url = base_url(&server);
	let settings = password_settings();
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"reused-access\",\"token_type\":\"Bearer\",\"expires_in\":300,\"refresh_expires_in\":1800,\"refresh_token\":\"reused-refresh\"}",
			);
		})
		.await;
	let first = manager
		.acquire_token(&url, &settings)
		.await
		.expect("Initial acquisition should succeed.");
	let second = manager
		.acquire_token(&url, &settings)
		.await
		.expect("Cached acquisition should succeed.");

	assert_eq!(first, "reused-access");
	assert_eq!(second, "reused-access");

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn lapsed_record_refreshes_with_stored_token() {
	let server = MockServer::start_async().await;
	let (manager, store) = build_manager();
	let url = base_url(&server);
	let settings = password_settings();
	let key = CacheKey::new(&url, &settings);

	// Access window elapsed, refresh window still open.
	store.save(
		key.clone(),
		seed_record("stale-access", Some("seed-refresh"), OffsetDateTime::now_utc() - Duration::minutes(10)),
	);

	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(TOKEN_PATH)
				.form_urlencoded_tuple("grant_type", "refresh_token")
				.form_urlencoded_tuple("refresh_token", "seed-refresh")
				.form_urlencoded_tuple("client_id", "admin-cli");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"renewed-access\",\"refresh_token\":\"renewed-refresh\",\"token_type\":\"Bearer\",\"expires_in\":300,\"refresh_expires_in\":1800}",
			);
		})
		.await;
	let token = manager
		.acquire_token(&url, &settings)
		.await
		.expect("Refresh acquisition should succeed.");

	assert_eq!(token, "renewed-access");

	mock.assert_async().await;

	let stored = store.fetch(&key).expect("Refreshed record should replace the stale one.");

	assert_eq!(stored.access_token.expose(), "renewed-access");
	assert_eq!(stored.refresh_token.as_ref().map(|secret| secret.expose()), Some("renewed-refresh"));
}

#[tokio::test]
async fn fully_expired_record_reauthenticates() {
	let server = MockServer::start_async().await;
	let (manager, store) = build_manager();
	let url = base_url(&server);
	let settings = password_settings();

	// Both windows elapsed hours ago.
	store.save(
		CacheKey::new(&url, &settings),
		seed_record("dead-access", Some("dead-refresh"), OffsetDateTime::now_utc() - Duration::hours(2)),
	);

	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH).form_urlencoded_tuple("grant_type", "password");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"restarted-access\",\"token_type\":\"Bearer\",\"expires_in\":300,\"refresh_expires_in\":1800,\"refresh_token\":\"restarted-refresh\"}",
			);
		})
		.await;
	let token = manager
		.acquire_token(&url, &settings)
		.await
		.expect("Re-authentication should succeed.");

	assert_eq!(token, "restarted-access");

	mock.assert_async().await;
}

#[tokio::test]
async fn distinct_base_urls_never_share_a_cache_entry() {
	let server_a = MockServer::start_async().await;
	let server_b = MockServer::start_async().await;
	let (manager, store) = build_manager();
	let settings = password_settings();
	let mock_a = server_a
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"token-a\",\"token_type\":\"Bearer\",\"expires_in\":300,\"refresh_expires_in\":1800}",
			);
		})
		.await;
	let mock_b = server_b
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"token-b\",\"token_type\":\"Bearer\",\"expires_in\":300,\"refresh_expires_in\":1800}",
			);
		})
		.await;
	let token_a = manager
		.acquire_token(&base_url(&server_a), &settings)
		.await
		.expect("Acquisition against the first endpoint should succeed.");
	let token_b = manager
		.acquire_token(&base_url(&server_b), &settings)
		.await
		.expect("Acquisition against the second endpoint should succeed.");

	assert_eq!(token_a, "token-a");
	assert_eq!(token_b, "token-b");
	assert_eq!(store.len(), 2);

	mock_a.assert_async().await;
	mock_b.assert_async().await;
}

#[tokio::test]
async fn omitted_realm_shares_the_master_cache_entry() {
	let server = MockServer::start_async().await;
	let (manager, store) = build_manager();
	let url = base_url(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"master-access\",\"token_type\":\"Bearer\",\"expires_in\":300,\"refresh_expires_in\":1800}",
			);
		})
		.await;
	let defaulted = password_settings();
	let explicit = password_settings()
		.with_realm(RealmName::new("master").expect("Master realm should be valid."));
	let first = manager
		.acquire_token(&url, &defaulted)
		.await
		.expect("Acquisition with the defaulted realm should succeed.");
	let second = manager
		.acquire_token(&url, &explicit)
		.await
		.expect("Acquisition with the explicit realm should reuse the cache.");

	assert_eq!(first, "master-access");
	assert_eq!(second, "master-access");
	assert_eq!(store.len(), 1);

	mock.assert_calls_async(1).await;
}
