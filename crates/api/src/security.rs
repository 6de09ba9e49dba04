//! Security response headers for the JSON API

use axum::{
	http::header::{HeaderName, HeaderValue},
	Router,
};
use tower_http::set_header::SetResponseHeaderLayer;

/// Headers set on every response unless a handler already set them
///
/// The API only ever serves JSON, so the content policy forbids everything.
pub const SECURITY_HEADERS: [(&str, &str); 6] = [
	(
		"strict-transport-security",
		"max-age=31536000; includeSubDomains",
	),
	("x-content-type-options", "nosniff"),
	("x-frame-options", "DENY"),
	("referrer-policy", "no-referrer"),
	(
		"content-security-policy",
		"default-src 'none'; frame-ancestors 'none'",
	),
	("cache-control", "no-store"),
];

/// Apply `SECURITY_HEADERS` to every route of `router`
pub fn add_security_headers<S>(router: Router<S>) -> Router<S>
where
	S: Clone + Send + Sync + 'static,
{
	SECURITY_HEADERS
		.iter()
		.fold(router, |router, &(name, value)| {
			router.layer(SetResponseHeaderLayer::if_not_present(
				HeaderName::from_static(name),
				HeaderValue::from_static(value),
			))
		})
}
