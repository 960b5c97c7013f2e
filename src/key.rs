//! Strongly typed bucket keys derived from caller-supplied discriminators.

// std
use std::{borrow::Borrow, convert::Infallible, net::IpAddr, ops::Deref};
// self
use crate::_prelude::*;

/// Sentinel used when the caller cannot produce a usable discriminator.
const UNKNOWN: &str = "unknown";
/// Upper bound on stored key length; longer inputs are truncated.
///
/// Keys are attacker-controlled, so an unbounded key would let a single request pin an
/// arbitrary amount of memory inside the bucket store.
const KEY_MAX_LEN: usize = 128;

/// Opaque identifier for a rate-limit bucket.
///
/// Construction never fails: the login path must always receive a decision, so empty or
/// whitespace-only input collapses into the shared [`ClientKey::unknown`] bucket instead
/// of erroring. Surrounding whitespace is trimmed and over-long input is truncated at a
/// character boundary.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ClientKey(String);
impl ClientKey {
	/// Creates a key from a caller-supplied discriminator.
	pub fn new(value: impl AsRef<str>) -> Self {
		let view = value.as_ref().trim();

		if view.is_empty() {
			return Self::unknown();
		}

		let mut end = view.len().min(KEY_MAX_LEN);

		while !view.is_char_boundary(end) {
			end -= 1;
		}

		Self(view[..end].to_owned())
	}

	/// Returns the shared fallback key for requests without a usable discriminator.
	pub fn unknown() -> Self {
		Self(UNKNOWN.to_owned())
	}

	/// Derives an `ip:`-prefixed key from the connection source address.
	///
	/// Requests arriving without a resolvable address share one `ip:unknown` bucket so
	/// they stay subject to a budget rather than bypassing the limiter.
	pub fn from_ip(addr: Option<IpAddr>) -> Self {
		match addr {
			Some(addr) => Self(format!("ip:{addr}")),
			None => Self(format!("ip:{UNKNOWN}")),
		}
	}

	/// Derives a `user:`-prefixed key from an authenticated principal identifier.
	pub fn from_user(id: impl AsRef<str>) -> Self {
		Self::new(format!("user:{}", id.as_ref().trim()))
	}

	/// Returns the key as a plain string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl Deref for ClientKey {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for ClientKey {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for ClientKey {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<&str> for ClientKey {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}
impl From<String> for ClientKey {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}
impl From<ClientKey> for String {
	fn from(value: ClientKey) -> Self {
		value.0
	}
}
impl FromStr for ClientKey {
	type Err = Infallible;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self::new(s))
	}
}
impl Debug for ClientKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "ClientKey({})", self.0)
	}
}
impl Display for ClientKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::net::Ipv4Addr;
	// self
	use super::*;

	#[test]
	fn empty_input_collapses_into_the_unknown_bucket() {
		assert_eq!(ClientKey::new(""), ClientKey::unknown());
		assert_eq!(ClientKey::new("   "), ClientKey::unknown());
		assert_eq!(ClientKey::new("\t\n"), ClientKey::unknown());
	}

	#[test]
	fn keys_are_trimmed_and_truncated() {
		assert_eq!(ClientKey::new(" ip:10.0.0.1 ").as_str(), "ip:10.0.0.1");

		let long = "k".repeat(KEY_MAX_LEN + 40);
		let key = ClientKey::new(&long);

		assert_eq!(key.as_str().len(), KEY_MAX_LEN);
	}

	#[test]
	fn truncation_respects_character_boundaries() {
		let snowman_run = "\u{2603}".repeat(KEY_MAX_LEN);
		let key = ClientKey::new(&snowman_run);

		assert!(key.as_str().len() <= KEY_MAX_LEN);
		assert!(key.as_str().chars().all(|c| c == '\u{2603}'));
	}

	#[test]
	fn ip_keys_carry_the_expected_prefix() {
		let key = ClientKey::from_ip(Some(Ipv4Addr::new(10, 0, 0, 1).into()));

		assert_eq!(key.as_str(), "ip:10.0.0.1");
		assert_eq!(ClientKey::from_ip(None).as_str(), "ip:unknown");
	}

	#[test]
	fn user_keys_carry_the_expected_prefix() {
		assert_eq!(ClientKey::from_user("alice").as_str(), "user:alice");
		assert_eq!(ClientKey::from_user(" alice ").as_str(), "user:alice");
	}

	#[test]
	fn borrow_supports_fast_lookup() {
		let map: HashMap<ClientKey, u8> =
			HashMap::from_iter([(ClientKey::new("ip:10.0.0.1"), 7_u8)]);

		assert_eq!(map.get("ip:10.0.0.1"), Some(&7));
	}

	#[test]
	fn serde_round_trip_normalizes() {
		let key: ClientKey =
			serde_json::from_str("\" ip:10.0.0.1 \"").expect("Key should deserialize successfully.");

		assert_eq!(key.as_str(), "ip:10.0.0.1");

		let fallback: ClientKey =
			serde_json::from_str("\"\"").expect("Empty key should deserialize successfully.");

		assert_eq!(fallback, ClientKey::unknown());
	}
}
