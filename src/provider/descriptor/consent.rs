// self
use crate::_prelude::*;

/// Parameters appended to the authorization URL beyond the core OAuth fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsentParams {
	/// Request a refresh token (`access_type=offline`).
	pub offline_access: bool,
	/// Force the consent screen (`prompt=consent`) so a refresh token is always re-issued.
	pub force_consent: bool,
	/// Ask the provider to fold previously granted scopes into the new grant
	/// (`include_granted_scopes=true`).
	pub include_granted_scopes: bool,
	/// Character used to join scopes when constructing the `scope` parameter.
	pub scope_delimiter: char,
}
impl ConsentParams {
	/// Returns the key/value pairs to append, in a stable order.
	pub fn query_pairs(&self) -> Vec<(&'static str, &'static str)> {
		let mut pairs = Vec::with_capacity(3);

		if self.offline_access {
			pairs.push(("access_type", "offline"));
		}
		if self.include_granted_scopes {
			pairs.push(("include_granted_scopes", "true"));
		}
		if self.force_consent {
			pairs.push(("prompt", "consent"));
		}

		pairs
	}
}
impl Default for ConsentParams {
	fn default() -> Self {
		Self {
			offline_access: true,
			force_consent: true,
			include_granted_scopes: true,
			scope_delimiter: ' ',
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_request_offline_access_with_forced_consent() {
		assert_eq!(
			ConsentParams::default().query_pairs(),
			vec![
				("access_type", "offline"),
				("include_granted_scopes", "true"),
				("prompt", "consent")
			]
		);
	}

	#[test]
	fn disabled_flags_are_omitted() {
		let consent = ConsentParams { force_consent: false, ..ConsentParams::default() };

		assert!(!consent.query_pairs().iter().any(|(key, _)| *key == "prompt"));
	}
}
