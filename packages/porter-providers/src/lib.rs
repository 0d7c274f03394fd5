pub mod embedding;
pub mod generation;

use color_eyre::{Result, eyre};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName};
use serde_json::{Map, Value};

pub fn request_headers(api_key: &str, default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	headers.insert(AUTHORIZATION, format!("Bearer {api_key}").parse()?);

	for (name, value) in default_headers {
		let Some(text) = value.as_str() else {
			return Err(eyre::eyre!("Default header {name} must be a string."));
		};

		headers.insert(HeaderName::from_bytes(name.as_bytes())?, text.parse()?);
	}

	Ok(headers)
}
