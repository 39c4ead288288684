//! npm registry lookups used by the `@types` auto-install.

use anyhow::{anyhow, Context, Result as AnyhowResult};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_REGISTRY: &str = "https://registry.npmjs.org";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct Packument {
    #[serde(rename = "dist-tags", default)]
    dist_tags: DistTags,
    #[serde(default)]
    versions: HashMap<String, VersionInfo>,
}

#[derive(Debug, Default, Deserialize)]
struct DistTags {
    latest: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct VersionInfo {
    types: Option<serde_json::Value>,
    typings: Option<serde_json::Value>,
}

impl VersionInfo {
    fn declares_types(&self) -> bool {
        let present = |v: &Option<serde_json::Value>| match v {
            Some(serde_json::Value::String(s)) => !s.is_empty(),
            Some(serde_json::Value::Null) | None => false,
            Some(_) => true,
        };
        present(&self.types) || present(&self.typings)
    }
}

#[derive(Debug, Clone)]
pub struct RegistryClient {
    base_url: String,
    agent: ureq::Agent,
}

impl RegistryClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent: ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn package_url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name)
    }

    /// Whether `name` is published. 404 means no; any status other than 200 is an error.
    pub fn package_exists(&self, name: &str) -> AnyhowResult<bool> {
        let url = self.package_url(name);
        match self.agent.head(&url).call() {
            Ok(response) if response.status() == 200 => Ok(true),
            Ok(response) => Err(anyhow!(
                "unexpected status code {} for {}",
                response.status(),
                url
            )),
            Err(ureq::Error::Status(404, _)) => Ok(false),
            Err(ureq::Error::Status(code, _)) => {
                Err(anyhow!("unexpected status code {} for {}", code, url))
            }
            Err(e) => Err(e).with_context(|| format!("request to {} failed", url)),
        }
    }

    /// Whether the latest version of `name` ships its own type declarations.
    ///
    /// Network and decoding failures count as "not typed".
    pub fn is_typed(&self, name: &str) -> bool {
        match self.fetch_packument(name) {
            Ok(packument) => packument
                .dist_tags
                .latest
                .as_ref()
                .and_then(|latest| packument.versions.get(latest))
                .is_some_and(VersionInfo::declares_types),
            Err(e) => {
                tracing::debug!("Type lookup for {} failed: {:#}", name, e);
                false
            }
        }
    }

    fn fetch_packument(&self, name: &str) -> AnyhowResult<Packument> {
        let url = self.package_url(name);
        let response = self
            .agent
            .get(&url)
            .set("Accept", "application/json")
            .call()
            .with_context(|| format!("request to {} failed", url))?;
        serde_json::from_reader(response.into_reader())
            .with_context(|| format!("invalid registry document from {}", url))
    }
}

impl Default for RegistryClient {
    fn default() -> Self {
        Self::new(DEFAULT_REGISTRY)
    }
}
