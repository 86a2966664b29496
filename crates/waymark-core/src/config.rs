use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::decode::{NameReplacement, StandardDecoder};
use crate::error::ConfigError;
use crate::model::SiteContext;

/// Top-level configuration for waymark
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaymarkConfig {
    #[serde(default)]
    pub link_provider: LinkProviderConfig,
    /// Sites known to the host
    #[serde(default)]
    pub sites: Vec<SiteContext>,
    /// Name of the content store serving requests
    #[serde(default = "default_store")]
    pub store: String,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Friendly URL provider settings, loaded once at startup and never mutated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkProviderConfig {
    /// Redirect requests that did not use the friendly URL
    pub force_friendly_url: bool,
    pub trailing_slash: bool,
    /// Only rewrite URLs of nodes below the site's start path
    pub only_apply_for_site_content: bool,
    /// Lower-cased site names the provider is restricted to
    #[serde(deserialize_with = "site_list")]
    pub apply_for_sites: Option<Vec<String>>,
    /// Lower-cased site names the provider is disabled for
    #[serde(deserialize_with = "site_list")]
    pub ignore_for_sites: Option<Vec<String>>,
    /// Store name treated as the administrative store
    pub administrative_store: String,
    pub encode_name_replacements: Vec<NameReplacement>,
    /// Suffix appended by the base generator when extensions are requested
    pub extension: String,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// Default log filter when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_store() -> String {
    "web".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for LinkProviderConfig {
    fn default() -> Self {
        Self {
            force_friendly_url: false,
            trailing_slash: false,
            only_apply_for_site_content: false,
            apply_for_sites: None,
            ignore_for_sites: None,
            administrative_store: "core".to_string(),
            encode_name_replacements: Vec::new(),
            extension: ".aspx".to_string(),
        }
    }
}

impl Default for WaymarkConfig {
    fn default() -> Self {
        Self {
            link_provider: LinkProviderConfig::default(),
            sites: Vec::new(),
            store: default_store(),
            logging: LoggingConfig::default(),
        }
    }
}

impl LinkProviderConfig {
    /// Parse provider attributes (`forceFriendlyUrl="true"`, `applyForSites="a, b"`, ...)
    pub fn from_attributes(attributes: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        config.force_friendly_url = bool_attribute(attributes, "forceFriendlyUrl")?;
        config.trailing_slash = bool_attribute(attributes, "trailingSlash")?;
        config.only_apply_for_site_content =
            bool_attribute(attributes, "onlyApplyForSiteContent")?;
        config.apply_for_sites = attributes
            .get("applyForSites")
            .and_then(|value| parse_site_list(value));
        config.ignore_for_sites = attributes
            .get("ignoreForSites")
            .and_then(|value| parse_site_list(value));

        if let Some(store) = attributes.get("administrativeStore") {
            if !store.trim().is_empty() {
                config.administrative_store = store.trim().to_string();
            }
        }

        Ok(config)
    }

    /// Whether friendly URLs are enabled for the named site
    pub fn applies_to_site(&self, site_name: &str) -> bool {
        let site_name = site_name.to_lowercase();

        if let Some(ignored) = &self.ignore_for_sites {
            if ignored.contains(&site_name) {
                return false;
            }
        }

        match &self.apply_for_sites {
            Some(allowed) => allowed.contains(&site_name),
            None => true,
        }
    }

    pub fn is_administrative(&self, store_name: &str) -> bool {
        store_name.eq_ignore_ascii_case(&self.administrative_store)
    }

    /// Decoder matching the configured name replacements
    pub fn decoder(&self) -> StandardDecoder {
        StandardDecoder::new(self.encode_name_replacements.clone())
    }
}

impl WaymarkConfig {
    /// Parse and validate a YAML configuration
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Look up a site by name, ignoring case
    pub fn site(&self, name: &str) -> Result<&SiteContext, ConfigError> {
        self.sites
            .iter()
            .find(|site| site.is_named(name))
            .ok_or_else(|| ConfigError::UnknownSite(name.to_string()))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (i, site) in self.sites.iter().enumerate() {
            if self.sites[..i].iter().any(|other| other.is_named(&site.name)) {
                return Err(ConfigError::DuplicateSite(site.name.clone()));
            }
            // the tree has no node at `/`, sites start below a top-level node
            if site.root_path.trim_matches('/').is_empty() {
                return Err(ConfigError::InvalidSite {
                    name: site.name.clone(),
                    reason: format!("rootPath {:?} does not name a node", site.root_path),
                });
            }
        }
        Ok(())
    }
}

/// Split a comma-separated site list. Spaces are dropped and names lower-cased;
/// an empty value means no list at all.
pub fn parse_site_list(value: &str) -> Option<Vec<String>> {
    let compact = value.replace(' ', "").to_lowercase();
    if compact.is_empty() {
        return None;
    }

    let names: Vec<String> = compact
        .split(',')
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();

    if names.is_empty() {
        None
    } else {
        Some(names)
    }
}

fn bool_attribute(attributes: &HashMap<String, String>, name: &str) -> Result<bool, ConfigError> {
    let Some(value) = attributes.get(name) else {
        return Ok(false);
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "0" | "no" => Ok(false),
        "true" | "1" | "yes" => Ok(true),
        _ => Err(ConfigError::InvalidAttribute {
            name: name.to_string(),
            value: value.clone(),
        }),
    }
}

fn site_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum SiteList {
        Csv(String),
        List(Vec<String>),
    }

    Ok(match Option::<SiteList>::deserialize(deserializer)? {
        None => None,
        Some(SiteList::Csv(value)) => parse_site_list(&value),
        Some(SiteList::List(names)) => parse_site_list(&names.join(",")),
    })
}
