use anyhow::Context;
use url::Url;

use crate::session::Mode;

/// Literal marker replaced by each candidate in the fuzzing modes.
pub const FUZZ_TOKEN: &str = "FUZZ";

/// What a run is aimed at. Built once from the CLI, immutable afterwards;
/// owns the candidate-to-identifier expansion for its mode.
#[derive(Debug, Clone)]
pub enum TargetDescriptor {
    Directory {
        base_url: String,
        extensions: Vec<String>,
    },
    Subdomain {
        base_domain: String,
    },
    ParamFuzz {
        url: Url,
        param: String,
    },
    PlaceholderFuzz {
        url: String,
    },
    Vhost {
        ip: String,
        base_domain: String,
    },
}

impl TargetDescriptor {
    pub fn directory(url: &str, extensions: Option<&str>) -> anyhow::Result<Self> {
        Url::parse(url).with_context(|| format!("invalid target URL '{url}'"))?;
        let extensions = extensions
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|ext| !ext.is_empty())
                    .map(|ext| {
                        if ext.starts_with('.') {
                            ext.to_string()
                        } else {
                            format!(".{ext}")
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(Self::Directory {
            base_url: url.trim_end_matches('/').to_string(),
            extensions,
        })
    }

    pub fn subdomain(domain: &str) -> Self {
        Self::Subdomain {
            base_domain: domain.trim_matches('.').to_string(),
        }
    }

    pub fn param_fuzz(url: &str, param: &str) -> anyhow::Result<Self> {
        let parsed = Url::parse(url).with_context(|| format!("invalid target URL '{url}'"))?;
        if !parsed.query().unwrap_or("").contains(FUZZ_TOKEN) {
            tracing::warn!("query string of {url} carries no {FUZZ_TOKEN} token; nothing will be substituted");
        }
        Ok(Self::ParamFuzz {
            url: parsed,
            param: param.to_string(),
        })
    }

    pub fn placeholder_fuzz(url: &str) -> anyhow::Result<Self> {
        if !url.contains(FUZZ_TOKEN) {
            tracing::warn!("URL {url} carries no {FUZZ_TOKEN} token; nothing will be substituted");
        }
        Ok(Self::PlaceholderFuzz {
            url: url.to_string(),
        })
    }

    pub fn vhost(ip: &str, domain: &str) -> Self {
        Self::Vhost {
            ip: ip.to_string(),
            base_domain: domain.trim_matches('.').to_string(),
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Self::Directory { .. } => Mode::Dir,
            Self::Subdomain { .. } => Mode::Sub,
            Self::ParamFuzz { .. } => Mode::Fuzz,
            Self::PlaceholderFuzz { .. } => Mode::FuzzAny,
            Self::Vhost { .. } => Mode::Vhost,
        }
    }

    /// Target line shown in the banner.
    pub fn describe(&self) -> String {
        match self {
            Self::Directory { base_url, .. } => base_url.clone(),
            Self::Subdomain { base_domain } => base_domain.clone(),
            Self::ParamFuzz { url, .. } => url.to_string(),
            Self::PlaceholderFuzz { url } => url.clone(),
            Self::Vhost { ip, base_domain } => format!("{base_domain} @ {ip}"),
        }
    }

    /// Expand wordlist entries into concrete probe identifiers. Directory
    /// mode yields one identifier per word plus one per word+extension;
    /// every other mode maps one word to one identifier.
    pub fn expand(&self, words: &[String]) -> Vec<String> {
        match self {
            Self::Directory {
                base_url,
                extensions,
            } => {
                let mut out = Vec::with_capacity(words.len() * (1 + extensions.len()));
                for word in words {
                    out.push(format!("{base_url}/{word}"));
                    for ext in extensions {
                        out.push(format!("{base_url}/{word}{ext}"));
                    }
                }
                out
            }
            Self::Subdomain { base_domain } => words
                .iter()
                .map(|word| format!("{word}.{base_domain}"))
                .collect(),
            Self::ParamFuzz { url, .. } => {
                words.iter().map(|word| fuzz_query(url, word)).collect()
            }
            Self::PlaceholderFuzz { url } => words
                .iter()
                .map(|word| url.replace(FUZZ_TOKEN, word))
                .collect(),
            Self::Vhost { base_domain, .. } => words
                .iter()
                .map(|word| format!("{word}.{base_domain}"))
                .collect(),
        }
    }
}

/// Substitute the token in the query string only; scheme, host and path
/// pass through untouched.
fn fuzz_query(url: &Url, word: &str) -> String {
    let query = url.query().unwrap_or("").replace(FUZZ_TOKEN, word);
    let mut out = url.clone();
    out.set_query(Some(&query));
    out.to_string()
}
