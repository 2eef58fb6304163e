//! GitHub profile fetcher.
//!
//! Performs up to three independent, unauthenticated reads — profile
//! metadata, the five most-recently-updated repositories, and the profile
//! README — and assembles them into one deterministic context blob. Each
//! read has its own short timeout and degrades on failure: the profile to
//! an empty struct, the repo list to empty, the README to a fixed sentinel.
//! Only a transport-level failure on the first read (network unreachable)
//! escapes as an error, which sends the cache down its fallback path.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use anigate_config::{ContactConfig, GithubConfig};
use anigate_core::error::FetchError;
use anigate_core::source::ContextSource;

const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_RAW_BASE: &str = "https://raw.githubusercontent.com";

/// Substituted for the README excerpt when the document read fails.
pub const DOCUMENT_UNAVAILABLE: &str = "(profile document unavailable)";

/// Fetches and normalizes one user's GitHub presence.
pub struct GithubSource {
    username: String,
    contact: ContactConfig,
    readme_excerpt_chars: usize,
    api_base: String,
    raw_base: String,
    client: reqwest::Client,
}

#[derive(Debug, Default, Deserialize)]
struct Profile {
    login: Option<String>,
    name: Option<String>,
    bio: Option<String>,
    email: Option<String>,
    blog: Option<String>,
    html_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Repo {
    name: String,
    html_url: String,
    description: Option<String>,
    #[serde(default)]
    fork: bool,
}

impl GithubSource {
    pub fn new(github: &GithubConfig, contact: &ContactConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(github.fetch_timeout_secs))
            .user_agent("anigate")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            username: github.username.clone(),
            contact: contact.clone(),
            readme_excerpt_chars: github.readme_excerpt_chars,
            api_base: GITHUB_API_BASE.to_string(),
            raw_base: GITHUB_RAW_BASE.to_string(),
            client,
        }
    }

    /// Point the source at different endpoints (proxies, test servers).
    pub fn with_endpoints(
        mut self,
        api_base: impl Into<String>,
        raw_base: impl Into<String>,
    ) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self.raw_base = raw_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Fetch profile metadata.
    ///
    /// Non-200 and decode failures degrade to an empty profile; a transport
    /// failure propagates so the caller can fall back to cached data.
    async fn fetch_profile(&self) -> Result<Profile, FetchError> {
        let url = format!("{}/users/{}", self.api_base, self.username);
        let response = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        if status != 200 {
            warn!(status, url = %url, "profile read failed, using empty profile");
            return Ok(Profile::default());
        }

        match response.json().await {
            Ok(profile) => Ok(profile),
            Err(e) => {
                warn!(error = %e, "profile response did not decode, using empty profile");
                Ok(Profile::default())
            }
        }
    }

    /// Fetch the five most-recently-updated repositories.
    ///
    /// Any failure degrades to an empty list.
    async fn fetch_repos(&self) -> Vec<Repo> {
        let url = format!(
            "{}/users/{}/repos?sort=updated&per_page=5",
            self.api_base, self.username
        );

        let response = match self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "repo list read failed, using empty list");
                return Vec::new();
            }
        };

        if response.status().as_u16() != 200 {
            warn!(status = response.status().as_u16(), "repo list read failed, using empty list");
            return Vec::new();
        }

        response.json().await.unwrap_or_else(|e| {
            warn!(error = %e, "repo list did not decode, using empty list");
            Vec::new()
        })
    }

    /// Fetch the profile README (the free-text "about" document).
    ///
    /// Any failure degrades to a fixed sentinel string.
    async fn fetch_document(&self) -> String {
        let url = format!(
            "{}/{}/{}/main/README.md",
            self.raw_base, self.username, self.username
        );

        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "profile document read failed");
                return DOCUMENT_UNAVAILABLE.to_string();
            }
        };

        if response.status().as_u16() != 200 {
            warn!(status = response.status().as_u16(), "profile document read failed");
            return DOCUMENT_UNAVAILABLE.to_string();
        }

        match response.text().await {
            Ok(text) => excerpt(&text, self.readme_excerpt_chars),
            Err(e) => {
                warn!(error = %e, "profile document body read failed");
                DOCUMENT_UNAVAILABLE.to_string()
            }
        }
    }

    /// Assemble the context blob. Deterministic for a given set of inputs.
    fn assemble(&self, profile: &Profile, document: &str, repos: &[Repo]) -> String {
        let login = profile.login.as_deref().unwrap_or(&self.username);
        let name = profile.name.as_deref().unwrap_or("N/A");
        let bio = profile.bio.as_deref().unwrap_or("No bio");

        // Contact fields come from configuration first; profile fields are
        // a fallback since GitHub hides them for most accounts.
        let email = self
            .contact
            .email
            .as_deref()
            .or(profile.email.as_deref())
            .unwrap_or("Not public (see GitHub profile)");
        let website = self
            .contact
            .website
            .as_deref()
            .or(profile.blog.as_deref().filter(|b| !b.is_empty()))
            .unwrap_or("None");
        let fallback_url = format!("https://github.com/{}", self.username);
        let github_url = self
            .contact
            .github_url
            .as_deref()
            .or(profile.html_url.as_deref())
            .unwrap_or(&fallback_url);

        let mut blob = String::new();
        blob.push_str("--- LIVE GITHUB DATA ---\n");
        blob.push_str(&format!("User: {login}\n"));
        blob.push_str(&format!("Name: {name}\n"));
        blob.push_str(&format!("Bio: {bio}\n"));
        blob.push_str(&format!("Email: {email}\n"));
        blob.push_str(&format!("Website: {website}\n"));
        blob.push_str(&format!("GitHub URL: {github_url}\n\n"));

        blob.push_str("ABOUT:\n");
        blob.push_str(document);
        blob.push_str("\n\n");

        blob.push_str("RECENT PROJECTS:\n");
        for repo in repos.iter().filter(|r| !r.fork) {
            match &repo.description {
                Some(desc) => {
                    blob.push_str(&format!("- {}: {} - {}\n", repo.name, repo.html_url, desc));
                }
                None => {
                    blob.push_str(&format!("- {}: {}\n", repo.name, repo.html_url));
                }
            }
        }

        blob
    }
}

#[async_trait]
impl ContextSource for GithubSource {
    fn name(&self) -> &str {
        "github"
    }

    async fn refresh(&self) -> Result<String, FetchError> {
        let profile = self.fetch_profile().await?;
        let document = self.fetch_document().await;
        let repos = self.fetch_repos().await;
        Ok(self.assemble(&profile, &document, &repos))
    }
}

fn transport_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout(e.to_string())
    } else {
        FetchError::Network(e.to_string())
    }
}

/// First `cap` characters of `text`, respecting char boundaries.
fn excerpt(text: &str, cap: usize) -> String {
    text.chars().take(cap).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> GithubSource {
        GithubSource::new(&GithubConfig::default(), &ContactConfig::default())
    }

    fn source_with_contact(contact: ContactConfig) -> GithubSource {
        GithubSource::new(&GithubConfig::default(), &contact)
    }

    #[test]
    fn profile_json_parses() {
        let raw = r#"{
            "login": "cid-kageno-dev",
            "name": "Cid Kageno",
            "bio": "Shadow developer",
            "email": null,
            "blog": "",
            "html_url": "https://github.com/cid-kageno-dev",
            "public_repos": 12
        }"#;
        let profile: Profile = serde_json::from_str(raw).unwrap();
        assert_eq!(profile.login.as_deref(), Some("cid-kageno-dev"));
        assert_eq!(profile.email, None);
        assert_eq!(profile.blog.as_deref(), Some(""));
    }

    #[test]
    fn repo_json_parses_and_defaults_fork() {
        let raw = r#"[
            {"name": "anigate", "html_url": "https://github.com/u/anigate", "description": "chat relay"},
            {"name": "mirror", "html_url": "https://github.com/u/mirror", "description": null, "fork": true}
        ]"#;
        let repos: Vec<Repo> = serde_json::from_str(raw).unwrap();
        assert!(!repos[0].fork);
        assert!(repos[1].fork);
    }

    #[test]
    fn blob_skips_forks_and_keeps_source_order() {
        let repos = vec![
            Repo {
                name: "first".into(),
                html_url: "https://github.com/u/first".into(),
                description: Some("newest".into()),
                fork: false,
            },
            Repo {
                name: "forked".into(),
                html_url: "https://github.com/u/forked".into(),
                description: None,
                fork: true,
            },
            Repo {
                name: "second".into(),
                html_url: "https://github.com/u/second".into(),
                description: None,
                fork: false,
            },
        ];

        let blob = source().assemble(&Profile::default(), "about text", &repos);

        assert!(blob.contains("- first: https://github.com/u/first - newest"));
        assert!(blob.contains("- second: https://github.com/u/second"));
        assert!(!blob.contains("forked"));
        assert!(blob.find("first").unwrap() < blob.find("second").unwrap());
    }

    #[test]
    fn blob_uses_configured_contact_over_profile() {
        let contact = ContactConfig {
            email: Some("me@example.com".into()),
            website: Some("https://example.com".into()),
            github_url: None,
        };
        let profile = Profile {
            email: Some("other@example.com".into()),
            blog: Some("https://other.example".into()),
            ..Profile::default()
        };

        let blob = source_with_contact(contact).assemble(&profile, "", &[]);

        assert!(blob.contains("Email: me@example.com"));
        assert!(blob.contains("Website: https://example.com"));
    }

    #[test]
    fn blob_degrades_empty_profile() {
        let blob = source().assemble(&Profile::default(), DOCUMENT_UNAVAILABLE, &[]);

        assert!(blob.contains("User: cid-kageno-dev"));
        assert!(blob.contains("Bio: No bio"));
        assert!(blob.contains("Email: Not public (see GitHub profile)"));
        assert!(blob.contains("GitHub URL: https://github.com/cid-kageno-dev"));
        assert!(blob.contains(DOCUMENT_UNAVAILABLE));
    }

    #[test]
    fn blob_is_deterministic() {
        let a = source().assemble(&Profile::default(), "doc", &[]);
        let b = source().assemble(&Profile::default(), "doc", &[]);
        assert_eq!(a, b);
    }

    #[test]
    fn excerpt_caps_length() {
        let long = "x".repeat(5000);
        assert_eq!(excerpt(&long, 1500).len(), 1500);
        assert_eq!(excerpt("short", 1500), "short");
    }

    #[test]
    fn endpoint_override_trims_trailing_slashes() {
        let s = source().with_endpoints("http://localhost:9998/api/", "http://localhost:9997/raw/");
        assert_eq!(s.api_base, "http://localhost:9998/api");
        assert_eq!(s.raw_base, "http://localhost:9997/raw");
    }

    #[test]
    fn excerpt_respects_char_boundaries() {
        let text = "héllo wörld";
        let cut = excerpt(text, 3);
        assert_eq!(cut, "hél");
    }
}
