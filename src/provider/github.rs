//! GitHub REST API provider
//!
//! Blocking client for the handful of GitHub endpoints the inventory needs.
//! Works against github.com and GitHub Enterprise (pass the instance's API
//! root, e.g. `https://ghe.example.gov/api/v3`).
//!
//! Responses are classified the same way for every endpoint:
//!
//! | Status          | Outcome                          |
//! |-----------------|----------------------------------|
//! | 2xx             | success                          |
//! | 404             | [`Lookup::NotFound`]             |
//! | 401, 403        | [`Error::Authentication`]        |
//! | anything else   | [`Error::Api`]                   |
//! | no response     | [`Error::Network`]               |
//!
//! Nothing is retried. Listing endpoints follow the `Link` header until no
//! `rel="next"` page remains.

use std::io::Read;
use std::time::Duration;

use log::{debug, trace};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use super::{DirectoryEntry, License, Lookup, Organization, Repository, RepositoryProvider};
use crate::defaults::{GITHUB_API_VERSION, PAGE_SIZE, USER_AGENT};
use crate::error::{Error, Result};

const ACCEPT_JSON: &str = "application/vnd.github+json";
const ACCEPT_RAW: &str = "application/vnd.github.raw";

/// Body of `GET /repos/{owner}/{repo}/license`.
#[derive(Debug, Deserialize)]
struct LicenseContent {
    #[serde(default)]
    license: Option<License>,
}

/// Error body GitHub sends with non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiMessage {
    message: String,
}

/// A [`RepositoryProvider`] backed by the GitHub REST API.
pub struct GitHubProvider {
    agent: ureq::Agent,
    base_url: Url,
    token: Option<String>,
}

impl std::fmt::Debug for GitHubProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubProvider")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

impl GitHubProvider {
    /// Creates a provider for the API rooted at `base_url`.
    ///
    /// Without a token only public data is visible and GitHub's anonymous
    /// rate limit applies.
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let agent = ureq::AgentBuilder::new()
            .user_agent(USER_AGENT)
            .timeout_connect(Duration::from_secs(30))
            .timeout_read(Duration::from_secs(60))
            .build();

        Ok(Self {
            agent,
            base_url,
            token: token.filter(|t| !t.is_empty()).map(str::to_string),
        })
    }

    /// The API root requests are made against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Performs a GET and classifies the response.
    fn get(&self, url: &str, accept: &str) -> Result<Lookup<ureq::Response>> {
        debug!("GET {}", url);

        let mut request = self
            .agent
            .get(url)
            .set("Accept", accept)
            .set("X-GitHub-Api-Version", GITHUB_API_VERSION);
        if let Some(token) = &self.token {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }

        match request.call() {
            Ok(response) => Ok(Lookup::Found(response)),
            Err(ureq::Error::Status(404, _)) => Ok(Lookup::NotFound),
            Err(ureq::Error::Status(401 | 403, response)) => Err(Error::Authentication {
                url: url.to_string(),
                message: error_message(response),
            }),
            Err(ureq::Error::Status(status, response)) => Err(Error::Api {
                url: url.to_string(),
                status,
                message: error_message(response),
            }),
            Err(ureq::Error::Transport(transport)) => Err(Error::Network {
                url: url.to_string(),
                message: transport.to_string(),
            }),
        }
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Lookup<T>> {
        match self.get(url, ACCEPT_JSON)? {
            Lookup::Found(response) => Ok(Lookup::Found(read_json(url, response)?)),
            Lookup::NotFound => Ok(Lookup::NotFound),
        }
    }

    /// Fetches every page of a listing endpoint, in order.
    fn get_paginated<T: DeserializeOwned>(&self, first: Url) -> Result<Lookup<Vec<T>>> {
        let mut items = Vec::new();
        let mut next = Some(first.to_string());
        let mut pages = 0usize;

        while let Some(url) = next.take() {
            let response = match self.get(&url, ACCEPT_JSON)? {
                Lookup::Found(response) => response,
                // A vanished listing is only "not found" on the first page.
                Lookup::NotFound if pages == 0 => return Ok(Lookup::NotFound),
                Lookup::NotFound => {
                    return Err(Error::Api {
                        url,
                        status: 404,
                        message: "listing page disappeared during pagination".to_string(),
                    })
                }
            };

            next = response.header("link").and_then(next_page_link);
            let page: Vec<T> = read_json(&url, response)?;
            pages += 1;
            trace!("page {} of {} returned {} items", pages, first, page.len());
            items.extend(page);
        }

        Ok(Lookup::Found(items))
    }
}

impl RepositoryProvider for GitHubProvider {
    fn list_organization_repositories(&self, org: &str) -> Result<Vec<Repository>> {
        let mut url = self.endpoint(&format!("orgs/{org}/repos"))?;
        url.query_pairs_mut()
            .append_pair("per_page", &PAGE_SIZE.to_string());

        match self.get_paginated(url.clone())? {
            Lookup::Found(repos) => Ok(repos),
            Lookup::NotFound => Err(Error::Api {
                url: url.to_string(),
                status: 404,
                message: format!("organization '{org}' not found"),
            }),
        }
    }

    fn repository(&self, full_name: &str) -> Result<Lookup<Repository>> {
        let url = self.endpoint(&format!("repos/{full_name}"))?;
        self.get_json(url.as_str())
    }

    fn list_directory(&self, repo: &Repository, path: &str) -> Result<Lookup<Vec<DirectoryEntry>>> {
        let url = self.endpoint(&format!(
            "repos/{}/contents/{}",
            repo.full_name,
            path.trim_start_matches('/')
        ))?;
        self.get_json(url.as_str())
    }

    fn fetch_file_bytes(&self, repo: &Repository, path: &str) -> Result<Lookup<Vec<u8>>> {
        let url = self.endpoint(&format!(
            "repos/{}/contents/{}",
            repo.full_name,
            path.trim_start_matches('/')
        ))?;

        match self.get(url.as_str(), ACCEPT_RAW)? {
            Lookup::Found(response) => {
                let mut bytes = Vec::new();
                response
                    .into_reader()
                    .read_to_end(&mut bytes)
                    .map_err(|e| Error::Network {
                        url: url.to_string(),
                        message: e.to_string(),
                    })?;
                Ok(Lookup::Found(bytes))
            }
            Lookup::NotFound => Ok(Lookup::NotFound),
        }
    }

    fn fetch_license(&self, repo: &Repository) -> Result<Lookup<License>> {
        let url = self.endpoint(&format!("repos/{}/license", repo.full_name))?;
        let content: Lookup<LicenseContent> = self.get_json(url.as_str())?;
        Ok(content.found().and_then(|c| c.license).into())
    }

    fn fetch_organization(&self, org: &str) -> Result<Organization> {
        let url = self.endpoint(&format!("orgs/{org}"))?;
        match self.get_json(url.as_str())? {
            Lookup::Found(organization) => Ok(organization),
            Lookup::NotFound => Err(Error::Api {
                url: url.to_string(),
                status: 404,
                message: format!("organization '{org}' not found"),
            }),
        }
    }
}

fn read_json<T: DeserializeOwned>(url: &str, response: ureq::Response) -> Result<T> {
    serde_json::from_reader(response.into_reader()).map_err(|e| Error::Api {
        url: url.to_string(),
        status: 200,
        message: format!("malformed response body: {e}"),
    })
}

/// Best-effort extraction of GitHub's `{"message": ...}` error body.
fn error_message(response: ureq::Response) -> String {
    let status_text = response.status_text().to_string();
    match response.into_string() {
        Ok(body) => parse_error_message(&body).unwrap_or(status_text),
        Err(_) => status_text,
    }
}

fn parse_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiMessage>(body)
        .ok()
        .map(|m| m.message)
        .filter(|m| !m.is_empty())
}

/// Extracts the `rel="next"` target from an RFC 8288 `Link` header.
pub fn next_page_link(header: &str) -> Option<String> {
    header.split(',').find_map(|part| {
        let mut pieces = part.split(';');
        let target = pieces.next()?.trim();
        let is_next = pieces.any(|param| {
            let param = param.trim();
            param == r#"rel="next""# || param == "rel=next"
        });
        if !is_next {
            return None;
        }
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(str::to_string)
    })
}
