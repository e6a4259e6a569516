//! Field resolution
//!
//! Every output field is resolved through the same chain of tiers:
//!
//! 1. the override set,
//! 2. the repository's declaration,
//! 3. a default derived from platform metadata.
//!
//! The first tier holding a present value wins. A value is present when its
//! key exists and is not `null`; `0`, `""`, `false` and `[]` all count.
//! Tiers are evaluated lazily, so a platform lookup such as the license or
//! organization request only happens when neither higher tier answered.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use serde_json::{json, Value};

use crate::declaration::Declaration;
use crate::error::Result;
use crate::overrides::Overrides;
use crate::provider::{Lookup, Repository, RepositoryProvider};
use crate::record::{Contact, InventoryRecord, Permissions};

pub const NAME: &[&str] = &["name"];
pub const DESCRIPTION: &[&str] = &["description"];
pub const LICENSES: &[&str] = &["permissions", "licenses"];
pub const USAGE_TYPE: &[&str] = &["permissions", "usageType"];
pub const EXEMPTION_TEXT: &[&str] = &["permissions", "exemptionText"];
pub const TAGS: &[&str] = &["tags"];
pub const CONTACT_EMAIL: &[&str] = &["contact", "email"];
pub const REPOSITORY_URL: &[&str] = &["repositoryURL"];
pub const LABOR_HOURS: &[&str] = &["laborHours"];
pub const ORGANIZATION: &[&str] = &["organization"];

pub const USAGE_OPEN_SOURCE: &str = "openSource";
pub const USAGE_GOVERNMENT_WIDE_REUSE: &str = "governmentWideReuse";

/// One step of a precedence chain. `Ok(None)` means "no value here, ask the
/// next tier".
pub type Tier<'t> = Box<dyn FnOnce() -> Result<Option<Value>> + 't>;

/// Boxes a closure as a [`Tier`].
pub fn tier<'t>(f: impl FnOnce() -> Result<Option<Value>> + 't) -> Tier<'t> {
    Box::new(f)
}

/// Evaluates `tiers` in order and returns the first present value.
pub fn first_present(tiers: Vec<Tier<'_>>) -> Result<Option<Value>> {
    for tier in tiers {
        match tier()? {
            Some(Value::Null) | None => continue,
            Some(value) => return Ok(Some(value)),
        }
    }
    Ok(None)
}

/// Resolves inventory fields for repositories of one run.
///
/// Organization contact emails are fetched once per owner and reused for
/// every repository that needs the default.
pub struct FieldResolver<'a> {
    provider: &'a dyn RepositoryProvider,
    overrides: &'a Overrides,
    org_emails: Mutex<HashMap<String, Option<String>>>,
}

impl<'a> FieldResolver<'a> {
    pub fn new(provider: &'a dyn RepositoryProvider, overrides: &'a Overrides) -> Self {
        Self {
            provider,
            overrides,
            org_emails: Mutex::new(HashMap::new()),
        }
    }

    /// Resolves every field of `repo` into a record.
    pub fn resolve(&self, repo: &Repository, declaration: &Declaration) -> Result<InventoryRecord> {
        Ok(InventoryRecord {
            name: self.name(repo, declaration)?,
            description: self.description(repo, declaration)?,
            permissions: Permissions {
                licenses: self.licenses(repo, declaration)?,
                usage_type: self.usage_type(repo, declaration)?,
                exemption_text: self.exemption_text(declaration)?,
            },
            tags: self.tags(repo, declaration)?,
            contact: Contact {
                email: self.contact_email(repo, declaration)?,
            },
            repository_url: self.repository_url(repo, declaration)?,
            labor_hours: self.labor_hours(declaration)?,
            organization: self.organization(declaration)?,
        })
    }

    pub fn name(&self, repo: &Repository, declaration: &Declaration) -> Result<Value> {
        self.chain(NAME, declaration, tier(|| Ok(Some(json!(repo.name)))))
    }

    pub fn description(&self, repo: &Repository, declaration: &Declaration) -> Result<Value> {
        self.chain(
            DESCRIPTION,
            declaration,
            tier(|| {
                let description = repo
                    .description
                    .as_deref()
                    .filter(|text| !text.is_empty())
                    .unwrap_or(&repo.name);
                Ok(Some(json!(description)))
            }),
        )
    }

    /// Falls back to the platform's license lookup; a missing license or one
    /// lacking either its URL or SPDX id resolves to `null`.
    pub fn licenses(&self, repo: &Repository, declaration: &Declaration) -> Result<Value> {
        self.chain(
            LICENSES,
            declaration,
            tier(|| {
                let Lookup::Found(license) = self.provider.fetch_license(repo)? else {
                    return Ok(None);
                };
                Ok(match (license.url, license.spdx_id) {
                    (Some(url), Some(spdx_id)) => Some(json!([{ "URL": url, "name": spdx_id }])),
                    _ => None,
                })
            }),
        )
    }

    pub fn usage_type(&self, repo: &Repository, declaration: &Declaration) -> Result<Value> {
        self.chain(
            USAGE_TYPE,
            declaration,
            tier(|| {
                let usage = if repo.private {
                    USAGE_GOVERNMENT_WIDE_REUSE
                } else {
                    USAGE_OPEN_SOURCE
                };
                Ok(Some(json!(usage)))
            }),
        )
    }

    pub fn exemption_text(&self, declaration: &Declaration) -> Result<Value> {
        self.chain(EXEMPTION_TEXT, declaration, tier(|| Ok(None)))
    }

    pub fn tags(&self, repo: &Repository, declaration: &Declaration) -> Result<Value> {
        self.chain(
            TAGS,
            declaration,
            tier(|| {
                if repo.topics.is_empty() {
                    Ok(Some(json!([repo.owner.login])))
                } else {
                    Ok(Some(json!(repo.topics)))
                }
            }),
        )
    }

    /// Falls back to the contact email registered on the owning organization.
    pub fn contact_email(&self, repo: &Repository, declaration: &Declaration) -> Result<Value> {
        self.chain(
            CONTACT_EMAIL,
            declaration,
            tier(|| Ok(self.organization_email(&repo.owner.login)?.map(Value::String))),
        )
    }

    /// Private repositories get no URL by default.
    pub fn repository_url(&self, repo: &Repository, declaration: &Declaration) -> Result<Value> {
        self.chain(
            REPOSITORY_URL,
            declaration,
            tier(|| {
                if repo.private {
                    Ok(None)
                } else {
                    Ok(Some(json!(repo.html_url)))
                }
            }),
        )
    }

    pub fn labor_hours(&self, declaration: &Declaration) -> Result<Value> {
        self.chain(LABOR_HOURS, declaration, tier(|| Ok(Some(json!(0)))))
    }

    /// `None` unless an override or the declaration supplies it.
    pub fn organization(&self, declaration: &Declaration) -> Result<Option<Value>> {
        first_present(vec![
            self.override_tier(ORGANIZATION),
            declaration_tier(declaration, ORGANIZATION),
        ])
    }

    fn chain<'t>(
        &'t self,
        path: &'t [&'t str],
        declaration: &'t Declaration,
        default: Tier<'t>,
    ) -> Result<Value> {
        let tiers = vec![
            self.override_tier(path),
            declaration_tier(declaration, path),
            default,
        ];
        Ok(first_present(tiers)?.unwrap_or(Value::Null))
    }

    fn override_tier<'t>(&'t self, path: &'t [&'t str]) -> Tier<'t> {
        tier(move || Ok(self.overrides.get(path).cloned()))
    }

    fn organization_email(&self, org: &str) -> Result<Option<String>> {
        if let Some(email) = self
            .org_emails
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(org)
        {
            return Ok(email.clone());
        }

        let email = self
            .provider
            .fetch_organization(org)?
            .email
            .filter(|email| !email.is_empty());
        self.org_emails
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(org.to_string(), email.clone());
        Ok(email)
    }
}

fn declaration_tier<'t>(declaration: &'t Declaration, path: &'t [&'t str]) -> Tier<'t> {
    tier(move || Ok(declaration.get(path).cloned()))
}
