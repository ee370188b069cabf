use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::DispatchError;
use crate::domain::{Recipient, Role};

/// Declarative recipient-narrowing criteria.
///
/// Every axis is optional. Present axes combine with AND, values inside an axis
/// with OR. A present but empty axis constrains nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub roles: Option<BTreeSet<Role>>,
    pub email_domains: Option<Vec<String>>,
    pub exclude_ids: Option<BTreeSet<i64>>,
}

/// A single conjunctive predicate of a resolved filter.
pub type Stage<'a> = Box<dyn Fn(&Recipient) -> bool + Send + Sync + 'a>;

pub fn role_stage(roles: &BTreeSet<Role>) -> impl Fn(&Recipient) -> bool + Send + Sync + '_ {
    move |recipient: &Recipient| roles.contains(&recipient.role)
}

pub fn domain_stage(domains: &[String]) -> impl Fn(&Recipient) -> bool + Send + Sync + '_ {
    move |recipient: &Recipient| {
        domains
            .iter()
            .any(|domain| recipient.email.ends_with(domain.as_str()))
    }
}

pub fn exclusion_stage(ids: &BTreeSet<i64>) -> impl Fn(&Recipient) -> bool + Send + Sync + '_ {
    move |recipient: &Recipient| !ids.contains(&recipient.id)
}

impl FilterSpec {
    /// Stages in application order: role, domain, exclusion.
    pub fn stages(&self) -> Vec<Stage<'_>> {
        let mut stages: Vec<Stage<'_>> = Vec::with_capacity(3);
        if let Some(roles) = self.roles.as_ref().filter(|roles| !roles.is_empty()) {
            stages.push(Box::new(role_stage(roles)));
        }
        if let Some(domains) = self.email_domains.as_ref().filter(|d| !d.is_empty()) {
            stages.push(Box::new(domain_stage(domains)));
        }
        if let Some(ids) = self.exclude_ids.as_ref().filter(|ids| !ids.is_empty()) {
            stages.push(Box::new(exclusion_stage(ids)));
        }
        stages
    }

    pub fn is_unconstrained(&self) -> bool {
        self.stages().is_empty()
    }

    /// Rejects filters that can't be meaningfully applied.
    ///
    /// A blank domain would match every address.
    pub fn check(&self) -> Result<(), DispatchError> {
        if let Some(domains) = &self.email_domains {
            if domains.iter().any(|domain| domain.trim().is_empty()) {
                return Err(DispatchError::MalformedFilter(
                    "email domains must not be blank".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Narrow `full_set` to the target set of `filter`, keeping the original order.
pub fn resolve(full_set: &[Recipient], filter: Option<&FilterSpec>) -> Vec<Recipient> {
    let Some(filter) = filter else {
        return full_set.to_vec();
    };
    let stages = filter.stages();
    full_set
        .iter()
        .filter(|recipient| stages.iter().all(|stage| stage(*recipient)))
        .cloned()
        .collect()
}
