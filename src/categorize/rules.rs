//! Category rule table

use serde::{Deserialize, Serialize};

/// One explicit membership list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipRule {
    pub category: String,
    pub objects: Vec<String>,
}

impl MembershipRule {
    pub fn new(category: &str, objects: &[&str]) -> Self {
        Self {
            category: category.to_string(),
            objects: objects.iter().map(|o| o.to_string()).collect(),
        }
    }
}

/// Namespace prefix mapped to a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixRule {
    pub prefix: String,
    pub category: String,
}

/// Ordered rule table. Evaluation order is membership lists (in list
/// order), prefix rules (in list order), the custom suffix, the fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryRules {
    pub memberships: Vec<MembershipRule>,
    pub prefixes: Vec<PrefixRule>,
    pub custom_suffix: String,
    pub custom_category: String,
    pub fallback: String,
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self {
            memberships: vec![
                MembershipRule::new("core", &["Account", "Contact", "Lead", "User", "Group", "Profile"]),
                MembershipRule::new(
                    "sales",
                    &[
                        "Opportunity",
                        "Quote",
                        "Contract",
                        "Order",
                        "Product2",
                        "PricebookEntry",
                        "OpportunityLineItem",
                        "QuoteLineItem",
                        "OrderItem",
                    ],
                ),
                MembershipRule::new(
                    "service",
                    &[
                        "Case",
                        "Solution",
                        "Entitlement",
                        "ServiceContract",
                        "WorkOrder",
                        "WorkOrderLineItem",
                        "ServiceAppointment",
                    ],
                ),
                MembershipRule::new("marketing", &["Campaign", "CampaignMember", "Lead"]),
                MembershipRule::new("activities", &["Task", "Event", "EmailMessage"]),
            ],
            prefixes: vec![PrefixRule {
                prefix: "HealthCloudGA__".to_string(),
                category: "healthcare".to_string(),
            }],
            custom_suffix: "__c".to_string(),
            custom_category: "custom".to_string(),
            fallback: "other".to_string(),
        }
    }
}

impl CategoryRules {
    /// Every category name the table can produce, in evaluation order,
    /// without repeats.
    pub fn category_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        let all = self
            .memberships
            .iter()
            .map(|m| m.category.as_str())
            .chain(self.prefixes.iter().map(|p| p.category.as_str()))
            .chain([self.custom_category.as_str(), self.fallback.as_str()]);
        for name in all {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Rejects tables that could yield an empty or path-unsafe category.
    pub fn validate(&self) -> Result<(), String> {
        for name in self.category_names() {
            if name.is_empty() {
                return Err("category names must not be empty".to_string());
            }
            if name.contains(['/', '\\']) || name.starts_with('.') {
                return Err(format!("category name '{}' is not a valid file name", name));
            }
        }
        if self.prefixes.iter().any(|p| p.prefix.is_empty()) {
            return Err("prefix rules must have a non-empty prefix".to_string());
        }
        if self.custom_suffix.is_empty() {
            return Err("custom_suffix must not be empty".to_string());
        }
        Ok(())
    }
}
