//! Object categorization
//!
//! `categorize` is a pure function of (API name, rule table): first matching
//! rule wins, and every object lands in exactly one category.

mod rules;

pub use rules::{CategoryRules, MembershipRule, PrefixRule};

use std::collections::BTreeMap;

use crate::model::ObjectDefinition;

/// Category for one API name.
pub fn categorize<'r>(api_name: &str, rules: &'r CategoryRules) -> &'r str {
    if let Some(rule) = rules
        .memberships
        .iter()
        .find(|m| m.objects.iter().any(|o| o == api_name))
    {
        return &rule.category;
    }

    if let Some(rule) = rules.prefixes.iter().find(|p| api_name.starts_with(&p.prefix)) {
        return &rule.category;
    }

    if api_name.ends_with(&rules.custom_suffix) {
        return &rules.custom_category;
    }

    &rules.fallback
}

/// Category assignment for a whole document
pub struct Categorizer<'r> {
    rules: &'r CategoryRules,
}

impl<'r> Categorizer<'r> {
    pub fn new(rules: &'r CategoryRules) -> Self {
        Self { rules }
    }

    /// Groups objects by category. Objects keep document order within a
    /// category; categories with no members are absent.
    pub fn assign<'d>(&self, objects: &'d [ObjectDefinition]) -> BTreeMap<String, Vec<&'d ObjectDefinition>> {
        let mut groups: BTreeMap<String, Vec<&ObjectDefinition>> = BTreeMap::new();
        for object in objects {
            groups
                .entry(categorize(&object.api_name, self.rules).to_string())
                .or_default()
                .push(object);
        }
        groups
    }

    /// Category per API name.
    pub fn assignment(&self, objects: &[ObjectDefinition]) -> BTreeMap<String, String> {
        objects
            .iter()
            .map(|o| (o.api_name.clone(), categorize(&o.api_name, self.rules).to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let rules = CategoryRules::default();
        assert_eq!(categorize("Account", &rules), "core");
        assert_eq!(categorize("Opportunity", &rules), "sales");
        assert_eq!(categorize("Case", &rules), "service");
        assert_eq!(categorize("CampaignMember", &rules), "marketing");
        assert_eq!(categorize("Task", &rules), "activities");
        assert_eq!(categorize("HealthCloudGA__CarePlan__c", &rules), "healthcare");
        assert_eq!(categorize("Invoice__c", &rules), "custom");
        assert_eq!(categorize("Asset", &rules), "other");
    }

    #[test]
    fn test_first_membership_list_wins() {
        // Lead appears in both core and marketing.
        assert_eq!(categorize("Lead", &CategoryRules::default()), "core");
    }

    #[test]
    fn test_membership_beats_suffix() {
        let mut rules = CategoryRules::default();
        rules.memberships[0].objects.push("Invoice__c".into());
        assert_eq!(categorize("Invoice__c", &rules), "core");
    }

    #[test]
    fn test_assign_groups_without_empty_categories() {
        let rules = CategoryRules::default();
        let objects = vec![
            ObjectDefinition::new("Case"),
            ObjectDefinition::new("Account"),
            ObjectDefinition::new("WorkOrder"),
        ];
        let groups = Categorizer::new(&rules).assign(&objects);

        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["core", "service"]);
        let service: Vec<_> = groups["service"].iter().map(|o| o.api_name.as_str()).collect();
        assert_eq!(service, vec!["Case", "WorkOrder"]);
    }

    #[test]
    fn test_validate_rejects_path_separators() {
        let mut rules = CategoryRules::default();
        assert!(rules.validate().is_ok());
        rules.fallback = "../other".into();
        assert!(rules.validate().is_err());
    }

    #[test]
    fn test_category_names_deduplicated() {
        let rules = CategoryRules::default();
        let names = rules.category_names();
        assert_eq!(
            names,
            vec!["core", "sales", "service", "marketing", "activities", "healthcare", "custom", "other"]
        );
    }
}
