use std::collections::HashMap;

use serde::Serialize;

use crate::api::models::Label;

/// Name/ID lookup over a label listing.
///
/// Both indices are rebuilt from scratch on every [`LabelResolver::load`].
#[derive(Debug, Clone, Default)]
pub struct LabelResolver {
    id_by_name: HashMap<String, String>,
    name_by_id: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLabels {
    pub resolved: Vec<String>,
    pub not_found: Vec<String>,
}

impl LabelResolver {
    pub fn new(labels: Vec<Label>) -> Self {
        let mut resolver = Self::default();
        resolver.load(labels);
        resolver
    }

    /// Replaces the loaded labels. Later labels win when two names differ
    /// only by case.
    pub fn load(&mut self, labels: Vec<Label>) {
        self.id_by_name.clear();
        self.name_by_id.clear();

        for label in labels {
            self.id_by_name
                .insert(label.name.to_lowercase(), label.id.clone());
            self.name_by_id.insert(label.id, label.name);
        }
    }

    /// Exact ID match first, then case-insensitive name.
    pub fn resolve(&self, name_or_id: &str) -> Option<&str> {
        if let Some((id, _)) = self.name_by_id.get_key_value(name_or_id) {
            return Some(id.as_str());
        }

        self.id_by_name
            .get(&name_or_id.to_lowercase())
            .map(String::as_str)
    }

    pub fn resolve_many<S: AsRef<str>>(&self, names_or_ids: &[S]) -> ResolvedLabels {
        let mut out = ResolvedLabels::default();

        for name_or_id in names_or_ids {
            let name_or_id = name_or_id.as_ref();
            match self.resolve(name_or_id) {
                Some(id) => out.resolved.push(id.to_string()),
                None => out.not_found.push(name_or_id.to_string()),
            }
        }

        out
    }

    pub fn name(&self, id: &str) -> Option<&str> {
        self.name_by_id.get(id).map(String::as_str)
    }

    /// Display name for an ID, falling back to the ID itself.
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.name(id).unwrap_or(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::LabelKind;

    fn label(id: &str, name: &str) -> Label {
        Label {
            id: id.to_string(),
            name: name.to_string(),
            kind: LabelKind::User,
        }
    }

    #[test]
    fn reload_discards_previous_labels() {
        let mut resolver = LabelResolver::new(vec![label("Label_1", "Old")]);
        resolver.load(vec![label("Label_2", "New")]);

        assert_eq!(resolver.resolve("old"), None);
        assert_eq!(resolver.resolve("Label_1"), None);
        assert_eq!(resolver.resolve("new"), Some("Label_2"));
    }

    #[test]
    fn display_name_falls_back_to_id() {
        let resolver = LabelResolver::new(vec![label("Label_1", "Work")]);
        assert_eq!(resolver.display_name("Label_1"), "Work");
        assert_eq!(resolver.display_name("Label_9"), "Label_9");
    }
}
