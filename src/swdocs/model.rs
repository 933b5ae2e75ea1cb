use crate::error::{Result, SwdocsError};
use crate::timestamp::Timestamp;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
    pub description: String,
}

impl Link {
    pub fn new(url: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub header: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl Section {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            description: None,
            links: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }
}

/// The ordered sections of a document.
///
/// Stored as a single JSON array in the `sections` column; the nested
/// structure is not queryable, only round-tripped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sections(pub Vec<Section>);

impl Sections {
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(&self.0).map_err(SwdocsError::Serialization)
    }

    pub fn decode(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map(Sections)
            .map_err(SwdocsError::Deserialization)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Section> {
        self.0.iter()
    }
}

/// A document as written by a client: everything except the fields the
/// store assigns (`id`, `created`, `updated`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentPayload {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default)]
    pub sections: Sections,
}

impl DocumentPayload {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            user: None,
            sections: Sections::default(),
        }
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.0.push(section);
        self
    }

    /// Checks everything that must hold before the payload reaches a store.
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        for (i, section) in self.sections.iter().enumerate() {
            if section.header.trim().is_empty() {
                return Err(SwdocsError::Validation(format!(
                    "section {} has an empty header",
                    i + 1
                )));
            }
        }
        Ok(())
    }
}

/// Names are URL path segments: non-empty, slash-free, not a dot segment,
/// and without surrounding whitespace.
pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(SwdocsError::Validation("name is required".to_string()));
    }
    if name.trim() != name {
        return Err(SwdocsError::Validation(format!(
            "name '{}' must not start or end with whitespace",
            name
        )));
    }
    if name.contains('/') {
        return Err(SwdocsError::Validation(format!(
            "name '{}' must not contain '/'",
            name
        )));
    }
    if name == "." || name == ".." {
        return Err(SwdocsError::Validation(format!(
            "name '{}' is reserved",
            name
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    pub created: Timestamp,
    pub updated: Timestamp,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sections: Sections,
}

impl Document {
    /// Combines a payload with the fields assigned by the store.
    pub fn from_payload(
        payload: DocumentPayload,
        id: i64,
        created: Timestamp,
        updated: Timestamp,
    ) -> Self {
        Self {
            id,
            name: payload.name,
            user: payload.user,
            created,
            updated,
            description: payload.description,
            sections: payload.sections,
        }
    }

    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            name: self.name.clone(),
            user: self.user.clone(),
            description: Some(self.description.clone()),
            created: Some(self.created),
            updated: self.updated,
        }
    }
}

/// A partial view of a document, as returned by listings and searches.
///
/// Search results carry only `name`, `user` and `updated`; recent listings
/// add `description` and `created`. Unprojected fields are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<Timestamp>,
    pub updated: Timestamp,
}

impl DocumentSummary {
    /// Drops the fields a search does not project.
    pub fn search_projection(mut self) -> Self {
        self.description = None;
        self.created = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dashboards() -> Section {
        Section::new("Dashboards")
            .with_description("Where to look first")
            .with_link(Link::new("http://x", "Kibana"))
            .with_link(Link::new("http://y", "Grafana"))
    }

    #[test]
    fn sections_round_trip_preserves_order() {
        let sections = Sections(vec![
            dashboards(),
            Section::new("Empty"),
            Section::new("Runbooks").with_link(Link::new("http://wiki/a,b;c|d", "a, b; c | d")),
        ]);

        let decoded = Sections::decode(&sections.encode().unwrap()).unwrap();
        assert_eq!(decoded, sections);
        assert_eq!(decoded.0[0].links[1].description, "Grafana");
        assert!(decoded.0[1].links.is_empty());
    }

    #[test]
    fn empty_sections_round_trip() {
        let encoded = Sections::default().encode().unwrap();
        assert_eq!(encoded, "[]");
        assert!(Sections::decode(&encoded).unwrap().is_empty());
    }

    #[test]
    fn corrupt_sections_are_a_deserialization_error() {
        for raw in ["", "not json", "{\"header\":\"x\"}", "[{\"links\":[]}]"] {
            assert!(
                matches!(Sections::decode(raw), Err(SwdocsError::Deserialization(_))),
                "{:?} should fail to decode",
                raw
            );
        }
    }

    #[test]
    fn payload_defaults_from_minimal_json() {
        let payload: DocumentPayload = serde_json::from_str(r#"{"name":"kafka"}"#).unwrap();
        assert_eq!(payload.name, "kafka");
        assert_eq!(payload.description, "");
        assert!(payload.user.is_none());
        assert!(payload.sections.is_empty());
    }

    #[test]
    fn payload_requires_name() {
        assert!(serde_json::from_str::<DocumentPayload>(r#"{"description":"x"}"#).is_err());
    }

    #[test]
    fn validate_rejects_bad_names() {
        for name in ["", "   ", "a/b", ".", "..", "  kafka", "kafka\t"] {
            let err = DocumentPayload::new(name, "").validate().unwrap_err();
            assert!(matches!(err, SwdocsError::Validation(_)), "{:?}", name);
        }
        assert!(DocumentPayload::new("kafka", "").validate().is_ok());
        assert!(DocumentPayload::new("...", "").validate().is_ok());
        assert!(DocumentPayload::new("v1.2 notes", "").validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_section_header() {
        let payload = DocumentPayload::new("kafka", "").with_section(Section::new("  "));
        match payload.validate() {
            Err(SwdocsError::Validation(msg)) => assert!(msg.contains("section 1")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn search_projection_drops_listing_fields() {
        let now = Timestamp::now();
        let doc = Document::from_payload(DocumentPayload::new("kafka", "broker"), 1, now, now);
        let summary = doc.summary().search_projection();
        assert_eq!(summary.name, "kafka");
        assert!(summary.description.is_none());
        assert!(summary.created.is_none());
        assert_eq!(summary.updated, now);
    }
}
