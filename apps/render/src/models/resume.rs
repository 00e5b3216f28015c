use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::errors::InputError;
use crate::models::section::{is_blank, value_to_text, SectionValue};

/// Keys that are never rendered as orderable sections.
pub const RESERVED_KEYS: &[&str] = &["heading", "section_order"];

/// Section order used when `section_order` is present but unusable.
pub const DEFAULT_SECTION_ORDER: &[&str] = &[
    "education",
    "experience",
    "projects",
    "skills",
    "certifications",
    "leadership",
];

const DEFAULT_LINK_ICON: &str = "faLink";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileLink {
    pub url: String,
    pub username: String,
}

impl ProfileLink {
    /// `None` unless the value is an object.
    fn from_json(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        Some(Self {
            url: field_text(map, "url"),
            username: field_text(map, "username"),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdditionalLink {
    pub icon: String,
    pub url: String,
    /// Falls back to the URL when absent.
    pub display_text: Option<String>,
}

impl AdditionalLink {
    fn from_json(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let icon = field_text(map, "icon");
        Some(Self {
            icon: if icon.is_empty() {
                DEFAULT_LINK_ICON.to_string()
            } else {
                icon
            },
            url: field_text(map, "url"),
            display_text: map
                .get("display_text")
                .filter(|v| !is_blank(v))
                .map(value_to_text),
        })
    }

    pub fn label(&self) -> &str {
        self.display_text.as_deref().unwrap_or(&self.url)
    }
}

/// Contact block rendered at the top of every resume, outside the section order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Heading {
    pub full_name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub linkedin: Option<ProfileLink>,
    pub github: Option<ProfileLink>,
    pub additional_links: Vec<AdditionalLink>,
}

impl Heading {
    /// Reads every field on its own: scalars become text, and a field of the
    /// wrong shape is left empty without touching its neighbours.
    pub fn from_json(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            if !value.is_null() {
                warn!("Resume heading is not an object ({value}), rendering it empty");
            }
            return Self::default();
        };

        Self {
            full_name: field_text(map, "full_name"),
            address: field_text(map, "address"),
            phone: field_text(map, "phone"),
            email: field_text(map, "email"),
            linkedin: map.get("linkedin").and_then(ProfileLink::from_json),
            github: map.get("github").and_then(ProfileLink::from_json),
            additional_links: map
                .get("additional_links")
                .and_then(Value::as_array)
                .map(|links| links.iter().filter_map(AdditionalLink::from_json).collect())
                .unwrap_or_default(),
        }
    }
}

fn field_text(map: &Map<String, Value>, key: &str) -> String {
    map.get(key).map(value_to_text).unwrap_or_default()
}

/// How the composer should lay out sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionOrder {
    /// No `section_order` key: fill the template's fixed placeholders.
    Fixed,
    /// Splice sections in this order into the template's section region.
    Dynamic(Vec<String>),
}

/// A user-authored resume record, classified once at the input boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeDocument {
    pub heading: Heading,
    pub order: SectionOrder,
    /// Named sections in input order; empty sections are dropped.
    sections: Vec<(String, SectionValue)>,
}

impl ResumeDocument {
    /// Builds a document from the raw JSON produced by the resume store.
    ///
    /// Only a non-object root is an error. Everything else degrades: a
    /// heading that is not an object becomes empty, unusable `section_order` falls back
    /// to [`DEFAULT_SECTION_ORDER`], empty sections are dropped.
    pub fn from_json(value: &Value) -> Result<Self, InputError> {
        let root = value.as_object().ok_or(InputError::NotAnObject)?;

        let heading = root
            .get("heading")
            .map(Heading::from_json)
            .unwrap_or_default();

        let order = match root.get("section_order") {
            None => SectionOrder::Fixed,
            Some(Value::Array(names)) => SectionOrder::Dynamic(
                names
                    .iter()
                    .filter_map(|n| n.as_str().map(str::to_string))
                    .collect(),
            ),
            Some(other) => {
                warn!("section_order is not a list ({other}), using the default order");
                SectionOrder::Dynamic(DEFAULT_SECTION_ORDER.iter().map(|s| s.to_string()).collect())
            }
        };

        let sections = root
            .iter()
            .filter(|(name, _)| !RESERVED_KEYS.contains(&name.as_str()))
            .filter_map(|(name, raw)| SectionValue::from_json(raw).map(|v| (name.clone(), v)))
            .collect();

        Ok(Self {
            heading,
            order,
            sections,
        })
    }

    pub fn section(&self, name: &str) -> Option<&SectionValue> {
        self.sections
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Sections named by a dynamic order that exist and are non-empty, in
    /// order. Reserved names and unknown names are skipped silently.
    pub fn ordered_sections<'a>(
        &'a self,
        order: &'a [String],
    ) -> impl Iterator<Item = (&'a str, &'a SectionValue)> + 'a {
        order
            .iter()
            .filter(|name| !RESERVED_KEYS.contains(&name.as_str()))
            .filter_map(move |name| self.section(name).map(|v| (name.as_str(), v)))
    }
}
