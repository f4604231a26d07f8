// src/profile/document.rs
// =============================================================================
// The parsed view of one WebID profile.
//
// Every property can carry several values, or none at all. Instead of using
// a Vec that might be empty, each property is an Option<NonEmpty<T>>:
// - None            = the document does not state this property
// - Some(non_empty) = at least one value is present
//
// That makes "has an OIDC issuer" a plain `is_some()` check.
// =============================================================================

/// A list that always holds at least one element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmpty<T> {
    head: T,
    tail: Vec<T>,
}

impl<T> NonEmpty<T> {
    pub fn new(head: T) -> Self {
        Self { head, tail: Vec::new() }
    }

    /// Returns None for an empty Vec
    pub fn from_vec(mut values: Vec<T>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let head = values.remove(0);
        Some(Self { head, tail: values })
    }

    pub fn push(&mut self, value: T) {
        self.tail.push(value);
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        std::iter::once(&self.head).chain(self.tail.iter())
    }

    pub fn into_vec(self) -> Vec<T> {
        let mut values = Vec::with_capacity(1 + self.tail.len());
        values.push(self.head);
        values.extend(self.tail);
        values
    }
}

impl<T> IntoIterator for NonEmpty<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

// Appends to an optional multi-value, creating it on first use
pub(crate) fn push_value<T>(slot: &mut Option<NonEmpty<T>>, value: T) {
    match slot {
        Some(values) => values.push(value),
        None => *slot = Some(NonEmpty::new(value)),
    }
}

/// What the crawler (and the exporter) know about one WebID
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDocument {
    /// The WebID these properties were read from
    pub subject: String,
    /// solid:oidcIssuer values
    pub oidc_issuers: Option<NonEmpty<String>>,
    /// foaf:knows values that are IRIs
    pub knows: Option<NonEmpty<String>>,
    /// foaf:name literals (export only)
    pub names: Option<NonEmpty<String>>,
    /// schema:name literals (export only)
    pub schema_names: Option<NonEmpty<String>>,
    /// pim:storage values (export only)
    pub storage: Option<NonEmpty<String>>,
    /// foaf:img values (export only)
    pub images: Option<NonEmpty<String>>,
}

impl ProfileDocument {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            ..Default::default()
        }
    }

    /// A profile is accepted iff it names at least one OIDC issuer
    pub fn is_accepted(&self) -> bool {
        self.oidc_issuers.is_some()
    }

    /// Iterates foaf:knows neighbors (empty when there are none)
    pub fn neighbors(&self) -> impl Iterator<Item = &String> {
        self.knows.iter().flat_map(|knows| knows.iter())
    }
}
