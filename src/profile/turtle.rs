// src/profile/turtle.rs
// =============================================================================
// Parses a Turtle document into a ProfileDocument.
//
// How it works:
// 1. Hand the body to oxttl with the response URL as the base IRI, so
//    relative references like <#me> or <../card> resolve correctly
// 2. Walk every triple, keeping only those whose subject is the WebID
// 3. Sort the objects of the predicates we care about into typed slots
//
// Shape rules:
// - oidcIssuer, knows and storage must be IRIs, anything else is skipped
// - names must be literals
// - foaf:img is all-or-nothing: one non-IRI image drops the property
// =============================================================================

use oxrdf::{Subject, Term, Triple};
use oxttl::TurtleParser;

use super::document::{push_value, ProfileDocument};
use crate::error::ParseError;

/// Predicate IRIs read from WebID profiles
pub mod vocab {
    pub const FOAF_NAME: &str = "http://xmlns.com/foaf/0.1/name";
    pub const FOAF_KNOWS: &str = "http://xmlns.com/foaf/0.1/knows";
    pub const FOAF_IMG: &str = "http://xmlns.com/foaf/0.1/img";
    pub const SCHEMA_NAME: &str = "https://schema.org/name";
    pub const SOLID_OIDC_ISSUER: &str = "http://www.w3.org/ns/solid/terms#oidcIssuer";
    pub const PIM_STORAGE: &str = "http://www.w3.org/ns/pim/space#storage";
}

// Parses `body` and reads the properties of `subject`
//
// Parameters:
//   body: the raw Turtle text
//   base_iri: where the document actually came from (after redirects)
//   subject: the WebID whose properties we want
pub fn parse_profile(body: &str, base_iri: &str, subject: &str) -> Result<ProfileDocument, ParseError> {
    let parser = TurtleParser::new()
        .with_base_iri(base_iri)
        .map_err(|e| ParseError::InvalidBase {
            iri: base_iri.to_string(),
            reason: e.to_string(),
        })?;

    let mut profile = ProfileDocument::new(subject);
    let mut image_values: Vec<String> = Vec::new();
    let mut image_is_iri = true;

    for triple in parser.for_reader(body.as_bytes()) {
        let triple = triple.map_err(|e| ParseError::Syntax(e.to_string()))?;

        if !is_about(&triple, subject) {
            continue;
        }

        match triple.predicate.as_str() {
            vocab::SOLID_OIDC_ISSUER => {
                if let Some(iri) = iri_of(&triple.object) {
                    push_value(&mut profile.oidc_issuers, iri);
                }
            }
            vocab::FOAF_KNOWS => {
                // Blank-node friends have no identifier to crawl
                if let Some(iri) = iri_of(&triple.object) {
                    push_value(&mut profile.knows, iri);
                }
            }
            vocab::PIM_STORAGE => {
                if let Some(iri) = iri_of(&triple.object) {
                    push_value(&mut profile.storage, iri);
                }
            }
            vocab::FOAF_NAME => {
                if let Some(text) = literal_of(&triple.object) {
                    push_value(&mut profile.names, text);
                }
            }
            vocab::SCHEMA_NAME => {
                if let Some(text) = literal_of(&triple.object) {
                    push_value(&mut profile.schema_names, text);
                }
            }
            vocab::FOAF_IMG => match iri_of(&triple.object) {
                Some(iri) => image_values.push(iri),
                None => image_is_iri = false,
            },
            _ => {}
        }
    }

    if image_is_iri {
        profile.images = super::NonEmpty::from_vec(image_values);
    }

    Ok(profile)
}

fn is_about(triple: &Triple, subject: &str) -> bool {
    match &triple.subject {
        Subject::NamedNode(node) => node.as_str() == subject,
        _ => false,
    }
}

fn iri_of(term: &Term) -> Option<String> {
    match term {
        Term::NamedNode(node) => Some(node.as_str().to_string()),
        _ => None,
    }
}

fn literal_of(term: &Term) -> Option<String> {
    match term {
        Term::Literal(literal) => Some(literal.value().to_string()),
        _ => None,
    }
}
