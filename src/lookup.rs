//! Lookup services: vocalization/transliteration and dictionary definitions.

use crate::error::{ClozeError, Result};
use crate::markup::Markup;
use crate::model::RawDefinition;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Answer of the transliteration service for a piece of Arabic text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transliteration {
    #[serde(rename = "vowels")]
    pub vocalization: Markup,
    pub transliteration: Markup,
}

/// The services a word is resolved against.
///
/// Calls are blocking and are not retried; an `Err` abandons the word being
/// processed.
pub trait LookupClient {
    fn transliterate(&self, text: &str) -> Result<Transliteration>;

    /// Definitions of `headword`, most relevant first.
    fn lookup_definitions(&self, headword: &str) -> Result<Vec<RawDefinition>>;
}

impl<C: LookupClient + ?Sized> LookupClient for &C {
    fn transliterate(&self, text: &str) -> Result<Transliteration> {
        (**self).transliterate(text)
    }

    fn lookup_definitions(&self, headword: &str) -> Result<Vec<RawDefinition>> {
        (**self).lookup_definitions(headword)
    }
}

/// Offline client answering from a JSON file of saved service responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonLookupClient {
    /// Keyed by the exact text sent for transliteration.
    #[serde(default)]
    pub transliterations: HashMap<String, Transliteration>,
    #[serde(default)]
    pub definitions: HashMap<String, Vec<RawDefinition>>,
}

impl JsonLookupClient {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let client: JsonLookupClient = serde_json::from_reader(reader)?;
        debug!(
            "Loaded {} transliterations and {} definition lists from {}",
            client.transliterations.len(),
            client.definitions.len(),
            path.display()
        );
        Ok(client)
    }
}

impl LookupClient for JsonLookupClient {
    fn transliterate(&self, text: &str) -> Result<Transliteration> {
        self.transliterations
            .get(text)
            .cloned()
            .ok_or_else(|| ClozeError::LookupMissing {
                kind: "transliteration",
                key: text.to_string(),
            })
    }

    fn lookup_definitions(&self, headword: &str) -> Result<Vec<RawDefinition>> {
        self.definitions
            .get(headword)
            .cloned()
            .ok_or_else(|| ClozeError::LookupMissing {
                kind: "definitions",
                key: headword.to_string(),
            })
    }
}
