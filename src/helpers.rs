//! Named text helpers injected into the rendering engine.

use indexmap::IndexMap;

/// A helper transforms rendered text, e.g. `{{ subject|rfc1342 }}`.
pub type TextHelper = fn(&str) -> String;

/// Registry of helpers, keyed by the name templates use.
#[derive(Debug, Clone)]
pub struct Helpers {
    helpers: IndexMap<&'static str, TextHelper>,
}

impl Helpers {
    /// An empty registry.
    pub fn empty() -> Self {
        Self { helpers: IndexMap::new() }
    }

    pub fn register(&mut self, name: &'static str, helper: TextHelper) -> &mut Self {
        self.helpers.insert(name, helper);
        self
    }

    pub fn get(&self, name: &str) -> Option<TextHelper> {
        self.helpers.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, TextHelper)> + '_ {
        self.helpers.iter().map(|(name, helper)| (*name, *helper))
    }
}

impl Default for Helpers {
    /// Registry with the built-in `rfc1342` helper.
    fn default() -> Self {
        let mut helpers = Self::empty();
        helpers.register("rfc1342", rfc1342);
        helpers
    }
}

/// Encodes text as an RFC 1342/2047 "Q" encoded-word for mail headers.
///
/// Spaces become `_`; `=`, `?`, `_` and any byte outside printable ASCII are
/// written as `=XX`.
pub fn rfc1342(text: &str) -> String {
    let mut encoded = String::from("=?UTF-8?Q?");
    for byte in text.bytes() {
        match byte {
            b' ' => encoded.push('_'),
            b'=' | b'?' | b'_' => encoded.push_str(&format!("={byte:02X}")),
            33..=126 => encoded.push(byte as char),
            _ => encoded.push_str(&format!("={byte:02X}")),
        }
    }
    encoded.push_str("?=");
    encoded
}
