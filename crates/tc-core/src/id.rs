use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for vertex IDs. Drivers reuse the same handful
/// of names ("A", "B", "v1") across thousands of commands.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// A lightweight, interned identifier for a graph vertex.
/// Internally a 4-byte `Spur` index.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexId(Spur);

impl VertexId {
    /// Intern a string as a VertexId, or return the existing one.
    pub fn intern(s: &str) -> Self {
        VertexId(INTERNER.get_or_intern(s))
    }

    /// The ID for `s` if it was ever interned. Never grows the interner.
    pub fn lookup(s: &str) -> Option<Self> {
        INTERNER.get(s).map(VertexId)
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }
}

impl fmt::Debug for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for VertexId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for VertexId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(VertexId::intern(&s))
    }
}

/// Direction-sensitive identity of an edge: `A|B` and `B|A` are distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeKey {
    pub from: VertexId,
    pub to: VertexId,
}

impl EdgeKey {
    pub fn new(from: VertexId, to: VertexId) -> Self {
        Self { from, to }
    }

    /// The key with its endpoints swapped.
    pub fn reversed(self) -> Self {
        Self {
            from: self.to,
            to: self.from,
        }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = VertexId::intern("v1");
        let b = VertexId::intern("v1");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "v1");
    }

    #[test]
    fn lookup_does_not_intern() {
        assert_eq!(VertexId::lookup("never-interned-name"), None);
        assert_eq!(VertexId::lookup("never-interned-name"), None);
        let id = VertexId::intern("looked-up");
        assert_eq!(VertexId::lookup("looked-up"), Some(id));
    }

    #[test]
    fn edge_keys_are_ordered() {
        let a = VertexId::intern("A");
        let b = VertexId::intern("B");
        let ab = EdgeKey::new(a, b);
        assert_ne!(ab, ab.reversed());
        assert_eq!(ab.to_string(), "A|B");
        assert_eq!(ab.reversed().to_string(), "B|A");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = VertexId::intern("hub");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"hub\"");
        let back: VertexId = serde_json::from_str("\"hub\"").unwrap();
        assert_eq!(back, id);
    }
}
