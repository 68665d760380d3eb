//! Namespace to prefix bindings and IRI compaction.

use crate::error::InvalidNamespaceError;
use oxiri::Iri;

/// Maintains the namespace prefix bindings of a document and compacts IRIs into prefixed names.
///
/// A prefix always points to the namespace it was bound to last.
/// If a namespace is bound to several prefixes, only the one registered last is used.
/// Only the bindings that actually compacted an IRI are written in the Turtle header.
///
/// ```
/// use turtlefold::PrefixAllocator;
///
/// let mut prefixes = PrefixAllocator::new();
/// prefixes.add_namespace("old", "http://schema.org/")?;
/// prefixes.add_namespace("schema", "http://schema.org/")?;
/// assert_eq!(
///     prefixes.resolve("http://schema.org/Person"),
///     Some(("schema", "Person"))
/// );
/// assert_eq!(prefixes.resolve("http://example.com/"), None);
/// assert_eq!(
///     prefixes.used_bindings().collect::<Vec<_>>(),
///     [("schema", "http://schema.org/")]
/// );
/// # Result::<_,turtlefold::InvalidNamespaceError>::Ok(())
/// ```
#[derive(Debug, Default, Clone)]
pub struct PrefixAllocator {
    bindings: Vec<Binding>,
    next_sequence: u64,
}

#[derive(Debug, Clone)]
struct Binding {
    prefix: String,
    namespace: String,
    /// Registration counter, the highest one wins for a given namespace.
    sequence: u64,
    effective: bool,
    used: bool,
}

/// What happened to the previous bindings when registering a new one.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Registration {
    /// Namespace the prefix was pointing to before.
    pub(crate) rebound_from: Option<String>,
    /// Prefixes that are no longer usable for the namespace.
    pub(crate) shadowed: Vec<String>,
}

impl PrefixAllocator {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `prefix` to `namespace`.
    ///
    /// The prefix must be a valid Turtle prefix name (it might be empty) and the namespace a valid IRI.
    pub fn add_namespace(
        &mut self,
        prefix: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Result<(), InvalidNamespaceError> {
        self.register(prefix.into(), namespace.into()).map(|_| ())
    }

    pub(crate) fn register(
        &mut self,
        prefix: String,
        namespace: String,
    ) -> Result<Registration, InvalidNamespaceError> {
        if !is_valid_prefix_name(&prefix) {
            return Err(InvalidNamespaceError::Prefix(prefix));
        }
        if let Err(error) = Iri::parse(namespace.as_str()) {
            return Err(InvalidNamespaceError::Iri { prefix, error });
        }
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        let mut registration = Registration::default();
        if let Some(binding) = self.bindings.iter_mut().find(|b| b.prefix == prefix) {
            if binding.namespace != namespace {
                registration.rebound_from =
                    Some(std::mem::replace(&mut binding.namespace, namespace.clone()));
                binding.used = false;
            }
            binding.sequence = sequence;
            binding.effective = true;
        } else {
            self.bindings.push(Binding {
                prefix,
                namespace: namespace.clone(),
                sequence,
                effective: true,
                used: false,
            });
        }
        for binding in &mut self.bindings {
            if binding.namespace == namespace && binding.sequence != sequence && binding.effective
            {
                binding.effective = false;
                binding.used = false;
                registration.shadowed.push(binding.prefix.clone());
            }
        }
        if let Some(previous) = &registration.rebound_from {
            self.restore_effective(previous);
        }
        Ok(registration)
    }

    /// Makes the most recent binding of `namespace` effective again after its prefix moved away.
    fn restore_effective(&mut self, namespace: &str) {
        if let Some(binding) = self
            .bindings
            .iter_mut()
            .filter(|b| b.namespace == namespace)
            .max_by_key(|b| b.sequence)
        {
            binding.effective = true;
        }
    }

    /// Compacts `iri` into a `(prefix, local name)` pair if an effective binding allows it.
    ///
    /// The longest matching namespace wins. The binding is then marked as used.
    pub fn resolve<'a>(&'a mut self, iri: &'a str) -> Option<(&'a str, &'a str)> {
        let mut best: Option<usize> = None;
        for (i, binding) in self.bindings.iter().enumerate() {
            if !binding.effective {
                continue;
            }
            let Some(local) = iri.strip_prefix(binding.namespace.as_str()) else {
                continue;
            };
            if !is_valid_local_name(local) {
                continue;
            }
            if best.is_none_or(|b| self.bindings[b].namespace.len() < binding.namespace.len()) {
                best = Some(i);
            }
        }
        let binding = &mut self.bindings[best?];
        binding.used = true;
        let local = &iri[binding.namespace.len()..];
        Some((binding.prefix.as_str(), local))
    }

    /// The `(prefix, namespace)` pairs used by [`resolve`](Self::resolve), sorted by prefix.
    pub fn used_bindings(&self) -> impl Iterator<Item = (&str, &str)> {
        let mut used = self.bindings.iter().filter(|b| b.used).collect::<Vec<_>>();
        used.sort_by(|a, b| a.prefix.cmp(&b.prefix));
        used.into_iter()
            .map(|b| (b.prefix.as_str(), b.namespace.as_str()))
    }

    /// The `(prefix, namespace)` pairs usable for compaction, in declaration order.
    pub fn effective_bindings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings
            .iter()
            .filter(|b| b.effective)
            .map(|b| (b.prefix.as_str(), b.namespace.as_str()))
    }
}

// [139s]  PNAME_NS  ::=  PN_PREFIX? ':'
// [167s]  PN_PREFIX  ::=  PN_CHARS_BASE ((PN_CHARS | '.')* PN_CHARS)?
pub(crate) fn is_valid_prefix_name(prefix: &str) -> bool {
    let mut chars = prefix.chars();
    let Some(first) = chars.next() else {
        return true;
    };
    is_pn_chars_base(first) && is_pn_chars_tail(chars.as_str())
}

/// Local names are restricted to the common subset of XML NCNames and Turtle PN_LOCAL.
pub(crate) fn is_valid_local_name(local: &str) -> bool {
    let mut chars = local.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    is_pn_chars_u(first) && is_pn_chars_tail(chars.as_str())
}

// (PN_CHARS | '.')* PN_CHARS
fn is_pn_chars_tail(tail: &str) -> bool {
    tail.chars().all(|c| is_pn_chars(c) || c == '.') && !tail.ends_with('.')
}

// [163s]  PN_CHARS_BASE
fn is_pn_chars_base(c: char) -> bool {
    matches!(c,
    'A'..='Z'
    | 'a'..='z'
    | '\u{00C0}'..='\u{00D6}'
    | '\u{00D8}'..='\u{00F6}'
    | '\u{00F8}'..='\u{02FF}'
    | '\u{0370}'..='\u{037D}'
    | '\u{037F}'..='\u{1FFF}'
    | '\u{200C}'..='\u{200D}'
    | '\u{2070}'..='\u{218F}'
    | '\u{2C00}'..='\u{2FEF}'
    | '\u{3001}'..='\u{D7FF}'
    | '\u{F900}'..='\u{FDCF}'
    | '\u{FDF0}'..='\u{FFFD}'
    | '\u{10000}'..='\u{EFFFF}')
}

// [164s]  PN_CHARS_U  ::=  PN_CHARS_BASE | '_'
fn is_pn_chars_u(c: char) -> bool {
    is_pn_chars_base(c) || c == '_'
}

// [166s]  PN_CHARS  ::=  PN_CHARS_U | '-' | [0-9] | #x00B7 | [#x0300-#x036F] | [#x203F-#x2040]
fn is_pn_chars(c: char) -> bool {
    is_pn_chars_u(c)
        || matches!(c, '-' | '0'..='9' | '\u{00B7}' | '\u{0300}'..='\u{036F}' | '\u{203F}'..='\u{2040}')
}
