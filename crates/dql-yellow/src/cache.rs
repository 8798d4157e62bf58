//! Interning of green tokens and small green nodes.

use std::hash::{Hash, Hasher};

use rustc_hash::{FxHashMap, FxHasher};

use crate::{GreenElement, GreenNode, GreenToken, GreenTrivia, SyntaxKind};

/// Nodes with more children than this are not worth interning.
const MAX_CACHED_CHILDREN: usize = 3;

/// [`NodeCache::trim`] leaves caches of at most this many entries alone.
const MIN_TRIM_LEN: usize = 256;

/// Deduplicates identical tokens and small nodes.
///
/// Reusing one cache across parses of related texts makes unchanged
/// leaves of both trees the same allocation. Entries keep their elements
/// alive, so a long-lived cache has to be swept once the trees built with
/// it are gone.
#[derive(Default)]
pub struct NodeCache {
    tokens: FxHashMap<u64, Vec<GreenToken>>,
    nodes: FxHashMap<u64, Vec<GreenNode>>,
    len: usize,
    /// Entries left by the last sweep.
    swept_len: usize,
}

impl NodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(
        &mut self,
        leading: GreenTrivia,
        kind: SyntaxKind,
        text: &str,
        trailing: GreenTrivia,
    ) -> GreenToken {
        let hash = {
            let mut hasher = FxHasher::default();
            (&leading, kind, text, &trailing).hash(&mut hasher);
            hasher.finish()
        };

        let bucket = self.tokens.entry(hash).or_default();
        if let Some(token) = bucket.iter().find(|token| {
            token.kind() == kind
                && token.text() == text
                && *token.leading() == leading
                && *token.trailing() == trailing
        }) {
            return token.clone();
        }

        let token = GreenToken::new(leading, kind, text, trailing);
        bucket.push(token.clone());
        self.len += 1;
        token
    }

    pub fn node(&mut self, kind: SyntaxKind, children: Vec<GreenElement>) -> GreenNode {
        if children.len() > MAX_CACHED_CHILDREN {
            return GreenNode::new(kind, children);
        }

        let hash = {
            let mut hasher = FxHasher::default();
            kind.hash(&mut hasher);
            for child in &children {
                child.addr().hash(&mut hasher);
            }
            hasher.finish()
        };

        let bucket = self.nodes.entry(hash).or_default();
        if let Some(node) = bucket.iter().find(|node| {
            node.kind() == kind
                && node.children().len() == children.len()
                && node.children().iter().zip(&children).all(|(left, right)| left.ptr_eq(right))
        }) {
            return node.clone();
        }

        let node = GreenNode::new(kind, children);
        bucket.push(node.clone());
        self.len += 1;
        node
    }

    /// Number of distinct tokens and nodes currently interned.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every entry that only the cache still holds.
    ///
    /// Nodes go first: evicting a node releases its children, which may
    /// leave them unreferenced in turn.
    pub fn sweep(&mut self) {
        loop {
            let before = self.len;
            self.len -= retain_shared(&mut self.nodes, GreenNode::is_unique);
            if self.len == before {
                break;
            }
        }
        self.len -= retain_shared(&mut self.tokens, GreenToken::is_unique);
        self.swept_len = self.len;
    }

    /// Sweeps once the cache has doubled since the last sweep, keeping the
    /// amortized cost per parse proportional to the size of the live trees.
    pub fn trim(&mut self) {
        if self.len > 2 * self.swept_len.max(MIN_TRIM_LEN) {
            let before = self.len;
            self.sweep();
            tracing::trace!(before, after = self.len, "swept node cache");
        }
    }
}

/// Removes the entries for which `is_unique` holds, returning how many.
fn retain_shared<T>(map: &mut FxHashMap<u64, Vec<T>>, is_unique: fn(&T) -> bool) -> usize {
    let mut removed = 0;
    map.retain(|_, bucket| {
        let len = bucket.len();
        bucket.retain(|element| !is_unique(element));
        removed += len - bucket.len();
        !bucket.is_empty()
    });
    removed
}

#[cfg(test)]
mod tests {
    use super::NodeCache;
    use crate::{GreenElement, GreenTrivia, SyntaxKind};

    #[test]
    fn identical_tokens_share_allocation() {
        let mut cache = NodeCache::new();
        let first = cache.token(GreenTrivia::empty(), SyntaxKind::IDENT, "u", GreenTrivia::empty());
        let second = cache.token(GreenTrivia::empty(), SyntaxKind::IDENT, "u", GreenTrivia::empty());
        let other = cache.token(GreenTrivia::empty(), SyntaxKind::IDENT, "v", GreenTrivia::empty());

        assert!(first.ptr_eq(&second));
        assert!(!first.ptr_eq(&other));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn small_nodes_are_interned_by_child_identity() {
        let mut cache = NodeCache::new();
        let ident = cache.token(GreenTrivia::empty(), SyntaxKind::IDENT, "u", GreenTrivia::empty());

        let first = cache.node(SyntaxKind::IDENTIFICATION_VARIABLE, vec![GreenElement::from(ident.clone())]);
        let second = cache.node(SyntaxKind::IDENTIFICATION_VARIABLE, vec![GreenElement::from(ident)]);
        assert!(first.ptr_eq(&second));

        let big = vec![GreenElement::from(first.clone()); 4];
        let big_first = cache.node(SyntaxKind::SELECT_CLAUSE, big.clone());
        let big_second = cache.node(SyntaxKind::SELECT_CLAUSE, big);
        assert!(!big_first.ptr_eq(&big_second));
        assert_eq!(big_first, big_second);
    }

    #[test]
    fn sweep_keeps_only_referenced_entries() {
        let mut cache = NodeCache::new();
        let kept = cache.token(GreenTrivia::empty(), SyntaxKind::IDENT, "u", GreenTrivia::empty());
        let dropped = cache.token(GreenTrivia::empty(), SyntaxKind::IDENT, "v", GreenTrivia::empty());
        let variable = cache.node(SyntaxKind::IDENTIFICATION_VARIABLE, vec![GreenElement::from(dropped)]);
        drop(variable);
        assert_eq!(cache.len(), 3);

        cache.sweep();
        assert_eq!(cache.len(), 1);

        let again = cache.token(GreenTrivia::empty(), SyntaxKind::IDENT, "u", GreenTrivia::empty());
        assert!(kept.ptr_eq(&again));
        assert_eq!(cache.len(), 1);

        drop((kept, again));
        cache.sweep();
        assert!(cache.is_empty());
    }

    #[test]
    fn trim_waits_for_growth() {
        let mut cache = NodeCache::new();
        for i in 0..100 {
            cache.token(GreenTrivia::empty(), SyntaxKind::INT_NUMBER, &i.to_string(), GreenTrivia::empty());
        }
        cache.trim();
        assert_eq!(cache.len(), 100);

        for i in 100..1000 {
            cache.token(GreenTrivia::empty(), SyntaxKind::INT_NUMBER, &i.to_string(), GreenTrivia::empty());
        }
        cache.trim();
        assert!(cache.is_empty());
    }
}
