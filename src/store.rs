//! In-memory token store

use crate::api::types::TokenRecord;

/// Ordered collection of token records, the single shared mutable state
///
/// Owned by the controller and passed by reference to the orchestrator and
/// the renderer. Populated wholesale by a list fetch; individual records are
/// mutated in place during a batch; the next list fetch replaces everything.
#[derive(Debug, Default)]
pub struct TokenStore {
    tokens: Vec<TokenRecord>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    pub fn tokens(&self) -> &[TokenRecord] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get_mut(&mut self, id: i64) -> Option<&mut TokenRecord> {
        self.tokens.iter_mut().find(|t| t.id == id)
    }

    /// Replace the whole store and recompute the display order
    ///
    /// The order is a derived sort, recomputed here only; single-item
    /// mutations between reloads do not re-sort.
    pub fn replace_all(&mut self, mut tokens: Vec<TokenRecord>) {
        sort_tokens(&mut tokens);
        self.tokens = tokens;
    }
}

/// Display order: active first, then remaining quota descending (untracked
/// quota sorts lowest), then email ascending
pub fn sort_tokens(tokens: &mut [TokenRecord]) {
    tokens.sort_by(|a, b| {
        b.is_active
            .cmp(&a.is_active)
            .then_with(|| remaining_key(b).cmp(&remaining_key(a)))
            .then_with(|| a.email.cmp(&b.email))
    });
}

fn remaining_key(t: &TokenRecord) -> i64 {
    t.sora2_remaining_count.unwrap_or(-1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(id: i64, email: &str, active: bool, remaining: Option<i64>) -> TokenRecord {
        TokenRecord {
            id,
            email: email.to_string(),
            is_active: active,
            sora2_remaining_count: remaining,
            ..TokenRecord::default()
        }
    }

    #[test]
    fn test_active_first_beats_quota() {
        let mut tokens = vec![
            tok(1, "a@x", true, Some(5)),
            tok(2, "b@x", true, Some(10)),
            tok(3, "c@x", false, Some(999)),
        ];
        sort_tokens(&mut tokens);
        let ids: Vec<i64> = tokens.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_untracked_quota_sorts_lowest() {
        let mut tokens = vec![
            tok(1, "a@x", true, None),
            tok(2, "b@x", true, Some(0)),
            tok(3, "c@x", true, Some(2)),
        ];
        sort_tokens(&mut tokens);
        let ids: Vec<i64> = tokens.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_email_breaks_ties() {
        let mut tokens = vec![
            tok(1, "z@x", true, Some(3)),
            tok(2, "a@x", true, Some(3)),
        ];
        sort_tokens(&mut tokens);
        assert_eq!(tokens[0].id, 2);
    }

    #[test]
    fn test_replace_all_sorts() {
        let mut store = TokenStore::new();
        store.replace_all(vec![tok(1, "a@x", false, None), tok(2, "b@x", true, None)]);
        assert_eq!(store.tokens()[0].id, 2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_get_mut() {
        let mut store = TokenStore::new();
        store.replace_all(vec![tok(7, "a@x", true, Some(1))]);
        store.get_mut(7).unwrap().status_code = Some(401);
        assert_eq!(store.tokens()[0].status_code, Some(401));
        assert!(store.get_mut(8).is_none());
    }
}
