//! Fallback strategies used by choice fields when a token is not an exact member.

use std::fmt;

/// Picks a candidate for a token that matched none of them exactly.
pub trait Matcher: fmt::Debug + Send + Sync {
    /// Index into `candidates` of the accepted match, or `None` to reject the token.
    fn find(&self, token: &str, candidates: &[String]) -> Option<usize>;
}

/// Accepts a token that is a case-insensitive substring of exactly one candidate.
#[derive(Debug, Default, Clone, Copy)]
pub struct UniqueSubstring;

impl Matcher for UniqueSubstring {
    fn find(&self, token: &str, candidates: &[String]) -> Option<usize> {
        let token = token.to_lowercase();
        let mut found = None;

        for (i, candidate) in candidates.iter().enumerate() {
            if candidate.to_lowercase().contains(&token) {
                if found.is_some() {
                    return None;
                }
                found = Some(i);
            }
        }

        found
    }
}

/// Accepts a token equal to exactly one candidate when compared case-insensitively.
#[derive(Debug, Default, Clone, Copy)]
pub struct CaseInsensitive;

impl Matcher for CaseInsensitive {
    fn find(&self, token: &str, candidates: &[String]) -> Option<usize> {
        let token = token.to_lowercase();
        let mut matches = candidates
            .iter()
            .enumerate()
            .filter(|(_, candidate)| candidate.to_lowercase() == token);
        let (i, _) = matches.next()?;
        matches.next().is_none().then_some(i)
    }
}
