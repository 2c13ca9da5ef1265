//! Query-to-path match scoring.
//!
//! Each matcher returns a score in (0, 1] for how well a search term fits a
//! stored path, or `None` for no match. The database consults a fixed
//! priority stack of matchers and takes the best score per path.

use std::path::Path;

pub trait Matcher {
    fn matches(&self, input: &str, search: &str) -> Option<f64>;
}

pub struct ExactMatcher;

impl Matcher for ExactMatcher {
    fn matches(&self, input: &str, search: &str) -> Option<f64> {
        if input == search { Some(1.0) } else { None }
    }
}

pub struct SubstringMatcher;

impl Matcher for SubstringMatcher {
    fn matches(&self, input: &str, search: &str) -> Option<f64> {
        input.find(search).map(|offset| {
            // A match at the very beginning is a better match.
            let base = if offset == 0 { 1.0 } else { 0.8 };
            base * search.len() as f64 / input.len() as f64
        })
    }
}

/// Applies a base matcher to each path component, attenuating components
/// linearly the further they are from the rightmost one.
pub struct PathComponentMatcher<'a>(&'a dyn Matcher);

impl<'a> PathComponentMatcher<'a> {
    pub fn new(base: &'a dyn Matcher) -> Self {
        PathComponentMatcher(base)
    }
}

impl Matcher for PathComponentMatcher<'_> {
    fn matches(&self, input: &str, search: &str) -> Option<f64> {
        let path = Path::new(input);
        let num_components = path.components().count();
        if num_components == 0 {
            return None;
        }
        let mut weight = 0.9;
        let weight_step = (weight - 0.2) / num_components as f64;
        let mut best = None;
        for component in path.components().rev() {
            // Components that aren't valid UTF-8 can't match a &str search.
            if let Some(s) = component.as_os_str().to_str() {
                if let Some(v) = self.0.matches(s, search) {
                    let attenuated = v * weight;
                    best = match best {
                        Some(existing) if existing >= attenuated => Some(existing),
                        _ => Some(attenuated),
                    };
                }
            }
            weight -= weight_step;
        }
        best
    }
}

/// Runs a base matcher over transformed copies of the input and search
/// strings, attenuating the result.
pub struct TransformedMatcher<'a> {
    input_transformation: fn(&str) -> String,
    search_transformation: fn(&str) -> String,
    matcher: &'a dyn Matcher,
    attenuation: f64,
}

pub type CaseInsensitiveMatcher<'a> = TransformedMatcher<'a>;

impl<'a> CaseInsensitiveMatcher<'a> {
    pub fn new(base: &'a dyn Matcher) -> Self {
        fn lowercase(input: &str) -> String {
            input.to_lowercase()
        }
        TransformedMatcher {
            input_transformation: lowercase,
            search_transformation: lowercase,
            matcher: base,
            attenuation: 0.7,
        }
    }
}

impl Matcher for TransformedMatcher<'_> {
    fn matches(&self, input: &str, search: &str) -> Option<f64> {
        self.matcher
            .matches(
                &(self.input_transformation)(input),
                &(self.search_transformation)(search),
            )
            .map(|score| score * self.attenuation)
    }
}
