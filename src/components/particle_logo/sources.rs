//! Image fallback chain.

use log::{info, warn};

/// Ordered image URLs, consumed one load attempt at a time.
#[derive(Clone, Debug)]
pub struct SourceChain {
	urls: Vec<String>,
	next: usize,
}

impl SourceChain {
	/// Chain over `urls`, first one tried first.
	pub fn new(urls: Vec<String>) -> Self {
		Self { urls, next: 0 }
	}

	/// URL for the next attempt, or `None` once every source has failed.
	///
	/// Logs the fallback on every attempt after the first, and a warning the
	/// first time the chain runs dry.
	pub fn next_url(&mut self) -> Option<&str> {
		if self.next > self.urls.len() {
			return None;
		}
		let idx = self.next;
		self.next += 1;
		match self.urls.get(idx) {
			Some(url) => {
				if idx > 0 {
					info!("particle-logo: image source failed, trying {url}");
				}
				Some(url.as_str())
			}
			None => {
				warn!("particle-logo: all {} image sources failed", self.urls.len());
				None
			}
		}
	}

	/// Load attempts handed out so far.
	pub fn attempts(&self) -> usize {
		self.next.min(self.urls.len())
	}

	/// Whether every URL has been handed out.
	pub fn is_exhausted(&self) -> bool {
		self.next >= self.urls.len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn chain() -> SourceChain {
		SourceChain::new(vec!["a.png".into(), "/logo.png".into(), "demo.jpg".into()])
	}

	#[test]
	fn sources_are_tried_in_order() {
		let mut chain = chain();
		assert_eq!(chain.next_url(), Some("a.png"));
		assert_eq!(chain.next_url(), Some("/logo.png"));
		assert!(!chain.is_exhausted());
		assert_eq!(chain.next_url(), Some("demo.jpg"));
		assert!(chain.is_exhausted());
		assert_eq!(chain.attempts(), 3);
	}

	#[test]
	fn exhausted_chain_stays_exhausted() {
		let mut chain = chain();
		for _ in 0..3 {
			chain.next_url();
		}
		assert_eq!(chain.next_url(), None);
		assert_eq!(chain.next_url(), None);
		assert_eq!(chain.attempts(), 3);
	}

	#[test]
	fn empty_chain_yields_nothing() {
		let mut chain = SourceChain::new(Vec::new());
		assert!(chain.is_exhausted());
		assert_eq!(chain.next_url(), None);
	}
}
