//! Crawl frontier and request pacing
//!
//! This module handles:
//! - FIFO queue management for URLs to crawl
//! - Visited and scheduled sets, so each URL is queued and fetched once
//! - A fixed politeness delay between successive requests
//!
//! A [`CrawlState`] belongs to exactly one traversal call and is dropped
//! when that call returns.

use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::time::{Duration, Instant};

/// A URL waiting to be fetched, with its distance from the seeds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontierEntry {
    pub url: String,
    pub depth: u32,
}

impl FrontierEntry {
    pub fn new(url: impl Into<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            depth,
        }
    }
}

/// Queue plus bookkeeping for one traversal
#[derive(Debug, Default)]
pub struct CrawlState {
    /// URLs that have been dequeued and fetched (successfully or not)
    visited: HashSet<String>,

    /// URLs that have ever been queued
    scheduled: HashSet<String>,

    /// FIFO of entries not yet fetched
    queue: VecDeque<FrontierEntry>,
}

impl CrawlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an entry unless its URL was already queued or visited
    ///
    /// Returns true if the entry was added.
    pub fn schedule(&mut self, entry: FrontierEntry) -> bool {
        if self.visited.contains(&entry.url) || !self.scheduled.insert(entry.url.clone()) {
            return false;
        }
        self.queue.push_back(entry);
        true
    }

    /// Pops the next entry that has not been visited yet
    pub fn next_entry(&mut self) -> Option<FrontierEntry> {
        while let Some(entry) = self.queue.pop_front() {
            if !self.visited.contains(&entry.url) {
                return Some(entry);
            }
        }
        None
    }

    /// Records that a URL has been fetched; returns false if it already was
    pub fn mark_visited(&mut self, url: &str) -> bool {
        self.visited.insert(url.to_string())
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// True once the queue is drained or `max_pages` URLs have been visited
    pub fn is_done(&self, max_pages: usize) -> bool {
        self.queue.is_empty() || self.visited.len() >= max_pages
    }
}

/// Enforces a minimum gap between successive requests
#[derive(Debug)]
pub struct Politeness {
    delay: Duration,
    last_request: Option<Instant>,
}

impl Politeness {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_request: None,
        }
    }

    /// Sleeps until `delay` has passed since the previous request
    ///
    /// The first call returns immediately.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.delay {
                tokio::time::sleep(self.delay - elapsed).await;
            }
        }
        self.last_request = Some(Instant::now());
    }
}
