use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use instascore_core::{FetchError, Post, ProfileSnapshot, ProfileSource, RankedAccount};

use crate::throttle::Throttle;

/// Serves canned snapshots and records every username it was asked for.
/// Unknown usernames are `NotFound`.
#[derive(Default)]
pub(crate) struct FakeSource {
    profiles: HashMap<String, Result<ProfileSnapshot, FetchError>>,
    calls: Mutex<Vec<String>>,
}

impl FakeSource {
    pub(crate) fn with_profile(mut self, snapshot: ProfileSnapshot) -> Self {
        self.profiles
            .insert(snapshot.username.clone(), Ok(snapshot));
        self
    }

    pub(crate) fn with_error(mut self, username: &str, err: FetchError) -> Self {
        self.profiles.insert(username.to_owned(), Err(err));
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProfileSource for FakeSource {
    async fn fetch_profile(&self, username: &str) -> Result<ProfileSnapshot, FetchError> {
        self.calls.lock().unwrap().push(username.to_owned());
        self.profiles
            .get(username)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::NotFound(username.to_owned())))
    }
}

#[derive(Default)]
pub(crate) struct CountingThrottle(AtomicUsize);

impl CountingThrottle {
    pub(crate) fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Throttle for CountingThrottle {
    async fn wait(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

pub(crate) fn snapshot(username: &str, followers: u64, counts: &[(u64, u64)]) -> ProfileSnapshot {
    let posts = counts
        .iter()
        .enumerate()
        .map(|(i, &(likes, comments))| {
            let day = u32::try_from(i).unwrap() + 1;
            let at = Utc.with_ymd_and_hms(2024, 6, day, 8, 0, 0).unwrap();
            Post::new(format!("{username}-{i}"), likes, comments, at)
        })
        .collect();
    ProfileSnapshot::new(username, followers, posts)
}

pub(crate) fn ranked(names: &[&str]) -> Vec<RankedAccount> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| RankedAccount {
            rank: u32::try_from(i).unwrap() + 1,
            username: (*name).to_owned(),
            account_name: name.to_uppercase(),
        })
        .collect()
}
