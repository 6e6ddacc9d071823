use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::{Classifier, ClassifyError};
use crate::model::Classification;

/// A scripted classifier for tests. Replies in order and records every
/// description it was asked about.
pub struct MockClassifier {
    replies: Mutex<VecDeque<Result<Classification, ClassifyError>>>,
    seen: Mutex<Vec<String>>,
}

impl MockClassifier {
    pub fn new(replies: Vec<Classification>) -> Self {
        Self::scripted(replies.into_iter().map(Ok).collect())
    }

    pub fn scripted(replies: Vec<Result<Classification, ClassifyError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Descriptions received so far, in call order.
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn classify(&self, text: &str) -> Result<Classification, ClassifyError> {
        let call = {
            let mut seen = self.seen.lock().unwrap();
            seen.push(text.to_string());
            seen.len()
        };
        self.replies.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(ClassifyError::Malformed(format!(
                "MockClassifier: no more replies (called {call} times)"
            )))
        })
    }
}
