//! Retry/dead-letter topic topology.

/// Topic ladder for bounded retries: one primary topic, a fixed number of
/// numbered retry topics and one dead-letter topic.
///
/// Names follow the convention `{base}`, `{base}-retry-0` ..
/// `{base}-retry-{N-1}`, `{base}-retry-dlt`. The ladder is an explicit
/// attempt table: attempt 0 is the primary topic, attempts 1..=N are the
/// retry topics, anything beyond lands in the dead-letter topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryTopology {
    base: String,
    retry_count: u32,
}

impl RetryTopology {
    /// Creates a topology with the given base topic and retry-topic count.
    pub fn new(base: impl Into<String>, retry_count: u32) -> Self {
        Self {
            base: base.into(),
            retry_count,
        }
    }

    /// Returns the primary topic name.
    pub fn primary(&self) -> &str {
        &self.base
    }

    /// Returns the name of the `n`-th retry topic.
    pub fn retry_topic(&self, n: u32) -> String {
        format!("{}-retry-{n}", self.base)
    }

    /// Returns the dead-letter topic name.
    pub fn dead_letter(&self) -> String {
        format!("{}-retry-dlt", self.base)
    }

    /// Returns the number of retry topics.
    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    /// Maps an attempt number to the topic it is delivered on.
    pub fn topic_for_attempt(&self, attempt: u32) -> String {
        match attempt {
            0 => self.base.clone(),
            n if n <= self.retry_count => self.retry_topic(n - 1),
            _ => self.dead_letter(),
        }
    }

    /// Maps a topic name back to its attempt number. `None` for topics
    /// outside this topology.
    pub fn attempt_of(&self, topic: &str) -> Option<u32> {
        if topic == self.base {
            return Some(0);
        }
        if topic == self.dead_letter() {
            return Some(self.retry_count + 1);
        }
        let suffix = topic.strip_prefix(&format!("{}-retry-", self.base))?;
        let n: u32 = suffix.parse().ok()?;
        (n < self.retry_count).then_some(n + 1)
    }

    /// Returns the next hop for a failed delivery on `topic`.
    ///
    /// `None` means the topic is the dead-letter topic (the ladder is
    /// exhausted) or the topic does not belong to this topology.
    pub fn next_hop(&self, topic: &str) -> Option<String> {
        let attempt = self.attempt_of(topic)?;
        if attempt > self.retry_count {
            return None;
        }
        Some(self.topic_for_attempt(attempt + 1))
    }

    /// Returns true if `topic` is the dead-letter topic.
    pub fn is_dead_letter(&self, topic: &str) -> bool {
        topic == self.dead_letter()
    }

    /// Returns every topic in ladder order: primary, retries, dead-letter.
    pub fn all_topics(&self) -> Vec<String> {
        let mut topics = Vec::with_capacity(self.retry_count as usize + 2);
        topics.push(self.base.clone());
        for n in 0..self.retry_count {
            topics.push(self.retry_topic(n));
        }
        topics.push(self.dead_letter());
        topics
    }
}
