//! Replays recorded interactions from a cassette.

use std::collections::HashMap;

use super::format::{Cassette, Interaction};

/// One replay stream: all interactions for a port/method pair.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct StreamKey {
    port: String,
    method: String,
}

/// Serves a cassette's interactions back in order, independently per
/// port/method pair, so interleaving between ports need not match exactly.
pub struct CassetteReplayer {
    streams: HashMap<StreamKey, Vec<Interaction>>,
    cursors: HashMap<StreamKey, usize>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut streams: HashMap<StreamKey, Vec<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            let key =
                StreamKey { port: interaction.port.clone(), method: interaction.method.clone() };
            streams.entry(key).or_default().push(interaction.clone());
        }
        let cursors = streams.keys().map(|k| (k.clone(), 0)).collect();
        Self { streams, cursors }
    }

    /// Interactions not yet served, across all streams.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.streams
            .iter()
            .map(|(key, stream)| stream.len() - self.cursors.get(key).copied().unwrap_or(0))
            .sum()
    }

    /// Return the next interaction for the given port and method.
    ///
    /// # Panics
    ///
    /// Panics if the cassette has no (more) interactions for the pair. A
    /// replayed run that asks for something the recording never did has
    /// diverged, and continuing would only produce misleading results.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> &Interaction {
        let key = StreamKey { port: port.to_string(), method: method.to_string() };

        let Some(stream) = self.streams.get(&key) else {
            let mut available: Vec<String> =
                self.streams.keys().map(|k| format!("{}::{}", k.port, k.method)).collect();
            available.sort();
            panic!(
                "Cassette exhausted: no interactions recorded for port={port:?} method={method:?}. \
                 Available port::method pairs: [{}]",
                available.join(", ")
            );
        };

        let cursor = self.cursors.entry(key).or_insert(0);
        assert!(
            *cursor < stream.len(),
            "Cassette exhausted: all {count} interactions for port={port:?} method={method:?} \
             have been consumed. Last interaction was seq={last_seq}.",
            count = stream.len(),
            last_seq = stream.last().map_or(0, |i| i.seq),
        );

        let interaction = &stream[*cursor];
        *cursor += 1;
        interaction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn interaction(seq: u64, port: &str, method: &str, output: serde_json::Value) -> Interaction {
        Interaction { seq, port: port.into(), method: method.into(), input: json!({}), output }
    }

    fn make_cassette(interactions: Vec<Interaction>) -> Cassette {
        Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            reference: String::new(),
            interactions,
        }
    }

    #[test]
    fn streams_are_served_in_order_per_port() {
        let cassette = make_cassette(vec![
            interaction(0, "http", "get_status", json!({"Ok": 200})),
            interaction(1, "git", "clone_repo", json!({"Ok": "timed_out"})),
            interaction(2, "http", "get_status", json!({"Ok": 404})),
        ]);

        let mut replayer = CassetteReplayer::new(&cassette);
        assert_eq!(replayer.remaining(), 3);

        // The git stream can be read before the second http entry.
        assert_eq!(replayer.next_interaction("git", "clone_repo").seq, 1);
        assert_eq!(replayer.next_interaction("http", "get_status").output, json!({"Ok": 200}));
        assert_eq!(replayer.next_interaction("http", "get_status").output, json!({"Ok": 404}));
        assert_eq!(replayer.remaining(), 0);
    }

    #[test]
    #[should_panic(expected = "Cassette exhausted")]
    fn exhausted_stream_panics_with_descriptive_message() {
        let cassette = make_cassette(vec![interaction(0, "clock", "now", json!("x"))]);

        let mut replayer = CassetteReplayer::new(&cassette);
        let _ = replayer.next_interaction("clock", "now");
        let _ = replayer.next_interaction("clock", "now");
    }

    #[test]
    #[should_panic(expected = "no interactions recorded")]
    fn unknown_port_panics() {
        let mut replayer = CassetteReplayer::new(&make_cassette(vec![]));
        let _ = replayer.next_interaction("shell", "run");
    }
}
