//! Event graph for historical narrative cards.
//!
//! The completion service returns the graph as a recursively nested chain
//! (each event embeds the next). That shape is awkward to store and walk, so
//! it is flattened on arrival into an arena: nodes keyed by their event code,
//! with `next_event` holding the successor's code. Traversal order is defined
//! by `first_event` plus the `next_event` links, never by map order.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{FlashcardError, Result};

/// How an event relates to its successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventLink {
    /// The event caused the next one.
    Causal,
    /// The event merely precedes the next one.
    Chronological,
}

/// A free-standing fact extracted alongside the graph, optionally anchored
/// to one of its events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Fact {
    pub fact: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub event_code: Option<String>,
}

/// The question attached to one event node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventQuestion {
    pub question: String,
    pub answers: Vec<String>,
    pub correct_answer_index: usize,
}

/// A question as returned by the second completion pass, addressed to an
/// event node by code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GraphQuestion {
    pub event_code: String,
    pub question: String,
    pub answers: Vec<String>,
    pub correct_answer_index: usize,
}

/// One event in the chain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventNode {
    pub event_code: String,
    pub description: String,

    /// Why this event belongs in the chain.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reason: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub date_format: Option<String>,

    /// Relation to the successor; meaningless on the last event.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub link: Option<EventLink>,

    /// Code of the successor node, `None` for the last event.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub next_event: Option<String>,

    /// Question attached by the second completion pass.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub question: Option<EventQuestion>,
}

/// The nested chain shape as produced by the completion service. Only used
/// at the parse boundary; flattened into [`EventGraph`] immediately.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEventNode {
    pub event_code: String,
    pub description: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub date_format: Option<String>,
    #[serde(default)]
    pub link: Option<EventLink>,
    #[serde(default)]
    pub next_event: Option<Box<RawEventNode>>,
}

/// Flat arena of event nodes keyed by event code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EventGraph {
    /// Code of the entry node; `None` for an empty graph.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub first_event: Option<String>,
    #[serde(default)]
    pub nodes: BTreeMap<String, EventNode>,
}

impl EventGraph {
    /// Flatten a nested chain into the arena form.
    ///
    /// A duplicate event code means the chain would lose a node when keyed
    /// by code, so it is rejected as malformed. The result is acyclic and
    /// finite by construction.
    pub fn from_chain(first: Option<RawEventNode>) -> Result<EventGraph> {
        let mut graph = EventGraph::default();
        let mut current = first;

        while let Some(raw) = current {
            let next = raw.next_event;
            let node = EventNode {
                event_code: raw.event_code.clone(),
                description: raw.description,
                reason: raw.reason,
                date: raw.date,
                date_format: raw.date_format,
                link: raw.link,
                next_event: next.as_ref().map(|n| n.event_code.clone()),
                question: None,
            };

            if graph.first_event.is_none() {
                graph.first_event = Some(raw.event_code.clone());
            }
            if graph.nodes.insert(raw.event_code.clone(), node).is_some() {
                return Err(FlashcardError::structural(format!(
                    "duplicate event code in graph: {}",
                    raw.event_code
                )));
            }

            current = next.map(|boxed| *boxed);
        }

        Ok(graph)
    }

    pub fn is_empty(&self) -> bool {
        self.first_event.is_none()
    }

    /// Walk the chain from `first_event` following `next_event` links.
    /// Bounded by the node count, so a malformed cycle cannot loop forever.
    pub fn iter(&self) -> impl Iterator<Item = &EventNode> {
        GraphIter {
            graph: self,
            next: self.first_event.as_deref(),
            remaining: self.nodes.len(),
        }
    }

    /// Attach questions to their event nodes, joined by event code. At most
    /// one question per node; re-attaching overwrites, so the operation is
    /// idempotent and order-independent. Questions addressing a code not in
    /// the graph are dropped. Returns the number of nodes that received a
    /// question.
    ///
    /// Fails with [`FlashcardError::Structural`] when the graph has no entry
    /// node, since there is nothing to attach to.
    pub fn attach_questions(&mut self, questions: &[GraphQuestion]) -> Result<usize> {
        if self.first_event.is_none() {
            return Err(FlashcardError::structural(
                "event graph has no first event",
            ));
        }

        let mut matched = BTreeSet::new();
        for question in questions {
            if let Some(node) = self.nodes.get_mut(&question.event_code) {
                node.question = Some(EventQuestion {
                    question: question.question.clone(),
                    answers: question.answers.clone(),
                    correct_answer_index: question.correct_answer_index,
                });
                matched.insert(question.event_code.clone());
            }
        }
        Ok(matched.len())
    }
}

struct GraphIter<'a> {
    graph: &'a EventGraph,
    next: Option<&'a str>,
    remaining: usize,
}

impl<'a> Iterator for GraphIter<'a> {
    type Item = &'a EventNode;

    fn next(&mut self) -> Option<&'a EventNode> {
        if self.remaining == 0 {
            return None;
        }
        let code = self.next?;
        let node = self.graph.nodes.get(code)?;
        self.remaining -= 1;
        self.next = node.next_event.as_deref();
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chain() -> RawEventNode {
        serde_json::from_value(json!({
            "eventCode": "hastings",
            "description": "William defeats Harold at Hastings",
            "date": "1066",
            "dateFormat": "year",
            "link": "causal",
            "nextEvent": {
                "eventCode": "domesday",
                "description": "The Domesday survey records the conquered land",
                "reason": "Consolidation of the conquest",
                "date": "1086",
                "dateFormat": "year",
                "link": "chronological",
                "nextEvent": {
                    "eventCode": "crusade",
                    "description": "Norman knights join the First Crusade",
                    "date": "1095",
                    "dateFormat": "year"
                }
            }
        }))
        .unwrap()
    }

    fn question(code: &str) -> GraphQuestion {
        GraphQuestion {
            event_code: code.into(),
            question: format!("What happened at {}?", code),
            answers: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer_index: 1,
        }
    }

    #[test]
    fn test_from_chain_flattens_in_order() {
        let graph = EventGraph::from_chain(Some(chain())).unwrap();

        assert_eq!(graph.first_event.as_deref(), Some("hastings"));
        assert_eq!(graph.nodes.len(), 3);

        let codes: Vec<&str> = graph.iter().map(|n| n.event_code.as_str()).collect();
        assert_eq!(codes, vec!["hastings", "domesday", "crusade"]);
        assert_eq!(graph.nodes["domesday"].next_event.as_deref(), Some("crusade"));
        assert_eq!(graph.nodes["domesday"].link, Some(EventLink::Chronological));
        assert_eq!(graph.nodes["crusade"].next_event, None);
    }

    #[test]
    fn test_from_chain_rejects_duplicate_codes() {
        let raw: RawEventNode = serde_json::from_value(json!({
            "eventCode": "a",
            "description": "first",
            "nextEvent": { "eventCode": "a", "description": "again" }
        }))
        .unwrap();

        let err = EventGraph::from_chain(Some(raw)).unwrap_err();
        assert!(matches!(err, FlashcardError::Structural { .. }));
    }

    #[test]
    fn test_empty_chain_gives_empty_graph() {
        let graph = EventGraph::from_chain(None).unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.iter().count(), 0);
    }

    #[test]
    fn test_attach_questions_joins_by_code() {
        let mut graph = EventGraph::from_chain(Some(chain())).unwrap();

        let attached = graph
            .attach_questions(&[question("domesday"), question("nowhere")])
            .unwrap();
        assert_eq!(attached, 1);
        assert!(graph.nodes["domesday"].question.is_some());
        assert!(graph.nodes["hastings"].question.is_none());
    }

    #[test]
    fn test_attach_questions_is_idempotent_and_order_independent() {
        let questions = [question("hastings"), question("crusade")];
        let mut reversed = questions.clone();
        reversed.reverse();

        let mut a = EventGraph::from_chain(Some(chain())).unwrap();
        let mut b = EventGraph::from_chain(Some(chain())).unwrap();

        assert_eq!(a.attach_questions(&questions).unwrap(), 2);
        assert_eq!(a.attach_questions(&questions).unwrap(), 2);
        assert_eq!(b.attach_questions(&reversed).unwrap(), 2);
        assert_eq!(a, b);
    }

    #[test]
    fn test_attach_questions_requires_entry_node() {
        let mut graph = EventGraph::default();
        let err = graph.attach_questions(&[]).unwrap_err();
        assert!(matches!(err, FlashcardError::Structural { .. }));
    }

    #[test]
    fn test_iter_is_cycle_safe() {
        let mut graph = EventGraph::from_chain(Some(chain())).unwrap();
        // Corrupt the chain into a cycle
        graph.nodes.get_mut("crusade").unwrap().next_event = Some("hastings".into());

        assert_eq!(graph.iter().count(), 3);
    }
}
