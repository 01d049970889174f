//! The polymorphic card model.
//!
//! A [`Card`] is one persisted unit of generated quiz content. The common
//! envelope (owner, topic, section) wraps a closed tagged union of four
//! shapes, discriminated by the persisted `type` tag so a stored record can
//! be reconstructed generically.

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{FlashcardError, Result};
use crate::traits::store::DeleteScope;
use crate::types::graph::{EventGraph, Fact, GraphQuestion};

/// The closed set of card shapes. Intentionally non-extensible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Options,
    Timeline,
    Date,
    Graph,
}

impl CardType {
    /// All card types, in strategy-factory order.
    pub const ALL: [CardType; 4] = [
        CardType::Options,
        CardType::Timeline,
        CardType::Date,
        CardType::Graph,
    ];

    /// The persisted type tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::Options => "options",
            CardType::Timeline => "timeline",
            CardType::Date => "date",
            CardType::Graph => "graph",
        }
    }
}

impl FromStr for CardType {
    type Err = FlashcardError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "options" => Ok(CardType::Options),
            "timeline" => Ok(CardType::Timeline),
            "date" => Ok(CardType::Date),
            "graph" => Ok(CardType::Graph),
            other => Err(FlashcardError::validation(format!(
                "flashcards type {} is not supported",
                other
            ))),
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One persisted unit of generated quiz content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Persisted id; absent until stored.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<String>,

    /// Owner of the card.
    pub user: String,

    /// Stable topic identifier.
    pub topic_id: String,

    /// Human-readable topic key.
    pub topic_code: String,

    /// Identifies the source document within the topic.
    pub section_code: String,

    /// The shape-specific content, tagged with the persisted `type`.
    #[serde(flatten)]
    pub content: CardContent,
}

/// The shape-specific part of a card. The serde tag is the persisted `type`
/// and is immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CardContent {
    Options(MultipleOptionsCard),
    Timeline(TimelineCard),
    Date(DateCard),
    Graph(HistoricalGraphCard),
}

/// A question with multiple options of which exactly one is valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MultipleOptionsCard {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub section_title: Option<String>,
    #[serde(default)]
    pub section_short_title: String,
    pub question: String,
    pub options: Vec<String>,
    pub right_answer_index: usize,
}

impl MultipleOptionsCard {
    /// Shuffle the options uniformly at random (Fisher–Yates over an index
    /// permutation) and realign `right_answer_index` so it keeps tracking
    /// the correct option. Guarantees the correct answer is not
    /// positionally biased.
    pub fn shuffle_options<R: Rng>(&mut self, rng: &mut R) {
        let mut indices: Vec<usize> = (0..self.options.len()).collect();
        indices.shuffle(rng);

        let new_options: Vec<String> = indices.iter().map(|&i| self.options[i].clone()).collect();
        if let Some(new_index) = indices.iter().position(|&i| i == self.right_answer_index) {
            self.right_answer_index = new_index;
        }
        self.options = new_options;
    }
}

/// One event in a timeline reordering exercise.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub event: String,
    pub date: Option<String>,
    pub date_format: Option<String>,

    /// The event's true position in chronological order. `None` means the
    /// text does not state the event's relative order: it still renders but
    /// is not gradable by order.
    pub correct_index: Option<usize>,
}

/// A scrambled list of events to be put back in order. The persisted order
/// is intentionally shuffled; `correct_index` on each event is what lets a
/// consumer reconstruct the true order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimelineCard {
    pub section_title: String,
    pub section_short_title: String,
    pub events: Vec<TimelineEvent>,
}

impl TimelineCard {
    /// Shuffle the events uniformly at random.
    pub fn shuffle_events<R: Rng>(&mut self, rng: &mut R) {
        self.events.shuffle(rng);
    }
}

/// An "in which year...?" question about one explicitly dated event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DateCard {
    pub section_title: String,
    pub section_short_title: String,
    pub question: String,
    pub correct_year: i32,
}

/// A historical narrative card: summary, chained event graph, free-standing
/// facts, and provenance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalGraphCard {
    pub section_title: String,
    pub section_short_title: String,
    pub summary: String,
    pub graph: EventGraph,
    pub facts: Vec<Fact>,

    /// Which generator revision produced this card.
    pub generator_name: String,
}

impl HistoricalGraphCard {
    /// Attach multiple-choice questions to the graph's event nodes, joined
    /// by event code. See [`EventGraph::attach_questions`].
    pub fn attach_questions(&mut self, questions: &[GraphQuestion]) -> Result<usize> {
        self.graph.attach_questions(questions)
    }
}

impl Card {
    /// Create an unstored card.
    pub fn new(
        user: impl Into<String>,
        topic_id: impl Into<String>,
        topic_code: impl Into<String>,
        section_code: impl Into<String>,
        content: CardContent,
    ) -> Self {
        Self {
            id: None,
            user: user.into(),
            topic_id: topic_id.into(),
            topic_code: topic_code.into(),
            section_code: section_code.into(),
            content,
        }
    }

    /// The card's type tag.
    pub fn card_type(&self) -> CardType {
        match &self.content {
            CardContent::Options(_) => CardType::Options,
            CardContent::Timeline(_) => CardType::Timeline,
            CardContent::Date(_) => CardType::Date,
            CardContent::Graph(_) => CardType::Graph,
        }
    }

    /// The replacement scope this card belongs to
    /// (topic + section + type + user).
    pub fn scope(&self) -> DeleteScope {
        DeleteScope::section(
            &self.topic_id,
            &self.user,
            &self.section_code,
            self.card_type(),
        )
    }

    /// Reconstruct a polymorphic card from a stored record, dispatching on
    /// the stored `type` tag.
    ///
    /// An unknown tag is a data-integrity fault
    /// ([`FlashcardError::Structural`]), not a client error: the record was
    /// written by this system.
    pub fn from_record(record: serde_json::Value) -> Result<Card> {
        let tag = record
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or_else(|| FlashcardError::structural("stored card has no type tag"))?;

        if CardType::from_str(tag).is_err() {
            return Err(FlashcardError::structural(format!(
                "unknown stored card type: {}",
                tag
            )));
        }

        serde_json::from_value(record)
            .map_err(|e| FlashcardError::structural(format!("malformed stored card: {}", e)))
    }

    /// Build and validate a card from an API request body.
    ///
    /// Only `options` cards can be created this way; missing or malformed
    /// fields are client errors.
    pub fn from_request(type_tag: &str, body: &serde_json::Value, user: &str) -> Result<Card> {
        if type_tag != "options" {
            return Err(FlashcardError::validation(format!(
                "cards of type {} cannot be created directly",
                type_tag
            )));
        }

        let topic_code = required_str(body, "topicCode", "No topic code provided")?;
        let topic_id = required_str(body, "topicId", "No topic id provided")?;
        let section_code = required_str(body, "sectionCode", "No section code provided")?;
        let question = required_str(body, "question", "No question provided")?;
        let section_short_title =
            required_str(body, "sectionShortTitle", "No section short title provided")?;

        let options: Vec<String> = body
            .get("options")
            .and_then(|v| v.as_array())
            .map(|opts| {
                opts.iter()
                    .filter_map(|o| o.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        if options.len() < 2 {
            return Err(FlashcardError::validation(
                "No (or not enough) options provided",
            ));
        }

        let right_answer_index = body
            .get("rightAnswerIndex")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| FlashcardError::validation("No right answer provided"))?
            as usize;

        if right_answer_index >= options.len() {
            return Err(FlashcardError::validation(
                "Right answer index is out of range",
            ));
        }

        Ok(Card::new(
            user,
            topic_id,
            topic_code,
            section_code,
            CardContent::Options(MultipleOptionsCard {
                section_title: body
                    .get("sectionTitle")
                    .and_then(|v| v.as_str())
                    .map(str::to_string),
                section_short_title,
                question,
                options,
                right_answer_index,
            }),
        ))
    }
}

fn required_str(body: &serde_json::Value, field: &str, message: &str) -> Result<String> {
    body.get(field)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| FlashcardError::validation(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn options_card() -> MultipleOptionsCard {
        MultipleOptionsCard {
            section_title: Some("The Merovingians".into()),
            section_short_title: "Merovingians".into(),
            question: "Who founded the dynasty?".into(),
            options: vec![
                "Clovis I".into(),
                "Charlemagne".into(),
                "Pepin the Short".into(),
                "Childeric I".into(),
            ],
            right_answer_index: 0,
        }
    }

    #[test]
    fn test_shuffle_preserves_options_and_tracks_answer() {
        for seed in 0..20 {
            let mut card = options_card();
            let correct = card.options[card.right_answer_index].clone();
            let mut original = card.options.clone();

            let mut rng = StdRng::seed_from_u64(seed);
            card.shuffle_options(&mut rng);

            // Same multiset of options
            let mut shuffled = card.options.clone();
            original.sort();
            shuffled.sort();
            assert_eq!(original, shuffled);

            // Index still points at the correct option
            assert_eq!(card.options[card.right_answer_index], correct);
        }
    }

    #[test]
    fn test_timeline_shuffle_preserves_events() {
        let mut card = TimelineCard {
            section_title: "t".into(),
            section_short_title: "t".into(),
            events: (0..10)
                .map(|i| TimelineEvent {
                    event: format!("event {}", i),
                    date: None,
                    date_format: None,
                    correct_index: Some(i),
                })
                .collect(),
        };

        let mut rng = StdRng::seed_from_u64(7);
        card.shuffle_events(&mut rng);

        assert_eq!(card.events.len(), 10);
        // Sorting by correct_index reconstructs the true order
        let mut events = card.events.clone();
        events.sort_by_key(|e| e.correct_index);
        for (i, event) in events.iter().enumerate() {
            assert_eq!(event.correct_index, Some(i));
            assert_eq!(event.event, format!("event {}", i));
        }
    }

    #[test]
    fn test_card_serializes_with_type_tag() {
        let card = Card::new(
            "user@test.com",
            "topic-1",
            "the-merovingians",
            "s1",
            CardContent::Options(options_card()),
        );

        let value = serde_json::to_value(&card).unwrap();
        assert_eq!(value["type"], "options");
        assert_eq!(value["topicId"], "topic-1");
        assert_eq!(value["rightAnswerIndex"], 0);
        assert!(value.get("id").is_none());

        let back = Card::from_record(value).unwrap();
        assert_eq!(back, card);
    }

    #[test]
    fn test_from_record_rejects_unknown_type() {
        let record = json!({
            "type": "crossword",
            "user": "u",
            "topicId": "t",
            "topicCode": "tc",
            "sectionCode": "s"
        });

        let err = Card::from_record(record).unwrap_err();
        assert!(matches!(err, FlashcardError::Structural { .. }));
    }

    #[test]
    fn test_from_request_validates_fields() {
        let body = json!({
            "topicCode": "tc",
            "topicId": "t1",
            "sectionCode": "s1",
            "sectionShortTitle": "Short",
            "question": "Q?",
            "options": ["a", "b", "c"],
            "rightAnswerIndex": 1
        });

        let card = Card::from_request("options", &body, "u@test.com").unwrap();
        assert_eq!(card.card_type(), CardType::Options);
        assert_eq!(card.user, "u@test.com");

        // Missing question
        let mut bad = body.clone();
        bad.as_object_mut().unwrap().remove("question");
        assert!(Card::from_request("options", &bad, "u").is_err());

        // Too few options
        let mut bad = body.clone();
        bad["options"] = json!(["only one"]);
        assert!(Card::from_request("options", &bad, "u").is_err());

        // Out-of-range answer index
        let mut bad = body.clone();
        bad["rightAnswerIndex"] = json!(9);
        assert!(Card::from_request("options", &bad, "u").is_err());

        // Unsupported type
        assert!(Card::from_request("timeline", &body, "u").is_err());
    }

    #[test]
    fn test_card_type_round_trip() {
        for t in CardType::ALL {
            assert_eq!(CardType::from_str(t.as_str()).unwrap(), t);
        }
        assert!(CardType::from_str("gap").is_err());
    }

    #[test]
    fn test_scope_matches() {
        let card = Card::new(
            "u",
            "t1",
            "tc",
            "s1",
            CardContent::Date(DateCard {
                section_title: "t".into(),
                section_short_title: "t".into(),
                question: "In which year?".into(),
                correct_year: 1095,
            }),
        );

        assert!(DeleteScope::topic("t1", "u").matches(&card));
        assert!(DeleteScope::section("t1", "u", "s1", CardType::Date).matches(&card));
        assert!(!DeleteScope::section("t1", "u", "s1", CardType::Options).matches(&card));
        assert!(!DeleteScope::section("t1", "u", "s2", CardType::Date).matches(&card));
        assert!(!DeleteScope::topic("t2", "u").matches(&card));
        assert!(!DeleteScope::topic("t1", "someone-else").matches(&card));
    }
}
