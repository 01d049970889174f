//! Data model for generated cards.

pub mod card;
pub mod graph;

pub use card::{
    Card, CardContent, CardType, DateCard, HistoricalGraphCard, MultipleOptionsCard, TimelineCard,
    TimelineEvent,
};
pub use graph::{
    EventGraph, EventLink, EventNode, EventQuestion, Fact, GraphQuestion, RawEventNode,
};
