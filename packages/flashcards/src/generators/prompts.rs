//! Completion prompts for the generation strategies.
//!
//! Every prompt pins the exact JSON shape expected back, since the parsers
//! reject anything that does not deserialize into it.

/// Prompt for multiple-options question generation.
pub const OPTIONS_PROMPT: &str = r#"You are generating quiz questions from a history text.

Read the text below and produce multiple-choice questions. Each question has
exactly one correct answer among its options.

Rules:
1. Every question must be answerable from the text alone
2. Cover names, dates, events, numbers, actions and causes; word each
   question so it stands on its own without the text
3. Provide 4 options per question, plausible but clearly distinguishable
4. rightAnswerIndex is the zero-based index of the correct option
5. Do not reuse the same fact for more than one question
6. Scale the number of questions to the length of the text: 5-10 for a short
   text, 10-25 for a medium one, 25-50 for a long one
7. If the text contains nothing quizzable, output null

Output a JSON array:
[
    {
        "question": "The question text",
        "options": ["option A", "option B", "option C", "option D"],
        "rightAnswerIndex": 0
    }
]

Topic: {topic}
Text:
{content}"#;

/// Prompt for timeline ordering exercises.
pub const TIMELINE_PROMPT: &str = r#"You are generating a timeline exercise from a history text.

Read the text below and list the distinct events it describes, in the
chronological order the text establishes.

Rules:
1. correctIndex is the zero-based chronological position of the event
2. If the text does not state an event's relative order, set correctIndex to null
3. date is the date as written in the text; dateFormat describes its precision
   (e.g. "year", "month", "day"); both null when the text gives no date
4. If the text describes fewer than 3 orderable events, output null

Output JSON:
{
    "events": [
        {
            "event": "Short description of the event",
            "date": "1066",
            "dateFormat": "year",
            "correctIndex": 0
        }
    ]
}

Topic: {topic}
Text:
{content}"#;

/// Prompt for "in which year" questions.
pub const DATE_PROMPT: &str = r#"You are generating date quiz questions from a history text.

Read the text below and produce "in which year did X happen?" questions for
events the text explicitly dates.

Rules:
1. Only use events with an explicit year in the text
2. correctYear is the year as an integer (negative for BCE)
3. If the text dates no events, output null

Output a JSON array:
[
    {
        "question": "In which year did X happen?",
        "correctYear": 1066
    }
]

Topic: {topic}
Text:
{content}"#;

/// First graph pass: summary, chained event graph, free-standing facts.
pub const GRAPH_PROMPT: &str = r#"You are building a narrative summary of a history text.

Read the text below and produce:
1. A 2-3 sentence summary
2. A chain of the key events in chronological order, each linked to the next
3. Free-standing facts that do not fit the chain

Rules:
1. eventCode is a short unique kebab-case identifier for the event
2. link is "causal" when the event caused the next one, "chronological" when
   it merely precedes it; reason explains why the event belongs in the chain
3. date is the date as written in the text; dateFormat describes its
   precision (e.g. "year", "month", "day"); both null when the text gives none
4. nextEvent nests the following event; the last event omits it
5. A fact may reference an event by its eventCode; leave eventCode null for
   facts that stand alone
6. If the text has no narrative to chain, set eventGraph to null

Output JSON:
{
    "summary": "2-3 sentence summary",
    "eventGraph": {
        "eventCode": "battle-of-hastings",
        "description": "William defeats Harold at Hastings",
        "reason": "Starting point of the conquest",
        "date": "1066",
        "dateFormat": "year",
        "link": "causal",
        "nextEvent": { ... same shape, recursively ... }
    },
    "facts": [
        {"fact": "A free-standing fact", "eventCode": null}
    ]
}

Topic: {topic}
Text:
{content}"#;

/// Second graph pass: questions addressed to event codes from the first pass.
pub const GRAPH_QUESTIONS_PROMPT: &str = r#"You are writing quiz questions for a chain of historical events.

For each event below, write one question with four answer options, answerable
from the original text.

Rules:
1. eventCode must be one of the codes listed below, unchanged
2. Ask about causes and consequences, not dates or names
3. Never use "all of the above" or "none of the above" as an answer
4. correctAnswerIndex is the zero-based index of the correct answer

Output a JSON array:
[
    {
        "eventCode": "battle-of-hastings",
        "question": "The question text",
        "answers": ["answer A", "answer B", "answer C", "answer D"],
        "correctAnswerIndex": 0
    }
]

Events:
{events}

Topic: {topic}
Text:
{content}"#;

pub fn format_options_prompt(topic: &str, content: &str) -> String {
    OPTIONS_PROMPT
        .replace("{topic}", topic)
        .replace("{content}", content)
}

pub fn format_timeline_prompt(topic: &str, content: &str) -> String {
    TIMELINE_PROMPT
        .replace("{topic}", topic)
        .replace("{content}", content)
}

pub fn format_date_prompt(topic: &str, content: &str) -> String {
    DATE_PROMPT
        .replace("{topic}", topic)
        .replace("{content}", content)
}

pub fn format_graph_prompt(topic: &str, content: &str) -> String {
    GRAPH_PROMPT
        .replace("{topic}", topic)
        .replace("{content}", content)
}

/// Events are listed as "code: description" lines so the second pass can
/// address nodes by code.
pub fn format_graph_questions_prompt(
    topic: &str,
    content: &str,
    events: &[(String, String)],
) -> String {
    let events_text = events
        .iter()
        .map(|(code, description)| format!("{}: {}", code, description))
        .collect::<Vec<_>>()
        .join("\n");

    GRAPH_QUESTIONS_PROMPT
        .replace("{events}", &events_text)
        .replace("{topic}", topic)
        .replace("{content}", content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_options_prompt() {
        let formatted = format_options_prompt("The Norman Conquest", "William landed in 1066.");
        assert!(formatted.contains("The Norman Conquest"));
        assert!(formatted.contains("William landed in 1066."));
        assert!(!formatted.contains("{topic}"));
        assert!(!formatted.contains("{content}"));
    }

    #[test]
    fn test_format_graph_questions_prompt() {
        let events = vec![
            ("hastings".to_string(), "William defeats Harold".to_string()),
            ("domesday".to_string(), "The Domesday survey".to_string()),
        ];
        let formatted = format_graph_questions_prompt("Normans", "text", &events);
        assert!(formatted.contains("hastings: William defeats Harold"));
        assert!(formatted.contains("domesday: The Domesday survey"));
    }
}
